use matrixcompare::assert_scalar_eq;
use stokeslet::connectivity::Segment2d2Connectivity;
use stokeslet::mesh::procedural::{
    create_rectangular_uniform_tri_mesh_2d, create_unit_square_uniform_tri_mesh_2d,
};
use stokeslet::mesh::{FacetMarkers, TriangleMesh2d};
use stokeslet::nalgebra::{Point2, Vector2};

fn mesh_area(mesh: &TriangleMesh2d<f64>) -> f64 {
    // The reference triangle has area 2, so each element contributes 2 |det J|
    let centroid = Point2::new(-1.0 / 3.0, -1.0 / 3.0);
    mesh.connectivity()
        .iter()
        .map(|conn| {
            let element = conn.element(mesh.vertices()).expect("Connectivity indices are in bounds");
            2.0 * element.reference_jacobian(&centroid).determinant().abs()
        })
        .sum()
}

#[test]
fn unit_square_mesh_has_expected_size_and_area() {
    let resolution = 2;
    let mesh = create_unit_square_uniform_tri_mesh_2d::<f64>(resolution);
    assert_eq!(mesh.vertices().len(), (resolution + 1) * (resolution + 1));
    assert_eq!(mesh.connectivity().len(), 2 * resolution * resolution);
    assert_scalar_eq!(mesh_area(&mesh), 1.0, comp = abs, tol = 1e-14);
}

#[test]
fn rectangular_mesh_has_expected_size_and_area() {
    let mesh = create_rectangular_uniform_tri_mesh_2d::<f64>(1.0, 5, 1, 2, &Vector2::new(-1.0, 2.0));
    assert_eq!(mesh.vertices().len(), 11 * 3);
    assert_eq!(mesh.connectivity().len(), 2 * 10 * 2);
    assert_scalar_eq!(mesh_area(&mesh), 5.0, comp = abs, tol = 1e-13);

    for v in mesh.vertices() {
        assert!(v.x >= -1.0 - 1e-14 && v.x <= 4.0 + 1e-14);
        assert!(v.y >= 2.0 - 1e-14 && v.y <= 3.0 + 1e-14);
    }
}

#[test]
fn boundary_facets_of_unit_square_lie_on_the_boundary() {
    let resolution = 3;
    let mesh = create_unit_square_uniform_tri_mesh_2d::<f64>(resolution);
    let facets = mesh.find_boundary_facets();
    assert_eq!(facets.len(), 4 * resolution);

    let on_boundary = |p: &Point2<f64>| {
        let eps = 1e-14;
        p.x < eps || p.x > 1.0 - eps || p.y < eps || p.y > 1.0 - eps
    };
    for facet in &facets {
        let [a, b] = facet.0;
        assert!(on_boundary(&mesh.vertices()[a]));
        assert!(on_boundary(&mesh.vertices()[b]));
    }
}

#[test]
fn classifier_tags_every_boundary_facet() {
    let mesh = create_unit_square_uniform_tri_mesh_2d::<f64>(2);
    let eps = 1e-12;
    let markers = FacetMarkers::from_classifier(&mesh, |midpoint| {
        if midpoint.x < eps {
            Some(1)
        } else if midpoint.x > 1.0 - eps {
            Some(2)
        } else {
            Some(0)
        }
    })
    .expect("Classification is total");

    assert_eq!(markers.len(), 8);
    assert_eq!(markers.facets_with_tag(0).count(), 4);
    assert_eq!(markers.facets_with_tag(1).count(), 2);
    assert_eq!(markers.facets_with_tag(2).count(), 2);

    // Row-major vertex numbering from the bottom-left corner
    assert_eq!(markers.nodes_with_tag(1), vec![0, 3, 6]);
    assert_eq!(markers.nodes_with_tag(2), vec![2, 5, 8]);
}

#[test]
fn partial_classification_is_an_error() {
    let mesh = create_unit_square_uniform_tri_mesh_2d::<f64>(2);
    let eps = 1e-12;
    let result = FacetMarkers::from_classifier(&mesh, |midpoint| (midpoint.x < eps).then_some(1));
    assert!(result.is_err());
}

#[test]
fn facet_and_tag_count_mismatch_is_an_error() {
    let facets = vec![Segment2d2Connectivity([0, 1])];
    assert!(FacetMarkers::from_facets_and_tags(facets, vec![0, 1]).is_err());
}

#[test]
fn marking_a_facet_twice_is_an_error() {
    // A facet carries exactly one tag, regardless of orientation
    let facets = vec![Segment2d2Connectivity([0, 1]), Segment2d2Connectivity([1, 0])];
    assert!(FacetMarkers::from_facets_and_tags(facets, vec![0, 1]).is_err());

    let facets = vec![Segment2d2Connectivity([0, 1]), Segment2d2Connectivity([0, 1])];
    assert!(FacetMarkers::from_facets_and_tags(facets, vec![2, 2]).is_err());
}

#[test]
fn nodes_with_tag_are_sorted_and_deduplicated() {
    let facets = vec![
        Segment2d2Connectivity([3, 1]),
        Segment2d2Connectivity([1, 0]),
        Segment2d2Connectivity([5, 4]),
    ];
    let markers = FacetMarkers::from_facets_and_tags(facets, vec![7, 7, 0]).unwrap();
    assert_eq!(markers.nodes_with_tag(7), vec![0, 1, 3]);
    assert_eq!(markers.nodes_with_tag(0), vec![4, 5]);
    assert!(markers.nodes_with_tag(42).is_empty());
}
