use matrixcompare::assert_scalar_eq;
use stokeslet::mesh::procedural::create_unit_square_uniform_tri_mesh_2d;
use stokeslet::mesh::{FacetMarkers, TriangleMesh2d};
use stokeslet::nalgebra::Vector2;
use stokeslet::stokes::StokesProblem;

const WALL: i32 = 0;
const OUTFLOW: i32 = 2;

fn unit_square_with_outflow_on_the_right(resolution: usize) -> (TriangleMesh2d<f64>, FacetMarkers) {
    let mesh = create_unit_square_uniform_tri_mesh_2d::<f64>(resolution);
    let eps = 1e-12;
    let markers = FacetMarkers::from_classifier(&mesh, |midpoint| {
        if midpoint.x > 1.0 - eps {
            Some(OUTFLOW)
        } else {
            Some(WALL)
        }
    })
    .unwrap();
    (mesh, markers)
}

#[test]
fn uniform_flow_is_reproduced_exactly() {
    // u = (1, 0), p = 0 satisfies the discrete equations exactly: the velocity
    // is constant and the natural outflow condition on the right edge holds
    let (mesh, markers) = unit_square_with_outflow_on_the_right(4);
    let solution = StokesProblem::new(&mesh, &markers)
        .with_velocity_bc(WALL, |_| Vector2::new(1.0, 0.0))
        .with_pressure_bc(OUTFLOW, |_| 0.0)
        .solve()
        .unwrap();

    for u in solution.velocity() {
        assert_scalar_eq!(u.x, 1.0, comp = abs, tol = 1e-9);
        assert_scalar_eq!(u.y, 0.0, comp = abs, tol = 1e-9);
    }
    for p in solution.pressure() {
        assert_scalar_eq!(*p, 0.0, comp = abs, tol = 1e-8);
    }
}

#[test]
fn hydrostatic_pressure_balances_a_constant_body_force() {
    // With no-slip walls everywhere and the body force f = (0, -1), the exact
    // solution u = 0, p = -y + C is linear and therefore reproduced exactly by
    // the P1 discretization
    let mesh = create_unit_square_uniform_tri_mesh_2d::<f64>(4);
    let eps = 1e-12;
    let markers = FacetMarkers::from_classifier(&mesh, |midpoint| {
        if midpoint.y > 1.0 - eps {
            Some(OUTFLOW)
        } else {
            Some(WALL)
        }
    })
    .unwrap();

    let solution = StokesProblem::new(&mesh, &markers)
        .with_velocity_bc(WALL, |_| Vector2::zeros())
        .with_velocity_bc(OUTFLOW, |_| Vector2::zeros())
        .with_pressure_bc(OUTFLOW, |p| -p.y)
        .with_source(|_| Vector2::new(0.0, -1.0))
        .solve()
        .unwrap();

    for u in solution.velocity() {
        assert!(u.norm() < 1e-9);
    }
    for (p, vertex) in solution.pressure().iter().zip(mesh.vertices()) {
        assert_scalar_eq!(*p, -vertex.y, comp = abs, tol = 1e-8);
    }
}

#[test]
fn missing_pressure_constraint_is_an_error() {
    // Dirichlet velocities on the whole boundary leave the pressure determined
    // only up to a constant
    let (mesh, markers) = unit_square_with_outflow_on_the_right(2);
    let result = StokesProblem::new(&mesh, &markers)
        .with_velocity_bc(WALL, |_| Vector2::zeros())
        .with_velocity_bc(OUTFLOW, |_| Vector2::zeros())
        .solve();
    assert!(result.is_err());
}

#[test]
fn stabilization_constant_can_be_overridden() {
    let (mesh, markers) = unit_square_with_outflow_on_the_right(2);
    let solution = StokesProblem::new(&mesh, &markers)
        .with_stabilization_constant(0.05)
        .with_velocity_bc(WALL, |_| Vector2::new(1.0, 0.0))
        .with_pressure_bc(OUTFLOW, |_| 0.0)
        .solve()
        .unwrap();

    // The uniform flow solution is exact independently of the stabilization
    for u in solution.velocity() {
        assert_scalar_eq!(u.x, 1.0, comp = abs, tol = 1e-9);
        assert_scalar_eq!(u.y, 0.0, comp = abs, tol = 1e-9);
    }
}
