use matrixcompare::assert_scalar_eq;
use stokeslet::nalgebra::Point2;
use stokeslet::quadrature::{
    triangle_quadrature_strength_1, triangle_quadrature_strength_2, triangle_quadrature_strength_4,
    QuadraturePair2d,
};

fn integrate(quadrature: &QuadraturePair2d<f64>, f: impl Fn(&Point2<f64>) -> f64) -> f64 {
    let (weights, points) = quadrature;
    weights.iter().zip(points).map(|(w, p)| w * f(p)).sum()
}

/// Exact integrals of monomials over the reference triangle with corners
/// (-1, -1), (1, -1), (-1, 1), for comparison with quadrature output.
const INT_1: f64 = 2.0;
const INT_X: f64 = -2.0 / 3.0;
const INT_X2: f64 = 2.0 / 3.0;
const INT_XY: f64 = 0.0;
const INT_X3: f64 = -2.0 / 5.0;
const INT_X4: f64 = 2.0 / 5.0;
const INT_X2Y2: f64 = 2.0 / 9.0;

#[test]
fn strength_1_rule_integrates_linears_exactly() {
    let quadrature = triangle_quadrature_strength_1::<f64>();
    assert_scalar_eq!(integrate(&quadrature, |_| 1.0), INT_1, comp = abs, tol = 1e-14);
    assert_scalar_eq!(integrate(&quadrature, |p| p.x), INT_X, comp = abs, tol = 1e-14);
    assert_scalar_eq!(integrate(&quadrature, |p| p.y), INT_X, comp = abs, tol = 1e-14);
}

#[test]
fn strength_2_rule_integrates_quadratics_exactly() {
    let quadrature = triangle_quadrature_strength_2::<f64>();
    assert_scalar_eq!(integrate(&quadrature, |_| 1.0), INT_1, comp = abs, tol = 1e-14);
    assert_scalar_eq!(integrate(&quadrature, |p| p.x), INT_X, comp = abs, tol = 1e-14);
    assert_scalar_eq!(integrate(&quadrature, |p| p.y), INT_X, comp = abs, tol = 1e-14);
    assert_scalar_eq!(integrate(&quadrature, |p| p.x * p.x), INT_X2, comp = abs, tol = 1e-14);
    assert_scalar_eq!(integrate(&quadrature, |p| p.y * p.y), INT_X2, comp = abs, tol = 1e-14);
    assert_scalar_eq!(integrate(&quadrature, |p| p.x * p.y), INT_XY, comp = abs, tol = 1e-14);
}

#[test]
fn strength_4_rule_integrates_quartics_exactly() {
    let quadrature = triangle_quadrature_strength_4::<f64>();
    assert_scalar_eq!(integrate(&quadrature, |_| 1.0), INT_1, comp = abs, tol = 1e-12);
    assert_scalar_eq!(integrate(&quadrature, |p| p.x), INT_X, comp = abs, tol = 1e-12);
    assert_scalar_eq!(integrate(&quadrature, |p| p.x * p.x), INT_X2, comp = abs, tol = 1e-12);
    assert_scalar_eq!(integrate(&quadrature, |p| p.x * p.y), INT_XY, comp = abs, tol = 1e-12);
    assert_scalar_eq!(
        integrate(&quadrature, |p| p.x * p.x * p.x),
        INT_X3,
        comp = abs,
        tol = 1e-12
    );
    assert_scalar_eq!(
        integrate(&quadrature, |p| p.x * p.x * p.x * p.x),
        INT_X4,
        comp = abs,
        tol = 1e-12
    );
    assert_scalar_eq!(
        integrate(&quadrature, |p| p.x * p.x * p.y * p.y),
        INT_X2Y2,
        comp = abs,
        tol = 1e-12
    );
}

#[test]
fn quadrature_points_lie_inside_the_reference_triangle() {
    for quadrature in [
        triangle_quadrature_strength_1::<f64>(),
        triangle_quadrature_strength_2::<f64>(),
        triangle_quadrature_strength_4::<f64>(),
    ] {
        let (weights, points) = &quadrature;
        assert_eq!(weights.len(), points.len());
        for (w, p) in weights.iter().zip(points) {
            assert!(*w > 0.0);
            assert!(p.x >= -1.0 - 1e-14);
            assert!(p.y >= -1.0 - 1e-14);
            assert!(p.x + p.y <= 1e-14);
        }
    }
}
