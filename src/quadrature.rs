//! Quadrature rules for the reference triangle.
//!
//! All rules are defined on the reference triangle with corners (-1, -1), (1, -1),
//! (-1, 1), so the weights of each rule sum to 2, the area of that triangle.
use crate::Real;
use nalgebra::{convert, Point2};

/// Weights and points of a quadrature rule in two dimensions.
pub type QuadraturePair2d<T> = (Vec<T>, Vec<Point2<T>>);

fn convert_quadrature_rule_from_f64<T>(quadrature: (Vec<f64>, Vec<[f64; 2]>)) -> QuadraturePair2d<T>
where
    T: Real,
{
    let (weights, points) = quadrature;
    let weights = weights.into_iter().map(convert).collect();
    let points = points
        .into_iter()
        .map(Point2::from)
        .map(|p: Point2<f64>| Point2::new(convert(p.x), convert(p.y)))
        .collect();
    (weights, points)
}

/// The centroid rule. Exact for polynomials of total degree 1.
pub fn triangle_quadrature_strength_1<T>() -> QuadraturePair2d<T>
where
    T: Real,
{
    let third = 1.0 / 3.0;
    convert_quadrature_rule_from_f64((vec![2.0], vec![[-third, -third]]))
}

/// The edge midpoint rule. Exact for polynomials of total degree 2.
///
/// This is the rule used for assembling the stabilized Stokes system, whose
/// integrands are at most biquadratic in the P1 basis functions.
pub fn triangle_quadrature_strength_2<T>() -> QuadraturePair2d<T>
where
    T: Real,
{
    let weights = vec![2.0 / 3.0; 3];
    let points = vec![[0.0, -1.0], [0.0, 0.0], [-1.0, 0.0]];
    convert_quadrature_rule_from_f64((weights, points))
}

/// A six-point rule exact for polynomials of total degree 4.
///
/// Used by the error estimation routines, where the integrand involves the
/// square of a non-polynomial exact solution.
pub fn triangle_quadrature_strength_4<T>() -> QuadraturePair2d<T>
where
    T: Real,
{
    // Two symmetric point groups with barycentric coordinates that are
    // permutations of (a, a, 1 - 2a) and (b, b, 1 - 2b). A barycentric point
    // (l1, l2, l3) maps to reference coordinates (2 l2 - 1, 2 l3 - 1).
    let a = 0.445948490915965;
    let b = 0.091576213509771;
    let w_a = 2.0 * 0.223381589678011;
    let w_b = 2.0 * 0.109951743655322;

    let c = 1.0 - 2.0 * a;
    let d = 1.0 - 2.0 * b;
    let weights = vec![w_a, w_a, w_a, w_b, w_b, w_b];
    let points = vec![
        [2.0 * a - 1.0, 2.0 * c - 1.0],
        [2.0 * c - 1.0, 2.0 * a - 1.0],
        [2.0 * a - 1.0, 2.0 * a - 1.0],
        [2.0 * b - 1.0, 2.0 * d - 1.0],
        [2.0 * d - 1.0, 2.0 * b - 1.0],
        [2.0 * b - 1.0, 2.0 * b - 1.0],
    ];
    convert_quadrature_rule_from_f64((weights, points))
}
