//! Functionality for error estimation.
//!
//! Used by convergence studies to measure the distance between a discrete nodal
//! field and an analytic reference solution.
use crate::mesh::TriangleMesh2d;
use crate::quadrature::QuadraturePair2d;
use crate::Real;
use itertools::izip;
use nalgebra::{Point2, Vector2};

/// Estimates the $L^2$ error of a nodal scalar field against an analytic field.
///
/// `u_h` holds one value per mesh vertex. The quadrature rule should be accurate
/// enough to resolve the (generally non-polynomial) exact solution; a strength-4
/// rule is a reasonable default for P1 fields.
///
/// # Panics
///
/// Panics if `u_h` does not have one entry per mesh vertex, or if the mesh
/// connectivity references out of bounds vertices.
pub fn estimate_scalar_l2_error<T>(
    mesh: &TriangleMesh2d<T>,
    u_h: &[T],
    u_exact: impl Fn(&Point2<T>) -> T,
    quadrature: &QuadraturePair2d<T>,
) -> T
where
    T: Real,
{
    assert_eq!(u_h.len(), mesh.vertices().len(), "One nodal value per vertex expected");
    let (weights, points) = quadrature;

    let mut result = T::zero();
    for conn in mesh.connectivity() {
        let element = conn
            .element(mesh.vertices())
            .expect("Mesh is not allowed to contain cells with indices out of bounds");
        let nodal_values = conn.map(|i| u_h[i]);

        for (&w, xi) in izip!(weights, points) {
            let phi = element.evaluate_basis(xi);
            let jacobian_det = element.reference_jacobian(xi).determinant();
            let x = element.map_reference_coords(xi);

            let mut u_h_at_x = T::zero();
            for (value, basis) in izip!(&nodal_values, phi.iter()) {
                u_h_at_x += *value * *basis;
            }
            let difference = u_h_at_x - u_exact(&x);
            result += w * difference * difference * jacobian_det.abs();
        }
    }
    result.sqrt()
}

/// Estimates the $L^2$ error of a nodal 2-vector field against an analytic field.
///
/// # Panics
///
/// Panics under the same conditions as [`estimate_scalar_l2_error`].
pub fn estimate_vector_l2_error<T>(
    mesh: &TriangleMesh2d<T>,
    u_h: &[Vector2<T>],
    u_exact: impl Fn(&Point2<T>) -> Vector2<T>,
    quadrature: &QuadraturePair2d<T>,
) -> T
where
    T: Real,
{
    assert_eq!(u_h.len(), mesh.vertices().len(), "One nodal value per vertex expected");
    let (weights, points) = quadrature;

    let mut result = T::zero();
    for conn in mesh.connectivity() {
        let element = conn
            .element(mesh.vertices())
            .expect("Mesh is not allowed to contain cells with indices out of bounds");
        let nodal_values = conn.map(|i| u_h[i]);

        for (&w, xi) in izip!(weights, points) {
            let phi = element.evaluate_basis(xi);
            let jacobian_det = element.reference_jacobian(xi).determinant();
            let x = element.map_reference_coords(xi);

            let mut u_h_at_x = Vector2::zeros();
            for (value, basis) in izip!(&nodal_values, phi.iter()) {
                u_h_at_x += value * *basis;
            }
            let difference = u_h_at_x - u_exact(&x);
            result += w * difference.norm_squared() * jacobian_det.abs();
        }
    }
    result.sqrt()
}
