//! The linear triangle element used for both velocity components and pressure.
use crate::connectivity::Tri3d2Connectivity;
use crate::Real;
use itertools::Itertools;
use nalgebra::{distance, Matrix1x3, Matrix2, Matrix2x3, Point2, Scalar, Vector2};
use numeric_literals::replace_float_literals;

/// A finite element representing linear basis functions on a triangle, in two dimensions.
///
/// The reference element is the triangle with corners (-1, -1), (1, -1), (-1, 1),
/// which is the domain the quadrature rules in [`crate::quadrature`] are defined on.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Tri3d2Element<T>
where
    T: Scalar,
{
    vertices: [Point2<T>; 3],
}

impl<T> Tri3d2Element<T>
where
    T: Scalar,
{
    pub fn from_vertices(vertices: [Point2<T>; 3]) -> Self {
        Self { vertices }
    }

    pub fn vertices(&self) -> &[Point2<T>; 3] {
        &self.vertices
    }
}

impl<T> Tri3d2Element<T>
where
    T: Real,
{
    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    pub fn reference() -> Self {
        Self::from_vertices([Point2::new(-1.0, -1.0), Point2::new(1.0, -1.0), Point2::new(-1.0, 1.0)])
    }

    /// Evaluates the three nodal basis functions at the given reference coordinates.
    #[rustfmt::skip]
    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    pub fn evaluate_basis(&self, xi: &Point2<T>) -> Matrix1x3<T> {
        Matrix1x3::from_row_slice(&[
            -0.5 * xi.x - 0.5 * xi.y,
            0.5 * xi.x + 0.5,
            0.5 * xi.y + 0.5
        ])
    }

    /// Gradients of the basis functions with respect to reference coordinates,
    /// one column per basis function. Constant over the element.
    #[rustfmt::skip]
    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    pub fn gradients(&self, _xi: &Point2<T>) -> Matrix2x3<T> {
        Matrix2x3::from_columns(&[
            Vector2::new(-0.5, -0.5),
            Vector2::new(0.5, 0.0),
            Vector2::new(0.0, 0.5)
        ])
    }

    /// The Jacobian of the map from reference to physical coordinates.
    #[allow(non_snake_case)]
    pub fn reference_jacobian(&self, xi: &Point2<T>) -> Matrix2<T> {
        let X: Matrix2x3<T> = Matrix2x3::from_fn(|i, j| self.vertices[j][i]);
        let G = self.gradients(xi);
        X * G.transpose()
    }

    /// Maps reference coordinates to physical coordinates.
    #[allow(non_snake_case)]
    pub fn map_reference_coords(&self, xi: &Point2<T>) -> Point2<T> {
        let X: Matrix2x3<T> = Matrix2x3::from_fn(|i, j| self.vertices[j][i]);
        let N = self.evaluate_basis(xi);
        Point2::from(&X * &N.transpose())
    }

    /// The longest edge of the element.
    ///
    /// This is the local cell size $h$ that enters the stabilization parameter
    /// $\delta = \beta h^2$.
    pub fn diameter(&self) -> T {
        self.vertices
            .iter()
            .tuple_combinations()
            .map(|(x, y)| distance(x, y))
            .fold(T::zero(), |a, b| a.max(b))
    }
}

impl Tri3d2Connectivity {
    /// Constructs the element corresponding to this connectivity.
    ///
    /// Returns `None` if any vertex index is out of bounds.
    pub fn element<T>(&self, vertices: &[Point2<T>]) -> Option<Tri3d2Element<T>>
    where
        T: Scalar,
    {
        Some(Tri3d2Element::from_vertices([
            vertices.get(self.0[0]).cloned()?,
            vertices.get(self.0[1]).cloned()?,
            vertices.get(self.0[2]).cloned()?,
        ]))
    }
}
