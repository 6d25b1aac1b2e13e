//! Element-local assembly of the stabilized Stokes weak form.
use crate::connectivity::Connectivity;
use crate::element::Tri3d2Element;
use crate::mesh::TriangleMesh2d;
use crate::quadrature::QuadraturePair2d;
use crate::Real;
use eyre::eyre;
use itertools::izip;
use nalgebra::{DMatrixViewMut, DVectorViewMut, Matrix2, Matrix2x3, Point2, Scalar, Vector2};

/// Number of degrees of freedom per mesh node: two velocity components and one pressure.
pub const DOFS_PER_NODE: usize = 3;

/// Offset of the pressure component within a node's degrees of freedom.
pub const PRESSURE_OFFSET: usize = 2;

/// Describes the connectivity of an element-wise assembler: how many elements there
/// are, which global nodes each element touches and how many solution components
/// are attached to each node.
///
/// Global degree-of-freedom indices are laid out interleaved, i.e. dof
/// `solution_dim() * node + component`.
pub trait ElementConnectivityAssembler {
    fn solution_dim(&self) -> usize;

    fn num_elements(&self) -> usize;

    fn num_nodes(&self) -> usize;

    fn element_node_count(&self, element_index: usize) -> usize;

    fn populate_element_nodes(&self, output: &mut [usize], element_index: usize);
}

/// An element-wise assembler that produces element matrices.
pub trait ElementMatrixAssembler<T: Scalar>: ElementConnectivityAssembler {
    fn assemble_element_matrix_into(&self, element_index: usize, output: DMatrixViewMut<T>) -> eyre::Result<()>;
}

/// An element-wise assembler that produces element vectors.
pub trait ElementVectorAssembler<T: Scalar>: ElementConnectivityAssembler {
    fn assemble_element_vector_into(&self, element_index: usize, output: DVectorViewMut<T>) -> eyre::Result<()>;
}

/// A body force $f$ entering the right-hand side $L(v, q) = \int (v + \delta \nabla q) \cdot f \\, dx$.
pub trait SourceFunction<T: Scalar> {
    fn evaluate(&self, x: &Point2<T>) -> Vector2<T>;
}

impl<T, F> SourceFunction<T> for F
where
    T: Scalar,
    F: Fn(&Point2<T>) -> Vector2<T>,
{
    fn evaluate(&self, x: &Point2<T>) -> Vector2<T> {
        self(x)
    }
}

/// Geometry quantities of an element evaluated at one quadrature point.
struct ElementGeometry<T: Scalar> {
    /// Quadrature weight scaled by the absolute Jacobian determinant.
    dx: T,
    /// Physical gradients of the basis functions, one column per basis function.
    gradients: Matrix2x3<T>,
}

fn element_geometry<T>(element: &Tri3d2Element<T>, weight: T, xi: &Point2<T>) -> eyre::Result<ElementGeometry<T>>
where
    T: Real,
{
    let jacobian: Matrix2<T> = element.reference_jacobian(xi);
    let jacobian_det = jacobian.determinant();
    let inv_transposed = jacobian
        .try_inverse()
        .ok_or_else(|| eyre!("element has singular reference Jacobian (degenerate triangle)"))?
        .transpose();
    Ok(ElementGeometry {
        dx: weight * jacobian_det.abs(),
        gradients: inv_transposed * element.gradients(xi),
    })
}

/// Assembles the element matrices of the stabilized mixed bilinear form
///
/// $$ a(u, p; v, q) = \int \nabla v : \nabla u - (\nabla \cdot v) \\, p
///    + q \\, (\nabla \cdot u) + \delta \\, \nabla q \cdot \nabla p \\; \mathrm{d}x, $$
///
/// where $\delta = \beta h^2$ with $h$ the element diameter.
pub struct StokesFlowAssembler<'a, T: Scalar> {
    mesh: &'a TriangleMesh2d<T>,
    quadrature: QuadraturePair2d<T>,
    beta: T,
}

impl<'a, T: Scalar> StokesFlowAssembler<'a, T> {
    pub fn new(mesh: &'a TriangleMesh2d<T>, quadrature: QuadraturePair2d<T>, beta: T) -> Self {
        Self { mesh, quadrature, beta }
    }
}

impl<'a, T: Scalar> ElementConnectivityAssembler for StokesFlowAssembler<'a, T> {
    fn solution_dim(&self) -> usize {
        DOFS_PER_NODE
    }

    fn num_elements(&self) -> usize {
        self.mesh.connectivity().len()
    }

    fn num_nodes(&self) -> usize {
        self.mesh.vertices().len()
    }

    fn element_node_count(&self, _element_index: usize) -> usize {
        3
    }

    fn populate_element_nodes(&self, output: &mut [usize], element_index: usize) {
        output.copy_from_slice(self.mesh.connectivity()[element_index].vertex_indices());
    }
}

impl<'a, T: Real> ElementMatrixAssembler<T> for StokesFlowAssembler<'a, T> {
    fn assemble_element_matrix_into(&self, element_index: usize, mut output: DMatrixViewMut<T>) -> eyre::Result<()> {
        let conn = self
            .mesh
            .connectivity()
            .get(element_index)
            .ok_or_else(|| eyre!("element index {} out of bounds", element_index))?;
        let element = conn
            .element(self.mesh.vertices())
            .ok_or_else(|| eyre!("element {} references out of bounds vertices", element_index))?;

        assert_eq!(output.nrows(), 9);
        assert_eq!(output.ncols(), 9);
        output.fill(T::zero());

        let h = element.diameter();
        let delta = self.beta * h * h;

        let (weights, points) = &self.quadrature;
        for (&w, xi) in izip!(weights, points) {
            let geometry = element_geometry(&element, w, xi)?;
            let phi = element.evaluate_basis(xi);
            let g = &geometry.gradients;
            let dx = geometry.dx;

            for i in 0..3 {
                let g_i = g.column(i);
                for j in 0..3 {
                    let g_j = g.column(j);
                    let grad_dot = g_i.dot(&g_j);

                    // Viscous block: grad v : grad u, acting on each velocity
                    // component independently
                    output[(3 * i, 3 * j)] += dx * grad_dot;
                    output[(3 * i + 1, 3 * j + 1)] += dx * grad_dot;

                    // Pressure gradient: - (div v) p
                    output[(3 * i, 3 * j + 2)] -= dx * g_i[0] * phi[j];
                    output[(3 * i + 1, 3 * j + 2)] -= dx * g_i[1] * phi[j];

                    // Continuity: q (div u)
                    output[(3 * i + 2, 3 * j)] += dx * phi[i] * g_j[0];
                    output[(3 * i + 2, 3 * j + 1)] += dx * phi[i] * g_j[1];

                    // Pressure stabilization: delta grad q . grad p
                    output[(3 * i + 2, 3 * j + 2)] += dx * delta * grad_dot;
                }
            }
        }
        Ok(())
    }
}

/// Assembles the element right-hand sides
///
/// $$ L(v, q) = \int (v + \delta \nabla q) \cdot f \\; \mathrm{d}x $$
///
/// for a given body force $f$, with the same per-element $\delta$ as
/// [`StokesFlowAssembler`].
pub struct SourceTermAssembler<'a, T: Scalar, Source> {
    mesh: &'a TriangleMesh2d<T>,
    quadrature: QuadraturePair2d<T>,
    beta: T,
    source: &'a Source,
}

impl<'a, T: Scalar, Source> SourceTermAssembler<'a, T, Source> {
    pub fn new(mesh: &'a TriangleMesh2d<T>, quadrature: QuadraturePair2d<T>, beta: T, source: &'a Source) -> Self {
        Self {
            mesh,
            quadrature,
            beta,
            source,
        }
    }
}

impl<'a, T: Scalar, Source> ElementConnectivityAssembler for SourceTermAssembler<'a, T, Source> {
    fn solution_dim(&self) -> usize {
        DOFS_PER_NODE
    }

    fn num_elements(&self) -> usize {
        self.mesh.connectivity().len()
    }

    fn num_nodes(&self) -> usize {
        self.mesh.vertices().len()
    }

    fn element_node_count(&self, _element_index: usize) -> usize {
        3
    }

    fn populate_element_nodes(&self, output: &mut [usize], element_index: usize) {
        output.copy_from_slice(self.mesh.connectivity()[element_index].vertex_indices());
    }
}

impl<'a, T, Source> ElementVectorAssembler<T> for SourceTermAssembler<'a, T, Source>
where
    T: Real,
    Source: SourceFunction<T>,
{
    fn assemble_element_vector_into(&self, element_index: usize, mut output: DVectorViewMut<T>) -> eyre::Result<()> {
        let conn = self
            .mesh
            .connectivity()
            .get(element_index)
            .ok_or_else(|| eyre!("element index {} out of bounds", element_index))?;
        let element = conn
            .element(self.mesh.vertices())
            .ok_or_else(|| eyre!("element {} references out of bounds vertices", element_index))?;

        assert_eq!(output.len(), 9);
        output.fill(T::zero());

        let h = element.diameter();
        let delta = self.beta * h * h;

        let (weights, points) = &self.quadrature;
        for (&w, xi) in izip!(weights, points) {
            let geometry = element_geometry(&element, w, xi)?;
            let phi = element.evaluate_basis(xi);
            let g = &geometry.gradients;
            let dx = geometry.dx;

            let x = element.map_reference_coords(xi);
            let f = self.source.evaluate(&x);

            for i in 0..3 {
                output[3 * i] += dx * phi[i] * f[0];
                output[3 * i + 1] += dx * phi[i] * f[1];
                output[3 * i + 2] += dx * delta * g.column(i).dot(&f);
            }
        }
        Ok(())
    }
}
