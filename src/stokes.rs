//! High-level driver for the stabilized Stokes problem.
//!
//! [`StokesProblem`] runs the full pipeline of the classical benchmark setup:
//! assemble the stabilized bilinear form and right-hand side, apply Dirichlet
//! boundary conditions per marker tag, solve the linear system and split the
//! interleaved solution vector into nodal velocities and pressures.
use crate::assembly::global::{apply_dirichlet_bcs, CsrAssembler, SerialVectorAssembler};
use crate::assembly::local::{SourceTermAssembler, StokesFlowAssembler, DOFS_PER_NODE, PRESSURE_OFFSET};
use crate::boundary::DirichletBcs;
use crate::mesh::{FacetMarkers, TriangleMesh2d};
use crate::quadrature::triangle_quadrature_strength_2;
use crate::{solver, Real};
use eyre::{eyre, WrapErr};
use nalgebra::{convert, DVector, Point2, Vector2};
use nalgebra_sparse::CsrMatrix;

type VelocityFn<'a, T> = Box<dyn Fn(&Point2<T>) -> Vector2<T> + 'a>;
type PressureFn<'a, T> = Box<dyn Fn(&Point2<T>) -> T + 'a>;

/// A Stokes flow problem on a marked triangle mesh.
///
/// Boundary conditions are attached per marker tag with the `with_*` builder
/// methods; velocity conditions are applied in the order they were added, and a
/// dof prescribed twice keeps its first value (see [`DirichletBcs`]).
pub struct StokesProblem<'a, T: Real> {
    mesh: &'a TriangleMesh2d<T>,
    markers: &'a FacetMarkers,
    beta: T,
    velocity_bcs: Vec<(i32, VelocityFn<'a, T>)>,
    pressure_bcs: Vec<(i32, PressureFn<'a, T>)>,
    source: Option<VelocityFn<'a, T>>,
}

impl<'a, T: Real> StokesProblem<'a, T> {
    /// Creates a problem with the default stabilization constant `beta = 0.2`.
    pub fn new(mesh: &'a TriangleMesh2d<T>, markers: &'a FacetMarkers) -> Self {
        Self {
            mesh,
            markers,
            beta: convert(0.2),
            velocity_bcs: Vec::new(),
            pressure_bcs: Vec::new(),
            source: None,
        }
    }

    pub fn with_stabilization_constant(mut self, beta: T) -> Self {
        self.beta = beta;
        self
    }

    pub fn with_velocity_bc(mut self, tag: i32, velocity: impl Fn(&Point2<T>) -> Vector2<T> + 'a) -> Self {
        self.velocity_bcs.push((tag, Box::new(velocity)));
        self
    }

    pub fn with_pressure_bc(mut self, tag: i32, pressure: impl Fn(&Point2<T>) -> T + 'a) -> Self {
        self.pressure_bcs.push((tag, Box::new(pressure)));
        self
    }

    pub fn with_source(mut self, source: impl Fn(&Point2<T>) -> Vector2<T> + 'a) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Assembles the stabilized system matrix and right-hand side, without
    /// boundary conditions applied.
    pub fn assemble(&self) -> eyre::Result<(CsrMatrix<T>, DVector<T>)> {
        let quadrature = triangle_quadrature_strength_2();
        let matrix_assembler = CsrAssembler::default();
        let stokes_assembler = StokesFlowAssembler::new(self.mesh, quadrature, self.beta);
        let matrix = matrix_assembler
            .assemble(&stokes_assembler)
            .wrap_err("failed to assemble Stokes system matrix")?;

        let rhs = match &self.source {
            Some(source) => {
                let vector_assembler = SerialVectorAssembler::default();
                let source_assembler =
                    SourceTermAssembler::new(self.mesh, triangle_quadrature_strength_2(), self.beta, source);
                vector_assembler
                    .assemble_vector(&source_assembler)
                    .wrap_err("failed to assemble source term")?
            }
            None => DVector::zeros(matrix.nrows()),
        };

        Ok((matrix, rhs))
    }

    /// Collects all Dirichlet conditions of the problem.
    pub fn dirichlet_bcs(&self) -> DirichletBcs<T> {
        let mut bcs = DirichletBcs::new();
        for (tag, velocity) in &self.velocity_bcs {
            bcs.add_velocity_bcs(self.mesh, self.markers, *tag, velocity);
        }
        for (tag, pressure) in &self.pressure_bcs {
            bcs.add_pressure_bcs(self.mesh, self.markers, *tag, pressure);
        }
        bcs
    }

    /// Runs the full pipeline: assemble, apply boundary conditions, solve, split.
    pub fn solve(&self) -> eyre::Result<StokesSolution<T>> {
        let (mut matrix, mut rhs) = self.assemble()?;

        let bcs = self.dirichlet_bcs();
        if !bcs.constrains_pressure() {
            return Err(eyre!(
                "no pressure dof is constrained: the pressure is only determined up to a \
                 constant, so at least one pressure boundary condition is required"
            ));
        }
        apply_dirichlet_bcs(&mut matrix, &mut rhs, &bcs).wrap_err("failed to apply Dirichlet conditions")?;

        let solution = solver::solve_dense_lu(&matrix, &rhs).wrap_err("failed to solve Stokes system")?;
        Ok(StokesSolution::from_interleaved(&solution))
    }
}

/// Nodal velocities and pressures of a solved Stokes problem.
#[derive(Debug, Clone, PartialEq)]
pub struct StokesSolution<T: Real> {
    velocity: Vec<Vector2<T>>,
    pressure: Vec<T>,
}

impl<T: Real> StokesSolution<T> {
    /// Splits an interleaved solution vector (u_x, u_y, p per node) into nodal fields.
    pub fn from_interleaved(solution: &DVector<T>) -> Self {
        assert_eq!(
            solution.len() % DOFS_PER_NODE,
            0,
            "solution length must be a multiple of the dofs per node"
        );
        let num_nodes = solution.len() / DOFS_PER_NODE;
        let mut velocity = Vec::with_capacity(num_nodes);
        let mut pressure = Vec::with_capacity(num_nodes);
        for node in 0..num_nodes {
            velocity.push(Vector2::new(
                solution[DOFS_PER_NODE * node],
                solution[DOFS_PER_NODE * node + 1],
            ));
            pressure.push(solution[DOFS_PER_NODE * node + PRESSURE_OFFSET]);
        }
        Self { velocity, pressure }
    }

    pub fn velocity(&self) -> &[Vector2<T>] {
        &self.velocity
    }

    pub fn pressure(&self) -> &[T] {
        &self.pressure
    }
}
