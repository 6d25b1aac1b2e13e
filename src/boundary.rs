//! Dirichlet boundary conditions for the mixed velocity/pressure system.
use crate::assembly::local::{DOFS_PER_NODE, PRESSURE_OFFSET};
use crate::mesh::{FacetMarkers, TriangleMesh2d};
use crate::Real;
use fxhash::FxHashSet;
use nalgebra::{Point2, Scalar, Vector2};

/// An ordered collection of prescribed degrees of freedom.
///
/// Insertion follows a first-wins convention: if the same dof is prescribed twice,
/// the earlier prescription is kept. This matches the usual benchmark setup where
/// the no-slip condition is applied before the inflow condition, so nodes shared
/// between a wall facet and an inflow facet stay at the wall value.
#[derive(Debug, Clone)]
pub struct DirichletBcs<T: Scalar> {
    dofs: Vec<usize>,
    values: Vec<T>,
    prescribed: FxHashSet<usize>,
}

impl<T: Scalar> Default for DirichletBcs<T> {
    fn default() -> Self {
        Self {
            dofs: Vec::new(),
            values: Vec::new(),
            prescribed: FxHashSet::default(),
        }
    }
}

impl<T: Real> DirichletBcs<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prescribes a single dof. Returns whether the prescription was inserted
    /// (false if the dof was already prescribed).
    pub fn push(&mut self, dof: usize, value: T) -> bool {
        if self.prescribed.insert(dof) {
            self.dofs.push(dof);
            self.values.push(value);
            true
        } else {
            false
        }
    }

    /// Prescribes both velocity components on all nodes of facets with the given
    /// marker tag, with values given by a function of the node position.
    pub fn add_velocity_bcs(
        &mut self,
        mesh: &TriangleMesh2d<T>,
        markers: &FacetMarkers,
        tag: i32,
        velocity: impl Fn(&Point2<T>) -> Vector2<T>,
    ) {
        for node in markers.nodes_with_tag(tag) {
            let x = &mesh.vertices()[node];
            let u = velocity(x);
            self.push(DOFS_PER_NODE * node, u.x);
            self.push(DOFS_PER_NODE * node + 1, u.y);
        }
    }

    /// Prescribes the pressure on all nodes of facets with the given marker tag.
    pub fn add_pressure_bcs(
        &mut self,
        mesh: &TriangleMesh2d<T>,
        markers: &FacetMarkers,
        tag: i32,
        pressure: impl Fn(&Point2<T>) -> T,
    ) {
        for node in markers.nodes_with_tag(tag) {
            let x = &mesh.vertices()[node];
            self.push(DOFS_PER_NODE * node + PRESSURE_OFFSET, pressure(x));
        }
    }

    pub fn len(&self) -> usize {
        self.dofs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dofs.is_empty()
    }

    pub fn dofs(&self) -> &[usize] {
        &self.dofs
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, T)> + '_ {
        self.dofs.iter().copied().zip(self.values.iter().copied())
    }

    /// Whether any pressure dof is prescribed.
    ///
    /// With Dirichlet velocities on the whole boundary the pressure is only
    /// determined up to a constant; the stabilization term does not remove that
    /// nullspace, so a well-posed system needs at least one prescribed pressure dof.
    pub fn constrains_pressure(&self) -> bool {
        self.dofs.iter().any(|dof| dof % DOFS_PER_NODE == PRESSURE_OFFSET)
    }
}
