//! `stokeslet` solves the Stokes equations (slow, incompressible viscous flow)
//! in two dimensions with a stabilized equal-order mixed finite element method.
//!
//! Velocity and pressure are both discretized with piecewise linear basis functions
//! on triangles. Since the P1-P1 pair is not inf-sup stable, the bilinear form carries
//! a pressure stabilization term weighted by $\delta = \beta h^2$, where $h$ is the
//! local cell size:
//!
//! $$ a(u, p; v, q) = \int \nabla v : \nabla u - (\nabla \cdot v) \\, p
//!    + q \\, (\nabla \cdot u) + \delta \\, \nabla q \cdot \nabla p \\; \mathrm{d}x $$
//!
//! with the matching right-hand side $L(v, q) = \int (v + \delta \nabla q) \cdot f \\; \mathrm{d}x$.
//!
//! The crate provides the full pipeline of a typical Stokes benchmark: mesh import
//! ([`io::msh`]) or procedural generation ([`mesh::procedural`]), boundary markers
//! ([`mesh::FacetMarkers`]), Dirichlet boundary conditions ([`boundary`]), matrix and
//! vector assembly ([`assembly`]), a linear solve ([`solver`]) and VTK export
//! ([`io::vtk`]). The [`stokes::StokesProblem`] driver ties these together.
use nalgebra::RealField;

pub mod assembly;
pub mod boundary;
pub mod connectivity;
pub mod element;
pub mod error;
pub mod io;
pub mod mesh;
pub mod quadrature;
pub mod solver;
pub mod stokes;

pub extern crate nalgebra;
pub extern crate nalgebra_sparse;
pub extern crate vtkio;

/// Trait alias for scalar types accepted by the solver routines.
pub trait Real: RealField + Copy {}

impl<T: RealField + Copy> Real for T {}
