//! Mesh import and result export.
pub mod msh;
pub mod vtk;
