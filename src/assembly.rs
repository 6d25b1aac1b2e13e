//! Assembly of the stabilized Stokes system.
//!
//! The [`local`] module contains element-wise kernels that produce small dense
//! element matrices and vectors, while [`global`] scatters those into the global
//! sparse matrix and right-hand side.
pub mod global;
pub mod local;
