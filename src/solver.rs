//! Linear solution of the assembled saddle-point system.
use crate::Real;
use eyre::eyre;
use log::debug;
use nalgebra::DVector;
use nalgebra_sparse::convert::serial::convert_csr_dense;
use nalgebra_sparse::CsrMatrix;

/// Solves the assembled system with a dense LU factorization.
///
/// The stabilized Stokes matrix is nonsymmetric and indefinite, so a Cholesky
/// factorization is not applicable. At the mesh sizes this crate targets a dense
/// factorization is perfectly adequate; a sparse direct solver is out of scope.
pub fn solve_dense_lu<T>(matrix: &CsrMatrix<T>, rhs: &DVector<T>) -> eyre::Result<DVector<T>>
where
    T: Real,
{
    if matrix.nrows() != matrix.ncols() {
        return Err(eyre!("matrix is not square: {} x {}", matrix.nrows(), matrix.ncols()));
    }
    if matrix.nrows() != rhs.len() {
        return Err(eyre!(
            "dimension mismatch: matrix has {} rows, right-hand side has {} entries",
            matrix.nrows(),
            rhs.len()
        ));
    }

    debug!(
        "factorizing {} x {} system with {} explicit nonzeros",
        matrix.nrows(),
        matrix.ncols(),
        matrix.nnz()
    );

    let dense = convert_csr_dense(matrix);
    dense
        .lu()
        .solve(rhs)
        .ok_or_else(|| eyre!("linear system is singular"))
}
