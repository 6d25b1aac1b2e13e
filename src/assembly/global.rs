//! Global assembly into sparse matrices and vectors, and Dirichlet boundary
//! condition application.
use crate::assembly::local::{ElementConnectivityAssembler, ElementMatrixAssembler, ElementVectorAssembler};
use crate::boundary::DirichletBcs;
use crate::Real;
use eyre::eyre;
use log::debug;
use nalgebra::{DMatrix, DVector, Scalar};
use nalgebra_sparse::pattern::SparsityPattern;
use nalgebra_sparse::CsrMatrix;
use std::cell::RefCell;
use std::collections::BTreeSet;

/// An assembler for CSR matrices.
#[derive(Debug, Clone)]
pub struct CsrAssembler<T: Scalar> {
    // All members are buffers that help prevent unnecessary allocations
    // when assembling multiple matrices with the same assembler
    workspace: RefCell<CsrAssemblerWorkspace<T>>,
}

impl<T: Scalar> Default for CsrAssembler<T> {
    fn default() -> Self {
        Self {
            workspace: RefCell::new(CsrAssemblerWorkspace::default()),
        }
    }
}

#[derive(Debug, Clone)]
struct CsrAssemblerWorkspace<T: Scalar> {
    element_global_nodes: Vec<usize>,
    element_matrix: DMatrix<T>,
}

impl<T: Scalar> Default for CsrAssemblerWorkspace<T> {
    fn default() -> Self {
        Self {
            element_global_nodes: Vec::new(),
            element_matrix: DMatrix::from_row_slice(0, 0, &[]),
        }
    }
}

impl<T: Scalar> CsrAssembler<T> {
    /// Builds the sparsity pattern induced by the element connectivity: the union of
    /// all couplings between degrees of freedom that share an element.
    pub fn assemble_pattern(&self, element_assembler: &dyn ElementConnectivityAssembler) -> SparsityPattern {
        // Here we optimize for memory usage rather than performance: by collecting into a
        // BTreeSet we store each matrix entry exactly once. Depending on the mesh there
        // may be a relatively large number of duplicate entries which would otherwise
        // need to be combined.
        let sdim = element_assembler.solution_dim();
        let mut matrix_entries = BTreeSet::new();
        let mut element_global_nodes = Vec::new();
        for i in 0..element_assembler.num_elements() {
            let element_node_count = element_assembler.element_node_count(i);
            element_global_nodes.resize(element_node_count, usize::MAX);
            element_assembler.populate_element_nodes(&mut element_global_nodes, i);

            for node_i in &element_global_nodes {
                for node_j in &element_global_nodes {
                    for s_i in 0..sdim {
                        for s_j in 0..sdim {
                            let idx_i = sdim * node_i + s_i;
                            let idx_j = sdim * node_j + s_j;
                            matrix_entries.insert((idx_i, idx_j));
                        }
                    }
                }
            }
        }

        let num_rows = sdim * element_assembler.num_nodes();
        let mut offsets = Vec::with_capacity(num_rows + 1);
        let mut column_indices = Vec::with_capacity(matrix_entries.len());

        offsets.push(0);
        for (i, j) in matrix_entries {
            while i + 1 > offsets.len() {
                // We have reached a new row. This runs in a while loop to correctly
                // handle consecutive empty rows
                offsets.push(column_indices.len());
            }
            column_indices.push(j);
        }

        // Fill out the remaining offsets if the last rows are empty
        while offsets.len() < (num_rows + 1) {
            offsets.push(column_indices.len());
        }

        SparsityPattern::try_from_offsets_and_indices(num_rows, num_rows, offsets, column_indices)
            .expect("Pattern data must be valid by construction")
    }
}

impl<T: Real> CsrAssembler<T> {
    pub fn assemble(&self, element_assembler: &dyn ElementMatrixAssembler<T>) -> eyre::Result<CsrMatrix<T>> {
        let pattern = self.assemble_pattern(element_assembler);
        let initial_matrix_values = vec![T::zero(); pattern.nnz()];
        let mut matrix = CsrMatrix::try_from_pattern_and_values(pattern, initial_matrix_values)
            .expect("CSR data must be valid by definition");
        self.assemble_into_csr(&mut matrix, element_assembler)?;
        Ok(matrix)
    }

    /// Assembles into a CSR matrix whose sparsity pattern already contains all
    /// couplings produced by the element assembler, adding to existing values.
    pub fn assemble_into_csr(
        &self,
        csr: &mut CsrMatrix<T>,
        element_assembler: &dyn ElementMatrixAssembler<T>,
    ) -> eyre::Result<()> {
        // Reuse previously allocated buffers
        let ws = &mut *self.workspace.borrow_mut();
        let sdim = element_assembler.solution_dim();
        debug!(
            "assembling {} elements into {}x{} CSR matrix",
            element_assembler.num_elements(),
            csr.nrows(),
            csr.ncols()
        );

        for i in 0..element_assembler.num_elements() {
            let element_node_count = element_assembler.element_node_count(i);
            let element_matrix_dim = sdim * element_node_count;

            ws.element_global_nodes.resize(element_node_count, 0);
            ws.element_matrix
                .resize_mut(element_matrix_dim, element_matrix_dim, T::zero());
            ws.element_matrix.fill(T::zero());

            element_assembler.assemble_element_matrix_into(i, (&mut ws.element_matrix).into())?;
            element_assembler.populate_element_nodes(&mut ws.element_global_nodes, i);

            for (local_node, &global_node) in ws.element_global_nodes.iter().enumerate() {
                for s in 0..sdim {
                    let local_row = sdim * local_node + s;
                    let global_row = sdim * global_node + s;
                    let mut row = csr.row_mut(global_row);
                    let (cols, values) = row.cols_and_values_mut();
                    for (local_col_node, &global_col_node) in ws.element_global_nodes.iter().enumerate() {
                        for t in 0..sdim {
                            let local_col = sdim * local_col_node + t;
                            let global_col = sdim * global_col_node + t;
                            let pos = cols.binary_search(&global_col).map_err(|_| {
                                eyre!("sparsity pattern is missing entry ({}, {})", global_row, global_col)
                            })?;
                            values[pos] += ws.element_matrix[(local_row, local_col)];
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

/// A serial assembler for global vectors.
#[derive(Debug, Clone)]
pub struct SerialVectorAssembler<T: Scalar> {
    workspace: RefCell<DVector<T>>,
}

impl<T: Scalar> Default for SerialVectorAssembler<T> {
    fn default() -> Self {
        Self {
            workspace: RefCell::new(DVector::from_vec(Vec::new())),
        }
    }
}

impl<T: Real> SerialVectorAssembler<T> {
    pub fn assemble_vector(&self, element_assembler: &dyn ElementVectorAssembler<T>) -> eyre::Result<DVector<T>> {
        let sdim = element_assembler.solution_dim();
        let mut vector = DVector::zeros(sdim * element_assembler.num_nodes());
        let element_vector = &mut *self.workspace.borrow_mut();
        let mut element_global_nodes = Vec::new();

        for i in 0..element_assembler.num_elements() {
            let element_node_count = element_assembler.element_node_count(i);
            element_vector.resize_vertically_mut(sdim * element_node_count, T::zero());
            element_vector.fill(T::zero());
            element_global_nodes.resize(element_node_count, 0);

            element_assembler.assemble_element_vector_into(i, (&mut *element_vector).into())?;
            element_assembler.populate_element_nodes(&mut element_global_nodes, i);

            for (local_node, &global_node) in element_global_nodes.iter().enumerate() {
                for s in 0..sdim {
                    vector[sdim * global_node + s] += element_vector[sdim * local_node + s];
                }
            }
        }
        Ok(vector)
    }
}

/// Applies Dirichlet conditions to an assembled system by row elimination.
///
/// Each constrained row is zeroed, its diagonal entry set to a representative scale
/// and the right-hand side entry set to `scale * value`. The scale is taken from the
/// first nonzero diagonal entry of the matrix; simply setting 1 would ignore the
/// scaling of the matrix entries, leading to potentially poor condition numbers.
pub fn apply_dirichlet_bcs<T>(matrix: &mut CsrMatrix<T>, rhs: &mut DVector<T>, bcs: &DirichletBcs<T>) -> eyre::Result<()>
where
    T: Real,
{
    if matrix.nrows() != rhs.len() {
        return Err(eyre!(
            "matrix has {} rows but right-hand side has {} entries",
            matrix.nrows(),
            rhs.len()
        ));
    }

    let mut scale = T::one();
    for i in 0..matrix.nrows() {
        let row = matrix.row(i);
        if let Ok(pos) = row.col_indices().binary_search(&i) {
            let diagonal_entry = row.values()[pos];
            if diagonal_entry != T::zero() {
                scale = diagonal_entry.abs();
                break;
            }
        }
    }

    for (dof, value) in bcs.iter() {
        if dof >= matrix.nrows() {
            return Err(eyre!("Dirichlet dof {} out of bounds for system of size {}", dof, matrix.nrows()));
        }
        let mut row = matrix.row_mut(dof);
        let (cols, values) = row.cols_and_values_mut();
        let diagonal = cols
            .binary_search(&dof)
            .map_err(|_| eyre!("matrix has no diagonal entry for Dirichlet dof {}", dof))?;
        values.fill(T::zero());
        values[diagonal] = scale;
        rhs[dof] = scale * value;
    }
    Ok(())
}
