//! Elementwise and structural operations on CSR matrices
//!
//! This module provides the small set of matrix-level operations the graph
//! engine is built from:
//!
//! - **Linear combination**: `sparse_add_csr` computes αA + βB with a
//!   two-pointer merge over sorted rows
//! - **Masking**: `positive_mask` extracts the unit-valued pattern of
//!   strictly positive entries (the adjacency of a weight matrix)
//! - **Asymmetry**: `asymmetry` computes Σ|A − Aᵗ|, the exact
//!   floating-point symmetry test
//!
//! # Examples
//!
//! ```
//! use grasp_sparse::{ops, CsrMatrix};
//! use scirs2_core::ndarray_ext::array;
//!
//! let a = CsrMatrix::from_dense(&array![[0.0, 2.0], [2.0, 0.0]].view());
//! assert_eq!(ops::asymmetry(&a).unwrap(), 0.0);
//! ```

use crate::csr::CsrMatrix;
use crate::error::{SparseError, SparseResult};
use scirs2_core::numeric::Float;

/// Sparse matrix linear combination: C = αA + βB
///
/// Merges the sorted rows of both operands in a single pass. Entries that
/// cancel to exactly zero are dropped from the result.
///
/// # Errors
///
/// Shape mismatch between the operands.
///
/// # Complexity
///
/// O(nnz_A + nnz_B)
///
/// # Examples
///
/// ```
/// use grasp_sparse::{ops::sparse_add_csr, CsrMatrix};
/// use scirs2_core::ndarray_ext::array;
///
/// let a = CsrMatrix::from_dense(&array![[1.0, 0.0], [0.0, 2.0]].view());
/// let b = CsrMatrix::from_dense(&array![[0.0, 3.0], [0.0, -2.0]].view());
///
/// let c = sparse_add_csr(&a, &b, 1.0, 1.0).unwrap();
/// assert_eq!(c.nnz(), 2); // the (1,1) entries cancelled
/// ```
pub fn sparse_add_csr<T: Float>(
    a: &CsrMatrix<T>,
    b: &CsrMatrix<T>,
    alpha: T,
    beta: T,
) -> SparseResult<CsrMatrix<T>> {
    if a.shape() != b.shape() {
        return Err(SparseError::shape_mismatch(a.shape(), b.shape()));
    }

    let (m, n) = a.shape();

    let mut row_ptr = Vec::with_capacity(m + 1);
    let mut col_indices = Vec::new();
    let mut values = Vec::new();

    row_ptr.push(0);

    for i in 0..m {
        let a_start = a.row_ptr()[i];
        let a_end = a.row_ptr()[i + 1];
        let b_start = b.row_ptr()[i];
        let b_end = b.row_ptr()[i + 1];

        let a_cols = &a.col_indices()[a_start..a_end];
        let a_vals = &a.values()[a_start..a_end];
        let b_cols = &b.col_indices()[b_start..b_end];
        let b_vals = &b.values()[b_start..b_end];

        // Merge the two sorted rows
        let mut ai = 0;
        let mut bi = 0;

        while ai < a_cols.len() || bi < b_cols.len() {
            let (col, val) = if ai < a_cols.len() && (bi >= b_cols.len() || a_cols[ai] < b_cols[bi])
            {
                let entry = (a_cols[ai], alpha * a_vals[ai]);
                ai += 1;
                entry
            } else if bi < b_cols.len() && (ai >= a_cols.len() || b_cols[bi] < a_cols[ai]) {
                let entry = (b_cols[bi], beta * b_vals[bi]);
                bi += 1;
                entry
            } else {
                let entry = (a_cols[ai], alpha * a_vals[ai] + beta * b_vals[bi]);
                ai += 1;
                bi += 1;
                entry
            };

            if val != T::zero() {
                col_indices.push(col);
                values.push(val);
            }
        }

        row_ptr.push(col_indices.len());
    }

    CsrMatrix::new(row_ptr, col_indices, values, (m, n)).map_err(SparseError::from)
}

/// Unit-valued mask of the strictly positive entries of a matrix
///
/// `positive_mask(W)[i,j] = 1` iff `W[i,j] > 0`. Stored zeros and negative
/// entries do not survive into the mask. This is the adjacency structure
/// of a weight matrix.
///
/// # Examples
///
/// ```
/// use grasp_sparse::{ops::positive_mask, CsrMatrix};
/// use scirs2_core::ndarray_ext::array;
///
/// let w = CsrMatrix::from_dense(&array![[0.0, 0.5], [-1.0, 0.0]].view());
/// let a = positive_mask(&w);
/// assert_eq!(a.nnz(), 1);
/// assert_eq!(a.get(0, 1), Some(1.0));
/// ```
pub fn positive_mask<T: Float>(a: &CsrMatrix<T>) -> CsrMatrix<T> {
    let (m, n) = a.shape();

    let mut row_ptr = Vec::with_capacity(m + 1);
    let mut col_indices = Vec::new();
    let mut values = Vec::new();

    row_ptr.push(0);
    for i in 0..m {
        for idx in a.row_ptr()[i]..a.row_ptr()[i + 1] {
            if a.values()[idx] > T::zero() {
                col_indices.push(a.col_indices()[idx]);
                values.push(T::one());
            }
        }
        row_ptr.push(col_indices.len());
    }

    // Rows inherit the source ordering, so reconstruction cannot fail
    CsrMatrix::new(row_ptr, col_indices, values, (m, n))
        .expect("mask of a valid CSR matrix is valid")
}

/// Total absolute asymmetry: Σ|A − Aᵗ|
///
/// Zero exactly when the matrix is symmetric in the strict floating-point
/// sense. No tolerance is applied; near-symmetric matrices produced by
/// numerical noise report as asymmetric.
///
/// # Errors
///
/// Shape mismatch when the matrix is not square.
pub fn asymmetry<T: Float>(a: &CsrMatrix<T>) -> SparseResult<T> {
    if !a.is_square() {
        return Err(SparseError::shape_mismatch(
            (a.nrows(), a.nrows()),
            a.shape(),
        ));
    }

    let at = a.transpose();
    let diff = sparse_add_csr(a, &at, T::one(), -T::one())?;
    Ok(diff
        .values()
        .iter()
        .fold(T::zero(), |acc, &v| acc + v.abs()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scirs2_core::ndarray_ext::array;

    #[test]
    fn test_sparse_add_disjoint_patterns() {
        let a = CsrMatrix::from_dense(&array![[1.0, 0.0], [0.0, 0.0]].view());
        let b = CsrMatrix::from_dense(&array![[0.0, 2.0], [0.0, 3.0]].view());
        let c = sparse_add_csr(&a, &b, 1.0, 1.0).unwrap();
        assert_eq!(c.to_dense(), array![[1.0, 2.0], [0.0, 3.0]]);
    }

    #[test]
    fn test_sparse_add_cancellation_drops_entries() {
        let a = CsrMatrix::from_dense(&array![[5.0, 1.0], [0.0, 0.0]].view());
        let c = sparse_add_csr(&a, &a, 1.0, -1.0).unwrap();
        assert_eq!(c.nnz(), 0);
    }

    #[test]
    fn test_sparse_add_shape_mismatch() {
        let a = CsrMatrix::<f64>::zeros((2, 2));
        let b = CsrMatrix::<f64>::zeros((3, 3));
        assert!(sparse_add_csr(&a, &b, 1.0, 1.0).is_err());
    }

    #[test]
    fn test_positive_mask_ignores_negatives() {
        let w = CsrMatrix::from_dense(&array![[0.0, 2.5, -1.0], [0.0, 0.0, 4.0]].view());
        let mask = positive_mask(&w);
        assert_eq!(mask.to_dense(), array![[0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
    }

    #[test]
    fn test_asymmetry_symmetric_is_zero() {
        let w = CsrMatrix::from_dense(&array![[0.0, 1.0], [1.0, 0.0]].view());
        assert_eq!(asymmetry(&w).unwrap(), 0.0);
    }

    #[test]
    fn test_asymmetry_directed_pair() {
        let w = CsrMatrix::from_dense(&array![[0.0, 1.0], [0.0, 0.0]].view());
        assert_eq!(asymmetry(&w).unwrap(), 2.0); // |1 - 0| on both sides
    }

    #[test]
    fn test_asymmetry_requires_square() {
        let w = CsrMatrix::<f64>::zeros((2, 3));
        assert!(asymmetry(&w).is_err());
    }
}
