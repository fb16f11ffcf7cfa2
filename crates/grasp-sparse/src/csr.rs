//! CSR (Compressed Sparse Row) format for 2D matrices
//!
//! CSR is optimized for row-wise operations and is the canonical storage
//! format for graph weight matrices in grasp.
//!
//! # Format
//!
//! For an m×n sparse matrix with nnz non-zeros:
//! - `row_ptr`: `Vec<usize>` of length m+1 - row_ptr\[i\] points to start of row i
//! - `col_indices`: `Vec<usize>` of length nnz - column index for each non-zero
//! - `values`: `Vec<T>` of length nnz - the non-zero values
//! - `shape`: (m, n) - dimensions of the matrix
//!
//! Column indices are kept sorted and duplicate-free within each row so
//! that merge-based operations can walk two rows with a single pass.
//! Zero-sized shapes are legal: a graph may have zero nodes.
//!
//! # Examples
//!
//! ```
//! use grasp_sparse::csr::CsrMatrix;
//!
//! // Create a 3×4 sparse matrix:
//! // [1.0  0   2.0  0  ]
//! // [0    3.0 0    0  ]
//! // [4.0  0   0    5.0]
//!
//! let row_ptr = vec![0, 2, 3, 5];  // Cumulative row starts
//! let col_indices = vec![0, 2, 1, 0, 3];
//! let values = vec![1.0, 2.0, 3.0, 4.0, 5.0];
//! let shape = (3, 4);
//!
//! let csr = CsrMatrix::new(row_ptr, col_indices, values, shape).unwrap();
//! assert_eq!(csr.nnz(), 5);
//! ```
//!
//! # SciRS2 Integration
//!
//! All dense interop uses `scirs2_core` types. Direct use of `ndarray` is forbidden.

use crate::error::{SparseError, SparseResult, ValidationError};
use scirs2_core::ndarray_ext::{Array1, Array2, ArrayView1, ArrayView2};
use scirs2_core::numeric::Float;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CsrError {
    #[error("Invalid row pointers: length {len} for {nrows} rows (expected {expected})")]
    InvalidRowPtr {
        len: usize,
        nrows: usize,
        expected: usize,
    },

    #[error("Row pointer not sorted at index {idx}: {curr} > {next}")]
    RowPtrNotSorted {
        idx: usize,
        curr: usize,
        next: usize,
    },

    #[error("Length mismatch: {col_indices} col_indices but {values} values")]
    LengthMismatch { col_indices: usize, values: usize },

    #[error("Column index out of bounds: {col_idx} >= {ncols}")]
    ColIndexOutOfBounds { col_idx: usize, ncols: usize },

    #[error("Row {row} has unsorted or duplicate column indices at position {pos}")]
    UnsortedRow { row: usize, pos: usize },
}

/// CSR (Compressed Sparse Row) matrix
///
/// Optimized for row-wise operations like SpMV (Sparse Matrix-Vector multiply)
/// and neighbor iteration during graph traversal.
#[derive(Debug, Clone)]
pub struct CsrMatrix<T> {
    /// Row pointers: row_ptr[i] = start index of row i in col_indices/values
    /// Length: nrows + 1, with row_ptr[nrows] = nnz
    row_ptr: Vec<usize>,

    /// Column indices for each non-zero element, sorted within each row
    col_indices: Vec<usize>,

    /// Values of non-zero elements
    values: Vec<T>,

    /// Shape: (nrows, ncols)
    shape: (usize, usize),
}

impl<T: Clone> CsrMatrix<T> {
    /// Create a new CSR matrix
    ///
    /// # Arguments
    ///
    /// * `row_ptr` - Row pointers (length nrows+1)
    /// * `col_indices` - Column indices for each non-zero
    /// * `values` - Values for each non-zero
    /// * `shape` - (nrows, ncols)
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - row_ptr length is incorrect
    /// - col_indices and values have different lengths
    /// - row_ptr is not monotonically increasing
    /// - any column index is out of bounds
    /// - any row has unsorted or duplicate column indices
    pub fn new(
        row_ptr: Vec<usize>,
        col_indices: Vec<usize>,
        values: Vec<T>,
        shape: (usize, usize),
    ) -> Result<Self, CsrError> {
        let (nrows, ncols) = shape;

        // Validate row_ptr length
        if row_ptr.len() != nrows + 1 {
            return Err(CsrError::InvalidRowPtr {
                len: row_ptr.len(),
                nrows,
                expected: nrows + 1,
            });
        }

        // Validate col_indices and values length
        if col_indices.len() != values.len() {
            return Err(CsrError::LengthMismatch {
                col_indices: col_indices.len(),
                values: values.len(),
            });
        }

        // Validate row_ptr is monotonically increasing
        for i in 0..nrows {
            if row_ptr[i] > row_ptr[i + 1] {
                return Err(CsrError::RowPtrNotSorted {
                    idx: i,
                    curr: row_ptr[i],
                    next: row_ptr[i + 1],
                });
            }
        }

        // Validate final row_ptr matches nnz
        let nnz = col_indices.len();
        if row_ptr[nrows] != nnz {
            return Err(CsrError::InvalidRowPtr {
                len: row_ptr[nrows],
                nrows,
                expected: nnz,
            });
        }

        // Validate column indices
        for &col_idx in &col_indices {
            if col_idx >= ncols {
                return Err(CsrError::ColIndexOutOfBounds { col_idx, ncols });
            }
        }

        // Validate per-row ordering: strictly increasing columns
        for i in 0..nrows {
            let row = &col_indices[row_ptr[i]..row_ptr[i + 1]];
            for (pos, w) in row.windows(2).enumerate() {
                if w[0] >= w[1] {
                    return Err(CsrError::UnsortedRow { row: i, pos });
                }
            }
        }

        Ok(Self {
            row_ptr,
            col_indices,
            values,
            shape,
        })
    }

    /// Create an empty CSR matrix with given shape
    pub fn zeros(shape: (usize, usize)) -> Self {
        let (nrows, _ncols) = shape;
        Self {
            row_ptr: vec![0; nrows + 1],
            col_indices: Vec::new(),
            values: Vec::new(),
            shape,
        }
    }

    /// Number of non-zero elements
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Shape of the matrix (nrows, ncols)
    pub fn shape(&self) -> (usize, usize) {
        self.shape
    }

    /// Number of rows
    pub fn nrows(&self) -> usize {
        self.shape.0
    }

    /// Number of columns
    pub fn ncols(&self) -> usize {
        self.shape.1
    }

    /// Whether the matrix is square
    pub fn is_square(&self) -> bool {
        self.shape.0 == self.shape.1
    }

    /// Get row pointers
    pub fn row_ptr(&self) -> &[usize] {
        &self.row_ptr
    }

    /// Get column indices
    pub fn col_indices(&self) -> &[usize] {
        &self.col_indices
    }

    /// Get values
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Compute density (nnz / total_elements)
    pub fn density(&self) -> f64 {
        let total = self.nrows() * self.ncols();
        if total == 0 {
            return 0.0;
        }
        self.nnz() as f64 / total as f64
    }

    /// Get a row as (col_indices, values) slices
    pub fn row(&self, i: usize) -> Option<(&[usize], &[T])> {
        if i >= self.nrows() {
            return None;
        }

        let start = self.row_ptr[i];
        let end = self.row_ptr[i + 1];

        Some((&self.col_indices[start..end], &self.values[start..end]))
    }
}

impl<T: Float> CsrMatrix<T> {
    /// Build from COO-style triplets, summing duplicate entries
    ///
    /// Entries may arrive in any order; they are sorted lexicographically
    /// by (row, column) and coincident entries are accumulated, so the
    /// same edge listed twice ends up with the summed weight.
    ///
    /// # Errors
    ///
    /// - `ValidationError::LengthMismatch` if the slices disagree in length
    /// - `IndexError::OutOfBounds` if any coordinate exceeds the shape
    ///
    /// # Examples
    ///
    /// ```
    /// use grasp_sparse::csr::CsrMatrix;
    ///
    /// let m = CsrMatrix::from_triplets(
    ///     &[0, 1, 0],
    ///     &[1, 0, 1],
    ///     &[2.0, 3.0, 1.0],
    ///     (2, 2),
    /// ).unwrap();
    ///
    /// assert_eq!(m.nnz(), 2);
    /// assert_eq!(m.get(0, 1), Some(3.0)); // 2.0 + 1.0 accumulated
    /// ```
    pub fn from_triplets(
        rows: &[usize],
        cols: &[usize],
        values: &[T],
        shape: (usize, usize),
    ) -> SparseResult<Self> {
        if rows.len() != cols.len() || rows.len() != values.len() {
            return Err(SparseError::Validation(ValidationError::LengthMismatch {
                indices: rows.len().min(cols.len()),
                values: values.len(),
            }));
        }

        let (nrows, ncols) = shape;
        for &r in rows {
            if r >= nrows {
                return Err(SparseError::index_out_of_bounds(r, nrows));
            }
        }
        for &c in cols {
            if c >= ncols {
                return Err(SparseError::index_out_of_bounds(c, ncols));
            }
        }

        let mut order: Vec<usize> = (0..rows.len()).collect();
        order.sort_by_key(|&k| (rows[k], cols[k]));

        let mut row_ptr = vec![0usize; nrows + 1];
        let mut col_indices = Vec::with_capacity(rows.len());
        let mut out_values: Vec<T> = Vec::with_capacity(rows.len());

        for &k in &order {
            let (r, c, v) = (rows[k], cols[k], values[k]);
            if let (Some(&last_c), Some(last_v)) = (col_indices.last(), out_values.last_mut()) {
                // row_ptr[r + 1] already counts entries for rows <= r
                if row_ptr[r + 1] == col_indices.len() && last_c == c {
                    *last_v = *last_v + v;
                    continue;
                }
            }
            col_indices.push(c);
            out_values.push(v);
            row_ptr[r + 1] = col_indices.len();
        }

        // Forward-fill the cumulative counts for empty rows
        for i in 0..nrows {
            if row_ptr[i + 1] < row_ptr[i] {
                row_ptr[i + 1] = row_ptr[i];
            }
        }

        Ok(Self {
            row_ptr,
            col_indices,
            values: out_values,
            shape,
        })
    }

    /// Create CSR from a dense matrix view, storing entries that are exactly non-zero
    pub fn from_dense(dense: &ArrayView2<T>) -> Self {
        let (nrows, ncols) = dense.dim();

        let mut row_ptr = Vec::with_capacity(nrows + 1);
        let mut col_indices = Vec::new();
        let mut values = Vec::new();

        row_ptr.push(0);
        for i in 0..nrows {
            for j in 0..ncols {
                let v = dense[[i, j]];
                if v != T::zero() {
                    col_indices.push(j);
                    values.push(v);
                }
            }
            row_ptr.push(col_indices.len());
        }

        Self {
            row_ptr,
            col_indices,
            values,
            shape: (nrows, ncols),
        }
    }

    /// Convert to a dense matrix
    pub fn to_dense(&self) -> Array2<T> {
        let (nrows, ncols) = self.shape;
        let mut out = Array2::zeros((nrows, ncols));

        for i in 0..nrows {
            for idx in self.row_ptr[i]..self.row_ptr[i + 1] {
                out[[i, self.col_indices[idx]]] = self.values[idx];
            }
        }

        out
    }

    /// Look up a single entry
    ///
    /// Returns `None` when the coordinates are out of bounds, and the
    /// stored value (or zero) otherwise.
    pub fn get(&self, i: usize, j: usize) -> Option<T> {
        if i >= self.nrows() || j >= self.ncols() {
            return None;
        }

        let start = self.row_ptr[i];
        let end = self.row_ptr[i + 1];
        match self.col_indices[start..end].binary_search(&j) {
            Ok(pos) => Some(self.values[start + pos]),
            Err(_) => Some(T::zero()),
        }
    }

    /// Transpose via a counting pass
    ///
    /// # Complexity
    ///
    /// O(nnz + ncols) time and space. Rows of the result come out sorted
    /// because the source is traversed in row-major order.
    pub fn transpose(&self) -> Self {
        let (m, n) = self.shape;
        let nnz = self.nnz();

        let mut row_ptr = vec![0usize; n + 1];
        for &c in &self.col_indices {
            row_ptr[c + 1] += 1;
        }
        for i in 0..n {
            row_ptr[i + 1] += row_ptr[i];
        }

        let mut col_indices = vec![0usize; nnz];
        let mut values = vec![T::zero(); nnz];
        let mut next = row_ptr[..n].to_vec();

        for i in 0..m {
            for idx in self.row_ptr[i]..self.row_ptr[i + 1] {
                let j = self.col_indices[idx];
                let pos = next[j];
                col_indices[pos] = i;
                values[pos] = self.values[idx];
                next[j] += 1;
            }
        }

        Self {
            row_ptr,
            col_indices,
            values,
            shape: (n, m),
        }
    }

    /// Sparse Matrix-Vector product: y = A * x
    ///
    /// # Errors
    ///
    /// Returns `ShapeMismatchError::MatVec` if x.len() != ncols
    ///
    /// # Complexity
    ///
    /// O(nnz) - linear in number of non-zeros
    ///
    /// # Examples
    ///
    /// ```
    /// use grasp_sparse::csr::CsrMatrix;
    /// use scirs2_core::ndarray_ext::array;
    ///
    /// // Matrix: [1 0 2]
    /// //         [0 3 0]
    /// let row_ptr = vec![0, 2, 3];
    /// let col_indices = vec![0, 2, 1];
    /// let values = vec![1.0, 2.0, 3.0];
    /// let csr = CsrMatrix::new(row_ptr, col_indices, values, (2, 3)).unwrap();
    ///
    /// let x = array![1.0, 2.0, 3.0];
    /// let y = csr.spmv(&x.view()).unwrap();
    /// assert_eq!(y[0], 7.0);  // 1*1 + 2*3
    /// assert_eq!(y[1], 6.0);  // 3*2
    /// ```
    pub fn spmv(&self, x: &ArrayView1<T>) -> SparseResult<Array1<T>> {
        if x.len() != self.ncols() {
            return Err(SparseError::ShapeMismatch(
                crate::error::ShapeMismatchError::MatVec {
                    m: self.nrows(),
                    n: self.ncols(),
                    v: x.len(),
                },
            ));
        }

        let mut y = Array1::<T>::zeros(self.nrows());

        for row in 0..self.nrows() {
            let start = self.row_ptr[row];
            let end = self.row_ptr[row + 1];

            let mut sum = T::zero();
            for idx in start..end {
                sum = sum + self.values[idx] * x[self.col_indices[idx]];
            }
            y[row] = sum;
        }

        Ok(y)
    }

    /// Per-row sums (length nrows)
    pub fn row_sums(&self) -> Array1<T> {
        let mut out = Array1::zeros(self.nrows());
        for i in 0..self.nrows() {
            let mut sum = T::zero();
            for idx in self.row_ptr[i]..self.row_ptr[i + 1] {
                sum = sum + self.values[idx];
            }
            out[i] = sum;
        }
        out
    }

    /// Per-column sums (length ncols)
    pub fn col_sums(&self) -> Array1<T> {
        let mut out = Array1::zeros(self.ncols());
        for idx in 0..self.nnz() {
            let j = self.col_indices[idx];
            out[j] = out[j] + self.values[idx];
        }
        out
    }

    /// Main diagonal (length min(nrows, ncols))
    pub fn diagonal(&self) -> Array1<T> {
        let n = self.nrows().min(self.ncols());
        let mut out = Array1::zeros(n);
        for (i, out_i) in out.iter_mut().enumerate() {
            let start = self.row_ptr[i];
            let end = self.row_ptr[i + 1];
            if let Ok(pos) = self.col_indices[start..end].binary_search(&i) {
                *out_i = self.values[start + pos];
            }
        }
        out
    }

    /// Submatrix by row and column index selection
    ///
    /// The selections need not be sorted; output rows follow the order of
    /// `rows` and output columns the order of `cols`, so `select` doubles
    /// as a simultaneous permutation.
    ///
    /// # Errors
    ///
    /// `IndexError::OutOfBounds` for any index outside the matrix.
    ///
    /// # Examples
    ///
    /// ```
    /// use grasp_sparse::csr::CsrMatrix;
    /// use scirs2_core::ndarray_ext::array;
    ///
    /// let dense = array![[0.0, 1.0, 2.0], [3.0, 0.0, 4.0], [5.0, 6.0, 0.0]];
    /// let m = CsrMatrix::from_dense(&dense.view());
    ///
    /// let sub = m.select(&[0, 2], &[0, 2]).unwrap();
    /// assert_eq!(sub.shape(), (2, 2));
    /// assert_eq!(sub.get(0, 1), Some(2.0));
    /// assert_eq!(sub.get(1, 0), Some(5.0));
    /// ```
    pub fn select(&self, rows: &[usize], cols: &[usize]) -> SparseResult<Self> {
        for &r in rows {
            if r >= self.nrows() {
                return Err(SparseError::index_out_of_bounds(r, self.nrows()));
            }
        }
        for &c in cols {
            if c >= self.ncols() {
                return Err(SparseError::index_out_of_bounds(c, self.ncols()));
            }
        }

        let mut col_map: Vec<Option<usize>> = vec![None; self.ncols()];
        for (new, &old) in cols.iter().enumerate() {
            col_map[old] = Some(new);
        }

        let mut row_ptr = Vec::with_capacity(rows.len() + 1);
        let mut col_indices = Vec::new();
        let mut values = Vec::new();
        let mut scratch: Vec<(usize, T)> = Vec::new();

        row_ptr.push(0);
        for &r in rows {
            scratch.clear();
            for idx in self.row_ptr[r]..self.row_ptr[r + 1] {
                if let Some(new_c) = col_map[self.col_indices[idx]] {
                    scratch.push((new_c, self.values[idx]));
                }
            }
            scratch.sort_by_key(|&(c, _)| c);
            for &(c, v) in &scratch {
                col_indices.push(c);
                values.push(v);
            }
            row_ptr.push(col_indices.len());
        }

        Ok(Self {
            row_ptr,
            col_indices,
            values,
            shape: (rows.len(), cols.len()),
        })
    }
}
