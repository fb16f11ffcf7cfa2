//! Unified error types for sparse matrix operations
//!
//! This module provides a centralized error handling system for the sparse
//! matrix substrate of grasp.
//!
//! # Design
//!
//! - **`SparseError`**: Top-level enum covering all error cases
//! - **Format errors**: CSR construction and validation
//! - **Operation errors**: SpMV, elementwise merges, eigensolvers
//!
//! # Examples
//!
//! ```
//! use grasp_sparse::error::{SparseError, ValidationError};
//!
//! fn validate_lengths(rows: &[usize], values: &[f64]) -> Result<(), SparseError> {
//!     if rows.len() != values.len() {
//!         return Err(SparseError::Validation(ValidationError::LengthMismatch {
//!             indices: rows.len(),
//!             values: values.len(),
//!         }));
//!     }
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Top-level error type for all sparse matrix operations
#[derive(Error, Debug)]
pub enum SparseError {
    /// Validation errors (shape, indices, values)
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Shape mismatch errors
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(#[from] ShapeMismatchError),

    /// Sparse operation errors
    #[error("Operation error: {0}")]
    Operation(#[from] OperationError),

    /// Index errors
    #[error("Index error: {0}")]
    Index(#[from] IndexError),

    /// CSR format errors
    #[error("CSR error: {0}")]
    Csr(#[from] crate::csr::CsrError),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

/// Validation errors for matrix properties
#[derive(Error, Debug, Clone)]
pub enum ValidationError {
    #[error("Indices and values must have same length: {indices} indices vs {values} values")]
    LengthMismatch { indices: usize, values: usize },
}

/// Shape mismatch errors for matrix operations
#[derive(Error, Debug, Clone)]
pub enum ShapeMismatchError {
    #[error("Matrix-vector multiplication dimension mismatch: ({m}×{n}) × ({v},)")]
    MatVec { m: usize, n: usize, v: usize },

    #[error("Matrix shape mismatch: expected {expected:?}, got {got:?}")]
    Matrix {
        expected: (usize, usize),
        got: (usize, usize),
    },
}

/// Sparse operation errors
#[derive(Error, Debug, Clone)]
pub enum OperationError {
    #[error("Operation failed: {reason}")]
    Failed { reason: String },
}

/// Index errors
#[derive(Error, Debug, Clone)]
pub enum IndexError {
    #[error("Index out of bounds: index {index} exceeds dimension {bound}")]
    OutOfBounds { index: usize, bound: usize },
}

/// Result type alias for sparse matrix operations
pub type SparseResult<T> = Result<T, SparseError>;

// Convenience constructors for common error patterns
impl SparseError {
    /// Create an index out of bounds error
    pub fn index_out_of_bounds(index: usize, bound: usize) -> Self {
        SparseError::Index(IndexError::OutOfBounds { index, bound })
    }

    /// Create a validation error with a message
    pub fn validation(msg: &str) -> Self {
        SparseError::Other(msg.to_string())
    }

    /// Create a shape mismatch error
    pub fn shape_mismatch(expected: (usize, usize), got: (usize, usize)) -> Self {
        SparseError::ShapeMismatch(ShapeMismatchError::Matrix { expected, got })
    }

    /// Create an operation error with a message
    pub fn operation(msg: &str) -> Self {
        SparseError::Operation(OperationError::Failed {
            reason: msg.to_string(),
        })
    }
}
