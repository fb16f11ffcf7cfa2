//! Error types for the graph engine
//!
//! # Design
//!
//! - **`GraphError`**: Top-level enum covering all error cases
//! - Structural/shape problems are fatal to the call
//! - Numerical anomalies in weight matrices are warned, never rejected
//! - `Convergence` is recovered locally by the lmax estimator and never
//!   reaches a caller
//!
//! There is no retry logic anywhere in this crate; every operation is a
//! pure one-shot computation over its inputs.

use grasp_sparse::SparseError;
use thiserror::Error;

/// Top-level error type for graph operations
#[derive(Error, Debug)]
pub enum GraphError {
    /// A square matrix was required
    #[error("Expected square matrix, got {rows}×{cols}")]
    NotSquare { rows: usize, cols: usize },

    /// Dimension-mismatched input (coordinates, replacement weights, ...)
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    /// Unrecognized enum value (Laplacian kind, coordinate kind, ...)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Operation deliberately not implemented for this graph class
    #[error("Unsupported operation: {0}")]
    Unsupported(&'static str),

    /// Iterative eigensolver exhausted its budget
    #[error("Eigensolver did not converge within {iterations} iterations")]
    Convergence { iterations: usize },

    /// Malformed index set or assignment vector
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// Error from the sparse matrix substrate
    #[error("Sparse error: {0}")]
    Sparse(#[from] SparseError),
}

/// Result type alias for graph operations
pub type GraphResult<T> = Result<T, GraphError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_square_message() {
        let err = GraphError::NotSquare { rows: 2, cols: 3 };
        assert_eq!(err.to_string(), "Expected square matrix, got 2×3");
    }

    #[test]
    fn test_sparse_error_wraps() {
        let err: GraphError = SparseError::index_out_of_bounds(4, 2).into();
        assert!(matches!(err, GraphError::Sparse(_)));
    }
}
