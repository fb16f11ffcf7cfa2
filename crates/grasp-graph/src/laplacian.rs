//! Graph Laplacian construction
//!
//! Two kinds are supported, with the formula branching on directedness:
//!
//! - Undirected combinatorial: `L = D − W` with `D = diag(rowSum(W))`
//! - Undirected normalized: `L = I − D^{-1/2} W D^{-1/2}`
//! - Directed combinatorial: `L = ½(D_out + D_in − W − Wᵗ)`, a symmetrized
//!   Laplacian over the directed structure, with `D_out = diag(colSum(W))`
//!   and `D_in = diag(rowSum(W))`
//! - Directed normalized: unsupported
//!
//! For the normalized kind, a zero-degree vertex makes `d^{-1/2}` infinite.
//! This is a known numerical edge and is deliberately not patched: an
//! isolated vertex stores no off-diagonal entries, so the infinity never
//! meets a stored value and the vertex's Laplacian row reduces to the
//! identity row.

use crate::error::{GraphError, GraphResult};
use crate::graph::Graph;
use grasp_sparse::CsrMatrix;
use std::fmt;
use std::str::FromStr;

/// The kind of graph Laplacian to compute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaplacianKind {
    /// `L = D − W` (default)
    Combinatorial,
    /// `L = I − D^{-1/2} W D^{-1/2}`
    Normalized,
}

impl fmt::Display for LaplacianKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaplacianKind::Combinatorial => write!(f, "combinatorial"),
            LaplacianKind::Normalized => write!(f, "normalized"),
        }
    }
}

impl FromStr for LaplacianKind {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "combinatorial" => Ok(LaplacianKind::Combinatorial),
            "normalized" => Ok(LaplacianKind::Normalized),
            other => Err(GraphError::InvalidArgument(format!(
                "unknown Laplacian kind {other}"
            ))),
        }
    }
}

impl Graph {
    /// Compute the graph Laplacian of the given kind
    ///
    /// Sets the held Laplacian and its kind; on error the graph is left
    /// unchanged. The directedness memo may be populated as a side effect,
    /// but the connectivity and lmax memos are not touched.
    ///
    /// # Errors
    ///
    /// `GraphError::Unsupported` for the normalized kind on a directed
    /// graph.
    ///
    /// # Examples
    ///
    /// ```
    /// use grasp_graph::{Graph, LaplacianKind};
    /// use scirs2_core::ndarray_ext::array;
    ///
    /// let mut g = Graph::from_dense(&array![[0.0, 2.0], [2.0, 0.0]].view()).unwrap();
    /// g.compute_laplacian(LaplacianKind::Combinatorial).unwrap();
    ///
    /// // L = D - W
    /// assert_eq!(g.laplacian().to_dense(), array![[2.0, -2.0], [-2.0, 2.0]]);
    /// ```
    pub fn compute_laplacian(&mut self, kind: LaplacianKind) -> GraphResult<()> {
        let directed = self.is_directed(false)?;
        self.laplacian = build(&self.weights, directed, kind)?;
        self.lap_kind = kind;
        Ok(())
    }
}

/// Assemble the Laplacian for a weight matrix of known directedness
pub(crate) fn build(
    weights: &CsrMatrix<f64>,
    directed: bool,
    kind: LaplacianKind,
) -> GraphResult<CsrMatrix<f64>> {
    let n = weights.nrows();

    let mut rows = Vec::with_capacity(n + 2 * weights.nnz());
    let mut cols = Vec::with_capacity(n + 2 * weights.nnz());
    let mut vals = Vec::with_capacity(n + 2 * weights.nnz());

    match (directed, kind) {
        (true, LaplacianKind::Normalized) => {
            return Err(GraphError::Unsupported(
                "normalized Laplacian on directed graphs",
            ));
        }

        (true, LaplacianKind::Combinatorial) => {
            let d_out = weights.col_sums();
            let d_in = weights.row_sums();
            for i in 0..n {
                rows.push(i);
                cols.push(i);
                vals.push(0.5 * (d_out[i] + d_in[i]));
            }
            for i in 0..n {
                for idx in weights.row_ptr()[i]..weights.row_ptr()[i + 1] {
                    let j = weights.col_indices()[idx];
                    let w = weights.values()[idx];
                    // −½W and −½Wᵗ; overlapping entries accumulate
                    rows.push(i);
                    cols.push(j);
                    vals.push(-0.5 * w);
                    rows.push(j);
                    cols.push(i);
                    vals.push(-0.5 * w);
                }
            }
        }

        (false, LaplacianKind::Combinatorial) => {
            let d = weights.row_sums();
            for i in 0..n {
                rows.push(i);
                cols.push(i);
                vals.push(d[i]);
            }
            for i in 0..n {
                for idx in weights.row_ptr()[i]..weights.row_ptr()[i + 1] {
                    rows.push(i);
                    cols.push(weights.col_indices()[idx]);
                    vals.push(-weights.values()[idx]);
                }
            }
        }

        (false, LaplacianKind::Normalized) => {
            let d = weights.row_sums();
            let d_inv_sqrt: Vec<f64> = d.iter().map(|&x| x.powf(-0.5)).collect();
            for i in 0..n {
                rows.push(i);
                cols.push(i);
                vals.push(1.0);
            }
            for i in 0..n {
                for idx in weights.row_ptr()[i]..weights.row_ptr()[i + 1] {
                    let j = weights.col_indices()[idx];
                    let w = weights.values()[idx];
                    rows.push(i);
                    cols.push(j);
                    vals.push(-(d_inv_sqrt[i] * w * d_inv_sqrt[j]));
                }
            }
        }
    }

    CsrMatrix::from_triplets(&rows, &cols, &vals, (n, n)).map_err(GraphError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scirs2_core::ndarray_ext::array;

    #[test]
    fn test_combinatorial_row_sums_are_zero() {
        // Weighted path 0-1-2
        let w = array![[0.0, 2.0, 0.0], [2.0, 0.0, 0.5], [0.0, 0.5, 0.0]];
        let mut g = Graph::from_dense(&w.view()).unwrap();
        g.compute_laplacian(LaplacianKind::Combinatorial).unwrap();

        for &s in g.laplacian().row_sums().iter() {
            assert!(s.abs() < 1e-12);
        }
    }

    #[test]
    fn test_normalized_k2() {
        // K2: normalized Laplacian is [[1, -1], [-1, 1]], spectrum {0, 2}
        let w = array![[0.0, 3.0], [3.0, 0.0]];
        let mut g = Graph::from_dense(&w.view()).unwrap();
        g.compute_laplacian(LaplacianKind::Normalized).unwrap();

        let l = g.laplacian().to_dense();
        assert!((l[[0, 0]] - 1.0).abs() < 1e-12);
        assert!((l[[0, 1]] + 1.0).abs() < 1e-12);
        assert!((l[[1, 0]] + 1.0).abs() < 1e-12);
        assert!((l[[1, 1]] - 1.0).abs() < 1e-12);
        assert_eq!(g.lap_kind(), LaplacianKind::Normalized);
    }

    #[test]
    fn test_normalized_isolated_vertex_is_identity_row() {
        let w = array![[0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 0.0]];
        let mut g = Graph::from_dense(&w.view()).unwrap();
        g.compute_laplacian(LaplacianKind::Normalized).unwrap();

        let l = g.laplacian().to_dense();
        assert_eq!(l[[2, 2]], 1.0);
        assert_eq!(l[[2, 0]], 0.0);
        assert_eq!(l[[2, 1]], 0.0);
    }

    #[test]
    fn test_directed_combinatorial_is_symmetrized() {
        // Single directed edge 0 -> 1 with weight 2
        let w = array![[0.0, 2.0], [0.0, 0.0]];
        let mut g = Graph::from_dense(&w.view()).unwrap();
        g.compute_laplacian(LaplacianKind::Combinatorial).unwrap();

        // D_out = diag(0, 2), D_in = diag(2, 0)
        // L = ½(D_out + D_in − W − Wᵗ) = [[1, -1], [-1, 1]]
        assert_eq!(
            g.laplacian().to_dense(),
            array![[1.0, -1.0], [-1.0, 1.0]]
        );
    }

    #[test]
    fn test_directed_normalized_unsupported() {
        let w = array![[0.0, 1.0], [0.0, 0.0]];
        let mut g = Graph::from_dense(&w.view()).unwrap();
        assert!(matches!(
            g.compute_laplacian(LaplacianKind::Normalized),
            Err(GraphError::Unsupported(_))
        ));
        // The failed call left the previous Laplacian in place
        assert_eq!(g.lap_kind(), LaplacianKind::Combinatorial);
    }

    #[test]
    fn test_compute_laplacian_leaves_memos_alone() {
        let w = array![[0.0, 1.0], [1.0, 0.0]];
        let mut g = Graph::from_dense(&w.view()).unwrap();
        assert!(g.is_connected(false));
        g.estimate_lmax(false);
        let lmax = g.lmax_cached();

        g.compute_laplacian(LaplacianKind::Normalized).unwrap();
        assert_eq!(g.connected_cached(), Some(true));
        assert_eq!(g.lmax_cached(), lmax);
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!(
            "combinatorial".parse::<LaplacianKind>().unwrap(),
            LaplacianKind::Combinatorial
        );
        assert_eq!(
            "normalized".parse::<LaplacianKind>().unwrap(),
            LaplacianKind::Normalized
        );
        assert!(matches!(
            "rw".parse::<LaplacianKind>(),
            Err(GraphError::InvalidArgument(_))
        ));
        assert_eq!(LaplacianKind::Combinatorial.to_string(), "combinatorial");
    }
}
