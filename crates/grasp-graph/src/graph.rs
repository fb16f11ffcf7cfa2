//! The graph aggregate root
//!
//! A [`Graph`] owns an N×N sparse weight matrix and every quantity derived
//! from it: the adjacency mask, the degree vector, the edge count, and the
//! graph Laplacian. Directedness, connectivity, and the largest-eigenvalue
//! estimate are memoized; a memo is recomputed only on an explicit
//! `recompute` request or when the weights are replaced wholesale.
//!
//! The vertex count is fixed for the lifetime of the object. There is no
//! in-place weight mutation in the public API: [`Graph::replace_weights`]
//! is the single mutation entry point, and it re-derives all dependent
//! state and clears every memo transactionally.
//!
//! # Examples
//!
//! ```
//! use grasp_graph::Graph;
//! use scirs2_core::ndarray_ext::array;
//!
//! // A 3-cycle
//! let w = array![
//!     [0.0, 1.0, 1.0],
//!     [1.0, 0.0, 1.0],
//!     [1.0, 1.0, 0.0],
//! ];
//! let g = Graph::from_dense(&w.view()).unwrap();
//!
//! assert_eq!(g.n_vertices(), 3);
//! assert_eq!(g.n_edges(), 6);
//! assert!(!g.is_directed(false).unwrap());
//! assert!(g.is_connected(false));
//! ```

use crate::error::{GraphError, GraphResult};
use crate::laplacian::{self, LaplacianKind};
use grasp_sparse::ops;
use grasp_sparse::CsrMatrix;
use scirs2_core::ndarray_ext::{Array1, Array2, ArrayView2};
use std::cell::Cell;

/// A weighted graph over a fixed vertex set
///
/// `weights[i, j]` holds the weight of the edge from i to j; zero means
/// "no edge". Weights are expected non-negative with a zero diagonal, but
/// anomalies (NaN, infinity, a non-zero diagonal) are only warned about,
/// never rejected: the engine computes on them anyway, trusting the
/// caller.
#[derive(Debug, Clone)]
pub struct Graph {
    pub(crate) weights: CsrMatrix<f64>,
    pub(crate) adjacency: CsrMatrix<f64>,
    pub(crate) degree: Array1<f64>,
    pub(crate) n_edges: usize,
    pub(crate) lap_kind: LaplacianKind,
    pub(crate) laplacian: CsrMatrix<f64>,
    pub(crate) coords: Option<Array2<f64>>,
    pub(crate) orig_idx: Option<Vec<usize>>,
    pub(crate) directed: Cell<Option<bool>>,
    pub(crate) connected: Cell<Option<bool>>,
    pub(crate) lmax: Cell<Option<f64>>,
}

/// Weight matrix anomaly report, mirrored by `log::warn!` output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightCheck {
    /// Some entry is infinite
    pub has_inf: bool,
    /// Some entry is NaN
    pub has_nan: bool,
    /// The main diagonal carries a non-zero entry (self-loop)
    pub diag_not_zero: bool,
}

/// Undirected edge list: parallel vectors over the lower triangle
#[derive(Debug, Clone)]
pub struct EdgeList {
    pub v_in: Vec<usize>,
    pub v_out: Vec<usize>,
    pub weights: Vec<f64>,
}

impl Graph {
    /// Build a graph from a sparse weight matrix
    ///
    /// Derives adjacency, degree and edge count, and computes the
    /// combinatorial Laplacian. Directedness is memoized as a side effect
    /// of the Laplacian construction; the connectivity and lmax memos
    /// start unset.
    ///
    /// # Errors
    ///
    /// `GraphError::NotSquare` when the matrix is not square. Weight
    /// anomalies (see [`WeightCheck`]) are warned, not rejected.
    pub fn from_weights(weights: CsrMatrix<f64>) -> GraphResult<Self> {
        let (rows, cols) = weights.shape();
        if rows != cols {
            return Err(GraphError::NotSquare { rows, cols });
        }

        check_weights(&weights);

        let adjacency = ops::positive_mask(&weights);
        let degree = adjacency.row_sums();
        let n_edges = weights.nnz();

        let directed = ops::asymmetry(&weights)? != 0.0;
        let lap_kind = LaplacianKind::Combinatorial;
        let laplacian = laplacian::build(&weights, directed, lap_kind)?;

        Ok(Self {
            weights,
            adjacency,
            degree,
            n_edges,
            lap_kind,
            laplacian,
            coords: None,
            orig_idx: None,
            directed: Cell::new(Some(directed)),
            connected: Cell::new(None),
            lmax: Cell::new(None),
        })
    }

    /// Build a graph from a dense weight matrix view
    pub fn from_dense(weights: &ArrayView2<f64>) -> GraphResult<Self> {
        Self::from_weights(CsrMatrix::from_dense(weights))
    }

    /// Replace the weight matrix wholesale
    ///
    /// The single mutation entry point. Adjacency, degree, edge count and
    /// the Laplacian (of the currently selected kind) are recomputed, and
    /// the directedness/connectivity/lmax memos are cleared, all inside
    /// this one operation.
    ///
    /// # Errors
    ///
    /// `GraphError::ShapeMismatch` when the replacement changes the vertex
    /// count: N is fixed for the object's life.
    pub fn replace_weights(&mut self, weights: CsrMatrix<f64>) -> GraphResult<()> {
        if weights.shape() != self.weights.shape() {
            return Err(GraphError::ShapeMismatch(format!(
                "vertex count is fixed: expected {:?}, got {:?}",
                self.weights.shape(),
                weights.shape()
            )));
        }

        check_weights(&weights);

        self.directed.set(None);
        self.connected.set(None);
        self.lmax.set(None);

        self.adjacency = ops::positive_mask(&weights);
        self.degree = self.adjacency.row_sums();
        self.n_edges = weights.nnz();
        self.weights = weights;

        self.compute_laplacian(self.lap_kind)
    }

    /// Re-run the weight matrix anomaly checks
    ///
    /// Each anomaly is warned through `log::warn!` as a side effect; the
    /// returned report carries the same flags as data.
    pub fn check_weights(&self) -> WeightCheck {
        check_weights(&self.weights)
    }

    /// Whether the graph has directed edges
    ///
    /// A graph is directed iff its weight matrix is not symmetric, tested
    /// as `Σ|W − Wᵗ| != 0` with no tolerance: near-symmetric matrices
    /// produced by numerical noise classify as directed. The result is
    /// memoized; pass `recompute = true` to force re-evaluation.
    pub fn is_directed(&self, recompute: bool) -> GraphResult<bool> {
        if !recompute {
            if let Some(d) = self.directed.get() {
                return Ok(d);
            }
        }

        let (rows, cols) = self.weights.shape();
        if rows != cols {
            return Err(GraphError::NotSquare { rows, cols });
        }

        let directed = ops::asymmetry(&self.weights)? != 0.0;
        self.directed.set(Some(directed));
        Ok(directed)
    }

    /// Induced subgraph over the given vertex indices
    ///
    /// The result is a fully independent graph built by row/column
    /// selection on the weight matrix; it shares no mutable state with
    /// its parent and its memos start unset.
    ///
    /// # Errors
    ///
    /// `GraphError::MalformedInput` for indices outside `0..N`.
    pub fn subgraph(&self, indices: &[usize]) -> GraphResult<Graph> {
        let n = self.n_vertices();
        for &i in indices {
            if i >= n {
                return Err(GraphError::MalformedInput(format!(
                    "subgraph index {i} out of range for {n} vertices"
                )));
            }
        }

        let sub_weights = self.weights.select(indices, indices)?;
        Graph::from_weights(sub_weights)
    }

    /// Edge list over the lower triangle of the weight matrix
    ///
    /// Each undirected edge (and each self-loop) appears once, as
    /// `(v_in[k], v_out[k], weights[k])` with `v_out[k] <= v_in[k]`.
    ///
    /// # Errors
    ///
    /// `GraphError::Unsupported` for directed graphs.
    pub fn edge_list(&self) -> GraphResult<EdgeList> {
        if self.is_directed(false)? {
            return Err(GraphError::Unsupported(
                "edge list extraction on directed graphs",
            ));
        }

        let mut v_in = Vec::new();
        let mut v_out = Vec::new();
        let mut weights = Vec::new();

        for i in 0..self.n_vertices() {
            for idx in self.weights.row_ptr()[i]..self.weights.row_ptr()[i + 1] {
                let j = self.weights.col_indices()[idx];
                if j <= i {
                    v_in.push(i);
                    v_out.push(j);
                    weights.push(self.weights.values()[idx]);
                }
            }
        }

        Ok(EdgeList {
            v_in,
            v_out,
            weights,
        })
    }

    /// Number of vertices
    pub fn n_vertices(&self) -> usize {
        self.weights.nrows()
    }

    /// Number of stored weight entries (each directed entry counts once)
    pub fn n_edges(&self) -> usize {
        self.n_edges
    }

    /// The weight matrix
    pub fn weights(&self) -> &CsrMatrix<f64> {
        &self.weights
    }

    /// The adjacency mask: unit entries where `weights > 0`
    pub fn adjacency(&self) -> &CsrMatrix<f64> {
        &self.adjacency
    }

    /// The degree vector: row sums of the adjacency mask
    pub fn degree(&self) -> &Array1<f64> {
        &self.degree
    }

    /// The graph Laplacian of the currently selected kind
    pub fn laplacian(&self) -> &CsrMatrix<f64> {
        &self.laplacian
    }

    /// The kind of Laplacian currently held
    pub fn lap_kind(&self) -> LaplacianKind {
        self.lap_kind
    }

    /// Vertex coordinates, if a layout has been assigned
    pub fn coords(&self) -> Option<&Array2<f64>> {
        self.coords.as_ref()
    }

    /// Parent-graph vertex indices, set on components produced by
    /// [`Graph::extract_components`]
    pub fn orig_idx(&self) -> Option<&[usize]> {
        self.orig_idx.as_deref()
    }

    /// The memoized directedness flag, if computed
    pub fn directed_cached(&self) -> Option<bool> {
        self.directed.get()
    }

    /// The memoized connectivity flag, if computed
    pub fn connected_cached(&self) -> Option<bool> {
        self.connected.get()
    }

    /// The memoized largest-eigenvalue estimate, if computed
    pub fn lmax_cached(&self) -> Option<f64> {
        self.lmax.get()
    }
}

/// Check the characteristics of a weight matrix, warning on each anomaly
pub(crate) fn check_weights(weights: &CsrMatrix<f64>) -> WeightCheck {
    let has_inf = weights.values().iter().any(|v| v.is_infinite());
    if has_inf {
        log::warn!("there is an infinite value in the weight matrix");
    }

    let has_nan = weights.values().iter().any(|v| v.is_nan());
    if has_nan {
        log::warn!("there is a NaN value in the weight matrix");
    }

    let diag_not_zero = weights.diagonal().iter().any(|&d| d != 0.0);
    if diag_not_zero {
        log::warn!("the main diagonal of the weight matrix is not 0");
    }

    WeightCheck {
        has_inf,
        has_nan,
        diag_not_zero,
    }
}
