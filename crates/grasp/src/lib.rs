//! # GRASP - Graph Structural & Spectral Processing
//!
//! **Weighted-graph structural engine** deriving the adjacency, degree,
//! Laplacian, connectivity, and coordinate data consumed by spectral
//! filtering and plotting layers.
//!
//! This is the **meta crate** that re-exports all grasp components for
//! convenient access.
//!
//! ## Quick Start
//!
//! ```
//! use grasp::prelude::*;
//! use scirs2_core::ndarray_ext::array;
//!
//! // A weighted 3-cycle
//! let w = array![
//!     [0.0, 1.0, 2.0],
//!     [1.0, 0.0, 1.0],
//!     [2.0, 1.0, 0.0],
//! ];
//! let mut g = Graph::from_dense(&w.view()).unwrap();
//!
//! assert!(g.is_connected(false));
//! g.compute_laplacian(LaplacianKind::Normalized).unwrap();
//! let lmax = g.estimate_lmax(false);
//! assert!(lmax > 0.0);
//! ```
//!
//! ## Components
//!
//! ### Sparse Substrate ([`sparse`])
//!
//! CSR matrices, elementwise merges, masking, power iteration.
//!
//! ```
//! use grasp::sparse::CsrMatrix;
//!
//! let m = CsrMatrix::from_triplets(&[0, 1], &[1, 0], &[1.0, 1.0], (2, 2)).unwrap();
//! assert_eq!(m.nnz(), 2);
//! ```
//!
//! ### Graph Engine ([`graph`])
//!
//! The [`graph::Graph`](crate::graph::Graph) aggregate root: structural
//! derivation, directedness/connectivity analysis, Laplacian
//! construction, largest-eigenvalue estimation, and coordinate layouts.

#![deny(warnings)]

// Re-export all components
pub use grasp_graph as graph;
pub use grasp_sparse as sparse;

pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! # Example
    //!
    //! ```
    //! use grasp::prelude::*;
    //! use scirs2_core::ndarray_ext::array;
    //!
    //! let g = Graph::from_dense(&array![[0.0, 1.0], [1.0, 0.0]].view()).unwrap();
    //! assert_eq!(g.n_vertices(), 2);
    //! ```

    // Graph engine
    pub use crate::graph::{
        EdgeList, Graph, GraphError, GraphResult, LaplacianKind, Layout, SpringOpts, WeightCheck,
    };

    // Sparse substrate
    pub use crate::sparse::{CsrMatrix, SparseError, SparseResult};
}
