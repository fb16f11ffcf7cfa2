//! # grasp-graph
//!
//! Weighted-graph structural engine: the data and algorithms a plotting
//! or spectral layer consumes.
//!
//! This crate provides:
//! - The [`Graph`] aggregate root over a sparse weight matrix
//! - Derived structure: adjacency mask, degree vector, edge count
//! - Directedness and connectivity analysis, component extraction
//! - Combinatorial and normalized Laplacians
//! - A fast largest-eigenvalue estimate with an analytic fallback
//! - Force-directed and geometric vertex coordinate layouts
//!
//! Everything is synchronous, single-threaded, CPU-bound computation over
//! in-memory sparse matrices. The memoized flags on [`Graph`] are not
//! synchronized; callers using a graph from multiple threads must
//! serialize all mutating operations per instance.

#![deny(warnings)]

mod connectivity;
mod lmax;

pub mod error;
pub mod graph;
pub mod laplacian;
pub mod layout;

// Re-exports
pub use error::{GraphError, GraphResult};
pub use graph::{EdgeList, Graph, WeightCheck};
pub use laplacian::LaplacianKind;
pub use layout::{Layout, SpringOpts};
