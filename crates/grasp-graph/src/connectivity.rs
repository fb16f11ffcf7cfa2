//! Reachability, connectivity, and connected-component extraction
//!
//! Connectivity is decided by iterative traversal over the adjacency mask.
//! For undirected graphs a single pass from vertex 0 suffices; for
//! directed graphs the mask and its transpose are both traversed, which
//! checks that vertex 0 can reach, and be reached from, every other
//! vertex. For directed graphs this is a necessary but not sufficient
//! condition for strong connectivity; the behavior is preserved as-is
//! because tightening it would change observable results.

use crate::error::{GraphError, GraphResult};
use crate::graph::Graph;
use grasp_sparse::CsrMatrix;

impl Graph {
    /// Whether the graph is connected
    ///
    /// The result is memoized; pass `recompute = true` to force
    /// re-evaluation (the forced recompute also flows into the
    /// directedness test). A 0- or 1-vertex graph is trivially connected.
    ///
    /// A shape inconsistency is a soft failure: it is logged as an error
    /// and reported as `false` rather than raised, so callers must
    /// tolerate `false` from malformed state.
    pub fn is_connected(&self, recompute: bool) -> bool {
        if !recompute {
            if let Some(connected) = self.connected.get() {
                return connected;
            }
        }

        let (rows, cols) = self.adjacency.shape();
        if rows != cols {
            log::error!("inconsistent shape to test connectedness, set to false");
            self.connected.set(Some(false));
            return false;
        }

        if rows <= 1 {
            self.connected.set(Some(true));
            return true;
        }

        let directed = match self.is_directed(recompute) {
            Ok(directed) => directed,
            Err(_) => {
                log::error!("inconsistent shape to test connectedness, set to false");
                self.connected.set(Some(false));
                return false;
            }
        };

        let connected = if directed {
            let transposed = self.adjacency.transpose();
            full_reachability(&self.adjacency, 0) && full_reachability(&transposed, 0)
        } else {
            full_reachability(&self.adjacency, 0)
        };

        self.connected.set(Some(connected));
        connected
    }

    /// Split an undirected graph into its connected components
    ///
    /// Each component seeds from the smallest unvisited vertex index, so
    /// extraction order is deterministic. Component vertex lists are
    /// sorted ascending and recorded on the produced subgraphs as
    /// `orig_idx` for traceability back to the parent.
    ///
    /// # Errors
    ///
    /// `GraphError::Unsupported` for directed graphs: a deliberate scope
    /// limit, not a deferred bug.
    pub fn extract_components(&self) -> GraphResult<Vec<Graph>> {
        if self.is_directed(false)? {
            return Err(GraphError::Unsupported(
                "component extraction on directed graphs",
            ));
        }

        let n = self.n_vertices();
        let mut visited = vec![false; n];
        let mut components = Vec::new();

        for seed in 0..n {
            if visited[seed] {
                continue;
            }

            let mut component = Vec::new();
            let mut stack = vec![seed];
            while let Some(v) = stack.pop() {
                if visited[v] {
                    continue;
                }
                visited[v] = true;
                component.push(v);

                for idx in self.adjacency.row_ptr()[v]..self.adjacency.row_ptr()[v + 1] {
                    let u = self.adjacency.col_indices()[idx];
                    if !visited[u] {
                        stack.push(u);
                    }
                }
            }

            component.sort_unstable();
            log::debug!(
                "constructing subgraph for component of size {}",
                component.len()
            );

            let mut subgraph = self.subgraph(&component)?;
            subgraph.orig_idx = Some(component);
            components.push(subgraph);
        }

        Ok(components)
    }
}

/// Whether every vertex is reachable from `start` under the given mask
fn full_reachability(adjacency: &CsrMatrix<f64>, start: usize) -> bool {
    let n = adjacency.nrows();
    let mut visited = vec![false; n];
    let mut reached = 0usize;
    let mut stack = vec![start];

    while let Some(v) = stack.pop() {
        if visited[v] {
            continue;
        }
        visited[v] = true;
        reached += 1;

        for idx in adjacency.row_ptr()[v]..adjacency.row_ptr()[v + 1] {
            let u = adjacency.col_indices()[idx];
            if !visited[u] {
                stack.push(u);
            }
        }
    }

    reached == n
}

#[cfg(test)]
mod tests {
    use super::*;
    use scirs2_core::ndarray_ext::array;

    #[test]
    fn test_complete_graph_is_connected() {
        for n in 1..=5 {
            let w = CsrMatrix::from_dense(
                &scirs2_core::ndarray_ext::Array2::from_shape_fn((n, n), |(i, j)| {
                    if i == j {
                        0.0
                    } else {
                        1.0
                    }
                })
                .view(),
            );
            let g = Graph::from_weights(w).unwrap();
            assert!(g.is_connected(false), "K{n} must be connected");
        }
    }

    #[test]
    fn test_empty_graph_trivially_connected() {
        let g = Graph::from_weights(CsrMatrix::<f64>::zeros((0, 0))).unwrap();
        assert!(g.is_connected(false));
        let g = Graph::from_weights(CsrMatrix::<f64>::zeros((1, 1))).unwrap();
        assert!(g.is_connected(false));
    }

    #[test]
    fn test_disjoint_groups_not_connected() {
        let w = array![
            [0.0, 1.0, 0.0, 0.0],
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
            [0.0, 0.0, 1.0, 0.0],
        ];
        let g = Graph::from_dense(&w.view()).unwrap();
        assert!(!g.is_connected(false));
        assert_eq!(g.connected_cached(), Some(false));
    }

    #[test]
    fn test_directed_cycle_connected_chain_not() {
        // 0 -> 1 -> 2 -> 0: vertex 0 reaches and is reached by all
        let cycle = array![[0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0]];
        let g = Graph::from_dense(&cycle.view()).unwrap();
        assert!(g.is_connected(false));

        // 0 -> 1 -> 2: nothing reaches back to 0
        let chain = array![[0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [0.0, 0.0, 0.0]];
        let g = Graph::from_dense(&chain.view()).unwrap();
        assert!(!g.is_connected(false));
    }

    #[test]
    fn test_connectivity_memo() {
        let g = Graph::from_dense(&array![[0.0, 1.0], [1.0, 0.0]].view()).unwrap();
        assert!(g.connected_cached().is_none());
        assert!(g.is_connected(false));
        assert_eq!(g.connected_cached(), Some(true));
        // recompute re-evaluates and reaches the same answer
        assert!(g.is_connected(true));
    }

    #[test]
    fn test_extract_components_two_cliques() {
        let w = array![
            [0.0, 1.0, 1.0, 0.0, 0.0],
            [1.0, 0.0, 1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, 0.0, 0.0, 2.0],
            [0.0, 0.0, 0.0, 2.0, 0.0],
        ];
        let g = Graph::from_dense(&w.view()).unwrap();
        let components = g.extract_components().unwrap();

        assert_eq!(components.len(), 2);
        let sizes: Vec<usize> = components.iter().map(Graph::n_vertices).collect();
        assert_eq!(sizes.iter().sum::<usize>(), 5);

        // orig_idx partitions {0..4} exactly, in seed order
        assert_eq!(components[0].orig_idx(), Some(&[0, 1, 2][..]));
        assert_eq!(components[1].orig_idx(), Some(&[3, 4][..]));

        // Induced weights survive into the component
        assert_eq!(components[1].weights().get(0, 1), Some(2.0));
    }

    #[test]
    fn test_extract_components_directed_unsupported() {
        let g = Graph::from_dense(&array![[0.0, 1.0], [0.0, 0.0]].view()).unwrap();
        assert!(matches!(
            g.extract_components(),
            Err(GraphError::Unsupported(_))
        ));
    }

    #[test]
    fn test_extract_components_fully_connected_single() {
        let w = array![[0.0, 1.0], [1.0, 0.0]];
        let g = Graph::from_dense(&w.view()).unwrap();
        let components = g.extract_components().unwrap();
        assert_eq!(components.len(), 1);
        assert_eq!(components[0].orig_idx(), Some(&[0, 1][..]));
    }
}
