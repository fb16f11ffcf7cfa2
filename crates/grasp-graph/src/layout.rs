//! Vertex coordinate assignment
//!
//! Coordinates are a presentation attribute: plain N×dim data with no
//! dependency on any rendering backend. The hard core is the
//! Fruchterman–Reingold force-directed ("spring") layout; the remaining
//! kinds are thin geometric constructions (line, ring, uniform random,
//! community-centroid scatter).
//!
//! The spring layout is O(iterations × N²) by construction (all-pairs
//! forces every round). That is acceptable for the graph sizes this
//! engine targets (below ~10⁴ vertices) and is a documented ceiling.
//!
//! Layouts are deterministic only when a seed is supplied; without one,
//! random initialization differs across runs by design.

use crate::error::{GraphError, GraphResult};
use crate::graph::Graph;
use grasp_sparse::CsrMatrix;
use scirs2_core::ndarray_ext::{Array1, Array2};
use scirs2_core::random::{Rng, SeedableRng, StdRng};
use std::collections::HashSet;
use std::f64::consts::PI;
use std::str::FromStr;

/// Options for the Fruchterman–Reingold spring layout
#[derive(Debug, Clone)]
pub struct SpringOpts {
    /// Target dimensionality: 1, 2, or 3
    pub dim: usize,
    /// Optimal pairwise distance (spring constant); `sqrt(1/N)` when unset
    pub k: Option<f64>,
    /// Starting positions, N×dim; uniform random in `[0, 1)^dim` when unset
    pub initial: Option<Array2<f64>>,
    /// Vertices held immobile throughout the run
    pub fixed: Vec<usize>,
    /// Number of force rounds
    pub iterations: usize,
    /// Final half-extent per axis (only applied when no vertex is fixed)
    pub scale: f64,
    /// Translation applied after rescaling; the origin when unset
    pub center: Option<Array1<f64>>,
    /// RNG seed for the random initialization
    pub seed: Option<u64>,
}

impl Default for SpringOpts {
    fn default() -> Self {
        Self {
            dim: 2,
            k: None,
            initial: None,
            fixed: Vec::new(),
            iterations: 50,
            scale: 1.0,
            center: None,
            seed: None,
        }
    }
}

/// A vertex coordinate assignment strategy
#[derive(Debug, Clone)]
pub enum Layout {
    /// Caller-supplied N×{1,2,3} coordinates
    Manual(Array2<f64>),
    /// The sequence 0..N as a single column
    Line1D,
    /// The sequence 0..N on the x axis
    Line2D,
    /// Evenly spaced points on the unit circle
    Ring2D,
    /// Uniform random in `[0, 1)²`
    Random2D { seed: Option<u64> },
    /// Uniform random in `[0, 1)³`
    Random3D { seed: Option<u64> },
    /// Fruchterman–Reingold force-directed placement
    Spring(SpringOpts),
    /// Per-community scatter around centroids arranged on a circle
    Community2D {
        /// Community index per vertex (length N)
        node_com: Vec<usize>,
        /// Radius of the centroid circle; `sqrt(N)` when unset
        world_rad: Option<f64>,
        seed: Option<u64>,
    },
}

impl FromStr for Layout {
    type Err = GraphError;

    /// Parse a layout by its kind name
    ///
    /// Recognizes `line1D`, `line2D`, `ring2D`, `random2D`, `random3D`
    /// and `spring` (with default options). `community2D` cannot be
    /// parsed because it requires community assignments.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "line1D" => Ok(Layout::Line1D),
            "line2D" => Ok(Layout::Line2D),
            "ring2D" => Ok(Layout::Ring2D),
            "random2D" => Ok(Layout::Random2D { seed: None }),
            "random3D" => Ok(Layout::Random3D { seed: None }),
            "spring" => Ok(Layout::Spring(SpringOpts::default())),
            "community2D" => Err(GraphError::InvalidArgument(
                "community2D requires community assignments; construct Layout::Community2D"
                    .to_string(),
            )),
            other => Err(GraphError::InvalidArgument(format!(
                "unknown coordinate kind {other}"
            ))),
        }
    }
}

impl Graph {
    /// Assign vertex coordinates
    ///
    /// # Errors
    ///
    /// - `ShapeMismatch` for manual coordinates that are not N×{1,2,3}
    /// - `InvalidArgument` for a spring dimensionality outside {1,2,3}
    /// - `MalformedInput` for out-of-range fixed vertices or a community
    ///   assignment of the wrong length
    ///
    /// # Examples
    ///
    /// ```
    /// use grasp_graph::{Graph, Layout};
    /// use scirs2_core::ndarray_ext::array;
    ///
    /// let w = array![
    ///     [0.0, 1.0, 0.0],
    ///     [1.0, 0.0, 1.0],
    ///     [0.0, 1.0, 0.0],
    /// ];
    /// let mut g = Graph::from_dense(&w.view()).unwrap();
    ///
    /// g.set_coordinates("ring2D".parse::<Layout>().unwrap()).unwrap();
    /// assert_eq!(g.coords().unwrap().dim(), (3, 2));
    /// ```
    pub fn set_coordinates(&mut self, layout: Layout) -> GraphResult<()> {
        let n = self.n_vertices();

        let coords = match layout {
            Layout::Manual(coords) => {
                let (rows, cols) = coords.dim();
                if rows != n || !(1..=3).contains(&cols) {
                    return Err(GraphError::ShapeMismatch(format!(
                        "expected coordinates of size {n}×1, {n}×2, or {n}×3, got {rows}×{cols}"
                    )));
                }
                coords
            }
            Layout::Line1D => Array2::from_shape_fn((n, 1), |(i, _)| i as f64),
            Layout::Line2D => {
                Array2::from_shape_fn((n, 2), |(i, d)| if d == 0 { i as f64 } else { 0.0 })
            }
            Layout::Ring2D => Array2::from_shape_fn((n, 2), |(i, d)| {
                let angle = i as f64 * 2.0 * PI / n as f64;
                if d == 0 {
                    angle.cos()
                } else {
                    angle.sin()
                }
            }),
            Layout::Random2D { seed } => random_coords(n, 2, seed),
            Layout::Random3D { seed } => random_coords(n, 3, seed),
            Layout::Spring(opts) => fruchterman_reingold(&self.adjacency, &opts)?,
            Layout::Community2D {
                node_com,
                world_rad,
                seed,
            } => community_coords(n, &node_com, world_rad, seed)?,
        };

        self.coords = Some(coords);
        Ok(())
    }
}

fn layout_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        // Unseeded layouts are non-deterministic across runs by design
        None => StdRng::seed_from_u64(entropy_seed()),
    }
}

fn entropy_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn random_coords(n: usize, dim: usize, seed: Option<u64>) -> Array2<f64> {
    let mut rng = layout_rng(seed);
    let mut coords = Array2::zeros((n, dim));
    for value in coords.iter_mut() {
        *value = rng.random::<f64>();
    }
    coords
}

/// Position vertices with the Fruchterman–Reingold force-directed
/// algorithm over the adjacency mask
pub(crate) fn fruchterman_reingold(
    adjacency: &CsrMatrix<f64>,
    opts: &SpringOpts,
) -> GraphResult<Array2<f64>> {
    let n = adjacency.nrows();
    let dim = opts.dim;

    if !(1..=3).contains(&dim) {
        return Err(GraphError::InvalidArgument(format!(
            "spring layout dimension must be 1, 2, or 3, got {dim}"
        )));
    }
    for &f in &opts.fixed {
        if f >= n {
            return Err(GraphError::MalformedInput(format!(
                "fixed vertex {f} out of range for {n} vertices"
            )));
        }
    }

    let center = match &opts.center {
        Some(center) if center.len() == dim => center.clone(),
        Some(_) => {
            log::error!("spring layout: center has wrong size, using the origin");
            Array1::zeros(dim)
        }
        None => Array1::zeros(dim),
    };

    // Existing positions define the domain scale used for the default k
    let mut dom_size = 1.0;
    let mut pos = match &opts.initial {
        Some(initial) => {
            if initial.dim() != (n, dim) {
                return Err(GraphError::ShapeMismatch(format!(
                    "initial positions must be {n}×{dim}, got {:?}",
                    initial.dim()
                )));
            }
            let max = initial.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            if max.is_finite() {
                dom_size = max;
            }
            initial.clone()
        }
        None => random_coords(n, dim, opts.seed),
    };

    // Optimal pairwise distance
    let k = match opts.k {
        Some(k) => k,
        None if !opts.fixed.is_empty() => dom_size / (n as f64).sqrt(),
        None => (1.0 / n as f64).sqrt(),
    };

    let fixed: HashSet<usize> = opts.fixed.iter().copied().collect();

    // Simple cooling scheme: step t down linearly so the last round moves
    // by dt
    let mut t = 0.1;
    let dt = t / (opts.iterations as f64 + 1.0);

    let mut displacement = Array2::<f64>::zeros((n, dim));
    let mut adj_row = vec![0.0_f64; n];

    for _ in 0..opts.iterations {
        displacement.fill(0.0);

        for i in 0..n {
            if fixed.contains(&i) {
                continue;
            }

            // Dense view of adjacency row i for the attractive term
            let row_start = adjacency.row_ptr()[i];
            let row_end = adjacency.row_ptr()[i + 1];
            for idx in row_start..row_end {
                adj_row[adjacency.col_indices()[idx]] = adjacency.values()[idx];
            }

            for j in 0..n {
                let mut delta = [0.0_f64; 3];
                let mut dist_sq = 0.0;
                for d in 0..dim {
                    let diff = pos[[i, d]] - pos[[j, d]];
                    delta[d] = diff;
                    dist_sq += diff * diff;
                }
                // Enforce minimum distance of 0.01
                let distance = dist_sq.sqrt().max(0.01);

                let coeff = k * k / (distance * distance) - adj_row[j] * distance / k;
                for d in 0..dim {
                    displacement[[i, d]] += delta[d] * coeff;
                }
            }

            for idx in row_start..row_end {
                adj_row[adjacency.col_indices()[idx]] = 0.0;
            }
        }

        // Apply the accumulated displacements, normalized by their length
        for i in 0..n {
            let mut length_sq = 0.0;
            for d in 0..dim {
                length_sq += displacement[[i, d]] * displacement[[i, d]];
            }
            let length = length_sq.sqrt();
            let length = if length < 0.01 { 0.1 } else { length };

            for d in 0..dim {
                pos[[i, d]] += displacement[[i, d]] * t / length;
            }
        }

        t -= dt;
    }

    if opts.fixed.is_empty() {
        rescale_layout(&mut pos, opts.scale);
        for i in 0..n {
            for d in 0..dim {
                pos[[i, d]] += center[d];
            }
        }
    }

    Ok(pos)
}

/// Rescale positions to (-scale, scale) in all axes, preserving aspect
fn rescale_layout(pos: &mut Array2<f64>, scale: f64) {
    let (n, dim) = pos.dim();
    if n == 0 {
        return;
    }

    // Shift origin to the per-axis mean, tracking the single largest
    // extent over all axes
    let mut lim = 0.0_f64;
    for d in 0..dim {
        let mut mean = 0.0;
        for i in 0..n {
            mean += pos[[i, d]];
        }
        mean /= n as f64;
        for i in 0..n {
            pos[[i, d]] -= mean;
            lim = lim.max(pos[[i, d]]);
        }
    }

    // A degenerate spread leaves every position at the origin
    if lim > 0.0 {
        for value in pos.iter_mut() {
            *value *= scale / lim;
        }
    }
}

fn community_coords(
    n: usize,
    node_com: &[usize],
    world_rad: Option<f64>,
    seed: Option<u64>,
) -> GraphResult<Array2<f64>> {
    if node_com.len() != n {
        return Err(GraphError::MalformedInput(format!(
            "community assignment has length {}, expected {n}",
            node_com.len()
        )));
    }

    let n_com = node_com.iter().max().map_or(0, |&c| c + 1);
    let world_rad = world_rad.unwrap_or_else(|| (n as f64).sqrt());

    let mut comm_sizes = vec![0usize; n_com];
    for &c in node_com {
        comm_sizes[c] += 1;
    }

    // Community centroids evenly spaced on a circle
    let centroids: Vec<(f64, f64)> = (1..=n_com)
        .map(|c| {
            let angle = 2.0 * PI * c as f64 / n_com as f64;
            (world_rad * angle.cos(), world_rad * angle.sin())
        })
        .collect();

    // Each vertex scatters at a random polar offset from its centroid,
    // scaled by the square root of the community size
    let mut rng = layout_rng(seed);
    let mut coords = Array2::zeros((n, 2));
    for i in 0..n {
        let radius = rng.random::<f64>();
        let angle = 2.0 * PI * rng.random::<f64>();
        let c = node_com[i];
        let comm_rad = (comm_sizes[c] as f64).sqrt();
        coords[[i, 0]] = centroids[c].0 + comm_rad * radius * angle.cos();
        coords[[i, 1]] = centroids[c].1 + comm_rad * radius * angle.sin();
    }

    Ok(coords)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scirs2_core::ndarray_ext::array;

    fn path3() -> Graph {
        let w = array![[0.0, 1.0, 0.0], [1.0, 0.0, 1.0], [0.0, 1.0, 0.0]];
        Graph::from_dense(&w.view()).unwrap()
    }

    #[test]
    fn test_line_and_ring() {
        let mut g = path3();

        g.set_coordinates(Layout::Line1D).unwrap();
        assert_eq!(g.coords().unwrap(), &array![[0.0], [1.0], [2.0]]);

        g.set_coordinates(Layout::Line2D).unwrap();
        assert_eq!(g.coords().unwrap()[[2, 0]], 2.0);
        assert_eq!(g.coords().unwrap()[[2, 1]], 0.0);

        g.set_coordinates(Layout::Ring2D).unwrap();
        let coords = g.coords().unwrap();
        assert_eq!(coords.dim(), (3, 2));
        for i in 0..3 {
            let r = (coords[[i, 0]].powi(2) + coords[[i, 1]].powi(2)).sqrt();
            assert!((r - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_manual_validates_shape() {
        let mut g = path3();
        let good = array![[0.0, 0.0], [1.0, 0.0], [2.0, 0.0]];
        g.set_coordinates(Layout::Manual(good.clone())).unwrap();
        assert_eq!(g.coords().unwrap(), &good);

        let wrong_rows = array![[0.0, 0.0], [1.0, 0.0]];
        assert!(matches!(
            g.set_coordinates(Layout::Manual(wrong_rows)),
            Err(GraphError::ShapeMismatch(_))
        ));

        let wrong_cols = Array2::<f64>::zeros((3, 4));
        assert!(matches!(
            g.set_coordinates(Layout::Manual(wrong_cols)),
            Err(GraphError::ShapeMismatch(_))
        ));
    }

    #[test]
    fn test_random_coords_seeded_deterministic() {
        let mut g = path3();
        g.set_coordinates(Layout::Random3D { seed: Some(7) }).unwrap();
        let first = g.coords().unwrap().clone();
        assert_eq!(first.dim(), (3, 3));
        assert!(first.iter().all(|&v| (0.0..1.0).contains(&v)));

        g.set_coordinates(Layout::Random3D { seed: Some(7) }).unwrap();
        assert_eq!(g.coords().unwrap(), &first);
    }

    #[test]
    fn test_layout_parsing() {
        assert!(matches!("spring".parse::<Layout>(), Ok(Layout::Spring(_))));
        assert!(matches!("ring2D".parse::<Layout>(), Ok(Layout::Ring2D)));
        assert!(matches!(
            "hexgrid".parse::<Layout>(),
            Err(GraphError::InvalidArgument(_))
        ));
        assert!(matches!(
            "community2D".parse::<Layout>(),
            Err(GraphError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_spring_zero_iterations_keeps_initial() {
        let g = path3();
        let initial = array![[0.0, 0.0], [0.5, 0.5], [1.0, 0.25]];
        let opts = SpringOpts {
            initial: Some(initial.clone()),
            fixed: vec![0],
            iterations: 0,
            ..SpringOpts::default()
        };
        // Zero iterations apply no displacement, and the fixed vertex
        // suppresses the final rescale, so the output is bit-identical
        let pos = fruchterman_reingold(g.adjacency(), &opts).unwrap();
        assert_eq!(pos, initial);
    }

    #[test]
    fn test_spring_all_fixed_returns_initial() {
        let g = path3();
        let initial = array![[0.1, 0.9], [0.4, 0.2], [0.8, 0.6]];
        let opts = SpringOpts {
            initial: Some(initial.clone()),
            fixed: vec![0, 1, 2],
            iterations: 50,
            ..SpringOpts::default()
        };
        let pos = fruchterman_reingold(g.adjacency(), &opts).unwrap();
        assert_eq!(pos, initial);
    }

    #[test]
    fn test_spring_rescales_into_domain() {
        let mut g = path3();
        let opts = SpringOpts {
            seed: Some(42),
            scale: 2.0,
            ..SpringOpts::default()
        };
        g.set_coordinates(Layout::Spring(opts)).unwrap();
        let coords = g.coords().unwrap();
        assert_eq!(coords.dim(), (3, 2));
        // The largest positive extent lands exactly on the scale
        let max = coords.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        assert!((max - 2.0).abs() < 1e-9);
        // Axis means are centered before scaling
        let mean_x = (coords[[0, 0]] + coords[[1, 0]] + coords[[2, 0]]) / 3.0;
        assert!(mean_x.abs() < 1e-9);
    }

    #[test]
    fn test_spring_seed_is_deterministic() {
        let g = path3();
        let opts = SpringOpts {
            seed: Some(9),
            ..SpringOpts::default()
        };
        let a = fruchterman_reingold(g.adjacency(), &opts).unwrap();
        let b = fruchterman_reingold(g.adjacency(), &opts).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_spring_center_translation() {
        let g = path3();
        let base = SpringOpts {
            seed: Some(3),
            ..SpringOpts::default()
        };
        let centered = SpringOpts {
            seed: Some(3),
            center: Some(array![10.0, -5.0]),
            ..SpringOpts::default()
        };
        let a = fruchterman_reingold(g.adjacency(), &base).unwrap();
        let b = fruchterman_reingold(g.adjacency(), &centered).unwrap();
        for i in 0..3 {
            assert!((b[[i, 0]] - a[[i, 0]] - 10.0).abs() < 1e-12);
            assert!((b[[i, 1]] - a[[i, 1]] + 5.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_spring_rejects_bad_inputs() {
        let g = path3();
        let bad_dim = SpringOpts {
            dim: 4,
            ..SpringOpts::default()
        };
        assert!(matches!(
            fruchterman_reingold(g.adjacency(), &bad_dim),
            Err(GraphError::InvalidArgument(_))
        ));

        let bad_fixed = SpringOpts {
            fixed: vec![5],
            ..SpringOpts::default()
        };
        assert!(matches!(
            fruchterman_reingold(g.adjacency(), &bad_fixed),
            Err(GraphError::MalformedInput(_))
        ));

        let bad_initial = SpringOpts {
            initial: Some(Array2::zeros((2, 2))),
            ..SpringOpts::default()
        };
        assert!(matches!(
            fruchterman_reingold(g.adjacency(), &bad_initial),
            Err(GraphError::ShapeMismatch(_))
        ));
    }

    #[test]
    fn test_community_layout_centroid_scatter() {
        let mut g = Graph::from_dense(
            &array![
                [0.0, 1.0, 0.0, 0.0],
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
                [0.0, 0.0, 1.0, 0.0],
            ]
            .view(),
        )
        .unwrap();

        g.set_coordinates(Layout::Community2D {
            node_com: vec![0, 0, 1, 1],
            world_rad: Some(4.0),
            seed: Some(11),
        })
        .unwrap();

        let coords = g.coords().unwrap();
        assert_eq!(coords.dim(), (4, 2));
        // Every vertex lies within sqrt(community size) of its centroid
        let centroids = [
            (4.0 * (PI).cos(), 4.0 * (PI).sin()),
            (4.0 * (2.0 * PI).cos(), 4.0 * (2.0 * PI).sin()),
        ];
        for i in 0..4 {
            let c = centroids[if i < 2 { 0 } else { 1 }];
            let dist = ((coords[[i, 0]] - c.0).powi(2) + (coords[[i, 1]] - c.1).powi(2)).sqrt();
            assert!(dist <= 2.0_f64.sqrt() + 1e-9);
        }
    }

    #[test]
    fn test_community_layout_wrong_length() {
        let mut g = path3();
        assert!(matches!(
            g.set_coordinates(Layout::Community2D {
                node_com: vec![0, 1],
                world_rad: None,
                seed: None,
            }),
            Err(GraphError::MalformedInput(_))
        ));
    }
}
