//! Largest-eigenvalue estimation for the graph Laplacian
//!
//! The estimate trades accuracy for speed: a short power iteration with a
//! loose tolerance, inflated by 1% for conservativeness. An exact value
//! comes from an external eigendecomposition and can be installed with
//! [`Graph::set_lmax`]. When the iterative solver fails to converge the
//! estimator falls back to `2 × max(degree)`, a valid analytic upper
//! bound for combinatorial Laplacians; the failure is recovered locally
//! and never surfaces to the caller.

use crate::error::{GraphError, GraphResult};
use crate::graph::Graph;
use grasp_sparse::eigensolvers::power_iteration;
use grasp_sparse::CsrMatrix;
use scirs2_core::ndarray_ext::Array1;

/// Iteration budget for the fast estimate
const LMAX_MAX_ITER: usize = 100;

/// Loose residual tolerance for the fast estimate
const LMAX_TOL: f64 = 5e-3;

impl Graph {
    /// Estimate the largest eigenvalue of the held Laplacian
    ///
    /// The result is memoized; pass `recompute = true` to force
    /// re-evaluation. Infallible: convergence failure degrades to the
    /// analytic bound.
    ///
    /// # Examples
    ///
    /// ```
    /// use grasp_graph::Graph;
    /// use scirs2_core::ndarray_ext::array;
    ///
    /// // Path graph P3: Laplacian spectrum {0, 1, 3}
    /// let w = array![[0.0, 1.0, 0.0], [1.0, 0.0, 1.0], [0.0, 1.0, 0.0]];
    /// let g = Graph::from_dense(&w.view()).unwrap();
    ///
    /// let lmax = g.estimate_lmax(false);
    /// assert!(lmax >= 2.99); // intentionally inflated above the true 3.0
    /// assert!(lmax <= 4.0);  // and below the analytic 2*max(degree) bound + 1%
    /// ```
    pub fn estimate_lmax(&self, recompute: bool) -> f64 {
        if !recompute {
            if let Some(lmax) = self.lmax.get() {
                return lmax;
            }
        }

        let lmax = estimate(&self.laplacian, &self.degree, LMAX_MAX_ITER, LMAX_TOL);
        self.lmax.set(Some(lmax));
        lmax
    }

    /// The largest eigenvalue of the Laplacian, estimating on first touch
    ///
    /// Warns when the value has to be estimated on the fly; call
    /// [`Graph::estimate_lmax`] or [`Graph::set_lmax`] beforehand to
    /// suppress the warning.
    pub fn lmax(&self) -> f64 {
        if self.lmax.get().is_none() {
            log::warn!(
                "the largest eigenvalue is not available and will be estimated; \
                 call estimate_lmax() or set_lmax() beforehand to suppress this warning"
            );
        }
        self.estimate_lmax(false)
    }

    /// Install an externally computed exact largest eigenvalue
    ///
    /// Overrides the estimate; cleared again only by `replace_weights` or
    /// `estimate_lmax(true)`.
    pub fn set_lmax(&self, lmax: f64) {
        self.lmax.set(Some(lmax));
    }
}

/// Fast upper-bound estimate with analytic fallback
pub(crate) fn estimate(
    laplacian: &CsrMatrix<f64>,
    degree: &Array1<f64>,
    max_iter: usize,
    tol: f64,
) -> f64 {
    match dominant_eigenvalue(laplacian, max_iter, tol) {
        // For robustness purposes, increase the estimate by 1 percent
        Ok(lambda) => 1.01 * lambda,
        Err(err) => {
            log::warn!("cannot use the iterative estimate ({err}); falling back to 2*max(degree)");
            2.0 * degree.iter().fold(0.0_f64, |acc, &d| acc.max(d))
        }
    }
}

fn dominant_eigenvalue(laplacian: &CsrMatrix<f64>, max_iter: usize, tol: f64) -> GraphResult<f64> {
    let (lambda, _vector, info) = power_iteration(laplacian, None, max_iter, tol)?;
    if !info.converged {
        return Err(GraphError::Convergence {
            iterations: info.iterations,
        });
    }
    Ok(lambda)
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
    fn test_estimate_bounds_known_spectrum() {
        // P3 Laplacian eigenvalues are {0, 1, 3}
        let g = path3();
        let lmax = g.estimate_lmax(false);
        assert!(lmax >= 2.99, "estimate {lmax} fell below the true maximum");
        assert!(lmax <= 1.01 * 4.0, "estimate {lmax} above the inflated analytic bound");
    }

    #[test]
    fn test_estimate_is_memoized() {
        let g = path3();
        assert!(g.lmax_cached().is_none());
        let first = g.estimate_lmax(false);
        assert_eq!(g.lmax_cached(), Some(first));
        assert_eq!(g.estimate_lmax(false), first);
    }

    #[test]
    fn test_set_lmax_overrides_and_recompute_clears() {
        let g = path3();
        g.set_lmax(3.0);
        assert_eq!(g.lmax(), 3.0);
        let recomputed = g.estimate_lmax(true);
        assert!(recomputed >= 2.99);
        assert_ne!(recomputed, 3.0);
    }

    #[test]
    fn test_fallback_is_twice_max_degree() {
        let g = path3();
        // A zero-iteration budget cannot converge, forcing the fallback
        let lmax = estimate(g.laplacian(), g.degree(), 0, 1e-6);
        assert_eq!(lmax, 4.0); // 2 * max degree, max degree = 2
    }

    #[test]
    fn test_edgeless_graph_estimates_zero() {
        let g = Graph::from_weights(grasp_sparse::CsrMatrix::<f64>::zeros((3, 3))).unwrap();
        // The zero Laplacian kills the power iteration; the analytic
        // bound over an all-zero degree vector is 0
        assert_eq!(g.estimate_lmax(false), 0.0);
    }
}
