//! Principal component analysis on a rolling return window.
//!
//! The decomposition works on a samples-by-features matrix (days x assets
//! here) and extracts the leading components of the feature covariance via
//! power iteration with deflation. Only the handful of leading components the
//! strategy retains are ever computed, so no full eigendecomposition is
//! needed.
//!
//! Determinism: the iteration always starts from the same uniform vector, so
//! identical input produces identical output. The sign of each component is
//! implementation-defined, which is harmless downstream because the sign
//! cancels between a factor score and its regression coefficient.

use ndarray::{Array1, Array2, Axis};

const POWER_MAX_ITER: usize = 100;
const POWER_TOL: f64 = 1e-10;

/// Fitted principal components of a data matrix.
#[derive(Debug, Clone)]
pub struct Pca {
    /// Retained components, features x k (eigenvectors as columns).
    components: Array2<f64>,
    /// Column means of the fitted data, used for centering.
    mean: Array1<f64>,
}

impl Pca {
    /// Fits a PCA on `data` (samples x features) retaining at most
    /// `n_components` leading components.
    ///
    /// The effective component count is clamped to
    /// `min(n_components, samples, features)`, mirroring the rank bound of
    /// the covariance.
    pub fn fit(data: &Array2<f64>, n_components: usize) -> Self {
        let (n_samples, n_features) = data.dim();
        let k = n_components.min(n_samples).min(n_features);

        let mean = data
            .mean_axis(Axis(0))
            .unwrap_or_else(|| Array1::zeros(n_features));
        let centered = data - &mean.view().insert_axis(Axis(0));

        let denom = if n_samples > 1 { n_samples - 1 } else { 1 } as f64;
        let cov = centered.t().dot(&centered) / denom;

        let mut components = Array2::zeros((n_features, k));
        let mut deflated = cov;
        for c in 0..k {
            let (eigenvalue, eigenvector) = power_iteration(&deflated);
            components.column_mut(c).assign(&eigenvector);

            // Deflate: A <- A - lambda v v^T
            for i in 0..n_features {
                for j in 0..n_features {
                    deflated[[i, j]] -= eigenvalue * eigenvector[i] * eigenvector[j];
                }
            }
        }

        Self { components, mean }
    }

    /// Number of retained components.
    pub fn n_components(&self) -> usize {
        self.components.ncols()
    }

    /// Projects `data` (samples x features) onto the retained components,
    /// yielding factor scores (samples x k).
    pub fn transform(&self, data: &Array2<f64>) -> Array2<f64> {
        let centered = data - &self.mean.view().insert_axis(Axis(0));
        centered.dot(&self.components)
    }
}

/// Leading eigenpair of a symmetric PSD matrix via power iteration.
///
/// Starts from a fixed uniform vector for reproducibility. On a (numerically)
/// zero matrix the eigenvalue collapses to 0 and the start vector is returned
/// unchanged, which downstream regression treats as a null factor.
fn power_iteration(matrix: &Array2<f64>) -> (f64, Array1<f64>) {
    let n = matrix.nrows();
    let mut v = Array1::from_elem(n, 1.0 / (n as f64).sqrt());
    let mut eigenvalue = 0.0;

    for _ in 0..POWER_MAX_ITER {
        let mut next = matrix.dot(&v);

        // Rayleigh quotient with the previous (unit) vector
        let next_eigenvalue: f64 = v.dot(&next);

        let norm = next.dot(&next).sqrt();
        if norm > POWER_TOL {
            next /= norm;
        }

        if (next_eigenvalue - eigenvalue).abs() < POWER_TOL {
            return (next_eigenvalue, next);
        }

        eigenvalue = next_eigenvalue;
        v = next;
    }

    (eigenvalue, v)
}
