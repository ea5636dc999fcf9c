//! Statistical utility functions shared across the framework.
//!
//! These helpers mirror the NaN-ignoring semantics of the metrics layer:
//! undefined entries are excluded from the computation rather than poisoning
//! the result.

use ndarray::{Array2, ArrayView2};

/// Mean of the finite entries of `values`.
///
/// Returns `NaN` if no finite entry exists.
///
/// # Example
///
/// ```
/// use ronda_traits::stats::nan_mean;
///
/// let values = vec![1.0, f64::NAN, 3.0];
/// assert!((nan_mean(&values) - 2.0).abs() < 1e-12);
/// ```
pub fn nan_mean(values: &[f64]) -> f64 {
    let mut sum = 0.0;
    let mut n = 0usize;
    for &v in values {
        if v.is_finite() {
            sum += v;
            n += 1;
        }
    }
    if n == 0 { f64::NAN } else { sum / n as f64 }
}

/// Population standard deviation (ddof = 0) of the finite entries of `values`.
///
/// Divides by N, not N-1. Returns `NaN` if no finite entry exists.
pub fn nan_std(values: &[f64]) -> f64 {
    let mean = nan_mean(values);
    if mean.is_nan() {
        return f64::NAN;
    }

    let mut sum_sq = 0.0;
    let mut n = 0usize;
    for &v in values {
        if v.is_finite() {
            sum_sq += (v - mean).powi(2);
            n += 1;
        }
    }
    (sum_sq / n as f64).sqrt()
}

/// Pairwise sample covariance (ddof = 1) of the columns of `data`.
///
/// For each pair of columns only the rows where both entries are finite
/// contribute (pairwise deletion). A pair with fewer than two shared
/// observations gets `NaN`.
pub fn nan_covariance(data: ArrayView2<'_, f64>) -> Array2<f64> {
    let n_cols = data.ncols();
    let mut cov = Array2::from_elem((n_cols, n_cols), f64::NAN);

    for j in 0..n_cols {
        for k in j..n_cols {
            let mut sum_j = 0.0;
            let mut sum_k = 0.0;
            let mut n = 0usize;
            for row in data.outer_iter() {
                if row[j].is_finite() && row[k].is_finite() {
                    sum_j += row[j];
                    sum_k += row[k];
                    n += 1;
                }
            }
            if n < 2 {
                continue;
            }
            let mean_j = sum_j / n as f64;
            let mean_k = sum_k / n as f64;

            let mut acc = 0.0;
            for row in data.outer_iter() {
                if row[j].is_finite() && row[k].is_finite() {
                    acc += (row[j] - mean_j) * (row[k] - mean_k);
                }
            }
            let c = acc / (n - 1) as f64;
            cov[[j, k]] = c;
            cov[[k, j]] = c;
        }
    }
    cov
}
