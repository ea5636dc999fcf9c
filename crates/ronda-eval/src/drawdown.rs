//! Maximum drawdown and drawdown duration.
//!
//! Both statistics are computed from a compounded cumulative-return series in
//! a single causal forward pass: each value depends only on the previous one,
//! with no global optimization. The high-water mark is seeded at 0, so the
//! first observation always has drawdown 0 by construction, and the duration
//! counter resets the instant drawdown returns to exactly 0.

use serde::{Deserialize, Serialize};

/// Summary statistics of the deepest drawdown in a cumulative-return series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawdownStats {
    /// Most negative drawdown observed (always <= 0).
    pub max_drawdown: f64,
    /// Longest run of consecutive periods spent below the high-water mark.
    pub max_duration: usize,
    /// Index of the first occurrence of the deepest drawdown.
    pub trough_index: usize,
}

/// Computes the full drawdown and drawdown-duration curves.
///
/// For t >= 1: `hwm[t] = max(hwm[t-1], cumulative[t])` with `hwm[0] = 0`, and
/// `drawdown[t] = (1 + cumulative[t]) / (1 + hwm[t]) - 1`. Duration is 0
/// wherever the drawdown is exactly 0 and otherwise increments from the prior
/// period. A drawdown of exactly 0.0 resets the counter even on a day where
/// the series is otherwise flat.
pub fn drawdown_curve(cumulative: &[f64]) -> (Vec<f64>, Vec<usize>) {
    let n = cumulative.len();
    let mut drawdown = vec![0.0; n];
    let mut duration = vec![0usize; n];
    let mut hwm: f64 = 0.0;

    for t in 1..n {
        hwm = hwm.max(cumulative[t]);
        drawdown[t] = (1.0 + cumulative[t]) / (1.0 + hwm) - 1.0;
        duration[t] = if drawdown[t] == 0.0 {
            0
        } else {
            duration[t - 1] + 1
        };
    }

    (drawdown, duration)
}

/// Computes maximum drawdown, maximum drawdown duration, and the trough index
/// from a compounded cumulative-return series.
///
/// An empty series yields all-zero statistics.
///
/// # Example
///
/// ```
/// use ronda_eval::max_drawdown;
///
/// let stats = max_drawdown(&[0.0, 0.10, -0.05, 0.02, 0.12]);
/// assert!(stats.max_drawdown < 0.0);
/// assert_eq!(stats.trough_index, 2);
/// ```
pub fn max_drawdown(cumulative: &[f64]) -> DrawdownStats {
    if cumulative.is_empty() {
        return DrawdownStats {
            max_drawdown: 0.0,
            max_duration: 0,
            trough_index: 0,
        };
    }

    let (drawdown, duration) = drawdown_curve(cumulative);

    // First occurrence of the minimum wins under ties.
    let mut max_dd = drawdown[0];
    let mut trough_index = 0;
    for (t, &dd) in drawdown.iter().enumerate() {
        if dd < max_dd {
            max_dd = dd;
            trough_index = t;
        }
    }

    let max_duration = duration.iter().copied().max().unwrap_or(0);

    DrawdownStats {
        max_drawdown: max_dd,
        max_duration,
        trough_index,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_flat_series_has_no_drawdown() {
        let cumulative = vec![0.0; 6];
        let stats = max_drawdown(&cumulative);
        assert_relative_eq!(stats.max_drawdown, 0.0);
        assert_eq!(stats.max_duration, 0);
        assert_eq!(stats.trough_index, 0);
    }

    #[test]
    fn test_monotone_rise_has_no_drawdown() {
        let cumulative = vec![0.0, 0.01, 0.03, 0.07, 0.11];
        let (drawdown, duration) = drawdown_curve(&cumulative);
        assert!(drawdown.iter().all(|&d| d == 0.0));
        assert!(duration.iter().all(|&d| d == 0));
    }

    #[test]
    fn test_drawdown_is_never_positive() {
        let cumulative = vec![0.0, 0.05, -0.02, 0.08, 0.01, 0.12, 0.03];
        let (drawdown, _) = drawdown_curve(&cumulative);
        assert!(drawdown.iter().all(|&d| d <= 0.0));
    }

    #[test]
    fn test_drawdown_zero_at_high_water_mark() {
        let cumulative = vec![0.0, 0.05, 0.02, 0.08];
        let (drawdown, _) = drawdown_curve(&cumulative);
        // New highs at t=1 and t=3
        assert_relative_eq!(drawdown[1], 0.0);
        assert_relative_eq!(drawdown[3], 0.0);
        assert!(drawdown[2] < 0.0);
    }

    #[test]
    fn test_duration_resets_on_recovery() {
        // Peak at t=1, underwater t=2..3, recovered at t=4
        let cumulative = vec![0.0, 0.10, 0.05, 0.07, 0.10];
        let (drawdown, duration) = drawdown_curve(&cumulative);

        assert_eq!(duration[1], 0);
        assert_eq!(duration[2], 1);
        assert_eq!(duration[3], 2);
        // Exactly re-reaching the high-water mark resets the counter
        assert_relative_eq!(drawdown[4], 0.0);
        assert_eq!(duration[4], 0);
    }

    #[test]
    fn test_duration_monotonic_reset_property() {
        let cumulative = vec![0.0, 0.02, -0.01, -0.03, 0.01, 0.02, 0.05, 0.04];
        let (drawdown, duration) = drawdown_curve(&cumulative);

        for t in 1..cumulative.len() {
            if drawdown[t] == 0.0 {
                assert_eq!(duration[t], 0);
            } else {
                assert_eq!(duration[t], duration[t - 1] + 1);
            }
        }
    }

    #[test]
    fn test_trough_and_depth() {
        let cumulative = vec![0.0, 0.20, -0.10, 0.05, 0.20];
        let stats = max_drawdown(&cumulative);

        assert_eq!(stats.trough_index, 2);
        assert_relative_eq!(stats.max_drawdown, 0.90 / 1.20 - 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_tie_takes_first_occurrence() {
        // Two equally deep troughs relative to the same high-water mark
        let cumulative = vec![0.0, 0.10, 0.02, 0.10, 0.02];
        let stats = max_drawdown(&cumulative);
        assert_eq!(stats.trough_index, 2);
    }

    #[test]
    fn test_initial_high_water_mark_is_zero() {
        // A first observation above zero never enters the high-water mark,
        // so a later fall is only measured against subsequent highs.
        let cumulative = vec![0.50, 0.10, 0.10];
        let (drawdown, _) = drawdown_curve(&cumulative);
        assert_relative_eq!(drawdown[0], 0.0);
        assert_relative_eq!(drawdown[1], 0.0);
        assert_relative_eq!(drawdown[2], 0.0);
    }

    #[test]
    fn test_empty_series() {
        let stats = max_drawdown(&[]);
        assert_relative_eq!(stats.max_drawdown, 0.0);
        assert_eq!(stats.max_duration, 0);
        assert_eq!(stats.trough_index, 0);
    }
}
