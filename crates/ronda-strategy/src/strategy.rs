//! Walk-forward PCA trend strategy.
//!
//! For every date past the warm-up period the generator re-fits a factor
//! model on the trailing return window and converts the cross-section of
//! fitted cumulative returns into -1/0/+1 position signals:
//!
//! 1. Take the trailing `lookback` rows of daily returns (exclusive of the
//!    decision date).
//! 2. Keep only assets with a fully populated window; everything else is
//!    flat for that date.
//! 3. Extract the leading `num_factors` principal components as factor time
//!    series and prepend an intercept.
//! 4. Regress each surviving asset's window returns on the shared factor
//!    basis (independent OLS fits, one per asset).
//! 5. Rank assets by the sum of their fitted returns; short the bottom
//!    `top_n`, long the top `top_n`.
//!
//! The loop over dates is strictly sequential (each step reads only history),
//! while the per-asset regressions inside one step fan out across a rayon
//! pool and are merged back in asset order, so output never depends on
//! scheduling.

use ndarray::{Array1, Array2, s};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use ronda_traits::{Panel, Result, RondaError};

use crate::ols::{NormalEquations, with_intercept};
use crate::pca::Pca;

/// Strategy hyperparameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StrategyConfig {
    /// Trailing window length in trading days.
    pub lookback: usize,
    /// Number of principal components retained as factors.
    pub num_factors: usize,
    /// Number of assets held on each side (long and short).
    pub top_n: usize,
    /// Whether to fan the per-asset regressions out across a thread pool.
    /// Irrelevant to correctness; results are merged in asset order.
    pub parallel: bool,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            lookback: 252,
            num_factors: 5,
            top_n: 50,
            parallel: true,
        }
    }
}

/// Generates a -1/0/+1 position panel from a price panel.
///
/// Positions at date t are the holdings decided at t; the backtest engine
/// applies them to date t+1's returns. The first `lookback + 1` rows are
/// always flat (warm-up), as is any date on which fewer than two assets have
/// a complete window.
///
/// # Errors
///
/// - [`RondaError::InvalidData`] when a config parameter is zero.
/// - [`RondaError::InsufficientData`] when the panel has fewer than
///   `lookback + 2` rows.
///
/// # Example
///
/// ```rust,ignore
/// use ronda_strategy::{StrategyConfig, generate_positions};
///
/// let cfg = StrategyConfig { lookback: 60, num_factors: 3, top_n: 10, parallel: true };
/// let positions = generate_positions(&prices, &cfg)?;
/// ```
pub fn generate_positions(prices: &Panel, config: &StrategyConfig) -> Result<Panel> {
    if config.lookback == 0 || config.num_factors == 0 || config.top_n == 0 {
        return Err(RondaError::InvalidData(
            "lookback, num_factors, and top_n must all be at least 1".to_string(),
        ));
    }
    if prices.n_dates() < config.lookback + 2 {
        return Err(RondaError::InsufficientData(format!(
            "need at least {} rows for lookback {}, got {}",
            config.lookback + 2,
            config.lookback,
            prices.n_dates()
        )));
    }

    let prices = prices.sorted_by_date().ffill();
    let daily_ret = prices.simple_returns();
    let ret = daily_ret.values();
    let n_dates = prices.n_dates();
    let n_assets = prices.n_assets();

    let mut positions = prices.zeros_like();

    for t in (config.lookback + 1)..n_dates {
        // Trailing window of returns, exclusive of the decision date
        let window = ret.slice(s![t - config.lookback..t, ..]);

        // Local index within the window <-> original column index
        let survivors: Vec<usize> = (0..n_assets)
            .filter(|&a| window.column(a).iter().all(|v| v.is_finite()))
            .collect();

        // Degenerate window: skip this date, never abort the run
        if survivors.len() < 2 {
            continue;
        }

        let mut r = Array2::zeros((config.lookback, survivors.len()));
        for (local, &a) in survivors.iter().enumerate() {
            r.column_mut(local).assign(&window.column(a));
        }

        let Some(scores) = rank_scores(&r, config) else {
            continue;
        };

        let mut order: Vec<usize> = (0..survivors.len()).collect();
        order.sort_by(|&a, &b| {
            scores[a]
                .partial_cmp(&scores[b])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        // Symmetric sides: when 2*top_n exceeds the surviving cross-section
        // the slices are shrunk so long and short never overlap.
        let effective_n = config.top_n.min(survivors.len() / 2);
        let values = positions.values_mut();
        for &local in order.iter().take(effective_n) {
            values[[t, survivors[local]]] = -1.0;
        }
        for &local in order.iter().rev().take(effective_n) {
            values[[t, survivors[local]]] = 1.0;
        }
    }

    Ok(positions)
}

/// Cumulative expected return per surviving asset for one window step.
///
/// `r` is days x assets with no missing values. Returns `None` when the
/// factor basis cannot be factored, which the caller treats as a skipped
/// step.
fn rank_scores(r: &Array2<f64>, config: &StrategyConfig) -> Option<Array1<f64>> {
    let pca = Pca::fit(r, config.num_factors);
    let factors = pca.transform(r);
    let design = with_intercept(&factors);

    let ne = NormalEquations::new(&design).ok()?;

    let fit_one = |local: usize| -> f64 {
        let y = r.column(local).to_owned();
        match ne.solve(&y) {
            // Sum of in-sample fitted returns
            Ok(beta) => design.dot(&beta).sum(),
            Err(_) => f64::NEG_INFINITY,
        }
    };

    let scores: Vec<f64> = if config.parallel {
        (0..r.ncols()).into_par_iter().map(fit_one).collect()
    } else {
        (0..r.ncols()).map(fit_one).collect()
    };

    Some(Array1::from_vec(scores))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use ronda_traits::{Date, Symbol};

    fn dates(n: usize) -> Vec<Date> {
        (0..n)
            .map(|i| Date::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(i as i64))
            .collect()
    }

    fn symbols(names: &[&str]) -> Vec<Symbol> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn small_config() -> StrategyConfig {
        StrategyConfig {
            lookback: 2,
            num_factors: 1,
            top_n: 1,
            parallel: false,
        }
    }

    /// 3 assets, 5 days: A trending up, B flattish, C trending down.
    fn trending_panel() -> Panel {
        Panel::new(
            dates(5),
            symbols(&["A", "B", "C"]),
            array![
                [100.0, 100.0, 100.0],
                [101.0, 100.0, 99.0],
                [103.0, 99.0, 97.0],
                [106.0, 99.0, 96.0],
                [110.0, 98.0, 94.0]
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_rejects_zero_parameters() {
        let prices = trending_panel();
        let cfg = StrategyConfig {
            top_n: 0,
            ..small_config()
        };
        assert!(matches!(
            generate_positions(&prices, &cfg),
            Err(RondaError::InvalidData(_))
        ));
    }

    #[test]
    fn test_insufficient_rows() {
        let prices = Panel::new(
            dates(3),
            symbols(&["A", "B"]),
            array![[1.0, 2.0], [1.1, 2.1], [1.2, 2.2]],
        )
        .unwrap();
        let cfg = StrategyConfig {
            lookback: 2,
            ..small_config()
        };
        assert!(matches!(
            generate_positions(&prices, &cfg),
            Err(RondaError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_warmup_rows_are_flat() {
        // Scenario A: exactly the first lookback + 1 rows carry no positions.
        let positions = generate_positions(&trending_panel(), &small_config()).unwrap();
        let v = positions.values();

        for t in 0..3 {
            for a in 0..3 {
                assert_eq!(v[[t, a]], 0.0, "row {t} should be flat");
            }
        }
        for t in 3..5 {
            assert!((0..3).any(|a| v[[t, a]] != 0.0), "row {t} should trade");
        }
    }

    #[test]
    fn test_trend_ranking_longs_winner_shorts_loser() {
        // With an intercept in the fit, the sum of fitted returns equals the
        // trailing window return, so the long leg is the best trailing
        // performer and the short leg the worst.
        let positions = generate_positions(&trending_panel(), &small_config()).unwrap();
        let v = positions.values();

        for t in 3..5 {
            assert_eq!(v[[t, 0]], 1.0, "A is the trailing winner at row {t}");
            assert_eq!(v[[t, 1]], 0.0);
            assert_eq!(v[[t, 2]], -1.0, "C is the trailing loser at row {t}");
        }
    }

    #[test]
    fn test_positions_are_reproducible() {
        let prices = trending_panel();
        let a = generate_positions(&prices, &small_config()).unwrap();
        let b = generate_positions(&prices, &small_config()).unwrap();
        assert_eq!(a.values(), b.values());
    }

    #[test]
    fn test_parallel_matches_serial() {
        let prices = trending_panel();
        let serial = generate_positions(&prices, &small_config()).unwrap();
        let parallel = generate_positions(
            &prices,
            &StrategyConfig {
                parallel: true,
                ..small_config()
            },
        )
        .unwrap();
        assert_eq!(serial.values(), parallel.values());
    }

    #[test]
    fn test_ranking_sides_never_overlap() {
        // top_n larger than half the cross-section: both sides shrink to
        // min(top_n, survivors / 2) and stay disjoint.
        let cfg = StrategyConfig {
            top_n: 5,
            ..small_config()
        };
        let positions = generate_positions(&trending_panel(), &cfg).unwrap();
        let v = positions.values();

        for t in 3..5 {
            let longs = (0..3).filter(|&a| v[[t, a]] == 1.0).count();
            let shorts = (0..3).filter(|&a| v[[t, a]] == -1.0).count();
            // min(5, 3 / 2) = 1 per side
            assert_eq!(longs, 1);
            assert_eq!(shorts, 1);
            assert!((0..3).all(|a| v[[t, a]].abs() <= 1.0));
        }
    }

    #[test]
    fn test_incomplete_window_asset_is_flat() {
        // D has no prices until row 2; every window overlaps its leading gap,
        // so it never receives a position while the others still trade.
        let prices = Panel::new(
            dates(5),
            symbols(&["A", "B", "C", "D"]),
            array![
                [100.0, 100.0, 100.0, f64::NAN],
                [101.0, 100.0, 99.0, f64::NAN],
                [103.0, 99.0, 97.0, 50.0],
                [106.0, 99.0, 96.0, 51.0],
                [110.0, 98.0, 94.0, 52.0]
            ],
        )
        .unwrap();

        let positions = generate_positions(&prices, &small_config()).unwrap();
        let v = positions.values();

        for t in 0..5 {
            assert_eq!(v[[t, 3]], 0.0, "D must stay flat at row {t}");
        }
        assert!((0..4).any(|a| v[[3, a]] != 0.0));
    }

    #[test]
    fn test_degenerate_window_skips_without_failing() {
        // Only one asset ever has complete data: every step is skipped and
        // the run still succeeds with an all-flat panel.
        let prices = Panel::new(
            dates(5),
            symbols(&["A", "B"]),
            array![
                [100.0, f64::NAN],
                [101.0, f64::NAN],
                [103.0, f64::NAN],
                [106.0, f64::NAN],
                [110.0, f64::NAN]
            ],
        )
        .unwrap();

        let positions = generate_positions(&prices, &small_config()).unwrap();
        assert!(positions.values().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_output_keys_match_input() {
        let prices = trending_panel();
        let positions = generate_positions(&prices, &small_config()).unwrap();
        assert!(prices.same_keys(&positions));
    }
}
