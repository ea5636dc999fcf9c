//! Vectorized backtest engine for position panels.
//!
//! The engine turns a price panel and a -1/0/+1 position panel into a daily
//! portfolio-return series under explicit capital-normalization rules:
//!
//! - Positions are signals, not dollar weights; the capital exposed on day t
//!   is the gross exposure `sum(|positions[t-1]|)`.
//! - Positions are lagged by one period before being applied, so the holding
//!   decided on day t-1 is the one exposed to day t's return (look-ahead
//!   avoidance).
//! - A zero-capital day produces a daily return of exactly 0, never an
//!   undefined value.

use serde::{Deserialize, Serialize};

use ronda_traits::{Date, Panel, Result, RondaError};

use crate::drawdown::max_drawdown;
use crate::metrics::{annualized_return, annualized_volatility, compound, sharpe};

/// Backtest configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BacktestConfig {
    /// Trading periods per year used for annualization.
    pub periods_per_year: usize,
    /// Annualized risk-free rate used in the Sharpe ratio.
    pub risk_free_rate: f64,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            periods_per_year: 252,
            risk_free_rate: 0.0,
        }
    }
}

/// Result bundle of a single backtest run. Immutable once constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestResult {
    /// Row keys of the input panels, ascending.
    pub dates: Vec<Date>,
    /// Daily portfolio returns, one per input row.
    pub daily_returns: Vec<f64>,
    /// Compounded cumulative returns derived from `daily_returns`.
    pub cum_returns: Vec<f64>,
    /// Annualized return.
    pub ann_return: f64,
    /// Annualized volatility.
    pub ann_vol: f64,
    /// Annualized Sharpe ratio (`NaN` when volatility is zero).
    pub sharpe: f64,
    /// Maximum drawdown (<= 0).
    pub max_drawdown: f64,
    /// Maximum drawdown duration in periods.
    pub max_drawdown_duration: usize,
    /// Index of the first occurrence of the maximum drawdown.
    pub max_dd_index: usize,
}

/// Backtest a position panel against a price panel.
///
/// Shorthand for [`backtest_with_config`] with the default 252 periods per
/// year and a zero risk-free rate.
pub fn backtest(
    prices: &Panel,
    positions: &Panel,
    periods_per_year: usize,
) -> Result<BacktestResult> {
    backtest_with_config(
        prices,
        positions,
        &BacktestConfig {
            periods_per_year,
            risk_free_rate: 0.0,
        },
    )
}

/// Backtest a position panel against a price panel.
///
/// Both panels must share identical row and column keys in identical order.
/// The price panel is defensively re-sorted and forward-filled before daily
/// returns are computed; positions are lagged by one row, the first lagged
/// row being flat.
///
/// # Errors
///
/// Returns [`RondaError::ShapeMismatch`] when the two panels disagree on
/// their keys.
///
/// # Example
///
/// ```ignore
/// let result = backtest_with_config(&prices, &positions, &BacktestConfig::default())?;
/// println!("Sharpe: {:.2}", result.sharpe);
/// ```
pub fn backtest_with_config(
    prices: &Panel,
    positions: &Panel,
    config: &BacktestConfig,
) -> Result<BacktestResult> {
    if !prices.same_keys(positions) {
        return Err(RondaError::ShapeMismatch(
            "prices and positions must have the same row and column keys".to_string(),
        ));
    }

    let prices = prices.sorted_by_date().ffill();
    let positions = positions.sorted_by_date();
    let daily_ret = prices.simple_returns();

    let n_dates = prices.n_dates();
    let n_assets = prices.n_assets();
    let ret = daily_ret.values();
    let pos = positions.values();

    let mut daily_returns = Vec::with_capacity(n_dates);
    for t in 0..n_dates {
        // Lag-by-one: day t is exposed to the position decided on day t-1.
        if t == 0 {
            daily_returns.push(0.0);
            continue;
        }

        let mut capital = 0.0;
        let mut pnl = 0.0;
        for a in 0..n_assets {
            let p = pos[[t - 1, a]];
            if !p.is_finite() {
                continue;
            }
            capital += p.abs();
            let r = ret[[t, a]];
            if r.is_finite() {
                pnl += p * r;
            }
        }

        // ZeroCapitalDay contract: flat book means exactly 0, never NaN.
        let day_ret = if capital == 0.0 { 0.0 } else { pnl / capital };
        daily_returns.push(if day_ret.is_finite() { day_ret } else { 0.0 });
    }

    let cum_returns = compound(&daily_returns);
    let ann_return = annualized_return(&daily_returns, config.periods_per_year);
    let ann_vol = annualized_volatility(&daily_returns, config.periods_per_year);
    let sharpe_ratio = sharpe(
        &daily_returns,
        config.risk_free_rate,
        config.periods_per_year,
    );
    let dd = max_drawdown(&cum_returns);

    Ok(BacktestResult {
        dates: prices.dates().to_vec(),
        daily_returns,
        cum_returns,
        ann_return,
        ann_vol,
        sharpe: sharpe_ratio,
        max_drawdown: dd.max_drawdown,
        max_drawdown_duration: dd.max_duration,
        max_dd_index: dd.trough_index,
    })
}
