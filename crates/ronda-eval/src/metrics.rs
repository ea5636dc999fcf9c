//! Performance metrics over daily-return series.
//!
//! Pure, stateless functions characterizing an equity curve: compounded
//! cumulative returns, annualized return and volatility, and the Sharpe
//! ratio. Undefined entries are ignored rather than propagated, and a Sharpe
//! ratio over a zero-volatility series is reported as `NaN` (a sentinel, not
//! an error).

use ronda_traits::stats::{nan_mean, nan_std};

/// Convert daily simple returns into compounded cumulative returns.
///
/// `cumulative[t] = prod_{i<=t} (1 + returns[i]) - 1`. Non-finite entries
/// contribute a factor of 1 (a zero return), so one undefined day never
/// poisons the rest of the curve.
///
/// # Example
///
/// ```
/// use ronda_eval::compound;
///
/// let cum = compound(&[0.10, -0.05]);
/// assert!((cum[1] - (1.10 * 0.95 - 1.0)).abs() < 1e-12);
/// ```
pub fn compound(returns: &[f64]) -> Vec<f64> {
    let mut cum = Vec::with_capacity(returns.len());
    let mut acc = 1.0;
    for &r in returns {
        if r.is_finite() {
            acc *= 1.0 + r;
        }
        cum.push(acc - 1.0);
    }
    cum
}

/// Annualized return: mean of the finite daily returns times `periods_per_year`.
pub fn annualized_return(returns: &[f64], periods_per_year: usize) -> f64 {
    nan_mean(returns) * periods_per_year as f64
}

/// Annualized volatility: population standard deviation of the finite daily
/// returns times the square root of `periods_per_year`.
pub fn annualized_volatility(returns: &[f64], periods_per_year: usize) -> f64 {
    nan_std(returns) * (periods_per_year as f64).sqrt()
}

/// Sharpe ratio from daily simple returns.
///
/// `rf` is the annualized risk-free rate. Returns `NaN` when the annualized
/// volatility is exactly zero; callers must treat that as "undefined", not as
/// a failure.
pub fn sharpe(returns: &[f64], rf: f64, periods_per_year: usize) -> f64 {
    let ann_ret = annualized_return(returns, periods_per_year);
    let ann_vol = annualized_volatility(returns, periods_per_year);
    if ann_vol == 0.0 {
        return f64::NAN;
    }
    (ann_ret - rf) / ann_vol
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_compound_first_entry() {
        let cum = compound(&[0.02, 0.01]);
        assert_relative_eq!(cum[0], 0.02, epsilon = 1e-12);
    }

    #[test]
    fn test_compound_round_trip() {
        // Decompounding the cumulative curve must recover the inputs exactly.
        let returns = vec![0.01, -0.02, 0.03, 0.0, -0.015, 0.007];
        let cum = compound(&returns);

        assert_relative_eq!(cum[0], returns[0], epsilon = 1e-12);
        for t in 1..returns.len() {
            let recovered = (1.0 + cum[t]) / (1.0 + cum[t - 1]) - 1.0;
            assert_relative_eq!(recovered, returns[t], epsilon = 1e-10);
        }
    }

    #[test]
    fn test_compound_ignores_undefined() {
        let cum = compound(&[0.10, f64::NAN, 0.10]);
        assert_relative_eq!(cum[1], 0.10, epsilon = 1e-12);
        assert_relative_eq!(cum[2], 1.10 * 1.10 - 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_annualized_return() {
        let returns = vec![0.001; 10];
        assert_relative_eq!(annualized_return(&returns, 252), 0.252, epsilon = 1e-12);
    }

    #[test]
    fn test_annualized_volatility_population() {
        // nanstd uses ddof=0
        let returns = vec![0.01, -0.01];
        assert_relative_eq!(
            annualized_volatility(&returns, 252),
            0.01 * 252f64.sqrt(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_sharpe_basic() {
        let returns = vec![0.01, -0.005, 0.015, 0.002, -0.003];
        let s = sharpe(&returns, 0.0, 252);
        assert!(s.is_finite());
        assert_relative_eq!(
            s,
            annualized_return(&returns, 252) / annualized_volatility(&returns, 252),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_sharpe_zero_volatility_is_undefined() {
        let returns = vec![0.0, 0.0, 0.0];
        assert!(sharpe(&returns, 0.0, 252).is_nan());

        // Constant nonzero return also has zero volatility
        let constant = vec![0.01; 5];
        assert!(sharpe(&constant, 0.0, 252).is_nan());
    }

    #[test]
    fn test_sharpe_risk_free_rate() {
        let returns = vec![0.01, -0.005, 0.015, 0.002, -0.003];
        let excess = sharpe(&returns, 0.05, 252);
        let raw = sharpe(&returns, 0.0, 252);
        assert!(excess < raw);
    }
}
