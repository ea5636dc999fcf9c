//! Mean-variance portfolio optimization.
//!
//! Closed-form solutions of the equality-constrained Markowitz problems
//! (weights sum to 1, optionally hitting a target expected return). All
//! solves go through the shared Cholesky factorization; a covariance matrix
//! that is not positive definite surfaces as a named fatal error, distinct
//! from dimension or parameter violations.

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use ronda_traits::linalg::solve_spd;
use ronda_traits::{Result, RondaError};

/// Expected portfolio return for weights `w` and expected returns `mu`.
pub fn portfolio_return(w: &Array1<f64>, mu: &Array1<f64>) -> f64 {
    w.dot(mu)
}

/// Portfolio standard deviation for weights `w` and covariance `cov`.
pub fn portfolio_volatility(w: &Array1<f64>, cov: &Array2<f64>) -> f64 {
    w.dot(&cov.dot(w)).sqrt()
}

fn check_cov(cov: &Array2<f64>) -> Result<usize> {
    let n = cov.nrows();
    if cov.ncols() != n || n == 0 {
        return Err(RondaError::InvalidData(format!(
            "covariance must be square and non-empty, got {}x{}",
            cov.nrows(),
            cov.ncols()
        )));
    }
    Ok(n)
}

/// Global minimum variance portfolio weights.
///
/// Solves `min w' cov w` subject to `sum(w) = 1`; the closed form is
/// `cov^-1 1` normalized.
///
/// # Errors
///
/// [`RondaError::NotPositiveDefinite`] when `cov` cannot be factored;
/// [`RondaError::InvalidData`] when it is not square.
pub fn global_min_variance(cov: &Array2<f64>) -> Result<Array1<f64>> {
    let n = check_cov(cov)?;
    let x = solve_spd(cov, &Array1::ones(n))?;
    let total = x.sum();
    Ok(x / total)
}

/// Tangency (maximum Sharpe ratio) portfolio weights.
///
/// The closed form is `cov^-1 (mu - rf)` normalized to sum to 1. `rf` is the
/// per-period risk-free rate on the same scale as `mu`.
pub fn max_sharpe(mu: &Array1<f64>, cov: &Array2<f64>, rf: f64) -> Result<Array1<f64>> {
    let n = check_cov(cov)?;
    if mu.len() != n {
        return Err(RondaError::InvalidData(format!(
            "mu has length {} but covariance is {}x{}",
            mu.len(),
            n,
            n
        )));
    }

    let excess = mu - rf;
    let x = solve_spd(cov, &excess)?;
    let total = x.sum();
    if total.abs() < 1e-12 {
        return Err(RondaError::InvalidData(
            "tangency weights do not normalize: excess returns sum to zero under cov^-1"
                .to_string(),
        ));
    }
    Ok(x / total)
}

/// Minimum-variance weights for a given target expected return.
///
/// Two-constraint closed form (`sum(w) = 1`, `w' mu = target`) using the
/// standard frontier scalars `a = 1' cov^-1 1`, `b = 1' cov^-1 mu`,
/// `c = mu' cov^-1 mu`.
///
/// # Errors
///
/// [`RondaError::FailedToConverge`] when the frontier system is degenerate
/// (expected returns collinear with the ones vector), on top of the usual
/// input-shape and positive-definiteness errors.
pub fn min_variance_for_target_return(
    mu: &Array1<f64>,
    cov: &Array2<f64>,
    target_return: f64,
) -> Result<Array1<f64>> {
    let n = check_cov(cov)?;
    if mu.len() != n {
        return Err(RondaError::InvalidData(format!(
            "mu has length {} but covariance is {}x{}",
            mu.len(),
            n,
            n
        )));
    }

    let inv_ones = solve_spd(cov, &Array1::ones(n))?;
    let inv_mu = solve_spd(cov, mu)?;

    let a = inv_ones.sum();
    let b = inv_mu.sum();
    let c = mu.dot(&inv_mu);
    let d = a * c - b * b;
    if d.abs() < 1e-12 {
        return Err(RondaError::FailedToConverge(
            "efficient frontier system is degenerate: expected returns are collinear with ones"
                .to_string(),
        ));
    }

    let lambda = (c - b * target_return) / d;
    let gamma = (a * target_return - b) / d;
    Ok(lambda * &inv_ones + gamma * &inv_mu)
}

/// A swept efficient frontier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EfficientFrontier {
    /// Target expected returns, ascending.
    pub target_returns: Vec<f64>,
    /// Portfolio volatility at each target.
    pub volatilities: Vec<f64>,
    /// Frontier weights at each target.
    pub weights: Vec<Vec<f64>>,
}

/// Sweeps the efficient frontier between the GMV return and the tangency
/// return.
pub fn efficient_frontier(
    mu: &Array1<f64>,
    cov: &Array2<f64>,
    n_points: usize,
) -> Result<EfficientFrontier> {
    if n_points < 2 {
        return Err(RondaError::InvalidData(
            "frontier needs at least 2 points".to_string(),
        ));
    }

    let gmv_r = portfolio_return(&global_min_variance(cov)?, mu);
    let tan_r = portfolio_return(&max_sharpe(mu, cov, 0.0)?, mu);

    // Degenerate inputs can invert the ordering
    let (lo, hi) = if gmv_r <= tan_r {
        (gmv_r, tan_r)
    } else {
        (tan_r, gmv_r)
    };

    let mut target_returns = Vec::with_capacity(n_points);
    let mut volatilities = Vec::with_capacity(n_points);
    let mut weights = Vec::with_capacity(n_points);
    let step = (hi - lo) / (n_points - 1) as f64;
    for i in 0..n_points {
        let target = lo + step * i as f64;
        let w = min_variance_for_target_return(mu, cov, target)?;
        target_returns.push(target);
        volatilities.push(portfolio_volatility(&w, cov));
        weights.push(w.to_vec());
    }

    Ok(EfficientFrontier {
        target_returns,
        volatilities,
        weights,
    })
}
