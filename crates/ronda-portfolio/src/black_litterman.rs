//! Black-Litterman posterior expected returns.
//!
//! Conventions follow He & Litterman (1999):
//! - `cov`: covariance of asset returns (Sigma)
//! - `w_mkt`: market-cap weights summing to 1
//! - `delta`: risk-aversion coefficient
//! - `tau`: scaling of the prior covariance uncertainty
//! - `p`, `q`, `omega`: view matrix, view returns, view uncertainty

use ndarray::{Array1, Array2};

use ronda_traits::linalg::{cholesky_factor, cholesky_solve};
use ronda_traits::{Result, RondaError};

/// Implied equilibrium excess returns `pi = delta * cov * w_mkt`.
pub fn implied_equilibrium_returns(
    delta: f64,
    cov: &Array2<f64>,
    w_mkt: &Array1<f64>,
) -> Result<Array1<f64>> {
    if cov.nrows() != cov.ncols() || cov.nrows() != w_mkt.len() {
        return Err(RondaError::InvalidData(format!(
            "cov is {}x{} but market weights have length {}",
            cov.nrows(),
            cov.ncols(),
            w_mkt.len()
        )));
    }
    Ok(delta * cov.dot(w_mkt))
}

/// Risk-aversion estimate `delta = (E[R_m] - rf) / Var(R_m)`.
pub fn estimate_delta_from_market(mu_mkt: f64, var_mkt: f64, rf: f64) -> Result<f64> {
    if var_mkt <= 0.0 {
        return Err(RondaError::InvalidData(
            "market variance must be positive".to_string(),
        ));
    }
    Ok((mu_mkt - rf) / var_mkt)
}

/// Inverse of a symmetric positive-definite matrix via Cholesky.
fn spd_inverse(a: &Array2<f64>) -> Result<Array2<f64>> {
    let n = a.nrows();
    let l = cholesky_factor(a)?;
    let mut inv = Array2::zeros((n, n));
    for j in 0..n {
        let mut e = Array1::zeros(n);
        e[j] = 1.0;
        inv.column_mut(j).assign(&cholesky_solve(&l, &e));
    }
    Ok(inv)
}

/// Black-Litterman posterior mean and covariance.
///
/// ```text
/// mu_bl  = [ (tau Sigma)^-1 + P' Omega^-1 P ]^-1 [ (tau Sigma)^-1 pi + P' Omega^-1 q ]
/// cov_bl = Sigma + [ (tau Sigma)^-1 + P' Omega^-1 P ]^-1
/// ```
///
/// # Errors
///
/// [`RondaError::InvalidData`] for non-positive `tau` or any dimension
/// mismatch between `cov`, `pi`, `p`, `q`, and `omega`;
/// [`RondaError::NotPositiveDefinite`] when a factorization breaks down.
pub fn black_litterman_posterior(
    cov: &Array2<f64>,
    pi: &Array1<f64>,
    p: &Array2<f64>,
    q: &Array1<f64>,
    omega: &Array2<f64>,
    tau: f64,
) -> Result<(Array1<f64>, Array2<f64>)> {
    if tau <= 0.0 {
        return Err(RondaError::InvalidData("tau must be positive".to_string()));
    }
    let n = cov.nrows();
    if cov.ncols() != n {
        return Err(RondaError::InvalidData("cov must be square".to_string()));
    }
    if pi.len() != n {
        return Err(RondaError::InvalidData(format!(
            "pi has length {} but cov is {}x{}",
            pi.len(),
            n,
            n
        )));
    }
    let n_views = p.nrows();
    if p.ncols() != n {
        return Err(RondaError::InvalidData(format!(
            "view matrix must have {} columns, got {}",
            n,
            p.ncols()
        )));
    }
    if q.len() != n_views || omega.nrows() != n_views || omega.ncols() != n_views {
        return Err(RondaError::InvalidData(
            "q and omega must match the number of views (rows of P)".to_string(),
        ));
    }

    let inv_tau_cov = spd_inverse(&(tau * cov))?;
    let inv_omega = spd_inverse(omega)?;

    let pt_inv_omega = p.t().dot(&inv_omega);
    let middle = &inv_tau_cov + &pt_inv_omega.dot(p);
    let middle_inv = spd_inverse(&middle)?;

    let rhs = inv_tau_cov.dot(pi) + pt_inv_omega.dot(q);
    let mu_bl = middle_inv.dot(&rhs);
    let cov_bl = cov + &middle_inv;

    Ok((mu_bl, cov_bl))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    fn sample_cov() -> Array2<f64> {
        array![[0.04, 0.01], [0.01, 0.09]]
    }

    #[test]
    fn test_implied_equilibrium_returns() {
        let cov = sample_cov();
        let w = array![0.6, 0.4];
        let pi = implied_equilibrium_returns(2.5, &cov, &w).unwrap();

        assert_relative_eq!(pi[0], 2.5 * (0.04 * 0.6 + 0.01 * 0.4), epsilon = 1e-12);
        assert_relative_eq!(pi[1], 2.5 * (0.01 * 0.6 + 0.09 * 0.4), epsilon = 1e-12);
    }

    #[test]
    fn test_estimate_delta() {
        let delta = estimate_delta_from_market(0.08, 0.04, 0.02).unwrap();
        assert_relative_eq!(delta, 1.5, epsilon = 1e-12);
        assert!(estimate_delta_from_market(0.08, 0.0, 0.0).is_err());
    }

    #[test]
    fn test_weak_views_recover_prior() {
        // A view with enormous uncertainty barely moves the posterior.
        let cov = sample_cov();
        let pi = array![0.05, 0.07];
        let p = array![[1.0, 0.0]];
        let q = array![0.50];
        let omega = array![[1e6]];

        let (mu_bl, _) = black_litterman_posterior(&cov, &pi, &p, &q, &omega, 0.05).unwrap();
        assert_relative_eq!(mu_bl[0], pi[0], epsilon = 1e-4);
        assert_relative_eq!(mu_bl[1], pi[1], epsilon = 1e-4);
    }

    #[test]
    fn test_confident_view_dominates() {
        // A near-certain view pins the viewed combination at q.
        let cov = sample_cov();
        let pi = array![0.05, 0.07];
        let p = array![[1.0, 0.0]];
        let q = array![0.10];
        let omega = array![[1e-8]];

        let (mu_bl, _) = black_litterman_posterior(&cov, &pi, &p, &q, &omega, 0.05).unwrap();
        assert_relative_eq!(mu_bl[0], 0.10, epsilon = 1e-4);
    }

    #[test]
    fn test_posterior_covariance_exceeds_prior() {
        let cov = sample_cov();
        let pi = array![0.05, 0.07];
        let p = array![[1.0, -1.0]];
        let q = array![0.02];
        let omega = array![[0.01]];

        let (_, cov_bl) = black_litterman_posterior(&cov, &pi, &p, &q, &omega, 0.05).unwrap();
        // Sigma + (PD matrix) has strictly larger diagonal
        assert!(cov_bl[[0, 0]] > cov[[0, 0]]);
        assert!(cov_bl[[1, 1]] > cov[[1, 1]]);
    }

    #[test]
    fn test_dimension_validation() {
        let cov = sample_cov();
        let pi = array![0.05, 0.07];
        let p = array![[1.0, 0.0, 0.0]]; // 3 columns for 2 assets
        let q = array![0.10];
        let omega = array![[0.01]];

        assert!(matches!(
            black_litterman_posterior(&cov, &pi, &p, &q, &omega, 0.05),
            Err(RondaError::InvalidData(_))
        ));
        assert!(matches!(
            black_litterman_posterior(&cov, &pi, &array![[1.0, 0.0]], &q, &omega, -1.0),
            Err(RondaError::InvalidData(_))
        ));
    }
}
