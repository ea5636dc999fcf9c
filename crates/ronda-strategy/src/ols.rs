//! Ordinary least squares on a shared factor basis.
//!
//! Every asset in a window step is regressed on the same design matrix, so
//! the normal-equations matrix `X'X` is factored once and reused for each
//! right-hand side. A small ridge term keeps the factorization solvable when
//! retained components are numerically null (rank-deficient windows).

use ndarray::{Array1, Array2};
use ronda_traits::linalg::{cholesky_factor, cholesky_solve};
use ronda_traits::{Result, RondaError};

/// Diagonal regularization added to `X'X` before factoring.
const RIDGE: f64 = 1e-10;

/// Pre-factored normal equations for a fixed design matrix.
#[derive(Debug, Clone)]
pub struct NormalEquations {
    /// Transposed design matrix, params x samples.
    xt: Array2<f64>,
    /// Lower Cholesky factor of `X'X + ridge I`.
    l: Array2<f64>,
}

impl NormalEquations {
    /// Factors the normal equations for design matrix `x` (samples x params).
    ///
    /// # Errors
    ///
    /// Returns [`RondaError::NotPositiveDefinite`] if `X'X` cannot be
    /// factored even after regularization.
    pub fn new(x: &Array2<f64>) -> Result<Self> {
        let xt = x.t().to_owned();
        let mut xtx = xt.dot(x);
        for i in 0..xtx.nrows() {
            xtx[[i, i]] += RIDGE;
        }
        let l = cholesky_factor(&xtx)?;
        Ok(Self { xt, l })
    }

    /// Solves `beta = (X'X)^-1 X'y` for one response vector.
    pub fn solve(&self, y: &Array1<f64>) -> Result<Array1<f64>> {
        if y.len() != self.xt.ncols() {
            return Err(RondaError::ShapeMismatch(format!(
                "response has {} samples, design has {}",
                y.len(),
                self.xt.ncols()
            )));
        }
        let xty = self.xt.dot(y);
        Ok(cholesky_solve(&self.l, &xty))
    }
}

/// Builds a design matrix by prepending an intercept column of ones to the
/// factor scores (samples x k -> samples x k+1).
pub fn with_intercept(factors: &Array2<f64>) -> Array2<f64> {
    let (n, k) = factors.dim();
    let mut design = Array2::ones((n, k + 1));
    design
        .slice_mut(ndarray::s![.., 1..])
        .assign(factors);
    design
}
