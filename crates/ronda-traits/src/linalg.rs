//! Dense linear-algebra helpers for symmetric positive-definite systems.
//!
//! Both the per-asset regression step and the portfolio solvers reduce to
//! solving `A x = b` with `A` symmetric positive definite, so the framework
//! shares one Cholesky implementation. The factorization fails loudly on a
//! non-PD input; callers decide whether that is fatal or a local skip.

use ndarray::{Array1, Array2};

use crate::error::{Result, RondaError};

/// Computes the lower-triangular Cholesky factor `L` with `A = L L^T`.
///
/// # Errors
///
/// Returns [`RondaError::NotPositiveDefinite`] if a diagonal pivot is not
/// strictly positive.
pub fn cholesky_factor(a: &Array2<f64>) -> Result<Array2<f64>> {
    let n = a.nrows();
    if a.ncols() != n {
        return Err(RondaError::InvalidData(format!(
            "matrix must be square, got {}x{}",
            a.nrows(),
            a.ncols()
        )));
    }

    let mut l = Array2::<f64>::zeros((n, n));
    for i in 0..n {
        for j in 0..=i {
            let mut sum = 0.0;
            for k in 0..j {
                sum += l[[i, k]] * l[[j, k]];
            }

            if i == j {
                let diag = a[[i, i]] - sum;
                if diag <= 0.0 {
                    return Err(RondaError::NotPositiveDefinite(format!(
                        "pivot {} is {diag:.3e}",
                        i
                    )));
                }
                l[[i, j]] = diag.sqrt();
            } else {
                l[[i, j]] = (a[[i, j]] - sum) / l[[j, j]];
            }
        }
    }
    Ok(l)
}

/// Solves `L L^T x = b` given the lower-triangular factor from
/// [`cholesky_factor`].
pub fn cholesky_solve(l: &Array2<f64>, b: &Array1<f64>) -> Array1<f64> {
    let n = l.nrows();

    // Forward substitution: L z = b
    let mut z = Array1::<f64>::zeros(n);
    for i in 0..n {
        let mut sum = 0.0;
        for j in 0..i {
            sum += l[[i, j]] * z[j];
        }
        z[i] = (b[i] - sum) / l[[i, i]];
    }

    // Back substitution: L^T x = z
    let mut x = Array1::<f64>::zeros(n);
    for i in (0..n).rev() {
        let mut sum = 0.0;
        for j in (i + 1)..n {
            sum += l[[j, i]] * x[j];
        }
        x[i] = (z[i] - sum) / l[[i, i]];
    }

    x
}

/// Solves `A x = b` for symmetric positive-definite `A`.
pub fn solve_spd(a: &Array2<f64>, b: &Array1<f64>) -> Result<Array1<f64>> {
    if a.nrows() != b.len() {
        return Err(RondaError::InvalidData(format!(
            "matrix is {}x{} but rhs has length {}",
            a.nrows(),
            a.ncols(),
            b.len()
        )));
    }
    let l = cholesky_factor(a)?;
    Ok(cholesky_solve(&l, b))
}
