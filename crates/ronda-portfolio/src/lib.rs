#![doc(issue_tracker_base_url = "https://github.com/factordynamics/ronda/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Portfolio construction utilities for ronda.
//!
//! Self-contained numerical routines consumed as a black box by
//! portfolio-construction callers; nothing here touches the rolling
//! time-series machinery of the backtest core.
//!
//! - Mean-variance (Markowitz) closed forms: global minimum variance,
//!   tangency, target-return frontier weights, and a frontier sweep
//! - Black-Litterman: implied equilibrium returns and the posterior
//!   mean/covariance blend of prior and views

pub mod black_litterman;
pub mod markowitz;

// Re-export main types
pub use black_litterman::{
    black_litterman_posterior, estimate_delta_from_market, implied_equilibrium_returns,
};
pub use markowitz::{
    EfficientFrontier, efficient_frontier, global_min_variance, max_sharpe,
    min_variance_for_target_return, portfolio_return, portfolio_volatility,
};
