#![doc(issue_tracker_base_url = "https://github.com/factordynamics/ronda/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Backtest engine and performance metrics for ronda.
//!
//! This crate evaluates position panels against price panels:
//! - A vectorized backtest engine with lag-by-one look-ahead avoidance and
//!   gross-exposure capital normalization
//! - Performance metrics (compounded cumulative return, annualized return and
//!   volatility, Sharpe ratio)
//! - Maximum drawdown and drawdown duration via a single causal forward pass
//!
//! # Example
//!
//! ```rust,ignore
//! use ronda_eval::{backtest, BacktestConfig};
//!
//! let result = backtest(&prices, &positions, 252)?;
//! println!("Sharpe: {:.2}", result.sharpe);
//! println!("Max drawdown: {:.2}%", result.max_drawdown * 100.0);
//! ```

pub mod backtest;
pub mod drawdown;
pub mod metrics;

// Re-export main types
pub use backtest::{BacktestConfig, BacktestResult, backtest, backtest_with_config};
pub use drawdown::{DrawdownStats, drawdown_curve, max_drawdown};
pub use metrics::{annualized_return, annualized_volatility, compound, sharpe};
