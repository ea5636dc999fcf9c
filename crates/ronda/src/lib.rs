#![doc(issue_tracker_base_url = "https://github.com/factordynamics/ronda/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! # ronda
//!
//! Rolling PCA factor strategy backtesting framework.
//!
//! ronda is an umbrella crate that re-exports all ronda sub-crates for
//! convenience. It evaluates a walk-forward factor strategy against a
//! historical price panel and reports risk-adjusted performance.
//!
//! ## Quick Start
//!
//! ```ignore
//! use ronda::prelude::*;
//! use ronda::strategy::{StrategyConfig, generate_positions};
//! use ronda::eval::backtest;
//!
//! # fn main() -> ronda::Result<()> {
//! let prices: Panel = /* loaded from a delimited price table */;
//! let positions = generate_positions(&prices, &StrategyConfig::default())?;
//! let result = backtest(&prices, &positions, 252)?;
//! println!("Sharpe: {:.2}", result.sharpe);
//! # Ok(())
//! # }
//! ```
//!
//! ## Crate Organization
//!
//! - [`traits`] - `Panel` container, errors, and shared numerics
//! - [`strategy`] - rolling PCA factor extraction and position generation
//! - [`eval`] - backtest engine, performance metrics, drawdown analysis
//! - [`portfolio`] - Markowitz and Black-Litterman construction utilities
//!
//! ## Pipeline
//!
//! 1. A **price panel** is loaded once and treated as immutable input
//! 2. The **strategy** re-fits a factor model per date and emits positions
//! 3. The **engine** lags positions by one day and compounds daily returns
//! 4. **Metrics** summarize the equity curve (Sharpe, drawdown, duration)

/// Version information for the ronda crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core types: panels, symbols, errors, shared numerics.
pub mod traits {
    pub use ronda_traits::*;
}

/// Rolling PCA factor strategy.
pub mod strategy {
    pub use ronda_strategy::*;
}

/// Backtest engine and performance metrics.
pub mod eval {
    pub use ronda_eval::*;
}

/// Mean-variance and Black-Litterman portfolio construction.
pub mod portfolio {
    pub use ronda_portfolio::*;
}

// Re-export common types at top level for convenience
pub use ronda_traits::{Date, Panel, Result, RondaError, Symbol};

/// Prelude module for convenient imports.
///
/// ```ignore
/// use ronda::prelude::*;
/// ```
pub mod prelude {
    pub use ronda_eval::{BacktestConfig, BacktestResult, backtest, backtest_with_config};
    pub use ronda_strategy::{StrategyConfig, generate_positions};
    pub use ronda_traits::{Date, Panel, Result, RondaError, Symbol};
}
