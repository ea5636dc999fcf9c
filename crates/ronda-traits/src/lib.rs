#![doc(issue_tracker_base_url = "https://github.com/factordynamics/ronda/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core type definitions for the ronda backtesting framework.
//!
//! This crate provides the foundational pieces shared by the strategy,
//! backtest, and portfolio crates: the [`Panel`] date-by-asset container,
//! the [`RondaError`] taxonomy, and NaN-aware statistics helpers.

/// The version of the ronda-traits crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Module declarations
pub mod error;
pub mod linalg;
pub mod stats;
pub mod types;

// Re-exports
pub use error::{Result, RondaError};
pub use types::{Date, Panel, Symbol};
