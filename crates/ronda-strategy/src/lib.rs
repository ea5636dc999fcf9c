#![doc(issue_tracker_base_url = "https://github.com/factordynamics/ronda/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![deny(unsafe_code)]

//! Rolling PCA factor strategy for ronda.
//!
//! This crate turns a price panel into a -1/0/+1 position panel through a
//! daily re-fit: extract principal-component factors from the trailing
//! return window, regress each asset on the shared factor basis, and rank
//! the cross-section by fitted cumulative return.
//!
//! # Example
//!
//! ```rust,ignore
//! use ronda_strategy::{StrategyConfig, generate_positions};
//!
//! let positions = generate_positions(&prices, &StrategyConfig::default())?;
//! ```

pub mod ols;
pub mod pca;
pub mod strategy;

// Re-export main types
pub use ols::{NormalEquations, with_intercept};
pub use pca::Pca;
pub use strategy::{StrategyConfig, generate_positions};
