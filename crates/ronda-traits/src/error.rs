//! Error types for the ronda framework.
//!
//! This module defines the error types used throughout the ronda ecosystem,
//! covering structural input-contract violations (which are fatal and surfaced
//! unmodified) as well as portfolio-solver failures.

use thiserror::Error;

/// The main error type for ronda operations.
///
/// Structural violations (`ShapeMismatch`, `InsufficientData`) abort the whole
/// run. Per-step numerical degeneracies inside the walk-forward loop are not
/// errors and never appear here; they are absorbed with well-defined fallback
/// values at the call site.
#[derive(Debug, Error)]
pub enum RondaError {
    /// Price and position panels disagree on row or column keys.
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    /// Fewer rows than the strategy's minimum history requirement.
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Invalid or malformed input data.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A required column is missing from a loaded table.
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// A date could not be parsed or is out of range.
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Error from Polars operations.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// An iterative solver exhausted its iteration budget.
    #[error("Failed to converge: {0}")]
    FailedToConverge(String),

    /// A matrix expected to be positive definite was not.
    #[error("Matrix is not positive definite: {0}")]
    NotPositiveDefinite(String),

    /// Generic error for other cases.
    #[error("Error: {0}")]
    Other(String),
}

impl From<String> for RondaError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for RondaError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

/// A specialized Result type for ronda operations.
pub type Result<T> = std::result::Result<T, RondaError>;
