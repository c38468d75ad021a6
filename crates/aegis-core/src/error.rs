//! Error types for the core domain types.

use thiserror::Error;

/// A specialized Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised when constructing or validating domain values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// A price series whose dates and closes disagree in length.
    #[error("price series for {symbol}: {dates} dates but {closes} closes")]
    SeriesLengthMismatch {
        /// Instrument symbol.
        symbol: String,
        /// Number of dates.
        dates: usize,
        /// Number of closes.
        closes: usize,
    },

    /// A price series whose dates are not strictly increasing.
    #[error("price series for {symbol} is not strictly ordered at index {index}")]
    UnorderedSeries {
        /// Instrument symbol.
        symbol: String,
        /// First index that breaks the ordering.
        index: usize,
    },

    /// Risk score outside 1..=10.
    #[error("risk score {0} is outside 1..=10")]
    InvalidRiskScore(u8),

    /// Invalid configuration value.
    #[error("invalid configuration: {field}: {reason}")]
    InvalidConfig {
        /// Configuration field name.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// Invalid input.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl CoreError {
    /// Creates an invalid configuration error.
    #[must_use]
    pub fn invalid_config(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}
