//! Error types for risk calculations.

use aegis_core::types::{join_symbols, Symbol};
use aegis_core::CoreError;
use aegis_math::MathError;
use thiserror::Error;

/// A specialized Result type for risk calculations.
pub type RiskResult<T> = Result<T, RiskError>;

/// Errors that can occur during risk analysis.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RiskError {
    /// Price history missing or unusable for the listed symbols.
    #[error("price data unavailable for [{}]: {reason}", join_symbols(.symbols))]
    DataUnavailable {
        /// Affected symbols.
        symbols: Vec<Symbol>,
        /// What went wrong.
        reason: String,
    },

    /// Too few aligned observations.
    #[error(
        "insufficient history for [{}]: need at least {required} observations, got {actual}",
        join_symbols(.symbols)
    )]
    InsufficientHistory {
        /// Offending symbols.
        symbols: Vec<Symbol>,
        /// Minimum number of observations required.
        required: usize,
        /// Number available.
        actual: usize,
    },

    /// Holdings do not resolve to a valid weight vector.
    #[error("invalid weights (sum {sum}): {reason}")]
    InvalidWeights {
        /// Weight sum, or NaN when it could not be computed.
        sum: f64,
        /// What is wrong with the holdings.
        reason: String,
    },

    /// Numerical failure.
    #[error("computation error: {0}")]
    ComputationError(String),

    /// Invalid input parameters.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// No holdings to analyse.
    #[error("portfolio has no holdings")]
    EmptyPortfolio,
}

impl RiskError {
    /// Creates a data-unavailable error.
    #[must_use]
    pub fn data_unavailable(symbols: Vec<Symbol>, reason: impl Into<String>) -> Self {
        Self::DataUnavailable {
            symbols,
            reason: reason.into(),
        }
    }

    /// Creates an invalid-weights error.
    #[must_use]
    pub fn invalid_weights(sum: f64, reason: impl Into<String>) -> Self {
        Self::InvalidWeights {
            sum,
            reason: reason.into(),
        }
    }

    /// Fills in the symbol list of an `InsufficientHistory` or
    /// `DataUnavailable` error raised without one.
    #[must_use]
    pub fn with_symbols(self, symbols: &[Symbol]) -> Self {
        match self {
            Self::InsufficientHistory {
                symbols: s,
                required,
                actual,
            } if s.is_empty() => Self::InsufficientHistory {
                symbols: symbols.to_vec(),
                required,
                actual,
            },
            Self::DataUnavailable { symbols: s, reason } if s.is_empty() => Self::DataUnavailable {
                symbols: symbols.to_vec(),
                reason,
            },
            other => other,
        }
    }
}

impl From<MathError> for RiskError {
    fn from(err: MathError) -> Self {
        match err {
            MathError::InsufficientData { required, actual } => Self::InsufficientHistory {
                symbols: Vec::new(),
                required,
                actual,
            },
            MathError::InvalidInput { reason } => Self::InvalidInput(reason),
            other => Self::ComputationError(other.to_string()),
        }
    }
}

impl From<CoreError> for RiskError {
    fn from(err: CoreError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}
