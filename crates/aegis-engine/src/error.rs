//! Engine error types.

use aegis_core::CoreError;
use aegis_risk::RiskError;
use thiserror::Error;

/// Engine error type.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration error
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// Risk analysis failed
    #[error(transparent)]
    Analysis(#[from] RiskError),

    /// Portfolio comparison could not be made
    #[error("comparison error: {0}")]
    ComparisonError(String),
}

impl EngineError {
    /// The underlying risk error, if any.
    pub fn as_risk_error(&self) -> Option<&RiskError> {
        match self {
            Self::Analysis(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CoreError> for EngineError {
    fn from(e: CoreError) -> Self {
        EngineError::ConfigError(e.to_string())
    }
}
