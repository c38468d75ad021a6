//! Engine configuration.

use std::path::Path;
use std::time::Duration;

use aegis_core::types::RiskConfig;
use aegis_traits::{HistoryPeriod, Interval};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Engine configuration.
///
/// ```toml
/// history_period = "6mo"
/// fetch_timeout_secs = 10
///
/// [risk]
/// confidence_level = 0.99
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Risk pipeline settings
    #[serde(default)]
    pub risk: RiskConfig,

    /// How much history to request
    #[serde(default)]
    pub history_period: HistoryPeriod,

    /// Spacing of the requested history
    #[serde(default)]
    pub interval: Interval,

    /// Seconds to wait for the price history batch
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

fn default_fetch_timeout_secs() -> u64 {
    30
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            risk: RiskConfig::default(),
            history_period: HistoryPeriod::default(),
            interval: Interval::default(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| EngineError::ConfigError(format!("{}: {e}", path.display())))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, EngineError> {
        let config: Self =
            toml::from_str(content).map_err(|e| EngineError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Fetch timeout as a duration.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Validate all settings.
    pub fn validate(&self) -> Result<(), EngineError> {
        self.risk.validate()?;
        if self.fetch_timeout_secs == 0 {
            return Err(EngineError::ConfigError(
                "fetch_timeout_secs must be positive".into(),
            ));
        }
        Ok(())
    }
}
