//! Builder pattern for the risk engine.

use std::sync::Arc;

use aegis_risk::RiskAnalyzer;
use aegis_traits::PriceHistoryProvider;
use tracing::warn;

use crate::config::EngineConfig;
use crate::engine::RiskEngine;
use crate::error::EngineError;

/// Builder for constructing a [`RiskEngine`].
pub struct RiskEngineBuilder {
    config: Option<EngineConfig>,
    price_history: Option<Arc<dyn PriceHistoryProvider>>,
}

impl RiskEngineBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            config: None,
            price_history: None,
        }
    }

    /// Set the engine configuration.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the price history provider.
    pub fn with_price_history(mut self, provider: Arc<dyn PriceHistoryProvider>) -> Self {
        self.price_history = Some(provider);
        self
    }

    /// Build the risk engine.
    pub fn build(self) -> Result<RiskEngine, EngineError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let price_history = self
            .price_history
            .ok_or_else(|| EngineError::ConfigError("price_history not configured".into()))?;

        let expected = config.interval.periods_per_year();
        if config.risk.trading_periods_per_year != expected {
            warn!(
                interval = %config.interval,
                configured = config.risk.trading_periods_per_year,
                expected,
                "annualization factor does not match the history interval"
            );
        }

        let analyzer = RiskAnalyzer::new(config.risk.clone())?;
        Ok(RiskEngine::new(config, analyzer, price_history))
    }
}

impl Default for RiskEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
