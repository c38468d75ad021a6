//! The risk engine: fetch history once, then run the pure pipeline.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use aegis_core::types::{Holding, PriceSeries, RiskAnalysisResult, Symbol};
use aegis_risk::weights::resolve_weights;
use aegis_risk::{RiskAnalyzer, RiskError};
use aegis_traits::PriceHistoryProvider;
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::comparison::{compare, ComparisonReport, PortfolioEntry};
use crate::config::EngineConfig;
use crate::error::EngineError;

/// Portfolio risk engine.
///
/// Holds only immutable configuration and the injected provider; every call
/// builds a new result, so the engine can be shared across tasks.
pub struct RiskEngine {
    config: EngineConfig,
    analyzer: RiskAnalyzer,
    price_history: Arc<dyn PriceHistoryProvider>,
}

impl RiskEngine {
    pub(crate) fn new(
        config: EngineConfig,
        analyzer: RiskAnalyzer,
        price_history: Arc<dyn PriceHistoryProvider>,
    ) -> Self {
        Self {
            config,
            analyzer,
            price_history,
        }
    }

    /// The engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Analyse holdings, fetching their price history in one batch.
    ///
    /// The analysis is stamped with the current time.
    pub async fn analyze(&self, holdings: &[Holding]) -> Result<RiskAnalysisResult, EngineError> {
        let symbols: Vec<Symbol> = resolve_weights(holdings)?
            .into_iter()
            .map(|w| w.symbol)
            .collect();

        info!(instruments = symbols.len(), "starting risk analysis");
        let histories = self.fetch_history(&symbols).await?;
        self.analyze_with_history(holdings, &histories, Utc::now())
    }

    /// Analyse holdings against already fetched histories.
    ///
    /// Pure: the same inputs always give the same result.
    pub fn analyze_with_history(
        &self,
        holdings: &[Holding],
        histories: &HashMap<Symbol, PriceSeries>,
        as_of: DateTime<Utc>,
    ) -> Result<RiskAnalysisResult, EngineError> {
        let result = self.analyzer.analyze(holdings, histories, as_of)?;
        if !result.dropped.is_empty() {
            warn!(
                dropped = result.dropped.len(),
                analysed = result.weights.len(),
                "analysis excludes instruments with short history"
            );
        }
        Ok(result)
    }

    /// Compare previously computed analyses.
    pub fn compare(&self, entries: &[PortfolioEntry]) -> Result<ComparisonReport, EngineError> {
        compare(entries)
    }

    /// Fetch the batch under the configured timeout.
    ///
    /// Any provider failure, including expiry, is `DataUnavailable` for the
    /// whole batch.
    async fn fetch_history(
        &self,
        symbols: &[Symbol],
    ) -> Result<HashMap<Symbol, PriceSeries>, EngineError> {
        let timeout = self.config.fetch_timeout();
        let started = Instant::now();

        let fetched = tokio::time::timeout(
            timeout,
            self.price_history.fetch_history(
                symbols,
                self.config.history_period,
                self.config.interval,
            ),
        )
        .await;

        let histories = match fetched {
            Ok(Ok(histories)) => histories,
            Ok(Err(e)) => {
                warn!(error = %e, "price history fetch failed");
                return Err(RiskError::data_unavailable(symbols.to_vec(), e.to_string()).into());
            }
            Err(_) => {
                warn!(timeout_secs = timeout.as_secs(), "price history fetch timed out");
                return Err(RiskError::data_unavailable(
                    symbols.to_vec(),
                    format!("price history fetch timed out after {}s", timeout.as_secs()),
                )
                .into());
            }
        };

        debug!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            requested = symbols.len(),
            returned = histories.len(),
            source = ?self.price_history.source_type(),
            "fetched price history"
        );
        Ok(histories)
    }
}
