//! The end-to-end risk analysis pipeline.

use std::collections::HashMap;

use aegis_core::types::{
    Holding, PriceSeries, RiskAnalysisResult, RiskConfig, RiskMetrics, Symbol,
};
use aegis_math::statistics;
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::covariance::estimate_covariance;
use crate::error::RiskResult;
use crate::metrics::{portfolio_metrics, realized_volatility};
use crate::parallel::maybe_parallel_map;
use crate::recommendations::generate_recommendations;
use crate::returns::AlignedReturns;
use crate::scoring::risk_score;
use crate::var::historical_var;
use crate::weights::resolve_weights;

/// Stateless risk analyzer.
///
/// Each call computes a fresh [`RiskAnalysisResult`]; nothing is kept
/// between calls, so one analyzer can serve concurrent requests.
#[derive(Debug, Clone, Default)]
pub struct RiskAnalyzer {
    config: RiskConfig,
}

impl RiskAnalyzer {
    /// Creates an analyzer.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation.
    pub fn new(config: RiskConfig) -> RiskResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration in use.
    pub fn config(&self) -> &RiskConfig {
        &self.config
    }

    /// Analyses holdings against their price histories.
    ///
    /// # Errors
    ///
    /// Propagates weight, alignment, covariance, VaR and scoring failures.
    pub fn analyze(
        &self,
        holdings: &[Holding],
        histories: &HashMap<Symbol, PriceSeries>,
        as_of: DateTime<Utc>,
    ) -> RiskResult<RiskAnalysisResult> {
        let weights = resolve_weights(holdings)?;
        let aligned = AlignedReturns::align(&weights, histories, &self.config)?;
        self.analyze_returns(&aligned, as_of)
    }

    /// Analyses an already aligned returns panel.
    ///
    /// # Errors
    ///
    /// Propagates covariance, VaR and scoring failures.
    pub fn analyze_returns(
        &self,
        returns: &AlignedReturns,
        as_of: DateTime<Utc>,
    ) -> RiskResult<RiskAnalysisResult> {
        let config = &self.config;
        let periods = config.trading_periods_per_year;

        let covariance = estimate_covariance(returns)?;
        let columns = returns.columns();
        let mean_returns = maybe_parallel_map(&columns, config, |c| statistics::mean(c));
        let portfolio = portfolio_metrics(returns.weights(), &covariance, &mean_returns, config)?;

        let portfolio_returns = returns.portfolio_returns();
        let var = historical_var(&portfolio_returns, config.confidence_level)
            .map_err(|e| e.with_symbols(returns.symbols()))?;

        let score = risk_score(portfolio.volatility, var.daily, portfolio.sharpe_ratio)?;
        let recommendations = generate_recommendations(returns, score, config);

        let metrics = RiskMetrics {
            volatility: portfolio.volatility,
            expected_return: portfolio.expected_return,
            sharpe_ratio: portfolio.sharpe_ratio,
            daily_var: var.daily,
            weekly_var: var.weekly,
            monthly_var: var.monthly,
            realized_volatility: realized_volatility(&portfolio_returns, periods),
            shrinkage_intensity: covariance.shrinkage(),
            confidence_level: var.confidence_level,
            observations: returns.n_observations(),
        };

        debug!(
            volatility = metrics.volatility,
            sharpe = metrics.sharpe_ratio,
            daily_var = metrics.daily_var,
            "portfolio metrics"
        );
        info!(
            instruments = returns.n_instruments(),
            observations = metrics.observations,
            score = score.value(),
            "risk analysis complete"
        );

        Ok(RiskAnalysisResult {
            analysis_date: as_of,
            metrics,
            risk_score: score,
            recommendations,
            weights: returns.instrument_weights(),
            dropped: returns.dropped().to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RiskError;
    use aegis_core::types::RiskProfile;
    use chrono::{Duration, TimeZone};
    use nalgebra::DMatrix;

    fn scenario() -> AlignedReturns {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        AlignedReturns::from_matrix(
            vec!["A".into(), "B".into()],
            (1..=4).map(|d| start + Duration::days(d)).collect(),
            DMatrix::from_column_slice(
                4,
                2,
                &[0.01, -0.02, 0.03, -0.01, 0.02, -0.01, 0.01, 0.00],
            ),
            vec![0.5, 0.5],
        )
        .unwrap()
    }

    #[test]
    fn test_rejects_invalid_config() {
        assert!(RiskAnalyzer::new(RiskConfig::default().with_confidence_level(1.5)).is_err());
    }

    #[test]
    fn test_scenario_at_low_confidence() {
        let analyzer =
            RiskAnalyzer::new(RiskConfig::default().with_confidence_level(0.75)).unwrap();
        let as_of = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let result = analyzer.analyze_returns(&scenario(), as_of).unwrap();

        assert_eq!(result.metrics.daily_var, 0.005);
        assert_eq!(result.risk_score.value(), 7);
        assert_eq!(result.recommendations.risk_profile, RiskProfile::Moderate);
        assert!(result.recommendations.optimization.is_empty());
        assert_eq!(result.analysis_date, as_of);
        assert_eq!(result.metrics.observations, 4);
    }

    #[test]
    fn test_scenario_at_default_confidence_needs_more_history() {
        let err = RiskAnalyzer::default()
            .analyze_returns(&scenario(), Utc::now())
            .unwrap_err();
        assert_eq!(
            err,
            RiskError::InsufficientHistory {
                symbols: vec!["A".into(), "B".into()],
                required: 20,
                actual: 4,
            }
        );
    }
}
