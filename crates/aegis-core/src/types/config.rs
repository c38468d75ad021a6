//! Configuration for risk analysis.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Tunable constants of the risk pipeline.
///
/// Missing fields fall back to their defaults when deserialized, so a
/// configuration file only needs to list what it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    /// VaR confidence level, strictly between 0 and 1.
    pub confidence_level: f64,

    /// Annual risk-free rate used in the portfolio Sharpe ratio.
    pub risk_free_rate: f64,

    /// Return periods per year (252 for daily data).
    pub trading_periods_per_year: f64,

    /// Minimum aligned return observations an instrument needs to stay in
    /// the analysis.
    pub min_aligned_observations: usize,

    /// Per-asset Sharpe ratio below which a holding may be flagged.
    pub reduce_sharpe_threshold: f64,

    /// Weight above which a low-Sharpe holding is flagged for reduction.
    pub reduce_weight_threshold: f64,

    /// Average correlation above which diversification is "moderate".
    pub moderate_correlation: f64,

    /// Average correlation above which diversification is "high correlation".
    pub high_correlation: f64,

    /// Enable parallel per-instrument work (requires the `parallel` feature).
    pub parallel: bool,

    /// Minimum instrument count to trigger parallel processing.
    pub parallel_threshold: usize,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            confidence_level: 0.95,
            risk_free_rate: 0.04,
            trading_periods_per_year: 252.0,
            min_aligned_observations: 2,
            reduce_sharpe_threshold: 0.1,
            reduce_weight_threshold: 0.10,
            moderate_correlation: 0.5,
            high_correlation: 0.7,
            parallel: true,
            parallel_threshold: 100,
        }
    }
}

impl RiskConfig {
    /// Creates a config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the VaR confidence level.
    #[must_use]
    pub fn with_confidence_level(mut self, confidence: f64) -> Self {
        self.confidence_level = confidence;
        self
    }

    /// Sets the risk-free rate.
    #[must_use]
    pub fn with_risk_free_rate(mut self, rate: f64) -> Self {
        self.risk_free_rate = rate;
        self
    }

    /// Sets the number of return periods per year.
    #[must_use]
    pub fn with_periods_per_year(mut self, periods: f64) -> Self {
        self.trading_periods_per_year = periods;
        self
    }

    /// Sets the minimum aligned observations per instrument.
    #[must_use]
    pub fn with_min_observations(mut self, min: usize) -> Self {
        self.min_aligned_observations = min;
        self
    }

    /// Sets the reduce-recommendation thresholds.
    #[must_use]
    pub fn with_reduce_thresholds(mut self, sharpe: f64, weight: f64) -> Self {
        self.reduce_sharpe_threshold = sharpe;
        self.reduce_weight_threshold = weight;
        self
    }

    /// Sets the correlation band boundaries.
    #[must_use]
    pub fn with_correlation_bands(mut self, moderate: f64, high: f64) -> Self {
        self.moderate_correlation = moderate;
        self.high_correlation = high;
        self
    }

    /// Sets whether to use parallel processing.
    #[must_use]
    pub fn with_parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    /// Sets the threshold for parallel processing.
    #[must_use]
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Returns true if parallel processing should be used for the given count.
    #[must_use]
    pub fn should_parallelize(&self, count: usize) -> bool {
        self.parallel && count >= self.parallel_threshold
    }

    /// Checks that every field is in range.
    pub fn validate(&self) -> CoreResult<()> {
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(CoreError::invalid_config(
                "confidence_level",
                format!("{} is not in (0, 1)", self.confidence_level),
            ));
        }
        if !self.risk_free_rate.is_finite() {
            return Err(CoreError::invalid_config("risk_free_rate", "must be finite"));
        }
        if !(self.trading_periods_per_year.is_finite() && self.trading_periods_per_year > 0.0) {
            return Err(CoreError::invalid_config(
                "trading_periods_per_year",
                "must be positive",
            ));
        }
        if self.min_aligned_observations < 2 {
            return Err(CoreError::invalid_config(
                "min_aligned_observations",
                "at least 2 observations are required",
            ));
        }
        if !(self.reduce_weight_threshold >= 0.0 && self.reduce_weight_threshold <= 1.0) {
            return Err(CoreError::invalid_config(
                "reduce_weight_threshold",
                "must be in [0, 1]",
            ));
        }
        if !self.reduce_sharpe_threshold.is_finite() {
            return Err(CoreError::invalid_config(
                "reduce_sharpe_threshold",
                "must be finite",
            ));
        }
        if !(self.moderate_correlation <= self.high_correlation
            && (-1.0..=1.0).contains(&self.moderate_correlation)
            && (-1.0..=1.0).contains(&self.high_correlation))
        {
            return Err(CoreError::invalid_config(
                "correlation bands",
                format!(
                    "need -1 <= moderate ({}) <= high ({}) <= 1",
                    self.moderate_correlation, self.high_correlation
                ),
            ));
        }
        Ok(())
    }
}
