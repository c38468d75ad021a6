//! Quantitative risk metrics and the bounded risk score.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Portfolio risk metrics for one analysis.
///
/// Volatility, expected return and Sharpe ratio are annualized; the VaR
/// triple is expressed per horizon as a positive loss fraction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskMetrics {
    /// Annualized volatility from the shrunk covariance, `sqrt(wᵀΣw·P)`.
    pub volatility: f64,
    /// Annualized expected return, `(wᵀμ)·P`.
    pub expected_return: f64,
    /// `(expected_return - risk_free_rate) / volatility`, 0 when volatility is 0.
    pub sharpe_ratio: f64,
    /// One-day historical VaR.
    pub daily_var: f64,
    /// Five-day VaR, `daily_var·√5`.
    pub weekly_var: f64,
    /// Twenty-one-day VaR, `daily_var·√21`.
    pub monthly_var: f64,
    /// Annualized standard deviation of the realized portfolio returns.
    pub realized_volatility: f64,
    /// Shrinkage intensity applied to the covariance target.
    pub shrinkage_intensity: f64,
    /// Confidence level used for the VaR triple.
    pub confidence_level: f64,
    /// Number of aligned return observations.
    pub observations: usize,
}

/// Integer risk score in `1..=10`.
///
/// Only produced by the scorer or by validated deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct RiskScore(u8);

impl RiskScore {
    /// Lowest score.
    pub const MIN: u8 = 1;
    /// Highest score.
    pub const MAX: u8 = 10;

    /// Rounds and clamps a raw score into `1..=10`.
    ///
    /// Rounding is half-to-even. Returns `None` for non-finite input.
    pub fn from_raw(raw: f64) -> Option<Self> {
        if !raw.is_finite() {
            return None;
        }
        let rounded = raw
            .round_ties_even()
            .clamp(f64::from(Self::MIN), f64::from(Self::MAX));
        Some(Self(rounded as u8))
    }

    /// The score value.
    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for RiskScore {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(CoreError::InvalidRiskScore(value))
        }
    }
}

impl From<RiskScore> for u8 {
    fn from(score: RiskScore) -> Self {
        score.0
    }
}

impl fmt::Display for RiskScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/10", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_rounds_half_even() {
        assert_eq!(RiskScore::from_raw(6.5).unwrap().value(), 6);
        assert_eq!(RiskScore::from_raw(7.5).unwrap().value(), 8);
        assert_eq!(RiskScore::from_raw(6.7).unwrap().value(), 7);
    }

    #[test]
    fn test_from_raw_clamps() {
        assert_eq!(RiskScore::from_raw(0.0).unwrap().value(), 1);
        assert_eq!(RiskScore::from_raw(-3.0).unwrap().value(), 1);
        assert_eq!(RiskScore::from_raw(42.0).unwrap().value(), 10);
        assert!(RiskScore::from_raw(f64::NAN).is_none());
        assert!(RiskScore::from_raw(f64::INFINITY).is_none());
    }

    #[test]
    fn test_serde_validates() {
        let score: RiskScore = serde_json::from_str("7").unwrap();
        assert_eq!(score.value(), 7);
        assert_eq!(serde_json::to_string(&score).unwrap(), "7");
        assert!(serde_json::from_str::<RiskScore>("0").is_err());
        assert!(serde_json::from_str::<RiskScore>("11").is_err());
    }
}
