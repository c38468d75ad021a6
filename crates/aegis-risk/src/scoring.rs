//! Bounded 1-10 risk score.

use aegis_core::types::RiskScore;

use crate::error::{RiskError, RiskResult};

/// Annualized volatility that scores a factor of 1.
pub const VOLATILITY_SCALE: f64 = 0.30;
/// Daily VaR that scores a factor of 1.
pub const DAILY_VAR_SCALE: f64 = 0.03;
/// Sharpe ratio considered ideal; distance from it adds risk.
pub const IDEAL_SHARPE: f64 = 2.0;

/// Bound on each factor so their sum cannot overflow.
const FACTOR_LIMIT: f64 = f64::MAX / 4.0;

/// Unrounded score, `mean(vol/0.30, var/0.03, |sharpe - 2|/2) · 10`.
///
/// Finite inputs never give NaN; a score beyond `f64::MAX` is `+inf`.
pub fn raw_score(volatility: f64, daily_var: f64, sharpe_ratio: f64) -> f64 {
    let factors = [
        volatility / VOLATILITY_SCALE,
        daily_var / DAILY_VAR_SCALE,
        (sharpe_ratio - IDEAL_SHARPE).abs() / IDEAL_SHARPE,
    ];
    factors
        .iter()
        .map(|f| f.clamp(-FACTOR_LIMIT, FACTOR_LIMIT))
        .sum::<f64>()
        / factors.len() as f64
        * 10.0
}

/// Maps metrics to a [`RiskScore`], rounding half-to-even and clamping.
///
/// # Errors
///
/// Returns [`RiskError::ComputationError`] if any input is not finite.
pub fn risk_score(volatility: f64, daily_var: f64, sharpe_ratio: f64) -> RiskResult<RiskScore> {
    let undefined = || {
        RiskError::ComputationError(format!(
            "risk score undefined for volatility={volatility}, daily_var={daily_var}, sharpe={sharpe_ratio}"
        ))
    };
    if ![volatility, daily_var, sharpe_ratio].iter().all(|v| v.is_finite()) {
        return Err(undefined());
    }
    let raw = raw_score(volatility, daily_var, sharpe_ratio)
        .clamp(f64::from(RiskScore::MIN), f64::from(RiskScore::MAX));
    RiskScore::from_raw(raw).ok_or_else(undefined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_scenario_score() {
        let raw = raw_score(0.21158345325735584, 0.005, 4.277272093197283);
        assert_relative_eq!(raw, 6.70, epsilon = 0.01);
        assert_eq!(
            risk_score(0.21158345325735584, 0.005, 4.277272093197283)
                .unwrap()
                .value(),
            7
        );
    }

    #[test]
    fn test_ideal_portfolio_scores_minimum() {
        assert_eq!(risk_score(0.0, 0.0, 2.0).unwrap().value(), 1);
    }

    #[test]
    fn test_extreme_portfolio_scores_maximum() {
        assert_eq!(risk_score(0.9, 0.09, -4.0).unwrap().value(), 10);
    }

    #[test]
    fn test_huge_finite_inputs_saturate() {
        assert_eq!(risk_score(f64::MAX, 0.01, 1.0).unwrap().value(), 10);
        assert_eq!(risk_score(0.1, 0.01, -f64::MAX).unwrap().value(), 10);
        assert!(raw_score(f64::MAX, -f64::MAX, 2.0).is_finite());
        let score = risk_score(f64::MAX, -f64::MAX, f64::MAX).unwrap().value();
        assert!((1..=10).contains(&score));
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(matches!(
            risk_score(f64::NAN, 0.01, 1.0),
            Err(RiskError::ComputationError(_))
        ));
        assert!(risk_score(0.2, f64::INFINITY, 1.0).is_err());
    }
}
