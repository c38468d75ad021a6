//! Annualized portfolio metrics from weights, covariance and mean returns.

use aegis_core::types::RiskConfig;
use aegis_math::{statistics, CovarianceEstimate};

use crate::error::{RiskError, RiskResult};

/// Annualized volatility, expected return and Sharpe ratio of a portfolio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortfolioMetrics {
    /// Per-period portfolio variance `wᵀΣw`.
    pub variance: f64,
    /// `sqrt(variance·P)`.
    pub volatility: f64,
    /// `(wᵀμ)·P`.
    pub expected_return: f64,
    /// `(expected_return - rf) / volatility`, or 0 when volatility is 0.
    pub sharpe_ratio: f64,
}

/// Computes portfolio metrics.
///
/// # Errors
///
/// Returns [`RiskError::ComputationError`] if the dimensions disagree or the
/// result is not finite.
pub fn portfolio_metrics(
    weights: &[f64],
    covariance: &CovarianceEstimate,
    mean_returns: &[f64],
    config: &RiskConfig,
) -> RiskResult<PortfolioMetrics> {
    if mean_returns.len() != weights.len() {
        return Err(RiskError::ComputationError(format!(
            "{} mean returns for {} weights",
            mean_returns.len(),
            weights.len()
        )));
    }

    let periods = config.trading_periods_per_year;
    // Round-off can leave a zero-variance portfolio marginally negative.
    let variance = covariance.quadratic_form(weights)?.max(0.0);
    let volatility = (variance * periods).sqrt();
    let expected_return = statistics::dot(weights, mean_returns) * periods;
    let sharpe_ratio = sharpe(expected_return, volatility, config.risk_free_rate);

    if !(volatility.is_finite() && expected_return.is_finite() && sharpe_ratio.is_finite()) {
        return Err(RiskError::ComputationError(
            "non-finite portfolio metrics".to_string(),
        ));
    }

    Ok(PortfolioMetrics {
        variance,
        volatility,
        expected_return,
        sharpe_ratio,
    })
}

/// Excess return over volatility, 0 when volatility is not positive.
pub fn sharpe(expected_return: f64, volatility: f64, risk_free_rate: f64) -> f64 {
    if volatility > 0.0 {
        (expected_return - risk_free_rate) / volatility
    } else {
        0.0
    }
}

/// Annualized population standard deviation of realized portfolio returns.
pub fn realized_volatility(portfolio_returns: &[f64], periods_per_year: f64) -> f64 {
    statistics::population_std(portfolio_returns) * periods_per_year.sqrt()
}
