//! Diversification commentary and per-asset suggestions.

use aegis_core::types::{
    DiversificationBand, OptimizationAction, OptimizationSuggestion, Recommendations, RiskConfig,
    RiskProfile, RiskScore, Symbol,
};
use aegis_math::statistics;

use crate::parallel::maybe_parallel_map;
use crate::returns::AlignedReturns;

/// Band for a mean pairwise correlation. `None` means no pairs exist.
pub fn diversification_band(
    average_correlation: Option<f64>,
    config: &RiskConfig,
) -> DiversificationBand {
    match average_correlation {
        None => DiversificationBand::NotApplicable,
        Some(c) if c > config.high_correlation => DiversificationBand::HighCorrelation,
        Some(c) if c > config.moderate_correlation => DiversificationBand::Moderate,
        Some(_) => DiversificationBand::WellDiversified,
    }
}

/// Risk profile for a score: 8+ high, 5-7 moderate, below 5 conservative.
pub fn risk_profile(score: RiskScore) -> RiskProfile {
    match score.value() {
        8.. => RiskProfile::High,
        5..=7 => RiskProfile::Moderate,
        _ => RiskProfile::Conservative,
    }
}

/// Sharpe ratio of a single instrument, annualized mean over annualized
/// sample standard deviation. No risk-free deduction; 0 for a flat series.
pub fn asset_sharpe(returns: &[f64], periods_per_year: f64) -> f64 {
    let annual_return = statistics::mean(returns) * periods_per_year;
    let annual_vol = statistics::sample_std(returns) * periods_per_year.sqrt();
    if annual_vol > 0.0 {
        annual_return / annual_vol
    } else {
        0.0
    }
}

/// Suggests reducing holdings with a poor Sharpe ratio and a material weight.
///
/// Emitted in input order when `sharpe < reduce_sharpe_threshold` and
/// `weight > reduce_weight_threshold`.
pub fn optimization_suggestions(
    symbols: &[Symbol],
    weights: &[f64],
    sharpes: &[f64],
    config: &RiskConfig,
) -> Vec<OptimizationSuggestion> {
    symbols
        .iter()
        .zip(weights)
        .zip(sharpes)
        .filter(|((_, &w), &s)| {
            s < config.reduce_sharpe_threshold && w > config.reduce_weight_threshold
        })
        .map(|((symbol, _), &s)| OptimizationSuggestion {
            symbol: symbol.clone(),
            action: OptimizationAction::Reduce,
            reason: format!("Poor risk-adjusted return (Sharpe ratio: {s:.2})"),
        })
        .collect()
}

/// Builds recommendations for an aligned portfolio and its score.
pub fn generate_recommendations(
    returns: &AlignedReturns,
    score: RiskScore,
    config: &RiskConfig,
) -> Recommendations {
    let average_correlation = if returns.n_instruments() < 2 {
        None
    } else {
        statistics::mean_off_diagonal(&statistics::correlation_matrix(returns.matrix()))
    };
    let band = diversification_band(average_correlation, config);
    let profile = risk_profile(score);

    let periods = config.trading_periods_per_year;
    let columns = returns.columns();
    let sharpes = maybe_parallel_map(&columns, config, |c| asset_sharpe(c, periods));
    let optimization = optimization_suggestions(returns.symbols(), returns.weights(), &sharpes, config);

    Recommendations {
        summary: profile.message().to_string(),
        diversification: band.message().to_string(),
        optimization,
        risk_profile: profile,
        diversification_band: band,
        average_correlation,
    }
}
