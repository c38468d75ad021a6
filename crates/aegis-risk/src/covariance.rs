//! Shrinkage covariance for an aligned returns panel.

use aegis_math::{ledoit_wolf, statistics, CovarianceEstimate};
use tracing::debug;

use crate::error::{RiskError, RiskResult};
use crate::returns::AlignedReturns;

/// Estimates the covariance of the aligned instruments.
///
/// Multi-instrument panels use Ledoit-Wolf shrinkage toward `μ·I`; a single
/// instrument yields its (divide-by-T) variance unshrunk. The result is
/// checked for positive semi-definiteness.
///
/// # Errors
///
/// Returns [`RiskError::InsufficientHistory`] for fewer than two rows and
/// [`RiskError::ComputationError`] if the estimate is not PSD.
pub fn estimate_covariance(returns: &AlignedReturns) -> RiskResult<CovarianceEstimate> {
    let estimate = ledoit_wolf(returns.matrix())
        .map_err(|e| RiskError::from(e).with_symbols(returns.symbols()))?;
    estimate.ensure_positive_semidefinite()?;

    debug!(
        instruments = estimate.dim(),
        shrinkage = estimate.shrinkage(),
        target_scale = estimate.target_scale(),
        "covariance estimated"
    );

    Ok(estimate)
}

/// Variance of a single return series, divide-by-T, matching the
/// single-instrument covariance path.
///
/// This is intentionally not the sample (T−1) variance, so a one-instrument
/// portfolio gets the same figure as a one-column Ledoit–Wolf estimate.
pub fn direct_variance(returns: &[f64]) -> f64 {
    statistics::population_variance(returns)
}
