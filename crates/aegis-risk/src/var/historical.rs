//! Historical-simulation VaR.

use crate::error::{RiskError, RiskResult};

/// Trading days in a week, for square-root-of-time scaling.
pub const WEEKLY_HORIZON_DAYS: f64 = 5.0;
/// Trading days in a month, for square-root-of-time scaling.
pub const MONTHLY_HORIZON_DAYS: f64 = 21.0;

const TAIL_TOLERANCE: f64 = 1e-9;

/// VaR at three horizons, as positive loss fractions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VarEstimate {
    /// One-day VaR.
    pub daily: f64,
    /// `daily·√5`.
    pub weekly: f64,
    /// `daily·√21`.
    pub monthly: f64,
    /// Confidence level used.
    pub confidence_level: f64,
    /// Number of returns the quantile was taken from.
    pub observations: usize,
}

/// Minimum number of returns needed to resolve the `1 - confidence` tail,
/// `ceil(1 / (1 - c))`.
pub fn min_observations(confidence_level: f64) -> usize {
    let n = (1.0 / (1.0 - confidence_level) - TAIL_TOLERANCE).ceil();
    (n as usize).max(1)
}

/// Calculates historical VaR from realized portfolio returns.
///
/// Returns are sorted ascending and the one at `floor((1 - c)·n)` is taken;
/// a positive return there means no loss, so VaR is 0.
///
/// # Errors
///
/// - [`RiskError::InvalidInput`] if `confidence_level` is not in (0, 1)
/// - [`RiskError::InsufficientHistory`] if there are fewer than
///   [`min_observations`] returns
/// - [`RiskError::ComputationError`] for non-finite returns
pub fn historical_var(returns: &[f64], confidence_level: f64) -> RiskResult<VarEstimate> {
    if !(confidence_level > 0.0 && confidence_level < 1.0) {
        return Err(RiskError::InvalidInput(format!(
            "confidence level {confidence_level} must be between 0 and 1"
        )));
    }

    let required = min_observations(confidence_level);
    if returns.len() < required {
        return Err(RiskError::InsufficientHistory {
            symbols: Vec::new(),
            required,
            actual: returns.len(),
        });
    }
    if returns.iter().any(|r| !r.is_finite()) {
        return Err(RiskError::ComputationError(
            "non-finite portfolio return".to_string(),
        ));
    }

    // Sort returns (ascending - worst returns first)
    let mut sorted = returns.to_vec();
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len();
    let index = (((1.0 - confidence_level) * n as f64).floor() as usize).min(n - 1);
    let tail = sorted[index];
    let daily = if tail < 0.0 { -tail } else { 0.0 };

    Ok(VarEstimate {
        daily,
        weekly: daily * WEEKLY_HORIZON_DAYS.sqrt(),
        monthly: daily * MONTHLY_HORIZON_DAYS.sqrt(),
        confidence_level,
        observations: n,
    })
}
