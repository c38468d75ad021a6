//! Diversification and optimization recommendations.

use serde::{Deserialize, Serialize};

use super::Symbol;

/// Band of the average pairwise correlation between holdings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiversificationBand {
    /// Average correlation above the high band.
    HighCorrelation,
    /// Average correlation above the moderate band.
    Moderate,
    /// Average correlation at or below the moderate band.
    WellDiversified,
    /// Fewer than two instruments; there are no pairs to compare.
    NotApplicable,
}

impl DiversificationBand {
    /// Commentary shown to the portfolio owner.
    pub fn message(self) -> &'static str {
        match self {
            Self::HighCorrelation => {
                "Your portfolio shows high correlation between assets. Consider adding \
                 uncorrelated assets to improve diversification."
            }
            Self::Moderate => {
                "Your portfolio has moderate diversification. Consider adding assets from \
                 different sectors to reduce correlation."
            }
            Self::WellDiversified => {
                "Your portfolio is well-diversified with low correlation between assets."
            }
            Self::NotApplicable => {
                "Diversification analysis is not applicable to a single-instrument portfolio."
            }
        }
    }
}

/// Risk profile derived from the risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskProfile {
    /// Score 8 and above.
    High,
    /// Score 5 to 7.
    Moderate,
    /// Score below 5.
    Conservative,
}

impl RiskProfile {
    /// Summary commentary for the profile.
    pub fn message(self) -> &'static str {
        match self {
            Self::High => {
                "Your portfolio has a high risk profile. Consider reducing exposure to volatile \
                 assets if this exceeds your risk tolerance."
            }
            Self::Moderate => {
                "Your portfolio has a moderate risk profile, which is suitable for balanced \
                 investment goals."
            }
            Self::Conservative => {
                "Your portfolio has a conservative risk profile with lower potential returns \
                 but better capital preservation."
            }
        }
    }
}

/// Suggested action on a single holding. Holdings without a suggestion are
/// held as they are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizationAction {
    /// Reduce the position.
    Reduce,
}

impl OptimizationAction {
    /// Lowercase action name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Reduce => "reduce",
        }
    }
}

/// A per-asset suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationSuggestion {
    /// Instrument the suggestion applies to.
    pub symbol: Symbol,
    /// Suggested action.
    pub action: OptimizationAction,
    /// Human-readable reason.
    pub reason: String,
}

/// Recommendations attached to a risk analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    /// Summary commentary from the risk profile.
    pub summary: String,
    /// Diversification commentary.
    pub diversification: String,
    /// Per-asset suggestions in instrument input order.
    pub optimization: Vec<OptimizationSuggestion>,
    /// Risk profile behind `summary`.
    pub risk_profile: RiskProfile,
    /// Correlation band behind `diversification`.
    pub diversification_band: DiversificationBand,
    /// Mean pairwise correlation; `None` for a single instrument.
    pub average_correlation: Option<f64>,
}
