//! The aggregate returned by one risk analysis.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{DroppedInstrument, InstrumentWeight, Recommendations, RiskMetrics, RiskScore};

/// Result of analysing one portfolio.
///
/// Owned by the caller for persistence; the engine keeps no copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAnalysisResult {
    /// When the analysis was produced.
    pub analysis_date: DateTime<Utc>,
    /// Quantitative metrics.
    pub metrics: RiskMetrics,
    /// Bounded 1-10 score.
    pub risk_score: RiskScore,
    /// Commentary and per-asset suggestions.
    pub recommendations: Recommendations,
    /// Weights actually used, after any renormalization.
    pub weights: Vec<InstrumentWeight>,
    /// Instruments left out for lack of aligned history.
    pub dropped: Vec<DroppedInstrument>,
}

impl RiskAnalysisResult {
    /// True if every requested instrument made it into the analysis.
    pub fn is_complete(&self) -> bool {
        self.dropped.is_empty()
    }
}
