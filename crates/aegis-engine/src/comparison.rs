//! Side-by-side comparison of stored analyses.

use aegis_core::types::{RiskAnalysisResult, RiskScore};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// A portfolio offered for comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioEntry {
    /// Portfolio identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Latest analysis, if one exists.
    pub analysis: Option<RiskAnalysisResult>,
}

/// Headline figures of one analysed portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    /// Portfolio identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Risk score.
    pub risk_score: RiskScore,
    /// Annualized volatility.
    pub volatility: f64,
    /// Sharpe ratio.
    pub sharpe_ratio: f64,
    /// Daily VaR at the analysis confidence level.
    pub daily_var: f64,
    /// When the analysis was produced.
    pub analysis_date: DateTime<Utc>,
}

/// Result of comparing portfolios.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    /// Analysed portfolios in input order.
    pub portfolios: Vec<PortfolioSummary>,
    /// Portfolios left out because they have no analysis.
    pub skipped: Vec<String>,
    /// Id of the portfolio with the lowest risk score (first on ties).
    pub lowest_risk: String,
    /// Id of the portfolio with the highest Sharpe ratio (first on ties).
    pub best_sharpe: String,
}

/// Compares portfolios by their latest analyses.
///
/// # Errors
///
/// Fails with [`EngineError::ComparisonError`] for fewer than two entries or
/// fewer than two entries with an analysis.
pub fn compare(entries: &[PortfolioEntry]) -> Result<ComparisonReport, EngineError> {
    if entries.len() < 2 {
        return Err(EngineError::ComparisonError(
            "provide at least two portfolios for comparison".into(),
        ));
    }

    let mut portfolios = Vec::with_capacity(entries.len());
    let mut skipped = Vec::new();
    for entry in entries {
        match &entry.analysis {
            Some(a) => portfolios.push(PortfolioSummary {
                id: entry.id.clone(),
                name: entry.name.clone(),
                risk_score: a.risk_score,
                volatility: a.metrics.volatility,
                sharpe_ratio: a.metrics.sharpe_ratio,
                daily_var: a.metrics.daily_var,
                analysis_date: a.analysis_date,
            }),
            None => skipped.push(entry.id.clone()),
        }
    }

    if portfolios.len() < 2 {
        return Err(EngineError::ComparisonError(format!(
            "only {} of {} portfolios have a risk analysis",
            portfolios.len(),
            entries.len()
        )));
    }

    let mut lowest = &portfolios[0];
    let mut best = &portfolios[0];
    for p in &portfolios[1..] {
        if p.risk_score < lowest.risk_score {
            lowest = p;
        }
        if p.sharpe_ratio > best.sharpe_ratio {
            best = p;
        }
    }
    let lowest_risk = lowest.id.clone();
    let best_sharpe = best.id.clone();

    Ok(ComparisonReport {
        portfolios,
        skipped,
        lowest_risk,
        best_sharpe,
    })
}
