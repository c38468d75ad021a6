//! Compare command implementation.
//!
//! Loads saved analyses and ranks them side by side.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use tabled::Tabled;

use aegis_core::types::RiskAnalysisResult;
use aegis_engine::comparison::compare;
use aegis_engine::PortfolioEntry;

use crate::cli::OutputFormat;
use crate::commands::ensure_exists;
use crate::error::CliError;
use crate::output::{format_percent, print_header, print_json, print_table};

/// Arguments for the compare command.
#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Saved analysis files (JSON from `aegis analyze --output`)
    #[arg(required = true, num_args = 2..)]
    pub files: Vec<PathBuf>,
}

#[derive(Tabled)]
struct ComparisonRow {
    #[tabled(rename = "Portfolio")]
    name: String,
    #[tabled(rename = "Score")]
    score: String,
    #[tabled(rename = "Volatility")]
    volatility: String,
    #[tabled(rename = "Sharpe")]
    sharpe: String,
    #[tabled(rename = "Daily VaR")]
    daily_var: String,
    #[tabled(rename = "Analysed")]
    date: String,
}

fn load_entry(path: &Path) -> Result<PortfolioEntry, CliError> {
    ensure_exists(path)?;
    let content = std::fs::read_to_string(path)?;
    let analysis: RiskAnalysisResult = serde_json::from_str(&content)
        .map_err(|e| CliError::Serialization(format!("{}: {e}", path.display())))?;
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(PortfolioEntry {
        id: name.clone(),
        name,
        analysis: Some(analysis),
    })
}

/// Execute the compare command.
pub fn execute(args: CompareArgs, format: OutputFormat) -> Result<()> {
    let entries = args
        .files
        .iter()
        .map(|p| load_entry(p))
        .collect::<Result<Vec<_>, _>>()?;
    let report = compare(&entries)?;

    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Table => {
            print_header("Portfolio Comparison");
            let rows: Vec<ComparisonRow> = report
                .portfolios
                .iter()
                .map(|p| ComparisonRow {
                    name: p.name.clone(),
                    score: p.risk_score.to_string(),
                    volatility: format_percent(p.volatility),
                    sharpe: format!("{:.2}", p.sharpe_ratio),
                    daily_var: format_percent(p.daily_var),
                    date: p.analysis_date.format("%Y-%m-%d").to_string(),
                })
                .collect();
            print_table(&rows);
            println!("Lowest risk: {}", report.lowest_risk);
            println!("Best Sharpe ratio: {}", report.best_sharpe);
        }
    }
    Ok(())
}
