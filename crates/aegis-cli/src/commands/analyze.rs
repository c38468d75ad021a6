//! Analyze command implementation.
//!
//! Runs the risk pipeline for a holdings file against a price file.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use tabled::Tabled;
use tracing::debug;

use aegis_core::types::RiskAnalysisResult;
use aegis_engine::{EngineConfig, RiskEngineBuilder};
use aegis_ext_file::create_file_price_history;
use aegis_traits::HistoryPeriod;

use crate::cli::OutputFormat;
use crate::commands::{ensure_exists, load_holdings};
use crate::error::CliError;
use crate::output::{
    format_percent, print_header, print_json, print_success, print_table, print_warning, KeyValue,
};

/// Arguments for the analyze command.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Holdings CSV (symbol,market_value or symbol,quantity,price)
    #[arg(long)]
    pub holdings: PathBuf,

    /// Price history CSV (symbol,date,close)
    #[arg(long)]
    pub prices: PathBuf,

    /// VaR confidence level, e.g. 0.95
    #[arg(short, long)]
    pub confidence: Option<f64>,

    /// History window, e.g. 1y, 6mo, max
    #[arg(long)]
    pub period: Option<HistoryPeriod>,

    /// Engine configuration file (TOML)
    #[arg(long, env = "AEGIS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Write the full result as JSON to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Tabled)]
struct WeightRow {
    #[tabled(rename = "Symbol")]
    symbol: String,
    #[tabled(rename = "Weight")]
    weight: String,
}

#[derive(Tabled)]
struct SuggestionRow {
    #[tabled(rename = "Symbol")]
    symbol: String,
    #[tabled(rename = "Action")]
    action: String,
    #[tabled(rename = "Reason")]
    reason: String,
}

/// Execute the analyze command.
pub async fn execute(args: AnalyzeArgs, format: OutputFormat) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };
    if let Some(c) = args.confidence {
        config.risk.confidence_level = c;
    }
    if let Some(p) = args.period {
        config.history_period = p;
    }

    let holdings = load_holdings(&args.holdings)?;
    debug!(holdings = holdings.len(), path = %args.holdings.display(), "loaded holdings");
    ensure_exists(&args.prices)?;
    let provider = create_file_price_history(&args.prices)?;

    let engine = RiskEngineBuilder::new()
        .with_config(config)
        .with_price_history(provider)
        .build()?;
    let result = engine.analyze(&holdings).await?;

    if let Some(path) = &args.output {
        let json = serde_json::to_string_pretty(&result)
            .map_err(|e| CliError::Serialization(e.to_string()))?;
        std::fs::write(path, json).map_err(CliError::from)?;
    }

    match format {
        OutputFormat::Json => print_json(&result)?,
        OutputFormat::Table => print_report(&result),
    }

    if let Some(path) = &args.output {
        if format == OutputFormat::Table {
            print_success(&format!("Saved analysis to {}", path.display()));
        }
    }
    Ok(())
}

fn print_report(result: &RiskAnalysisResult) {
    let m = &result.metrics;
    let confidence = format_percent(m.confidence_level);

    print_header("Risk Metrics");
    print_table(&[
        KeyValue::new("Risk score", result.risk_score.to_string()),
        KeyValue::from_percent("Volatility (annual)", m.volatility),
        KeyValue::from_percent("Expected return (annual)", m.expected_return),
        KeyValue::from_f64("Sharpe ratio", m.sharpe_ratio, 2),
        KeyValue::from_percent(format!("Daily VaR ({confidence})"), m.daily_var),
        KeyValue::from_percent(format!("Weekly VaR ({confidence})"), m.weekly_var),
        KeyValue::from_percent(format!("Monthly VaR ({confidence})"), m.monthly_var),
        KeyValue::from_percent("Realized volatility", m.realized_volatility),
        KeyValue::from_f64("Shrinkage intensity", m.shrinkage_intensity, 4),
        KeyValue::new("Observations", m.observations.to_string()),
        KeyValue::new(
            "Analysis date",
            result.analysis_date.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        ),
    ]);

    print_header("Weights");
    let weights: Vec<WeightRow> = result
        .weights
        .iter()
        .map(|w| WeightRow {
            symbol: w.symbol.to_string(),
            weight: format_percent(w.weight),
        })
        .collect();
    print_table(&weights);

    for d in &result.dropped {
        print_warning(&format!(
            "{} excluded: only {} return observations",
            d.symbol, d.observations
        ));
    }

    let recs = &result.recommendations;
    print_header("Recommendations");
    println!("{}", recs.summary);
    println!("{}", recs.diversification);
    if let Some(c) = recs.average_correlation {
        println!("Average pairwise correlation: {c:.2}");
    }

    if !recs.optimization.is_empty() {
        print_header("Suggestions");
        let rows: Vec<SuggestionRow> = recs
            .optimization
            .iter()
            .map(|s| SuggestionRow {
                symbol: s.symbol.to_string(),
                action: s.action.as_str().to_string(),
                reason: s.reason.clone(),
            })
            .collect();
        print_table(&rows);
    }
}
