//! Aegis CLI - portfolio risk analytics from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Analyse a portfolio against a price file
//! aegis analyze --holdings holdings.csv --prices prices.csv
//!
//! # Save the result and compare it with another one later
//! aegis analyze --holdings a.csv --prices prices.csv --output a.json
//! aegis compare a.json b.json
//! ```

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod commands;
mod error;
mod output;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Set up output format
    let format = cli.format;

    // Execute command
    match cli.command {
        Commands::Analyze(args) => commands::analyze::execute(args, format).await?,
        Commands::Compare(args) => commands::compare::execute(args, format)?,
    }

    Ok(())
}
