//! # Aegis Engine
//!
//! The portfolio risk engine.
//!
//! This crate provides:
//! - [`RiskEngine`]: fetches price history once per request and runs the
//!   risk pipeline
//! - [`RiskEngineBuilder`]: injects the price history provider
//! - [`EngineConfig`]: TOML-loadable settings
//! - [`compare`](comparison::compare): side-by-side portfolio comparison
//!
//! ## Architecture
//!
//! ```text
//! Holdings ─> weights ─> PriceHistoryProvider (one batch, timeout)
//!                              │
//!                              └─> RiskAnalyzer ─> RiskAnalysisResult
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let engine = RiskEngineBuilder::new()
//!     .with_config(EngineConfig::from_file("aegis.toml")?)
//!     .with_price_history(create_file_price_history("prices.csv")?)
//!     .build()?;
//!
//! let result = engine.analyze(&holdings).await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod builder;
pub mod comparison;
pub mod config;
pub mod engine;
pub mod error;

// Re-exports
pub use builder::RiskEngineBuilder;
pub use comparison::{ComparisonReport, PortfolioEntry, PortfolioSummary};
pub use config::EngineConfig;
pub use engine::RiskEngine;
pub use error::EngineError;
