//! # Aegis Traits
//!
//! Trait definitions for the Aegis risk engine.
//!
//! This crate contains ONLY trait definitions and their parameter types.
//! Implementations live in extension crates such as `aegis-ext-file`.
//!
//! ## Module Structure
//!
//! - [`market_data`]: Price history providers and request parameters
//! - [`error`]: Errors returned by providers
//!
//! ## Dependency Injection
//!
//! The risk engine receives a provider instead of reaching for a global:
//!
//! ```ignore
//! RiskEngineBuilder::new()
//!     .with_price_history(Arc::new(impl PriceHistoryProvider))
//!     .build()
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod market_data;

// Re-export commonly used types
pub use error::TraitError;
pub use market_data::{HistoryPeriod, Interval, PriceHistoryProvider, SourceType};
