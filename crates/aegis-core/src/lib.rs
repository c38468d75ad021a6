//! # Aegis Core
//!
//! Domain value types shared by every Aegis crate:
//!
//! - **Inputs**: [`Holding`](types::Holding), [`PriceSeries`](types::PriceSeries)
//! - **Outputs**: [`RiskMetrics`](types::RiskMetrics), [`RiskScore`](types::RiskScore),
//!   [`Recommendations`](types::Recommendations),
//!   [`RiskAnalysisResult`](types::RiskAnalysisResult)
//! - **Configuration**: [`RiskConfig`](types::RiskConfig)
//!
//! Everything here is plain data: serializable, immutable once built, and
//! free of I/O.
//!
//! ## Example
//!
//! ```rust
//! use aegis_core::prelude::*;
//! use rust_decimal_macros::dec;
//!
//! let holding = Holding::from_position("AAPL", dec!(10), dec!(190));
//! assert_eq!(holding.market_value, dec!(1900));
//! assert!(RiskConfig::default().validate().is_ok());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod types;

pub use error::{CoreError, CoreResult};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::types::{
        DiversificationBand, DroppedInstrument, Holding, InstrumentWeight, OptimizationAction,
        OptimizationSuggestion, PriceSeries, Recommendations, RiskAnalysisResult, RiskConfig,
        RiskMetrics, RiskProfile, RiskScore, Symbol,
    };
}
