//! Domain value types.

mod analysis;
mod config;
mod holding;
mod metrics;
mod price_series;
mod recommendation;
mod symbol;

pub use analysis::RiskAnalysisResult;
pub use config::RiskConfig;
pub use holding::{DroppedInstrument, Holding, InstrumentWeight};
pub use metrics::{RiskMetrics, RiskScore};
pub use price_series::PriceSeries;
pub use recommendation::{
    DiversificationBand, OptimizationAction, OptimizationSuggestion, Recommendations, RiskProfile,
};
pub use symbol::{join_symbols, Symbol};
