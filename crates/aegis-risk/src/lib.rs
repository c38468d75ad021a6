//! # Aegis Risk
//!
//! Portfolio risk analytics:
//!
//! - **Weights**: market values to normalized weights
//! - **Returns**: simple returns aligned on common dates
//! - **Covariance**: Ledoit-Wolf shrinkage toward a scaled identity
//! - **Metrics**: annualized volatility, expected return, Sharpe ratio
//! - **VaR**: historical simulation at daily, weekly and monthly horizons
//! - **Scoring**: bounded 1-10 risk score
//! - **Recommendations**: diversification bands and reduce suggestions
//!
//! [`RiskAnalyzer`] runs all of them as one synchronous, pure pipeline.
//!
//! ## Example
//!
//! ```rust
//! use aegis_risk::var::historical_var;
//!
//! let returns = [0.015, -0.015, 0.02, -0.005];
//! let var = historical_var(&returns, 0.75).unwrap();
//! assert_eq!(var.daily, 0.005);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod calculator;
pub mod covariance;
pub mod error;
pub mod metrics;
pub mod parallel;
pub mod recommendations;
pub mod returns;
pub mod scoring;
pub mod var;
pub mod weights;

pub use calculator::RiskAnalyzer;
pub use error::{RiskError, RiskResult};
pub use returns::AlignedReturns;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::calculator::RiskAnalyzer;
    pub use crate::error::{RiskError, RiskResult};
    pub use crate::metrics::{portfolio_metrics, PortfolioMetrics};
    pub use crate::returns::{simple_returns, AlignedReturns, ReturnSeries};
    pub use crate::scoring::risk_score;
    pub use crate::var::{historical_var, VarEstimate};
    pub use crate::weights::resolve_weights;
}
