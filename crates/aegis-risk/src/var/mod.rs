//! Value at Risk.

mod historical;

pub use historical::{historical_var, min_observations, VarEstimate};
