//! # Aegis Math
//!
//! Numerical kernels for the Aegis portfolio risk engine.
//!
//! - **Statistics**: means, population/sample variance, Pearson correlation
//! - **Covariance**: maximum-likelihood sample covariance and Ledoit-Wolf
//!   shrinkage toward a scaled identity
//!
//! All matrix inputs use `nalgebra::DMatrix` with observations as rows and
//! instruments as columns.
//!
//! ## Example
//!
//! ```rust
//! use aegis_math::covariance::ledoit_wolf;
//! use nalgebra::DMatrix;
//!
//! let returns = DMatrix::from_column_slice(
//!     4,
//!     2,
//!     &[0.01, -0.02, 0.03, -0.01, 0.02, -0.01, 0.01, 0.00],
//! );
//! let estimate = ledoit_wolf(&returns).unwrap();
//! assert!(estimate.shrinkage() >= 0.0 && estimate.shrinkage() <= 1.0);
//! assert!(estimate.quadratic_form(&[0.5, 0.5]).unwrap() >= 0.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod covariance;
pub mod error;
pub mod statistics;

pub use covariance::{ledoit_wolf, sample_covariance, CovarianceEstimate};
pub use error::{MathError, MathResult};
pub use nalgebra::DMatrix;
