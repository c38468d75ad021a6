//! # Aegis Ext File
//!
//! Price history sources that need no network access:
//! - CSV-based price history source (long form `symbol,date,close`)
//! - In-memory source for tests and pre-fetched data
//! - Empty source
//!
//! For live market data, implement [`PriceHistoryProvider`] over the
//! vendor's API in a separate extension crate.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod market_data;

pub use market_data::*;

use std::path::Path;
use std::sync::Arc;

use aegis_traits::error::TraitError;
use aegis_traits::market_data::PriceHistoryProvider;

/// Create a CSV-backed price history provider.
pub fn create_file_price_history(
    prices_csv: impl AsRef<Path>,
) -> Result<Arc<dyn PriceHistoryProvider>, TraitError> {
    Ok(Arc::new(CsvPriceHistorySource::new(prices_csv)?))
}
