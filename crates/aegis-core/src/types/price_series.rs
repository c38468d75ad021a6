//! Historical close prices for one instrument.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Symbol;
use crate::error::{CoreError, CoreResult};

/// Ordered close prices for a single instrument.
///
/// Dates are strictly increasing. Different instruments may cover different
/// dates; alignment happens when returns are computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PriceSeriesData")]
pub struct PriceSeries {
    symbol: Symbol,
    dates: Vec<DateTime<Utc>>,
    closes: Vec<f64>,
}

/// Unvalidated wire form; deserialization goes through [`PriceSeries::new`].
#[derive(Deserialize)]
struct PriceSeriesData {
    symbol: Symbol,
    dates: Vec<DateTime<Utc>>,
    closes: Vec<f64>,
}

impl TryFrom<PriceSeriesData> for PriceSeries {
    type Error = CoreError;

    fn try_from(data: PriceSeriesData) -> Result<Self, Self::Error> {
        Self::new(data.symbol, data.dates, data.closes)
    }
}

impl PriceSeries {
    /// Creates a series from parallel date and close vectors.
    ///
    /// # Errors
    ///
    /// Fails when the vectors differ in length or the dates are not strictly
    /// increasing.
    pub fn new(
        symbol: impl Into<Symbol>,
        dates: Vec<DateTime<Utc>>,
        closes: Vec<f64>,
    ) -> CoreResult<Self> {
        let symbol = symbol.into();
        if dates.len() != closes.len() {
            return Err(CoreError::SeriesLengthMismatch {
                symbol: symbol.to_string(),
                dates: dates.len(),
                closes: closes.len(),
            });
        }
        if let Some(index) = dates.windows(2).position(|w| w[1] <= w[0]) {
            return Err(CoreError::UnorderedSeries {
                symbol: symbol.to_string(),
                index: index + 1,
            });
        }
        Ok(Self {
            symbol,
            dates,
            closes,
        })
    }

    /// Creates a series from unordered `(date, close)` points.
    ///
    /// Points are sorted by date; for duplicate dates the last point wins.
    pub fn from_points(symbol: impl Into<Symbol>, mut points: Vec<(DateTime<Utc>, f64)>) -> Self {
        points.sort_by_key(|(d, _)| *d);

        let mut dates: Vec<DateTime<Utc>> = Vec::with_capacity(points.len());
        let mut closes: Vec<f64> = Vec::with_capacity(points.len());
        for (date, close) in points {
            if dates.last() == Some(&date) {
                if let Some(last) = closes.last_mut() {
                    *last = close;
                }
            } else {
                dates.push(date);
                closes.push(close);
            }
        }

        Self {
            symbol: symbol.into(),
            dates,
            closes,
        }
    }

    /// Instrument symbol.
    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Observation dates.
    pub fn dates(&self) -> &[DateTime<Utc>] {
        &self.dates
    }

    /// Close prices.
    pub fn closes(&self) -> &[f64] {
        &self.closes
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.closes.len()
    }

    /// True if the series has no observations.
    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    /// Date of the most recent observation.
    pub fn latest_date(&self) -> Option<DateTime<Utc>> {
        self.dates.last().copied()
    }

    /// Iterates `(date, close)` pairs in date order.
    pub fn points(&self) -> impl Iterator<Item = (DateTime<Utc>, f64)> + '_ {
        self.dates.iter().copied().zip(self.closes.iter().copied())
    }

    /// Keeps only observations on or after `cutoff`.
    pub fn since(&self, cutoff: DateTime<Utc>) -> Self {
        let start = self.dates.partition_point(|d| *d < cutoff);
        Self {
            symbol: self.symbol.clone(),
            dates: self.dates[start..].to_vec(),
            closes: self.closes[start..].to_vec(),
        }
    }
}
