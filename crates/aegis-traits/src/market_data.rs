//! Price history source traits.
//!
//! - [`PriceHistoryProvider`]: batch close-price histories for a symbol set
//! - [`HistoryPeriod`] and [`Interval`]: how much history, at what spacing

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use aegis_core::types::{PriceSeries, Symbol};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TraitError;

/// Source type for market data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceType {
    /// Snapshot/request-response (REST APIs)
    Snapshot,
    /// File-based (CSV, JSON)
    File,
    /// Held in memory (tests, pre-fetched data)
    InMemory,
}

// =============================================================================
// REQUEST PARAMETERS
// =============================================================================

/// Look-back window for a history request, e.g. `"1y"`, `"6mo"`, `"5d"`, `"max"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum HistoryPeriod {
    /// Calendar days.
    Days(u32),
    /// Calendar months.
    Months(u32),
    /// Calendar years.
    Years(u32),
    /// Everything the source has.
    Max,
}

impl HistoryPeriod {
    /// Earliest date inside the window ending at `end`, or `None` for
    /// [`HistoryPeriod::Max`].
    pub fn cutoff(self, end: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Self::Days(d) => end.checked_sub_signed(Duration::days(i64::from(d))),
            Self::Months(m) => end.checked_sub_months(Months::new(m)),
            Self::Years(y) => end.checked_sub_months(Months::new(y.saturating_mul(12))),
            Self::Max => None,
        }
    }
}

impl Default for HistoryPeriod {
    fn default() -> Self {
        Self::Years(1)
    }
}

impl fmt::Display for HistoryPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Days(d) => write!(f, "{d}d"),
            Self::Months(m) => write!(f, "{m}mo"),
            Self::Years(y) => write!(f, "{y}y"),
            Self::Max => f.write_str("max"),
        }
    }
}

impl FromStr for HistoryPeriod {
    type Err = TraitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        if s == "max" {
            return Ok(Self::Max);
        }
        let split = s
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| TraitError::ParseError(format!("history period '{s}' has no unit")))?;
        let (count, unit) = s.split_at(split);
        let count: u32 = count
            .parse()
            .map_err(|_| TraitError::ParseError(format!("history period '{s}' has no count")))?;
        if count == 0 {
            return Err(TraitError::InvalidInput(format!(
                "history period '{s}' must be positive"
            )));
        }
        match unit {
            "d" => Ok(Self::Days(count)),
            "mo" => Ok(Self::Months(count)),
            "y" => Ok(Self::Years(count)),
            other => Err(TraitError::ParseError(format!(
                "unknown history period unit '{other}'"
            ))),
        }
    }
}

impl TryFrom<String> for HistoryPeriod {
    type Error = TraitError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<HistoryPeriod> for String {
    fn from(p: HistoryPeriod) -> Self {
        p.to_string()
    }
}

/// Spacing between observations: `"1d"`, `"1wk"` or `"1mo"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Interval {
    /// One observation per trading day.
    #[default]
    Daily,
    /// One observation per week.
    Weekly,
    /// One observation per month.
    Monthly,
}

impl Interval {
    /// Return periods in a year at this spacing.
    pub fn periods_per_year(self) -> f64 {
        match self {
            Self::Daily => 252.0,
            Self::Weekly => 52.0,
            Self::Monthly => 12.0,
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Daily => "1d",
            Self::Weekly => "1wk",
            Self::Monthly => "1mo",
        })
    }
}

impl FromStr for Interval {
    type Err = TraitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1d" => Ok(Self::Daily),
            "1wk" => Ok(Self::Weekly),
            "1mo" => Ok(Self::Monthly),
            other => Err(TraitError::ParseError(format!("unknown interval '{other}'"))),
        }
    }
}

impl TryFrom<String> for Interval {
    type Error = TraitError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Interval> for String {
    fn from(i: Interval) -> Self {
        i.to_string()
    }
}

// =============================================================================
// PRICE HISTORY PROVIDER
// =============================================================================

/// Trait for price history providers.
///
/// The engine issues one batch request per analysis. Symbols the source does
/// not know are simply absent from the returned map; any other failure is an
/// error. Providers may cache, but callers never assume the data is fresh.
#[async_trait]
pub trait PriceHistoryProvider: Send + Sync {
    /// Source type.
    fn source_type(&self) -> SourceType;

    /// Fetch close-price histories for every symbol in one call.
    async fn fetch_history(
        &self,
        symbols: &[Symbol],
        period: HistoryPeriod,
        interval: Interval,
    ) -> Result<HashMap<Symbol, PriceSeries>, TraitError>;
}
