//! File-based and in-memory price history sources.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use aegis_core::types::{PriceSeries, Symbol};
use async_trait::async_trait;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use dashmap::DashMap;
use serde::Deserialize;
use tracing::debug;

use aegis_traits::error::TraitError;
use aegis_traits::market_data::*;

// =============================================================================
// CSV PRICE HISTORY SOURCE
// =============================================================================

/// CSV record for close prices.
#[derive(Debug, Deserialize)]
struct PriceRecord {
    symbol: String,
    date: String,
    close: f64,
}

/// Parses `YYYY-MM-DD` or an RFC 3339 timestamp.
fn parse_date(s: &str) -> Result<DateTime<Utc>, TraitError> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| TraitError::ParseError(format!("invalid date '{s}'")))
}

/// CSV-based price history source for EOD files and offline analysis.
///
/// The file is read once on construction and again on [`reload`](Self::reload).
pub struct CsvPriceHistorySource {
    file_path: PathBuf,
    series: DashMap<Symbol, PriceSeries>,
}

impl CsvPriceHistorySource {
    /// Create a new CSV price history source.
    pub fn new(file_path: impl AsRef<Path>) -> Result<Self, TraitError> {
        let source = Self {
            file_path: file_path.as_ref().to_path_buf(),
            series: DashMap::new(),
        };
        source.reload()?;
        Ok(source)
    }

    /// Reload prices from file.
    pub fn reload(&self) -> Result<(), TraitError> {
        if !self.file_path.exists() {
            self.series.clear();
            return Ok(()); // Empty source
        }

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&self.file_path)
            .map_err(|e| TraitError::IoError(e.to_string()))?;

        let mut points: HashMap<Symbol, Vec<(DateTime<Utc>, f64)>> = HashMap::new();
        for result in reader.deserialize() {
            let record: PriceRecord = result.map_err(|e| TraitError::ParseError(e.to_string()))?;
            let symbol = Symbol::new(&record.symbol);
            if symbol.is_empty() {
                return Err(TraitError::ParseError("row with empty symbol".into()));
            }
            let date = parse_date(&record.date)?;
            points.entry(symbol).or_default().push((date, record.close));
        }

        self.series.clear();
        for (symbol, pts) in points {
            let series = PriceSeries::from_points(symbol.clone(), pts);
            self.series.insert(symbol, series);
        }

        debug!(
            path = %self.file_path.display(),
            symbols = self.series.len(),
            "loaded price history"
        );
        Ok(())
    }

    /// Symbols available in the file.
    pub fn symbols(&self) -> Vec<Symbol> {
        let mut out: Vec<Symbol> = self.series.iter().map(|e| e.key().clone()).collect();
        out.sort();
        out
    }
}

#[async_trait]
impl PriceHistoryProvider for CsvPriceHistorySource {
    fn source_type(&self) -> SourceType {
        SourceType::File
    }

    async fn fetch_history(
        &self,
        symbols: &[Symbol],
        period: HistoryPeriod,
        interval: Interval,
    ) -> Result<HashMap<Symbol, PriceSeries>, TraitError> {
        Ok(select(&self.series, symbols, period, interval))
    }
}

// =============================================================================
// IN-MEMORY PRICE HISTORY SOURCE
// =============================================================================

/// In-memory price history source.
#[derive(Default)]
pub struct InMemoryPriceHistorySource {
    series: DashMap<Symbol, PriceSeries>,
}

impl InMemoryPriceHistorySource {
    /// Create an empty in-memory source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source holding the given series.
    pub fn with_series(series: impl IntoIterator<Item = PriceSeries>) -> Self {
        let source = Self::new();
        for s in series {
            source.insert(s);
        }
        source
    }

    /// Insert or replace a series.
    pub fn insert(&self, series: PriceSeries) {
        self.series.insert(series.symbol().clone(), series);
    }
}

#[async_trait]
impl PriceHistoryProvider for InMemoryPriceHistorySource {
    fn source_type(&self) -> SourceType {
        SourceType::InMemory
    }

    async fn fetch_history(
        &self,
        symbols: &[Symbol],
        period: HistoryPeriod,
        interval: Interval,
    ) -> Result<HashMap<Symbol, PriceSeries>, TraitError> {
        Ok(select(&self.series, symbols, period, interval))
    }
}

// =============================================================================
// EMPTY SOURCE
// =============================================================================

/// Empty price history source for testing.
pub struct EmptyPriceHistorySource;

#[async_trait]
impl PriceHistoryProvider for EmptyPriceHistorySource {
    fn source_type(&self) -> SourceType {
        SourceType::InMemory
    }

    async fn fetch_history(
        &self,
        _symbols: &[Symbol],
        _period: HistoryPeriod,
        _interval: Interval,
    ) -> Result<HashMap<Symbol, PriceSeries>, TraitError> {
        Ok(HashMap::new())
    }
}

// =============================================================================
// SELECTION
// =============================================================================

/// Picks the requested symbols, resamples them to `interval` and trims
/// them to `period` ending at the latest date in the batch.
fn select(
    store: &DashMap<Symbol, PriceSeries>,
    symbols: &[Symbol],
    period: HistoryPeriod,
    interval: Interval,
) -> HashMap<Symbol, PriceSeries> {
    let found: Vec<PriceSeries> = symbols
        .iter()
        .filter_map(|s| store.get(s).map(|e| resample(e.value(), interval)))
        .collect();

    let end = found.iter().filter_map(PriceSeries::latest_date).max();
    let cutoff = end.and_then(|end| period.cutoff(end));

    found
        .into_iter()
        .map(|s| {
            let s = match cutoff {
                Some(c) => s.since(c),
                None => s,
            };
            (s.symbol().clone(), s)
        })
        .collect()
}

/// Keeps the last close of each week or month. Daily series are unchanged.
pub fn resample(series: &PriceSeries, interval: Interval) -> PriceSeries {
    if interval == Interval::Daily {
        return series.clone();
    }

    let bucket = |d: &DateTime<Utc>| -> (i32, u32) {
        match interval {
            Interval::Daily => (d.year(), d.ordinal()),
            Interval::Weekly => {
                let w = d.iso_week();
                (w.year(), w.week())
            }
            Interval::Monthly => (d.year(), d.month()),
        }
    };

    let mut points: Vec<(DateTime<Utc>, f64)> = Vec::new();
    for (date, close) in series.points() {
        match points.last_mut() {
            Some(last) if bucket(&last.0) == bucket(&date) => *last = (date, close),
            _ => points.push((date, close)),
        }
    }
    PriceSeries::from_points(series.symbol().clone(), points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::io::Write;

    fn day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2024-03-01").unwrap(), day(2024, 3, 1));
        assert_eq!(parse_date("2024-03-01T00:00:00Z").unwrap(), day(2024, 3, 1));
        assert!(parse_date("03/01/2024").is_err());
    }

    #[tokio::test]
    async fn test_csv_source_groups_and_sorts() {
        let file = write_csv(
            "symbol,date,close\n\
             AAPL,2024-01-03,102.0\n\
             AAPL,2024-01-02,101.0\n\
             MSFT,2024-01-02,300.0\n\
             AAPL,2024-01-04,103.0\n",
        );
        let source = CsvPriceHistorySource::new(file.path()).unwrap();
        assert_eq!(source.symbols(), vec![Symbol::from("AAPL"), Symbol::from("MSFT")]);

        let out = source
            .fetch_history(
                &["AAPL".into(), "NOPE".into()],
                HistoryPeriod::Max,
                Interval::Daily,
            )
            .await
            .unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out["AAPL"].closes(), &[101.0, 102.0, 103.0]);
        assert_eq!(source.source_type(), SourceType::File);
    }

    #[tokio::test]
    async fn test_csv_source_bad_row() {
        let file = write_csv("symbol,date,close\nAAPL,2024-01-03,abc\n");
        assert!(matches!(
            CsvPriceHistorySource::new(file.path()),
            Err(TraitError::ParseError(_))
        ));
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let source = CsvPriceHistorySource::new(dir.path().join("none.csv")).unwrap();
        assert!(source.symbols().is_empty());
    }

    #[tokio::test]
    async fn test_period_cutoff_uses_latest_batch_date() {
        let a = PriceSeries::from_points(
            "A",
            vec![(day(2024, 1, 1), 1.0), (day(2024, 2, 15), 2.0), (day(2024, 3, 1), 3.0)],
        );
        let b = PriceSeries::from_points("B", vec![(day(2024, 1, 20), 5.0), (day(2024, 2, 20), 6.0)]);
        let source = InMemoryPriceHistorySource::with_series(vec![a, b]);

        let out = source
            .fetch_history(
                &["A".into(), "B".into()],
                HistoryPeriod::Months(1),
                Interval::Daily,
            )
            .await
            .unwrap();
        // Window ends 2024-03-01, starts 2024-02-01.
        assert_eq!(out["A"].closes(), &[2.0, 3.0]);
        assert_eq!(out["B"].closes(), &[6.0]);
    }

    #[test]
    fn test_resample_weekly_and_monthly() {
        let s = PriceSeries::from_points(
            "A",
            vec![
                (day(2024, 1, 1), 1.0),  // Mon, week 1
                (day(2024, 1, 5), 2.0),  // Fri, week 1
                (day(2024, 1, 8), 3.0),  // Mon, week 2
                (day(2024, 2, 1), 4.0),  // Thu, week 5
                (day(2024, 2, 2), 5.0),  // Fri, week 5
            ],
        );
        let weekly = resample(&s, Interval::Weekly);
        assert_eq!(weekly.closes(), &[2.0, 3.0, 5.0]);
        assert_eq!(weekly.dates()[0], day(2024, 1, 5));

        let monthly = resample(&s, Interval::Monthly);
        assert_eq!(monthly.closes(), &[3.0, 5.0]);
        assert_eq!(resample(&s, Interval::Daily), s);
    }

    #[tokio::test]
    async fn test_empty_source() {
        let out = EmptyPriceHistorySource
            .fetch_history(&["A".into()], HistoryPeriod::default(), Interval::Daily)
            .await
            .unwrap();
        assert!(out.is_empty());
    }
}
