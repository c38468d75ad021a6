//! Engine tests with in-memory and mock providers.

use std::collections::HashMap;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration as StdDuration;

use aegis_core::types::{Holding, PriceSeries, Symbol};
use aegis_engine::{EngineConfig, EngineError, PortfolioEntry, RiskEngine, RiskEngineBuilder};
use aegis_ext_file::{
    create_file_price_history, EmptyPriceHistorySource, InMemoryPriceHistorySource,
};
use aegis_risk::RiskError;
use aegis_traits::{HistoryPeriod, Interval, PriceHistoryProvider, SourceType, TraitError};
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal_macros::dec;

const DAYS: i64 = 80;

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

fn series(symbol: &str, f: impl Fn(f64) -> f64) -> PriceSeries {
    let mut close = 100.0;
    let mut points = vec![(start(), close)];
    for t in 1..=DAYS {
        close *= 1.0 + f(t as f64);
        points.push((start() + Duration::days(t), close));
    }
    PriceSeries::from_points(symbol, points)
}

fn universe() -> Vec<PriceSeries> {
    vec![
        series("AAPL", |t| 0.01 * (1.3 * t).sin() + 0.002),
        series("MSFT", |t| 0.009 * (1.3 * t).sin() + 0.004 * (2.1 * t).cos()),
        series("XOM", |t| 0.01 * (0.7 * t + 1.0).cos()),
        series("BOND", |t| 0.001 * (0.3 * t).sin() + 0.0002),
    ]
}

fn engine_with(provider: Arc<dyn PriceHistoryProvider>) -> RiskEngine {
    RiskEngineBuilder::new()
        .with_config(EngineConfig {
            history_period: HistoryPeriod::Max,
            ..EngineConfig::default()
        })
        .with_price_history(provider)
        .build()
        .unwrap()
}

fn holdings() -> Vec<Holding> {
    vec![
        Holding::new("AAPL", dec!(4000)),
        Holding::new("MSFT", dec!(3000)),
        Holding::new("XOM", dec!(3000)),
    ]
}

/// Counts batch requests and delegates to an in-memory source.
struct CountingSource {
    inner: InMemoryPriceHistorySource,
    calls: AtomicUsize,
}

#[async_trait]
impl PriceHistoryProvider for CountingSource {
    fn source_type(&self) -> SourceType {
        SourceType::InMemory
    }

    async fn fetch_history(
        &self,
        symbols: &[Symbol],
        period: HistoryPeriod,
        interval: Interval,
    ) -> Result<HashMap<Symbol, PriceSeries>, TraitError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch_history(symbols, period, interval).await
    }
}

struct FailingSource;

#[async_trait]
impl PriceHistoryProvider for FailingSource {
    fn source_type(&self) -> SourceType {
        SourceType::Snapshot
    }

    async fn fetch_history(
        &self,
        _symbols: &[Symbol],
        _period: HistoryPeriod,
        _interval: Interval,
    ) -> Result<HashMap<Symbol, PriceSeries>, TraitError> {
        Err(TraitError::ConnectionFailed("quote server unreachable".into()))
    }
}

struct SlowSource;

#[async_trait]
impl PriceHistoryProvider for SlowSource {
    fn source_type(&self) -> SourceType {
        SourceType::Snapshot
    }

    async fn fetch_history(
        &self,
        _symbols: &[Symbol],
        _period: HistoryPeriod,
        _interval: Interval,
    ) -> Result<HashMap<Symbol, PriceSeries>, TraitError> {
        tokio::time::sleep(StdDuration::from_secs(10)).await;
        Ok(HashMap::new())
    }
}

#[tokio::test]
async fn test_analyze_fetches_once() {
    let source = Arc::new(CountingSource {
        inner: InMemoryPriceHistorySource::with_series(universe()),
        calls: AtomicUsize::new(0),
    });
    let engine = engine_with(source.clone());

    let before = Utc::now();
    let result = engine.analyze(&holdings()).await.unwrap();

    assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    assert!(result.analysis_date >= before);
    assert_eq!(result.weights.len(), 3);
    assert!(result.dropped.is_empty());
    assert_eq!(result.metrics.observations, DAYS as usize);
    assert!(result.metrics.volatility > 0.0);
    assert!((1..=10).contains(&result.risk_score.value()));
}

#[tokio::test]
async fn test_empty_portfolio_does_not_fetch() {
    let source = Arc::new(CountingSource {
        inner: InMemoryPriceHistorySource::new(),
        calls: AtomicUsize::new(0),
    });
    let engine = engine_with(source.clone());

    let err = engine.analyze(&[]).await.unwrap_err();
    assert!(matches!(err.as_risk_error(), Some(RiskError::EmptyPortfolio)));
    assert_eq!(source.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_analyze_with_history_is_idempotent() {
    let engine = engine_with(Arc::new(EmptyPriceHistorySource));
    let histories: HashMap<Symbol, PriceSeries> = universe()
        .into_iter()
        .map(|s| (s.symbol().clone(), s))
        .collect();
    let as_of = Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap();

    let a = engine.analyze_with_history(&holdings(), &histories, as_of).unwrap();
    let b = engine.analyze_with_history(&holdings(), &histories, as_of).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.analysis_date, as_of);
}

#[tokio::test]
async fn test_provider_error_is_data_unavailable() {
    let engine = engine_with(Arc::new(FailingSource));
    let err = engine.analyze(&holdings()).await.unwrap_err();

    match err.as_risk_error() {
        Some(RiskError::DataUnavailable { symbols, reason }) => {
            assert_eq!(symbols.len(), 3);
            assert!(reason.contains("quote server unreachable"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_timeout_is_data_unavailable() {
    let engine = RiskEngineBuilder::new()
        .with_config(EngineConfig {
            fetch_timeout_secs: 1,
            ..EngineConfig::default()
        })
        .with_price_history(Arc::new(SlowSource))
        .build()
        .unwrap();

    let err = engine.analyze(&holdings()).await.unwrap_err();
    match err.as_risk_error() {
        Some(RiskError::DataUnavailable { reason, .. }) => assert!(reason.contains("timed out")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_unknown_symbol_is_data_unavailable() {
    let engine = engine_with(Arc::new(InMemoryPriceHistorySource::with_series(universe())));
    let mut h = holdings();
    h.push(Holding::new("DELISTED", dec!(100)));

    let err = engine.analyze(&h).await.unwrap_err();
    assert!(matches!(
        err.as_risk_error(),
        Some(RiskError::DataUnavailable { symbols, .. }) if symbols == &[Symbol::from("DELISTED")]
    ));
}

#[test]
fn test_builder_requires_provider() {
    let err = RiskEngineBuilder::new().build().err().unwrap();
    assert!(matches!(err, EngineError::ConfigError(ref m) if m.contains("price_history")));
}

#[tokio::test]
async fn test_compare_portfolios() {
    let engine = engine_with(Arc::new(InMemoryPriceHistorySource::with_series(universe())));
    let growth = engine.analyze(&holdings()).await.unwrap();
    let defensive = engine
        .analyze(&[Holding::new("BOND", dec!(9000)), Holding::new("XOM", dec!(1000))])
        .await
        .unwrap();

    let entries = vec![
        PortfolioEntry {
            id: "1".into(),
            name: "Growth".into(),
            analysis: Some(growth.clone()),
        },
        PortfolioEntry {
            id: "2".into(),
            name: "Defensive".into(),
            analysis: Some(defensive.clone()),
        },
        PortfolioEntry {
            id: "3".into(),
            name: "New".into(),
            analysis: None,
        },
    ];
    let report = engine.compare(&entries).unwrap();

    assert_eq!(report.portfolios.len(), 2);
    assert_eq!(report.portfolios[0].name, "Growth");
    assert_eq!(report.skipped, vec!["3".to_string()]);

    let expected_lowest = if defensive.risk_score < growth.risk_score { "2" } else { "1" };
    let expected_best = if defensive.metrics.sharpe_ratio > growth.metrics.sharpe_ratio {
        "2"
    } else {
        "1"
    };
    assert_eq!(report.lowest_risk, expected_lowest);
    assert_eq!(report.best_sharpe, expected_best);

    assert!(matches!(
        engine.compare(&entries[..1]),
        Err(EngineError::ComparisonError(_))
    ));
    assert!(matches!(
        engine.compare(&entries[1..]),
        Err(EngineError::ComparisonError(_))
    ));
}

#[tokio::test]
async fn test_csv_provider_end_to_end() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "symbol,date,close").unwrap();
    for s in universe() {
        for (date, close) in s.points() {
            writeln!(file, "{},{},{}", s.symbol(), date.format("%Y-%m-%d"), close).unwrap();
        }
    }
    file.flush().unwrap();

    let engine = engine_with(create_file_price_history(file.path()).unwrap());
    let result = engine.analyze(&holdings()).await.unwrap();
    assert_eq!(result.metrics.observations, DAYS as usize);
}
