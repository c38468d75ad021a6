//! Simple returns and date alignment across instruments.

use std::collections::HashMap;

use aegis_core::types::{DroppedInstrument, InstrumentWeight, PriceSeries, RiskConfig, Symbol};
use chrono::{DateTime, Utc};
use nalgebra::DMatrix;
use tracing::{debug, warn};

use crate::error::{RiskError, RiskResult};

/// Simple period returns of one instrument, dated at the later close.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnSeries {
    /// Instrument symbol.
    pub symbol: Symbol,
    /// Return dates, strictly increasing.
    pub dates: Vec<DateTime<Utc>>,
    /// `close_t / close_{t-1} - 1`.
    pub returns: Vec<f64>,
}

impl ReturnSeries {
    /// Number of return observations.
    pub fn len(&self) -> usize {
        self.returns.len()
    }

    /// True if there are no returns.
    pub fn is_empty(&self) -> bool {
        self.returns.is_empty()
    }
}

/// Computes simple returns from consecutive closes of `series`.
///
/// # Errors
///
/// Returns [`RiskError::DataUnavailable`] if the series is empty or contains
/// a non-positive or non-finite close.
pub fn simple_returns(series: &PriceSeries) -> RiskResult<ReturnSeries> {
    let symbol = series.symbol().clone();
    if series.is_empty() {
        return Err(RiskError::data_unavailable(vec![symbol], "empty price series"));
    }
    if let Some((date, close)) = series.points().find(|(_, c)| !(c.is_finite() && *c > 0.0)) {
        return Err(RiskError::data_unavailable(
            vec![symbol],
            format!("invalid close {close} on {}", date.format("%Y-%m-%d")),
        ));
    }

    let closes = series.closes();
    let returns = closes.windows(2).map(|w| w[1] / w[0] - 1.0).collect();
    let dates = series.dates().iter().skip(1).copied().collect();

    Ok(ReturnSeries {
        symbol,
        dates,
        returns,
    })
}

/// Returns of the analysed instruments on their common dates.
///
/// The matrix has one row per date and one column per instrument, in the
/// same order as `symbols` and `weights`.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedReturns {
    symbols: Vec<Symbol>,
    dates: Vec<DateTime<Utc>>,
    matrix: DMatrix<f64>,
    weights: Vec<f64>,
    dropped: Vec<DroppedInstrument>,
}

impl AlignedReturns {
    /// Builds an aligned panel directly from a returns matrix.
    ///
    /// # Errors
    ///
    /// Fails if the dimensions disagree or the matrix has non-finite entries.
    pub fn from_matrix(
        symbols: Vec<Symbol>,
        dates: Vec<DateTime<Utc>>,
        matrix: DMatrix<f64>,
        weights: Vec<f64>,
    ) -> RiskResult<Self> {
        if matrix.ncols() != symbols.len() || weights.len() != symbols.len() {
            return Err(RiskError::InvalidInput(format!(
                "{} symbols, {} weights, {} matrix columns",
                symbols.len(),
                weights.len(),
                matrix.ncols()
            )));
        }
        if matrix.nrows() != dates.len() {
            return Err(RiskError::InvalidInput(format!(
                "{} dates for {} matrix rows",
                dates.len(),
                matrix.nrows()
            )));
        }
        if symbols.is_empty() {
            return Err(RiskError::EmptyPortfolio);
        }
        if matrix.iter().any(|v| !v.is_finite()) {
            return Err(RiskError::ComputationError(
                "non-finite value in returns matrix".to_string(),
            ));
        }
        Ok(Self {
            symbols,
            dates,
            matrix,
            weights,
            dropped: Vec::new(),
        })
    }

    /// Aligns the price histories of weighted instruments.
    ///
    /// Instruments whose history is too short to reach
    /// `config.min_aligned_observations` are dropped and the remaining
    /// weights renormalized. Too short means fewer own returns than the
    /// minimum. While the joint date set is still too short, the instrument
    /// whose removal leaves the longest join goes next, the shorter history
    /// and then the later input position breaking ties.
    ///
    /// # Errors
    ///
    /// - [`RiskError::DataUnavailable`] if a symbol has no usable series
    /// - [`RiskError::InsufficientHistory`] if fewer than `min(2, n)`
    ///   instruments survive
    pub fn align(
        weights: &[InstrumentWeight],
        histories: &HashMap<Symbol, PriceSeries>,
        config: &RiskConfig,
    ) -> RiskResult<Self> {
        if weights.is_empty() {
            return Err(RiskError::EmptyPortfolio);
        }
        let min_obs = config.min_aligned_observations;

        let missing: Vec<Symbol> = weights
            .iter()
            .filter(|w| !histories.get(&w.symbol).is_some_and(|s| !s.is_empty()))
            .map(|w| w.symbol.clone())
            .collect();
        if !missing.is_empty() {
            return Err(RiskError::data_unavailable(missing, "no price history returned"));
        }

        let series: Vec<ReturnSeries> = weights
            .iter()
            .map(|w| simple_returns(&histories[&w.symbol]))
            .collect::<RiskResult<_>>()?;

        let all: Vec<usize> = (0..series.len()).collect();
        let full_join = common_dates(&series, &all).len();

        let mut active: Vec<usize> = all
            .into_iter()
            .filter(|&i| series[i].len() >= min_obs)
            .collect();

        let mut common = common_dates(&series, &active);
        while common.len() < min_obs && active.len() > 1 {
            // Longest remaining join, then shortest history, then later input position.
            let joins: Vec<usize> = (0..active.len())
                .map(|pos| {
                    let rest: Vec<usize> = active
                        .iter()
                        .enumerate()
                        .filter(|&(p, _)| p != pos)
                        .map(|(_, &i)| i)
                        .collect();
                    common_dates(&series, &rest).len()
                })
                .collect();
            let Some(pos) = (0..active.len()).max_by(|&pa, &pb| {
                joins[pa]
                    .cmp(&joins[pb])
                    .then(series[active[pb]].len().cmp(&series[active[pa]].len()))
                    .then(pa.cmp(&pb))
            }) else {
                break;
            };
            active.remove(pos);
            common = common_dates(&series, &active);
        }

        let dropped: Vec<DroppedInstrument> = (0..series.len())
            .filter(|i| !active.contains(i))
            .map(|i| DroppedInstrument {
                symbol: series[i].symbol.clone(),
                observations: series[i].len(),
            })
            .collect();

        let required_survivors = weights.len().min(2);
        if active.len() < required_survivors || common.len() < min_obs {
            return Err(RiskError::InsufficientHistory {
                symbols: dropped.iter().map(|d| d.symbol.clone()).collect(),
                required: min_obs,
                actual: full_join,
            });
        }

        for d in &dropped {
            warn!(
                symbol = %d.symbol,
                observations = d.observations,
                required = min_obs,
                "dropping instrument with insufficient aligned history"
            );
        }

        let symbols: Vec<Symbol> = active.iter().map(|&i| series[i].symbol.clone()).collect();
        let matrix = DMatrix::from_fn(common.len(), active.len(), |row, col| {
            let s = &series[active[col]];
            // Every common date is present in each active series.
            let idx = s.dates.binary_search(&common[row]).unwrap_or_else(|i| i);
            s.returns[idx]
        });
        let weights = renormalize(active.iter().map(|&i| weights[i].weight).collect());

        debug!(
            instruments = symbols.len(),
            observations = common.len(),
            dropped = dropped.len(),
            "aligned returns"
        );

        Ok(Self {
            symbols,
            dates: common,
            matrix,
            weights,
            dropped,
        })
    }

    /// Instruments in column order.
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Aligned return dates in row order.
    pub fn dates(&self) -> &[DateTime<Utc>] {
        &self.dates
    }

    /// The `T × N` returns matrix.
    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    /// Weights of the surviving instruments, summing to 1.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Instruments excluded during alignment, in input order.
    pub fn dropped(&self) -> &[DroppedInstrument] {
        &self.dropped
    }

    /// Number of instruments.
    pub fn n_instruments(&self) -> usize {
        self.matrix.ncols()
    }

    /// Number of aligned observations.
    pub fn n_observations(&self) -> usize {
        self.matrix.nrows()
    }

    /// Returns of instrument `i`.
    pub fn column(&self, i: usize) -> Vec<f64> {
        self.matrix.column(i).iter().copied().collect()
    }

    /// All instrument return columns.
    pub fn columns(&self) -> Vec<Vec<f64>> {
        (0..self.n_instruments()).map(|i| self.column(i)).collect()
    }

    /// Realized portfolio returns `R·w`, one per date.
    pub fn portfolio_returns(&self) -> Vec<f64> {
        self.matrix
            .row_iter()
            .map(|row| row.iter().zip(&self.weights).map(|(r, w)| r * w).sum())
            .collect()
    }

    /// Weights paired with their symbols.
    pub fn instrument_weights(&self) -> Vec<InstrumentWeight> {
        self.symbols
            .iter()
            .zip(&self.weights)
            .map(|(s, &w)| InstrumentWeight::new(s.clone(), w))
            .collect()
    }
}

/// Dates present in every active series, ascending.
fn common_dates(series: &[ReturnSeries], active: &[usize]) -> Vec<DateTime<Utc>> {
    let Some((&first, rest)) = active.split_first() else {
        return Vec::new();
    };
    series[first]
        .dates
        .iter()
        .copied()
        .filter(|d| rest.iter().all(|&i| series[i].dates.binary_search(d).is_ok()))
        .collect()
}

/// Rescales weights to sum to 1, or equal weights if they sum to 0.
fn renormalize(weights: Vec<f64>) -> Vec<f64> {
    let sum: f64 = weights.iter().sum();
    if sum > 0.0 {
        weights.into_iter().map(|w| w / sum).collect()
    } else {
        let n = weights.len() as f64;
        vec![1.0 / n; weights.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{Duration, TimeZone};

    fn day(d: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::days(d)
    }

    fn series(symbol: &str, start: i64, closes: &[f64]) -> PriceSeries {
        let dates = (0..closes.len() as i64).map(|i| day(start + i)).collect();
        PriceSeries::new(symbol, dates, closes.to_vec()).unwrap()
    }

    fn histories(list: Vec<PriceSeries>) -> HashMap<Symbol, PriceSeries> {
        list.into_iter().map(|s| (s.symbol().clone(), s)).collect()
    }

    #[test]
    fn test_simple_returns() {
        let r = simple_returns(&series("A", 0, &[100.0, 110.0, 99.0])).unwrap();
        assert_eq!(r.dates, vec![day(1), day(2)]);
        assert_relative_eq!(r.returns[0], 0.1, epsilon = 1e-12);
        assert_relative_eq!(r.returns[1], -0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_simple_returns_rejects_bad_close() {
        let err = simple_returns(&series("A", 0, &[100.0, 0.0, 99.0])).unwrap_err();
        assert!(matches!(err, RiskError::DataUnavailable { .. }));
    }

    #[test]
    fn test_align_inner_join() {
        let h = histories(vec![
            series("A", 0, &[100.0, 101.0, 102.0, 103.0, 104.0]),
            series("B", 1, &[50.0, 51.0, 52.0, 53.0, 54.0]),
        ]);
        let weights = vec![InstrumentWeight::new("A", 0.5), InstrumentWeight::new("B", 0.5)];
        let aligned = AlignedReturns::align(&weights, &h, &RiskConfig::default()).unwrap();

        // A returns on days 1..=4, B on days 2..=5.
        assert_eq!(aligned.dates(), &[day(2), day(3), day(4)]);
        assert_eq!(aligned.n_instruments(), 2);
        assert_relative_eq!(aligned.matrix()[(0, 0)], 102.0 / 101.0 - 1.0);
        assert_relative_eq!(aligned.matrix()[(0, 1)], 51.0 / 50.0 - 1.0);
        assert!(aligned.dropped().is_empty());
    }

    #[test]
    fn test_align_drops_short_history_and_renormalizes() {
        let h = histories(vec![
            series("A", 0, &[100.0, 101.0, 102.0, 103.0]),
            series("B", 0, &[50.0, 51.0, 52.0, 53.0]),
            series("C", 0, &[10.0, 11.0]),
        ]);
        let weights = vec![
            InstrumentWeight::new("A", 0.25),
            InstrumentWeight::new("B", 0.25),
            InstrumentWeight::new("C", 0.5),
        ];
        let aligned = AlignedReturns::align(&weights, &h, &RiskConfig::default()).unwrap();

        assert_eq!(aligned.symbols(), &[Symbol::from("A"), Symbol::from("B")]);
        assert_eq!(aligned.weights(), &[0.5, 0.5]);
        assert_eq!(
            aligned.dropped(),
            &[DroppedInstrument {
                symbol: "C".into(),
                observations: 1
            }]
        );
    }

    #[test]
    fn test_align_drops_when_join_too_short() {
        // Each has 3 returns but the date ranges do not overlap.
        let h = histories(vec![
            series("A", 0, &[1.0, 1.1, 1.2, 1.3]),
            series("B", 3, &[2.0, 2.1, 2.2, 2.3]),
        ]);
        let weights = vec![InstrumentWeight::new("A", 0.5), InstrumentWeight::new("B", 0.5)];
        let err = AlignedReturns::align(&weights, &h, &RiskConfig::default()).unwrap_err();
        assert_eq!(
            err,
            RiskError::InsufficientHistory {
                symbols: vec!["B".into()],
                required: 2,
                actual: 0,
            }
        );
    }

    #[test]
    fn test_align_drops_disjoint_longer_history() {
        let closes = |n: usize, base: f64| -> Vec<f64> {
            (0..n).map(|i| base + i as f64 * 0.5 + (i % 3) as f64).collect()
        };
        let h = histories(vec![
            series("A", 0, &closes(11, 100.0)),
            series("B", 0, &closes(11, 50.0)),
            series("C", 100, &closes(101, 20.0)),
        ]);
        let weights = vec![
            InstrumentWeight::new("A", 0.3),
            InstrumentWeight::new("B", 0.3),
            InstrumentWeight::new("C", 0.4),
        ];
        let aligned = AlignedReturns::align(&weights, &h, &RiskConfig::default()).unwrap();

        assert_eq!(aligned.symbols(), &[Symbol::from("A"), Symbol::from("B")]);
        assert_eq!(aligned.n_observations(), 10);
        assert_eq!(aligned.weights(), &[0.5, 0.5]);
        assert_eq!(
            aligned.dropped(),
            &[DroppedInstrument {
                symbol: "C".into(),
                observations: 100
            }]
        );
    }

    #[test]
    fn test_align_missing_symbol() {
        let h = histories(vec![series("A", 0, &[1.0, 1.1, 1.2])]);
        let weights = vec![InstrumentWeight::new("A", 0.5), InstrumentWeight::new("Z", 0.5)];
        let err = AlignedReturns::align(&weights, &h, &RiskConfig::default()).unwrap_err();
        assert_eq!(
            err,
            RiskError::data_unavailable(vec!["Z".into()], "no price history returned")
        );
    }

    #[test]
    fn test_align_single_instrument() {
        let h = histories(vec![series("A", 0, &[1.0, 1.1, 1.2])]);
        let weights = vec![InstrumentWeight::new("A", 1.0)];
        let aligned = AlignedReturns::align(&weights, &h, &RiskConfig::default()).unwrap();
        assert_eq!(aligned.n_instruments(), 1);
        assert_eq!(aligned.n_observations(), 2);
    }

    #[test]
    fn test_portfolio_returns() {
        let m = DMatrix::from_column_slice(2, 2, &[0.01, 0.03, 0.02, -0.01]);
        let r = AlignedReturns::from_matrix(
            vec!["A".into(), "B".into()],
            vec![day(1), day(2)],
            m,
            vec![0.5, 0.5],
        )
        .unwrap();
        let rp = r.portfolio_returns();
        assert_relative_eq!(rp[0], 0.015);
        assert_relative_eq!(rp[1], 0.01);
    }
}
