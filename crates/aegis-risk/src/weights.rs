//! Holding weights from market values.

use std::collections::HashMap;

use aegis_core::types::{Holding, InstrumentWeight, Symbol};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::error::{RiskError, RiskResult};

/// Tolerance on the sum of resolved weights.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Resolves holdings into portfolio weights, `value_i / Σvalue`.
///
/// Duplicate symbols are merged in first-appearance order. If every value
/// is zero the portfolio falls back to equal weights.
///
/// # Errors
///
/// - [`RiskError::EmptyPortfolio`] for no holdings
/// - [`RiskError::InvalidInput`] for an empty symbol
/// - [`RiskError::InvalidWeights`] for negative values, overflow, or a weight
///   vector that does not sum to 1
pub fn resolve_weights(holdings: &[Holding]) -> RiskResult<Vec<InstrumentWeight>> {
    if holdings.is_empty() {
        return Err(RiskError::EmptyPortfolio);
    }

    let mut order: Vec<Symbol> = Vec::with_capacity(holdings.len());
    let mut values: HashMap<Symbol, Decimal> = HashMap::with_capacity(holdings.len());

    for holding in holdings {
        if holding.symbol.is_empty() {
            return Err(RiskError::InvalidInput("holding with empty symbol".to_string()));
        }
        if holding.market_value < Decimal::ZERO {
            return Err(RiskError::invalid_weights(
                f64::NAN,
                format!(
                    "{} has negative market value {}",
                    holding.symbol, holding.market_value
                ),
            ));
        }
        match values.get_mut(&holding.symbol) {
            Some(total) => {
                *total = total.checked_add(holding.market_value).ok_or_else(|| {
                    RiskError::invalid_weights(
                        f64::NAN,
                        format!("market value of {} overflows", holding.symbol),
                    )
                })?;
            }
            None => {
                order.push(holding.symbol.clone());
                values.insert(holding.symbol.clone(), holding.market_value);
            }
        }
    }

    let mut total = Decimal::ZERO;
    for symbol in &order {
        total = total
            .checked_add(values[symbol])
            .ok_or_else(|| RiskError::invalid_weights(f64::NAN, "portfolio value overflows"))?;
    }

    let n = order.len();
    let weights: Vec<InstrumentWeight> = if total.is_zero() {
        let w = 1.0 / n as f64;
        order
            .into_iter()
            .map(|symbol| InstrumentWeight::new(symbol, w))
            .collect()
    } else {
        let total_f = total
            .to_f64()
            .ok_or_else(|| RiskError::invalid_weights(f64::NAN, "portfolio value not representable"))?;
        let mut out = Vec::with_capacity(n);
        for symbol in order {
            let value = values[&symbol].to_f64().ok_or_else(|| {
                RiskError::invalid_weights(f64::NAN, format!("value of {symbol} not representable"))
            })?;
            out.push(InstrumentWeight::new(symbol, value / total_f));
        }
        out
    };

    check_weights(&weights)?;
    Ok(weights)
}

/// Checks that weights are finite, non-negative and sum to 1.
pub fn check_weights(weights: &[InstrumentWeight]) -> RiskResult<()> {
    let sum: f64 = weights.iter().map(|w| w.weight).sum();
    if let Some(bad) = weights
        .iter()
        .find(|w| !w.weight.is_finite() || w.weight < 0.0)
    {
        return Err(RiskError::invalid_weights(
            sum,
            format!("{} has weight {}", bad.symbol, bad.weight),
        ));
    }
    if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        return Err(RiskError::invalid_weights(sum, "weights do not sum to 1"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_proportional_weights() {
        let holdings = vec![
            Holding::new("AAPL", dec!(3000)),
            Holding::new("MSFT", dec!(1000)),
        ];
        let weights = resolve_weights(&holdings).unwrap();
        assert_eq!(weights[0].symbol.as_str(), "AAPL");
        assert_relative_eq!(weights[0].weight, 0.75);
        assert_relative_eq!(weights[1].weight, 0.25);
    }

    #[test]
    fn test_duplicates_merged_in_order() {
        let holdings = vec![
            Holding::new("B", dec!(100)),
            Holding::new("A", dec!(100)),
            Holding::new("B", dec!(200)),
        ];
        let weights = resolve_weights(&holdings).unwrap();
        assert_eq!(weights.len(), 2);
        assert_eq!(weights[0].symbol.as_str(), "B");
        assert_relative_eq!(weights[0].weight, 0.75);
    }

    #[test]
    fn test_zero_total_is_equal_weight() {
        let holdings = vec![
            Holding::new("A", Decimal::ZERO),
            Holding::new("B", Decimal::ZERO),
            Holding::new("C", Decimal::ZERO),
            Holding::new("D", Decimal::ZERO),
        ];
        let weights = resolve_weights(&holdings).unwrap();
        assert!(weights.iter().all(|w| w.weight == 0.25));
    }

    #[test]
    fn test_rejects_bad_holdings() {
        assert_eq!(resolve_weights(&[]), Err(RiskError::EmptyPortfolio));
        assert!(matches!(
            resolve_weights(&[Holding::new("A", dec!(-1))]),
            Err(RiskError::InvalidWeights { .. })
        ));
        assert!(matches!(
            resolve_weights(&[Holding::new("  ", dec!(1))]),
            Err(RiskError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_check_weights() {
        let bad = vec![InstrumentWeight::new("A", 0.6), InstrumentWeight::new("B", 0.6)];
        assert!(check_weights(&bad).is_err());
        let nan = vec![InstrumentWeight::new("A", f64::NAN)];
        assert!(check_weights(&nan).is_err());
    }
}
