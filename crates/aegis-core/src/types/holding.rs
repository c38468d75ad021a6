//! Portfolio holdings as handed to the engine.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Symbol;

/// A holding resolved to its current market value.
///
/// The engine derives weights from market values; quantities and prices are
/// only needed to build the holding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    /// Instrument symbol.
    pub symbol: Symbol,
    /// Market value in the portfolio's currency.
    pub market_value: Decimal,
}

impl Holding {
    /// Creates a holding from a market value.
    pub fn new(symbol: impl Into<Symbol>, market_value: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            market_value,
        }
    }

    /// Creates a holding valued at `quantity × price`.
    pub fn from_position(symbol: impl Into<Symbol>, quantity: Decimal, price: Decimal) -> Self {
        Self::new(symbol, quantity * price)
    }

    /// Like [`Holding::from_position`], but yields `None` when the instrument
    /// has no current price. Such positions are left out of risk analysis.
    pub fn try_from_position(
        symbol: impl Into<Symbol>,
        quantity: Decimal,
        price: Option<Decimal>,
    ) -> Option<Self> {
        price.map(|p| Self::from_position(symbol, quantity, p))
    }
}

/// An instrument's resolved weight for one analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentWeight {
    /// Instrument symbol.
    pub symbol: Symbol,
    /// Fraction of total portfolio value, in [0, 1].
    pub weight: f64,
}

impl InstrumentWeight {
    /// Creates a weight entry.
    pub fn new(symbol: impl Into<Symbol>, weight: f64) -> Self {
        Self {
            symbol: symbol.into(),
            weight,
        }
    }
}

/// An instrument excluded from an analysis for lack of aligned history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DroppedInstrument {
    /// Instrument symbol.
    pub symbol: Symbol,
    /// Return observations that were available for it.
    pub observations: usize,
}
