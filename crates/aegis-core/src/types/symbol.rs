//! Instrument symbol newtype.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Ticker symbol identifying an instrument (e.g. `"AAPL"`).
///
/// Symbols are compared exactly; no case folding is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    /// Creates a symbol, trimming surrounding whitespace.
    pub fn new(s: impl AsRef<str>) -> Self {
        Self(s.as_ref().trim().to_string())
    }

    /// Returns the symbol as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if the symbol is empty after trimming.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl Borrow<str> for Symbol {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Joins symbols with `", "` for error messages and logs.
pub fn join_symbols(symbols: &[Symbol]) -> String {
    symbols
        .iter()
        .map(Symbol::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_symbol_trims_and_borrows() {
        let s = Symbol::new("  MSFT ");
        assert_eq!(s.as_str(), "MSFT");

        let mut map = HashMap::new();
        map.insert(s, 1);
        assert_eq!(map.get("MSFT"), Some(&1));
    }

    #[test]
    fn test_join_symbols() {
        let syms = vec![Symbol::from("A"), Symbol::from("B")];
        assert_eq!(join_symbols(&syms), "A, B");
    }
}
