//! CLI command implementations.

pub mod analyze;
pub mod compare;

// Re-export submodules for convenience
pub use analyze::AnalyzeArgs;
pub use compare::CompareArgs;

use std::path::Path;
use std::str::FromStr;

use aegis_core::types::Holding;
use rust_decimal::Decimal;

use crate::error::{CliError, CliResult};
use crate::output::print_warning;

/// Fails with `FileNotFound` unless `path` exists.
pub fn ensure_exists(path: &Path) -> CliResult<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(CliError::FileNotFound(path.display().to_string()))
    }
}

fn parse_decimal(field: &str, value: &str, row: usize) -> CliResult<Decimal> {
    Decimal::from_str(value.trim()).map_err(|_| {
        CliError::InvalidHoldings(format!("row {row}: {field} '{value}' is not a number"))
    })
}

/// Column indices of a holdings file.
enum Layout {
    MarketValue(usize),
    Position(usize, usize),
}

/// Loads holdings from CSV.
///
/// Accepts either `symbol,market_value` or `symbol,quantity,price` columns.
/// Positions with an empty price are skipped with a warning.
pub fn load_holdings(path: &Path) -> CliResult<Vec<Holding>> {
    ensure_exists(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| CliError::InvalidHoldings(e.to_string()))?;

    let headers = reader
        .headers()
        .map_err(|e| CliError::InvalidHoldings(e.to_string()))?
        .clone();
    let column = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));

    let symbol_col = column("symbol")
        .ok_or_else(|| CliError::InvalidHoldings("missing 'symbol' column".into()))?;
    let layout = match (column("market_value"), column("quantity").zip(column("price"))) {
        (Some(v), _) => Layout::MarketValue(v),
        (None, Some((q, p))) => Layout::Position(q, p),
        (None, None) => {
            return Err(CliError::InvalidHoldings(
                "expected a 'market_value' column or 'quantity' and 'price' columns".into(),
            ))
        }
    };

    let mut holdings = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let row = i + 2;
        let record = record.map_err(|e| CliError::InvalidHoldings(e.to_string()))?;
        let symbol = record.get(symbol_col).unwrap_or_default();

        match layout {
            Layout::MarketValue(v) => {
                let value = parse_decimal("market_value", record.get(v).unwrap_or_default(), row)?;
                holdings.push(Holding::new(symbol, value));
            }
            Layout::Position(q, p) => {
                let quantity = parse_decimal("quantity", record.get(q).unwrap_or_default(), row)?;
                let price = match record.get(p).unwrap_or_default() {
                    "" => None,
                    s => Some(parse_decimal("price", s, row)?),
                };
                match Holding::try_from_position(symbol, quantity, price) {
                    Some(h) => holdings.push(h),
                    None => print_warning(&format!("skipping {symbol}: no current price")),
                }
            }
        }
    }

    if holdings.is_empty() {
        return Err(CliError::InvalidHoldings("no holdings found".into()));
    }
    Ok(holdings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write(content: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    #[test]
    fn test_market_value_layout() {
        let f = write("symbol,market_value\nAAPL,1500.50\nMSFT, 2000\n");
        let h = load_holdings(f.path()).unwrap();
        assert_eq!(h.len(), 2);
        assert_eq!(h[0].market_value, Decimal::from_str("1500.50").unwrap());
        assert_eq!(h[1].symbol.as_str(), "MSFT");
    }

    #[test]
    fn test_position_layout_skips_unpriced() {
        let f = write("symbol,quantity,price\nAAPL,10,150\nNEW,5,\n");
        let h = load_holdings(f.path()).unwrap();
        assert_eq!(h.len(), 1);
        assert_eq!(h[0].market_value, Decimal::from(1500));
    }

    #[test]
    fn test_bad_files() {
        assert!(matches!(
            load_holdings(Path::new("/nonexistent/holdings.csv")),
            Err(CliError::FileNotFound(_))
        ));
        let f = write("ticker,value\nAAPL,1\n");
        assert!(matches!(load_holdings(f.path()), Err(CliError::InvalidHoldings(_))));
        let f = write("symbol,market_value\nAAPL,lots\n");
        assert!(matches!(load_holdings(f.path()), Err(CliError::InvalidHoldings(_))));
    }
}
