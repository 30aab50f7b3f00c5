//! Portfolio ledger loading.
//!
//! The ledger is a CSV file with header `ticker,buy_price,shares`. Each row
//! is parsed on its own: a malformed row is reported with its line number
//! and the remaining rows still load. Shares must be a whole number; a
//! fractional count fails its row. Positivity of price and shares is left
//! to valuation, which reports such rows as unvalued.

use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use stockbot_core::domain::Position;
use thiserror::Error;

use crate::ticker::normalize_ticker;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    #[error("cannot read ledger {path}: {message}")]
    Open { path: String, message: String },

    #[error("line {line}: {message}")]
    Row { line: u64, message: String },
}

#[derive(Debug, Deserialize)]
struct LedgerRow {
    ticker: String,
    buy_price: f64,
    shares: i64,
}

/// Positions that parsed, plus one error per rejected row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    pub positions: Vec<Position>,
    pub errors: Vec<LedgerError>,
}

pub fn load_ledger(path: &Path) -> Result<Ledger, LedgerError> {
    let file = std::fs::File::open(path).map_err(|e| LedgerError::Open {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    parse_ledger(file)
}

/// Parse ledger CSV from any reader. Only an unreadable header is fatal.
pub fn parse_ledger<R: Read>(reader: R) -> Result<Ledger, LedgerError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| LedgerError::Row {
            line: 1,
            message: e.to_string(),
        })?
        .clone();

    let mut ledger = Ledger::default();
    for record in rdr.records() {
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                let line = e.position().map_or(0, |p| p.line());
                ledger.errors.push(LedgerError::Row {
                    line,
                    message: e.to_string(),
                });
                continue;
            }
        };
        let line = record.position().map_or(0, |p| p.line());

        let row: LedgerRow = match record.deserialize(Some(&headers)) {
            Ok(row) => row,
            Err(e) => {
                ledger.errors.push(LedgerError::Row {
                    line,
                    message: e.to_string(),
                });
                continue;
            }
        };
        match normalize_ticker(&row.ticker) {
            Ok(ticker) => ledger
                .positions
                .push(Position::new(ticker, row.buy_price, row.shares)),
            Err(e) => ledger.errors.push(LedgerError::Row {
                line,
                message: e.to_string(),
            }),
        }
    }
    Ok(ledger)
}
