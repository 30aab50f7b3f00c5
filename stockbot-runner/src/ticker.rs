//! Ticker symbol parsing and validation.
//!
//! Symbols are trimmed and upper-cased. A valid symbol is 1..=15 characters
//! from `A-Z 0-9 . - ^ =` (covers share classes like `BRK.B`, indices like
//! `^GSPC` and FX pairs like `EURUSD=X`).

use thiserror::Error;

pub const MAX_TICKER_LEN: usize = 15;

/// The market-scan universe used when no tickers are given.
pub const DEFAULT_UNIVERSE: [&str; 12] = [
    "AAPL", "MSFT", "GOOGL", "AMZN", "NVDA", "TSLA", "META", "NFLX", "JPM", "V", "PG", "KO",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TickerError {
    #[error("No ticker symbols provided.")]
    EmptyList,

    #[error("empty ticker symbol")]
    Empty,

    #[error("ticker '{ticker}' is longer than {max} characters", max = MAX_TICKER_LEN)]
    TooLong { ticker: String },

    #[error("ticker '{ticker}' contains invalid character '{ch}'")]
    InvalidChar { ticker: String, ch: char },
}

fn is_ticker_char(c: char) -> bool {
    c.is_ascii_uppercase() || c.is_ascii_digit() || matches!(c, '.' | '-' | '^' | '=')
}

/// Trim, upper-case and validate one symbol.
pub fn normalize_ticker(raw: &str) -> Result<String, TickerError> {
    let ticker = raw.trim().to_ascii_uppercase();
    if ticker.is_empty() {
        return Err(TickerError::Empty);
    }
    if ticker.chars().count() > MAX_TICKER_LEN {
        return Err(TickerError::TooLong { ticker });
    }
    if let Some(ch) = ticker.chars().find(|c| !is_ticker_char(*c)) {
        return Err(TickerError::InvalidChar { ticker, ch });
    }
    Ok(ticker)
}

/// Parse a comma-separated list. Blank entries (a trailing comma, `,,`)
/// are skipped; the list is rejected if nothing remains or any symbol is
/// malformed. Input order is kept; repeats are kept.
pub fn parse_ticker_list(input: &str) -> Result<Vec<String>, TickerError> {
    let tickers = input
        .split(',')
        .filter(|t| !t.trim().is_empty())
        .map(normalize_ticker)
        .collect::<Result<Vec<_>, _>>()?;
    if tickers.is_empty() {
        return Err(TickerError::EmptyList);
    }
    Ok(tickers)
}

pub fn default_universe() -> Vec<String> {
    DEFAULT_UNIVERSE.iter().map(|t| t.to_string()).collect()
}
