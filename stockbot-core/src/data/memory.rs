//! In-memory provider: a fixed map of ticker → bars or error.
//!
//! Ignores period and interval; whatever was registered is returned. Used
//! by tests and by callers that already hold the bars.

use super::provider::{DataError, DataProvider, Interval, Period};
use crate::domain::{Bar, BarSeries};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct InMemoryProvider {
    entries: HashMap<String, Result<Vec<Bar>, DataError>>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bars(mut self, ticker: &str, bars: Vec<Bar>) -> Self {
        self.entries.insert(ticker.to_string(), Ok(bars));
        self
    }

    pub fn with_error(mut self, ticker: &str, error: DataError) -> Self {
        self.entries.insert(ticker.to_string(), Err(error));
        self
    }
}

impl DataProvider for InMemoryProvider {
    fn name(&self) -> &str {
        "in_memory"
    }

    fn fetch(
        &self,
        ticker: &str,
        _period: Period,
        _interval: Interval,
    ) -> Result<BarSeries, DataError> {
        match self.entries.get(ticker) {
            Some(Ok(bars)) => BarSeries::new(ticker, bars.clone())
                .map_err(|e| DataError::Validation(e.to_string())),
            Some(Err(e)) => Err(e.clone()),
            None => Err(DataError::UnknownTicker {
                ticker: ticker.to_string(),
            }),
        }
    }
}
