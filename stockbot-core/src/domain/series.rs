//! The chronological bar history of one ticker.

use super::bar::{Bar, BarError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Ordered bars for one ticker over a requested period/interval.
///
/// Dates are strictly increasing and every price is finite and positive.
/// The series may be empty or shorter than
/// any indicator window; consumers decide what that means. Once built the
/// series is never mutated; derived values live in new sequences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSeries {
    ticker: String,
    bars: Vec<Bar>,
}

impl BarSeries {
    /// Build a series, rejecting unsorted or duplicate dates and bars with a
    /// non-finite or non-positive price.
    pub fn new(ticker: impl Into<String>, bars: Vec<Bar>) -> Result<Self, BarError> {
        if let Some(bad) = bars.iter().find(|b| !b.has_valid_prices()) {
            return Err(BarError::InvalidPrice { date: bad.date });
        }
        for pair in bars.windows(2) {
            let (previous, next) = (pair[0].date, pair[1].date);
            if next == previous {
                return Err(BarError::DuplicateDate { date: next });
            }
            if next < previous {
                return Err(BarError::OutOfOrder { previous, next });
            }
        }
        Ok(Self {
            ticker: ticker.into(),
            bars,
        })
    }

    pub fn empty(ticker: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            bars: Vec::new(),
        }
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// Closing prices in chronological order.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.bars.first().map(|b| b.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|b| b.date)
    }

    pub fn into_bars(self) -> Vec<Bar> {
        self.bars
    }
}
