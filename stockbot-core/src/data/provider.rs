//! Data provider trait and structured error types.
//!
//! The DataProvider trait abstracts over bar sources (Yahoo Finance, CSV
//! directory, synthetic, in-memory) so the engine and the runner never
//! care where bars came from, and tests can swap in fixed data.

use crate::domain::BarSeries;
use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Raw OHLC row from a provider, before validation. Missing prices are NaN.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: Option<u64>,
}

/// Structured error types for data operations.
///
/// `UnknownTicker`, `NoData` and the transient kinds stay distinct so the
/// reason survives into the Skip explanation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataError {
    #[error("unknown ticker: {ticker}")]
    UnknownTicker { ticker: String },

    #[error("no data for {ticker} in the requested window")]
    NoData { ticker: String },

    #[error("transient fetch error: {0}")]
    Transient(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("hard stop: data provider has blocked requests (circuit breaker tripped)")]
    CircuitBreakerTripped,

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl DataError {
    /// Errors that may succeed if the same request is retried later.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            DataError::Transient(_) | DataError::RateLimited { .. } | DataError::CircuitBreakerTripped
        )
    }
}

/// Requested look-back period, in the wire vocabulary ("6mo", "1y", ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "1d")]
    Day1,
    #[serde(rename = "5d")]
    Day5,
    #[serde(rename = "1mo")]
    Month1,
    #[serde(rename = "3mo")]
    Month3,
    #[serde(rename = "6mo")]
    Month6,
    #[serde(rename = "1y")]
    Year1,
    #[serde(rename = "2y")]
    Year2,
    #[serde(rename = "5y")]
    Year5,
    #[serde(rename = "10y")]
    Year10,
    #[serde(rename = "ytd")]
    Ytd,
    #[serde(rename = "max")]
    Max,
}

impl Period {
    pub const ALL: [Period; 11] = [
        Period::Day1,
        Period::Day5,
        Period::Month1,
        Period::Month3,
        Period::Month6,
        Period::Year1,
        Period::Year2,
        Period::Year5,
        Period::Year10,
        Period::Ytd,
        Period::Max,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Day1 => "1d",
            Period::Day5 => "5d",
            Period::Month1 => "1mo",
            Period::Month3 => "3mo",
            Period::Month6 => "6mo",
            Period::Year1 => "1y",
            Period::Year2 => "2y",
            Period::Year5 => "5y",
            Period::Year10 => "10y",
            Period::Ytd => "ytd",
            Period::Max => "max",
        }
    }

    /// First date covered when the window ends on `end`; `None` for `Max`.
    pub fn start_from(&self, end: NaiveDate) -> Option<NaiveDate> {
        let months = |m: u32| end.checked_sub_months(Months::new(m));
        match self {
            Period::Day1 => Some(end),
            Period::Day5 => end.checked_sub_signed(chrono::Duration::days(4)),
            Period::Month1 => months(1),
            Period::Month3 => months(3),
            Period::Month6 => months(6),
            Period::Year1 => months(12),
            Period::Year2 => months(24),
            Period::Year5 => months(60),
            Period::Year10 => months(120),
            Period::Ytd => NaiveDate::from_ymd_opt(end.year(), 1, 1),
            Period::Max => None,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        Period::ALL
            .iter()
            .find(|p| p.as_str() == s)
            .copied()
            .ok_or_else(|| DataError::Validation(format!("unknown period '{s}'")))
    }
}

/// Bar interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    #[serde(rename = "1d")]
    Daily,
    #[serde(rename = "1wk")]
    Weekly,
    #[serde(rename = "1mo")]
    Monthly,
}

impl Interval {
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::Daily => "1d",
            Interval::Weekly => "1wk",
            Interval::Monthly => "1mo",
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1d" => Ok(Interval::Daily),
            "1wk" => Ok(Interval::Weekly),
            "1mo" => Ok(Interval::Monthly),
            other => Err(DataError::Validation(format!("unknown interval '{other}'"))),
        }
    }
}

/// Trait for bar sources.
///
/// Implementations report failures as `DataError` values and must tolerate
/// concurrent calls from the batch worker pool.
pub trait DataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch the bar history of `ticker` for `period` at `interval`.
    fn fetch(&self, ticker: &str, period: Period, interval: Interval)
        -> Result<BarSeries, DataError>;

    /// Check if the provider is currently available (not rate-limited, not blocked).
    fn is_available(&self) -> bool {
        true
    }
}
