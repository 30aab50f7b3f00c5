//! Per-ticker analysis failures.
//!
//! None of these are fatal: each one becomes a Skip signal for its ticker
//! and the rest of a batch carries on.

use crate::data::DataError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// The loader failed, or returned an empty series.
    #[error("data unavailable ({0})")]
    DataUnavailable(#[from] DataError),

    /// Malformed ticker or other bad caller input.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Too few bars for the RSI window.
    #[error("RSI not available (insufficient data: {bars} bars, {required} required)")]
    ComputationSkipped { bars: usize, required: usize },

    /// The batch was cancelled before this ticker started.
    #[error("cancelled before analysis started")]
    Cancelled,
}
