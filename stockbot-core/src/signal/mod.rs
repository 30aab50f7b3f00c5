//! Signal records and the policy-driven combiner.

pub mod policy;

pub use policy::{combine, CombinePolicy, RsiThresholds, Verdict};

use crate::candlestick::{Direction, PatternEvent};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete trading signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalKind {
    Buy,
    Sell,
    Hold,
    Skip,
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SignalKind::Buy => "Buy",
            SignalKind::Sell => "Sell",
            SignalKind::Hold => "Hold",
            SignalKind::Skip => "Skip",
        };
        f.write_str(s)
    }
}

/// Candlestick input consulted by the combiner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CandlestickEvidence {
    /// Two-bar direction of the most recent bars.
    Direction(Direction),
    /// Trailing pattern events, oldest first.
    Patterns(Vec<PatternEvent>),
    /// Nothing consulted (RSI-only policy, or no data).
    None,
}

/// Result of analysing one ticker. Built fresh per call, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub ticker: String,
    #[serde(rename = "signal_kind")]
    pub kind: SignalKind,
    #[serde(rename = "rsi_value")]
    pub rsi: Option<f64>,
    pub explanation: String,
    #[serde(rename = "as_of_date")]
    pub as_of: Option<NaiveDate>,
    /// Last close of the analysed series, if any bar exists.
    pub price: Option<f64>,
    pub candlestick: CandlestickEvidence,
}

impl Signal {
    /// A Skip record carrying only the reason.
    pub fn skipped(ticker: impl Into<String>, explanation: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            kind: SignalKind::Skip,
            rsi: None,
            explanation: explanation.into(),
            as_of: None,
            price: None,
            candlestick: CandlestickEvidence::None,
        }
    }

    pub fn is_skip(&self) -> bool {
        self.kind == SignalKind::Skip
    }
}
