//! Combination policies: RSI value + candlestick evidence → SignalKind.
//!
//! - `Strict`: Buy iff rsi < oversold and the two-bar direction is
//!   Bullish; Sell iff rsi > overbought and Bearish; otherwise Hold.
//! - `Override`: the RSI alone sets a base (Sell above overbought, Buy
//!   below oversold, else Hold). The trailing pattern events are then
//!   applied oldest to newest: a Buy hint moves the result to Buy unless it
//!   is already Sell, a Sell hint moves it to Sell unless it is already Buy.
//!   An opposite hint can never flip a Buy or Sell, so with mixed hints the
//!   oldest directional event inside the window decides.
//! - `RsiOnly`: Buy below oversold, Sell above overbought, else Hold.
//!
//! Every policy returns Skip when the RSI is undefined.

use super::{CandlestickEvidence, SignalKind};
use crate::candlestick::{Direction, PatternEvent, PatternHint};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombinePolicy {
    #[default]
    Strict,
    Override,
    RsiOnly,
}

/// Oversold / overbought RSI levels. Comparisons are strict.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RsiThresholds {
    pub oversold: f64,
    pub overbought: f64,
}

impl Default for RsiThresholds {
    fn default() -> Self {
        Self {
            oversold: 30.0,
            overbought: 70.0,
        }
    }
}

/// Outcome of one combination.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub kind: SignalKind,
    pub explanation: String,
}

/// Combine an RSI reading with candlestick evidence under `policy`.
///
/// `trailing_events` bounds how many of the most recent pattern events the
/// override policy consults.
pub fn combine(
    rsi: Option<f64>,
    evidence: &CandlestickEvidence,
    policy: CombinePolicy,
    thresholds: &RsiThresholds,
    trailing_events: usize,
) -> Verdict {
    let Some(rsi) = rsi else {
        return Verdict {
            kind: SignalKind::Skip,
            explanation: "RSI not available (insufficient data)".into(),
        };
    };

    match policy {
        CombinePolicy::Strict => {
            let direction = match evidence {
                CandlestickEvidence::Direction(d) => *d,
                _ => Direction::Neutral,
            };
            combine_strict(rsi, direction, thresholds)
        }
        CombinePolicy::Override => {
            let events: &[PatternEvent] = match evidence {
                CandlestickEvidence::Patterns(events) => events.as_slice(),
                _ => &[],
            };
            combine_override(rsi, trailing(events, trailing_events), thresholds)
        }
        CombinePolicy::RsiOnly => combine_rsi_only(rsi, thresholds),
    }
}

/// The last `n` events, oldest first.
fn trailing(events: &[PatternEvent], n: usize) -> &[PatternEvent] {
    &events[events.len().saturating_sub(n)..]
}

fn combine_strict(rsi: f64, direction: Direction, t: &RsiThresholds) -> Verdict {
    if rsi < t.oversold && direction == Direction::Bullish {
        Verdict {
            kind: SignalKind::Buy,
            explanation: format!("Buy Signal (Bullish candlestick + RSI {rsi:.2})"),
        }
    } else if rsi > t.overbought && direction == Direction::Bearish {
        Verdict {
            kind: SignalKind::Sell,
            explanation: format!("Sell Signal (Bearish candlestick + RSI {rsi:.2})"),
        }
    } else {
        Verdict {
            kind: SignalKind::Hold,
            explanation: format!("Hold/Neutral (Signal: {direction}, RSI: {rsi:.2})"),
        }
    }
}

fn rsi_base(rsi: f64, t: &RsiThresholds) -> (SignalKind, String) {
    if rsi > t.overbought {
        (
            SignalKind::Sell,
            format!("Overbought (RSI > {}). Potential sell signal.", t.overbought),
        )
    } else if rsi < t.oversold {
        (
            SignalKind::Buy,
            format!("Oversold (RSI < {}). Potential buy signal.", t.oversold),
        )
    } else {
        (
            SignalKind::Hold,
            format!("Neutral (RSI between {} and {}).", t.oversold, t.overbought),
        )
    }
}

fn combine_override(rsi: f64, events: &[PatternEvent], t: &RsiThresholds) -> Verdict {
    let (mut kind, base) = rsi_base(rsi, t);
    let mut explanation = format!("RSI {rsi:.2}: {base}");

    for event in events {
        let _ = write!(
            explanation,
            "\n  - Candlestick: {} (Date: {})",
            event.message,
            event.date.format("%Y-%m-%d")
        );
        match event.hint {
            PatternHint::Buy if kind != SignalKind::Sell => kind = SignalKind::Buy,
            PatternHint::Sell if kind != SignalKind::Buy => kind = SignalKind::Sell,
            _ => {}
        }
    }

    Verdict { kind, explanation }
}

fn combine_rsi_only(rsi: f64, t: &RsiThresholds) -> Verdict {
    let (kind, base) = rsi_base(rsi, t);
    Verdict {
        kind,
        explanation: format!("RSI {rsi:.2}: {base}"),
    }
}
