//! Candlestick classification.
//!
//! Two independent classifiers are used by different call sites:
//! - [`classify_direction`]: compares the last two bars and labels the
//!   move Bullish / Bearish / Neutral.
//! - [`scan_hammers`]: walks the full series and emits one event per bar
//!   that has a Hammer shape.
//!
//! Both are pure scans; the input bars are never modified.

pub mod hammer;

pub use hammer::{scan_hammers, HammerParams, PatternEvent, PatternHint, PatternKind};

use crate::domain::Bar;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Two-bar direction label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Bullish,
    Bearish,
    Neutral,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::Bullish => "Bullish",
            Direction::Bearish => "Bearish",
            Direction::Neutral => "Neutral",
        };
        f.write_str(s)
    }
}

/// Classify the most recent two bars.
///
/// - Bullish: previous bar closed down, current bar closed up and above the
///   previous close.
/// - Bearish: previous bar closed up, current bar closed down and below the
///   previous close.
/// - Neutral otherwise, and always with fewer than two bars.
pub fn classify_direction(bars: &[Bar]) -> Direction {
    let [.., prev, curr] = bars else {
        return Direction::Neutral;
    };

    if prev.is_down() && curr.is_up() && curr.close > prev.close {
        Direction::Bullish
    } else if prev.is_up() && curr.is_down() && curr.close < prev.close {
        Direction::Bearish
    } else {
        Direction::Neutral
    }
}
