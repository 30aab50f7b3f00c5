//! Hammer pattern scan.
//!
//! A bar is a Hammer when
//! `real_body > 0`, `lower_shadow >= lower_ratio * real_body` and
//! `upper_shadow < upper_ratio * real_body`.
//! An up-closing hammer hints Buy; a down-closing one only hints Hold.

use crate::domain::Bar;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Shadow-to-body ratios that define a Hammer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HammerParams {
    pub lower_ratio: f64,
    pub upper_ratio: f64,
}

impl Default for HammerParams {
    fn default() -> Self {
        Self {
            lower_ratio: 2.0,
            upper_ratio: 0.2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatternKind {
    Hammer,
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternKind::Hammer => f.write_str("Hammer"),
        }
    }
}

/// Directional hint attached to a detected pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatternHint {
    Buy,
    Sell,
    Hold,
}

/// One detected pattern occurrence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternEvent {
    pub date: NaiveDate,
    pub kind: PatternKind,
    pub hint: PatternHint,
    pub message: String,
}

const HAMMER_MESSAGE: &str = "Potential bullish reversal (Hammer candlestick detected).";

/// Check a single bar against the Hammer shape.
pub fn is_hammer(bar: &Bar, params: &HammerParams) -> bool {
    let body = bar.real_body();
    body > 0.0
        && bar.lower_shadow() >= params.lower_ratio * body
        && bar.upper_shadow() < params.upper_ratio * body
}

/// Scan every bar and return the Hammer events in chronological order.
pub fn scan_hammers(bars: &[Bar], params: &HammerParams) -> Vec<PatternEvent> {
    bars.iter()
        .filter(|bar| is_hammer(bar, params))
        .map(|bar| PatternEvent {
            date: bar.date,
            kind: PatternKind::Hammer,
            hint: if bar.is_up() {
                PatternHint::Buy
            } else {
                PatternHint::Hold
            },
            message: HAMMER_MESSAGE.to_string(),
        })
        .collect()
}
