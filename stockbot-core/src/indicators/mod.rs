//! Indicators over bar history.
//!
//! Indicators are pure functions: bar history in, an aligned series out.
//! Positions without enough history are `None`; nothing is ever
//! forward-filled or recomputed from later bars.

pub mod rsi;

pub use rsi::{compute_rsi, Rsi, RsiSmoothing};

use crate::domain::Bar;

/// Trait for indicators computed over a full bar series.
///
/// # Look-ahead guard
/// No output at index t may depend on a bar after t. Truncating the input
/// series must leave every earlier output unchanged.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "rsi_14").
    fn name(&self) -> &str;

    /// Number of leading positions that are always `None`.
    fn lookback(&self) -> usize;

    /// Compute the indicator; the output has the same length as `bars`.
    fn compute(&self, bars: &[Bar]) -> Vec<Option<f64>>;
}

/// Create synthetic bars from close prices for testing.
///
/// open = prev_close (or close for the first bar),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<Bar> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar::new(
                base_date + chrono::Duration::days(i as i64),
                open,
                open.max(close) + 1.0,
                open.min(close) - 1.0,
                close,
            )
            .with_volume(1000)
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}
