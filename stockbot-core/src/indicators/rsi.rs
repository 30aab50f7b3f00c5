//! Relative Strength Index (RSI).
//!
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//! Edge cases: avg_loss == 0 → 100 (this includes a perfectly flat window);
//! otherwise avg_gain == 0 → 0.
//!
//! Two averaging schemes are supported:
//! - `Wilder` (default): seed with the simple mean of the first `window`
//!   changes, then `avg = (avg * (window - 1) + x) / window`.
//! - `SimpleMean`: plain rolling mean of the trailing `window` changes.
//!
//! Output index i is defined once `window` changes exist, i.e. for
//! i >= window. Fewer than `window + 1` closes leaves every position `None`.

use super::Indicator;
use crate::domain::Bar;
use serde::{Deserialize, Serialize};

/// How average gain/loss are smoothed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RsiSmoothing {
    #[default]
    Wilder,
    #[serde(alias = "simple")]
    SimpleMean,
}

#[derive(Debug, Clone)]
pub struct Rsi {
    window: usize,
    smoothing: RsiSmoothing,
    name: String,
}

impl Rsi {
    pub fn new(window: usize) -> Self {
        Self::with_smoothing(window, RsiSmoothing::Wilder)
    }

    pub fn with_smoothing(window: usize, smoothing: RsiSmoothing) -> Self {
        assert!(window >= 1, "RSI window must be >= 1");
        Self {
            window,
            smoothing,
            name: format!("rsi_{window}"),
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// RSI over a plain closing-price sequence.
    pub fn compute_closes(&self, closes: &[f64]) -> Vec<Option<f64>> {
        compute_rsi(closes, self.window, self.smoothing)
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.window
    }

    fn compute(&self, bars: &[Bar]) -> Vec<Option<f64>> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        self.compute_closes(&closes)
    }
}

/// Compute RSI over `closes`, aligned to the input.
///
/// A window of 0 yields an all-`None` result. A non-finite close inside the
/// seed window leaves everything `None`; one after the seed ends the series
/// there (everything from that position on is `None`).
pub fn compute_rsi(closes: &[f64], window: usize, smoothing: RsiSmoothing) -> Vec<Option<f64>> {
    let n = closes.len();
    let mut result = vec![None; n];

    if window == 0 || n < window + 1 {
        return result;
    }

    // changes[i] = closes[i] - closes[i - 1]; changes[0] is unused
    let mut changes = vec![f64::NAN; n];
    for i in 1..n {
        changes[i] = closes[i] - closes[i - 1];
    }

    if changes[1..=window].iter().any(|c| !c.is_finite()) {
        return result;
    }

    match smoothing {
        RsiSmoothing::Wilder => {
            let (mut avg_gain, mut avg_loss) = mean_gain_loss(&changes[1..=window]);
            result[window] = Some(rsi_from_averages(avg_gain, avg_loss));

            let w = window as f64;
            for i in (window + 1)..n {
                let ch = changes[i];
                if !ch.is_finite() {
                    break;
                }
                avg_gain = (avg_gain * (w - 1.0) + ch.max(0.0)) / w;
                avg_loss = (avg_loss * (w - 1.0) + (-ch).max(0.0)) / w;
                result[i] = Some(rsi_from_averages(avg_gain, avg_loss));
            }
        }
        RsiSmoothing::SimpleMean => {
            for i in window..n {
                let trailing = &changes[(i + 1 - window)..=i];
                if trailing.iter().any(|c| !c.is_finite()) {
                    break;
                }
                let (avg_gain, avg_loss) = mean_gain_loss(trailing);
                result[i] = Some(rsi_from_averages(avg_gain, avg_loss));
            }
        }
    }

    result
}

fn mean_gain_loss(changes: &[f64]) -> (f64, f64) {
    let mut gain = 0.0;
    let mut loss = 0.0;
    for &ch in changes {
        if ch > 0.0 {
            gain += ch;
        } else {
            loss -= ch;
        }
    }
    let len = changes.len() as f64;
    (gain / len, loss / len)
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else if avg_gain == 0.0 {
        0.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}
