//! Look-ahead contamination tests for the RSI and the signal engine.
//!
//! No value at bar t may depend on bars after t.
//!
//! Method: compute on a truncated series (bars 0..100) and the full series
//! (bars 0..200). Bars 0..100 must be identical between both runs, and the
//! signal for the truncated series must equal the signal an observer would
//! have seen on day 100.

use chrono::NaiveDate;
use stockbot_core::domain::{Bar, BarSeries};
use stockbot_core::indicators::{Indicator, Rsi, RsiSmoothing};
use stockbot_core::signal::CombinePolicy;
use stockbot_core::{EngineConfig, SignalEngine};

/// Generate N bars of synthetic OHLC data with realistic variation.
fn make_test_bars(n: usize) -> Vec<Bar> {
    let base_date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    let mut bars = Vec::with_capacity(n);
    let mut price = 100.0;

    for i in 0..n {
        // Deterministic pseudo-random walk using a simple LCG
        let seed = (i as u64).wrapping_mul(6364136223846793005).wrapping_add(1);
        let change = ((seed % 200) as f64 - 100.0) * 0.05; // -5.0 to +5.0
        price += change;
        price = price.max(10.0); // floor at 10

        let open = price - 0.5;
        let close = price + 0.3;
        let high = open.max(close) + 2.0;
        let low = open.min(close) - 2.0;

        bars.push(
            Bar::new(
                base_date + chrono::Duration::days(i as i64),
                open,
                high,
                low,
                close,
            )
            .with_volume(1000 + i as u64 * 100),
        );
    }
    bars
}

fn assert_no_lookahead(indicator: &dyn Indicator) {
    let full = make_test_bars(200);
    let truncated = &full[..100];

    let full_values = indicator.compute(&full);
    let truncated_values = indicator.compute(truncated);

    for i in 0..100 {
        match (full_values[i], truncated_values[i]) {
            (Some(a), Some(b)) => assert!(
                (a - b).abs() < 1e-10,
                "{} leaks future data at bar {i}: full={a}, truncated={b}",
                indicator.name()
            ),
            (None, None) => {}
            (a, b) => panic!(
                "{} definedness differs at bar {i}: full={a:?}, truncated={b:?}",
                indicator.name()
            ),
        }
    }
}

#[test]
fn rsi_wilder_no_lookahead() {
    assert_no_lookahead(&Rsi::new(14));
}

#[test]
fn rsi_simple_mean_no_lookahead() {
    assert_no_lookahead(&Rsi::with_smoothing(14, RsiSmoothing::SimpleMean));
}

#[test]
fn rsi_short_window_no_lookahead() {
    assert_no_lookahead(&Rsi::new(2));
}

#[test]
fn signal_depends_only_on_history() {
    let full = make_test_bars(200);
    for policy in [
        CombinePolicy::Strict,
        CombinePolicy::Override,
        CombinePolicy::RsiOnly,
    ] {
        let engine = SignalEngine::new(EngineConfig::with_policy(policy));
        let a = engine.analyze(&BarSeries::new("T", full[..100].to_vec()).unwrap());
        let b = engine.analyze(&BarSeries::new("T", full[..100].to_vec()).unwrap());
        assert_eq!(a, b, "analysis is not deterministic for {policy:?}");
        assert_eq!(a.as_of, Some(full[99].date));
        assert_eq!(a.price, Some(full[99].close));
    }
}
