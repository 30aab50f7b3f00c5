//! Property tests for engine invariants.
//!
//! Uses proptest to verify:
//! 1. RSI bounds: every defined value lies in [0, 100]
//! 2. Short series: fewer than window + 1 closes gives no RSI and a Skip
//! 3. Undefined RSI is Skip under every combine policy
//! 4. Rebasing: every normalised series starts at exactly 100
//! 5. Valuation identity: pnl == current_value - total_cost

use indexmap::IndexMap;
use proptest::prelude::*;
use stockbot_core::candlestick::Direction;
use stockbot_core::domain::{Bar, BarSeries, Position};
use stockbot_core::indicators::{compute_rsi, RsiSmoothing};
use stockbot_core::normalize::normalize;
use stockbot_core::signal::{combine, CandlestickEvidence, CombinePolicy, RsiThresholds};
use stockbot_core::valuation::valuate;
use stockbot_core::{EngineConfig, SignalEngine, SignalKind};

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_price() -> impl Strategy<Value = f64> {
    (1.0..500.0_f64).prop_map(|p| (p * 100.0).round() / 100.0)
}

fn arb_closes(max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(arb_price(), 0..max_len)
}

fn arb_smoothing() -> impl Strategy<Value = RsiSmoothing> {
    prop_oneof![Just(RsiSmoothing::Wilder), Just(RsiSmoothing::SimpleMean)]
}

fn arb_policy() -> impl Strategy<Value = CombinePolicy> {
    prop_oneof![
        Just(CombinePolicy::Strict),
        Just(CombinePolicy::Override),
        Just(CombinePolicy::RsiOnly),
    ]
}

fn series_from(closes: &[f64]) -> BarSeries {
    let base = chrono::NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            let open = if i == 0 { c } else { closes[i - 1] };
            Bar::new(
                base + chrono::Duration::days(i as i64),
                open,
                open.max(c) + 0.5,
                (open.min(c) - 0.5).max(0.01),
                c,
            )
        })
        .collect();
    BarSeries::new("PROP", bars).unwrap()
}

// ── 1. RSI bounds ────────────────────────────────────────────────────

proptest! {
    #[test]
    fn rsi_is_bounded(
        closes in arb_closes(120),
        window in 1usize..30,
        smoothing in arb_smoothing(),
    ) {
        let rsi = compute_rsi(&closes, window, smoothing);
        prop_assert_eq!(rsi.len(), closes.len());
        for v in rsi.into_iter().flatten() {
            prop_assert!((0.0..=100.0).contains(&v), "rsi out of range: {}", v);
        }
    }

    /// Defined exactly from index `window` on.
    #[test]
    fn rsi_defined_from_window(
        closes in arb_closes(80),
        window in 1usize..20,
        smoothing in arb_smoothing(),
    ) {
        let rsi = compute_rsi(&closes, window, smoothing);
        for (i, v) in rsi.iter().enumerate() {
            prop_assert_eq!(v.is_some(), i >= window, "index {}", i);
        }
    }
}

// ── 2. Short series ──────────────────────────────────────────────────

proptest! {
    #[test]
    fn short_series_is_all_undefined_and_skipped(
        closes in prop::collection::vec(arb_price(), 0..15),
        policy in arb_policy(),
    ) {
        let rsi = compute_rsi(&closes, 14, RsiSmoothing::Wilder);
        prop_assert!(rsi.iter().all(Option::is_none));

        let engine = SignalEngine::new(EngineConfig::with_policy(policy));
        let signal = engine.analyze(&series_from(&closes));
        prop_assert_eq!(signal.kind, SignalKind::Skip);
        prop_assert!(signal.rsi.is_none());
    }
}

// ── 3. Undefined RSI never holds ─────────────────────────────────────

proptest! {
    #[test]
    fn undefined_rsi_is_skip_under_every_policy(
        policy in arb_policy(),
        dir in prop_oneof![
            Just(Direction::Bullish),
            Just(Direction::Bearish),
            Just(Direction::Neutral),
        ],
    ) {
        let verdict = combine(
            None,
            &CandlestickEvidence::Direction(dir),
            policy,
            &RsiThresholds::default(),
            3,
        );
        prop_assert_eq!(verdict.kind, SignalKind::Skip);
    }

    /// Defined RSI never produces Skip.
    #[test]
    fn defined_rsi_never_skips(rsi in 0.0..=100.0_f64, policy in arb_policy()) {
        let verdict = combine(
            Some(rsi),
            &CandlestickEvidence::None,
            policy,
            &RsiThresholds::default(),
            3,
        );
        prop_assert_ne!(verdict.kind, SignalKind::Skip);
    }
}

// ── 4. Rebasing ──────────────────────────────────────────────────────

proptest! {
    #[test]
    fn normalised_series_start_at_one_hundred(
        a in arb_closes(40),
        b in arb_closes(40),
    ) {
        let mut input = IndexMap::new();
        input.insert("A".to_string(), a.clone());
        input.insert("B".to_string(), b.clone());
        let out = normalize(&input);

        for (ticker, raw) in [("A", &a), ("B", &b)] {
            match out.get(ticker) {
                Some(values) => {
                    prop_assert_eq!(values.len(), raw.len());
                    prop_assert!((values[0] - 100.0).abs() < 1e-9);
                }
                None => prop_assert!(raw.is_empty()),
            }
        }
    }
}

// ── 5. Valuation identity ────────────────────────────────────────────

proptest! {
    #[test]
    fn pnl_is_value_minus_cost(
        buy in arb_price(),
        now in arb_price(),
        shares in 1i64..10_000,
    ) {
        let v = valuate(&Position::new("X", buy, shares), Some(now)).unwrap();
        prop_assert!((v.pnl - (v.current_value - v.total_cost)).abs() < 1e-6);
        prop_assert!((v.pnl_percent - v.pnl / v.total_cost * 100.0).abs() < 1e-9);
        prop_assert_eq!(v.pnl > 0.0, now > buy);
    }
}
