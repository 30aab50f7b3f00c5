//! Market summary: signals grouped by kind.

use std::fmt::Write;
use stockbot_core::{Signal, SignalKind};

/// Signals grouped into BUY / SELL / HOLD / SKIPPED sections. Every input
/// signal lands in exactly one section, in input order within it.
#[derive(Debug, Clone, Default)]
pub struct MarketSummary<'a> {
    pub buy: Vec<&'a Signal>,
    pub sell: Vec<&'a Signal>,
    pub hold: Vec<&'a Signal>,
    pub skipped: Vec<&'a Signal>,
}

impl<'a> MarketSummary<'a> {
    pub fn from_signals(signals: &'a [Signal]) -> Self {
        let mut summary = Self::default();
        for s in signals {
            match s.kind {
                SignalKind::Buy => summary.buy.push(s),
                SignalKind::Sell => summary.sell.push(s),
                SignalKind::Hold => summary.hold.push(s),
                SignalKind::Skip => summary.skipped.push(s),
            }
        }
        summary
    }

    pub fn total(&self) -> usize {
        self.buy.len() + self.sell.len() + self.hold.len() + self.skipped.len()
    }

    pub fn render(&self) -> String {
        let mut out = String::from("=== Market Summary ===\n");
        for (title, rows) in [
            ("BUY", &self.buy),
            ("SELL", &self.sell),
            ("HOLD", &self.hold),
            ("SKIPPED", &self.skipped),
        ] {
            let _ = writeln!(out, "\n{title} ({}):", rows.len());
            if rows.is_empty() {
                out.push_str("  (none)\n");
            }
            for s in rows {
                let _ = writeln!(out, "  {}", line(s));
            }
        }
        out
    }
}

/// One-line rendering of a signal.
pub fn line(s: &Signal) -> String {
    let rsi = s.rsi.map_or_else(|| "n/a".to_string(), |v| format!("{v:.2}"));
    let price = s.price.map_or_else(|| "n/a".to_string(), |p| format!("{p:.2}"));
    let first = s.explanation.lines().next().unwrap_or_default();
    format!(
        "{:<8} price {:>10}  RSI {:>6}  {}",
        s.ticker, price, rsi, first
    )
}

/// Full rendering of one signal, including every explanation line.
pub fn detail(s: &Signal) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}: {}", s.ticker, s.kind);
    if let Some(date) = s.as_of {
        let _ = writeln!(out, "  as of:  {date}");
    }
    if let Some(price) = s.price {
        let _ = writeln!(out, "  close:  {price:.2}");
    }
    if let Some(rsi) = s.rsi {
        let _ = writeln!(out, "  RSI:    {rsi:.2}");
    }
    let _ = writeln!(out, "  {}", s.explanation);
    out
}
