//! Plain-text portfolio table.

use std::fmt::Write;

use crate::portfolio::{PortfolioReport, PositionStatus};

pub fn render_portfolio(report: &PortfolioReport) -> String {
    let mut out = String::from("=== Portfolio ===\n");
    let _ = writeln!(
        out,
        "{:<8} {:>10} {:>10} {:>10} {:>12} {:>9}  {:<6} {}",
        "Ticker", "Shares", "Buy", "Price", "P/L", "P/L %", "Signal", "Note"
    );

    for row in &report.positions {
        let p = &row.position;
        match &row.status {
            PositionStatus::Valued(v) => {
                let _ = writeln!(
                    out,
                    "{:<8} {:>10} {:>10.2} {:>10.2} {:>+12.2} {:>+8.2}%  {:<6} {}",
                    p.ticker,
                    p.shares,
                    p.buy_price,
                    v.current_price,
                    v.pnl,
                    v.pnl_percent,
                    row.signal.kind,
                    row.signal.explanation.lines().next().unwrap_or_default()
                );
            }
            PositionStatus::Unvalued { reason } => {
                let _ = writeln!(
                    out,
                    "{:<8} {:>10} {:>10.2} {:>10} {:>12} {:>9}  {:<6} unvalued: {}",
                    p.ticker, p.shares, p.buy_price, "-", "-", "-", row.signal.kind, reason
                );
            }
        }
    }

    let t = &report.totals;
    let _ = writeln!(
        out,
        "\nValued {} of {} positions. Cost {:.2}, value {:.2}, P/L {:+.2}{}",
        t.valued,
        t.valued + t.unvalued,
        t.total_cost,
        t.current_value,
        t.pnl,
        t.pnl_percent
            .map(|pct| format!(" ({pct:+.2}%)"))
            .unwrap_or_default()
    );

    if !report.ledger_errors.is_empty() {
        let _ = writeln!(out, "\nSkipped ledger rows:");
        for e in &report.ledger_errors {
            let _ = writeln!(out, "  {e}");
        }
    }
    out
}
