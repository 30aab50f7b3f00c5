//! Portfolio valuation run.
//!
//! Each ledger position is analysed (its signal supplies the current
//! price) and then valued. A position that cannot be valued is reported
//! as `Unvalued` with the reason; it never stops the run.

use serde::Serialize;
use stockbot_core::data::DataProvider;
use stockbot_core::domain::Position;
use stockbot_core::valuation::{valuate, Valuation};
use stockbot_core::{Signal, SignalEngine};
use tracing::info;

use crate::analysis::{analyze_batch, BatchOptions};
use crate::ledger::Ledger;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PositionStatus {
    Valued(Valuation),
    Unvalued { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionReport {
    pub position: Position,
    pub signal: Signal,
    pub status: PositionStatus,
}

/// Sums over valued rows only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PortfolioTotals {
    pub valued: usize,
    pub unvalued: usize,
    pub total_cost: f64,
    pub current_value: f64,
    pub pnl: f64,
    /// `None` when nothing was valued.
    pub pnl_percent: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PortfolioReport {
    pub positions: Vec<PositionReport>,
    /// Ledger rows that could not be parsed.
    pub ledger_errors: Vec<String>,
    pub totals: PortfolioTotals,
}

pub fn run_portfolio(
    provider: &dyn DataProvider,
    engine: &SignalEngine,
    ledger: &Ledger,
    opts: &BatchOptions<'_>,
) -> PortfolioReport {
    let tickers: Vec<String> = ledger.positions.iter().map(|p| p.ticker.clone()).collect();
    let batch = analyze_batch(provider, engine, &tickers, opts);

    let positions: Vec<PositionReport> = ledger
        .positions
        .iter()
        .zip(batch.results)
        .map(|(position, signal)| {
            let status = match valuate(position, signal.price) {
                Ok(v) => PositionStatus::Valued(v),
                Err(e) => PositionStatus::Unvalued {
                    reason: e.to_string(),
                },
            };
            PositionReport {
                position: position.clone(),
                signal,
                status,
            }
        })
        .collect();

    let totals = totals(&positions);
    info!(
        valued = totals.valued,
        unvalued = totals.unvalued,
        pnl = totals.pnl,
        "portfolio valued"
    );

    PortfolioReport {
        positions,
        ledger_errors: ledger.errors.iter().map(ToString::to_string).collect(),
        totals,
    }
}

fn totals(rows: &[PositionReport]) -> PortfolioTotals {
    let mut t = PortfolioTotals::default();
    for row in rows {
        match &row.status {
            PositionStatus::Valued(v) => {
                t.valued += 1;
                t.total_cost += v.total_cost;
                t.current_value += v.current_value;
            }
            PositionStatus::Unvalued { .. } => t.unvalued += 1,
        }
    }
    t.pnl = t.current_value - t.total_cost;
    t.pnl_percent = (t.total_cost > 0.0).then(|| t.pnl / t.total_cost * 100.0);
    t
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use stockbot_core::data::InMemoryProvider;
    use stockbot_core::domain::Bar;

    fn flat_bars(n: usize, close: f64) -> Vec<Bar> {
        let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        (0..n)
            .map(|i| Bar::new(base + chrono::Duration::days(i as i64), close, close, close, close))
            .collect()
    }

    #[test]
    fn values_each_position_and_totals() {
        let provider = InMemoryProvider::new()
            .with_bars("AAPL", flat_bars(30, 120.0))
            .with_bars("KO", flat_bars(30, 50.0));
        let ledger = Ledger {
            positions: vec![
                Position::new("AAPL", 100.0, 10),
                Position::new("KO", 60.0, 5),
                Position::new("ZZZZ", 10.0, 1),
                Position::new("AAPL", 100.0, 0),
            ],
            errors: vec![],
        };
        let report = run_portfolio(
            &provider,
            &SignalEngine::default(),
            &ledger,
            &BatchOptions::default(),
        );

        assert_eq!(report.positions.len(), 4);
        let PositionStatus::Valued(aapl) = &report.positions[0].status else {
            panic!("AAPL should be valued");
        };
        assert!((aapl.pnl - 200.0).abs() < 1e-9);
        assert!((aapl.pnl_percent - 20.0).abs() < 1e-9);

        assert!(matches!(
            &report.positions[2].status,
            PositionStatus::Unvalued { reason } if reason.contains("price unavailable")
        ));
        assert!(matches!(
            &report.positions[3].status,
            PositionStatus::Unvalued { reason } if reason.contains("shares must be positive")
        ));

        let t = report.totals;
        assert_eq!((t.valued, t.unvalued), (2, 2));
        assert!((t.total_cost - 1300.0).abs() < 1e-9);
        assert!((t.current_value - 1450.0).abs() < 1e-9);
        assert!((t.pnl - 150.0).abs() < 1e-9);
    }

    #[test]
    fn short_history_still_values() {
        let provider = InMemoryProvider::new().with_bars("NEW", flat_bars(3, 12.0));
        let ledger = Ledger {
            positions: vec![Position::new("NEW", 10.0, 2)],
            errors: vec![],
        };
        let report = run_portfolio(
            &provider,
            &SignalEngine::default(),
            &ledger,
            &BatchOptions::default(),
        );
        let row = &report.positions[0];
        assert!(row.signal.is_skip());
        assert!(matches!(row.status, PositionStatus::Valued(v) if (v.pnl - 4.0).abs() < 1e-12));
    }

    #[test]
    fn empty_ledger_has_no_percent() {
        let report = run_portfolio(
            &InMemoryProvider::new(),
            &SignalEngine::default(),
            &Ledger::default(),
            &BatchOptions::default(),
        );
        assert!(report.positions.is_empty());
        assert_eq!(report.totals.pnl_percent, None);
    }
}
