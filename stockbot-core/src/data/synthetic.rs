//! Synthetic data provider (developer/offline mode).
//!
//! Produces a deterministic random walk from a starting price of 100.0,
//! seeded from the BLAKE3 hash of the ticker, on weekdays only. The same
//! ticker and end date always give the same bars.

use super::ingest::{ingest, resample};
use super::provider::{DataError, DataProvider, Interval, Period, RawBar};
use crate::domain::BarSeries;
use chrono::{Datelike, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Years generated for `Period::Max`.
const MAX_YEARS: u32 = 5;

pub struct SyntheticProvider {
    end: NaiveDate,
}

impl SyntheticProvider {
    /// Bars end on `end` (inclusive).
    pub fn new(end: NaiveDate) -> Self {
        Self { end }
    }

    /// Bars end today.
    pub fn ending_today() -> Self {
        Self::new(chrono::Local::now().date_naive())
    }
}

/// Generate daily synthetic bars between `start` and `end`.
pub fn generate_synthetic_bars(ticker: &str, start: NaiveDate, end: NaiveDate) -> Vec<RawBar> {
    let seed: [u8; 32] = *blake3::hash(ticker.as_bytes()).as_bytes();
    let mut rng = StdRng::from_seed(seed);

    let mut bars = Vec::new();
    let mut price = 100.0_f64;

    for current in start.iter_days().take_while(|d| *d <= end) {
        if matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
            continue;
        }

        let daily_return: f64 = rng.gen_range(-0.03..0.03);
        let open = price;
        let close = price * (1.0 + daily_return);
        let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
        let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
        let volume = rng.gen_range(500_000..5_000_000u64);

        bars.push(RawBar {
            date: current,
            open,
            high,
            low,
            close,
            volume: Some(volume),
        });

        price = close;
    }

    bars
}

impl DataProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch(
        &self,
        ticker: &str,
        period: Period,
        interval: Interval,
    ) -> Result<BarSeries, DataError> {
        let start = period
            .start_from(self.end)
            .or_else(|| self.end.checked_sub_months(chrono::Months::new(12 * MAX_YEARS)))
            .unwrap_or(self.end);
        let daily = ingest(ticker, generate_synthetic_bars(ticker, start, self.end))?;
        let bars = resample(daily.series.bars(), interval);
        if bars.is_empty() {
            return Err(DataError::NoData {
                ticker: ticker.to_string(),
            });
        }
        BarSeries::new(ticker, bars).map_err(|e| DataError::Validation(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn synthetic_data_is_deterministic() {
        let a = generate_synthetic_bars("SPY", d(2024, 1, 1), d(2024, 1, 31));
        let b = generate_synthetic_bars("SPY", d(2024, 1, 1), d(2024, 1, 31));
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.date, y.date);
            assert_eq!(x.close, y.close);
        }
    }

    #[test]
    fn different_tickers_get_different_walks() {
        let spy = generate_synthetic_bars("SPY", d(2024, 1, 1), d(2024, 1, 31));
        let qqq = generate_synthetic_bars("QQQ", d(2024, 1, 1), d(2024, 1, 31));
        assert_eq!(spy.len(), qqq.len());
        assert_ne!(spy[0].close, qqq[0].close);
    }

    #[test]
    fn skips_weekends() {
        let bars = generate_synthetic_bars("SPY", d(2024, 6, 1), d(2024, 6, 9));
        // Sat 1st .. Sun 9th → Mon-Fri only
        assert_eq!(bars.len(), 5);
        assert!(bars
            .iter()
            .all(|b| !matches!(b.date.weekday(), Weekday::Sat | Weekday::Sun)));
    }

    #[test]
    fn provider_honours_period_and_interval() {
        let provider = SyntheticProvider::new(d(2024, 6, 28));
        let daily = provider.fetch("AAPL", Period::Month6, Interval::Daily).unwrap();
        assert!(daily.len() > 100);
        assert!(daily.bars().iter().all(|b| b.is_sane()));

        let weekly = provider.fetch("AAPL", Period::Month6, Interval::Weekly).unwrap();
        assert!(weekly.len() >= 26 && weekly.len() <= 28);
    }
}
