//! Ingest: raw provider rows → validated `BarSeries`.
//!
//! Rows with a missing (NaN), infinite or non-positive price are dropped.
//! Rows whose high/low do not bracket open/close are kept as delivered.
//! Duplicate dates keep the last row seen. Output is sorted ascending by date.

use super::provider::{DataError, Interval, Period, RawBar};
use crate::domain::{Bar, BarSeries};
use chrono::{Datelike, NaiveDate};

/// Outcome of ingesting one ticker's raw rows.
#[derive(Debug, Clone)]
pub struct IngestReport {
    pub series: BarSeries,
    pub dropped_rows: usize,
    pub duplicate_dates: usize,
}

/// Validate, sort and de-duplicate raw rows into a series.
pub fn ingest(ticker: &str, mut raw: Vec<RawBar>) -> Result<IngestReport, DataError> {
    let total = raw.len();
    // stable sort keeps provider order among equal dates, so "last wins" holds
    raw.sort_by_key(|r| r.date);

    let mut bars: Vec<Bar> = Vec::with_capacity(total);
    let mut dropped_rows = 0;
    let mut duplicate_dates = 0;

    for row in raw {
        let mut bar = Bar::new(row.date, row.open, row.high, row.low, row.close);
        bar.volume = row.volume;
        if !bar.has_valid_prices() {
            dropped_rows += 1;
            continue;
        }
        match bars.last_mut() {
            Some(prev) if prev.date == bar.date => {
                *prev = bar;
                duplicate_dates += 1;
            }
            _ => bars.push(bar),
        }
    }

    let series =
        BarSeries::new(ticker, bars).map_err(|e| DataError::Validation(e.to_string()))?;

    Ok(IngestReport {
        series,
        dropped_rows,
        duplicate_dates,
    })
}

/// Keep only bars inside `period`, measured back from the last bar.
pub fn clip_to_period(bars: Vec<Bar>, period: Period) -> Vec<Bar> {
    let Some(end) = bars.last().map(|b| b.date) else {
        return bars;
    };
    match period.start_from(end) {
        Some(start) => bars.into_iter().filter(|b| b.date >= start).collect(),
        None => bars,
    }
}

/// Aggregate daily bars into `interval` buckets.
///
/// Weekly buckets follow ISO weeks, monthly buckets calendar months. A
/// bucket is dated by its first bar: first open, max high, min low, last
/// close, summed volume (absent if no bar in the bucket had one).
pub fn resample(bars: &[Bar], interval: Interval) -> Vec<Bar> {
    let bucket_key = |date: NaiveDate| -> (i32, u32) {
        match interval {
            Interval::Daily => (date.year(), date.ordinal()),
            Interval::Weekly => {
                let week = date.iso_week();
                (week.year(), week.week())
            }
            Interval::Monthly => (date.year(), date.month()),
        }
    };

    if interval == Interval::Daily {
        return bars.to_vec();
    }

    let mut out: Vec<Bar> = Vec::new();
    let mut current_key = None;

    for bar in bars {
        let key = bucket_key(bar.date);
        match out.last_mut() {
            Some(agg) if current_key == Some(key) => {
                agg.high = agg.high.max(bar.high);
                agg.low = agg.low.min(bar.low);
                agg.close = bar.close;
                agg.volume = match (agg.volume, bar.volume) {
                    (Some(a), Some(b)) => Some(a + b),
                    (a, b) => a.or(b),
                };
            }
            _ => {
                out.push(bar.clone());
                current_key = Some(key);
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(date: &str, close: f64) -> RawBar {
        RawBar {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            open: close - 0.5,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: Some(1000),
        }
    }

    fn day(date: &str, open: f64, high: f64, low: f64, close: f64) -> Bar {
        Bar::new(
            NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            open,
            high,
            low,
            close,
        )
        .with_volume(100)
    }

    #[test]
    fn sorts_and_dedupes_keeping_last() {
        let rows = vec![
            raw("2024-01-03", 11.0),
            raw("2024-01-02", 10.0),
            raw("2024-01-03", 12.0),
        ];
        let report = ingest("AAPL", rows).unwrap();
        assert_eq!(report.series.closes(), vec![10.0, 12.0]);
        assert_eq!(report.duplicate_dates, 1);
        assert_eq!(report.dropped_rows, 0);
    }

    #[test]
    fn drops_rows_with_missing_or_bad_prices() {
        let mut missing = raw("2024-01-03", 11.0);
        missing.close = f64::NAN;
        let mut negative = raw("2024-01-04", 11.0);
        negative.low = -1.0;
        let rows = vec![raw("2024-01-02", 10.0), missing, negative];
        let report = ingest("AAPL", rows).unwrap();
        assert_eq!(report.series.len(), 1);
        assert_eq!(report.dropped_rows, 2);
    }

    #[test]
    fn keeps_rows_with_inconsistent_but_positive_prices() {
        let mut off_by_a_cent = raw("2024-01-03", 11.0);
        off_by_a_cent.open = 10.5;
        off_by_a_cent.high = 10.99;
        off_by_a_cent.low = 10.0;
        let rows = vec![raw("2024-01-02", 10.0), off_by_a_cent];
        let report = ingest("AAPL", rows).unwrap();
        assert_eq!(report.series.len(), 2);
        assert_eq!(report.dropped_rows, 0);
        let last = report.series.last().unwrap();
        assert_eq!(last.high, 10.99);
        assert!(!last.is_sane());
    }

    #[test]
    fn empty_input_gives_empty_series() {
        let report = ingest("AAPL", vec![]).unwrap();
        assert!(report.series.is_empty());
        assert_eq!(report.series.ticker(), "AAPL");
    }

    #[test]
    fn clip_keeps_trailing_window() {
        let bars = vec![
            day("2023-01-10", 1.0, 2.0, 0.5, 1.5),
            day("2024-03-01", 1.0, 2.0, 0.5, 1.5),
            day("2024-06-28", 1.0, 2.0, 0.5, 1.5),
        ];
        let clipped = clip_to_period(bars.clone(), Period::Month6);
        assert_eq!(clipped.len(), 2);
        assert_eq!(clip_to_period(bars, Period::Max).len(), 3);
    }

    #[test]
    fn weekly_resample_aggregates_ohlc() {
        // Mon..Wed of one ISO week, then Monday of the next
        let bars = vec![
            day("2024-06-03", 10.0, 11.0, 9.5, 10.5),
            day("2024-06-04", 10.5, 12.0, 10.0, 11.5),
            day("2024-06-05", 11.5, 11.8, 9.0, 9.8),
            day("2024-06-10", 9.8, 10.2, 9.1, 10.0),
        ];
        let weekly = resample(&bars, Interval::Weekly);
        assert_eq!(weekly.len(), 2);
        let w = &weekly[0];
        assert_eq!(w.date, NaiveDate::from_ymd_opt(2024, 6, 3).unwrap());
        assert_eq!(w.open, 10.0);
        assert_eq!(w.high, 12.0);
        assert_eq!(w.low, 9.0);
        assert_eq!(w.close, 9.8);
        assert_eq!(w.volume, Some(300));
    }

    #[test]
    fn monthly_resample_splits_on_month() {
        let bars = vec![
            day("2024-05-30", 10.0, 11.0, 9.5, 10.5),
            day("2024-05-31", 10.5, 12.0, 10.0, 11.5),
            day("2024-06-03", 11.5, 11.8, 9.0, 9.8),
        ];
        let monthly = resample(&bars, Interval::Monthly);
        assert_eq!(monthly.len(), 2);
        assert_eq!(monthly[0].close, 11.5);
    }

    #[test]
    fn daily_resample_is_identity() {
        let bars = vec![day("2024-05-30", 10.0, 11.0, 9.5, 10.5)];
        assert_eq!(resample(&bars, Interval::Daily), bars);
    }
}
