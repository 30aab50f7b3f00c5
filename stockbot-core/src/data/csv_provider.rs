//! CSV directory provider.
//!
//! Reads daily bars from `<dir>/<TICKER>.csv` with the header
//! `date,open,high,low,close[,volume]` (dates as YYYY-MM-DD). The requested
//! period is measured back from the last row; weekly and monthly intervals
//! are resampled from the daily rows.

use super::ingest::{clip_to_period, ingest, resample};
use super::provider::{DataError, DataProvider, Interval, Period, RawBar};
use crate::domain::BarSeries;
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Debug, Deserialize)]
struct CsvRow {
    date: NaiveDate,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    #[serde(default)]
    volume: Option<u64>,
}

pub struct CsvProvider {
    dir: PathBuf,
}

impl CsvProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, ticker: &str) -> PathBuf {
        self.dir.join(format!("{ticker}.csv"))
    }

    fn read_rows(ticker: &str, path: &Path) -> Result<Vec<RawBar>, DataError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_path(path)
            .map_err(|e| DataError::Io(format!("{}: {e}", path.display())))?;

        let mut rows = Vec::new();
        for (i, record) in reader.deserialize::<CsvRow>().enumerate() {
            match record {
                Ok(row) => rows.push(RawBar {
                    date: row.date,
                    open: row.open,
                    high: row.high,
                    low: row.low,
                    close: row.close,
                    volume: row.volume,
                }),
                Err(e) => {
                    // header is line 1
                    warn!(ticker, line = i + 2, error = %e, "skipping malformed CSV row");
                }
            }
        }
        Ok(rows)
    }
}

impl DataProvider for CsvProvider {
    fn name(&self) -> &str {
        "csv"
    }

    fn fetch(
        &self,
        ticker: &str,
        period: Period,
        interval: Interval,
    ) -> Result<BarSeries, DataError> {
        let path = self.path_for(ticker);
        if !path.is_file() {
            return Err(DataError::UnknownTicker {
                ticker: ticker.to_string(),
            });
        }

        let rows = Self::read_rows(ticker, &path)?;
        let daily = ingest(ticker, rows)?.series.into_bars();
        let bars = resample(&clip_to_period(daily, period), interval);
        if bars.is_empty() {
            return Err(DataError::NoData {
                ticker: ticker.to_string(),
            });
        }
        BarSeries::new(ticker, bars).map_err(|e| DataError::Validation(e.to_string()))
    }

    fn is_available(&self) -> bool {
        self.dir.is_dir()
    }
}
