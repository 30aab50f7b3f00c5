//! Single- and multi-ticker analysis.
//!
//! Every requested ticker yields exactly one record, in input order, no
//! matter how the work was scheduled or which tickers failed. With more
//! than one worker the tickers run on a dedicated rayon pool.
//!
//! Cancellation is cooperative: the flag is checked before each ticker
//! starts. Tickers already in flight finish normally; tickers not yet
//! started get a "cancelled" Skip record. No partially computed signal is
//! ever emitted.

use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use stockbot_core::data::{DataProvider, Interval, Period};
use stockbot_core::domain::BarSeries;
use stockbot_core::normalize::{build_comparison, AlignmentPolicy, ComparisonSet};
use stockbot_core::{AnalysisError, Signal, SignalEngine};
use rayon::prelude::*;
use tracing::{info, warn};

use crate::config::StockbotConfig;
use crate::data_loader::load_series;

/// How a batch is fetched and scheduled.
#[derive(Debug, Clone)]
pub struct BatchOptions<'a> {
    pub period: Period,
    pub interval: Interval,
    /// 1 runs sequentially.
    pub workers: usize,
    /// Pause before each fetch after the first.
    pub request_delay: Duration,
    pub alignment: AlignmentPolicy,
    pub cancel: Option<&'a AtomicBool>,
}

impl Default for BatchOptions<'_> {
    fn default() -> Self {
        Self {
            period: Period::Year1,
            interval: Interval::Daily,
            workers: 1,
            request_delay: Duration::ZERO,
            alignment: AlignmentPolicy::Positional,
            cancel: None,
        }
    }
}

impl<'a> BatchOptions<'a> {
    pub fn from_config(config: &StockbotConfig) -> Self {
        Self {
            period: config.data.period,
            interval: config.data.interval,
            workers: config.batch.workers,
            request_delay: config.batch.request_delay(),
            alignment: config.batch.alignment,
            cancel: None,
        }
    }

    pub fn with_cancel(mut self, cancel: &'a AtomicBool) -> Self {
        self.cancel = Some(cancel);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.is_some_and(|f| f.load(Ordering::Relaxed))
    }
}

/// Signals for every requested ticker plus the comparison chart data.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    #[serde(rename = "analysis_results")]
    pub results: Vec<Signal>,
    #[serde(rename = "comparison_series")]
    pub comparison: ComparisonSet,
}

impl BatchReport {
    pub fn skipped(&self) -> usize {
        self.results.iter().filter(|s| s.is_skip()).count()
    }
}

/// Fetch and analyse one ticker. The series is returned when one was
/// loaded, even if the signal is a Skip.
pub fn analyze_ticker(
    provider: &dyn DataProvider,
    engine: &SignalEngine,
    raw_ticker: &str,
    period: Period,
    interval: Interval,
) -> (Signal, Option<BarSeries>) {
    let (ticker, loaded) = load_series(provider, raw_ticker, period, interval);
    match loaded {
        Ok(series) => {
            let signal = engine.analyze(&series);
            if signal.is_skip() {
                warn!(ticker = %ticker, reason = %signal.explanation, "skipped");
            } else {
                info!(ticker = %ticker, signal = %signal.kind, rsi = ?signal.rsi, "analysed");
            }
            (signal, Some(series))
        }
        Err(e) => {
            warn!(ticker = %ticker, error = %e, "skipped");
            (engine.skip(&ticker, &e), None)
        }
    }
}

/// Analyse `tickers` and build the comparison set from every series that
/// loaded.
pub fn analyze_batch(
    provider: &dyn DataProvider,
    engine: &SignalEngine,
    tickers: &[String],
    opts: &BatchOptions<'_>,
) -> BatchReport {
    let run_one = |(i, raw): (usize, &String)| -> (Signal, Option<BarSeries>) {
        if opts.is_cancelled() {
            return cancelled(engine, raw);
        }
        if i > 0 && !opts.request_delay.is_zero() {
            std::thread::sleep(opts.request_delay);
            if opts.is_cancelled() {
                return cancelled(engine, raw);
            }
        }
        analyze_ticker(provider, engine, raw, opts.period, opts.interval)
    };

    let pool = if opts.workers > 1 {
        match rayon::ThreadPoolBuilder::new()
            .num_threads(opts.workers)
            .build()
        {
            Ok(pool) => Some(pool),
            Err(e) => {
                warn!(error = %e, "could not build worker pool, running sequentially");
                None
            }
        }
    } else {
        None
    };

    let outcomes: Vec<(Signal, Option<BarSeries>)> = match pool {
        Some(pool) => pool.install(|| tickers.par_iter().enumerate().map(run_one).collect()),
        None => tickers.iter().enumerate().map(run_one).collect(),
    };

    let mut results = Vec::with_capacity(outcomes.len());
    let mut loaded = Vec::new();
    for (signal, series) in outcomes {
        results.push(signal);
        loaded.extend(series.filter(|s| !s.is_empty()));
    }

    let comparison = build_comparison(&loaded, opts.alignment);
    let report = BatchReport {
        results,
        comparison,
    };
    info!(
        tickers = tickers.len(),
        skipped = report.skipped(),
        compared = report.comparison.len(),
        "batch complete"
    );
    report
}

fn cancelled(engine: &SignalEngine, raw: &str) -> (Signal, Option<BarSeries>) {
    (engine.skip(&raw.trim().to_ascii_uppercase(), &AnalysisError::Cancelled), None)
}
