//! Signal engine: one bar series in, one signal record out.
//!
//! The pipeline per ticker:
//!
//! 1. RSI over the closes (last value is the reading)
//! 2. Candlestick evidence chosen by the combine policy
//! 3. Combine into Buy / Sell / Hold / Skip
//!
//! The engine holds only configuration; every call is independent, so one
//! engine can be shared across worker threads.

pub mod config;

pub use config::EngineConfig;

use crate::candlestick::{classify_direction, scan_hammers};
use crate::data::DataError;
use crate::domain::BarSeries;
use crate::error::AnalysisError;
use crate::indicators::Rsi;
use crate::signal::{combine, CandlestickEvidence, CombinePolicy, Signal};

#[derive(Debug, Clone)]
pub struct SignalEngine {
    config: EngineConfig,
    rsi: Rsi,
}

impl SignalEngine {
    /// # Panics
    /// If `config.rsi_window` is 0. Configuration loaded through the runner
    /// is validated before it gets here.
    pub fn new(config: EngineConfig) -> Self {
        let rsi = Rsi::with_smoothing(config.rsi_window, config.rsi_smoothing);
        Self { config, rsi }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Bars needed before the RSI is defined (window + 1 closes).
    pub fn required_bars(&self) -> usize {
        self.config.rsi_window + 1
    }

    /// Analyse one series.
    ///
    /// An empty series is a DataUnavailable skip. A short series is a
    /// ComputationSkipped skip that still reports the last close and date.
    pub fn analyze(&self, series: &BarSeries) -> Signal {
        let ticker = series.ticker();
        let Some(last) = series.last() else {
            return self.skip(
                ticker,
                &AnalysisError::DataUnavailable(DataError::NoData {
                    ticker: ticker.to_string(),
                }),
            );
        };

        let rsi = self
            .rsi
            .compute_closes(&series.closes())
            .last()
            .copied()
            .flatten();

        if rsi.is_none() {
            let err = AnalysisError::ComputationSkipped {
                bars: series.len(),
                required: self.required_bars(),
            };
            return Signal {
                price: Some(last.close),
                as_of: Some(last.date),
                ..self.skip(ticker, &err)
            };
        }

        let evidence = self.evidence(series);
        let verdict = combine(
            rsi,
            &evidence,
            self.config.policy,
            &self.config.thresholds,
            self.config.trailing_events,
        );

        Signal {
            ticker: ticker.to_string(),
            kind: verdict.kind,
            rsi,
            explanation: verdict.explanation,
            as_of: Some(last.date),
            price: Some(last.close),
            candlestick: evidence,
        }
    }

    /// The Skip record for a ticker that could not be analysed.
    pub fn skip(&self, ticker: &str, error: &AnalysisError) -> Signal {
        Signal::skipped(ticker, error.to_string())
    }

    fn evidence(&self, series: &BarSeries) -> CandlestickEvidence {
        match self.config.policy {
            CombinePolicy::Strict => CandlestickEvidence::Direction(classify_direction(series.bars())),
            CombinePolicy::Override => {
                let mut events = scan_hammers(series.bars(), &self.config.hammer);
                let keep_from = events.len().saturating_sub(self.config.trailing_events);
                CandlestickEvidence::Patterns(events.split_off(keep_from))
            }
            CombinePolicy::RsiOnly => CandlestickEvidence::None,
        }
    }
}

impl Default for SignalEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
