//! Provider selection and guarded series loading for the runner.
//!
//! `build_provider` turns the `[data]` section into a concrete provider.
//! `load_series` is the engine boundary: it validates the symbol, calls the
//! provider, and turns any failure (a panic inside the provider included)
//! into an `AnalysisError` so one ticker can never take down a batch.

use crate::config::{DataConfig, ProviderKind};
use crate::ticker::normalize_ticker;
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;
use stockbot_core::data::{
    CircuitBreaker, CsvProvider, DataError, DataProvider, Interval, Period, SyntheticProvider,
    YahooOptions, YahooProvider,
};
use stockbot_core::domain::BarSeries;
use stockbot_core::AnalysisError;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors from setting up the data layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("provider '{provider}' is not available: {reason}")]
    Unavailable { provider: String, reason: String },

    #[error("data error: {0}")]
    Data(#[from] DataError),
}

/// Build the provider selected by `config`.
pub fn build_provider(config: &DataConfig) -> Result<Arc<dyn DataProvider>, LoadError> {
    match config.provider {
        ProviderKind::Yahoo => {
            let options = YahooOptions {
                timeout: Duration::from_secs(config.timeout_secs),
                max_retries: config.max_retries,
                ..YahooOptions::default()
            };
            let breaker = Arc::new(CircuitBreaker::default_provider());
            Ok(Arc::new(YahooProvider::new(breaker, options)?))
        }
        ProviderKind::Csv => {
            let dir = config.csv_dir.clone().ok_or_else(|| LoadError::Unavailable {
                provider: "csv".into(),
                reason: "no csv_dir configured".into(),
            })?;
            let provider = CsvProvider::new(dir.clone());
            if !provider.is_available() {
                return Err(LoadError::Unavailable {
                    provider: "csv".into(),
                    reason: format!("{} is not a directory", dir.display()),
                });
            }
            Ok(Arc::new(provider))
        }
        ProviderKind::Synthetic => {
            warn!("using synthetic data: signals are not based on real prices");
            Ok(Arc::new(SyntheticProvider::ending_today()))
        }
    }
}

/// Validate `raw` and fetch its series.
///
/// Returns the normalised ticker alongside the outcome so callers can
/// label Skip records consistently.
pub fn load_series(
    provider: &dyn DataProvider,
    raw: &str,
    period: Period,
    interval: Interval,
) -> (String, Result<BarSeries, AnalysisError>) {
    let ticker = match normalize_ticker(raw) {
        Ok(t) => t,
        Err(e) => {
            return (
                raw.trim().to_ascii_uppercase(),
                Err(AnalysisError::InvalidInput(e.to_string())),
            )
        }
    };

    debug!(ticker = %ticker, provider = provider.name(), %period, %interval, "fetching bars");
    let fetched = catch_unwind(AssertUnwindSafe(|| provider.fetch(&ticker, period, interval)));

    let result = match fetched {
        Ok(Ok(series)) => Ok(series),
        Ok(Err(e)) => Err(AnalysisError::DataUnavailable(e)),
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            warn!(ticker = %ticker, %message, "data provider panicked");
            Err(AnalysisError::DataUnavailable(DataError::Transient(format!(
                "provider failure: {message}"
            ))))
        }
    };
    (ticker, result)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use stockbot_core::data::InMemoryProvider;
    use stockbot_core::domain::Bar;

    struct PanickingProvider;

    impl DataProvider for PanickingProvider {
        fn name(&self) -> &str {
            "panicking"
        }

        fn fetch(&self, _: &str, _: Period, _: Interval) -> Result<BarSeries, DataError> {
            panic!("parser blew up");
        }
    }

    #[test]
    fn invalid_ticker_never_reaches_provider() {
        let (ticker, result) =
            load_series(&PanickingProvider, " bad ticker ", Period::Year1, Interval::Daily);
        assert_eq!(ticker, "BAD TICKER");
        assert!(matches!(result, Err(AnalysisError::InvalidInput(_))));
    }

    #[test]
    fn provider_panic_becomes_data_unavailable() {
        let (ticker, result) = load_series(&PanickingProvider, "aapl", Period::Year1, Interval::Daily);
        assert_eq!(ticker, "AAPL");
        let err = result.unwrap_err();
        assert!(matches!(err, AnalysisError::DataUnavailable(_)));
        assert!(err.to_string().contains("parser blew up"));
    }

    #[test]
    fn loads_normalised_ticker() {
        let bar = Bar::new(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(), 1.0, 2.0, 0.5, 1.5);
        let provider = InMemoryProvider::new().with_bars("MSFT", vec![bar]);
        let (ticker, result) = load_series(&provider, "msft", Period::Year1, Interval::Daily);
        assert_eq!(ticker, "MSFT");
        assert_eq!(result.unwrap().len(), 1);
    }

    #[test]
    fn csv_provider_requires_existing_dir() {
        let config = DataConfig {
            provider: ProviderKind::Csv,
            csv_dir: Some("/definitely/not/here".into()),
            ..DataConfig::default()
        };
        assert!(matches!(
            build_provider(&config),
            Err(LoadError::Unavailable { .. })
        ));

        let dir = tempfile::tempdir().unwrap();
        let config = DataConfig {
            provider: ProviderKind::Csv,
            csv_dir: Some(dir.path().to_path_buf()),
            ..DataConfig::default()
        };
        assert_eq!(build_provider(&config).unwrap().name(), "csv");
    }

    #[test]
    fn synthetic_provider_builds() {
        let config = DataConfig {
            provider: ProviderKind::Synthetic,
            ..DataConfig::default()
        };
        assert_eq!(build_provider(&config).unwrap().name(), "synthetic");
    }
}
