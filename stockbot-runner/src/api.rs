//! Transport-agnostic service boundary.
//!
//! Each call maps a request to a status code and a JSON body; any HTTP
//! layer only needs to forward them. Bad input is always a 400 with
//! `{"error": ...}`, never a failure of the process.

use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use stockbot_core::data::DataProvider;
use stockbot_core::SignalEngine;
use tracing::info;

use crate::analysis::{analyze_batch, analyze_ticker, BatchOptions};
use crate::config::{ConfigError, StockbotConfig};
use crate::ticker::{normalize_ticker, parse_ticker_list};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    fn ok<T: Serialize>(body: &T) -> Self {
        match serde_json::to_value(body) {
            Ok(body) => Self { status: 200, body },
            Err(e) => Self::error(500, format!("serialization failed: {e}")),
        }
    }

    fn error(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            body: json!({ "error": message.into() }),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Shared state for the service endpoints.
pub struct Service {
    provider: Arc<dyn DataProvider>,
    engine: SignalEngine,
    config: StockbotConfig,
}

impl Service {
    /// Validates `config` before building the engine, so a bad value is an
    /// error here rather than a panic on the first request.
    pub fn new(provider: Arc<dyn DataProvider>, config: StockbotConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            provider,
            engine: SignalEngine::new(config.engine.clone()),
            config,
        })
    }

    /// Single ticker → Signal JSON.
    pub fn analyze(&self, ticker: &str) -> ApiResponse {
        if let Err(e) = normalize_ticker(ticker) {
            return ApiResponse::error(400, e.to_string());
        }
        let (signal, _) = analyze_ticker(
            self.provider.as_ref(),
            &self.engine,
            ticker,
            self.config.data.period,
            self.config.data.interval,
        );
        info!(ticker = %signal.ticker, signal = %signal.kind, "api analyze");
        ApiResponse::ok(&signal)
    }

    /// Comma-separated tickers → `{analysis_results, comparison_series}`.
    pub fn compare(&self, tickers: &str) -> ApiResponse {
        let tickers = match parse_ticker_list(tickers) {
            Ok(t) => t,
            Err(e) => return ApiResponse::error(400, e.to_string()),
        };
        let report = analyze_batch(
            self.provider.as_ref(),
            &self.engine,
            &tickers,
            &BatchOptions::from_config(&self.config),
        );
        info!(tickers = tickers.len(), "api compare");
        ApiResponse::ok(&report)
    }
}
