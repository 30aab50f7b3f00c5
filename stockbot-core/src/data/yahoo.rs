//! Yahoo Finance data provider.
//!
//! Fetches OHLC bars from Yahoo's v8 chart API using the `range` and
//! `interval` query parameters. Handles retries with exponential backoff,
//! response parsing, split/dividend adjustment and the circuit breaker.
//! The HTTP client timeout bounds every single request, which makes it the
//! per-ticker timeout of a batch.
//!
//! Yahoo Finance has no official API and is subject to unannounced format
//! changes; the CSV provider is the fallback when it is unavailable.

use super::circuit_breaker::CircuitBreaker;
use super::ingest::ingest;
use super::provider::{DataError, DataProvider, Interval, Period, RawBar};
use crate::domain::BarSeries;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
    adjclose: Option<Vec<AdjCloseData>>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

#[derive(Debug, Deserialize)]
struct AdjCloseData {
    adjclose: Vec<Option<f64>>,
}

/// Knobs for the Yahoo client.
#[derive(Debug, Clone)]
pub struct YahooOptions {
    /// Per-request timeout.
    pub timeout: Duration,
    pub max_retries: u32,
    pub base_delay: Duration,
    pub base_url: String,
}

impl Default for YahooOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_retries: 3,
            base_delay: Duration::from_millis(500),
            base_url: "https://query2.finance.yahoo.com".into(),
        }
    }
}

/// Yahoo Finance data provider.
pub struct YahooProvider {
    client: reqwest::blocking::Client,
    circuit_breaker: Arc<CircuitBreaker>,
    options: YahooOptions,
}

impl YahooProvider {
    pub fn new(circuit_breaker: Arc<CircuitBreaker>, options: YahooOptions) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(options.timeout)
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .map_err(|e| DataError::Transient(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            circuit_breaker,
            options,
        })
    }

    fn chart_url(&self, ticker: &str, period: Period, interval: Interval) -> String {
        format!(
            "{}/v8/finance/chart/{ticker}?range={period}&interval={interval}&includeAdjustedClose=true",
            self.options.base_url.trim_end_matches('/')
        )
    }

    /// Execute the request with retry and circuit breaker logic.
    fn fetch_with_retry(
        &self,
        ticker: &str,
        period: Period,
        interval: Interval,
    ) -> Result<Vec<RawBar>, DataError> {
        if !self.circuit_breaker.is_allowed() {
            return Err(DataError::CircuitBreakerTripped);
        }

        let url = self.chart_url(ticker, period, interval);
        let mut last_error = None;

        for attempt in 0..=self.options.max_retries {
            if attempt > 0 {
                let delay = self.options.base_delay * 2u32.pow(attempt - 1);
                debug!(ticker, attempt, ?delay, "retrying chart request");
                std::thread::sleep(delay);
            }

            if !self.circuit_breaker.is_allowed() {
                return Err(DataError::CircuitBreakerTripped);
            }

            let resp = match self.client.get(&url).send() {
                Ok(resp) => resp,
                Err(e) if e.is_connect() || e.is_timeout() => {
                    self.circuit_breaker.record_failure();
                    last_error = Some(DataError::Transient(e.to_string()));
                    continue;
                }
                Err(e) => return Err(DataError::Transient(e.to_string())),
            };

            let status = resp.status();

            if status == reqwest::StatusCode::FORBIDDEN {
                self.circuit_breaker.trip();
                return Err(DataError::CircuitBreakerTripped);
            }

            if status == reqwest::StatusCode::NOT_FOUND {
                // Yahoo answers unknown symbols with 404 + a chart error body.
                return Err(DataError::UnknownTicker {
                    ticker: ticker.to_string(),
                });
            }

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                self.circuit_breaker.record_failure();
                let retry_after = resp
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(60);
                last_error = Some(DataError::RateLimited {
                    retry_after_secs: retry_after,
                });
                continue;
            }

            if !status.is_success() {
                self.circuit_breaker.record_failure();
                last_error = Some(DataError::Transient(format!("HTTP {status} for {ticker}")));
                continue;
            }

            let body = resp.text().map_err(|e| DataError::Transient(e.to_string()))?;
            let bars = parse_chart_response(ticker, &body)?;
            self.circuit_breaker.record_success();
            return Ok(bars);
        }

        Err(last_error.unwrap_or_else(|| DataError::Transient("max retries exceeded".into())))
    }
}

/// Parse a chart API body into raw rows.
///
/// OHLC is scaled by `adjclose / close` when an adjusted close is present,
/// so every price is split- and dividend-adjusted. Rows where every field
/// is null (holidays) are skipped; partially null rows are kept as NaN and
/// dropped by ingest.
pub(crate) fn parse_chart_response(ticker: &str, body: &str) -> Result<Vec<RawBar>, DataError> {
    let resp: ChartResponse = serde_json::from_str(body).map_err(|e| {
        DataError::ResponseFormatChanged(format!("failed to parse response for {ticker}: {e}"))
    })?;

    let result = match (resp.chart.result, resp.chart.error) {
        (Some(result), _) => result,
        (None, Some(err)) if err.code == "Not Found" => {
            return Err(DataError::UnknownTicker {
                ticker: ticker.to_string(),
            })
        }
        (None, Some(err)) => {
            return Err(DataError::ResponseFormatChanged(format!(
                "{}: {}",
                err.code, err.description
            )))
        }
        (None, None) => {
            return Err(DataError::ResponseFormatChanged(
                "empty result with no error".into(),
            ))
        }
    };

    let data = result
        .into_iter()
        .next()
        .ok_or_else(|| DataError::ResponseFormatChanged("result array is empty".into()))?;

    // A valid symbol with nothing in the window has no timestamp array.
    let Some(timestamps) = data.timestamp else {
        return Ok(Vec::new());
    };

    let quote = data
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| DataError::ResponseFormatChanged("no quote data".into()))?;

    let adj_closes = data
        .indicators
        .adjclose
        .and_then(|v| v.into_iter().next())
        .map(|a| a.adjclose);

    let mut bars = Vec::with_capacity(timestamps.len());

    for (i, &ts) in timestamps.iter().enumerate() {
        let date = chrono::DateTime::from_timestamp(ts, 0)
            .map(|dt| dt.naive_utc().date())
            .ok_or_else(|| DataError::ResponseFormatChanged(format!("invalid timestamp: {ts}")))?;

        let open = quote.open.get(i).copied().flatten();
        let high = quote.high.get(i).copied().flatten();
        let low = quote.low.get(i).copied().flatten();
        let close = quote.close.get(i).copied().flatten();
        let volume = quote.volume.get(i).copied().flatten();

        if open.is_none() && high.is_none() && low.is_none() && close.is_none() {
            continue;
        }

        let ratio = match (close, adj_closes.as_ref().and_then(|v| v.get(i).copied().flatten())) {
            (Some(c), Some(adj)) if c > 0.0 && adj.is_finite() => adj / c,
            _ => 1.0,
        };
        let adjust = |p: Option<f64>| p.map(|p| p * ratio).unwrap_or(f64::NAN);

        bars.push(RawBar {
            date,
            open: adjust(open),
            high: adjust(high),
            low: adjust(low),
            close: adjust(close),
            volume,
        });
    }

    Ok(bars)
}

impl DataProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn fetch(
        &self,
        ticker: &str,
        period: Period,
        interval: Interval,
    ) -> Result<BarSeries, DataError> {
        let raw = self.fetch_with_retry(ticker, period, interval)?;
        let report = ingest(ticker, raw)?;
        if report.dropped_rows > 0 {
            warn!(ticker, dropped = report.dropped_rows, "dropped incomplete bars");
        }
        if report.series.is_empty() {
            return Err(DataError::NoData {
                ticker: ticker.to_string(),
            });
        }
        Ok(report.series)
    }

    fn is_available(&self) -> bool {
        self.circuit_breaker.is_allowed()
    }
}
