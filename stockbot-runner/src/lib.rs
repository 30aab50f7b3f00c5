//! Stockbot Runner: configuration, batch analysis, portfolio runs,
//! service boundary, reports.
//!
//! This crate builds on `stockbot-core` to provide:
//! - TOML configuration with named presets
//! - Provider selection and guarded per-ticker loading
//! - Batch analysis on a bounded worker pool with cooperative cancellation
//! - Ledger loading and portfolio valuation
//! - Request → status + JSON service functions
//! - Market summary text and JSON export

pub mod analysis;
pub mod api;
pub mod config;
pub mod data_loader;
pub mod ledger;
pub mod logging;
pub mod portfolio;
pub mod reporting;
pub mod ticker;

pub use analysis::{analyze_batch, analyze_ticker, BatchOptions, BatchReport};
pub use api::{ApiResponse, Service};
pub use config::{ConfigError, Preset, ProviderKind, StockbotConfig};
pub use data_loader::{build_provider, load_series, LoadError};
pub use ledger::{load_ledger, parse_ledger, Ledger, LedgerError};
pub use portfolio::{run_portfolio, PortfolioReport, PortfolioTotals, PositionReport, PositionStatus};
pub use reporting::{export_json, render_portfolio, MarketSummary};
pub use ticker::{default_universe, normalize_ticker, parse_ticker_list, TickerError};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn report_types_are_send_sync() {
        assert_send::<BatchReport>();
        assert_sync::<BatchReport>();
        assert_send::<PortfolioReport>();
        assert_sync::<PortfolioReport>();
    }

    #[test]
    fn config_types_are_send_sync() {
        assert_send::<StockbotConfig>();
        assert_sync::<StockbotConfig>();
        assert_send::<BatchOptions<'static>>();
        assert_sync::<BatchOptions<'static>>();
    }

    #[test]
    fn service_is_send_sync() {
        assert_send::<Service>();
        assert_sync::<Service>();
    }
}
