//! Text reports and JSON export.

pub mod export;
pub mod portfolio;
pub mod summary;

pub use export::export_json;
pub use portfolio::render_portfolio;
pub use summary::MarketSummary;
