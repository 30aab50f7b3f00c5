//! Domain types for stockbot

pub mod bar;
pub mod position;
pub mod series;

pub use bar::{Bar, BarError};
pub use position::Position;
pub use series::BarSeries;

/// Ticker symbol alias
pub type Ticker = String;
