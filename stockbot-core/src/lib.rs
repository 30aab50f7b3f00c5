//! Stockbot Core: bars, RSI, candlestick classifiers, signal combiner,
//! multi-ticker normalisation, portfolio valuation, and data providers.
//!
//! The engine is a stateless batch transform: a [`domain::BarSeries`] goes in,
//! a [`signal::Signal`] comes out. Providers and orchestration sit on top.

pub mod candlestick;
pub mod data;
pub mod domain;
pub mod engine;
pub mod error;
pub mod indicators;
pub mod normalize;
pub mod signal;
pub mod valuation;

pub use engine::{EngineConfig, SignalEngine};
pub use error::AnalysisError;
pub use signal::{Signal, SignalKind};
