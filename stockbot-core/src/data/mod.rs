//! Bar sources: the provider contract, ingest/validation, and concrete providers.

pub mod circuit_breaker;
pub mod csv_provider;
pub mod ingest;
pub mod memory;
pub mod provider;
pub mod synthetic;
pub mod yahoo;

pub use circuit_breaker::CircuitBreaker;
pub use csv_provider::CsvProvider;
pub use ingest::{ingest, IngestReport};
pub use memory::InMemoryProvider;
pub use provider::{DataError, DataProvider, Interval, Period, RawBar};
pub use synthetic::SyntheticProvider;
pub use yahoo::{YahooOptions, YahooProvider};
