//! Data providers: the fetch seam and its offline implementations.

pub mod csv_provider;
pub mod provider;
pub mod synthetic;

pub use csv_provider::CsvProvider;
pub use provider::{FetchError, Interval, SeriesProvider};
pub use synthetic::SyntheticProvider;
