pub mod csv_file;
pub mod provider;
pub mod rest;
pub mod synthetic;

pub use csv_file::CsvHistoryProvider;
pub use provider::{MarketHistoryProvider, StaticHistoryProvider};
pub use rest::RestHistoryProvider;
pub use synthetic::SyntheticHistoryProvider;
