pub mod cache;
pub mod repository;

pub use cache::{cache_key, InMemoryCache, ResultCache};
pub use repository::{InMemoryResultStore, JsonLinesStore, NoopResultStore, ResultStore};
