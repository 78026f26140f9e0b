pub mod analysis;
pub mod market_data;

pub use analysis::{AnalysisRecord, AnalysisResult, IndicatorValues, PriceSnapshot};
pub use market_data::{Candle, PriceSeries};
