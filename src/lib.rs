//! 기술적 분석 에이전트 라이브러리
//!
//! 가격 이력으로 지표를 계산하고 매매 신호를 채점하며, 단일/배치 분석을 제공합니다.

pub mod config;
pub mod core;
pub mod error;
pub mod http;
pub mod indicators;
pub mod market_data;
pub mod models;
pub mod persistence;
pub mod signals;
pub mod utils;

// 핵심 타입 재노출
pub use crate::error::TechnicalError;
pub use crate::core::{AnalysisManager, AnalysisSettings, BatchAnalyzer};
pub use crate::market_data::MarketHistoryProvider;
pub use crate::models::analysis::{AnalysisRecord, AnalysisResult, IndicatorValues, PriceSnapshot};
pub use crate::models::market_data::{Candle, PriceSeries};
pub use crate::persistence::{ResultCache, ResultStore};
pub use crate::signals::SignalType;

/// 버전 정보
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 결과 타입 별칭
pub type Result<T> = std::result::Result<T, TechnicalError>;
