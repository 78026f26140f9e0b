//! 분석 파이프라인의 핵심 구현체

pub mod analysis_manager;
pub mod batch_manager;

pub use analysis_manager::{validate_symbol, AnalysisManager, AnalysisSettings};
pub use batch_manager::BatchAnalyzer;
