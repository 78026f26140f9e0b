//! 로깅 유틸리티
//!
//! 로그 초기화 및 분석 파이프라인 공통 로그 함수 제공

use env_logger::Builder;
use log::LevelFilter;
use std::env;

use crate::error::TechnicalError;

fn parse_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        "off" => LevelFilter::Off,
        _ => LevelFilter::Info,
    }
}

/// 로깅 시스템 초기화. `RUST_LOG` 가 설정되어 있으면 설정 파일 값보다 우선한다.
pub fn init(default_level: &str) -> Result<(), TechnicalError> {
    let mut builder = Builder::from_default_env();

    let log_level = env::var("RUST_LOG").unwrap_or_else(|_| default_level.to_string());

    builder
        .filter_level(parse_level(&log_level))
        .format_timestamp_millis()
        .try_init()
        .map_err(|e| TechnicalError::ConfigError(format!("Logger already initialised: {}", e)))?;

    log::info!("로깅 시스템 초기화 완료: 레벨 = {}", log_level);

    Ok(())
}

/// 분석 시작 로그
pub fn log_analysis_start(symbol: &str, lookback: usize) {
    log::debug!("분석 시작: {} - 조회 캔들 수: {}", symbol, lookback);
}

/// 분석 완료 로그
pub fn log_analysis_complete(symbol: &str, signal: &str, score: f64, confidence: f64) {
    log::info!(
        "분석 완료: {} - 신호: {} - 점수: {:.1} - 신뢰도: {:.1}",
        symbol, signal, score, confidence
    );
}

/// 캐시 적중 로그
pub fn log_cache_hit(symbol: &str) {
    log::debug!("캐시 적중: {}", symbol);
}

/// 흡수된 오류 로그 (캐시/저장소 실패 등)
pub fn log_absorbed(context: &str, error: &TechnicalError) {
    log::warn!("오류 무시 - {}: {}", context, error);
}

/// 오류 로그
pub fn log_error(context: &str, error: &TechnicalError) {
    log::error!("오류 발생 - {}: {}", context, error);
}
