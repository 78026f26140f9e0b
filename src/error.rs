/**
* filename : error
* author : HAMA
* date: 2025. 5. 8.
* description:
**/

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TechnicalError {
    #[error("Insufficient data for {symbol}: {available} candles, {required} required")]
    InsufficientData {
        symbol: String,
        available: usize,
        required: usize,
    },

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Store error: {0}")]
    StoreError(String),

    #[error("Computation error: {0}")]
    ComputationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl TechnicalError {
    /// 호출자에게 그대로 전달되는 분석 실패인지 여부
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TechnicalError::InsufficientData { .. }
                | TechnicalError::UpstreamUnavailable(_)
                | TechnicalError::InvalidInput(_)
        )
    }
}
