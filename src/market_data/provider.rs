use std::collections::HashMap;
use async_trait::async_trait;

use crate::error::TechnicalError;
use crate::models::market_data::Candle;

/// 심볼별 과거 캔들 제공자 인터페이스.
/// 반환되는 캔들은 타임스탬프 오름차순이어야 한다.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketHistoryProvider: Send + Sync {
    /// 최근 `lookback` 개 이하의 캔들 조회
    async fn get_history(&self, symbol: &str, lookback: usize) -> Result<Vec<Candle>, TechnicalError>;
}

/// 마지막 `lookback` 개만 남긴다
pub(crate) fn tail(mut candles: Vec<Candle>, lookback: usize) -> Vec<Candle> {
    if candles.len() > lookback {
        candles.drain(..candles.len() - lookback);
    }
    candles
}

/// 메모리에 보관된 심볼별 캔들을 제공한다
#[derive(Debug, Clone, Default)]
pub struct StaticHistoryProvider {
    history: HashMap<String, Vec<Candle>>,
}

impl StaticHistoryProvider {
    pub fn new() -> Self {
        StaticHistoryProvider {
            history: HashMap::new(),
        }
    }

    /// 심볼 데이터 등록. 타임스탬프 순으로 정렬해 보관한다.
    pub fn insert(&mut self, symbol: impl Into<String>, mut candles: Vec<Candle>) {
        candles.sort_by_key(|c| c.timestamp);
        self.history.insert(symbol.into(), candles);
    }

    pub fn with_symbol(mut self, symbol: impl Into<String>, candles: Vec<Candle>) -> Self {
        self.insert(symbol, candles);
        self
    }

    pub fn symbols(&self) -> Vec<String> {
        self.history.keys().cloned().collect()
    }
}

#[async_trait]
impl MarketHistoryProvider for StaticHistoryProvider {
    async fn get_history(&self, symbol: &str, lookback: usize) -> Result<Vec<Candle>, TechnicalError> {
        let candles = self.history.get(symbol).cloned().unwrap_or_default();
        Ok(tail(candles, lookback))
    }
}
