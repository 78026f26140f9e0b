use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use crate::error::TechnicalError;
use crate::market_data::provider::MarketHistoryProvider;
use crate::models::market_data::Candle;

/// 결정적인 일봉 시계열을 생성하는 개발용 제공자.
/// 실제 시세 API 없이 전체 파이프라인을 돌려볼 때 사용한다.
#[derive(Debug, Clone)]
pub struct SyntheticHistoryProvider {
    base_price: f64,
    end: Option<DateTime<Utc>>,
}

impl SyntheticHistoryProvider {
    pub fn new() -> Self {
        SyntheticHistoryProvider {
            base_price: 50_000.0,
            end: None,
        }
    }

    /// 마지막 캔들의 시각 고정 (기본값은 호출 시각)
    pub fn ending_at(mut self, end: DateTime<Utc>) -> Self {
        self.end = Some(end);
        self
    }

    pub fn generate(&self, days: usize) -> Vec<Candle> {
        let end = self.end.unwrap_or_else(Utc::now);
        let mut base_price = self.base_price;
        let mut data = Vec::with_capacity(days);

        for i in 0..days {
            let timestamp = end - Duration::days((days - i - 1) as i64);

            // 10일 주기 등락 + 5일 주기 캔들 몸통
            let change = ((i % 10) as f64 - 5.0) * 100.0;
            let open = base_price + change;
            let close = open + ((i % 5) as f64 - 2.0) * 50.0;
            let wick = (i % 3) as f64 * 30.0;
            let high = open.max(close) + wick;
            let low = open.min(close) - wick;
            let volume = 1_000_000 + (i % 10) as u64 * 100_000;

            data.push(Candle::new(timestamp, open, high, low, close, volume));

            base_price = close;
        }

        data
    }
}

impl Default for SyntheticHistoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MarketHistoryProvider for SyntheticHistoryProvider {
    async fn get_history(&self, _symbol: &str, lookback: usize) -> Result<Vec<Candle>, TechnicalError> {
        Ok(self.generate(lookback))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_series_is_well_formed() {
        let data = SyntheticHistoryProvider::new().generate(100);
        assert_eq!(data.len(), 100);
        assert!(data.iter().all(Candle::is_consistent));
        assert!(data.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
        assert_eq!(data[0].open, 49_500.0);
        assert_eq!(data[0].close, 49_400.0);
        assert_eq!(data[0].volume, 1_000_000);
    }

    #[test]
    fn test_generation_is_deterministic() {
        let end = Utc::now();
        let provider = SyntheticHistoryProvider::new().ending_at(end);
        assert_eq!(provider.generate(50), provider.generate(50));
    }
}
