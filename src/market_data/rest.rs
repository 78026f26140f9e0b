use std::time::Duration;
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;

use crate::error::TechnicalError;
use crate::market_data::provider::{tail, MarketHistoryProvider};
use crate::models::market_data::Candle;

const USER_AGENT: &str = concat!("technical-agent/", env!("CARGO_PKG_VERSION"));

/// 시세 REST API 클라이언트 (`GET {base}/histdata/{symbol}?from=..&to=..`)
pub struct RestHistoryProvider {
    client: Client,
    base_url: String,
}

impl RestHistoryProvider {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, TechnicalError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| TechnicalError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // 일봉 기준이므로 lookback 일수만큼 거슬러 올라간 기간을 요청한다
    fn history_url(&self, symbol: &str, days: usize) -> String {
        let end = Utc::now();
        let start = end - chrono::Duration::days(days as i64);
        format!(
            "{}/histdata/{}?from={}&to={}",
            self.base_url,
            symbol,
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d")
        )
    }
}

#[async_trait]
impl MarketHistoryProvider for RestHistoryProvider {
    async fn get_history(&self, symbol: &str, lookback: usize) -> Result<Vec<Candle>, TechnicalError> {
        let url = self.history_url(symbol, lookback);
        log::debug!("시세 조회: {}", url);

        let response = self.client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| TechnicalError::UpstreamUnavailable(format!("Failed to fetch data: {}", e)))?;

        if !response.status().is_success() {
            return Err(TechnicalError::UpstreamUnavailable(format!(
                "API returned status {}",
                response.status()
            )));
        }

        let mut candles = response
            .json::<Vec<Candle>>()
            .await
            .map_err(|e| TechnicalError::UpstreamUnavailable(format!("Failed to decode response: {}", e)))?;

        candles.sort_by_key(|c| c.timestamp);
        Ok(tail(candles, lookback))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_url() {
        let provider = RestHistoryProvider::new("http://127.0.0.1:9000/finance/", Duration::from_secs(1)).unwrap();
        assert_eq!(provider.base_url(), "http://127.0.0.1:9000/finance");

        let url = provider.history_url("FPT", 100);
        assert!(url.starts_with("http://127.0.0.1:9000/finance/histdata/FPT?from="));
        assert!(url.contains("&to="));
    }

    #[tokio::test]
    async fn test_unreachable_upstream() {
        // 닫힌 포트로 요청하면 UpstreamUnavailable
        let provider = RestHistoryProvider::new("http://127.0.0.1:9", Duration::from_millis(500)).unwrap();
        let result = provider.get_history("FPT", 10).await;
        assert!(matches!(result, Err(TechnicalError::UpstreamUnavailable(_))));
    }
}
