/**
* filename : analysis_manager
* author : HAMA
* date: 2025. 5. 12.
* description: 심볼 하나에 대한 분석 파이프라인 (캐시 → 시세 → 지표 → 채점 → 캐시/저장)
**/

use std::sync::Arc;
use std::time::Duration;
use chrono::Utc;
use tokio::task::{self, JoinHandle};
use tokio::time::timeout;

use crate::config::AnalysisConfig;
use crate::error::TechnicalError;
use crate::indicators::{
  adx, atr_latest, bollinger_bands, ema_latest, macd, rsi_latest, sma_latest, stochastic, vwap_latest,
};
use crate::market_data::MarketHistoryProvider;
use crate::models::analysis::{AnalysisRecord, AnalysisResult, IndicatorValues, PriceSnapshot};
use crate::models::market_data::PriceSeries;
use crate::persistence::{cache_key, ResultCache, ResultStore};
use crate::signals::{analyze_signals, SignalInputs};
use crate::utils::logging;

/// 분석 파라미터
#[derive(Debug, Clone)]
pub struct AnalysisSettings {
  pub lookback: usize,
  pub min_candles: usize,
  pub cache_ttl: Duration,
  /// 캐시/시세/저장소 호출 각각의 제한 시간
  pub upstream_timeout: Duration,
}

impl Default for AnalysisSettings {
  fn default() -> Self {
    AnalysisSettings::from(&AnalysisConfig::default())
  }
}

impl From<&AnalysisConfig> for AnalysisSettings {
  fn from(config: &AnalysisConfig) -> Self {
    AnalysisSettings {
      lookback: config.lookback,
      min_candles: config.min_candles,
      cache_ttl: config.cache_ttl(),
      upstream_timeout: config.upstream_timeout(),
    }
  }
}

/// 심볼 형식 검사: 영문 대문자 3자리
pub fn validate_symbol(symbol: &str) -> Result<(), TechnicalError> {
  if symbol.len() == 3 && symbol.bytes().all(|b| b.is_ascii_uppercase()) {
    Ok(())
  } else {
    Err(TechnicalError::InvalidInput(format!(
      "Invalid symbol '{}': expected three uppercase letters",
      symbol
    )))
  }
}

// 공유 시계열 위에서 블로킹 풀 작업 하나 실행
fn spawn_on<T, F>(series: &Arc<PriceSeries>, f: F) -> JoinHandle<T>
where
  T: Send + 'static,
  F: FnOnce(&PriceSeries) -> T + Send + 'static,
{
  let series = Arc::clone(series);
  task::spawn_blocking(move || f(&series))
}

/// 분석 관리자 - 시세 제공자, 캐시, 저장소를 묶어 단일 심볼 분석 수행
#[derive(Clone)]
pub struct AnalysisManager {
  provider: Arc<dyn MarketHistoryProvider>,
  cache: Arc<dyn ResultCache>,
  store: Arc<dyn ResultStore>,
  settings: AnalysisSettings,
}

impl AnalysisManager {
  pub fn new(
    provider: Arc<dyn MarketHistoryProvider>,
    cache: Arc<dyn ResultCache>,
    store: Arc<dyn ResultStore>,
    settings: AnalysisSettings,
  ) -> Self {
    AnalysisManager {
      provider,
      cache,
      store,
      settings,
    }
  }

  /// 심볼 분석. 캐시 적중 시 재계산 없이 바로 반환한다.
  pub async fn analyze(&self, symbol: &str) -> Result<AnalysisResult, TechnicalError> {
    validate_symbol(symbol)?;

    let key = cache_key(symbol);
    if let Some(cached) = self.cached_result(&key).await {
      logging::log_cache_hit(symbol);
      return Ok(cached);
    }

    logging::log_analysis_start(symbol, self.settings.lookback);

    let candles = match timeout(
      self.settings.upstream_timeout,
      self.provider.get_history(symbol, self.settings.lookback),
    )
    .await
    {
      Ok(Ok(candles)) => candles,
      Ok(Err(TechnicalError::UpstreamUnavailable(msg))) => return Err(TechnicalError::UpstreamUnavailable(msg)),
      Ok(Err(e)) => {
        return Err(TechnicalError::UpstreamUnavailable(format!("{}: {}", symbol, e)));
      }
      Err(_) => {
        return Err(TechnicalError::UpstreamUnavailable(format!(
          "{}: history request timed out after {:?}",
          symbol, self.settings.upstream_timeout
        )));
      }
    };

    let insufficient = || TechnicalError::InsufficientData {
      symbol: symbol.to_string(),
      available: candles.len(),
      required: self.settings.min_candles,
    };
    if candles.len() < self.settings.min_candles {
      return Err(insufficient());
    }
    let [.., previous, latest] = candles.as_slice() else {
      return Err(insufficient());
    };

    let series = Arc::new(PriceSeries::from_candles(&candles));
    let indicators = Self::compute_indicators(&series).await?;

    let price = PriceSnapshot::from_latest(latest, previous);
    let inputs = SignalInputs {
      price: price.close,
      rsi: indicators.rsi,
      macd: indicators.macd,
      bollinger: indicators.bollinger,
      stochastic: indicators.stochastic,
      adx: indicators.adx,
      sma_20: indicators.sma_20,
      sma_50: indicators.sma_50,
      current_volume: latest.volume as f64,
      // 기준 거래량은 직전 캔들 거래량
      avg_volume: previous.volume as f64,
    };
    let scored = analyze_signals(&inputs);

    let result = AnalysisResult {
      symbol: symbol.to_string(),
      timestamp: Utc::now(),
      price,
      rsi: indicators.rsi.unwrap_or(0.0),
      macd: indicators.macd,
      bollinger: indicators.bollinger,
      stochastic: indicators.stochastic,
      adx: indicators.adx,
      sma_20: indicators.sma_20.unwrap_or(0.0),
      sma_50: indicators.sma_50.unwrap_or(0.0),
      ema_12: indicators.ema_12.unwrap_or(0.0),
      ema_26: indicators.ema_26.unwrap_or(0.0),
      atr: indicators.atr.unwrap_or(0.0),
      vwap: indicators.vwap.unwrap_or(0.0),
      signal: scored.signal,
      confidence: scored.confidence,
      score: scored.score,
      reasons: scored.reasons,
    };

    self.write_cache(&key, &result).await;
    self.append_record(&result, &indicators).await;

    logging::log_analysis_complete(symbol, result.signal.as_str(), result.score, result.confidence);
    Ok(result)
  }

  // 조회 실패, 시간 초과, 역직렬화 실패는 모두 캐시 미스로 처리
  async fn cached_result(&self, key: &str) -> Option<AnalysisResult> {
    let bytes = match timeout(self.settings.upstream_timeout, self.cache.get(key)).await {
      Ok(Ok(Some(bytes))) => bytes,
      Ok(Ok(None)) => return None,
      Ok(Err(e)) => {
        logging::log_absorbed("cache read", &e);
        return None;
      }
      Err(_) => {
        logging::log_absorbed("cache read", &TechnicalError::CacheError(format!("{} timed out", key)));
        return None;
      }
    };

    match serde_json::from_slice(&bytes) {
      Ok(result) => Some(result),
      Err(e) => {
        logging::log_absorbed("cache decode", &TechnicalError::SerializationError(e));
        None
      }
    }
  }

  async fn write_cache(&self, key: &str, result: &AnalysisResult) {
    let bytes = match serde_json::to_vec(result) {
      Ok(bytes) => bytes,
      Err(e) => {
        logging::log_absorbed("cache encode", &TechnicalError::SerializationError(e));
        return;
      }
    };

    match timeout(
      self.settings.upstream_timeout,
      self.cache.set(key, bytes, self.settings.cache_ttl),
    )
    .await
    {
      Ok(Ok(())) => {}
      Ok(Err(e)) => logging::log_absorbed("cache write", &e),
      Err(_) => logging::log_absorbed("cache write", &TechnicalError::CacheError(format!("{} timed out", key))),
    }
  }

  async fn append_record(&self, result: &AnalysisResult, indicators: &IndicatorValues) {
    let record = AnalysisRecord::new(result, indicators);
    match timeout(self.settings.upstream_timeout, self.store.append(&record)).await {
      Ok(Ok(())) => {}
      Ok(Err(e)) => logging::log_absorbed("store append", &e),
      Err(_) => logging::log_absorbed(
        "store append",
        &TechnicalError::StoreError(format!("{} timed out", result.symbol)),
      ),
    }
  }

  /// 8개 지표를 블로킹 풀에서 동시에 계산하고 모두 끝날 때까지 기다린다
  async fn compute_indicators(series: &Arc<PriceSeries>) -> Result<IndicatorValues, TechnicalError> {
    let rsi_task = spawn_on(series, |s| rsi_latest(&s.closes, 14));
    let macd_task = spawn_on(series, |s| macd(&s.closes, 12, 26, 9));
    let bollinger_task = spawn_on(series, |s| bollinger_bands(&s.closes, 20, 2.0));
    let stochastic_task = spawn_on(series, |s| stochastic(&s.highs, &s.lows, &s.closes, 14, 3));
    let adx_task = spawn_on(series, |s| adx(&s.highs, &s.lows, &s.closes, 14));
    let sma_task = spawn_on(series, |s| (sma_latest(&s.closes, 20), sma_latest(&s.closes, 50)));
    let ema_task = spawn_on(series, |s| (ema_latest(&s.closes, 12), ema_latest(&s.closes, 26)));
    let volatility_task = spawn_on(series, |s| {
      (
        atr_latest(&s.highs, &s.lows, &s.closes, 14),
        vwap_latest(&s.highs, &s.lows, &s.closes, &s.volumes),
      )
    });

    let (rsi, macd, bollinger, stochastic, adx, (sma_20, sma_50), (ema_12, ema_26), (atr, vwap)) = tokio::try_join!(
      rsi_task,
      macd_task,
      bollinger_task,
      stochastic_task,
      adx_task,
      sma_task,
      ema_task,
      volatility_task,
    )
    .map_err(|e| TechnicalError::ComputationError(format!("indicator task failed: {}", e)))?;

    Ok(IndicatorValues {
      rsi,
      macd,
      bollinger,
      stochastic,
      adx,
      sma_20,
      sma_50,
      ema_12,
      ema_26,
      atr,
      vwap,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::{Duration as ChronoDuration, TimeZone};
  use crate::market_data::provider::MockMarketHistoryProvider;
  use crate::models::market_data::Candle;
  use crate::persistence::cache::MockResultCache;
  use crate::persistence::repository::MockResultStore;
  use crate::signals::SignalType;

  fn candles(count: usize) -> Vec<Candle> {
    let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    (0..count)
      .map(|i| {
        let close = 100.0 + (i as f64 * 0.7).sin() * 5.0 + i as f64 * 0.3;
        Candle::new(
          start + ChronoDuration::days(i as i64),
          close - 0.5,
          close + 1.5,
          close - 1.5,
          close,
          10_000 + (i as u64 % 7) * 500,
        )
      })
      .collect()
  }

  fn manager(
    provider: MockMarketHistoryProvider,
    cache: MockResultCache,
    store: MockResultStore,
  ) -> AnalysisManager {
    AnalysisManager::new(Arc::new(provider), Arc::new(cache), Arc::new(store), AnalysisSettings::default())
  }

  #[test]
  fn test_validate_symbol() {
    assert!(validate_symbol("FPT").is_ok());
    assert!(validate_symbol("fpt").is_err());
    assert!(validate_symbol("FPTS").is_err());
    assert!(validate_symbol("F1T").is_err());
    assert!(validate_symbol("").is_err());
  }

  #[tokio::test]
  async fn test_invalid_symbol_does_no_work() {
    let mut provider = MockMarketHistoryProvider::new();
    provider.expect_get_history().never();
    let mut cache = MockResultCache::new();
    cache.expect_get().never();
    let store = MockResultStore::new();

    let result = manager(provider, cache, store).analyze("vnm").await;
    assert!(matches!(result, Err(TechnicalError::InvalidInput(_))));
  }

  #[tokio::test]
  async fn test_cache_miss_computes_and_writes_through() {
    let data = candles(100);
    let mut provider = MockMarketHistoryProvider::new();
    provider
      .expect_get_history()
      .times(1)
      .returning(move |_, _| Ok(data.clone()));

    let mut cache = MockResultCache::new();
    cache.expect_get().times(1).returning(|_| Ok(None));
    cache
      .expect_set()
      .withf(|key, _, ttl| key.to_string() == "technical:FPT:latest" && *ttl == Duration::from_secs(300))
      .times(1)
      .returning(|_, _, _| Ok(()));

    let mut store = MockResultStore::new();
    store.expect_append().times(1).returning(|_| Ok(()));

    let result = manager(provider, cache, store).analyze("FPT").await.unwrap();
    assert_eq!(result.symbol, "FPT");
    assert!(result.macd.is_some());
    assert!(result.adx.is_some());
    assert!(result.sma_50 > 0.0);
    assert!(result.rsi > 0.0 && result.rsi <= 100.0);
    assert!((0.0..=100.0).contains(&result.confidence));
  }

  #[tokio::test]
  async fn test_cache_hit_skips_provider_and_store() {
    let mut seed_provider = MockMarketHistoryProvider::new();
    let data = candles(60);
    seed_provider.expect_get_history().returning(move |_, _| Ok(data.clone()));
    let mut seed_cache = MockResultCache::new();
    seed_cache.expect_get().returning(|_| Ok(None));
    seed_cache.expect_set().returning(|_, _, _| Ok(()));
    let mut seed_store = MockResultStore::new();
    seed_store.expect_append().returning(|_| Ok(()));
    let expected = manager(seed_provider, seed_cache, seed_store).analyze("VNM").await.unwrap();

    let bytes = serde_json::to_vec(&expected).unwrap();
    let mut provider = MockMarketHistoryProvider::new();
    provider.expect_get_history().never();
    let mut cache = MockResultCache::new();
    cache.expect_get().times(1).returning(move |_| Ok(Some(bytes.clone())));
    cache.expect_set().never();
    let mut store = MockResultStore::new();
    store.expect_append().never();

    let cached = manager(provider, cache, store).analyze("VNM").await.unwrap();
    assert_eq!(cached, expected);
  }

  #[tokio::test]
  async fn test_undecodable_cache_is_miss() {
    let data = candles(40);
    let mut provider = MockMarketHistoryProvider::new();
    provider.expect_get_history().times(1).returning(move |_, _| Ok(data.clone()));
    let mut cache = MockResultCache::new();
    cache.expect_get().returning(|_| Ok(Some(b"not json".to_vec())));
    cache.expect_set().returning(|_, _, _| Ok(()));
    let mut store = MockResultStore::new();
    store.expect_append().returning(|_| Ok(()));

    let result = manager(provider, cache, store).analyze("HPG").await.unwrap();
    // 26..49 개 캔들에서는 SMA50 을 계산할 수 없다
    assert_eq!(result.sma_50, 0.0);
    assert!(result.sma_20 > 0.0);
  }

  #[tokio::test]
  async fn test_record_leaves_uncomputed_indicators_null() {
    let data = candles(30);
    let mut provider = MockMarketHistoryProvider::new();
    provider.expect_get_history().returning(move |_, _| Ok(data.clone()));
    let mut cache = MockResultCache::new();
    cache.expect_get().returning(|_| Ok(None));
    cache.expect_set().returning(|_, _, _| Ok(()));
    let mut store = MockResultStore::new();
    store
      .expect_append()
      .withf(|record| {
        record.sma_50.is_none()
          && record.macd_line.is_none()
          && record.sma_20.is_some()
          && record.ema_26.is_some()
          && record.rsi_14.is_some()
          && record.atr.is_some()
      })
      .times(1)
      .returning(|_| Ok(()));

    let result = manager(provider, cache, store).analyze("MSN").await.unwrap();
    // 결과는 0.0 으로 평탄화되지만 레코드는 null 을 유지한다
    assert_eq!(result.sma_50, 0.0);
  }

  #[tokio::test]
  async fn test_cache_and_store_failures_are_absorbed() {
    let data = candles(80);
    let mut provider = MockMarketHistoryProvider::new();
    provider.expect_get_history().returning(move |_, _| Ok(data.clone()));
    let mut cache = MockResultCache::new();
    cache
      .expect_get()
      .returning(|_| Err(TechnicalError::CacheError("connection refused".to_string())));
    cache
      .expect_set()
      .returning(|_, _, _| Err(TechnicalError::CacheError("connection refused".to_string())));
    let mut store = MockResultStore::new();
    store
      .expect_append()
      .returning(|_| Err(TechnicalError::StoreError("disk full".to_string())));

    let result = manager(provider, cache, store).analyze("VCB").await;
    assert!(result.is_ok());
  }

  #[tokio::test]
  async fn test_insufficient_data() {
    let data = candles(25);
    let mut provider = MockMarketHistoryProvider::new();
    provider.expect_get_history().returning(move |_, _| Ok(data.clone()));
    let mut cache = MockResultCache::new();
    cache.expect_get().returning(|_| Ok(None));
    cache.expect_set().never();
    let mut store = MockResultStore::new();
    store.expect_append().never();

    match manager(provider, cache, store).analyze("SSI").await {
      Err(TechnicalError::InsufficientData { available, required, .. }) => {
        assert_eq!(available, 25);
        assert_eq!(required, 26);
      }
      other => panic!("unexpected result: {:?}", other),
    }
  }

  #[tokio::test]
  async fn test_provider_failure_is_upstream_unavailable() {
    let mut provider = MockMarketHistoryProvider::new();
    provider
      .expect_get_history()
      .returning(|_, _| Err(TechnicalError::InvalidInput("bad row".to_string())));
    let mut cache = MockResultCache::new();
    cache.expect_get().returning(|_| Ok(None));
    let store = MockResultStore::new();

    let result = manager(provider, cache, store).analyze("MWG").await;
    assert!(matches!(result, Err(TechnicalError::UpstreamUnavailable(_))));
  }

  #[tokio::test]
  async fn test_flat_series_holds() {
    let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let data: Vec<Candle> = (0..30)
      .map(|i| Candle::new(start + ChronoDuration::days(i), 50.0, 50.0, 50.0, 50.0, 1_000))
      .collect();
    let mut provider = MockMarketHistoryProvider::new();
    provider.expect_get_history().returning(move |_, _| Ok(data.clone()));
    let mut cache = MockResultCache::new();
    cache.expect_get().returning(|_| Ok(None));
    cache.expect_set().returning(|_, _, _| Ok(()));
    let mut store = MockResultStore::new();
    store.expect_append().returning(|_| Ok(()));

    let result = manager(provider, cache, store).analyze("ACB").await.unwrap();
    assert_eq!(result.price.change_percent, 0.0);
    assert_eq!(result.bollinger.map(|b| b.width), Some(0.0));
    assert_eq!(result.stochastic.map(|s| s.k), Some(50.0));
    // RSI 100 (-2), 가격 = SMA20 (-1), MACD 는 35개 미만이라 제외
    assert!(result.macd.is_none());
    assert_eq!(result.rsi, 100.0);
    assert_eq!(result.score, -3.0);
    assert_eq!(result.signal, SignalType::Sell);
  }
}
