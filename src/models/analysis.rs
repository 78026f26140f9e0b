use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::indicators::{Adx, BollingerBands, Macd, Stochastic};
use crate::models::market_data::Candle;
use crate::signals::SignalType;

/// 최신 캔들 요약
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSnapshot {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    pub change_percent: f64,
}

impl PriceSnapshot {
    /// 마지막 두 캔들로 스냅샷 생성. 이전 종가가 0 이면 변동률은 0.
    pub fn from_latest(latest: &Candle, previous: &Candle) -> Self {
        let change_percent = if previous.close != 0.0 {
            (latest.close - previous.close) / previous.close * 100.0
        } else {
            0.0
        };

        PriceSnapshot {
            open: latest.open,
            high: latest.high,
            low: latest.low,
            close: latest.close,
            volume: latest.volume,
            change_percent,
        }
    }
}

/// 한 번의 분석에서 계산된 지표 값. 데이터가 부족한 지표는 None.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndicatorValues {
    pub rsi: Option<f64>,
    pub macd: Option<Macd>,
    pub bollinger: Option<BollingerBands>,
    pub stochastic: Option<Stochastic>,
    pub adx: Option<Adx>,
    pub sma_20: Option<f64>,
    pub sma_50: Option<f64>,
    pub ema_12: Option<f64>,
    pub ema_26: Option<f64>,
    pub atr: Option<f64>,
    pub vwap: Option<f64>,
}

/// 심볼 하나에 대한 기술적 분석 결과. 생성 후에는 변경하지 않는다.
/// 스칼라 지표가 계산되지 못한 경우 0.0 으로 기록된다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub symbol: String,
    pub timestamp: DateTime<Utc>,
    pub price: PriceSnapshot,
    pub rsi: f64,
    pub macd: Option<Macd>,
    pub bollinger: Option<BollingerBands>,
    pub stochastic: Option<Stochastic>,
    pub adx: Option<Adx>,
    pub sma_20: f64,
    pub sma_50: f64,
    pub ema_12: f64,
    pub ema_26: f64,
    pub atr: f64,
    pub vwap: f64,
    pub signal: SignalType,
    pub confidence: f64,
    pub score: f64,
    pub reasons: Vec<String>,
}

/// 저장소에 추가되는 평탄화된 분석 레코드
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: Uuid,
    pub symbol: String,
    pub timestamp: DateTime<Utc>,

    pub open_price: f64,
    pub high_price: f64,
    pub low_price: f64,
    pub close_price: f64,
    pub volume: u64,

    pub rsi_14: Option<f64>,
    pub macd_line: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_histogram: Option<f64>,
    pub bb_upper: Option<f64>,
    pub bb_middle: Option<f64>,
    pub bb_lower: Option<f64>,
    pub sma_20: Option<f64>,
    pub sma_50: Option<f64>,
    pub ema_12: Option<f64>,
    pub ema_26: Option<f64>,
    pub adx: Option<f64>,
    pub atr: Option<f64>,
    pub stoch_k: Option<f64>,
    pub stoch_d: Option<f64>,

    pub signal: SignalType,
    pub confidence: f64,
    pub score: f64,

    pub created_at: DateTime<Utc>,
}

impl AnalysisRecord {
    /// 결과와 원래 지표 값으로 레코드 생성. 계산되지 못한 지표는 None 으로 남는다.
    pub fn new(result: &AnalysisResult, indicators: &IndicatorValues) -> Self {
        AnalysisRecord {
            id: Uuid::new_v4(),
            symbol: result.symbol.clone(),
            timestamp: result.timestamp,
            open_price: result.price.open,
            high_price: result.price.high,
            low_price: result.price.low,
            close_price: result.price.close,
            volume: result.price.volume,
            rsi_14: indicators.rsi,
            macd_line: indicators.macd.map(|m| m.macd_line),
            macd_signal: indicators.macd.map(|m| m.signal_line),
            macd_histogram: indicators.macd.map(|m| m.histogram),
            bb_upper: indicators.bollinger.map(|b| b.upper),
            bb_middle: indicators.bollinger.map(|b| b.middle),
            bb_lower: indicators.bollinger.map(|b| b.lower),
            sma_20: indicators.sma_20,
            sma_50: indicators.sma_50,
            ema_12: indicators.ema_12,
            ema_26: indicators.ema_26,
            adx: indicators.adx.map(|a| a.adx),
            atr: indicators.atr,
            stoch_k: indicators.stochastic.map(|s| s.k),
            stoch_d: indicators.stochastic.map(|s| s.d),
            signal: result.signal,
            confidence: result.confidence,
            score: result.score,
            created_at: Utc::now(),
        }
    }
}
