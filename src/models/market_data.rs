use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 하나의 시간 구간에 대한 OHLCV 캔들
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    #[serde(alias = "date")]
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl Candle {
    pub fn new(
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: u64,
    ) -> Self {
        Candle {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// high >= max(open, close) 그리고 low <= min(open, close)
    pub fn is_consistent(&self) -> bool {
        self.high >= self.open.max(self.close) && self.low <= self.open.min(self.close)
    }
}

/// 지표 계산용 가격 배열. 분석 하나의 모든 계산 작업이 읽기 전용으로 공유한다.
#[derive(Debug, Clone, Default)]
pub struct PriceSeries {
    pub highs: Vec<f64>,
    pub lows: Vec<f64>,
    pub closes: Vec<f64>,
    pub volumes: Vec<u64>,
}

impl PriceSeries {
    pub fn from_candles(candles: &[Candle]) -> Self {
        let mut series = PriceSeries {
            highs: Vec::with_capacity(candles.len()),
            lows: Vec::with_capacity(candles.len()),
            closes: Vec::with_capacity(candles.len()),
            volumes: Vec::with_capacity(candles.len()),
        };

        for candle in candles {
            series.highs.push(candle.high);
            series.lows.push(candle.low);
            series.closes.push(candle.close);
            series.volumes.push(candle.volume);
        }

        series
    }

    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }
}
