/**
* filename : oscillators
* author : HAMA
* date: 2025. 5. 11.
* description:
**/

use serde::{Deserialize, Serialize};

use super::moving_averages::sma;
use super::utils::highest_lowest;
use super::IndicatorSeries;

/// 스토캐스틱 최신 값
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stochastic {
  pub k: f64,
  pub d: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StochasticSeries {
  pub k: IndicatorSeries,
  pub d: IndicatorSeries,
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
  if avg_loss == 0.0 {
    100.0
  } else {
    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
  }
}

/// Wilder 방식 RSI. 첫 값은 인덱스 `period` 에 위치한다.
pub fn rsi(closes: &[f64], period: usize) -> Option<IndicatorSeries> {
  if period == 0 || closes.len() < period + 1 {
    return None;
  }

  let mut result = vec![0.0; closes.len()];
  let p = period as f64;

  // 초기 평균 상승/하락폭
  let mut gains = 0.0;
  let mut losses = 0.0;
  for i in 1..=period {
    let change = closes[i] - closes[i - 1];
    if change > 0.0 {
      gains += change;
    } else {
      losses -= change;
    }
  }

  let mut avg_gain = gains / p;
  let mut avg_loss = losses / p;
  result[period] = rsi_value(avg_gain, avg_loss);

  // Wilder 스무딩
  for i in (period + 1)..closes.len() {
    let change = closes[i] - closes[i - 1];
    let (gain, loss) = if change > 0.0 { (change, 0.0) } else { (0.0, -change) };

    avg_gain = (avg_gain * (p - 1.0) + gain) / p;
    avg_loss = (avg_loss * (p - 1.0) + loss) / p;

    result[i] = rsi_value(avg_gain, avg_loss);
  }

  Some(result)
}

pub fn rsi_latest(closes: &[f64], period: usize) -> Option<f64> {
  rsi(closes, period).and_then(|series| series.last().copied())
}

// %K 원시값. 가격 범위가 0 이면 중립값 50.
fn raw_k(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> Option<IndicatorSeries> {
  let n = closes.len();
  if period == 0 || n < period || highs.len() != n || lows.len() != n {
    return None;
  }

  let mut k_values = vec![0.0; n];
  for i in (period - 1)..n {
    let start = i + 1 - period;
    let (highest, lowest) = highest_lowest(&highs[start..=i], &lows[start..=i]);

    let range = highest - lowest;
    k_values[i] = if range == 0.0 {
      50.0
    } else {
      (closes[i] - lowest) / range * 100.0
    };
  }

  Some(k_values)
}

/// %K 와 %D(= %K 의 SMA) 전체 시계열
pub fn stochastic_series(
  highs: &[f64],
  lows: &[f64],
  closes: &[f64],
  k_period: usize,
  d_period: usize,
) -> Option<StochasticSeries> {
  if k_period == 0 || d_period == 0 || closes.len() < k_period + d_period - 1 {
    return None;
  }

  let k = raw_k(highs, lows, closes, k_period)?;
  let d = sma(&k, d_period)?;

  Some(StochasticSeries { k, d })
}

pub fn stochastic(
  highs: &[f64],
  lows: &[f64],
  closes: &[f64],
  k_period: usize,
  d_period: usize,
) -> Option<Stochastic> {
  let series = stochastic_series(highs, lows, closes, k_period, d_period)?;
  Some(Stochastic {
    k: *series.k.last()?,
    d: *series.d.last()?,
  })
}
