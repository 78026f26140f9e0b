/**
* filename : moving_averages
* author : HAMA
* date: 2025. 5. 11.
* description:
**/

use super::IndicatorSeries;

/// 단순 이동평균. 슬라이딩 합계로 한 칸씩 갱신한다.
pub fn sma(prices: &[f64], period: usize) -> Option<IndicatorSeries> {
  if period == 0 || prices.len() < period {
    return None;
  }

  let mut result = vec![0.0; prices.len()];

  // 첫 SMA
  let mut sum: f64 = prices[..period].iter().sum();
  result[period - 1] = sum / period as f64;

  // 슬라이딩 윈도우
  for i in period..prices.len() {
    sum = sum - prices[i - period] + prices[i];
    result[i] = sum / period as f64;
  }

  Some(result)
}

/// 최근 `period` 개 값의 평균. 누적 오차 없이 마지막 윈도우를 직접 합산한다.
pub fn sma_latest(prices: &[f64], period: usize) -> Option<f64> {
  if period == 0 || prices.len() < period {
    return None;
  }

  let sum: f64 = prices[prices.len() - period..].iter().sum();
  Some(sum / period as f64)
}

/// 지수 이동평균. 첫 값은 처음 `period` 개의 SMA.
pub fn ema(prices: &[f64], period: usize) -> Option<IndicatorSeries> {
  if period == 0 || prices.len() < period {
    return None;
  }

  let mut result = vec![0.0; prices.len()];
  let multiplier = 2.0 / (period as f64 + 1.0);

  let sum: f64 = prices[..period].iter().sum();
  result[period - 1] = sum / period as f64;

  for i in period..prices.len() {
    result[i] = (prices[i] - result[i - 1]) * multiplier + result[i - 1];
  }

  Some(result)
}

pub fn ema_latest(prices: &[f64], period: usize) -> Option<f64> {
  ema(prices, period).and_then(|series| series.last().copied())
}
