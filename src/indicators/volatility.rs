/**
* filename : volatility
* author : HAMA
* date: 2025. 5. 12.
* description: 볼린저 밴드, ATR
**/

use serde::{Deserialize, Serialize};

use super::moving_averages::sma;
use super::utils::true_range;
use super::IndicatorSeries;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BollingerBands {
  pub upper: f64,
  pub middle: f64,
  pub lower: f64,
  pub width: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BollingerSeries {
  pub upper: IndicatorSeries,
  pub middle: IndicatorSeries,
  pub lower: IndicatorSeries,
  pub width: IndicatorSeries,
}

// 모집단 표준편차 (N 으로 나눔)
fn population_std_dev(window: &[f64], mean: f64) -> f64 {
  let sum: f64 = window
    .iter()
    .map(|price| {
      let diff = price - mean;
      diff * diff
    })
    .sum();
  (sum / window.len() as f64).sqrt()
}

fn bands(window: &[f64], middle: f64, multiplier: f64) -> BollingerBands {
  let std_dev = population_std_dev(window, middle);
  let upper = middle + multiplier * std_dev;
  let lower = middle - multiplier * std_dev;
  let width = if middle != 0.0 { (upper - lower) / middle } else { 0.0 };

  BollingerBands {
    upper,
    middle,
    lower,
    width,
  }
}

pub fn bollinger_series(closes: &[f64], period: usize, multiplier: f64) -> Option<BollingerSeries> {
  let middle = sma(closes, period)?;

  let n = closes.len();
  let mut upper = vec![0.0; n];
  let mut lower = vec![0.0; n];
  let mut width = vec![0.0; n];

  for i in (period - 1)..n {
    let b = bands(&closes[i + 1 - period..=i], middle[i], multiplier);
    upper[i] = b.upper;
    lower[i] = b.lower;
    width[i] = b.width;
  }

  Some(BollingerSeries {
    upper,
    middle,
    lower,
    width,
  })
}

pub fn bollinger_bands(closes: &[f64], period: usize, multiplier: f64) -> Option<BollingerBands> {
  let middle = *sma(closes, period)?.last()?;
  Some(bands(&closes[closes.len() - period..], middle, multiplier))
}

/// Wilder 방식 ATR. 첫 TR 은 high - low.
pub fn atr(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> Option<IndicatorSeries> {
  let n = closes.len();
  if period == 0 || n < period + 1 || highs.len() != n || lows.len() != n {
    return None;
  }

  let mut tr = vec![0.0; n];
  tr[0] = highs[0] - lows[0];
  for i in 1..n {
    tr[i] = true_range(highs[i], lows[i], closes[i - 1]);
  }

  let p = period as f64;
  let mut result = vec![0.0; n];
  result[period - 1] = tr[..period].iter().sum::<f64>() / p;

  for i in period..n {
    result[i] = (result[i - 1] * (p - 1.0) + tr[i]) / p;
  }

  Some(result)
}

pub fn atr_latest(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> Option<f64> {
  atr(highs, lows, closes, period).and_then(|series| series.last().copied())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_bollinger_ordering() {
    let prices = vec![
      20.0, 21.0, 22.0, 21.0, 20.0, 19.0, 20.0, 21.0, 22.0, 23.0, 22.0, 21.0, 20.0, 21.0, 22.0, 21.0, 20.0, 19.0,
      20.0, 21.0,
    ];
    let bb = bollinger_bands(&prices, 20, 2.0).unwrap();
    assert!(bb.upper > bb.middle && bb.middle > bb.lower);
    assert!(bb.width > 0.0);
  }

  #[test]
  fn test_bollinger_zero_middle_width() {
    let prices = vec![-1.0, 1.0, -1.0, 1.0];
    let bb = bollinger_bands(&prices, 4, 2.0).unwrap();
    assert_eq!(bb.middle, 0.0);
    assert_eq!(bb.width, 0.0);
    assert!(bb.upper.is_finite());

    let series = bollinger_series(&prices, 4, 2.0).unwrap();
    assert_eq!(series.width[3], 0.0);
  }

  #[test]
  fn test_bollinger_constant_has_no_spread() {
    let prices = vec![100.0; 25];
    let bb = bollinger_bands(&prices, 20, 2.0).unwrap();
    assert_eq!(bb.upper, 100.0);
    assert_eq!(bb.lower, 100.0);
    assert_eq!(bb.width, 0.0);
  }

  #[test]
  fn test_atr_positive() {
    let highs = vec![22.0, 23.0, 24.0, 25.0, 26.0, 27.0, 28.0, 27.0, 26.0, 25.0, 24.0, 23.0, 22.0, 23.0, 24.0];
    let lows: Vec<f64> = highs.iter().map(|h| h - 2.0).collect();
    let closes: Vec<f64> = highs.iter().map(|h| h - 1.0).collect();

    let series = atr(&highs, &lows, &closes, 14).unwrap();
    assert_eq!(series.len(), 15);
    assert!(series[14] > 0.0);
    assert!(atr(&highs[..14], &lows[..14], &closes[..14], 14).is_none());
  }

  #[test]
  fn test_atr_wilder_steps() {
    // TR = [1.0, 1.5, 1.5, 1.5]
    let highs = vec![11.0, 12.0, 12.5, 13.0];
    let lows = vec![10.0, 10.5, 11.0, 11.5];
    let closes = vec![10.5, 11.0, 12.0, 12.5];

    let series = atr(&highs, &lows, &closes, 2).unwrap();
    assert_eq!(series, vec![0.0, 1.25, 1.375, 1.4375]);
    assert_eq!(atr_latest(&highs, &lows, &closes, 2), Some(1.4375));
  }
}
