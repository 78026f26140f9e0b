/**
* filename : utils
* author : HAMA
* date: 2025. 5. 11.
* description:
**/

/// 단일 구간 True Range
pub fn true_range(high: f64, low: f64, prev_close: f64) -> f64 {
  let high_low = high - low;
  let high_prev_close = (high - prev_close).abs();
  let low_prev_close = (low - prev_close).abs();
  high_low.max(high_prev_close.max(low_prev_close))
}

// Wilder 누적 스무딩. 인덱스 0 은 이전 값이 없는 자리이므로 제외하고
// values[1..=period] 의 합을 result[period] 에 시드로 둔다.
pub fn wilder_smooth(values: &[f64], period: usize) -> Option<Vec<f64>> {
  let n = values.len();
  if period == 0 || n <= period {
    return None;
  }

  let mut result = vec![0.0; n];
  result[period] = values[1..=period].iter().sum();

  let p = period as f64;
  for i in (period + 1)..n {
    result[i] = result[i - 1] - (result[i - 1] / p) + values[i];
  }

  Some(result)
}

/// 슬라이스 구간의 최고가/최저가
pub fn highest_lowest(highs: &[f64], lows: &[f64]) -> (f64, f64) {
  let mut highest = highs[0];
  let mut lowest = lows[0];
  for (&h, &l) in highs.iter().zip(lows.iter()).skip(1) {
    if h > highest {
      highest = h;
    }
    if l < lowest {
      lowest = l;
    }
  }
  (highest, lowest)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_true_range_uses_gap() {
    assert_eq!(true_range(12.0, 10.0, 11.0), 2.0);
    // 갭 상승
    assert_eq!(true_range(15.0, 14.0, 10.0), 5.0);
    // 갭 하락
    assert_eq!(true_range(8.0, 7.0, 10.0), 3.0);
  }

  #[test]
  fn test_wilder_smooth_seed_skips_first() {
    let values = vec![100.0, 1.0, 2.0, 3.0, 4.0];
    let smoothed = wilder_smooth(&values, 2).unwrap();
    assert_eq!(smoothed[0], 0.0);
    assert_eq!(smoothed[1], 0.0);
    assert_eq!(smoothed[2], 3.0);
    assert_eq!(smoothed[3], 3.0 - 1.5 + 3.0);
    assert!(wilder_smooth(&values, 5).is_none());
  }
}
