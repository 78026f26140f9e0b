/**
* filename : volume
* author : HAMA
* date: 2025. 5. 11.
* description:
**/

use super::IndicatorSeries;

/// 누적 VWAP. 창 없이 입력된 시계열의 처음부터 누적한다.
pub fn vwap(highs: &[f64], lows: &[f64], closes: &[f64], volumes: &[u64]) -> Option<IndicatorSeries> {
  let n = closes.len();
  if n == 0 || highs.len() != n || lows.len() != n || volumes.len() != n {
    return None;
  }

  let mut result = vec![0.0; n];
  let mut cumulative_tpv = 0.0;
  let mut cumulative_volume = 0.0;

  for i in 0..n {
    let typical_price = (highs[i] + lows[i] + closes[i]) / 3.0;
    let volume = volumes[i] as f64;

    cumulative_tpv += typical_price * volume;
    cumulative_volume += volume;

    if cumulative_volume > 0.0 {
      result[i] = cumulative_tpv / cumulative_volume;
    }
  }

  Some(result)
}

pub fn vwap_latest(highs: &[f64], lows: &[f64], closes: &[f64], volumes: &[u64]) -> Option<f64> {
  vwap(highs, lows, closes, volumes).and_then(|series| series.last().copied())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_vwap_weighted_by_volume() {
    let highs = [11.0, 21.0];
    let lows = [9.0, 19.0];
    let closes = [10.0, 20.0];
    let volumes = [1, 3];

    let series = vwap(&highs, &lows, &closes, &volumes).unwrap();
    assert_eq!(series[0], 10.0);
    assert_eq!(series[1], (10.0 + 60.0) / 4.0);
  }

  #[test]
  fn test_vwap_zero_volume_prefix() {
    let series = vwap(&[2.0, 4.0], &[2.0, 4.0], &[2.0, 4.0], &[0, 5]).unwrap();
    assert_eq!(series, vec![0.0, 4.0]);
  }

  #[test]
  fn test_vwap_rejects_mismatch() {
    assert!(vwap(&[], &[], &[], &[]).is_none());
    assert!(vwap(&[1.0], &[1.0], &[1.0, 2.0], &[1, 1]).is_none());
  }
}
