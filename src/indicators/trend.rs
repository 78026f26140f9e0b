/**
* filename : trend
* author : HAMA
* date: 2025. 5. 11.
* description:
**/

use serde::{Deserialize, Serialize};

use super::moving_averages::ema;
use super::utils::{true_range, wilder_smooth};
use super::IndicatorSeries;

/// MACD 최신 값
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Macd {
  pub macd_line: f64,
  pub signal_line: f64,
  pub histogram: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
  pub macd_line: IndicatorSeries,
  pub signal_line: IndicatorSeries,
  pub histogram: IndicatorSeries,
}

/// ADX 최신 값
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Adx {
  pub adx: f64,
  pub plus_di: f64,
  pub minus_di: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdxSeries {
  pub adx: IndicatorSeries,
  pub plus_di: IndicatorSeries,
  pub minus_di: IndicatorSeries,
}

pub fn macd_series(
  closes: &[f64],
  fast_period: usize,
  slow_period: usize,
  signal_period: usize,
) -> Option<MacdSeries> {
  if slow_period == 0 || signal_period == 0 || closes.len() < slow_period + signal_period {
    return None;
  }

  let ema_fast = ema(closes, fast_period)?;
  let ema_slow = ema(closes, slow_period)?;

  // 느린 EMA 가 유효해지는 지점부터 MACD 라인 계산
  let start = slow_period - 1;
  let mut macd_line = vec![0.0; closes.len()];
  for i in start..closes.len() {
    macd_line[i] = ema_fast[i] - ema_slow[i];
  }

  // 시그널 라인 = MACD 라인의 EMA
  let signal_ema = ema(&macd_line[start..], signal_period)?;

  let mut signal_line = vec![0.0; closes.len()];
  let mut histogram = vec![0.0; closes.len()];
  let signal_start = signal_period - 1;
  for (offset, &signal) in signal_ema.iter().enumerate().skip(signal_start) {
    let idx = start + offset;
    signal_line[idx] = signal;
    histogram[idx] = macd_line[idx] - signal;
  }

  Some(MacdSeries {
    macd_line,
    signal_line,
    histogram,
  })
}

pub fn macd(closes: &[f64], fast_period: usize, slow_period: usize, signal_period: usize) -> Option<Macd> {
  let series = macd_series(closes, fast_period, slow_period, signal_period)?;
  let macd_line = *series.macd_line.last()?;
  let signal_line = *series.signal_line.last()?;

  Some(Macd {
    macd_line,
    signal_line,
    histogram: macd_line - signal_line,
  })
}

pub fn adx_series(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> Option<AdxSeries> {
  let n = closes.len();
  if period == 0 || n < period * 2 || highs.len() != n || lows.len() != n {
    return None;
  }

  // True Range, +DM, -DM (인덱스 0 은 비워둔다)
  let mut tr = vec![0.0; n];
  let mut plus_dm = vec![0.0; n];
  let mut minus_dm = vec![0.0; n];

  for i in 1..n {
    tr[i] = true_range(highs[i], lows[i], closes[i - 1]);

    let up_move = highs[i] - highs[i - 1];
    let down_move = lows[i - 1] - lows[i];

    if up_move > down_move && up_move > 0.0 {
      plus_dm[i] = up_move;
    }
    if down_move > up_move && down_move > 0.0 {
      minus_dm[i] = down_move;
    }
  }

  let smooth_tr = wilder_smooth(&tr, period)?;
  let smooth_plus_dm = wilder_smooth(&plus_dm, period)?;
  let smooth_minus_dm = wilder_smooth(&minus_dm, period)?;

  let mut plus_di = vec![0.0; n];
  let mut minus_di = vec![0.0; n];
  let mut dx = vec![0.0; n];

  for i in period..n {
    if smooth_tr[i] != 0.0 {
      plus_di[i] = smooth_plus_dm[i] / smooth_tr[i] * 100.0;
      minus_di[i] = smooth_minus_dm[i] / smooth_tr[i] * 100.0;
    }

    let di_sum = plus_di[i] + minus_di[i];
    if di_sum != 0.0 {
      dx[i] = (plus_di[i] - minus_di[i]).abs() / di_sum * 100.0;
    }
  }

  let adx = wilder_smooth(&dx, period)?;

  Some(AdxSeries {
    adx,
    plus_di,
    minus_di,
  })
}

pub fn adx(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> Option<Adx> {
  let series = adx_series(highs, lows, closes, period)?;
  Some(Adx {
    adx: *series.adx.last()?,
    plus_di: *series.plus_di.last()?,
    minus_di: *series.minus_di.last()?,
  })
}
