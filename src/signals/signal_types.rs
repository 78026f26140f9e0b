/**
* filename : signal_types
* author : HAMA
* date: 2025. 5. 11.
* description:
**/

use std::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalType {
  StrongBuy,   // 강한 매수
  Buy,         // 매수
  Hold,        // 관망
  Sell,        // 매도
  StrongSell,  // 강한 매도
}

impl SignalType {
  /// 누적 점수에서 신호와 신뢰도(0 ~ 100) 결정
  pub fn from_score(score: f64) -> (Self, f64) {
    let (signal, confidence) = if score >= 4.0 {
      (SignalType::StrongBuy, f64::min(95.0, 70.0 + (score - 4.0) * 5.0))
    } else if score >= 2.0 {
      (SignalType::Buy, f64::min(85.0, 60.0 + (score - 2.0) * 5.0))
    } else if score >= -2.0 {
      (SignalType::Hold, 50.0 + score.abs() * 5.0)
    } else if score >= -4.0 {
      (SignalType::Sell, f64::min(85.0, 60.0 + (score + 2.0).abs() * 5.0))
    } else {
      (SignalType::StrongSell, f64::min(95.0, 70.0 + (score + 4.0).abs() * 5.0))
    };

    (signal, confidence.clamp(0.0, 100.0))
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      SignalType::StrongBuy => "STRONG_BUY",
      SignalType::Buy => "BUY",
      SignalType::Hold => "HOLD",
      SignalType::Sell => "SELL",
      SignalType::StrongSell => "STRONG_SELL",
    }
  }
}

impl fmt::Display for SignalType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}
