/**
* filename : signal_analyzer
* author : HAMA
* date: 2025. 5. 11.
* description: 지표 묶음을 고정 가중치 규칙표로 채점
**/

use crate::indicators::{Adx, BollingerBands, Macd, Stochastic};
use super::signal_types::SignalType;

/// 채점에 필요한 최신 지표 값과 가격/거래량 문맥.
/// 계산되지 못한 지표는 `None` 이며 채점에서 제외된다.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignalInputs {
  pub price: f64,
  pub rsi: Option<f64>,
  pub macd: Option<Macd>,
  pub bollinger: Option<BollingerBands>,
  pub stochastic: Option<Stochastic>,
  pub adx: Option<Adx>,
  pub sma_20: Option<f64>,
  pub sma_50: Option<f64>,
  pub current_volume: f64,
  pub avg_volume: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RuleOutcome {
  pub delta: f64,
  pub reason: Option<String>,
}

impl RuleOutcome {
  fn new(delta: f64, reason: String) -> Self {
    RuleOutcome { delta, reason: Some(reason) }
  }

  fn silent(delta: f64) -> Self {
    RuleOutcome { delta, reason: None }
  }
}

pub type ScoringRule = fn(&SignalInputs) -> Option<RuleOutcome>;

/// 규칙표. 순서는 reasons 목록의 순서만 결정하고 점수에는 영향이 없다.
pub const SCORING_RULES: &[(&str, ScoringRule)] = &[
  ("rsi", rsi_rule),
  ("macd_cross", macd_cross_rule),
  ("macd_sign", macd_sign_rule),
  ("price_vs_sma20", price_vs_sma20_rule),
  ("sma20_vs_sma50", sma_cross_rule),
  ("bollinger", bollinger_rule),
  ("stochastic", stochastic_rule),
  ("adx", adx_rule),
  ("volume", volume_rule),
];

#[derive(Debug, Clone, PartialEq)]
pub struct SignalScore {
  pub signal: SignalType,
  pub confidence: f64,
  pub score: f64,
  pub reasons: Vec<String>,
}

pub fn rsi_rule(inputs: &SignalInputs) -> Option<RuleOutcome> {
  let rsi = inputs.rsi?;
  if rsi < 30.0 {
    Some(RuleOutcome::new(2.0, format!("RSI oversold ({:.1} < 30) - strong buy signal", rsi)))
  } else if rsi < 40.0 {
    Some(RuleOutcome::new(1.0, format!("RSI low ({:.1}) - possible upturn", rsi)))
  } else if rsi > 70.0 {
    Some(RuleOutcome::new(-2.0, format!("RSI overbought ({:.1} > 70) - correction risk", rsi)))
  } else if rsi > 60.0 {
    Some(RuleOutcome::new(-1.0, format!("RSI high ({:.1}) - caution", rsi)))
  } else {
    None
  }
}

pub fn macd_cross_rule(inputs: &SignalInputs) -> Option<RuleOutcome> {
  let macd = inputs.macd?;
  if macd.histogram > 0.0 && macd.macd_line > macd.signal_line {
    Some(RuleOutcome::new(2.0, "MACD crossed above signal line - bullish".to_string()))
  } else if macd.histogram < 0.0 && macd.macd_line < macd.signal_line {
    Some(RuleOutcome::new(-2.0, "MACD crossed below signal line - bearish".to_string()))
  } else {
    None
  }
}

pub fn macd_sign_rule(inputs: &SignalInputs) -> Option<RuleOutcome> {
  let macd = inputs.macd?;
  if macd.macd_line > 0.0 {
    Some(RuleOutcome::silent(0.5))
  } else {
    Some(RuleOutcome::silent(-0.5))
  }
}

pub fn price_vs_sma20_rule(inputs: &SignalInputs) -> Option<RuleOutcome> {
  let sma_20 = inputs.sma_20?;
  if inputs.price > sma_20 {
    Some(RuleOutcome::new(1.0, format!("Price above SMA20 ({:.0}) - short-term uptrend", sma_20)))
  } else {
    Some(RuleOutcome::new(-1.0, format!("Price below SMA20 ({:.0}) - short-term downtrend", sma_20)))
  }
}

pub fn sma_cross_rule(inputs: &SignalInputs) -> Option<RuleOutcome> {
  let (sma_20, sma_50) = (inputs.sma_20?, inputs.sma_50?);
  if sma_20 > sma_50 {
    Some(RuleOutcome::new(1.0, "SMA20 > SMA50 - golden cross, uptrend".to_string()))
  } else {
    Some(RuleOutcome::new(-1.0, "SMA20 < SMA50 - death cross, downtrend".to_string()))
  }
}

pub fn bollinger_rule(inputs: &SignalInputs) -> Option<RuleOutcome> {
  let bb = inputs.bollinger?;
  if inputs.price < bb.lower {
    Some(RuleOutcome::new(1.5, format!("Price below lower Bollinger band ({:.0}) - oversold", bb.lower)))
  } else if inputs.price > bb.upper {
    Some(RuleOutcome::new(-1.5, format!("Price above upper Bollinger band ({:.0}) - overbought", bb.upper)))
  } else {
    None
  }
}

pub fn stochastic_rule(inputs: &SignalInputs) -> Option<RuleOutcome> {
  let stoch = inputs.stochastic?;
  if stoch.k < 20.0 && stoch.d < 20.0 {
    Some(RuleOutcome::new(1.0, format!("Stochastic oversold ({:.1}) - buy signal", stoch.k)))
  } else if stoch.k > 80.0 && stoch.d > 80.0 {
    Some(RuleOutcome::new(-1.0, format!("Stochastic overbought ({:.1}) - sell signal", stoch.k)))
  } else {
    None
  }
}

// 추세 강도는 설명만 추가하고 점수는 바꾸지 않는다
pub fn adx_rule(inputs: &SignalInputs) -> Option<RuleOutcome> {
  let adx = inputs.adx?;
  if adx.adx >= 25.0 {
    Some(RuleOutcome::new(0.0, format!("ADX = {:.1} - strong trend", adx.adx)))
  } else {
    Some(RuleOutcome::new(0.0, format!("ADX = {:.1} - sideways market", adx.adx)))
  }
}

pub fn volume_rule(inputs: &SignalInputs) -> Option<RuleOutcome> {
  if inputs.avg_volume <= 0.0 {
    return None;
  }

  let ratio = inputs.current_volume / inputs.avg_volume;
  if ratio > 1.5 {
    Some(RuleOutcome::new(0.5, format!("Volume up {:.1}x - strong money flow", ratio)))
  } else if ratio < 0.5 {
    Some(RuleOutcome::new(-0.5, format!("Volume low {:.1}x - weak money flow", ratio)))
  } else {
    None
  }
}

/// 규칙표 전체를 적용해 점수, 신호, 신뢰도, 근거 목록을 만든다
pub fn analyze_signals(inputs: &SignalInputs) -> SignalScore {
  let (score, reasons) = SCORING_RULES
    .iter()
    .filter_map(|(_, rule)| rule(inputs))
    .fold((0.0, Vec::new()), |(score, mut reasons), outcome| {
      if let Some(reason) = outcome.reason {
        reasons.push(reason);
      }
      (score + outcome.delta, reasons)
    });

  let (signal, confidence) = SignalType::from_score(score);

  SignalScore {
    signal,
    confidence,
    score,
    reasons,
  }
}
