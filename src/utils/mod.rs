//! 시간 관련 유틸리티
//!
//! 타임스탬프 변환 함수 제공

pub mod logging;

use chrono::{DateTime, Utc};

/// 타임스탬프(밀리초)를 DateTime<Utc>로 변환. 표현 범위를 벗어나면 None.
pub fn timestamp_to_datetime(timestamp_ms: i64) -> Option<DateTime<Utc>> {
  DateTime::from_timestamp_millis(timestamp_ms)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_timestamp_conversion() {
    let now = Utc::now();
    let dt = timestamp_to_datetime(now.timestamp_millis()).unwrap();

    // 밀리초 변환으로 인한 약간의 손실 허용 (1초 이내)
    let diff = (now - dt).num_milliseconds().abs();
    assert!(diff < 1000);
  }

  #[test]
  fn test_known_timestamp() {
    let dt = timestamp_to_datetime(1_735_689_600_000).unwrap();
    assert_eq!(dt.format("%Y-%m-%d").to_string(), "2025-01-01");
  }

  #[test]
  fn test_out_of_range_timestamp() {
    assert!(timestamp_to_datetime(i64::MAX).is_none());
    assert!(timestamp_to_datetime(i64::MIN).is_none());
  }
}
