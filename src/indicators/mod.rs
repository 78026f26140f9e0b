/**
* filename : mod
* author : HAMA
* date: 2025. 5. 11.
* description: 가격 시계열에 대한 순수 함수형 기술적 지표
**/
pub mod moving_averages;
pub mod oscillators;
pub mod trend;
pub mod volatility;
pub mod volume;
pub mod utils;

pub use moving_averages::*;
pub use oscillators::*;
pub use trend::*;
pub use volatility::*;
pub use volume::*;

/// 입력 캔들 하나당 값 하나. 워밍업 이전 구간은 0.0 으로 채운다.
/// 계산 자체가 불가능한 경우(입력 부족)는 `Option::None` 으로 표현한다.
pub type IndicatorSeries = Vec<f64>;
