/**
* filename : batch_manager
* author : HAMA
* date: 2025. 5. 12.
* description: 동시 실행 상한 아래에서 여러 심볼을 분석하고 성공한 결과만 모은다
**/

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinSet;

use crate::config::AnalysisConfig;
use crate::core::analysis_manager::{validate_symbol, AnalysisManager};
use crate::error::TechnicalError;
use crate::models::analysis::AnalysisResult;

pub const DEFAULT_BATCH_CONCURRENCY: usize = 10;
pub const DEFAULT_MAX_BATCH_SIZE: usize = 50;

// 배치 분석기 - 심볼별 실패는 결과에서 조용히 제외된다
#[derive(Clone)]
pub struct BatchAnalyzer {
  manager: AnalysisManager,
  max_concurrency: usize,
  max_batch_size: usize,
}

impl BatchAnalyzer {
  pub fn new(manager: AnalysisManager) -> Self {
    BatchAnalyzer {
      manager,
      max_concurrency: DEFAULT_BATCH_CONCURRENCY,
      max_batch_size: DEFAULT_MAX_BATCH_SIZE,
    }
  }

  pub fn from_config(manager: AnalysisManager, config: &AnalysisConfig) -> Self {
    BatchAnalyzer::new(manager)
      .with_max_concurrency(config.batch_concurrency)
      .with_max_batch_size(config.max_batch_size)
  }

  pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
    self.max_concurrency = max_concurrency.max(1);
    self
  }

  pub fn with_max_batch_size(mut self, max_batch_size: usize) -> Self {
    self.max_batch_size = max_batch_size.max(1);
    self
  }

  pub fn manager(&self) -> &AnalysisManager {
    &self.manager
  }

  pub fn max_concurrency(&self) -> usize {
    self.max_concurrency
  }

  // 입력 검사는 작업 시작 전에 끝낸다
  fn validate(&self, symbols: &[String]) -> Result<(), TechnicalError> {
    if symbols.is_empty() || symbols.len() > self.max_batch_size {
      return Err(TechnicalError::InvalidInput(format!(
        "Batch size must be between 1 and {}, got {}",
        self.max_batch_size,
        symbols.len()
      )));
    }

    symbols.iter().try_for_each(|s| validate_symbol(s))
  }

  /// 심볼 목록 분석. 입력이 잘못된 경우에만 오류를 반환한다.
  pub async fn analyze_batch(&self, symbols: &[String]) -> Result<HashMap<String, AnalysisResult>, TechnicalError> {
    self.validate(symbols)?;

    let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
    let results = Arc::new(Mutex::new(HashMap::with_capacity(symbols.len())));
    let mut tasks = JoinSet::new();

    for symbol in symbols {
      let symbol = symbol.clone();
      let manager = self.manager.clone();
      let semaphore = Arc::clone(&semaphore);
      let results = Arc::clone(&results);

      tasks.spawn(async move {
        // 세마포어는 닫지 않으므로 획득 실패는 발생하지 않는다
        let Ok(_permit) = semaphore.acquire_owned().await else {
          return;
        };

        match manager.analyze(&symbol).await {
          Ok(result) => {
            results.lock().await.insert(symbol, result);
          }
          Err(e) if e.is_terminal() => log::debug!("배치 분석 제외: {} - {}", symbol, e),
          Err(e) => log::warn!("배치 분석 실패: {} - {}", symbol, e),
        }
      });
    }

    while let Some(joined) = tasks.join_next().await {
      if let Err(e) = joined {
        log::warn!("배치 작업 비정상 종료: {}", e);
      }
    }

    let mut guard = results.lock().await;
    let collected = std::mem::take(&mut *guard);
    log::info!("배치 분석 완료: 요청 {} - 성공 {}", symbols.len(), collected.len());

    Ok(collected)
  }
}
