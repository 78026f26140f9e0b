use std::path::{Path, PathBuf};
use async_trait::async_trait;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::{Mutex, RwLock};

use crate::error::TechnicalError;
use crate::models::analysis::AnalysisRecord;

/// 분석 결과 추가 전용 저장소 인터페이스
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResultStore: Send + Sync {
    /// 레코드 추가
    async fn append(&self, record: &AnalysisRecord) -> Result<(), TechnicalError>;
}

/// 메모리 기반 저장소 구현
pub struct InMemoryResultStore {
    records: RwLock<Vec<AnalysisRecord>>,
}

impl InMemoryResultStore {
    pub fn new() -> Self {
        InMemoryResultStore {
            records: RwLock::new(Vec::new()),
        }
    }

    /// 심볼별 레코드 찾기
    pub async fn find_by_symbol(&self, symbol: &str) -> Vec<AnalysisRecord> {
        self.records
            .read()
            .await
            .iter()
            .filter(|r| r.symbol == symbol)
            .cloned()
            .collect()
    }

    /// 모든 레코드 가져오기
    pub async fn find_all(&self) -> Vec<AnalysisRecord> {
        self.records.read().await.clone()
    }
}

impl Default for InMemoryResultStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResultStore for InMemoryResultStore {
    async fn append(&self, record: &AnalysisRecord) -> Result<(), TechnicalError> {
        self.records.write().await.push(record.clone());
        Ok(())
    }
}

/// 기록 파일이 설정되지 않았을 때 쓰는 저장소. 레코드를 보관하지 않고 로그만 남긴다.
#[derive(Debug, Default)]
pub struct NoopResultStore;

impl NoopResultStore {
    pub fn new() -> Self {
        NoopResultStore
    }
}

#[async_trait]
impl ResultStore for NoopResultStore {
    async fn append(&self, record: &AnalysisRecord) -> Result<(), TechnicalError> {
        log::debug!(
            "기록 저장소 미설정, 레코드 폐기: {} {} ({})",
            record.symbol,
            record.signal,
            record.id
        );
        Ok(())
    }
}

/// JSON Lines 파일 저장소. 레코드 하나당 한 줄을 추가한다.
pub struct JsonLinesStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonLinesStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonLinesStore {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ResultStore for JsonLinesStore {
    async fn append(&self, record: &AnalysisRecord) -> Result<(), TechnicalError> {
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');

        // 한 줄이 다른 쓰기와 섞이지 않도록 직렬화
        let _guard = self.write_lock.lock().await;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| TechnicalError::StoreError(format!("{}: {}", self.path.display(), e)))?;

        file.write_all(&line).await?;
        file.flush().await?;

        Ok(())
    }
}
