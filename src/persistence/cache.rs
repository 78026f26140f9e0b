use std::collections::HashMap;
use std::time::{Duration, Instant};
use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::TechnicalError;

/// 분석 결과 캐시 키
pub fn cache_key(symbol: &str) -> String {
    format!("technical:{}:latest", symbol)
}

/// 만료 시간을 가지는 키/값 캐시 인터페이스
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResultCache: Send + Sync {
    /// 값 조회. 없거나 만료되었으면 `None`
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, TechnicalError>;

    /// 값 저장. 같은 키는 마지막 쓰기가 남는다.
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), TechnicalError>;
}

struct CacheEntry {
    value: Vec<u8>,
    expires_at: Instant,
}

/// 프로세스 내 메모리 캐시
pub struct InMemoryCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        InMemoryCache {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// 만료된 항목 제거 후 남은 항목 수 반환
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| entry.expires_at > now);
        entries.len()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResultCache for InMemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, TechnicalError> {
        let entries = self.entries.read().await;
        Ok(entries
            .get(key)
            .filter(|entry| entry.expires_at > Instant::now())
            .map(|entry| entry.value.clone()))
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), TechnicalError> {
        let mut entries = self.entries.write().await;
        entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_format() {
        assert_eq!(cache_key("FPT"), "technical:FPT:latest");
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let cache = InMemoryCache::new();
        cache.set("k", b"v1".to_vec(), Duration::from_secs(60)).await.unwrap();
        cache.set("k", b"v2".to_vec(), Duration::from_secs(60)).await.unwrap();
        assert_eq!(cache.get("k").await.unwrap(), Some(b"v2".to_vec()));
        assert_eq!(cache.get("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_expired_entry_is_miss() {
        let cache = InMemoryCache::new();
        cache.set("k", b"v".to_vec(), Duration::from_millis(10)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(cache.get("k").await.unwrap(), None);
        assert_eq!(cache.purge_expired().await, 0);
        assert!(cache.is_empty().await);
    }
}
