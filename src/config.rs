/**
* filename : config
* author : HAMA
* date: 2025. 5. 8.
* description:
**/

use std::time::Duration;
use serde::{Deserialize, Serialize};

use crate::error::TechnicalError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub analysis: AnalysisConfig,
    pub history: HistoryConfig,
    pub store: StoreConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// 심볼당 조회할 캔들 수
    pub lookback: usize,
    /// 분석에 필요한 최소 캔들 수
    pub min_candles: usize,
    pub cache_ttl_secs: u64,
    /// 배치 분석 동시 실행 상한
    pub batch_concurrency: usize,
    pub max_batch_size: usize,
    /// 캐시/시세/저장소 호출 한 번에 허용하는 시간
    pub upstream_timeout_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistorySource {
    Synthetic,
    Csv,
    Http,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    pub source: HistorySource,
    pub base_url: String,
    pub csv_path: Option<String>,
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// JSON Lines 파일 경로. 없으면 메모리 저장소 사용
    pub path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl AnalysisConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_millis(self.upstream_timeout_ms)
    }
}

impl HistoryConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Config {
    /// 기본값 → config 파일(선택) → TECHNICAL_* 환경 변수 순으로 설정을 읽는다
    pub fn load() -> Result<Self, TechnicalError> {
        Self::load_from("config")
    }

    pub fn load_from(file_stem: &str) -> Result<Self, TechnicalError> {
        let defaults = ::config::Config::try_from(&Config::default())
            .map_err(|e| TechnicalError::ConfigError(format!("Failed to build defaults: {}", e)))?;

        let settings = ::config::Config::builder()
            .add_source(defaults)
            .add_source(::config::File::with_name(file_stem).required(false))
            .add_source(
                ::config::Environment::with_prefix("TECHNICAL")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| TechnicalError::ConfigError(format!("Failed to load config: {}", e)))?;

        let mut cfg: Config = settings
            .try_deserialize()
            .map_err(|e| TechnicalError::ConfigError(format!("Failed to parse config: {}", e)))?;

        cfg.apply_env_overrides();
        cfg.validate()?;
        Ok(cfg)
    }

    /// 배포 환경에서 쓰던 단순 환경 변수 이름 지원
    fn apply_env_overrides(&mut self) {
        use std::env;
        if let Ok(v) = env::var("PORT") {
            if let Ok(port) = v.parse() { self.server.port = port; }
        }
        if let Ok(v) = env::var("HISTORY_BASE_URL") { if !v.is_empty() { self.history.base_url = v; } }
        if let Ok(v) = env::var("STORE_PATH") { if !v.is_empty() { self.store.path = Some(v); } }
    }

    pub fn validate(&self) -> Result<(), TechnicalError> {
        if self.analysis.batch_concurrency == 0 {
            return Err(TechnicalError::ConfigError("analysis.batch_concurrency must be at least 1".to_string()));
        }
        if self.analysis.max_batch_size == 0 {
            return Err(TechnicalError::ConfigError("analysis.max_batch_size must be at least 1".to_string()));
        }
        if self.analysis.min_candles < 2 {
            return Err(TechnicalError::ConfigError("analysis.min_candles must be at least 2".to_string()));
        }
        if self.analysis.lookback < self.analysis.min_candles {
            return Err(TechnicalError::ConfigError("analysis.lookback must not be below analysis.min_candles".to_string()));
        }
        if self.history.source == HistorySource::Csv && self.history.csv_path.is_none() {
            return Err(TechnicalError::ConfigError("history.csv_path is required for the csv source".to_string()));
        }
        Ok(())
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            lookback: 100,
            min_candles: 26,
            cache_ttl_secs: 300,
            batch_concurrency: 10,
            max_batch_size: 50,
            upstream_timeout_ms: 30_000,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8081,
            },
            analysis: AnalysisConfig::default(),
            history: HistoryConfig {
                source: HistorySource::Synthetic,
                base_url: "https://api.vietstock.vn/finance".to_string(),
                csv_path: None,
                timeout_ms: 30_000,
            },
            store: StoreConfig { path: None },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let cfg = Config::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.analysis.cache_ttl(), Duration::from_secs(300));
        assert_eq!(cfg.analysis.batch_concurrency, 10);
        assert_eq!(cfg.analysis.min_candles, 26);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("technical.toml");
        std::fs::write(
            &path,
            "[analysis]\nlookback = 60\nbatch_concurrency = 4\n\n[history]\nsource = \"synthetic\"\n",
        )
        .unwrap();

        let stem = dir.path().join("technical");
        let cfg = Config::load_from(stem.to_str().unwrap()).unwrap();
        assert_eq!(cfg.analysis.lookback, 60);
        assert_eq!(cfg.analysis.batch_concurrency, 4);
        // 파일에 없는 값은 기본값 유지
        assert_eq!(cfg.analysis.min_candles, 26);
        assert_eq!(cfg.history.source, HistorySource::Synthetic);
    }

    #[test]
    fn test_csv_source_requires_path() {
        let mut cfg = Config::default();
        cfg.history.source = HistorySource::Csv;
        assert!(matches!(cfg.validate(), Err(TechnicalError::ConfigError(_))));
    }
}
