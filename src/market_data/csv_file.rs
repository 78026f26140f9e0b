use std::collections::HashMap;
use std::path::{Path, PathBuf};
use async_trait::async_trait;

use crate::error::TechnicalError;
use crate::market_data::provider::{MarketHistoryProvider, StaticHistoryProvider};
use crate::models::market_data::Candle;
use crate::utils::timestamp_to_datetime;

/// CSV 파일(symbol,timestamp,open,high,low,close,volume) 기반 제공자.
/// 생성 시 파일 전체를 읽어 메모리에 보관한다.
pub struct CsvHistoryProvider {
    path: PathBuf,
    inner: StaticHistoryProvider,
}

impl CsvHistoryProvider {
    pub fn new(path: impl AsRef<Path>, delimiter: char) -> Result<Self, TechnicalError> {
        let path = path.as_ref().to_path_buf();
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(delimiter as u8)
            .from_path(&path)
            .map_err(|e| TechnicalError::IoError(e.into()))?;

        let mut by_symbol: HashMap<String, Vec<Candle>> = HashMap::new();
        for rec in rdr.deserialize() {
            let row: CsvRow = rec.map_err(|e| TechnicalError::InvalidInput(format!("{}: {}", path.display(), e)))?;
            let timestamp = timestamp_to_datetime(row.timestamp).ok_or_else(|| {
                TechnicalError::InvalidInput(format!(
                    "{}: timestamp {} out of range",
                    path.display(),
                    row.timestamp
                ))
            })?;
            let candle = Candle::new(
                timestamp,
                row.open,
                row.high,
                row.low,
                row.close,
                row.volume,
            );
            by_symbol.entry(row.symbol).or_default().push(candle);
        }

        let mut inner = StaticHistoryProvider::new();
        for (symbol, candles) in by_symbol {
            inner.insert(symbol, candles);
        }

        log::info!("CSV 시세 로드 완료: {} ({}개 심볼)", path.display(), inner.symbols().len());

        Ok(CsvHistoryProvider { path, inner })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn available_symbols(&self) -> Vec<String> {
        self.inner.symbols()
    }
}

#[async_trait]
impl MarketHistoryProvider for CsvHistoryProvider {
    async fn get_history(&self, symbol: &str, lookback: usize) -> Result<Vec<Candle>, TechnicalError> {
        self.inner.get_history(symbol, lookback).await
    }
}

#[derive(serde::Deserialize)]
struct CsvRow {
    symbol: String,
    timestamp: i64,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: u64,
}
