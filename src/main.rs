/**
* filename : main
* author : HAMA
* date: 2025. 5. 8.
* description:
**/

use std::sync::Arc;
use tokio::net::TcpListener;

use technical_agent::config::{Config, HistorySource};
use technical_agent::core::{AnalysisManager, AnalysisSettings, BatchAnalyzer};
use technical_agent::http::{build_router, AppState};
use technical_agent::market_data::{
    CsvHistoryProvider, MarketHistoryProvider, RestHistoryProvider, SyntheticHistoryProvider,
};
use technical_agent::persistence::{InMemoryCache, JsonLinesStore, NoopResultStore, ResultStore};
use technical_agent::utils::logging;
use technical_agent::TechnicalError;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // 설정 로드
    let config = Config::load()?;

    // 로깅 초기화
    logging::init(&config.logging.level)?;
    log::info!("기술적 분석 에이전트 시작... (v{})", technical_agent::VERSION);

    let batch = build_batch_analyzer(&config)?;

    // 명령줄 인수 확인
    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 && args[1] == "analyze" {
        run_once(batch, &args[2..]).await?;
    } else {
        run_server(config, batch).await?;
    }

    Ok(())
}

fn build_provider(config: &Config) -> Result<Arc<dyn MarketHistoryProvider>, TechnicalError> {
    let provider: Arc<dyn MarketHistoryProvider> = match config.history.source {
        HistorySource::Synthetic => Arc::new(SyntheticHistoryProvider::new()),
        HistorySource::Csv => {
            let path = config
                .history
                .csv_path
                .as_deref()
                .ok_or_else(|| TechnicalError::ConfigError("history.csv_path is not set".to_string()))?;
            Arc::new(CsvHistoryProvider::new(path, ',')?)
        }
        HistorySource::Http => Arc::new(RestHistoryProvider::new(
            config.history.base_url.clone(),
            config.history.timeout(),
        )?),
    };

    log::info!("시세 제공자 초기화 완료: {:?}", config.history.source);
    Ok(provider)
}

fn build_batch_analyzer(config: &Config) -> Result<BatchAnalyzer, TechnicalError> {
    let provider = build_provider(config)?;
    let cache = Arc::new(InMemoryCache::new());

    let store: Arc<dyn ResultStore> = match &config.store.path {
        Some(path) => {
            log::info!("분석 기록 파일: {}", path);
            Arc::new(JsonLinesStore::new(path))
        }
        None => {
            log::info!("분석 기록 파일 미설정, 기록을 남기지 않음");
            Arc::new(NoopResultStore::new())
        }
    };

    let manager = AnalysisManager::new(provider, cache, store, AnalysisSettings::from(&config.analysis));
    Ok(BatchAnalyzer::from_config(manager, &config.analysis))
}

async fn run_once(batch: BatchAnalyzer, symbols: &[String]) -> Result<(), anyhow::Error> {
    let results = match batch.analyze_batch(symbols).await {
        Ok(results) => results,
        Err(e) => {
            logging::log_error("일괄 분석", &e);
            return Err(e.into());
        }
    };

    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}

async fn run_server(config: Config, batch: BatchAnalyzer) -> Result<(), anyhow::Error> {
    let router = build_router(AppState::new(batch));
    log::info!("API 라우트 초기화 완료");

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    log::info!("서버 시작: http://{}/", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("기술적 분석 에이전트 종료");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("종료 신호 대기 실패: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("종료 신호 수신, 서버를 정리합니다...");
}
