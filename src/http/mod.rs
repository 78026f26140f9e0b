use axum::{routing::{get, post}, Router, extract::{Path, State}, response::{IntoResponse, Response}};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tower_http::cors::{CorsLayer, Any};

use crate::core::{AnalysisManager, BatchAnalyzer};
use crate::error::TechnicalError;
use crate::models::analysis::AnalysisResult;

#[derive(Clone)]
pub struct AppState {
  pub manager: AnalysisManager,
  pub batch: BatchAnalyzer,
}

impl AppState {
  pub fn new(batch: BatchAnalyzer) -> Self {
    AppState {
      manager: batch.manager().clone(),
      batch,
    }
  }
}

#[derive(Debug, Serialize)]
struct Health { status: &'static str, service: &'static str }

#[derive(Debug, Deserialize)]
pub struct BatchRequest {
  pub symbols: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BatchResponse {
  pub results: HashMap<String, AnalysisResult>,
  pub count: usize,
}

/// 분석 오류를 HTTP 응답으로 변환
pub struct ApiError(pub TechnicalError);

impl From<TechnicalError> for ApiError {
  fn from(e: TechnicalError) -> Self {
    ApiError(e)
  }
}

impl ApiError {
  fn status(&self) -> StatusCode {
    match &self.0 {
      TechnicalError::InvalidInput(_) => StatusCode::BAD_REQUEST,
      TechnicalError::InsufficientData { .. } => StatusCode::UNPROCESSABLE_ENTITY,
      TechnicalError::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
      _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      log::error!("요청 처리 실패: {}", self.0);
    }
    (status, axum::Json(serde_json::json!({ "error": self.0.to_string() }))).into_response()
  }
}

pub fn build_router(state: AppState) -> Router {
  let cors = CorsLayer::new().allow_origin(Any).allow_headers(Any).allow_methods(Any);

  Router::new()
    .route("/health", get(|| async { axum::Json(Health { status: "healthy", service: "technical-agent" }) }))
    .route("/analyze/batch", post(analyze_batch))
    .route("/analyze/:symbol", get(analyze_symbol))
    // 다른 서비스용 내부 API
    .route("/internal/indicators/:symbol", get(internal_indicators))
    .with_state(state)
    .layer(cors)
}

async fn analyze_symbol(Path(symbol): Path<String>, State(state): State<AppState>) -> Result<axum::Json<AnalysisResult>, ApiError> {
  let result = state.manager.analyze(&symbol).await?;
  Ok(axum::Json(result))
}

async fn analyze_batch(State(state): State<AppState>, axum::Json(req): axum::Json<BatchRequest>) -> Result<axum::Json<BatchResponse>, ApiError> {
  let results = state.batch.analyze_batch(&req.symbols).await?;
  let count = results.len();
  Ok(axum::Json(BatchResponse { results, count }))
}

async fn internal_indicators(Path(symbol): Path<String>, State(state): State<AppState>) -> Response {
  match state.manager.analyze(&symbol).await {
    Ok(result) => axum::Json(result).into_response(),
    Err(e) => (
      StatusCode::INTERNAL_SERVER_ERROR,
      axum::Json(serde_json::json!({ "error": e.to_string() })),
    )
      .into_response(),
  }
}
