use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use nd_core::DigestReport;
use serde::Deserialize;

use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub company: String,
}

pub async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<DigestReport>, ApiError> {
    Ok(Json(state.manager.run(&request.company).await?))
}

pub async fn analyze_query(
    State(state): State<Arc<AppState>>,
    Query(request): Query<AnalyzeRequest>,
) -> Result<Json<DigestReport>, ApiError> {
    Ok(Json(state.manager.run(&request.company).await?))
}

pub async fn health() -> &'static str {
    "ok"
}
