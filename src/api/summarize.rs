//! 文本摘要端点

use axum::{extract::State, routing::post, Json, Router};
use std::sync::Arc;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::models::{SummarizeRequest, SummarizeResponse};
use crate::services::{DEFAULT_SUMMARY_WORDS, MAX_SUMMARY_WORDS};
use crate::state::AppState;

/// 文本摘要
async fn summarize(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SummarizeRequest>,
) -> AppResult<Json<SummarizeResponse>> {
    if !state.ai.is_enabled() {
        return Err(AppError::AiUnavailable("AI service not configured".to_string()));
    }

    let max_words = req.max_length.unwrap_or(DEFAULT_SUMMARY_WORDS);
    if max_words == 0 || max_words > MAX_SUMMARY_WORDS {
        return Err(AppError::BadRequest(format!(
            "maxLength must be between 1 and {}",
            MAX_SUMMARY_WORDS
        )));
    }

    info!(
        "Summarize request: content_chars={}, max_words={}",
        req.content.chars().count(),
        max_words
    );
    let summary = state.ai.summarize_text(&req.content, max_words).await?;
    Ok(Json(SummarizeResponse { summary }))
}

/// 创建摘要路由
pub fn summarize_routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/summarize", post(summarize))
}
