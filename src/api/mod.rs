//! API 路由模块

mod context;
mod health;
mod summarize;

pub use context::context_routes;
pub use health::health_routes;
pub use summarize::summarize_routes;

use axum::Router;
use std::sync::Arc;

use crate::error::AppError;
use crate::state::AppState;

/// 未匹配路由的处理器
async fn not_found() -> AppError {
    AppError::NotFound("Not found".to_string())
}

/// 创建所有 API 路由
pub fn create_api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(context_routes())
        .merge(summarize_routes())
        .fallback(not_found)
        .with_state(state)
}
