//! 健康检查与服务信息端点

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use std::sync::Arc;

use crate::models::{Endpoints, HealthResponse, ServiceInfo, SERVICE_NAME};
use crate::state::AppState;

/// 健康检查处理器，进程存活即返回成功
async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
        ai_enabled: state.ai.is_enabled(),
        timestamp: Utc::now(),
    })
}

/// 服务信息
async fn root(State(state): State<Arc<AppState>>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: "Context Switcher API".to_string(),
        status: "running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment: state.config.environment.to_string(),
        ai_enabled: state.ai.is_enabled(),
        timestamp: Utc::now(),
        endpoints: Endpoints::default(),
    })
}

/// 创建健康检查路由
pub fn health_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
}
