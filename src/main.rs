//! Context Switcher API
//!
//! 使用 axum 框架构建的后端服务，为 Jira 问题聚合 Confluence 文档、Bitbucket 提交
//! 与服务管理工单，并提供基于 LLM 的文本摘要。

use anyhow::Context;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod atlassian;
mod config;
mod error;
mod llm;
mod models;
mod services;
mod state;
mod utils;

#[cfg(test)]
mod test_support;

use api::create_api_routes;
use config::{load_config, Environment};
use state::{create_shared_state, AppState};

/// 未设置 RUST_LOG 时的默认日志过滤
fn default_log_filter(environment: Environment) -> &'static str {
    if environment.is_development() {
        "context_switcher=debug,tower_http=debug"
    } else {
        "context_switcher=info,tower_http=info"
    }
}

/// 构建带中间件的完整应用
fn build_app(state: Arc<AppState>) -> Router {
    // 允许所有来源，由宿主平台负责访问控制
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(create_api_routes(state))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_log_filter(config.environment).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting Context Switcher API: environment={}, ai_enabled={}",
        config.environment,
        config.ai_configured()
    );

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("failed to bind {}:{}", config.host, config.port))?;
    info!("Server listening on: {}", listener.local_addr()?);

    let state = create_shared_state(config)?;
    let app = build_app(state);

    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    #[test]
    fn test_default_log_filter() {
        assert!(default_log_filter(Environment::Development).contains("debug"));
        assert!(default_log_filter(Environment::Production).contains("info"));
    }

    #[tokio::test]
    async fn test_cors_headers() {
        let state = create_shared_state(AppConfig::default()).unwrap();
        let response = build_app(state)
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header("origin", "https://example.atlassian.net")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "healthy");
    }
}
