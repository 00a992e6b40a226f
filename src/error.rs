//! 统一错误处理模块
//!
//! 定义应用级错误类型，并实现 axum 的 IntoResponse trait 以便自动转换为 HTTP 响应。

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::atlassian::AtlassianError;
use crate::llm::LlmError;

/// 应用错误枚举
#[derive(Error, Debug)]
pub enum AppError {
    /// 配置相关错误
    #[error("配置错误: {0}")]
    Config(String),

    /// 请求参数错误
    #[error("请求错误: {0}")]
    BadRequest(String),

    /// 缺少或无效的认证信息
    #[error("未认证: {0}")]
    Unauthorized(String),

    /// 资源未找到
    #[error("未找到: {0}")]
    NotFound(String),

    /// 上游服务不可用（网络、认证、限流）
    #[error("上游服务不可用: {0}")]
    Upstream(String),

    /// AI 服务未配置
    #[error("AI 服务不可用: {0}")]
    AiUnavailable(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::AiUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

/// 对外统一的上游错误信息，详细原因只写入日志
pub const UPSTREAM_UNAVAILABLE: &str = "upstream unavailable";

impl From<AtlassianError> for AppError {
    fn from(err: AtlassianError) -> Self {
        error!("Atlassian request failed: {}", err);
        AppError::Upstream(UPSTREAM_UNAVAILABLE.to_string())
    }
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::ConfigError(msg) => AppError::AiUnavailable(msg),
            other => AppError::Upstream(format!("Summarization failed: {}", other)),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_message = match &self {
            AppError::Config(msg)
            | AppError::BadRequest(msg)
            | AppError::Unauthorized(msg)
            | AppError::NotFound(msg)
            | AppError::Upstream(msg)
            | AppError::AiUnavailable(msg) => msg.clone(),
        };

        if status.is_server_error() {
            error!("Request failed: status={}, error={}", status.as_u16(), error_message);
        }

        let body = Json(json!({
            "success": false,
            "error": error_message
        }));

        (status, body).into_response()
    }
}

/// 便捷类型别名
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn test_error_body_shape() {
        let response = AppError::NotFound("Issue ABC-1 not found".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Issue ABC-1 not found");
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::Unauthorized(String::new()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AppError::Upstream(String::new()).status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            AppError::AiUnavailable(String::new()).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_llm_error_conversion() {
        let err: AppError = LlmError::ConfigError("API Key is required".to_string()).into();
        assert!(matches!(err, AppError::AiUnavailable(_)));

        let err: AppError = LlmError::ApiError {
            status: 429,
            message: "rate limited".to_string(),
        }
        .into();
        assert!(matches!(err, AppError::Upstream(_)));
    }

    #[test]
    fn test_atlassian_error_hides_details() {
        let err: AppError = AtlassianError::Status {
            status: 401,
            url: "https://api.atlassian.com/ex/jira/cloud/rest/api/3/issue/PROJ-1".to_string(),
        }
        .into();
        match err {
            AppError::Upstream(msg) => assert_eq!(msg, UPSTREAM_UNAVAILABLE),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
