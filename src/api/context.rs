//! 问题上下文端点

use axum::{
    extract::{Path, State},
    http::{header::AUTHORIZATION, HeaderMap},
    routing::get,
    Json, Router,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::atlassian::Credentials;
use crate::error::{AppError, AppResult};
use crate::models::IssueContext;
use crate::state::AppState;

/// 站点 ID 请求头
const CLOUD_ID_HEADER: &str = "x-cloud-id";

static CLOUD_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9-]+$").expect("valid cloud id regex"));

/// 生成短请求 ID
fn generate_request_id() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// 从请求头提取宿主平台注入的凭据
fn extract_credentials(headers: &HeaderMap) -> AppResult<Credentials> {
    let authorization = header_value(headers, AUTHORIZATION.as_str());
    let cloud_id = header_value(headers, CLOUD_ID_HEADER);

    let (Some(authorization), Some(cloud_id)) = (authorization, cloud_id) else {
        return Err(AppError::Unauthorized(
            "Missing authentication headers".to_string(),
        ));
    };

    let token = match authorization.split_once(' ') {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
        _ if authorization.eq_ignore_ascii_case("bearer") => "",
        _ => authorization,
    };
    if token.is_empty() {
        return Err(AppError::Unauthorized("Empty bearer token".to_string()));
    }
    if !CLOUD_ID_RE.is_match(cloud_id) {
        return Err(AppError::BadRequest(format!("Invalid cloud id: {}", cloud_id)));
    }

    Ok(Credentials {
        token: token.to_string(),
        cloud_id: cloud_id.to_string(),
    })
}

/// 获取问题上下文
async fn get_context(
    State(state): State<Arc<AppState>>,
    Path(issue_key): Path<String>,
    headers: HeaderMap,
) -> AppResult<Json<IssueContext>> {
    let credentials = extract_credentials(&headers)?;
    let span = info_span!("context", request_id = %generate_request_id(), issue_key = %issue_key);

    async move {
        info!("Fetching context for issue: {}", issue_key);
        let ctx = state.context.get_issue_context(&issue_key, credentials).await?;
        info!("Successfully fetched context for {}", ctx.issue.key);
        Ok::<_, AppError>(Json(ctx))
    }
    .instrument(span)
    .await
}

/// 创建上下文路由
pub fn context_routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/context/:issue_key", get(get_context))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn test_extract_credentials() {
        let creds = extract_credentials(&headers(&[
            ("authorization", "Bearer abc.def"),
            ("x-cloud-id", "1234-abcd"),
        ]))
        .unwrap();
        assert_eq!(creds.token, "abc.def");
        assert_eq!(creds.cloud_id, "1234-abcd");
    }

    #[test]
    fn test_extract_credentials_missing() {
        let err = extract_credentials(&headers(&[("authorization", "Bearer abc")])).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));

        let err = extract_credentials(&headers(&[("x-cloud-id", "site")])).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));

        let err = extract_credentials(&headers(&[
            ("authorization", "Bearer "),
            ("x-cloud-id", "site"),
        ]))
        .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn test_extract_credentials_bad_cloud_id() {
        let err = extract_credentials(&headers(&[
            ("authorization", "Bearer abc"),
            ("x-cloud-id", "../jira"),
        ]))
        .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_request_id_length() {
        assert_eq!(generate_request_id().len(), 8);
    }
}
