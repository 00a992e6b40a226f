//! Atlassian 客户端

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

use super::types::{AtlassianError, Credentials};

/// Atlassian API 客户端
///
/// 底层 `reqwest::Client` 带连接池，在请求间共享；凭据随每个请求创建
#[derive(Clone)]
pub struct AtlassianClient {
    http: Client,
    base_url: String,
    credentials: Credentials,
}

impl AtlassianClient {
    pub fn new(http: Client, base_url: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            credentials,
        }
    }

    /// 构建共享的 HTTP 客户端
    pub fn build_http_client(timeout_secs: u64) -> Result<Client, AtlassianError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
            .pool_max_idle_per_host(10)
            .build()?;
        Ok(client)
    }

    pub(super) fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(super) fn cloud_id(&self) -> &str {
        &self.credentials.cloud_id
    }

    /// 发送 GET 请求并解析 JSON
    ///
    /// 200 返回 `Some`，404 返回 `None`，其他状态码视为上游错误
    pub(super) async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<Option<T>, AtlassianError> {
        debug!("Atlassian request: url={}", url);

        let response = self
            .http
            .get(url)
            .bearer_auth(&self.credentials.token)
            .header("Accept", "application/json")
            .query(query)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => {
                let bytes = response.bytes().await?;
                Ok(Some(serde_json::from_slice(&bytes)?))
            }
            StatusCode::NOT_FOUND => {
                warn!("Resource not found: {}", url);
                Ok(None)
            }
            status => Err(AtlassianError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            }),
        }
    }
}
