//! Atlassian 类型定义
//!
//! 上游响应只反序列化用到的字段，其余字段忽略。

use serde::Deserialize;

/// 宿主平台注入的请求凭据
#[derive(Debug, Clone)]
pub struct Credentials {
    /// OAuth bearer token（不含 "Bearer " 前缀）
    pub token: String,
    /// Atlassian 站点 ID
    pub cloud_id: String,
}

/// Atlassian 调用错误
#[derive(Debug, thiserror::Error)]
pub enum AtlassianError {
    /// 网络或超时错误
    #[error("HTTP 请求失败: {0}")]
    Http(#[from] reqwest::Error),

    /// 非 200/404 的响应
    #[error("Atlassian API 返回 {status}: {url}")]
    Status { status: u16, url: String },

    /// JSON 解析错误
    #[error("JSON 解析失败: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
pub(crate) struct Named {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProjectRef {
    pub key: String,
}

/// Jira 问题
#[derive(Debug, Deserialize)]
pub(crate) struct JiraIssue {
    pub fields: JiraFields,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct JiraFields {
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub project: Option<ProjectRef>,
    #[serde(default)]
    pub status: Option<Named>,
    #[serde(default)]
    pub issuetype: Option<Named>,
    #[serde(default)]
    pub priority: Option<Named>,
    #[serde(default)]
    pub issuelinks: Vec<JiraIssueLink>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JiraIssueLink {
    #[serde(default)]
    pub outward_issue: Option<LinkedIssue>,
    #[serde(default)]
    pub inward_issue: Option<LinkedIssue>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LinkedIssue {
    pub key: String,
    #[serde(default)]
    pub fields: JiraFields,
}

/// Confluence 内容搜索结果
#[derive(Debug, Deserialize)]
pub(crate) struct ConfluenceSearch {
    #[serde(default)]
    pub results: Vec<ConfluenceContent>,
    #[serde(default, rename = "_links")]
    pub links: Option<ConfluenceLinks>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ConfluenceContent {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, rename = "type")]
    pub content_type: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub version: Option<ConfluenceVersion>,
    #[serde(default, rename = "_links")]
    pub links: Option<ConfluenceLinks>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ConfluenceVersion {
    #[serde(default)]
    pub when: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ConfluenceLinks {
    #[serde(default)]
    pub base: Option<String>,
    #[serde(default)]
    pub webui: Option<String>,
}

/// Bitbucket 分页响应
#[derive(Debug, Deserialize)]
pub(crate) struct BitbucketPage<T> {
    #[serde(default = "Vec::new")]
    pub values: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BitbucketRepo {
    pub slug: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BitbucketRawCommit {
    pub id: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub author: Option<BitbucketAuthor>,
    #[serde(default)]
    pub author_timestamp: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BitbucketAuthor {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}
