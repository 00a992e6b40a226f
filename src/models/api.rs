//! REST API 请求/响应模型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 服务名称，用于健康检查
pub const SERVICE_NAME: &str = "context-switcher-api";

/// Jira 问题基本信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueInfo {
    pub key: String,
    pub summary: String,
    /// 所属项目 key
    pub project: String,
    pub status: String,
    pub issue_type: String,
}

/// 相关的 Confluence 文档
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfluenceDoc {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub doc_type: String,
    /// 文档的网页链接，可能为空
    pub url: String,
    pub excerpt: String,
    pub last_modified: String,
}

/// 提及该问题的 Bitbucket 提交
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BitbucketCommit {
    /// 提交哈希
    pub id: String,
    pub message: String,
    pub author: String,
    /// 毫秒时间戳
    pub author_timestamp: i64,
    pub committed_at: Option<DateTime<Utc>>,
    pub repository: String,
    pub repo_slug: String,
}

/// 关联的服务管理工单
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceTicket {
    pub key: String,
    pub summary: String,
    pub status: String,
    pub issue_type: String,
    pub priority: String,
}

/// 问题上下文聚合结果
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueContext {
    pub issue: IssueInfo,
    pub confluence_docs: Vec<ConfluenceDoc>,
    pub bitbucket_commits: Vec<BitbucketCommit>,
    pub service_tickets: Vec<ServiceTicket>,
    pub last_updated: DateTime<Utc>,
    pub ai_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_suggestions: Option<Vec<String>>,
}

impl IssueContext {
    /// 创建仅包含问题信息的上下文
    pub fn new(issue: IssueInfo) -> Self {
        Self {
            issue,
            confluence_docs: Vec::new(),
            bitbucket_commits: Vec::new(),
            service_tickets: Vec::new(),
            last_updated: Utc::now(),
            ai_enabled: false,
            ai_summary: None,
            ai_suggestions: None,
        }
    }
}

/// 文本摘要请求
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarizeRequest {
    #[serde(alias = "text")]
    pub content: String,
    /// 摘要最大词数
    #[serde(default, alias = "max_length")]
    pub max_length: Option<u32>,
}

/// 文本摘要响应
#[derive(Debug, Serialize, Deserialize)]
pub struct SummarizeResponse {
    pub summary: String,
}

/// 健康检查响应
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub ai_enabled: bool,
    pub timestamp: DateTime<Utc>,
}

/// 根路径返回的服务信息
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInfo {
    pub message: String,
    pub status: String,
    pub version: String,
    pub environment: String,
    pub ai_enabled: bool,
    pub timestamp: DateTime<Utc>,
    pub endpoints: Endpoints,
}

/// 可用端点列表
#[derive(Debug, Serialize)]
pub struct Endpoints {
    pub health: String,
    pub context: String,
    pub summarize: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            health: "/health".to_string(),
            context: "/api/context/{issue_key}".to_string(),
            summarize: "/api/summarize".to_string(),
        }
    }
}
