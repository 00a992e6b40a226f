//! 问题上下文聚合服务
//!
//! 拉取 Jira 问题后，并发查询 Confluence、Bitbucket 与关联服务工单，合并为一个响应

use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use tracing::{error, info};

use super::ai_service::AiService;
use crate::atlassian::{AtlassianClient, AtlassianError, Credentials};
use crate::error::{AppError, AppResult};
use crate::models::IssueContext;

/// 问题 key 格式，例如 PROJ-42
static ISSUE_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]*-[0-9]+$").expect("valid issue key regex"));

/// 校验并规范化问题 key（转为大写）
pub fn normalize_issue_key(raw: &str) -> AppResult<String> {
    let key = raw.trim();
    if !ISSUE_KEY_RE.is_match(key) {
        return Err(AppError::BadRequest(format!("Invalid issue key: {}", raw)));
    }
    Ok(key.to_uppercase())
}

/// 单个数据源失败时记录日志并返回空列表
fn or_empty<T>(source: &str, issue_key: &str, result: Result<Vec<T>, AtlassianError>) -> Vec<T> {
    result.unwrap_or_else(|e| {
        error!("{} lookup failed for {}: {}", source, issue_key, e);
        Vec::new()
    })
}

/// 上下文聚合服务
#[derive(Clone)]
pub struct ContextService {
    http: Client,
    atlassian_base_url: String,
    ai: AiService,
}

impl ContextService {
    pub fn new(http: Client, atlassian_base_url: impl Into<String>, ai: AiService) -> Self {
        Self {
            http,
            atlassian_base_url: atlassian_base_url.into(),
            ai,
        }
    }

    /// 聚合问题上下文
    pub async fn get_issue_context(
        &self,
        raw_issue_key: &str,
        credentials: Credentials,
    ) -> AppResult<IssueContext> {
        let issue_key = normalize_issue_key(raw_issue_key)?;
        let client = AtlassianClient::new(self.http.clone(), &self.atlassian_base_url, credentials);

        let issue = client
            .get_issue(&issue_key)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Issue {} not found or inaccessible", issue_key))
            })?;
        let project_key = issue.project.clone();

        let (docs, commits, tickets) = tokio::join!(
            client.search_confluence(&issue_key, &project_key),
            client.find_commits(&issue_key, &project_key),
            client.linked_service_tickets(&issue_key),
        );

        let mut ctx = IssueContext::new(issue);
        ctx.confluence_docs = or_empty("Confluence", &issue_key, docs);
        ctx.bitbucket_commits = or_empty("Bitbucket", &issue_key, commits);
        ctx.service_tickets = or_empty("Service desk", &issue_key, tickets);

        info!(
            "Context gathered for {}: docs={}, commits={}, tickets={}",
            issue_key,
            ctx.confluence_docs.len(),
            ctx.bitbucket_commits.len(),
            ctx.service_tickets.len()
        );

        if self.ai.is_enabled() {
            self.ai.enhance_context(&mut ctx).await;
        }

        ctx.ai_enabled = self.ai.is_enabled();
        ctx.last_updated = Utc::now();
        Ok(ctx)
    }
}
