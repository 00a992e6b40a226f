//! Jira 问题与关联服务工单

use super::client::AtlassianClient;
use super::format::jira_issue_url;
use super::types::{AtlassianError, JiraFields, JiraIssue, Named};
use crate::models::{IssueInfo, ServiceTicket};

/// 被视为服务管理工单的问题类型关键字
const SERVICE_TYPE_KEYWORDS: [&str; 4] = ["service", "request", "incident", "problem"];

fn name_or(named: Option<&Named>, fallback: &str) -> String {
    named
        .map(|n| n.name.clone())
        .unwrap_or_else(|| fallback.to_string())
}

/// 问题类型名称是否属于服务管理工单
pub fn is_service_ticket_type(issue_type: &str) -> bool {
    let lower = issue_type.to_lowercase();
    SERVICE_TYPE_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

/// 从问题 key 推导项目 key（"PROJ-42" → "PROJ"）
fn project_from_key(issue_key: &str) -> String {
    issue_key
        .rsplit_once('-')
        .map(|(project, _)| project.to_string())
        .unwrap_or_else(|| issue_key.to_string())
}

fn issue_info(issue_key: &str, fields: JiraFields) -> IssueInfo {
    IssueInfo {
        key: issue_key.to_string(),
        summary: fields.summary.unwrap_or_default(),
        project: fields
            .project
            .map(|p| p.key)
            .unwrap_or_else(|| project_from_key(issue_key)),
        status: name_or(fields.status.as_ref(), "Unknown"),
        issue_type: name_or(fields.issuetype.as_ref(), "Unknown"),
    }
}

impl AtlassianClient {
    /// 获取问题基本信息，问题不存在或无权访问时返回 `None`
    pub async fn get_issue(&self, issue_key: &str) -> Result<Option<IssueInfo>, AtlassianError> {
        let url = jira_issue_url(self.base_url(), self.cloud_id(), issue_key);
        let issue: Option<JiraIssue> = self.get_json(&url, &[]).await?;
        Ok(issue.map(|issue| issue_info(issue_key, issue.fields)))
    }

    /// 获取通过问题链接关联的服务管理工单
    pub async fn linked_service_tickets(
        &self,
        issue_key: &str,
    ) -> Result<Vec<ServiceTicket>, AtlassianError> {
        let url = jira_issue_url(self.base_url(), self.cloud_id(), issue_key);
        let query = [("fields", "issuelinks,project".to_string())];
        let Some(issue) = self.get_json::<JiraIssue>(&url, &query).await? else {
            return Ok(Vec::new());
        };

        let tickets = issue
            .fields
            .issuelinks
            .into_iter()
            .filter_map(|link| link.outward_issue.or(link.inward_issue))
            .filter_map(|linked| {
                let issue_type = name_or(linked.fields.issuetype.as_ref(), "");
                if !is_service_ticket_type(&issue_type) {
                    return None;
                }
                Some(ServiceTicket {
                    key: linked.key,
                    summary: linked.fields.summary.unwrap_or_default(),
                    status: name_or(linked.fields.status.as_ref(), "Unknown"),
                    issue_type,
                    priority: name_or(linked.fields.priority.as_ref(), "Not set"),
                })
            })
            .collect();

        Ok(tickets)
    }
}
