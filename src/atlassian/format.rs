//! Atlassian API 网关 URL 与 CQL 构建

use crate::utils::{encode_path_segment, fix_base_url};

/// Jira 问题详情
pub fn jira_issue_url(base_url: &str, cloud_id: &str, issue_key: &str) -> String {
    format!(
        "{}/ex/jira/{}/rest/api/3/issue/{}",
        fix_base_url(base_url),
        encode_path_segment(cloud_id),
        encode_path_segment(issue_key)
    )
}

/// Confluence 内容搜索
pub fn confluence_search_url(base_url: &str, cloud_id: &str) -> String {
    format!(
        "{}/ex/confluence/{}/rest/api/content/search",
        fix_base_url(base_url),
        encode_path_segment(cloud_id)
    )
}

/// Bitbucket 项目下的仓库列表
pub fn bitbucket_repos_url(base_url: &str, cloud_id: &str, project_key: &str) -> String {
    format!(
        "{}/ex/bitbucket/{}/rest/api/1.0/projects/{}/repos",
        fix_base_url(base_url),
        encode_path_segment(cloud_id),
        encode_path_segment(project_key)
    )
}

/// Bitbucket 仓库提交列表
pub fn bitbucket_commits_url(
    base_url: &str,
    cloud_id: &str,
    project_key: &str,
    repo_slug: &str,
) -> String {
    format!(
        "{}/{}/commits",
        bitbucket_repos_url(base_url, cloud_id, project_key),
        encode_path_segment(repo_slug)
    )
}

/// 转义 CQL 字符串字面量
fn escape_cql(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// 搜索相关文档的 CQL 查询：问题 key 精确短语、问题 key 词项、项目 key
pub fn confluence_queries(issue_key: &str, project_key: &str) -> Vec<String> {
    let key = escape_cql(issue_key);
    vec![
        format!("text ~ \"\\\"{}\\\"\"", key),
        format!("text ~ \"{}\"", key),
        format!("text ~ \"{}\"", escape_cql(project_key)),
    ]
}
