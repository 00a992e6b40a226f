//! Bitbucket 中提及问题的提交

use chrono::{DateTime, Utc};
use futures::future::join_all;
use tracing::warn;

use super::client::AtlassianClient;
use super::format::{bitbucket_commits_url, bitbucket_repos_url};
use super::types::{AtlassianError, BitbucketPage, BitbucketRawCommit, BitbucketRepo};
use crate::models::BitbucketCommit;

/// 最多检查的仓库数
const MAX_REPOS: usize = 3;
/// 每个仓库拉取的提交数
const COMMITS_PER_REPO: usize = 50;
/// 返回的最大提交数
const MAX_COMMITS: usize = 15;

/// 提交信息是否提及问题 key（忽略大小写）
pub fn mentions_issue(message: &str, issue_key: &str) -> bool {
    message.to_uppercase().contains(&issue_key.to_uppercase())
}

fn into_commit(raw: BitbucketRawCommit, repo: &BitbucketRepo) -> BitbucketCommit {
    let author = raw
        .author
        .and_then(|a| a.display_name.or(a.name))
        .unwrap_or_else(|| "Unknown".to_string());

    BitbucketCommit {
        id: raw.id,
        message: raw.message,
        author,
        author_timestamp: raw.author_timestamp,
        committed_at: DateTime::<Utc>::from_timestamp_millis(raw.author_timestamp),
        repository: repo.name.clone().unwrap_or_else(|| repo.slug.clone()),
        repo_slug: repo.slug.clone(),
    }
}

impl AtlassianClient {
    /// 单个仓库中提及问题的提交
    async fn repo_commits(
        &self,
        project_key: &str,
        repo: &BitbucketRepo,
        issue_key: &str,
    ) -> Result<Vec<BitbucketCommit>, AtlassianError> {
        let url = bitbucket_commits_url(self.base_url(), self.cloud_id(), project_key, &repo.slug);
        let query = [("limit", COMMITS_PER_REPO.to_string())];
        let page: Option<BitbucketPage<BitbucketRawCommit>> = self.get_json(&url, &query).await?;

        Ok(page
            .map(|p| p.values)
            .unwrap_or_default()
            .into_iter()
            .filter(|c| mentions_issue(&c.message, issue_key))
            .map(|c| into_commit(c, repo))
            .collect())
    }

    /// 在项目的前几个仓库中查找提及问题的提交
    pub async fn find_commits(
        &self,
        issue_key: &str,
        project_key: &str,
    ) -> Result<Vec<BitbucketCommit>, AtlassianError> {
        let url = bitbucket_repos_url(self.base_url(), self.cloud_id(), project_key);
        let Some(repos) = self.get_json::<BitbucketPage<BitbucketRepo>>(&url, &[]).await? else {
            return Ok(Vec::new());
        };

        let repos: Vec<BitbucketRepo> = repos.values.into_iter().take(MAX_REPOS).collect();
        let lookups = repos
            .iter()
            .map(|repo| self.repo_commits(project_key, repo, issue_key));
        let results = join_all(lookups).await;

        let mut commits = Vec::new();
        for (repo, result) in repos.iter().zip(results) {
            match result {
                Ok(found) => commits.extend(found),
                Err(e) => warn!("Bitbucket commits failed for repo {}: {}", repo.slug, e),
            }
        }

        commits.truncate(MAX_COMMITS);
        Ok(commits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlassian::Credentials;
    use crate::test_support::spawn_mock;
    use axum::{extract::Path, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
    use serde_json::json;

    fn client(base: &str) -> AtlassianClient {
        AtlassianClient::new(
            reqwest::Client::new(),
            base,
            Credentials {
                token: "tok".to_string(),
                cloud_id: "cloud".to_string(),
            },
        )
    }

    #[test]
    fn test_mentions_issue() {
        assert!(mentions_issue("PROJ-1: fix login", "PROJ-1"));
        assert!(mentions_issue("fix login (proj-1)", "PROJ-1"));
        assert!(!mentions_issue("fix PROJ-2", "PROJ-1"));
    }

    #[tokio::test]
    async fn test_find_commits() {
        let router = Router::new()
            .route(
                "/ex/bitbucket/cloud/rest/api/1.0/projects/PROJ/repos",
                get(|| async {
                    Json(json!({"values": [
                        {"slug": "api", "name": "API"},
                        {"slug": "web", "name": "Web"},
                        {"slug": "broken", "name": "Broken"},
                        {"slug": "ignored", "name": "Ignored"}
                    ]}))
                }),
            )
            .route(
                "/ex/bitbucket/cloud/rest/api/1.0/projects/PROJ/repos/:slug/commits",
                get(|Path(slug): Path<String>| async move {
                    match slug.as_str() {
                        "api" => Json(json!({"values": [
                            {"id": "a1", "message": "PROJ-1 add endpoint",
                             "author": {"displayName": "Ada"}, "authorTimestamp": 1700000000000i64},
                            {"id": "a2", "message": "unrelated", "authorTimestamp": 1700000000000i64}
                        ]}))
                        .into_response(),
                        "web" => Json(json!({"values": [
                            {"id": "w1", "message": "proj-1 wire up UI", "authorTimestamp": 1700000001000i64}
                        ]}))
                        .into_response(),
                        "ignored" => Json(json!({"values": [
                            {"id": "i1", "message": "PROJ-1 beyond the repo limit", "authorTimestamp": 1700000002000i64}
                        ]}))
                        .into_response(),
                        _ => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
                    }
                }),
            );
        let base = spawn_mock(router).await;

        let commits = client(&base).find_commits("PROJ-1", "PROJ").await.unwrap();
        let ids: Vec<_> = commits.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a1", "w1"]);
        assert_eq!(commits[0].author, "Ada");
        assert_eq!(commits[0].repository, "API");
        assert_eq!(commits[1].author, "Unknown");
        assert_eq!(
            commits[0].committed_at.map(|t| t.timestamp()),
            Some(1_700_000_000)
        );
    }

    #[tokio::test]
    async fn test_find_commits_without_project() {
        let base = spawn_mock(Router::new()).await;
        let commits = client(&base).find_commits("NOPE-1", "NOPE").await.unwrap();
        assert!(commits.is_empty());
    }

    #[tokio::test]
    async fn test_find_commits_truncated() {
        let router = Router::new()
            .route(
                "/ex/bitbucket/cloud/rest/api/1.0/projects/PROJ/repos",
                get(|| async { Json(json!({"values": [{"slug": "api"}]})) }),
            )
            .route(
                "/ex/bitbucket/cloud/rest/api/1.0/projects/PROJ/repos/api/commits",
                get(|| async {
                    let values: Vec<_> = (0..30)
                        .map(|i| json!({"id": format!("c{}", i), "message": "PROJ-1 step"}))
                        .collect();
                    Json(json!({"values": values}))
                }),
            );
        let base = spawn_mock(router).await;

        let commits = client(&base).find_commits("PROJ-1", "PROJ").await.unwrap();
        assert_eq!(commits.len(), MAX_COMMITS);
        assert_eq!(commits[0].repository, "api");
    }
}
