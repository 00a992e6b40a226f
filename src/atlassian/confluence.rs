//! Confluence 相关文档搜索

use futures::future::join_all;
use std::collections::HashSet;
use tracing::warn;

use super::client::AtlassianClient;
use super::format::{confluence_queries, confluence_search_url};
use super::types::{AtlassianError, ConfluenceSearch};
use crate::models::ConfluenceDoc;

/// 每个查询返回的最大条数
const SEARCH_LIMIT: usize = 10;
/// 合并后保留的最大文档数
const MAX_DOCS: usize = 8;

/// 拼接文档的网页链接
fn doc_url(base: Option<&str>, webui: Option<&str>) -> String {
    match (base, webui) {
        (Some(base), Some(webui)) => format!("{}{}", base.trim_end_matches('/'), webui),
        (None, Some(webui)) => webui.to_string(),
        _ => String::new(),
    }
}

/// 按 id 去重（保留首次出现的顺序）并截断
pub fn dedup_docs(docs: Vec<ConfluenceDoc>, limit: usize) -> Vec<ConfluenceDoc> {
    let mut seen = HashSet::new();
    docs.into_iter()
        .filter(|doc| seen.insert(doc.id.clone()))
        .take(limit)
        .collect()
}

fn into_docs(search: ConfluenceSearch) -> Vec<ConfluenceDoc> {
    let base = search.links.and_then(|l| l.base);
    search
        .results
        .into_iter()
        .map(|content| {
            let webui = content.links.and_then(|l| l.webui);
            ConfluenceDoc {
                url: doc_url(base.as_deref(), webui.as_deref()),
                id: content.id,
                title: content.title,
                doc_type: content.content_type,
                excerpt: content.excerpt.unwrap_or_default(),
                last_modified: content.version.and_then(|v| v.when).unwrap_or_default(),
            }
        })
        .collect()
}

impl AtlassianClient {
    /// 搜索与问题相关的 Confluence 文档
    ///
    /// 多个查询并发执行，单个查询失败时跳过；全部失败才返回错误
    pub async fn search_confluence(
        &self,
        issue_key: &str,
        project_key: &str,
    ) -> Result<Vec<ConfluenceDoc>, AtlassianError> {
        let url = confluence_search_url(self.base_url(), self.cloud_id());
        let queries = confluence_queries(issue_key, project_key);

        let searches = queries.into_iter().map(|cql| {
            let url = url.clone();
            async move {
                let query = [("cql", cql), ("limit", SEARCH_LIMIT.to_string())];
                self.get_json::<ConfluenceSearch>(&url, &query).await
            }
        });
        let results = join_all(searches).await;

        let mut docs = Vec::new();
        let mut first_error = None;
        let mut any_ok = false;
        for result in results {
            match result {
                Ok(Some(search)) => {
                    any_ok = true;
                    docs.extend(into_docs(search));
                }
                Ok(None) => any_ok = true,
                Err(e) => {
                    warn!("Confluence search failed: {}", e);
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }

        match first_error {
            Some(e) if !any_ok => Err(e),
            _ => Ok(dedup_docs(docs, MAX_DOCS)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlassian::Credentials;
    use crate::test_support::spawn_mock;
    use axum::{extract::Query, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
    use serde_json::json;
    use std::collections::HashMap;

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

    fn doc(id: &str) -> ConfluenceDoc {
        ConfluenceDoc {
            id: id.to_string(),
            title: format!("Doc {}", id),
            doc_type: "page".to_string(),
            url: String::new(),
            excerpt: String::new(),
            last_modified: String::new(),
        }
    }

    #[test]
    fn test_dedup_docs() {
        let docs = vec![doc("1"), doc("2"), doc("1"), doc("3"), doc("2")];
        let ids: Vec<_> = dedup_docs(docs, 8).into_iter().map(|d| d.id).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_dedup_docs_limit() {
        let docs = (0..20).map(|i| doc(&i.to_string())).collect();
        assert_eq!(dedup_docs(docs, MAX_DOCS).len(), MAX_DOCS);
    }

    #[test]
    fn test_doc_url() {
        assert_eq!(
            doc_url(Some("https://site.atlassian.net/wiki/"), Some("/spaces/X/pages/1")),
            "https://site.atlassian.net/wiki/spaces/X/pages/1"
        );
        assert_eq!(doc_url(None, Some("/pages/1")), "/pages/1");
        assert_eq!(doc_url(Some("https://x"), None), "");
    }

    #[tokio::test]
    async fn test_search_merges_queries() {
        let router = Router::new().route(
            "/ex/confluence/cloud/rest/api/content/search",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                let cql = params.get("cql").cloned().unwrap_or_default();
                let ids: Vec<&str> = if cql.contains("\\\"PROJ-1\\\"") {
                    vec!["1", "2"]
                } else if cql.contains("PROJ-1") {
                    vec!["2", "3"]
                } else {
                    vec!["4"]
                };
                let results: Vec<_> = ids
                    .into_iter()
                    .map(|id| json!({
                        "id": id,
                        "title": format!("Page {}", id),
                        "type": "page",
                        "version": {"when": "2024-01-01T00:00:00.000Z"},
                        "_links": {"webui": format!("/pages/{}", id)}
                    }))
                    .collect();
                Json(json!({"results": results, "_links": {"base": "https://site/wiki"}}))
            }),
        );
        let base = spawn_mock(router).await;

        let docs = client(&base).search_confluence("PROJ-1", "PROJ").await.unwrap();
        let ids: Vec<_> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4"]);
        assert_eq!(docs[0].url, "https://site/wiki/pages/1");
        assert_eq!(docs[0].last_modified, "2024-01-01T00:00:00.000Z");
    }

    #[tokio::test]
    async fn test_search_skips_failed_query() {
        let router = Router::new().route(
            "/ex/confluence/cloud/rest/api/content/search",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                let cql = params.get("cql").cloned().unwrap_or_default();
                if !cql.contains("PROJ-1") {
                    return StatusCode::SERVICE_UNAVAILABLE.into_response();
                }
                let id = if cql.contains("\\\"PROJ-1\\\"") { "1" } else { "2" };
                Json(json!({"results": [{"id": id, "title": "Page", "type": "page"}]}))
                    .into_response()
            }),
        );
        let base = spawn_mock(router).await;

        let docs = client(&base).search_confluence("PROJ-1", "PROJ").await.unwrap();
        let ids: Vec<_> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[tokio::test]
    async fn test_search_all_failed() {
        let router = Router::new().route(
            "/ex/confluence/cloud/rest/api/content/search",
            get(|| async { StatusCode::SERVICE_UNAVAILABLE.into_response() }),
        );
        let base = spawn_mock(router).await;

        let err = client(&base).search_confluence("PROJ-1", "PROJ").await.unwrap_err();
        assert!(matches!(err, AtlassianError::Status { status: 503, .. }));
    }
}
