//! Atlassian REST API 客户端
//!
//! 通过 Atlassian API 网关访问 Jira、Confluence、Bitbucket，凭据由宿主平台按请求注入。

mod bitbucket;
mod client;
mod confluence;
mod format;
mod jira;
mod types;

pub use client::AtlassianClient;
pub use types::{AtlassianError, Credentials};
