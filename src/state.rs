//! 应用状态管理
//!
//! 定义在请求处理器之间共享的状态。请求之间不保存任何业务数据，
//! 这里只有只读配置和带连接池的 HTTP 客户端。

use std::sync::Arc;

use crate::atlassian::AtlassianClient;
use crate::config::AppConfig;
use crate::error::AppError;
use crate::services::{AiService, ContextService};

/// 应用共享状态
pub struct AppState {
    /// 启动时加载的配置快照
    pub config: AppConfig,
    /// 摘要服务
    pub ai: AiService,
    /// 上下文聚合服务
    pub context: ContextService,
}

impl AppState {
    /// 根据配置创建应用状态
    pub fn new(config: AppConfig) -> Result<Self, AppError> {
        let http = AtlassianClient::build_http_client(config.upstream_timeout_secs)
            .map_err(|e| AppError::Config(format!("创建 HTTP 客户端失败: {}", e)))?;
        let ai = AiService::new(&config);
        let context = ContextService::new(http, config.atlassian_base_url.clone(), ai.clone());

        Ok(Self {
            config,
            ai,
            context,
        })
    }
}

/// 创建可共享的应用状态
pub fn create_shared_state(config: AppConfig) -> Result<Arc<AppState>, AppError> {
    Ok(Arc::new(AppState::new(config)?))
}
