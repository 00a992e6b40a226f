//! 应用配置管理
//!
//! 配置按层叠加：内置默认值 → JSON 配置文件（可选）→ 环境变量。
//! 启动时加载一次，之后作为只读快照放入应用状态。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::AppError;

/// 获取配置文件路径
///
/// 优先使用 `CONFIG_PATH`，否则为可执行文件同级目录下的 config.json
fn get_config_path() -> PathBuf {
    if let Ok(path) = std::env::var("CONFIG_PATH") {
        return PathBuf::from(path);
    }
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("config.json")
}

/// 运行环境
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    #[default]
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" | "local" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(AppError::Config(format!("未知的运行环境: {}", other))),
        }
    }
}

/// 应用配置结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,

    /// 运行环境
    #[serde(default)]
    pub environment: Environment,

    /// 摘要服务 API 密钥，为空时 AI 功能关闭
    #[serde(default)]
    pub api_key: String,

    /// LLM API 基础 URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// 模型名称
    #[serde(default = "default_model")]
    pub model: String,

    /// 温度参数 (0.0 - 2.0)
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Atlassian API 网关地址
    #[serde(default = "default_atlassian_base_url")]
    pub atlassian_base_url: String,

    /// Atlassian 请求超时（秒）
    #[serde(default = "default_upstream_timeout_secs")]
    pub upstream_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_base_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_temperature() -> f64 {
    0.3
}

fn default_atlassian_base_url() -> String {
    "https://api.atlassian.com".to_string()
}

fn default_upstream_timeout_secs() -> u64 {
    30
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            environment: Environment::default(),
            api_key: String::new(),
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            atlassian_base_url: default_atlassian_base_url(),
            upstream_timeout_secs: default_upstream_timeout_secs(),
        }
    }
}

fn parse_var<T: FromStr>(key: &str, value: &str) -> Result<T, AppError> {
    value
        .trim()
        .parse()
        .map_err(|_| AppError::Config(format!("环境变量 {} 的值无效: {}", key, value)))
}

impl AppConfig {
    /// 是否配置了摘要服务
    pub fn ai_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// 用环境变量覆盖配置
    ///
    /// `lookup` 按变量名返回值，便于测试时替换 `std::env::var`
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.port = parse_var("PORT", &port)?;
        }
        if let Some(env) = lookup("APP_ENV").or_else(|| lookup("FLASK_ENV")) {
            self.environment = env.parse()?;
        }
        if let Some(api_key) = lookup("OPENAI_API_KEY") {
            self.api_key = api_key;
        }
        if let Some(base_url) = lookup("OPENAI_BASE_URL") {
            self.base_url = base_url;
        }
        if let Some(model) = lookup("OPENAI_MODEL") {
            self.model = model;
        }
        if let Some(temperature) = lookup("AI_TEMPERATURE") {
            self.temperature = parse_var("AI_TEMPERATURE", &temperature)?;
        }
        if let Some(base) = lookup("ATLASSIAN_API_BASE") {
            self.atlassian_base_url = base;
        }
        if let Some(timeout) = lookup("UPSTREAM_TIMEOUT_SECS") {
            self.upstream_timeout_secs = parse_var("UPSTREAM_TIMEOUT_SECS", &timeout)?;
        }
        Ok(())
    }
}

/// 从文件加载配置
fn load_config_from_file() -> Result<Option<AppConfig>, AppError> {
    let path = get_config_path();
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&path)
        .map_err(|e| AppError::Config(format!("读取配置文件失败 {}: {}", path.display(), e)))?;
    let config = serde_json::from_str(&content)
        .map_err(|e| AppError::Config(format!("解析配置文件失败 {}: {}", path.display(), e)))?;
    Ok(Some(config))
}

/// 加载配置：默认值 → 配置文件 → 环境变量
pub fn load_config() -> Result<AppConfig, AppError> {
    let mut config = load_config_from_file()?.unwrap_or_default();
    config.apply_env(|key| std::env::var(key).ok())?;
    Ok(config)
}
