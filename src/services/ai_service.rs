//! AI 服务封装
//!
//! 封装 LlmClient，提供文本摘要与问题上下文增强

use tracing::{info, warn};

use super::prompt_service::PromptService;
use crate::config::AppConfig;
use crate::llm::{ChatMessage, ChatOptions, LlmClient, LlmError};
use crate::models::IssueContext;

/// 默认摘要词数
pub const DEFAULT_SUMMARY_WORDS: u32 = 100;
/// 摘要词数上限
pub const MAX_SUMMARY_WORDS: u32 = 1000;

/// 上下文概览的 token 上限
const CONTEXT_SUMMARY_TOKENS: u32 = 200;
/// 建议列表的 token 上限
const SUGGESTIONS_TOKENS: u32 = 150;

/// 摘要词数对应的 token 上限，留出余量
fn tokens_for_words(max_words: u32) -> u32 {
    max_words.saturating_mul(2).saturating_add(50)
}

/// AI 服务
#[derive(Clone)]
pub struct AiService {
    client: Option<LlmClient>,
    model: String,
    temperature: f64,
}

impl AiService {
    /// 根据配置创建 AI 服务，未配置 API 密钥时服务处于关闭状态
    pub fn new(config: &AppConfig) -> Self {
        let client = if config.ai_configured() {
            match LlmClient::new(&config.api_key, &config.base_url) {
                Ok(client) => Some(client),
                Err(e) => {
                    warn!("AI service disabled: {}", e);
                    None
                }
            }
        } else {
            None
        };

        Self {
            client,
            model: config.model.clone(),
            temperature: config.temperature,
        }
    }

    /// 创建关闭状态的 AI 服务
    #[cfg(test)]
    pub fn disabled() -> Self {
        Self {
            client: None,
            model: String::new(),
            temperature: 0.0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.client.is_some()
    }

    async fn complete(&self, messages: Vec<ChatMessage>, max_tokens: u32) -> Result<String, LlmError> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| LlmError::ConfigError("AI service not configured".to_string()))?;

        let options = ChatOptions {
            temperature: Some(self.temperature),
            max_tokens: Some(max_tokens),
        };

        let completion = client.complete(&messages, &self.model, &options).await?;
        Ok(completion.content.trim().to_string())
    }

    /// 文本摘要
    ///
    /// 空白文本直接返回空摘要，不调用模型
    pub async fn summarize_text(&self, content: &str, max_words: u32) -> Result<String, LlmError> {
        if !self.is_enabled() {
            return Err(LlmError::ConfigError("AI service not configured".to_string()));
        }
        if content.trim().is_empty() {
            return Ok(String::new());
        }

        let messages = PromptService::new().build_summarize_messages(content, max_words);
        self.complete(messages, tokens_for_words(max_words)).await
    }

    /// 为问题上下文补充 AI 概览与下一步建议
    ///
    /// 两个请求并发执行，失败时对应字段保持为空
    pub async fn enhance_context(&self, ctx: &mut IssueContext) {
        if !self.is_enabled() {
            return;
        }

        let prompt_service = PromptService::new();
        let summary_messages = prompt_service.build_context_summary_messages(ctx);
        let suggestion_messages = prompt_service.build_suggestions_messages(ctx);

        let (summary, suggestions) = tokio::join!(
            self.complete(summary_messages, CONTEXT_SUMMARY_TOKENS),
            self.complete(suggestion_messages, SUGGESTIONS_TOKENS),
        );

        match summary {
            Ok(text) if !text.is_empty() => ctx.ai_summary = Some(text),
            Ok(_) => {}
            Err(e) => warn!("AI summary failed for {}: {}", ctx.issue.key, e),
        }

        match suggestions {
            Ok(text) => {
                let parsed = prompt_service.parse_suggestions(&text);
                if !parsed.is_empty() {
                    ctx.ai_suggestions = Some(parsed);
                }
            }
            Err(e) => warn!("AI suggestions failed for {}: {}", ctx.issue.key, e),
        }

        info!(
            "AI enhancement done for {}: summary={}, suggestions={}",
            ctx.issue.key,
            ctx.ai_summary.is_some(),
            ctx.ai_suggestions.as_ref().map_or(0, Vec::len)
        );
    }
}
