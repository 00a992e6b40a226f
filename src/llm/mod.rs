//! LLM 模块
//!
//! 摘要服务使用的非流式 LLM 客户端，按模型名称在 OpenAI 与 Anthropic 两种 API 格式间切换。

mod anthropic;
mod client;
mod format;
mod openai;
mod types;

pub use client::LlmClient;
pub use types::{ChatMessage, ChatOptions, LlmError};
