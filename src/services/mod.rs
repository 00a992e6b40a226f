//! 服务层模块

mod ai_service;
mod context_service;
mod prompt_service;

pub use ai_service::{AiService, DEFAULT_SUMMARY_WORDS, MAX_SUMMARY_WORDS};
pub use context_service::ContextService;
