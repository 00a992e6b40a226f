//! Prompt 构建服务
//!
//! 负责构建摘要与上下文分析所需的 LLM 消息，以及解析模型返回的建议列表

use crate::llm::ChatMessage;
use crate::models::IssueContext;
use crate::utils::truncate_chars;

/// 文本摘要系统提示词
const SUMMARIZE_PROMPT: &str = r#"You are a concise technical writer. Summarize the text provided by the user.
- Keep only the facts that matter to an engineer picking up the work.
- Do not add information that is not in the text.
- Reply with the summary only, no preamble.
- Respond in the same language as the text."#;

/// 上下文摘要系统提示词
const CONTEXT_SUMMARY_PROMPT: &str = r#"You help engineers switch context quickly. Given a Jira issue and the documents, commits and service tickets related to it, write a 2-3 sentence overview of where the work stands. Reply with the overview only."#;

/// 下一步建议系统提示词
const SUGGESTIONS_PROMPT: &str = r#"You help engineers switch context quickly. Given a Jira issue and the documents, commits and service tickets related to it, suggest up to 3 concrete next steps. Reply with one suggestion per line and nothing else."#;

/// 摘要输入的最大字符数
const MAX_CONTENT_CHARS: usize = 12000;

/// 上下文摘要中每类条目的最大数量
const MAX_ITEMS_PER_SECTION: usize = 5;

/// 最多保留的建议数
pub const MAX_SUGGESTIONS: usize = 3;

/// Prompt 服务
pub struct PromptService;

impl PromptService {
    /// 创建新的 Prompt 服务
    pub fn new() -> Self {
        Self
    }

    /// 构建文本摘要消息
    pub fn build_summarize_messages(&self, content: &str, max_words: u32) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(SUMMARIZE_PROMPT),
            ChatMessage::system(format!("Use at most {} words.", max_words)),
            ChatMessage::user(truncate_chars(content, MAX_CONTENT_CHARS)),
        ]
    }

    /// 构建上下文概览消息
    pub fn build_context_summary_messages(&self, ctx: &IssueContext) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(CONTEXT_SUMMARY_PROMPT),
            ChatMessage::user(Self::context_digest(ctx)),
        ]
    }

    /// 构建下一步建议消息
    pub fn build_suggestions_messages(&self, ctx: &IssueContext) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(SUGGESTIONS_PROMPT),
            ChatMessage::user(Self::context_digest(ctx)),
        ]
    }

    /// 将聚合结果整理为纯文本，供模型阅读
    pub fn context_digest(ctx: &IssueContext) -> String {
        let issue = &ctx.issue;
        let mut parts = vec![format!(
            "Issue {} [{} / {}]: {}",
            issue.key, issue.issue_type, issue.status, issue.summary
        )];

        if !ctx.confluence_docs.is_empty() {
            let lines: Vec<String> = ctx
                .confluence_docs
                .iter()
                .take(MAX_ITEMS_PER_SECTION)
                .map(|doc| {
                    if doc.excerpt.is_empty() {
                        format!("- {}", doc.title)
                    } else {
                        format!("- {}: {}", doc.title, truncate_chars(&doc.excerpt, 200))
                    }
                })
                .collect();
            parts.push(format!("Related documents:\n{}", lines.join("\n")));
        }

        if !ctx.bitbucket_commits.is_empty() {
            let lines: Vec<String> = ctx
                .bitbucket_commits
                .iter()
                .take(MAX_ITEMS_PER_SECTION)
                .map(|c| {
                    let first_line = c.message.lines().next().unwrap_or_default();
                    format!("- {} ({}): {}", c.repository, c.author, first_line)
                })
                .collect();
            parts.push(format!("Recent commits:\n{}", lines.join("\n")));
        }

        if !ctx.service_tickets.is_empty() {
            let lines: Vec<String> = ctx
                .service_tickets
                .iter()
                .take(MAX_ITEMS_PER_SECTION)
                .map(|t| format!("- {} [{}, {}]: {}", t.key, t.status, t.priority, t.summary))
                .collect();
            parts.push(format!("Linked service tickets:\n{}", lines.join("\n")));
        }

        parts.join("\n\n")
    }

    /// 解析模型返回的建议，每行一条，去掉列表符号与序号
    pub fn parse_suggestions(&self, reply: &str) -> Vec<String> {
        reply
            .lines()
            .map(Self::strip_list_marker)
            .filter(|line| !line.is_empty())
            .take(MAX_SUGGESTIONS)
            .map(str::to_string)
            .collect()
    }

    fn strip_list_marker(line: &str) -> &str {
        let line = line.trim();
        let line = line.trim_start_matches(['-', '*', '•']);
        let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
        let line = if digits > 0 {
            line[digits..].trim_start_matches(['.', ')', ':'])
        } else {
            line
        };
        line.trim()
    }
}

impl Default for PromptService {
    fn default() -> Self {
        Self::new()
    }
}
