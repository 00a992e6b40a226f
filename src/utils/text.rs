//! 文本处理

/// 按字符数截断，超长时追加省略号
///
/// 按字符而非字节切分，避免截断在 UTF-8 多字节字符中间
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
