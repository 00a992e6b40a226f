//! URL 构建工具

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

/// 路径段中需要转义的字符
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// 修复 base_url
///
/// - 移除末尾斜杠
/// - 修复双斜杠（保留协议部分）
pub fn fix_base_url(base_url: &str) -> String {
    let mut url = base_url.trim().trim_end_matches('/').to_string();

    if let Some(pos) = url.find("://") {
        let (protocol, rest) = url.split_at(pos + 3);
        let fixed_rest = rest.replace("//", "/");
        url = format!("{}{}", protocol, fixed_rest);
    }

    url
}

/// 转义单个 URL 路径段
pub fn encode_path_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fix_base_url() {
        assert_eq!(fix_base_url("https://api.atlassian.com/"), "https://api.atlassian.com");
        assert_eq!(fix_base_url("https://api.openai.com//v1"), "https://api.openai.com/v1");
        assert_eq!(fix_base_url("http://127.0.0.1:3000"), "http://127.0.0.1:3000");
    }

    #[test]
    fn test_encode_path_segment() {
        assert_eq!(encode_path_segment("PROJ-42"), "PROJ-42");
        assert_eq!(encode_path_segment("my repo"), "my%20repo");
        assert_eq!(encode_path_segment("a/../b"), "a%2F..%2Fb");
    }
}
