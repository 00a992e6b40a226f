//! 通用工具

mod text;
mod url;

pub use text::truncate_chars;
pub use url::{encode_path_segment, fix_base_url};
