//! 逐行扫描 SQL 文本，去掉注释行和空行。
//!
//! 规则：
//! - 真正的空行丢弃；只含空白的行保留（属于 SQL 排版）
//! - 以 `--` 开头（忽略前导空白）的行丢弃
//! - 以 `/*` 开头的行、块注释内部的行、以及 `*/` 所在的行丢弃；
//!   `*/` 之后若还有非空白内容，保留这部分内容
//! - 其余行原样保留，语句中间的行内注释不处理

use std::io::BufRead;

use once_cell::sync::Lazy;
use regex::Regex;

static LINE_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*--").expect("valid regex"));
static BLOCK_OPEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*/\*").expect("valid regex"));

#[cfg(windows)]
pub const LINE_SEPARATOR: &str = "\r\n";
#[cfg(not(windows))]
pub const LINE_SEPARATOR: &str = "\n";

#[derive(Debug, Default)]
pub struct CommentStripper {
    in_block: bool,
}

impl CommentStripper {
    pub fn new() -> Self {
        Self::default()
    }

    /// 处理一行，返回需要保留的部分
    pub fn filter<'a>(&mut self, line: &'a str) -> Option<&'a str> {
        let mut rest = line;
        // 本行是否已经吃掉过注释；注释剩下的空白不算排版
        let mut consumed = false;
        loop {
            if self.in_block {
                let end = rest.find("*/")?;
                self.in_block = false;
                consumed = true;
                rest = &rest[end + 2..];
                continue;
            }
            if rest.is_empty() || (consumed && rest.trim().is_empty()) {
                return None;
            }
            if LINE_COMMENT.is_match(rest) {
                return None;
            }
            match BLOCK_OPEN.find(rest) {
                Some(m) => {
                    self.in_block = true;
                    rest = &rest[m.end()..];
                }
                None => return Some(rest),
            }
        }
    }
}

/// 读取整个流并返回去掉注释后的文本；读取中途出错则整体失败
pub fn strip_comments<R: BufRead>(reader: R) -> std::io::Result<String> {
    let mut stripper = CommentStripper::new();
    let mut kept = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if let Some(s) = stripper.filter(&line) {
            kept.push(s.to_string());
        }
    }
    Ok(kept.join(LINE_SEPARATOR))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip(text: &str) -> String {
        strip_comments(text.as_bytes()).unwrap()
    }

    #[test]
    fn removes_line_and_block_comments() {
        let text = "-- a comment\nSELECT * FROM users\n/* block\n   comment */\nWHERE id = 1\n";
        assert_eq!(
            strip(text),
            ["SELECT * FROM users", "WHERE id = 1"].join(LINE_SEPARATOR)
        );
    }

    #[test]
    fn drops_empty_lines_but_keeps_whitespace_lines() {
        let text = "SELECT id\n\n   \n    FROM users\n";
        assert_eq!(
            strip(text),
            ["SELECT id", "   ", "    FROM users"].join(LINE_SEPARATOR)
        );
        assert_eq!(
            strip("SELECT 1\n    \nFROM t"),
            ["SELECT 1", "    ", "FROM t"].join(LINE_SEPARATOR)
        );
    }

    #[test]
    fn whitespace_left_after_comment_is_dropped() {
        assert_eq!(strip("/* header */   \nSELECT 1"), "SELECT 1");
        assert_eq!(strip("/* a\n b */  \nSELECT 1"), "SELECT 1");
    }

    #[test]
    fn many_block_comments_on_one_line() {
        let line = "/* */".repeat(100_000);
        assert_eq!(strip(&format!("{line}\nSELECT 1")), "SELECT 1");
        assert_eq!(strip(&format!("{line} SELECT 2")), " SELECT 2");
    }

    #[test]
    fn line_comment_after_block_close_is_dropped() {
        assert_eq!(strip("/* a */ -- b\nSELECT 1"), "SELECT 1");
    }

    #[test]
    fn single_line_block_comment_is_dropped() {
        assert_eq!(strip("/* header */\nSELECT 1"), "SELECT 1");
    }

    #[test]
    fn keeps_text_after_block_close() {
        assert_eq!(strip("/* a\n b */ SELECT 1"), " SELECT 1");
    }

    #[test]
    fn inline_comments_are_left_alone() {
        let text = "SELECT a -- trailing\nFROM t /* inline */";
        assert_eq!(
            strip(text),
            ["SELECT a -- trailing", "FROM t /* inline */"].join(LINE_SEPARATOR)
        );
    }

    #[test]
    fn indented_line_comment_is_dropped() {
        assert_eq!(strip("   -- note\nSELECT 1"), "SELECT 1");
    }

    #[test]
    fn unterminated_block_swallows_rest() {
        assert_eq!(strip("SELECT 1\n/* never closed\nSELECT 2"), "SELECT 1");
    }

    #[test]
    fn empty_input_yields_empty_string() {
        assert_eq!(strip(""), "");
        assert_eq!(strip("-- only a comment\n"), "");
    }
}
