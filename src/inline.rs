//! Inline formatting for single lines of text.
//!
//! Four independent substitutions run in a fixed order: code spans, bold,
//! italic, links. There is no escape syntax, so a literal `*` or backtick
//! cannot be produced, and text outside code fences passes through without
//! HTML escaping.

use std::sync::LazyLock;

use regex::Regex;

static CODE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`]+)`").unwrap());
static BOLD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*([^*]+)\*\*").unwrap());
static ITALIC_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*([^*]+)\*").unwrap());
static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").unwrap());

/// Apply inline formatting to one line of text.
pub fn format_inline(text: &str) -> String {
    let text = CODE_RE.replace_all(text, "<code>${1}</code>");
    let text = BOLD_RE.replace_all(&text, "<strong>${1}</strong>");
    let text = ITALIC_RE.replace_all(&text, "<em>${1}</em>");
    LINK_RE
        .replace_all(&text, r#"<a href="${2}">${1}</a>"#)
        .into_owned()
}

/// Escape the five HTML-significant characters.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(ch),
        }
    }
    out
}
