//! Text normalization shared by every export format.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

/// Legacy inline break markup: `<br>`, `<br/>`, `<br />` in any case.
static BREAK_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("break marker pattern is valid"));

/// Characters with meaning in GIFT syntax.
pub const GIFT_RESERVED: [char; 6] = ['~', '=', '#', '{', '}', ':'];

/// Replace break markers with real newlines.
pub fn normalize_breaks(text: &str) -> Cow<'_, str> {
    BREAK_MARKER.replace_all(text, "\n")
}

/// Replace break markers with single spaces. Real newlines are left alone.
pub fn breaks_to_spaces(text: &str) -> Cow<'_, str> {
    BREAK_MARKER.replace_all(text, " ")
}

/// Render text as one physical line: markers and newlines become spaces, ends trimmed.
pub fn single_line(text: &str) -> String {
    breaks_to_spaces(text).replace('\n', " ").trim().to_string()
}

/// Normalize breaks, then prefix every GIFT reserved character with one backslash.
///
/// Single pass only: an existing backslash is not treated as an escape.
pub fn gift_escape(text: &str) -> String {
    let normalized = normalize_breaks(text);
    let mut out = String::with_capacity(normalized.len() + 8);
    for ch in normalized.chars() {
        if GIFT_RESERVED.contains(&ch) {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Escape the characters HTML would otherwise interpret as markup.
pub fn html_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Multi-line HTML rendering: markers are normalized, the text escaped, and
/// every newline emitted as `<br/>`.
pub fn html_multiline(text: &str) -> String {
    html_escape(&normalize_breaks(text)).replace('\n', "<br/>")
}

/// Inline HTML rendering for option labels: markers become spaces.
pub fn html_inline(text: &str) -> String {
    html_escape(&breaks_to_spaces(text))
}
