//! Sanitized text extraction from HTML.
//!
//! The analyzer receives a bounded plain-text rendition of the page rather
//! than raw markup: executable and styling subtrees dropped, tags stripped,
//! whitespace collapsed, length capped.

use regex::Regex;
use scraper::Html;
use std::sync::OnceLock;

/// Default character bound applied to extracted content.
pub const DEFAULT_MAX_CONTENT_CHARS: usize = 8000;

/// Subtrees whose text must never reach the analyzer.
const DROPPED_ELEMENTS: &[&str] = &["script", "style", "noscript"];

fn dropped_block_patterns() -> &'static Vec<Regex> {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        DROPPED_ELEMENTS
            .iter()
            .map(|tag| {
                Regex::new(&format!(r"(?is)<{tag}\b[^>]*>.*?</{tag}\s*>"))
                    .expect("dropped-element pattern compiles")
            })
            .collect()
    })
}

/// Extracts analyzer-ready text from an HTML document.
///
/// Script, style, and noscript subtrees are removed before parsing, the
/// remaining text nodes are joined, whitespace runs collapse to single
/// spaces, and the result is truncated to `max_chars` characters.
#[must_use]
pub fn extract_text(html: &str, max_chars: usize) -> String {
    let mut cleaned = html.to_string();
    for pattern in dropped_block_patterns() {
        cleaned = pattern.replace_all(&cleaned, " ").into_owned();
    }

    let document = Html::parse_document(&cleaned);
    let text: Vec<&str> = document.root_element().text().collect();

    let collapsed = text
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    if collapsed.chars().count() <= max_chars {
        collapsed
    } else {
        collapsed.chars().take(max_chars).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_tags() {
        let text = extract_text(
            "<html><head><title>Title</title></head><body><p>Hello <b>world</b></p></body></html>",
            100,
        );
        assert_eq!(text, "Title Hello world");
    }

    #[test]
    fn test_drops_script_and_style_content() {
        let text = extract_text(
            "<html><body><script>var secret = 1;</script><style>.x{color:red}</style>Visible</body></html>",
            100,
        );
        assert_eq!(text, "Visible");
    }

    #[test]
    fn test_drops_noscript_content() {
        let text = extract_text(
            "<html><body><noscript>fallback</noscript>Main</body></html>",
            100,
        );
        assert_eq!(text, "Main");
    }

    #[test]
    fn test_collapses_whitespace() {
        let text = extract_text(
            "<html><body><p>one</p>\n\n\t  <p>two\n three</p></body></html>",
            100,
        );
        assert_eq!(text, "one two three");
    }

    #[test]
    fn test_truncates_to_bound() {
        let body = "word ".repeat(100);
        let html = format!("<html><body>{body}</body></html>");
        let text = extract_text(&html, 20);
        assert_eq!(text.chars().count(), 20);
    }

    #[test]
    fn test_case_insensitive_script_removal() {
        let text = extract_text(
            "<html><body><SCRIPT>hidden()</SCRIPT>Shown</body></html>",
            100,
        );
        assert_eq!(text, "Shown");
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(extract_text("", 100), "");
        assert_eq!(extract_text("<html><body></body></html>", 100), "");
    }
}
