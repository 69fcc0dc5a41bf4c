//! JSON-LD injection into HTML responses.

use thiserror::Error;

use crate::analyzer::JsonLd;

/// Rewrite failures; the caller falls back to the unmodified response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RewriteError {
    /// The document has no closing `</head>` tag.
    #[error("document has no </head> tag")]
    NoHead,

    /// The body is not valid UTF-8 text.
    #[error("document body is not UTF-8 text")]
    NotText,
}

/// Inserts a `<script type="application/ld+json">` element as the last child
/// of `<head>`, leaving every other byte of the document untouched.
pub fn inject_json_ld(html: &str, document: &JsonLd) -> Result<String, RewriteError> {
    let close = find_head_close(html).ok_or(RewriteError::NoHead)?;
    let script = format!(
        r#"<script type="application/ld+json">{}</script>"#,
        document.to_compact_string()
    );

    let mut out = String::with_capacity(html.len() + script.len());
    out.push_str(&html[..close]);
    out.push_str(&script);
    out.push_str(&html[close..]);
    Ok(out)
}

/// Rewrites a raw response body, requiring UTF-8 text.
pub fn inject_into_body(body: &[u8], document: &JsonLd) -> Result<Vec<u8>, RewriteError> {
    let text = std::str::from_utf8(body).map_err(|_| RewriteError::NotText)?;
    inject_json_ld(text, document).map(String::into_bytes)
}

/// Byte offset of the first case-insensitive `</head>`.
fn find_head_close(html: &str) -> Option<usize> {
    // ASCII lowercasing preserves byte offsets.
    html.to_ascii_lowercase().find("</head>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn document() -> JsonLd {
        JsonLd::new(json!({
            "@context": "https://schema.org",
            "@type": "WebPage",
        }))
        .unwrap()
    }

    #[test]
    fn test_injects_before_head_close() {
        let html = "<html><head><title>T</title></head><body>B</body></html>";
        let rewritten = inject_json_ld(html, &document()).unwrap();

        let expected = format!(
            "<html><head><title>T</title><script type=\"application/ld+json\">{}</script></head><body>B</body></html>",
            document().to_compact_string()
        );
        assert_eq!(rewritten, expected);
    }

    #[test]
    fn test_injects_exactly_one_script() {
        let html = "<html><head></head><body></body></html>";
        let rewritten = inject_json_ld(html, &document()).unwrap();
        assert_eq!(rewritten.matches("application/ld+json").count(), 1);
    }

    #[test]
    fn test_preserves_all_other_bytes() {
        let html = "<html>\n<head>\n  <meta charset=\"utf-8\">\n</head>\n<body>\u{e9}\u{4e16}</body>\n</html>";
        let rewritten = inject_json_ld(html, &document()).unwrap();

        let script = format!(
            r#"<script type="application/ld+json">{}</script>"#,
            document().to_compact_string()
        );
        assert_eq!(rewritten.replacen(&script, "", 1), html);
    }

    #[test]
    fn test_case_insensitive_head_match() {
        let html = "<HTML><HEAD></HEAD><BODY></BODY></HTML>";
        let rewritten = inject_json_ld(html, &document()).unwrap();
        assert!(rewritten.contains("application/ld+json"));
        assert!(rewritten.contains("</HEAD>"));
    }

    #[test]
    fn test_missing_head_is_an_error() {
        assert_eq!(
            inject_json_ld("<html><body>no head</body></html>", &document()),
            Err(RewriteError::NoHead)
        );
    }

    #[test]
    fn test_non_utf8_body_is_an_error() {
        let body = [0x3c, 0x68, 0xff, 0xfe];
        assert_eq!(
            inject_into_body(&body, &document()),
            Err(RewriteError::NotText)
        );
    }

    #[test]
    fn test_body_roundtrip() {
        let html = "<html><head></head><body>ok</body></html>";
        let rewritten = inject_into_body(html.as_bytes(), &document()).unwrap();
        assert!(String::from_utf8(rewritten)
            .unwrap()
            .contains("application/ld+json"));
    }
}
