//! Request eligibility rules.

use regex::RegexSet;

use super::EdgeRequest;

/// Path patterns excluded from interception: static assets and reserved
/// prefixes.
const DEFAULT_PATTERNS: &[&str] = &[
    r"(?i)\.(css|js|mjs|png|jpg|jpeg|gif|ico|svg|webp|woff|woff2|ttf|pdf)$",
    r"^/api/",
    r"^/admin/",
    r"^/wp-admin/",
    r"^/wp-content/",
];

/// Decides which requests the interceptor may touch.
#[derive(Debug, Clone)]
pub struct SkipRules {
    patterns: RegexSet,
}

impl SkipRules {
    /// Creates the default rule set.
    #[must_use]
    pub fn new() -> Self {
        Self::from_patterns(DEFAULT_PATTERNS.iter().copied())
            .expect("default patterns compile")
    }

    /// Builds a rule set from custom patterns.
    pub fn from_patterns<I, S>(patterns: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Self {
            patterns: RegexSet::new(patterns)?,
        })
    }

    /// Whether a request path is excluded from interception.
    #[must_use]
    pub fn should_skip(&self, path: &str) -> bool {
        self.patterns.is_match(path)
    }

    /// Whether a request is eligible for metadata handling at all.
    #[must_use]
    pub fn is_eligible(&self, request: &EdgeRequest) -> bool {
        request.is_get() && !self.should_skip(request.path())
    }
}

impl Default for SkipRules {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_extensions_skipped() {
        let rules = SkipRules::new();
        assert!(rules.should_skip("/styles/app.css"));
        assert!(rules.should_skip("/bundle.js"));
        assert!(rules.should_skip("/logo.PNG"));
        assert!(rules.should_skip("/fonts/inter.woff2"));
        assert!(rules.should_skip("/docs/manual.pdf"));
    }

    #[test]
    fn test_reserved_prefixes_skipped() {
        let rules = SkipRules::new();
        assert!(rules.should_skip("/api/v1/jobs"));
        assert!(rules.should_skip("/admin/users"));
        assert!(rules.should_skip("/wp-admin/options.php"));
        assert!(rules.should_skip("/wp-content/uploads/x"));
    }

    #[test]
    fn test_page_paths_not_skipped() {
        let rules = SkipRules::new();
        assert!(!rules.should_skip("/"));
        assert!(!rules.should_skip("/about"));
        assert!(!rules.should_skip("/blog/post-1"));
        // Only a trailing extension counts.
        assert!(!rules.should_skip("/css-tricks"));
    }

    #[test]
    fn test_eligibility_requires_get() {
        let rules = SkipRules::new();
        let mut request = EdgeRequest::get("https://example.com/about");
        assert!(rules.is_eligible(&request));

        request.method = "POST".to_string();
        assert!(!rules.is_eligible(&request));
    }

    #[test]
    fn test_eligibility_checks_path_only() {
        let rules = SkipRules::new();
        // The query string must not defeat the extension match.
        let request = EdgeRequest::get("https://example.com/app.css?v=3");
        assert!(!rules.is_eligible(&request));
    }

    #[test]
    fn test_custom_patterns() {
        let rules = SkipRules::from_patterns(["^/internal/"]).unwrap();
        assert!(rules.should_skip("/internal/status"));
        assert!(!rules.should_skip("/api/v1/jobs"));
    }
}
