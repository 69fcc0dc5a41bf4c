//! Shared fixtures for tests.

use std::sync::Arc;

use crate::analyzer::JsonLd;
use crate::store::{InMemoryDomainStore, InMemoryJobStore};

/// A minimal valid page with head and body.
#[must_use]
pub fn sample_html() -> &'static str {
    "<html><head><title>Hello</title></head><body>Hello</body></html>"
}

/// A minimal valid Schema.org document.
#[must_use]
pub fn sample_json_ld() -> JsonLd {
    JsonLd::new(serde_json::json!({
        "@context": "https://schema.org",
        "@type": "WebPage",
    }))
    .expect("fixture document is valid")
}

/// Stores pre-seeded with `example.com`; returns the registered domain id.
#[must_use]
pub fn seeded_stores() -> (Arc<InMemoryJobStore>, Arc<InMemoryDomainStore>, i64) {
    let jobs = Arc::new(InMemoryJobStore::new());
    let domains = Arc::new(InMemoryDomainStore::new());
    let domain = domains.insert("example.com");
    (jobs, domains, domain.id)
}
