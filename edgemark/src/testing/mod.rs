//! Test support: scripted mocks and shared fixtures.

mod fixtures;
mod mocks;

pub use fixtures::{sample_html, sample_json_ld, seeded_stores};
pub use mocks::{FailingCache, MockAnalyzer, MockOriginClient, RecordingSubmitter};
