//! # Edgemark
//!
//! Edge-side augmentation of web pages with Schema.org JSON-LD, without
//! adding latency to the user request.
//!
//! The crate implements a cache-aside delivery pipeline:
//!
//! - **Edge interceptor**: serves cached structured data instantly on a hit
//!   and passes misses through untouched while scheduling analysis in the
//!   background
//! - **Analysis pipeline**: a `pending → processing → completed | failed`
//!   job state machine around a pluggable content analyzer
//! - **Work queue & retry sweep**: one serialized worker plus a periodic
//!   sweep that re-queues failed jobs with exponential spacing
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use edgemark::prelude::*;
//! use std::sync::Arc;
//!
//! let config = EdgemarkConfig::from_env();
//! let store = Arc::new(InMemoryJobStore::new());
//! let domains = Arc::new(InMemoryDomainStore::new());
//! let cache = Arc::new(InMemoryMetadataCache::new());
//! let analyzer = build_analyzer(&config.provider);
//!
//! let pipeline = Arc::new(
//!     AnalysisPipeline::new(store.clone(), domains, cache.clone(), analyzer)
//!         .with_policy(config.retry.clone())
//!         .with_analysis(&config.analysis),
//! );
//! let queue = WorkQueue::spawn(pipeline.clone());
//! let sweeper = RetrySweeper::new(store, queue.handle(), config.retry.clone()).spawn();
//!
//! let submitter = Arc::new(QueuedSubmitter::new(pipeline, queue.handle()));
//! let origin = Arc::new(HttpOriginClient::new(&config.edge)?);
//! let interceptor = EdgeInterceptor::new(cache, origin, submitter);
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, missing_docs, rust_2018_idioms)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod analyzer;
pub mod cache;
pub mod config;
pub mod edge;
pub mod errors;
pub mod job;
pub mod observability;
pub mod pipeline;
pub mod queue;
pub mod store;
pub mod testing;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::analyzer::{
        build_analyzer, AnalysisOutcome, ContentAnalyzer, GeminiAnalyzer, JsonLd, OpenAiAnalyzer,
    };
    pub use crate::cache::{InMemoryMetadataCache, MetadataCache};
    pub use crate::config::{
        EdgeConfig, EdgemarkConfig, ProviderConfig, ProviderKind, RetryPolicy,
    };
    pub use crate::edge::{
        EdgeInterceptor, EdgeRequest, HttpOriginClient, OriginClient, OriginResponse, SkipRules,
    };
    pub use crate::errors::{
        AnalyzerError, CacheError, EdgemarkError, OriginError, StoreError, SubmitError,
    };
    pub use crate::job::{AnalysisJob, JobStatus};
    pub use crate::pipeline::{
        AnalysisPipeline, JobStats, JobSubmitter, QueuedSubmitter, SubmitReceipt, SubmitRequest,
    };
    pub use crate::queue::{QueueHandle, RetrySweeper, WorkQueue};
    pub use crate::store::{
        Domain, DomainStore, InMemoryDomainStore, InMemoryJobStore, JobStore,
    };
}
