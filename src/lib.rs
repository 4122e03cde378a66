// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod ledger;
pub mod metrics;
pub mod pipeline;
pub mod publisher;
pub mod staging;
pub mod translate;
pub mod types;

// ---- Re-exports for stable public API ----
pub use crate::error::{Recovery, RelayError, Result};
pub use crate::ledger::Ledger;
pub use crate::pipeline::PipelineController;
pub use crate::staging::StagingBuffer;
pub use crate::types::{FetchOutcome, PublishedPost, SourceId, StagedArticle};
