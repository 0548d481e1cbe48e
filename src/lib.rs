//! Submission Cache - skip redundant writes in a reconciliation loop
//!
//! Remembers, per object, the document last submitted to a remote store and
//! the document the store returned. Before the next write, a controller asks
//! whether its newly computed document is unchanged and whether a live
//! candidate still carries the recorded spec; if so the write is skipped.

pub mod cache;
pub mod config;
pub mod document;
pub mod error;
pub mod logger;
pub mod shared;
pub mod tasks;
pub mod telemetry;

pub use cache::{CacheKey, CacheStats, KeyStrategy, MissReason, RepoCache, Verdict};
pub use config::CacheConfig;
pub use document::Document;
pub use error::{CacheError, Result};
pub use logger::{Logger, TracingLogger};
pub use shared::SharedRepoCache;
pub use tasks::spawn_stats_reporter;
