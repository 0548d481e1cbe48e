//! Cache Module
//!
//! Submission/diff cache: key derivation, snapshot storage and the
//! unchanged-check that lets a controller skip redundant writes.

mod entry;
mod key;
mod lru;
mod stats;
mod store;
mod verdict;


// Re-export public types
pub use entry::CacheEntry;
pub use key::{CacheKey, KeyStrategy};
pub use lru::LruTracker;
pub use stats::CacheStats;
pub use store::RepoCache;
pub use verdict::{MissReason, Verdict};
