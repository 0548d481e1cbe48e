//! Shared Cache Handle
//!
//! Lets several reconciliation workers use one cache. Every call holds the
//! write lock for its whole duration, so two checks or writes for the same
//! key never interleave.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::cache::{CacheStats, RepoCache, Verdict};
use crate::config::CacheConfig;
use crate::document::Document;
use crate::logger::Logger;

/// Cloneable handle to a [`RepoCache`] behind an async lock.
#[derive(Clone, Debug)]
pub struct SharedRepoCache {
    inner: Arc<RwLock<RepoCache>>,
}

impl SharedRepoCache {
    pub fn new(cache: RepoCache) -> Self {
        Self {
            inner: Arc::new(RwLock::new(cache)),
        }
    }

    /// Creates the cache described by `config` and wraps it.
    pub fn from_config(config: &CacheConfig, logger: Arc<dyn Logger>) -> Self {
        Self::new(RepoCache::from_config(config, logger))
    }

    /// See [`RepoCache::set`].
    pub async fn set(&self, submitted: &Document, persisted: &Document) {
        self.inner.write().await.set(submitted, persisted);
    }

    /// See [`RepoCache::unchanged_since_cached`]. The returned reference
    /// borrows from `candidates`; the lock is already released.
    pub async fn unchanged_since_cached<'a>(
        &self,
        submitted: &Document,
        candidates: &'a [Document],
    ) -> Option<&'a Document> {
        // Write lock: a check refreshes recency and counters.
        self.inner
            .write()
            .await
            .unchanged_since_cached(submitted, candidates)
    }

    pub async fn verdict<'a>(&self, submitted: &Document, candidates: &'a [Document]) -> Verdict<'a> {
        self.inner.write().await.verdict(submitted, candidates)
    }

    pub async fn stats(&self) -> CacheStats {
        self.inner.read().await.stats()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}
