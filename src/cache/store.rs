//! Cache Store Module
//!
//! Remembers the last write made for each object and decides whether the
//! next write can be skipped.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::cache::{CacheEntry, CacheKey, CacheStats, KeyStrategy, LruTracker, MissReason, Verdict};
use crate::config::CacheConfig;
use crate::document::Document;
use crate::logger::Logger;

// == Repo Cache ==
/// Submission/diff memo for one controller.
///
/// The cache has no internal locking. Mutating calls take `&mut self`; wrap
/// it in [`SharedRepoCache`](crate::SharedRepoCache) to share it between
/// workers.
pub struct RepoCache {
    entries: HashMap<CacheKey, CacheEntry>,
    lru: LruTracker,
    stats: CacheStats,
    config: CacheConfig,
    logger: Arc<dyn Logger>,
}

impl RepoCache {
    // == Constructor ==
    /// Creates an unbounded cache keyed by name or `generateName`.
    pub fn new(logger: Arc<dyn Logger>) -> Self {
        Self::from_config(&CacheConfig::default(), logger)
    }

    pub fn from_config(config: &CacheConfig, logger: Arc<dyn Logger>) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            config: config.clone(),
            logger,
        }
    }

    pub fn key_for(&self, doc: &Document) -> CacheKey {
        CacheKey::derive(doc, self.config.key_strategy)
    }

    // == Set ==
    /// Records a successful write: the document sent and the document the
    /// store returned.
    ///
    /// Any earlier pair under the same key is replaced. Only call this after
    /// the write has succeeded.
    pub fn set(&mut self, submitted: &Document, persisted: &Document) {
        let key = self.key_for(submitted);

        if self.config.is_bounded() && !self.entries.contains_key(&key) {
            while self.entries.len() >= self.config.capacity {
                let Some(evicted) = self.lru.evict_oldest() else {
                    break;
                };
                self.entries.remove(&evicted);
                self.stats.record_eviction();
                debug!(key = %evicted, "evicted least recently used entry");
            }
        }

        self.entries
            .insert(key.clone(), CacheEntry::new(submitted, persisted));
        if self.config.is_bounded() {
            self.lru.touch(&key);
        }

        self.stats.record_write();
        self.stats.set_total_entries(self.entries.len());
        debug!(key = %key, "recorded write");
    }

    // == Get ==
    /// Persisted snapshot for `key`, or an empty document if none.
    pub fn get(&self, key: &CacheKey) -> Document {
        self.entries
            .get(key)
            .map(|entry| entry.persisted.clone())
            .unwrap_or_default()
    }

    pub fn entry(&self, key: &CacheKey) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    // == Unchanged Check ==
    /// Returns the candidate that already holds the desired state, or `None`
    /// when the write must go ahead.
    ///
    /// Candidates are scanned in the order given and the first match wins,
    /// so callers wanting a deterministic answer must supply a stable order
    /// (for example, sorted by creation time).
    pub fn unchanged_since_cached<'a, I>(
        &mut self,
        submitted: &Document,
        candidates: I,
    ) -> Option<&'a Document>
    where
        I: IntoIterator<Item = &'a Document>,
    {
        self.verdict(submitted, candidates).hit()
    }

    /// Same decision as [`unchanged_since_cached`](Self::unchanged_since_cached),
    /// keeping the reason for a miss.
    pub fn verdict<'a, I>(&mut self, submitted: &Document, candidates: I) -> Verdict<'a>
    where
        I: IntoIterator<Item = &'a Document>,
    {
        let key = self.key_for(submitted);
        self.logger
            .info("checking for changes since last write", &[("key", &key)]);

        let (verdict, skips) = self.evaluate(&key, submitted, candidates);

        for _ in 0..skips.candidate {
            self.stats.record_candidate_without_spec();
        }
        for _ in 0..skips.persisted {
            self.stats.record_persisted_without_spec();
        }
        match verdict {
            Verdict::Hit(_) => self.stats.record_hit(),
            Verdict::Miss(reason) => self.stats.record_miss(reason),
        }
        if self.config.is_bounded() && self.entries.contains_key(&key) {
            self.lru.touch(&key);
        }

        verdict
    }

    /// Runs the check, returning the verdict and the candidates skipped for
    /// lack of a spec on either side.
    fn evaluate<'a, I>(
        &self,
        key: &CacheKey,
        submitted: &Document,
        candidates: I,
    ) -> (Verdict<'a>, SpecSkips)
    where
        I: IntoIterator<Item = &'a Document>,
    {
        let Some(entry) = self.entries.get(key) else {
            self.logger
                .info("miss: no write recorded for object", &[("key", key)]);
            return (Verdict::Miss(MissReason::NotCached), SpecSkips::default());
        };

        // Any difference in intent, spec or not, forces a write.
        if entry.submitted != *submitted {
            self.logger.info(
                "miss: submitted object differs from the last recorded submission",
                &[("key", key)],
            );
            return (Verdict::Miss(MissReason::SubmittedChanged), SpecSkips::default());
        }

        self.logger.info(
            "submitted object unchanged since last write, checking live candidates",
            &[("key", key)],
        );

        let mut skips = SpecSkips::default();
        for candidate in candidates {
            let candidate_name = candidate.name();
            self.logger.info(
                "considering candidate",
                &[("key", key), ("candidate", &candidate_name)],
            );

            let Some(candidate_spec) = candidate.spec() else {
                self.logger.info(
                    "candidate has no spec",
                    &[("key", key), ("candidate", &candidate_name)],
                );
                skips.candidate += 1;
                continue;
            };
            let Some(persisted_spec) = entry.persisted.spec() else {
                self.logger
                    .info("recorded persisted object has no spec", &[("key", key)]);
                skips.persisted += 1;
                continue;
            };

            if candidate_spec == persisted_spec {
                self.logger.info(
                    "hit: candidate spec matches recorded persisted spec",
                    &[("key", key), ("candidate", &candidate_name)],
                );
                return (Verdict::Hit(candidate), skips);
            }
            self.logger.info(
                "miss: candidate spec differs from recorded persisted spec",
                &[("key", key), ("candidate", &candidate_name)],
            );
        }

        self.logger
            .info("miss: no live candidate matches the recorded spec", &[("key", key)]);
        (Verdict::Miss(MissReason::NoMatchingCandidate), skips)
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of keys, 0 = unbounded.
    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    pub fn key_strategy(&self) -> KeyStrategy {
        self.config.key_strategy
    }
}

/// Candidates passed over during one check, by which side lacked a spec.
#[derive(Debug, Default)]
struct SpecSkips {
    candidate: u64,
    persisted: u64,
}

impl fmt::Debug for RepoCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RepoCache")
            .field("entries", &self.entries.len())
            .field("config", &self.config)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
