//! Cache Statistics Module
//!
//! Counts writes recorded and the outcome of every unchanged-check.

use serde::Serialize;

use crate::cache::MissReason;

// == Cache Stats ==
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Number of write pairs recorded
    pub writes: u64,
    /// Checks that found a matching candidate
    pub hits: u64,
    /// Checks for a key that was never recorded
    pub misses_not_cached: u64,
    /// Checks whose submitted document differed from the recorded one
    pub misses_submitted_changed: u64,
    /// Checks where no candidate matched the recorded spec
    pub misses_no_match: u64,
    /// Candidates skipped because they had no spec
    pub candidates_without_spec: u64,
    /// Candidates skipped because the recorded persisted document had no spec
    pub persisted_without_spec: u64,
    /// Keys evicted to stay within capacity
    pub evictions: u64,
    /// Current number of keys in the cache
    pub total_entries: usize,
}

impl CacheStats {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    /// Total checks that ended in a write.
    pub fn misses(&self) -> u64 {
        self.misses_not_cached + self.misses_submitted_changed + self.misses_no_match
    }

    /// Total unchanged-checks performed.
    pub fn checks(&self) -> u64 {
        self.hits + self.misses()
    }

    // == Hit Rate ==
    /// Returns hits / checks, or 0.0 if no check has been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.checks();
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    // == Recorders ==
    pub fn record_write(&mut self) {
        self.writes += 1;
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self, reason: MissReason) {
        match reason {
            MissReason::NotCached => self.misses_not_cached += 1,
            MissReason::SubmittedChanged => self.misses_submitted_changed += 1,
            MissReason::NoMatchingCandidate => self.misses_no_match += 1,
        }
    }

    pub fn record_candidate_without_spec(&mut self) {
        self.candidates_without_spec += 1;
    }

    pub fn record_persisted_without_spec(&mut self) {
        self.persisted_without_spec += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}
