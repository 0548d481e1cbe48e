//! LRU Tracker Module
//!
//! Recency order of cache keys, used when the cache is given a capacity.

use std::collections::VecDeque;

use crate::cache::CacheKey;

// == LRU Tracker ==
/// Tracks access order for LRU eviction.
///
/// Keys are stored in a VecDeque where:
/// - Front = Most recently used
/// - Back = Least recently used
#[derive(Debug, Default)]
pub struct LruTracker {
    order: VecDeque<CacheKey>,
}

impl LruTracker {
    // == Constructor ==
    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }

    // == Touch ==
    /// Marks a key as most recently used.
    pub fn touch(&mut self, key: &CacheKey) {
        if self.order.front() == Some(key) {
            return;
        }
        self.remove(key);
        self.order.push_front(key.clone());
    }

    // == Remove ==
    pub fn remove(&mut self, key: &CacheKey) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            self.order.remove(pos);
        }
    }

    // == Evict Oldest ==
    /// Returns and removes the least recently used key.
    pub fn evict_oldest(&mut self) -> Option<CacheKey> {
        self.order.pop_back()
    }

    /// Returns the least recently used key without removing it.
    pub fn peek_oldest(&self) -> Option<&CacheKey> {
        self.order.back()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.order.contains(key)
    }
}
