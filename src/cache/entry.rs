//! Cache Entry Module
//!
//! Defines the snapshot pair recorded after every successful write.

use chrono::{DateTime, Utc};

use crate::document::Document;

// == Cache Entry ==
/// What was last sent to the remote store for a key, and what the store
/// held afterwards.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Document as the controller intended to write it
    pub submitted: Document,
    /// Document as accepted and returned by the store
    pub persisted: Document,
    /// When the pair was recorded (diagnostics only)
    pub recorded_at: DateTime<Utc>,
}

impl CacheEntry {
    // == Constructor ==
    /// Snapshots both documents by value.
    pub fn new(submitted: &Document, persisted: &Document) -> Self {
        Self {
            submitted: submitted.clone(),
            persisted: persisted.clone(),
            recorded_at: Utc::now(),
        }
    }
}
