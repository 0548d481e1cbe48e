//! Error types for the submission cache
//!
//! Provides unified error handling using thiserror. The cache lookups
//! themselves never fail; errors only come from building documents and
//! loading configuration.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the crate.
#[derive(Error, Debug)]
pub enum CacheError {
    /// An environment variable held a value that could not be used
    #[error("Invalid configuration {var}={value:?}: {reason}")]
    InvalidConfig {
        var: &'static str,
        value: String,
        reason: String,
    },

    /// A JSON value that is not an object was offered as a document
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// Document text could not be parsed
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

// == Result Type Alias ==
/// Convenience Result type for the crate.
pub type Result<T> = std::result::Result<T, CacheError>;
