//! Cache Key Module
//!
//! Derives the identity a document is cached under.

use std::fmt;
use std::str::FromStr;

use sha2::{Digest, Sha256};

use crate::document::Document;
use crate::error::CacheError;

/// Hex characters of the content digest kept in a hashed key
const CONTENT_HASH_LEN: usize = 16;

// == Key Strategy ==
/// How the identifier part of a key is chosen for a document without a name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyStrategy {
    /// Fall back to the `generateName` prefix. Pending documents that share
    /// a prefix share a key.
    #[default]
    GenerateName,
    /// Append a digest of the whole document to the prefix, so pending
    /// documents only share a key when their content is identical.
    ContentHash,
}

impl FromStr for KeyStrategy {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "generate-name" | "generatename" => Ok(Self::GenerateName),
            "content-hash" | "contenthash" => Ok(Self::ContentHash),
            other => Err(CacheError::InvalidConfig {
                var: "REPO_CACHE_KEY_STRATEGY",
                value: other.to_string(),
                reason: "expected `generate-name` or `content-hash`".to_string(),
            }),
        }
    }
}

impl fmt::Display for KeyStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GenerateName => f.write_str("generate-name"),
            Self::ContentHash => f.write_str("content-hash"),
        }
    }
}

// == Cache Key ==
/// Namespace, kind and identifier of a cached document.
///
/// Equal keys are treated as the same object. This is an approximation: it
/// does not prove two documents describe the same live resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub namespace: String,
    pub kind: String,
    pub name: String,
}

impl CacheKey {
    /// Derives the key for `doc`.
    pub fn derive(doc: &Document, strategy: KeyStrategy) -> Self {
        let name = match (doc.name(), strategy) {
            ("", KeyStrategy::GenerateName) => doc.generate_name().to_string(),
            ("", KeyStrategy::ContentHash) => {
                format!("{}#{}", doc.generate_name(), content_digest(doc))
            }
            (name, _) => name.to_string(),
        };

        Self {
            namespace: doc.namespace().to_string(),
            kind: doc.kind().to_string(),
            name,
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.namespace, self.kind, self.name)
    }
}

/// Truncated sha256 of the document's canonical JSON.
///
/// serde_json keeps object keys sorted, so equal documents hash equally.
fn content_digest(doc: &Document) -> String {
    let mut hasher = Sha256::new();
    // Serializing a map of JSON values cannot fail.
    if let Ok(bytes) = serde_json::to_vec(doc) {
        hasher.update(&bytes);
    }
    let mut digest = hex::encode(hasher.finalize());
    digest.truncate(CONTENT_HASH_LEN);
    digest
}
