//! Document Module
//!
//! Schemaless resource documents as submitted to, and returned by, the
//! remote store.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{CacheError, Result};

// == Document ==
/// An open-ended JSON object describing one resource.
///
/// Only the identity fields (`kind`, `metadata.namespace`, `metadata.name`,
/// `metadata.generateName`) and the `spec` subtree have meaning to the cache.
/// Everything else is carried along and compared as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    fields: Map<String, Value>,
}

impl Document {
    // == Constructor ==
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a document from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::try_from(value)
    }

    // == Identity ==
    /// Resource kind, or "" when unset.
    pub fn kind(&self) -> &str {
        self.fields.get("kind").and_then(Value::as_str).unwrap_or("")
    }

    pub fn namespace(&self) -> &str {
        self.metadata_str("namespace")
    }

    /// Store-assigned (or caller-chosen) name, or "" when not yet assigned.
    pub fn name(&self) -> &str {
        self.metadata_str("name")
    }

    /// Prefix the store uses to generate a name when none is given.
    pub fn generate_name(&self) -> &str {
        self.metadata_str("generateName")
    }

    fn metadata_str(&self, field: &str) -> &str {
        self.fields
            .get("metadata")
            .and_then(|metadata| metadata.get(field))
            .and_then(Value::as_str)
            .unwrap_or("")
    }

    // == Subtrees ==
    /// The `spec` subtree. A present key counts even when its value is null.
    pub fn spec(&self) -> Option<&Value> {
        self.fields.get("spec")
    }

    pub fn status(&self) -> Option<&Value> {
        self.fields.get("status")
    }

    // == Raw Access ==
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Sets a top-level field, returning the previous value.
    pub fn insert(&mut self, field: impl Into<String>, value: Value) -> Option<Value> {
        self.fields.insert(field.into(), value)
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.fields.remove(field)
    }
}

impl TryFrom<Value> for Document {
    type Error = CacheError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(CacheError::InvalidDocument(format!(
                "expected a JSON object, got {}",
                json_type_name(&other)
            ))),
        }
    }
}

impl From<Map<String, Value>> for Document {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
