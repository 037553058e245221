// privguard-core/src/table.rs
//! The restoration table: the inverse mapping from placeholder tokens to
//! the original content they replaced.
//!
//! A table belongs to exactly one `anonymize` call. Tables from
//! different calls must never be merged or reused across texts; their
//! placeholder namespaces overlap by construction.

use std::collections::HashMap;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Mapping from placeholder string to original content string.
///
/// Keys are exactly the placeholders emitted into the sanitized text, no
/// more, no fewer, and are unique within one call by construction. The
/// serialized form is the plain JSON object
/// `{"<LABEL_1>": "original", ...}`, the only externally persistable
/// artifact of an anonymization run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RestorationTable {
    entries: HashMap<String, String>,
}

impl RestorationTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, placeholder: String, content: String) -> Option<String> {
        self.entries.insert(placeholder, content)
    }

    pub fn get(&self, placeholder: &str) -> Option<&str> {
        self.entries.get(placeholder).map(String::as_str)
    }

    pub fn remove(&mut self, placeholder: &str) -> Option<String> {
        self.entries.remove(placeholder)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Serializes the table as a flat JSON object.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).context("Failed to serialize restoration table")
    }

    /// Deserializes a table from a flat JSON object.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to deserialize restoration table")
    }
}

impl FromIterator<(String, String)> for RestorationTable {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
