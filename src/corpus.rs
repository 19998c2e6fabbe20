//! Knowledge-base entries and corpus loading.
//!
//! The corpus is a fixed, ordered sequence of [`Entry`] records supplied once at
//! startup. A built-in knowledge base is embedded in the binary; an external corpus
//! can be loaded from a JSON array or a TOML file with `[[entries]]` tables.

use crate::error::{CorpusError, Result};
use ahash::AHashSet;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Embedded default knowledge base.
const BUILTIN_CORPUS: &str = include_str!("../data/knowledge_base.json");

/// A single question/answer entry. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: String,
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub author: String,
    /// Publication timestamp as supplied (`YYYY-MM-DD` or RFC 3339). Unparseable
    /// values are accepted and only lose their recency weight.
    pub published_at: String,
}

/// TOML layout: `[[entries]]` tables at the top level.
#[derive(Debug, Deserialize)]
struct TomlCorpus {
    #[serde(default)]
    entries: Vec<Entry>,
}

/// An ordered, validated collection of entries.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    entries: Vec<Entry>,
}

impl Corpus {
    /// Build a corpus from entries, rejecting blank or duplicate ids.
    pub fn new(entries: Vec<Entry>) -> std::result::Result<Self, CorpusError> {
        let mut seen = AHashSet::with_capacity(entries.len());
        for (position, entry) in entries.iter().enumerate() {
            if entry.id.trim().is_empty() {
                return Err(CorpusError::EmptyId(position));
            }
            if !seen.insert(entry.id.as_str()) {
                return Err(CorpusError::DuplicateId(entry.id.clone()));
            }
        }
        Ok(Self { entries })
    }

    /// The knowledge base compiled into the binary.
    pub fn builtin() -> Result<Self> {
        Self::from_json_str(BUILTIN_CORPUS).context("Failed to parse built-in knowledge base")
    }

    /// Parse a JSON array of entries.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let entries: Vec<Entry> = serde_json::from_str(json)?;
        Ok(Self::new(entries)?)
    }

    /// Parse a TOML document containing `[[entries]]` tables.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let parsed: TomlCorpus = toml::from_str(text)?;
        Ok(Self::new(parsed.entries)?)
    }

    /// Load a corpus file, choosing the format from its extension.
    pub fn load(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read corpus file {}", path.display()))?;

        let corpus = match extension.as_deref() {
            Some("json") => Self::from_json_str(&text),
            Some("toml") => Self::from_toml_str(&text),
            _ => return Err(CorpusError::UnsupportedFormat(path.to_path_buf()).into()),
        }
        .with_context(|| format!("Failed to load corpus from {}", path.display()))?;

        tracing::info!(
            "Loaded {} entries from {}",
            corpus.len(),
            path.display()
        );
        Ok(corpus)
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for Corpus {
    type Item = Entry;
    type IntoIter = std::vec::IntoIter<Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
