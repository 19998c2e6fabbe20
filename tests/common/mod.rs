//! Shared test fixtures and utilities for integration tests.
//!
//! # Available Fixtures
//!
//! - `engine`: the built-in knowledge base, scored as of 2024-09-01 so rankings
//!   are reproducible regardless of when the tests run
//! - `as_of`: the fixed instant used by `engine`
//!
//! [`TempCorpus`] writes corpus files into a temp directory for loading tests,
//! and [`entry`] builds ad-hoc entries for small hand-made corpora.

use kb_search_mcp::search::parse_timestamp;
use kb_search_mcp::{Clock, Corpus, Entry, SearchEngine};
use rstest::fixture;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Reference date for all fixture engines; later than every built-in entry.
pub const AS_OF: &str = "2024-09-01";

#[allow(dead_code)] // Used by a subset of integration test crates
#[fixture]
pub fn as_of() -> Clock {
    Clock::Fixed(parse_timestamp(AS_OF).expect("fixture date parses"))
}

/// Engine over the built-in knowledge base with a fixed clock.
#[allow(dead_code)] // Used by a subset of integration test crates
#[fixture]
pub fn engine(as_of: Clock) -> SearchEngine {
    SearchEngine::from_corpus(Corpus::builtin().expect("built-in corpus loads")).with_clock(as_of)
}

/// Engine over a hand-made corpus with the fixture clock.
#[allow(dead_code)] // Used by a subset of integration test crates
pub fn engine_for(entries: Vec<Entry>) -> SearchEngine {
    let corpus = Corpus::new(entries).expect("test corpus is valid");
    SearchEngine::from_corpus(corpus).with_clock(as_of())
}

/// Build an entry with a placeholder answer and no facets.
#[allow(dead_code)] // Used by a subset of integration test crates
pub fn entry(id: &str, question: &str, published_at: &str) -> Entry {
    Entry {
        id: id.to_string(),
        question: question.to_string(),
        answer: "Ask at the front desk.".to_string(),
        topics: vec![],
        tags: vec![],
        author: "Test Author".to_string(),
        published_at: published_at.to_string(),
    }
}

/// A temporary directory holding corpus files.
///
/// The directory is removed when the value is dropped.
#[allow(dead_code)] // Methods used across different integration test crates
pub struct TempCorpus {
    _temp: TempDir,
    root: PathBuf,
}

#[allow(dead_code)] // Methods used across different integration test crates
impl TempCorpus {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let root = temp.path().to_path_buf();
        Self { _temp: temp, root }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Write `content` to `name` and return the full path.
    ///
    /// # Panics
    /// Panics if the file cannot be written.
    pub fn create_file(&self, name: &str, content: &str) -> PathBuf {
        let full_path = self.root.join(name);
        std::fs::write(&full_path, content)
            .unwrap_or_else(|e| panic!("Failed to write file '{}': {}", name, e));
        full_path
    }
}

impl Default for TempCorpus {
    fn default() -> Self {
        Self::new()
    }
}
