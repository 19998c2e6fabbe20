//! Error handling types and utilities.

use std::path::PathBuf;
use thiserror::Error;

/// A specialized Result type for kb-search-mcp operations.
///
/// This is an alias for `anyhow::Result` with context added via `.context()` and
/// `.with_context()` methods wherever files or the transport are involved.
pub type Result<T> = anyhow::Result<T>;

/// Error returned when a search request violates its preconditions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// Page size must be at least one.
    #[error("invalid page size {0}: must be at least 1")]
    InvalidPageSize(usize),
}

/// Error returned when a corpus fails validation or cannot be read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CorpusError {
    /// Two entries share the same id.
    #[error("duplicate entry id '{0}'")]
    DuplicateId(String),
    /// An entry has a blank id.
    #[error("entry at position {0} has an empty id")]
    EmptyId(usize),
    /// The corpus file extension is neither `.json` nor `.toml`.
    #[error("unsupported corpus format for {}: expected a .json or .toml file", .0.display())]
    UnsupportedFormat(PathBuf),
}
