//! In-process knowledge-base search.
//!
//! This module provides trigram-based relevance ranking over a static corpus,
//! including normalization, indexing, scoring, faceted filtering, pagination,
//! highlighting and autosuggest.

// Module declarations
pub(crate) mod highlight;
pub(crate) mod index;
pub(crate) mod query;
pub(crate) mod scoring;
pub(crate) mod suggest;
pub(crate) mod tokenize;

// Public re-exports (used via lib.rs)
pub use highlight::{HighlightPart, SNIPPET_MAX_LENGTH, highlight, snippet};
pub use index::{FacetCatalog, IndexedEntry, SearchIndex, parse_timestamp};
pub use query::{DEFAULT_PAGE_SIZE, SearchEngine, SearchHit, SearchRequest, SearchResponse};
pub use scoring::{Clock, SearchFilters};
pub use suggest::DEFAULT_SUGGESTION_LIMIT;
pub use tokenize::{Trigram, sanitize, tokenize, trigram_similarity, trigrams};
