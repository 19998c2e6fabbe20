//! Search requests, responses and the query engine.

use super::highlight::{HighlightPart, SNIPPET_MAX_LENGTH, dedupe_terms, highlight, snippet};
use super::index::{FacetCatalog, SearchIndex};
use super::scoring::{
    Clock, RankedEntry, ScoringQuery, SearchFilters, compare_ranked, display_score, score_entry,
};
use super::tokenize::sanitize;
use crate::corpus::{Corpus, Entry};
use crate::error::SearchError;
use ahash::AHashSet;
use serde::Serialize;

/// Page size used when a caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// A search over the knowledge base.
///
/// `page` is 1-based and clamped into range by the engine; `page_size` must be
/// at least 1 or the search is rejected with [`SearchError::InvalidPageSize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub topics: Vec<String>,
    pub tags: Vec<String>,
    pub author: Option<String>,
    pub page: usize,
    pub page_size: usize,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            query: String::new(),
            topics: vec![],
            tags: vec![],
            author: None,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    /// Keep entries carrying any of these topics. Values that sanitize to nothing impose no constraint.
    pub fn with_topics<I, S>(mut self, topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.topics = topics.into_iter().map(Into::into).collect();
        self
    }

    /// Keep entries carrying any of these tags. Values that sanitize to nothing impose no constraint.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Keep entries by this author. A value that sanitizes to nothing imposes no constraint.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Sanitized facet constraints; values that sanitize to nothing are ignored.
    fn filters(&self) -> SearchFilters {
        SearchFilters {
            topics: sanitized_set(&self.topics),
            tags: sanitized_set(&self.tags),
            author: self.author.as_deref().map(sanitize).unwrap_or_default(),
        }
    }

    /// Raw terms used for highlighting: query tokens, then requested facet values.
    fn display_terms(&self, tokens: &[String]) -> Vec<String> {
        let raw: Vec<&str> = tokens
            .iter()
            .map(String::as_str)
            .chain(self.topics.iter().map(String::as_str))
            .chain(self.tags.iter().map(String::as_str))
            .chain(self.author.as_deref())
            .collect();
        dedupe_terms(&raw)
    }
}

fn sanitized_set(values: &[String]) -> AHashSet<String> {
    values
        .iter()
        .map(|value| sanitize(value))
        .filter(|value| !value.is_empty())
        .collect()
}

/// One result on the returned page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub entry: Entry,
    /// Relevance score rounded to four decimal places.
    pub score: f64,
    pub question_highlights: Vec<HighlightPart>,
    pub answer_highlights: Vec<HighlightPart>,
    pub snippet: Vec<HighlightPart>,
    pub matched_topics: Vec<String>,
    pub matched_tags: Vec<String>,
}

/// A page of ranked results.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub total: usize,
    /// The effective page, after clamping the requested one into range.
    pub page: usize,
    pub page_size: usize,
    pub page_count: usize,
    pub items: Vec<SearchHit>,
}

/// Read-only query engine over an immutable [`SearchIndex`].
///
/// All operations take `&self` and mutate nothing, so one engine can be shared
/// across threads and serve concurrent requests without locking.
#[derive(Debug, Clone)]
pub struct SearchEngine {
    index: SearchIndex,
    clock: Clock,
}

impl SearchEngine {
    pub fn new(index: SearchIndex) -> Self {
        Self {
            index,
            clock: Clock::System,
        }
    }

    /// Index a corpus and wrap it in an engine.
    pub fn from_corpus(corpus: Corpus) -> Self {
        Self::new(SearchIndex::build(corpus))
    }

    /// Replace the clock used for the recency boost.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn index(&self) -> &SearchIndex {
        &self.index
    }

    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// Distinct topics, tags and authors of the corpus.
    pub fn facets(&self) -> FacetCatalog {
        self.index.facets()
    }

    /// Score every entry admitted by `filters`, in ranking order.
    pub(crate) fn rank<'a>(&'a self, query: &ScoringQuery, filters: &SearchFilters) -> Vec<RankedEntry<'a>> {
        let now = self.clock.now();
        let mut ranked: Vec<RankedEntry<'a>> = self
            .index
            .entries()
            .iter()
            .filter(|indexed| filters.admits(indexed))
            .map(|indexed| RankedEntry {
                indexed,
                score: score_entry(indexed, query, filters, now),
            })
            .collect();

        ranked.sort_by(compare_ranked);
        ranked
    }

    /// Run a search and build the requested page of highlighted hits.
    pub fn search(&self, request: &SearchRequest) -> Result<SearchResponse, SearchError> {
        if request.page_size == 0 {
            return Err(SearchError::InvalidPageSize(request.page_size));
        }

        let query = ScoringQuery::from_text(&request.query);
        let filters = request.filters();
        let ranked = self.rank(&query, &filters);

        let total = ranked.len();
        let page_size = request.page_size;
        let page_count = total.div_ceil(page_size).max(1);
        let page = request.page.clamp(1, page_count);
        let start = (page - 1) * page_size;
        let end = total.min(start + page_size);

        tracing::debug!(
            query = %request.query,
            total,
            page,
            page_count,
            filtered = !filters.is_empty(),
            "Ranked search candidates"
        );

        let display_terms = request.display_terms(&query.tokens);
        let snippet_terms: Vec<String> = display_terms
            .iter()
            .map(|term| sanitize(term))
            .filter(|term| !term.is_empty())
            .collect();

        let items = ranked[start..end]
            .iter()
            .map(|hit| build_hit(hit, &query.tokens, &filters, &display_terms, &snippet_terms))
            .collect();

        Ok(SearchResponse {
            total,
            page,
            page_size,
            page_count,
            items,
        })
    }
}

fn build_hit(
    ranked: &RankedEntry<'_>,
    tokens: &[String],
    filters: &SearchFilters,
    display_terms: &[String],
    snippet_terms: &[String],
) -> SearchHit {
    let entry = &ranked.indexed.entry;
    let excerpt = snippet(&entry.answer, snippet_terms, SNIPPET_MAX_LENGTH);

    SearchHit {
        score: display_score(ranked.score),
        question_highlights: highlight(&entry.question, display_terms),
        answer_highlights: highlight(&entry.answer, display_terms),
        snippet: highlight(&excerpt, display_terms),
        matched_topics: matched_values(&entry.topics, &filters.topics, tokens),
        matched_tags: matched_values(&entry.tags, &filters.tags, tokens),
        entry: entry.clone(),
    }
}

/// Raw facet values that satisfy the active filter or contain a query token.
fn matched_values(values: &[String], filter: &AHashSet<String>, tokens: &[String]) -> Vec<String> {
    values
        .iter()
        .filter(|value| {
            let normalized = sanitize(value);
            filter.contains(&normalized) || tokens.iter().any(|token| normalized.contains(token.as_str()))
        })
        .cloned()
        .collect()
}
