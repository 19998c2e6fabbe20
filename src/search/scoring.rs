//! Relevance scoring and ranking order.
//!
//! The weights below are empirically tuned and must stay as they are: existing
//! rankings (and the tests that pin them) depend on their relative magnitudes.

use super::index::{IndexedEntry, newest_first};
use super::tokenize::{Trigram, sanitize, tokenize, trigram_similarity, trigrams};
use ahash::AHashSet;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;

const QUESTION_SIMILARITY_WEIGHT: f64 = 3.1;
const ANSWER_SIMILARITY_WEIGHT: f64 = 1.9;
const QUESTION_TOKEN_BOOST: f64 = 1.25;
const ANSWER_TOKEN_BOOST: f64 = 0.85;
const TOPIC_TOKEN_BOOST: f64 = 0.5;
const TAG_TOKEN_BOOST: f64 = 0.45;
const TOPIC_FILTER_BOOST: f64 = 0.6;
const TAG_FILTER_BOOST: f64 = 0.4;
const AUTHOR_FILTER_BOOST: f64 = 0.8;

/// Floor of the recency boost, and the whole boost for undated entries.
const RECENCY_FLOOR: f64 = 0.15;
/// Days over which the recency boost decays to half its dynamic range.
const RECENCY_WINDOW_DAYS: f64 = 120.0;
const MILLISECONDS_IN_DAY: f64 = 1000.0 * 60.0 * 60.0 * 24.0;

/// Source of "now" for the recency boost.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Clock {
    /// Read the wall clock on every query.
    #[default]
    System,
    /// Score as if the current time were fixed, for reproducible rankings.
    Fixed(DateTime<Utc>),
}

impl Clock {
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Self::System => Utc::now(),
            Self::Fixed(instant) => *instant,
        }
    }
}

/// Sanitized facet constraints. Empty means "no constraint on this facet".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilters {
    pub topics: AHashSet<String>,
    pub tags: AHashSet<String>,
    pub author: String,
}

impl SearchFilters {
    pub fn is_empty(&self) -> bool {
        self.topics.is_empty() && self.tags.is_empty() && self.author.is_empty()
    }

    /// True when a topic filter is active and the entry carries one of its topics.
    pub fn topic_matches(&self, indexed: &IndexedEntry) -> bool {
        !self.topics.is_empty()
            && indexed
                .normalized_topics
                .iter()
                .any(|topic| self.topics.contains(topic))
    }

    /// True when a tag filter is active and the entry carries one of its tags.
    pub fn tag_matches(&self, indexed: &IndexedEntry) -> bool {
        !self.tags.is_empty()
            && indexed
                .normalized_tags
                .iter()
                .any(|tag| self.tags.contains(tag))
    }

    /// True when an author filter is active and equals the entry's author.
    pub fn author_matches(&self, indexed: &IndexedEntry) -> bool {
        !self.author.is_empty() && indexed.normalized_author == self.author
    }

    /// Whether the entry satisfies every active facet.
    pub fn admits(&self, indexed: &IndexedEntry) -> bool {
        (self.topics.is_empty() || self.topic_matches(indexed))
            && (self.tags.is_empty() || self.tag_matches(indexed))
            && (self.author.is_empty() || self.author_matches(indexed))
    }
}

/// The tokenized form of a query, computed once per request.
#[derive(Debug, Clone, Default)]
pub(crate) struct ScoringQuery {
    pub(crate) tokens: Vec<String>,
    pub(crate) trigrams: AHashSet<Trigram>,
}

impl ScoringQuery {
    /// Tokenize a raw query and extract its trigrams.
    pub(crate) fn from_text(query: &str) -> Self {
        let sanitized = sanitize(query);
        Self {
            tokens: tokenize(&sanitized),
            trigrams: trigrams(&sanitized),
        }
    }
}

/// Recency boost: `1 / (1 + days / 120) + 0.15`, or `0.15` for undated entries.
///
/// Entries dated in the future count as published today.
pub(crate) fn recency_weight(published: Option<DateTime<Utc>>, now: DateTime<Utc>) -> f64 {
    let Some(published) = published else {
        return RECENCY_FLOOR;
    };

    let elapsed = now.signed_duration_since(published).num_milliseconds() as f64;
    let days_since = (elapsed / MILLISECONDS_IN_DAY).max(0.0);
    1.0 / (1.0 + days_since / RECENCY_WINDOW_DAYS) + RECENCY_FLOOR
}

/// Compute the relevance score of one entry.
pub(crate) fn score_entry(
    indexed: &IndexedEntry,
    query: &ScoringQuery,
    filters: &SearchFilters,
    now: DateTime<Utc>,
) -> f64 {
    let question_similarity = trigram_similarity(&query.trigrams, &indexed.question_trigrams);
    let answer_similarity = trigram_similarity(&query.trigrams, &indexed.answer_trigrams);

    let mut token_boost = 0.0;
    for token in &query.tokens {
        if indexed.normalized_question.contains(token.as_str()) {
            token_boost += QUESTION_TOKEN_BOOST;
        }
        if indexed.normalized_answer.contains(token.as_str()) {
            token_boost += ANSWER_TOKEN_BOOST;
        }
    }

    let topic_token_boost = facet_token_boost(&query.tokens, &indexed.normalized_topics, TOPIC_TOKEN_BOOST);
    let tag_token_boost = facet_token_boost(&query.tokens, &indexed.normalized_tags, TAG_TOKEN_BOOST);

    let mut filter_boost = 0.0;
    if filters.topic_matches(indexed) {
        filter_boost += TOPIC_FILTER_BOOST;
    }
    if filters.tag_matches(indexed) {
        filter_boost += TAG_FILTER_BOOST;
    }
    if filters.author_matches(indexed) {
        filter_boost += AUTHOR_FILTER_BOOST;
    }

    let recency_boost = recency_weight(indexed.published, now);

    question_similarity * QUESTION_SIMILARITY_WEIGHT
        + answer_similarity * ANSWER_SIMILARITY_WEIGHT
        + token_boost
        + topic_token_boost
        + tag_token_boost
        + filter_boost
        + recency_boost
}

/// `weight` for every token that occurs inside at least one facet value.
fn facet_token_boost(tokens: &[String], values: &[String], weight: f64) -> f64 {
    tokens
        .iter()
        .filter(|token| values.iter().any(|value| value.contains(token.as_str())))
        .fold(0.0, |acc, _| acc + weight)
}

/// An entry paired with its score for the duration of one query.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RankedEntry<'a> {
    pub(crate) indexed: &'a IndexedEntry,
    pub(crate) score: f64,
}

/// Ranking order: score descending, then newest first, then question text ascending.
pub(crate) fn compare_ranked(a: &RankedEntry<'_>, b: &RankedEntry<'_>) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| newest_first(a.indexed.published, b.indexed.published))
        .then_with(|| a.indexed.entry.question.cmp(&b.indexed.entry.question))
}

/// Round a score to four decimal places for display.
pub(crate) fn display_score(score: f64) -> f64 {
    (score * 10_000.0).round() / 10_000.0
}
