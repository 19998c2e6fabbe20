//! Immutable in-memory index over a knowledge-base corpus.

use super::tokenize::{Trigram, sanitize, trigrams};
use crate::corpus::{Corpus, Entry};
use ahash::AHashSet;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use std::cmp::Ordering;

/// An entry together with its normalized fields and trigram sets.
///
/// Every derived field is a pure function of the source [`Entry`].
#[derive(Debug, Clone)]
pub struct IndexedEntry {
    pub entry: Entry,
    pub normalized_question: String,
    pub normalized_answer: String,
    pub normalized_topics: Vec<String>,
    pub normalized_tags: Vec<String>,
    pub normalized_author: String,
    pub question_trigrams: AHashSet<Trigram>,
    pub answer_trigrams: AHashSet<Trigram>,
    /// Parsed publication time, `None` when the source timestamp is malformed.
    pub published: Option<DateTime<Utc>>,
}

impl IndexedEntry {
    /// Derive the searchable representation of a single entry.
    pub fn new(entry: Entry) -> Self {
        let normalized_question = sanitize(&entry.question);
        let normalized_answer = sanitize(&entry.answer);
        let question_trigrams = trigrams(&normalized_question);
        let answer_trigrams = trigrams(&normalized_answer);

        Self {
            normalized_topics: entry.topics.iter().map(|topic| sanitize(topic)).collect(),
            normalized_tags: entry.tags.iter().map(|tag| sanitize(tag)).collect(),
            normalized_author: sanitize(&entry.author),
            published: parse_timestamp(&entry.published_at),
            normalized_question,
            normalized_answer,
            question_trigrams,
            answer_trigrams,
            entry,
        }
    }
}

/// Distinct raw facet values across the corpus, for populating filter pickers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FacetCatalog {
    pub topics: Vec<String>,
    pub tags: Vec<String>,
    pub authors: Vec<String>,
}

/// The searchable representation of a whole corpus, in corpus order.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    entries: Vec<IndexedEntry>,
}

impl SearchIndex {
    /// Index every entry of the corpus exactly once.
    pub fn build(corpus: Corpus) -> Self {
        let start = std::time::Instant::now();
        let entries: Vec<IndexedEntry> = corpus.into_iter().map(IndexedEntry::new).collect();

        let distinct_trigrams: AHashSet<&Trigram> = entries
            .iter()
            .flat_map(|indexed| indexed.question_trigrams.iter().chain(&indexed.answer_trigrams))
            .collect();
        let undated = entries.iter().filter(|indexed| indexed.published.is_none()).count();
        if undated > 0 {
            tracing::warn!(
                "{} entries have unparseable publication dates and get the minimum recency weight",
                undated
            );
        }

        tracing::info!(
            "Built search index: {} entries, {} distinct trigrams in {:?}",
            entries.len(),
            distinct_trigrams.len(),
            start.elapsed()
        );

        Self { entries }
    }

    pub fn entries(&self) -> &[IndexedEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Collect the distinct topics, tags and authors of the corpus.
    ///
    /// Values are compared verbatim for distinctness and sorted case-insensitively,
    /// with the raw value as a tie-break so the order is total.
    pub fn facets(&self) -> FacetCatalog {
        let entries = self.entries.iter().map(|indexed| &indexed.entry);
        FacetCatalog {
            topics: sorted_distinct(entries.clone().flat_map(|entry| entry.topics.iter())),
            tags: sorted_distinct(entries.clone().flat_map(|entry| entry.tags.iter())),
            authors: sorted_distinct(entries.map(|entry| &entry.author)),
        }
    }
}

fn sorted_distinct<'a>(values: impl Iterator<Item = &'a String>) -> Vec<String> {
    let mut seen = AHashSet::new();
    let mut distinct: Vec<String> = values
        .filter(|value| !value.trim().is_empty() && seen.insert(value.as_str()))
        .cloned()
        .collect();
    distinct.sort_by(|a, b| {
        a.to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b))
    });
    distinct
}

/// Date-time layouts without an offset, read as UTC. `%.f` also accepts no fraction.
const NAIVE_DATE_TIME_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Parse a publication timestamp.
///
/// Accepts RFC 3339 (`2024-05-12T09:30:00Z`), a bare date (`2024-05-12`, taken as
/// midnight UTC) or a naive date-time (`2024-05-12T09:30:00`, `2024-05-12 09:30:00.000`,
/// `2024-05-12T09:30`, taken as UTC).
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }
    NAIVE_DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc())
}

/// Orders publication dates newest first; entries without a date sort last.
pub(crate) fn newest_first(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Ordering {
    // `None < Some` for Option, so comparing b to a puts dated entries first.
    b.cmp(&a)
}
