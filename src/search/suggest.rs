//! Lightweight autosuggest over question texts.

use super::index::newest_first;
use super::query::SearchEngine;
use super::scoring::{ScoringQuery, SearchFilters, score_entry};
use ahash::AHashSet;

/// Number of suggestions returned when the caller does not specify a limit.
pub const DEFAULT_SUGGESTION_LIMIT: usize = 6;

/// Suggestions must score strictly above this to count as relevant.
const MIN_SUGGESTION_SCORE: f64 = 0.2;

impl SearchEngine {
    /// Suggest up to `limit` distinct questions for a partially typed query.
    ///
    /// A blank query yields the most recently published questions. Otherwise
    /// questions are ranked with the search scoring (no facet filters) and, if too
    /// few clear the relevance floor, the rest is filled from the corpus in order.
    pub fn suggest(&self, query: &str, limit: usize) -> Vec<String> {
        let mut suggestions = Suggestions::new(limit);

        if query.trim().is_empty() {
            let mut recent: Vec<_> = self.index().entries().iter().collect();
            recent.sort_by(|a, b| newest_first(a.published, b.published));
            suggestions.extend(recent.iter().map(|indexed| indexed.entry.question.as_str()));
            return suggestions.finish();
        }

        let scoring = ScoringQuery::from_text(query);
        let filters = SearchFilters::default();
        let now = self.clock().now();

        let mut relevant: Vec<(&str, f64)> = self
            .index()
            .entries()
            .iter()
            .map(|indexed| {
                let score = score_entry(indexed, &scoring, &filters, now);
                (indexed.entry.question.as_str(), score)
            })
            .filter(|(_, score)| *score > MIN_SUGGESTION_SCORE)
            .collect();
        relevant.sort_by(|(question_a, score_a), (question_b, score_b)| {
            score_b.total_cmp(score_a).then_with(|| question_a.cmp(question_b))
        });

        let ranked = relevant.len();
        suggestions.extend(relevant.into_iter().map(|(question, _)| question));
        let from_ranking = suggestions.len();
        suggestions.extend(
            self.index()
                .entries()
                .iter()
                .map(|indexed| indexed.entry.question.as_str()),
        );

        tracing::debug!(
            query,
            ranked,
            from_ranking,
            backfilled = suggestions.len() - from_ranking,
            "Built suggestions"
        );
        suggestions.finish()
    }
}

/// Accumulates distinct questions until the limit is reached.
struct Suggestions<'a> {
    limit: usize,
    seen: AHashSet<&'a str>,
    questions: Vec<String>,
}

impl<'a> Suggestions<'a> {
    fn new(limit: usize) -> Self {
        Self {
            limit,
            seen: AHashSet::new(),
            questions: Vec::with_capacity(limit.min(64)),
        }
    }

    fn len(&self) -> usize {
        self.questions.len()
    }

    fn extend(&mut self, candidates: impl Iterator<Item = &'a str>) {
        for question in candidates {
            if self.questions.len() >= self.limit {
                return;
            }
            if self.seen.insert(question) {
                self.questions.push(question.to_string());
            }
        }
    }

    fn finish(self) -> Vec<String> {
        self.questions
    }
}
