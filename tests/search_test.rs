mod common;

use assert2::{check, let_assert};
use common::{engine, engine_for, entry};
use kb_search_mcp::search::sanitize;
use kb_search_mcp::{HighlightPart, SearchEngine, SearchError, SearchRequest};
use rstest::rstest;

fn ids(response: &kb_search_mcp::SearchResponse) -> Vec<&str> {
    response.items.iter().map(|hit| hit.entry.id.as_str()).collect()
}

fn joined(parts: &[HighlightPart]) -> String {
    parts.iter().map(|part| part.text.as_str()).collect()
}

// --- Relevance ---

#[rstest]
fn fingerspelling_speed_ranks_its_entry_first(engine: SearchEngine) {
    let_assert!(Ok(response) = engine.search(&SearchRequest::new("fingerspelling speed")));
    let_assert!(Some(top) = response.items.first());

    check!(top.entry.id == "asl-fingerspelling-speed");
    check!(
        top.question_highlights
            .iter()
            .any(|part| part.is_match && part.text.to_lowercase().contains("fingerspelling")),
        "question highlights should mark 'fingerspelling': {:?}",
        top.question_highlights
    );
}

#[rstest]
fn facial_grammar_snippet_is_highlighted(engine: SearchEngine) {
    let_assert!(Ok(response) = engine.search(&SearchRequest::new("facial grammar practice")));
    let_assert!(Some(top) = response.items.first());

    check!(top.entry.id == "expressive-facial-grammar");
    check!(top.snippet.iter().any(|part| part.is_match));
}

#[rstest]
fn partial_words_match(engine: SearchEngine) {
    let_assert!(Ok(response) = engine.search(&SearchRequest::new("finger")));
    check!(ids(&response).first() == Some(&"asl-fingerspelling-speed"));
}

#[rstest]
fn scores_are_rounded_to_four_places(engine: SearchEngine) {
    let_assert!(Ok(response) = engine.search(&SearchRequest::new("camera lighting")));
    for hit in &response.items {
        check!((hit.score * 10_000.0).round() / 10_000.0 == hit.score);
    }
}

#[rstest]
fn search_is_deterministic(engine: SearchEngine) {
    let request = SearchRequest::new("asl practice").with_page_size(4).with_page(2);
    let first = engine.search(&request);
    let second = engine.search(&request);
    check!(first == second);
}

// --- Filters ---

#[rstest]
fn tag_and_author_filters_without_query(engine: SearchEngine) {
    let request = SearchRequest::new("")
        .with_tags(["video"])
        .with_author("Avery Johnson");
    let_assert!(Ok(response) = engine.search(&request));

    check!(response.total == 1);
    check!(ids(&response) == vec!["recording-setup"]);
    check!(response.items[0].matched_tags.contains(&"video".to_string()));
}

#[rstest]
#[case::exact("Practice Techniques")]
#[case::lowercase("practice techniques")]
#[case::punctuated("practice-techniques!")]
fn topic_filter_is_normalized(engine: SearchEngine, #[case] topic: &str) {
    let_assert!(Ok(response) = engine.search(&SearchRequest::new("").with_topics([topic])));
    check!(response.total == 2);
    for hit in &response.items {
        check!(hit.entry.topics.iter().any(|t| sanitize(t) == "practice techniques"));
        check!(hit.matched_topics == vec!["Practice Techniques"]);
    }
}

#[rstest]
fn every_hit_satisfies_every_filter(engine: SearchEngine) {
    let request = SearchRequest::new("practice")
        .with_topics(["Grammar", "Community"])
        .with_tags(["ASL", "feedback"]);
    let_assert!(Ok(response) = engine.search(&request));
    check!(response.total > 0);

    for hit in &response.items {
        check!(hit.entry.topics.iter().any(|t| t == "Grammar" || t == "Community"));
        check!(hit.entry.tags.iter().any(|t| t == "ASL" || t == "feedback"));
    }
}

#[rstest]
fn author_filter_is_case_insensitive(engine: SearchEngine) {
    let_assert!(Ok(response) = engine.search(&SearchRequest::new("").with_author("avery JOHNSON")));
    check!(response.total == 3);
    check!(response.items.iter().all(|hit| hit.entry.author == "Avery Johnson"));
}

#[rstest]
fn unknown_facet_value_matches_nothing(engine: SearchEngine) {
    let_assert!(Ok(response) = engine.search(&SearchRequest::new("asl").with_tags(["knitting"])));
    check!(response.total == 0);
    check!(response.items.is_empty());
}

// --- Ordering ---

#[rstest]
fn blank_query_orders_by_recency(engine: SearchEngine) {
    let_assert!(Ok(response) = engine.search(&SearchRequest::new("").with_page_size(12)));
    check!(response.total == 12);
    check!(ids(&response)[0] == "simultaneous-interpreting-lag");
    check!(ids(&response)[11] == "handshape-drift");
}

#[test]
fn ties_break_by_date_then_question() {
    let entries = vec![
        entry("undated", "Any tips for regional signs?", "someday"),
        entry("b-early", "Beta question", "2025-01-01"),
        entry("late", "Zulu question", "2025-06-01"),
        entry("a-early", "Alpha question", "2025-01-01"),
    ];
    let mut reversed = entries.clone();
    reversed.reverse();

    for corpus in [entries, reversed] {
        let engine = engine_for(corpus);
        let_assert!(Ok(response) = engine.search(&SearchRequest::new("")));
        check!(ids(&response) == vec!["late", "a-early", "b-early", "undated"]);
    }
}

// --- Pagination ---

#[rstest]
fn pages_concatenate_to_full_ranking(engine: SearchEngine) {
    let full = engine
        .search(&SearchRequest::new("sign").with_page_size(100))
        .unwrap();

    let mut paged = Vec::new();
    for page in 1..=full.total.div_ceil(5) {
        let response = engine
            .search(&SearchRequest::new("sign").with_page_size(5).with_page(page))
            .unwrap();
        check!(response.total == full.total);
        paged.extend(response.items);
    }

    check!(paged == full.items);
}

#[rstest]
fn page_beyond_last_is_clamped(engine: SearchEngine) {
    let_assert!(Ok(response) = engine.search(&SearchRequest::new("").with_page_size(5).with_page(99)));
    check!(response.page_count == 3);
    check!(response.page == 3);
    check!(response.items.len() == 2);
}

#[rstest]
fn zero_page_size_is_rejected(engine: SearchEngine) {
    let result = engine.search(&SearchRequest::new("asl").with_page_size(0));
    check!(result == Err(SearchError::InvalidPageSize(0)));
}

// --- Highlighting ---

#[rstest]
fn highlights_reconstruct_original_text(engine: SearchEngine) {
    let request = SearchRequest::new("storytelling warm ups")
        .with_tags(["BSL"])
        .with_author("Priya Patel");
    let_assert!(Ok(response) = engine.search(&request));
    check!(response.total > 0);

    for hit in &response.items {
        check!(joined(&hit.question_highlights) == hit.entry.question);
        check!(joined(&hit.answer_highlights) == hit.entry.answer);
    }
}

#[rstest]
fn snippet_is_bounded(engine: SearchEngine) {
    let_assert!(Ok(response) = engine.search(&SearchRequest::new("lag").with_page_size(12)));
    for hit in &response.items {
        let snippet = joined(&hit.snippet);
        // window plus up to two ellipses
        check!(snippet.chars().count() <= 222);
    }
}
