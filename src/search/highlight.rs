//! Highlight spans and answer snippets for display.

use ahash::AHashSet;
use regex::{Regex, RegexBuilder};
use serde::Serialize;

/// Default snippet length in characters.
pub const SNIPPET_MAX_LENGTH: usize = 220;

/// Characters of context kept before the first match in a snippet.
const SNIPPET_LEAD: usize = 60;

const ELLIPSIS: char = '…';

/// A contiguous run of text, tagged as matching a highlight term or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightPart {
    pub text: String,
    pub is_match: bool,
}

impl HighlightPart {
    fn plain(text: &str) -> Self {
        Self {
            text: text.to_string(),
            is_match: false,
        }
    }

    fn matched(text: &str) -> Self {
        Self {
            text: text.to_string(),
            is_match: true,
        }
    }
}

/// Trim, drop blanks and deduplicate terms, keeping first-seen order.
pub(crate) fn dedupe_terms<S: AsRef<str>>(terms: &[S]) -> Vec<String> {
    let mut seen = AHashSet::new();
    terms
        .iter()
        .map(|term| term.as_ref().trim())
        .filter(|term| !term.is_empty() && seen.insert(*term))
        .map(str::to_string)
        .collect()
}

/// Build one case-insensitive alternation over the escaped terms.
///
/// Alternatives are tried in the given order at each position (leftmost-first).
fn alternation(terms: &[String]) -> Option<Regex> {
    let pattern = terms
        .iter()
        .map(|term| regex::escape(term))
        .collect::<Vec<_>>()
        .join("|");

    match RegexBuilder::new(&pattern).case_insensitive(true).build() {
        Ok(regex) => Some(regex),
        Err(e) => {
            tracing::warn!("Highlighting disabled for {} terms: {}", terms.len(), e);
            None
        }
    }
}

/// Split `text` into alternating matching and non-matching spans.
///
/// The spans cover the text exactly, in order and with original casing, so
/// concatenating them reproduces `text`.
pub fn highlight<S: AsRef<str>>(text: &str, terms: &[S]) -> Vec<HighlightPart> {
    if text.is_empty() {
        return vec![HighlightPart::plain("")];
    }

    let cleaned = dedupe_terms(terms);
    if cleaned.is_empty() {
        return vec![HighlightPart::plain(text)];
    }

    let Some(regex) = alternation(&cleaned) else {
        return vec![HighlightPart::plain(text)];
    };

    let mut parts = Vec::new();
    let mut last_end = 0;
    for found in regex.find_iter(text) {
        if found.start() > last_end {
            parts.push(HighlightPart::plain(&text[last_end..found.start()]));
        }
        parts.push(HighlightPart::matched(found.as_str()));
        last_end = found.end();
    }

    if parts.is_empty() {
        return vec![HighlightPart::plain(text)];
    }
    if last_end < text.len() {
        parts.push(HighlightPart::plain(&text[last_end..]));
    }
    parts
}

/// Extract a bounded excerpt of `text` around the first occurrence of any term.
///
/// Terms are expected in sanitized (lower-case) form and are located in the
/// lower-cased text. The window starts 60 characters before the match and spans
/// at most `max_length` characters; an ellipsis marks each side that was cut.
/// Without a match the excerpt is the leading `max_length` characters.
pub fn snippet<S: AsRef<str>>(text: &str, normalized_terms: &[S], max_length: usize) -> String {
    if text.is_empty() {
        return String::new();
    }

    let chars: Vec<char> = text.chars().collect();

    let Some(earliest) = earliest_occurrence(&chars, normalized_terms) else {
        return truncated_prefix(&chars, max_length);
    };

    let start = earliest.saturating_sub(SNIPPET_LEAD);
    let end = chars.len().min(start + max_length);

    let mut excerpt = String::with_capacity((end - start) + 2);
    if start > 0 {
        excerpt.push(ELLIPSIS);
    }
    let window: String = chars[start..end].iter().collect();
    excerpt.push_str(window.trim_start());
    if end < chars.len() {
        excerpt.push(ELLIPSIS);
    }
    excerpt
}

fn truncated_prefix(chars: &[char], max_length: usize) -> String {
    if chars.len() <= max_length {
        return chars.iter().collect();
    }
    let mut prefix: String = chars[..max_length].iter().collect();
    prefix.push(ELLIPSIS);
    prefix
}

/// Character index of the earliest occurrence of any term in the lower-cased text.
///
/// Each character is lower-cased to a single character so indices line up with
/// the original text.
fn earliest_occurrence<S: AsRef<str>>(chars: &[char], terms: &[S]) -> Option<usize> {
    let lower: Vec<char> = chars
        .iter()
        .map(|c| c.to_lowercase().next().unwrap_or(*c))
        .collect();

    terms
        .iter()
        .map(|term| term.as_ref().chars().collect::<Vec<char>>())
        .filter(|needle| !needle.is_empty() && needle.len() <= lower.len())
        .filter_map(|needle| {
            lower
                .windows(needle.len())
                .position(|window| window == needle.as_slice())
        })
        .min()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use rstest::rstest;

    fn rendered(parts: &[HighlightPart]) -> String {
        parts
            .iter()
            .map(|part| {
                if part.is_match {
                    format!("[{}]", part.text)
                } else {
                    part.text.clone()
                }
            })
            .collect()
    }

    #[rstest]
    #[case("Fingerspelling speed drills", &["speed"], "Fingerspelling [speed] drills")]
    #[case("Fingerspelling SPEED", &["speed"], "Fingerspelling [SPEED]")]
    #[case("speed speed", &["speed"], "[speed] [speed]")]
    #[case("video lighting", &["video", "light"], "[video] [light]ing")]
    #[case("Use 0.85x speed", &["0.85x"], "Use [0.85x] speed")]
    #[case("a (b) c", &["(b)"], "a [(b)] c")]
    #[case("no hits here", &["zebra"], "no hits here")]
    #[case("plain", &[] as &[&str], "plain")]
    #[case("plain", &["  ", ""], "plain")]
    fn test_highlight(#[case] text: &str, #[case] terms: &[&str], #[case] expected: &str) {
        check!(rendered(&highlight(text, terms)) == expected);
    }

    #[test]
    fn test_highlight_leftmost_first_alternation() {
        // At the same start position the earlier term wins.
        check!(rendered(&highlight("facial grammar", &["facial", "facial grammar"])) == "[facial] grammar");
        check!(rendered(&highlight("facial grammar", &["facial grammar", "facial"])) == "[facial grammar]");
    }

    #[test]
    fn test_highlight_empty_text() {
        check!(highlight("", &["x"]) == vec![HighlightPart::plain("")]);
    }

    #[test]
    fn test_highlight_spans_alternate() {
        let parts = highlight("a video, a video", &["video"]);
        check!(parts.len() == 4);
        check!(parts.iter().map(|p| p.text.as_str()).collect::<String>() == "a video, a video");
        check!(parts.iter().filter(|p| p.is_match).count() == 2);
    }

    #[test]
    fn test_dedupe_terms() {
        check!(dedupe_terms(&[" asl", "asl", "", "video ", "video"]) == vec!["asl", "video"]);
    }

    #[test]
    fn test_snippet_short_text_unchanged() {
        check!(snippet("Short answer.", &["nothing"], SNIPPET_MAX_LENGTH) == "Short answer.");
        check!(snippet("Short answer.", &["short"], SNIPPET_MAX_LENGTH) == "Short answer.");
        check!(snippet("", &["x"], SNIPPET_MAX_LENGTH).is_empty());
    }

    #[test]
    fn test_snippet_prefix_without_match() {
        let text = "x".repeat(300);
        let excerpt = snippet(&text, &["zzz"], SNIPPET_MAX_LENGTH);
        check!(excerpt.chars().count() == 221);
        check!(excerpt.ends_with('…'));
    }

    #[test]
    fn test_snippet_centers_on_match() {
        let text = format!("{}needle{}", "a".repeat(100), "b".repeat(300));
        let excerpt = snippet(&text, &["needle"], SNIPPET_MAX_LENGTH);

        check!(excerpt.starts_with('…'));
        check!(excerpt.ends_with('…'));
        // 60 characters of lead-in before the match
        check!(excerpt.chars().skip(1).take(60).all(|c| c == 'a'));
        check!(excerpt.chars().skip(61).collect::<String>().starts_with("needle"));
        check!(excerpt.chars().count() == 220 + 2);
    }

    #[test]
    fn test_snippet_match_near_start() {
        let text = format!("needle {}", "b".repeat(300));
        let excerpt = snippet(&text, &["needle"], SNIPPET_MAX_LENGTH);
        check!(excerpt.starts_with("needle"));
        check!(excerpt.ends_with('…'));
    }

    #[test]
    fn test_snippet_match_near_end() {
        let text = format!("{}needle", "a".repeat(300));
        let excerpt = snippet(&text, &["needle"], SNIPPET_MAX_LENGTH);
        check!(excerpt.starts_with('…'));
        check!(excerpt.ends_with("needle"));
    }

    #[test]
    fn test_snippet_earliest_term_wins() {
        let text = format!("{}second {}first {}", "a".repeat(100), "b".repeat(100), "c".repeat(100));
        let excerpt = snippet(&text, &["first", "second"], SNIPPET_MAX_LENGTH);
        check!(excerpt.chars().skip(61).collect::<String>().starts_with("second"));
    }

    #[test]
    fn test_snippet_trims_leading_whitespace() {
        let text = format!("{}{}needle{}", "a".repeat(40), " ".repeat(30), "b".repeat(300));
        let excerpt = snippet(&text, &["needle"], SNIPPET_MAX_LENGTH);
        // The window starts at index 10, inside the "a" run.
        check!(excerpt.starts_with("…aaaa"));

        let text = format!("{}{}needle{}", "a".repeat(10), " ".repeat(70), "b".repeat(300));
        let excerpt = snippet(&text, &["needle"], SNIPPET_MAX_LENGTH);
        check!(excerpt.starts_with("…needle"));
    }

    #[test]
    fn test_snippet_case_insensitive_and_multibyte() {
        let text = format!("{}Ñandú FACIAL grammar", "é".repeat(100));
        let excerpt = snippet(&text, &["facial"], SNIPPET_MAX_LENGTH);
        check!(excerpt.contains("FACIAL grammar"));
        check!(excerpt.starts_with('…'));
    }
}
