//! Text normalization, tokenization and trigram extraction.

use ahash::AHashSet;
use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// Any Unicode mark (combining diacritics, enclosing marks, spacing marks).
static MARKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\p{M}+").expect("mark pattern is valid"));

/// A maximal run of characters that are neither letters nor numbers.
static SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\p{L}\p{N}]+").expect("separator pattern is valid"));

/// A contiguous three-character window of padded, sanitized text.
pub type Trigram = [char; 3];

/// Padding added on each side of sanitized text before trigram extraction.
const TRIGRAM_PADDING: &str = "  ";

/// Normalizes text for matching.
///
/// Applies NFKD decomposition, drops every combining mark, lower-cases, collapses
/// each run of non-alphanumeric characters into a single space and trims:
/// - "Café Déjà-vu!" → "cafe deja vu"
/// - "  Non-manual   markers " → "non manual markers"
///
/// The result is a fixed point: `sanitize(&sanitize(x)) == sanitize(x)`.
pub fn sanitize(text: &str) -> String {
    let decomposed: String = text.nfkd().collect();
    let stripped = MARKS.replace_all(&decomposed, "");
    let lowered = stripped.to_lowercase();
    SEPARATORS.replace_all(&lowered, " ").trim().to_string()
}

/// Splits a raw query into sanitized tokens. Blank input yields no tokens.
pub fn tokenize(query: &str) -> Vec<String> {
    let sanitized = sanitize(query);
    if sanitized.is_empty() {
        return vec![];
    }
    sanitized.split(' ').map(str::to_string).collect()
}

/// Extracts the trigram set of already-sanitized text.
///
/// The text is padded with two spaces on each side so word boundaries contribute
/// their own trigrams ("  f", " fi", ...). Matching is therefore independent of
/// token boundaries and tolerates partial words and typos.
pub fn trigrams(sanitized: &str) -> AHashSet<Trigram> {
    if sanitized.is_empty() {
        return AHashSet::new();
    }

    let padded: Vec<char> = TRIGRAM_PADDING
        .chars()
        .chain(sanitized.chars())
        .chain(TRIGRAM_PADDING.chars())
        .collect();

    // A padded string of exactly three characters yields itself as the only window.
    padded
        .windows(3)
        .map(|window| [window[0], window[1], window[2]])
        .collect()
}

/// Fraction of shared trigrams relative to the larger set; 0 when either is empty.
pub fn trigram_similarity(query: &AHashSet<Trigram>, target: &AHashSet<Trigram>) -> f64 {
    if query.is_empty() || target.is_empty() {
        return 0.0;
    }

    let matches = query.iter().filter(|trigram| target.contains(*trigram)).count();
    matches as f64 / query.len().max(target.len()) as f64
}
