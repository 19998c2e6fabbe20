//! Knowledge-base search tool: ranked, filtered, paginated results.

use crate::search::{DEFAULT_PAGE_SIZE, HighlightPart, SearchEngine, SearchRequest, SearchResponse};
use rmcp::schemars;
use serde::Deserialize;
use std::fmt::Write as _;

/// Output rendering for tool responses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Readable listing with **emphasised** matches
    #[default]
    Text,
    /// The raw response object
    Json,
}

#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
pub struct SearchToolRequest {
    /// Free-text query; leave empty to browse by filters and recency
    #[serde(default)]
    pub query: String,
    /// Only entries carrying at least one of these topics
    #[serde(default)]
    pub topics: Vec<String>,
    /// Only entries carrying at least one of these tags
    #[serde(default)]
    pub tags: Vec<String>,
    /// Only entries by this author
    pub author: Option<String>,
    /// 1-based page number; out-of-range pages are clamped (default: 1)
    pub page: Option<usize>,
    /// Results per page, at least 1 (default: 10)
    pub page_size: Option<usize>,
    /// Output format (default: text)
    #[serde(default)]
    pub format: OutputFormat,
}

impl From<SearchToolRequest> for SearchRequest {
    fn from(request: SearchToolRequest) -> Self {
        Self {
            query: request.query,
            topics: request.topics,
            tags: request.tags,
            author: request.author,
            page: request.page.unwrap_or(1),
            page_size: request.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        }
    }
}

/// Execute a search and render the response.
pub async fn handle_search(
    engine: &SearchEngine,
    request: SearchToolRequest,
) -> Result<String, String> {
    let format = request.format;
    let search_request = SearchRequest::from(request);

    let response = engine
        .search(&search_request)
        .map_err(|e| format!("Search rejected: {}", e))?;

    match format {
        OutputFormat::Json => serde_json::to_string_pretty(&response)
            .map_err(|e| format!("Failed to encode search response: {}", e)),
        OutputFormat::Text => Ok(format_search_results(&response, &search_request)),
    }
}

/// Render highlight spans with `**bold**` matches.
pub fn render_highlights(parts: &[HighlightPart]) -> String {
    let mut output = String::new();
    for part in parts {
        if part.is_match {
            let _ = write!(output, "**{}**", part.text);
        } else {
            output.push_str(&part.text);
        }
    }
    output
}

/// Format a search response into a readable string output.
pub fn format_search_results(response: &SearchResponse, request: &SearchRequest) -> String {
    if response.total == 0 {
        let mut msg = if request.query.trim().is_empty() {
            "No entries match the selected filters.\n\n".to_string()
        } else {
            format!("No results found for '{}'.\n\n", request.query)
        };

        msg.push_str("Search tips:\n");
        msg.push_str("• Remove a topic, tag or author filter\n");
        msg.push_str("• Use list_facets to see valid filter values\n");
        msg.push_str("• Partial words match too: 'finger' finds 'fingerspelling'\n");
        return msg;
    }

    let mut output = if request.query.trim().is_empty() {
        format!("{} entries", response.total)
    } else {
        format!("{} results for '{}'", response.total, request.query)
    };
    let _ = writeln!(
        output,
        " (page {} of {}):\n",
        response.page, response.page_count
    );

    let offset = (response.page - 1) * response.page_size;
    for (idx, hit) in response.items.iter().enumerate() {
        let _ = writeln!(
            output,
            "{}. {} [{}] - score: {:.4}",
            offset + idx + 1,
            render_highlights(&hit.question_highlights),
            hit.entry.id,
            hit.score
        );
        let _ = writeln!(
            output,
            "   {} · {} · {}",
            hit.entry.author,
            hit.entry.published_at,
            hit.entry.topics.join(", ")
        );
        if !hit.matched_topics.is_empty() || !hit.matched_tags.is_empty() {
            let matched: Vec<&str> = hit
                .matched_topics
                .iter()
                .chain(&hit.matched_tags)
                .map(String::as_str)
                .collect();
            let _ = writeln!(output, "   matched: {}", matched.join(", "));
        }
        let _ = writeln!(output, "   > {}", render_highlights(&hit.snippet));
        output.push('\n');
    }

    if response.page < response.page_count {
        let _ = writeln!(output, "More results on page {}.", response.page + 1);
    }

    output
}
