//! Question suggestions for type-ahead.

use crate::search::{DEFAULT_SUGGESTION_LIMIT, SearchEngine};
use rmcp::schemars;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
pub struct SuggestRequest {
    /// Partially typed query; empty returns the newest questions
    #[serde(default)]
    pub query: String,
    /// Maximum number of suggestions (default: 6)
    pub limit: Option<usize>,
}

/// Suggest questions, one per line.
pub async fn handle_suggest(engine: &SearchEngine, request: SuggestRequest) -> Result<String, String> {
    let limit = request.limit.unwrap_or(DEFAULT_SUGGESTION_LIMIT);
    let suggestions = engine.suggest(&request.query, limit);

    if suggestions.is_empty() {
        return Ok("No suggestions available.".to_string());
    }

    Ok(format_suggestions(&suggestions))
}

pub fn format_suggestions(suggestions: &[String]) -> String {
    let mut output = String::new();
    for suggestion in suggestions {
        output.push_str("• ");
        output.push_str(suggestion);
        output.push('\n');
    }
    output
}
