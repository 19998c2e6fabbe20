//! Facet listing: the values accepted by the search filters.

use crate::search::{FacetCatalog, SearchEngine};
use std::fmt::Write as _;

/// List the topics, tags and authors present in the corpus.
pub async fn handle_list_facets(engine: &SearchEngine) -> Result<String, String> {
    Ok(format_facets(&engine.facets()))
}

pub fn format_facets(facets: &FacetCatalog) -> String {
    let mut output = String::new();
    for (label, values) in [
        ("Topics", &facets.topics),
        ("Tags", &facets.tags),
        ("Authors", &facets.authors),
    ] {
        let _ = writeln!(output, "{} ({}):", label, values.len());
        if values.is_empty() {
            output.push_str("  (none)\n");
        }
        for value in values {
            let _ = writeln!(output, "  • {}", value);
        }
        output.push('\n');
    }
    output
}
