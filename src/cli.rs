//! Command-line arguments and engine configuration.

use crate::corpus::Corpus;
use crate::error::Result;
use crate::search::{
    Clock, DEFAULT_PAGE_SIZE, DEFAULT_SUGGESTION_LIMIT, SearchEngine, SearchRequest,
    parse_timestamp,
};
use crate::tracing::LogFormat;
use anyhow::anyhow;
use clap::{Args, Parser, Subcommand};
use std::borrow::Cow;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "kb-search-mcp", version)]
#[command(about = "Search a question/answer knowledge base, over MCP or from the shell", long_about = None)]
pub struct Cli {
    /// Corpus file (.json array of entries, or .toml with [[entries]]); defaults to the built-in knowledge base
    #[arg(long, global = true, env = "KB_SEARCH_CORPUS")]
    pub corpus: Option<String>,

    /// Score recency as of this date (YYYY-MM-DD or RFC 3339) instead of now
    #[arg(long, global = true, env = "KB_SEARCH_AS_OF")]
    pub as_of: Option<String>,

    /// Log line format (written to stderr)
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Serve the search tools over MCP on stdio (default)
    Serve,
    /// Run one search and print the requested page
    Search(SearchArgs),
    /// Print question suggestions for a partial query
    Suggest {
        #[arg(default_value = "")]
        query: String,
        #[arg(short = 'n', long, default_value_t = DEFAULT_SUGGESTION_LIMIT)]
        limit: usize,
        #[arg(long)]
        json: bool,
    },
    /// List the topics, tags and authors available as filters
    Facets {
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Free-text query; may be empty to browse by facets
    #[arg(default_value = "")]
    pub query: String,
    /// Keep entries with this topic (repeatable)
    #[arg(short = 't', long = "topic")]
    pub topics: Vec<String>,
    /// Keep entries with this tag (repeatable)
    #[arg(short = 'g', long = "tag")]
    pub tags: Vec<String>,
    #[arg(short, long)]
    pub author: Option<String>,
    #[arg(short, long, default_value_t = 1)]
    pub page: usize,
    #[arg(short = 'n', long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: usize,
    /// Print the full response as JSON
    #[arg(long)]
    pub json: bool,
}

impl SearchArgs {
    /// Build the library request for this invocation.
    pub fn to_request(&self) -> SearchRequest {
        let request = SearchRequest::new(self.query.clone())
            .with_topics(self.topics.iter().cloned())
            .with_tags(self.tags.iter().cloned())
            .with_page(self.page)
            .with_page_size(self.page_size);
        match &self.author {
            Some(author) => request.with_author(author.clone()),
            None => request,
        }
    }
}

impl Cli {
    /// The clock implied by `--as-of`.
    pub fn clock(&self) -> Result<Clock> {
        match self.as_of.as_deref() {
            None => Ok(Clock::System),
            Some(value) => parse_timestamp(value)
                .map(Clock::Fixed)
                .ok_or_else(|| anyhow!("Invalid --as-of value '{}': expected YYYY-MM-DD or RFC 3339", value)),
        }
    }

    /// Load the configured corpus and build the engine.
    pub fn load_engine(&self) -> Result<SearchEngine> {
        let corpus = match self.corpus.as_deref() {
            Some(path) => Corpus::load(&PathBuf::from(expand_tilde(path).as_ref()))?,
            None => Corpus::builtin()?,
        };
        Ok(SearchEngine::from_corpus(corpus).with_clock(self.clock()?))
    }
}

/// Expands tilde (`~`) in a path to the user's home directory.
///
/// - `~/foo` becomes `/home/user/foo`
/// - `~` becomes `/home/user`
/// - Other paths are returned unchanged
///
/// Returns `Cow::Borrowed` if no expansion needed, `Cow::Owned` if expanded.
pub fn expand_tilde(path: &str) -> Cow<'_, str> {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return Cow::Owned(home.join(stripped).display().to_string());
        }
    } else if path == "~"
        && let Some(home) = dirs::home_dir()
    {
        return Cow::Owned(home.display().to_string());
    }
    Cow::Borrowed(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};

    #[test]
    fn test_search_arguments() {
        let cli = Cli::parse_from([
            "kb-search-mcp",
            "search",
            "camera setup",
            "--tag",
            "video",
            "--tag",
            "lighting",
            "--author",
            "Avery Johnson",
            "-p",
            "2",
        ]);
        let_assert!(Some(Commands::Search(args)) = cli.command);
        let request = args.to_request();
        check!(request.query == "camera setup");
        check!(request.tags == vec!["video", "lighting"]);
        check!(request.author.as_deref() == Some("Avery Johnson"));
        check!(request.page == 2);
        check!(request.page_size == DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_serve_is_default() {
        let cli = Cli::parse_from(["kb-search-mcp"]);
        check!(cli.command.is_none());
    }

    #[test]
    fn test_as_of_clock() {
        let cli = Cli::parse_from(["kb-search-mcp", "--as-of", "2024-09-01", "facets"]);
        let_assert!(Ok(Clock::Fixed(instant)) = cli.clock());
        check!(instant.to_rfc3339() == "2024-09-01T00:00:00+00:00");

        let cli = Cli::parse_from(["kb-search-mcp", "--as-of", "tomorrow", "facets"]);
        check!(cli.clock().is_err());
    }

    #[test]
    fn test_expand_tilde_passthrough() {
        check!(expand_tilde("/tmp/corpus.json") == "/tmp/corpus.json");
        check!(expand_tilde("corpus~.json") == "corpus~.json");
    }
}
