//! MCP server exposing the knowledge-base tools.

use crate::schema::inline_schema_for_type;
use crate::search::SearchEngine;
use crate::tools::facets::handle_list_facets;
use crate::tools::search::{SearchToolRequest, handle_search};
use crate::tools::suggest::{SuggestRequest, handle_suggest};
use rmcp::{
    ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    tool, tool_handler, tool_router,
};
use std::sync::Arc;

/// MCP server answering knowledge-base queries.
///
/// The engine is immutable and shared; every tool call is an independent
/// read over it.
#[derive(Clone)]
pub struct KnowledgeServer {
    engine: Arc<SearchEngine>,

    /// Tool router for handling MCP tool calls
    tool_router: ToolRouter<Self>,
}

impl std::fmt::Debug for KnowledgeServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KnowledgeServer")
            .field("entries", &self.engine.index().len())
            .field("clock", &self.engine.clock())
            .finish()
    }
}

#[tool_router]
impl KnowledgeServer {
    pub fn new(engine: SearchEngine) -> Self {
        Self::from_shared(Arc::new(engine))
    }

    pub fn from_shared(engine: Arc<SearchEngine>) -> Self {
        Self {
            engine,
            tool_router: Self::tool_router(),
        }
    }

    pub fn engine(&self) -> &Arc<SearchEngine> {
        &self.engine
    }

    #[tool(
        description = "Search the knowledge base. Matches whole and partial words in questions, answers, topics, tags and authors, ranks by relevance and recency, and returns a page of results with highlighted matches and an answer snippet. Narrow with topics, tags or author (see list_facets).",
        input_schema = inline_schema_for_type::<SearchToolRequest>()
    )]
    async fn search(
        &self,
        Parameters(request): Parameters<SearchToolRequest>,
    ) -> std::result::Result<String, String> {
        tracing::debug!(query = %request.query, "search tool called");
        handle_search(&self.engine, request).await
    }

    #[tool(
        description = "Suggest knowledge-base questions for a partially typed query. An empty query returns the most recently published questions.",
        input_schema = inline_schema_for_type::<SuggestRequest>()
    )]
    async fn suggest(
        &self,
        Parameters(request): Parameters<SuggestRequest>,
    ) -> std::result::Result<String, String> {
        handle_suggest(&self.engine, request).await
    }

    #[tool(
        description = "List every topic, tag and author in the knowledge base. These are the values accepted by the search filters."
    )]
    async fn list_facets(&self) -> std::result::Result<String, String> {
        handle_list_facets(&self.engine).await
    }
}

#[tool_handler]
impl ServerHandler for KnowledgeServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo::new(ServerCapabilities::builder().enable_tools().build()).with_instructions(
            "kb-search-mcp: relevance-ranked search over a question/answer knowledge base. \
             Use search for ranked, highlighted results, suggest for type-ahead questions, \
             and list_facets to discover the topic, tag and author filters.",
        )
    }
}
