pub mod cli;
pub mod corpus;
pub mod error;
pub mod schema;
pub mod search;
pub mod server;
pub mod tools;
pub mod tracing;

pub use corpus::{Corpus, Entry};
pub use error::{CorpusError, SearchError};
pub use search::{
    Clock, FacetCatalog, HighlightPart, SearchEngine, SearchHit, SearchIndex, SearchRequest,
    SearchResponse,
};
pub use server::KnowledgeServer;
