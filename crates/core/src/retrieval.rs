//! Retriever trait, the abstraction over the knowledge-graph backend.
//!
//! The collaborator contract is deliberately string-in, string-out: on any
//! transport or status failure the retriever returns a *descriptive error
//! string* rather than an error value. The string lands in history where
//! the model can read it and self-correct; a retrieval failure must never
//! crash the loop.

use async_trait::async_trait;

/// Parameters for one knowledge-graph query.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextRequest {
    /// The query string.
    pub query: String,

    /// Start of the time window, "YYYY-MM-DD".
    pub start_date: String,

    /// End of the time window, "YYYY-MM-DD".
    pub end_date: String,

    /// Token budget for returned context.
    pub context_window: u32,

    /// Result count.
    pub k: u32,
}

/// The knowledge-retrieval capability consumed by the `query_graph` tool.
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Fetch context for a query. Always returns a string: retrieved
    /// context on success, a readable error description on failure.
    async fn get_context(&self, request: ContextRequest) -> String;
}
