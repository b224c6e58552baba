//! Tool schemas surfaced to the model.
//!
//! Three tools, fixed for every run: `query_graph`, `write_to_notepad`,
//! `finish_response`. The declarations are static configuration, read-only
//! after initialization, shared safely between concurrent runs.

use graphscout_core::provider::ToolDefinition;

pub const QUERY_GRAPH: &str = "query_graph";
pub const WRITE_TO_NOTEPAD: &str = "write_to_notepad";
pub const FINISH_RESPONSE: &str = "finish_response";

/// Default time window and retrieval parameters for `query_graph` when the
/// model omits the optional arguments.
pub const DEFAULT_START_DATE: &str = "2024-06-01";
pub const DEFAULT_END_DATE: &str = "2025-03-22";
pub const DEFAULT_CONTEXT_WINDOW: u32 = 10_000;
pub const DEFAULT_K: u32 = 50;

/// Declaration for the knowledge-graph query tool.
pub fn query_graph_definition() -> ToolDefinition {
    ToolDefinition {
        name: QUERY_GRAPH.into(),
        description: "Takes a query string as input, queries the global financial knowledge \
                      graph to retrieve context relevant to the query, and returns the results. \
                      Returns 10000 tokens of context at a time, so ensure that you understand \
                      how to use this query effectively."
            .into(),
        parameters: serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The query string to search in the global financial knowledge graph. Results are retrieved based on cosine similarity and personalised pagerank against the input query."
                },
                "start_date": {
                    "type": "string",
                    "description": "The start date for the context window. Default is '2024-06-01'. Use this for more targeted queries."
                },
                "end_date": {
                    "type": "string",
                    "description": "The end date for the context window. Default is '2025-03-22'. This cannot be a future date. Use this for more targeted queries."
                }
            },
            "required": ["query"]
        }),
    }
}

/// Declaration for the notepad tool.
pub fn write_to_notepad_definition() -> ToolDefinition {
    ToolDefinition {
        name: WRITE_TO_NOTEPAD.into(),
        description: "Takes a content string as input and adds it to your notepad. \
                      Returns a success message."
            .into(),
        parameters: serde_json::json!({
            "type": "object",
            "properties": {
                "content": {
                    "type": "string",
                    "description": "The content to be added to the notepad."
                }
            },
            "required": ["content"]
        }),
    }
}

/// Declaration for the finish tool, the only normal exit path.
pub fn finish_response_definition() -> ToolDefinition {
    ToolDefinition {
        name: FINISH_RESPONSE.into(),
        description: "Returns final results to the user.".into(),
        parameters: serde_json::json!({
            "type": "object",
            "properties": {
                "content": {
                    "type": "string",
                    "description": "Final response content for the user."
                }
            },
            "required": ["content"]
        }),
    }
}

/// The full three-tool schema advertised on normal iterations.
pub fn research_tools() -> Vec<ToolDefinition> {
    vec![
        query_graph_definition(),
        write_to_notepad_definition(),
        finish_response_definition(),
    ]
}
