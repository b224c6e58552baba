//! Tool-call interpretation and dispatch.
//!
//! A raw function call from the model becomes a [`ToolInvocation`] first;
//! parsing is total over well-formed argument maps, so an unrecognized
//! name is a value ([`ToolInvocation::Unknown`]), not an error. Only a
//! missing required argument fails parsing, and the runner converts that
//! failure into a history notice the model can read.

use std::sync::Arc;

use graphscout_core::error::ToolError;
use graphscout_core::history::{History, Notepad};
use graphscout_core::part::FinalAnswer;
use graphscout_core::retrieval::{ContextRequest, Retriever};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::schema::{
    DEFAULT_CONTEXT_WINDOW, DEFAULT_END_DATE, DEFAULT_K, DEFAULT_START_DATE, FINISH_RESPONSE,
    QUERY_GRAPH, WRITE_TO_NOTEPAD,
};

/// A model function call, decoded against the research tool set.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolInvocation {
    QueryGraph {
        query: String,
        start_date: String,
        end_date: String,
    },
    WriteToNotepad {
        content: String,
    },
    FinishResponse {
        content: String,
        citations: Vec<String>,
    },
    /// A name outside the tool set. Dispatch turns it into a corrective
    /// notice rather than failing the iteration.
    Unknown {
        name: String,
    },
}

impl ToolInvocation {
    /// Decode a function call by name and argument map.
    pub fn parse(name: &str, arguments: &Map<String, Value>) -> Result<Self, ToolError> {
        match name {
            QUERY_GRAPH => Ok(ToolInvocation::QueryGraph {
                query: require_str(name, arguments, "query")?,
                start_date: optional_str(arguments, "start_date")
                    .unwrap_or_else(|| DEFAULT_START_DATE.to_string()),
                end_date: optional_str(arguments, "end_date")
                    .unwrap_or_else(|| DEFAULT_END_DATE.to_string()),
            }),
            WRITE_TO_NOTEPAD => Ok(ToolInvocation::WriteToNotepad {
                content: require_str(name, arguments, "content")?,
            }),
            FINISH_RESPONSE => Ok(ToolInvocation::FinishResponse {
                // Absent or non-string content is handled at dispatch, where
                // the empty-content rejection notice lives.
                content: optional_str(arguments, "content").unwrap_or_default(),
                citations: string_list(arguments, "citations"),
            }),
            other => Ok(ToolInvocation::Unknown {
                name: other.to_string(),
            }),
        }
    }
}

fn require_str(tool: &str, arguments: &Map<String, Value>, key: &str) -> Result<String, ToolError> {
    optional_str(arguments, key).ok_or_else(|| ToolError::InvalidArguments {
        tool: tool.to_string(),
        reason: format!("missing required string argument '{key}'"),
    })
}

fn optional_str(arguments: &Map<String, Value>, key: &str) -> Option<String> {
    arguments
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn string_list(arguments: &Map<String, Value>, key: &str) -> Vec<String> {
    arguments
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// What a dispatched call did to the loop.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// The loop keeps going; any result went into history or the notepad.
    Continue,
    /// A valid finish_response ended the run.
    Finished(FinalAnswer),
}

/// Executes tool invocations against the loop's state.
pub struct ToolDispatcher {
    retriever: Arc<dyn Retriever>,
}

impl ToolDispatcher {
    pub fn new(retriever: Arc<dyn Retriever>) -> Self {
        Self { retriever }
    }

    /// Run one invocation. Every branch leaves a record in history, so the
    /// model sees the consequence of its call on the next iteration.
    pub async fn dispatch(
        &self,
        invocation: ToolInvocation,
        history: &mut History,
        notepad: &mut Notepad,
    ) -> DispatchOutcome {
        match invocation {
            ToolInvocation::QueryGraph {
                query,
                start_date,
                end_date,
            } => {
                debug!(%query, %start_date, %end_date, "querying knowledge graph");
                let context = self
                    .retriever
                    .get_context(ContextRequest {
                        query,
                        start_date,
                        end_date,
                        context_window: DEFAULT_CONTEXT_WINDOW,
                        k: DEFAULT_K,
                    })
                    .await;
                let preview: String = context.chars().take(100).collect();
                debug!(%preview, "knowledge graph context received");
                history.push_notice(context);
                DispatchOutcome::Continue
            }
            ToolInvocation::WriteToNotepad { content } => {
                notepad.append(&content);
                history.push_notice(format!("Added to notepad: {content}"));
                DispatchOutcome::Continue
            }
            ToolInvocation::FinishResponse { content, citations } => {
                if content.trim().is_empty() {
                    warn!("finish_response called without content, rejecting");
                    history.push_notice(
                        "finish_response was called but no valid content was provided, \
                         you MUST provide a valid content string.",
                    );
                    return DispatchOutcome::Continue;
                }
                let mut answer = FinalAnswer::new(content);
                answer.citations = citations;
                DispatchOutcome::Finished(answer)
            }
            ToolInvocation::Unknown { name } => {
                warn!(%name, "model called an unknown function");
                history.push_notice(format!(
                    "Unknown function name: {name} was called, please call a valid function."
                ));
                DispatchOutcome::Continue
            }
        }
    }
}
