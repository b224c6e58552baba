//! Model output parts and the final answer value object.
//!
//! A model reply is normalized into a list of [`ModelPart`]s: any number of
//! pure-text parts collapse into a single text entry, and at most one
//! function call follows it. Keeping this shape uniform means the loop never
//! has to care which provider produced the reply.

use serde::{Deserialize, Serialize};

/// One normalized unit of model output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModelPart {
    /// Free-form reasoning text.
    Text { text: String },

    /// A structured request to invoke a named tool.
    FunctionCall {
        name: String,
        arguments: serde_json::Map<String, serde_json::Value>,
    },
}

impl ModelPart {
    /// Create a text part.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Create a function-call part.
    pub fn function_call(
        name: impl Into<String>,
        arguments: serde_json::Map<String, serde_json::Value>,
    ) -> Self {
        Self::FunctionCall {
            name: name.into(),
            arguments,
        }
    }

    /// Whether this part is a function call.
    pub fn is_function_call(&self) -> bool {
        matches!(self, Self::FunctionCall { .. })
    }
}

/// The structured answer a run terminates with.
///
/// Produced exactly once, only via a successful `finish_response` dispatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalAnswer {
    /// Markdown answer text with inline square-bracket citations.
    pub content: String,

    /// Citation identifiers, when the model reported them separately.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub citations: Vec<String>,
}

impl FinalAnswer {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            citations: Vec::new(),
        }
    }
}
