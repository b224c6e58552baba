//! Provider trait, the abstraction over the model capability.
//!
//! A Provider knows how to send a prompt (plus tool declarations) to a
//! language model and normalize the reply into [`ModelPart`]s. The agent
//! loop calls `generate()` without knowing which backend is being used.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::part::ModelPart;

/// A tool declaration sent to the model so it knows what it can call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// The tool name
    pub name: String,

    /// Description of what the tool does
    pub description: String,

    /// JSON Schema describing the tool's parameters
    pub parameters: serde_json::Value,
}

/// How the model is allowed to use the declared tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolChoice {
    /// Tool use is optional; the model may answer with text alone.
    Auto,

    /// The model must call exactly this tool.
    Forced(String),
}

impl Default for ToolChoice {
    fn default() -> Self {
        Self::Auto
    }
}

/// A single model invocation.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    /// The model to use (e.g. "gemini-2.0-flash")
    pub model: String,

    /// The fully composed prompt text
    pub prompt: String,

    /// Tools the model may call
    pub tools: Vec<ToolDefinition>,

    /// Whether tool use is optional or forced
    pub tool_choice: ToolChoice,
}

/// The model capability.
///
/// Implementations normalize provider replies into a uniform part list:
/// all pure-text parts merged into one text entry (line-separator join,
/// emission order preserved), followed by at most one function call.
#[async_trait]
pub trait Provider: Send + Sync {
    /// A human-readable name for this provider (e.g. "gemini").
    fn name(&self) -> &str;

    /// Send a prompt and get the normalized reply parts.
    async fn generate(
        &self,
        request: GenerateRequest,
    ) -> std::result::Result<Vec<ModelPart>, ProviderError>;
}
