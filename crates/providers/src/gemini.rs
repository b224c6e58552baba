//! Gemini provider implementation.
//!
//! Uses the `generateContent` REST API directly.
//!
//! Features:
//! - `x-goog-api-key` header authentication
//! - Function declarations for tool use
//! - Forced tool choice via `tool_config` with mode ANY
//! - Reply normalization: all text parts merge into one entry (line-separator
//!   join, emission order preserved); at most one function call follows it

use async_trait::async_trait;
use graphscout_core::error::ProviderError;
use graphscout_core::part::ModelPart;
use graphscout_core::provider::{GenerateRequest, Provider, ToolChoice, ToolDefinition};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Gemini `generateContent` provider.
pub struct GeminiProvider {
    name: String,
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    /// Create a new Gemini provider.
    pub fn new(api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(300))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            name: "gemini".into(),
            base_url: DEFAULT_BASE_URL.into(),
            api_key: api_key.into(),
            client,
        }
    }

    /// Create with a custom base URL (e.g., for testing or proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Convert tool definitions to the API's function-declaration format.
    fn to_api_tools(tools: &[ToolDefinition]) -> serde_json::Value {
        let declarations: Vec<serde_json::Value> = tools
            .iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name,
                    "description": t.description,
                    "parameters": t.parameters,
                })
            })
            .collect();
        serde_json::json!([{ "function_declarations": declarations }])
    }
}

#[async_trait]
impl Provider for GeminiProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(
        &self,
        request: GenerateRequest,
    ) -> std::result::Result<Vec<ModelPart>, ProviderError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, request.model
        );

        let mut body = serde_json::json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": request.prompt }],
            }],
        });

        if !request.tools.is_empty() {
            body["tools"] = Self::to_api_tools(&request.tools);
        }

        if let ToolChoice::Forced(ref tool_name) = request.tool_choice {
            body["tool_config"] = serde_json::json!({
                "function_calling_config": {
                    "mode": "ANY",
                    "allowed_function_names": [tool_name],
                },
            });
        }

        debug!(provider = "gemini", model = %request.model, "Sending generate request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status().as_u16();

        if status == 429 {
            return Err(ProviderError::RateLimited { retry_after_secs: 5 });
        }
        if status == 401 || status == 403 {
            return Err(ProviderError::AuthenticationFailed(
                "Invalid Gemini API key".into(),
            ));
        }
        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Gemini API error");
            return Err(ProviderError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let api_resp: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::MalformedReply(format!("Failed to parse reply: {e}")))?;

        let parts = api_resp
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts)
            .unwrap_or_default();

        normalize_parts(parts)
    }
}

/// Collapse wire parts into the uniform part list.
///
/// Text parts merge into a single entry joined with newlines; the first
/// function call (at most one is expected per turn) becomes a separate
/// trailing entry. An empty or unusable reply is a retryable failure.
fn normalize_parts(parts: Vec<WirePart>) -> std::result::Result<Vec<ModelPart>, ProviderError> {
    let mut texts: Vec<String> = Vec::new();
    let mut call: Option<ModelPart> = None;

    for part in parts {
        if let Some(text) = part.text {
            texts.push(text);
        } else if let Some(fc) = part.function_call {
            if call.is_none() {
                call = Some(ModelPart::function_call(fc.name, fc.args));
            } else {
                warn!(name = %fc.name, "Ignoring extra function call in reply");
            }
        } else {
            debug!("Unexpected empty part in reply");
        }
    }

    let mut out = Vec::new();
    if !texts.is_empty() {
        out.push(ModelPart::text(texts.join("\n")));
    }
    if let Some(call) = call {
        out.push(call);
    }

    if out.is_empty() {
        return Err(ProviderError::MalformedReply(
            "Reply contained no usable parts".into(),
        ));
    }
    Ok(out)
}

// --- Wire types ---

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<WirePart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WirePart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,

    #[serde(
        default,
        rename = "functionCall",
        skip_serializing_if = "Option::is_none"
    )]
    function_call: Option<WireFunctionCall>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireFunctionCall {
    name: String,
    #[serde(default)]
    args: serde_json::Map<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_part(text: &str) -> WirePart {
        WirePart {
            text: Some(text.into()),
            function_call: None,
        }
    }

    fn call_part(name: &str, args: serde_json::Value) -> WirePart {
        let args = match args {
            serde_json::Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };
        WirePart {
            text: None,
            function_call: Some(WireFunctionCall {
                name: name.into(),
                args,
            }),
        }
    }

    #[test]
    fn text_parts_merge_with_line_separator() {
        let parts = vec![text_part("first"), text_part("second"), text_part("third")];
        let normalized = normalize_parts(parts).unwrap();
        assert_eq!(normalized, vec![ModelPart::text("first\nsecond\nthird")]);
    }

    #[test]
    fn function_call_comes_after_text() {
        let parts = vec![
            text_part("thinking"),
            call_part("query_graph", serde_json::json!({"query": "nickel demand"})),
        ];
        let normalized = normalize_parts(parts).unwrap();
        assert_eq!(normalized.len(), 2);
        assert_eq!(normalized[0], ModelPart::text("thinking"));
        match &normalized[1] {
            ModelPart::FunctionCall { name, arguments } => {
                assert_eq!(name, "query_graph");
                assert_eq!(arguments["query"], "nickel demand");
            }
            other => panic!("Expected function call, got {other:?}"),
        }
    }

    #[test]
    fn call_only_reply() {
        let parts = vec![call_part("finish_response", serde_json::json!({"content": "Done."}))];
        let normalized = normalize_parts(parts).unwrap();
        assert_eq!(normalized.len(), 1);
        assert!(normalized[0].is_function_call());
    }

    #[test]
    fn extra_function_calls_ignored() {
        let parts = vec![
            call_part("query_graph", serde_json::json!({"query": "a"})),
            call_part("write_to_notepad", serde_json::json!({"content": "b"})),
        ];
        let normalized = normalize_parts(parts).unwrap();
        assert_eq!(normalized.len(), 1);
        match &normalized[0] {
            ModelPart::FunctionCall { name, .. } => assert_eq!(name, "query_graph"),
            other => panic!("Expected function call, got {other:?}"),
        }
    }

    #[test]
    fn empty_reply_is_malformed() {
        let err = normalize_parts(vec![]).unwrap_err();
        assert!(matches!(err, ProviderError::MalformedReply(_)));
        assert!(err.is_transient());
    }

    #[test]
    fn wire_response_parses_camel_case() {
        let raw = serde_json::json!({
            "candidates": [{
                "content": {
                    "parts": [
                        { "text": "Let me check." },
                        { "functionCall": { "name": "query_graph", "args": { "query": "copper" } } }
                    ]
                }
            }]
        });
        let resp: GenerateContentResponse = serde_json::from_value(raw).unwrap();
        let parts = resp.candidates.into_iter().next().unwrap().content.unwrap().parts;
        let normalized = normalize_parts(parts).unwrap();
        assert_eq!(normalized.len(), 2);
    }
}
