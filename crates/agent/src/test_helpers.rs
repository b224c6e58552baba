//! Shared doubles for loop tests: a provider that replays a script and
//! records every request it saw, and a retriever that returns a fixed
//! string.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use graphscout_core::error::ProviderError;
use graphscout_core::part::ModelPart;
use graphscout_core::provider::{GenerateRequest, Provider};
use graphscout_core::retrieval::{ContextRequest, Retriever};
use serde_json::Value;

/// Replays a fixed sequence of generation results. Requests are recorded
/// so tests can assert on prompts, models, and tool choices. Running past
/// the end of the script returns a timeout, which a correct loop never
/// does.
pub(crate) struct ScriptedProvider {
    script: Mutex<std::vec::IntoIter<Result<Vec<ModelPart>, ProviderError>>>,
    recorded: Mutex<Vec<GenerateRequest>>,
}

impl ScriptedProvider {
    pub(crate) fn new(script: Vec<Result<Vec<ModelPart>, ProviderError>>) -> Self {
        Self {
            script: Mutex::new(script.into_iter()),
            recorded: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn requests(&self) -> Vec<GenerateRequest> {
        self.recorded.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(
        &self,
        request: GenerateRequest,
    ) -> Result<Vec<ModelPart>, ProviderError> {
        self.recorded.lock().unwrap().push(request);
        self.script
            .lock()
            .unwrap()
            .next()
            .unwrap_or_else(|| Err(ProviderError::Timeout("script exhausted".into())))
    }
}

/// Returns the same context string for every query.
pub(crate) struct StubRetriever {
    context: String,
}

impl StubRetriever {
    pub(crate) fn new(context: impl Into<String>) -> Self {
        Self {
            context: context.into(),
        }
    }
}

#[async_trait]
impl Retriever for StubRetriever {
    async fn get_context(&self, _request: ContextRequest) -> String {
        self.context.clone()
    }
}

pub(crate) fn text_part(text: &str) -> ModelPart {
    ModelPart::text(text)
}

pub(crate) fn call_part(name: &str, arguments: Value) -> ModelPart {
    let Value::Object(map) = arguments else {
        panic!("call_part requires a JSON object");
    };
    ModelPart::function_call(name, map)
}

pub(crate) fn finish_part(content: &str) -> ModelPart {
    call_part("finish_response", serde_json::json!({ "content": content }))
}
