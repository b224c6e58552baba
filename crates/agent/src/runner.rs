//! The research loop itself.
//!
//! [`ResearchAgent`] owns no transport and no model knowledge; it drives a
//! [`Provider`] and a [`Retriever`] through a fixed cycle: compose prompt,
//! generate, record the reply, dispatch its function call. A run ends the
//! moment a valid `finish_response` lands, or after the iteration ceiling
//! plus the forced-finish attempts are exhausted.

use std::sync::Arc;

use graphscout_core::history::{History, Notepad};
use graphscout_core::part::{FinalAnswer, ModelPart};
use graphscout_core::provider::{GenerateRequest, Provider, ToolChoice};
use graphscout_core::retrieval::Retriever;
use tracing::{debug, info, warn};

use crate::dispatch::{DispatchOutcome, ToolDispatcher, ToolInvocation};
use crate::prompt::{self, PromptInputs, PromptKind, TOKEN_LIMIT};
use crate::schema::{FINISH_RESPONSE, finish_response_definition, research_tools};

const DEFAULT_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_CONSERVATIVE_MODEL: &str = "gemini-1.5-pro-latest";
const DEFAULT_MAX_ITERATIONS: u32 = 10;
const DEFAULT_MAX_FORCED_ATTEMPTS: u32 = 3;

/// Drives one research objective to completion.
pub struct ResearchAgent {
    provider: Arc<dyn Provider>,
    dispatcher: ToolDispatcher,
    model: String,
    conservative_model: String,
    max_iterations: u32,
    max_forced_attempts: u32,
    token_limit: usize,
}

impl ResearchAgent {
    pub fn new(provider: Arc<dyn Provider>, retriever: Arc<dyn Retriever>) -> Self {
        Self {
            provider,
            dispatcher: ToolDispatcher::new(retriever),
            model: DEFAULT_MODEL.to_string(),
            conservative_model: DEFAULT_CONSERVATIVE_MODEL.to_string(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
            max_forced_attempts: DEFAULT_MAX_FORCED_ATTEMPTS,
            token_limit: TOKEN_LIMIT,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Model used on the last forced-finish attempt.
    pub fn with_conservative_model(mut self, model: impl Into<String>) -> Self {
        self.conservative_model = model.into();
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_max_forced_attempts(mut self, max_forced_attempts: u32) -> Self {
        self.max_forced_attempts = max_forced_attempts;
        self
    }

    pub fn with_token_limit(mut self, token_limit: usize) -> Self {
        self.token_limit = token_limit;
        self
    }

    /// Research an objective. Returns `None` only when the iteration
    /// ceiling was hit and every forced-finish attempt failed.
    pub async fn run(&self, objective: &str) -> Option<FinalAnswer> {
        let mut history = History::new();
        let mut notepad = Notepad::new();
        let current_date = today();

        info!(
            provider = self.provider.name(),
            model = %self.model,
            max_iterations = self.max_iterations,
            "starting research run"
        );

        let mut current_iteration = 0u32;
        while current_iteration < self.max_iterations {
            current_iteration += 1;
            debug!(current_iteration, "composing prompt");

            let prompt = prompt::compose_with_limit(
                PromptKind::Normal,
                &history,
                &PromptInputs {
                    objective,
                    notepad: notepad.as_str(),
                    current_iteration,
                    max_iterations: self.max_iterations,
                    current_date: &current_date,
                },
                self.token_limit,
            );

            let request = GenerateRequest {
                model: self.model.clone(),
                prompt,
                tools: research_tools(),
                tool_choice: ToolChoice::Auto,
            };

            let parts = match self.provider.generate(request).await {
                Ok(parts) => parts,
                Err(e) => {
                    warn!(current_iteration, error = %e, "generation failed");
                    history.push_notice(format!("An error occured: {e}"));
                    continue;
                }
            };

            history.extend_parts(parts.clone());

            for part in parts {
                let ModelPart::FunctionCall { name, arguments } = part else {
                    continue;
                };
                let invocation = match ToolInvocation::parse(&name, &arguments) {
                    Ok(invocation) => invocation,
                    Err(e) => {
                        warn!(%name, error = %e, "rejected malformed function call");
                        history.push_notice(format!("An error occured: {e}"));
                        continue;
                    }
                };
                if let DispatchOutcome::Finished(answer) = self
                    .dispatcher
                    .dispatch(invocation, &mut history, &mut notepad)
                    .await
                {
                    info!(current_iteration, "research finished");
                    return Some(answer);
                }
            }
        }

        warn!(
            max_iterations = self.max_iterations,
            "iteration ceiling reached, forcing a final answer"
        );
        self.forced_finish(objective, &mut history, &notepad, &current_date)
            .await
    }

    /// Demand a `finish_response` now. The final attempt switches to the
    /// conservative model.
    async fn forced_finish(
        &self,
        objective: &str,
        history: &mut History,
        notepad: &Notepad,
        current_date: &str,
    ) -> Option<FinalAnswer> {
        for attempt in 1..=self.max_forced_attempts {
            let model = if attempt == self.max_forced_attempts {
                &self.conservative_model
            } else {
                &self.model
            };
            info!(attempt, max_attempts = self.max_forced_attempts, %model, "forced finish attempt");

            let prompt = prompt::compose_with_limit(
                PromptKind::ForcedFinish,
                history,
                &PromptInputs {
                    objective,
                    notepad: notepad.as_str(),
                    current_iteration: attempt,
                    max_iterations: self.max_forced_attempts,
                    current_date,
                },
                self.token_limit,
            );

            let request = GenerateRequest {
                model: model.clone(),
                prompt,
                tools: vec![finish_response_definition()],
                tool_choice: ToolChoice::Forced(FINISH_RESPONSE.to_string()),
            };

            let parts = match self.provider.generate(request).await {
                Ok(parts) => parts,
                Err(e) => {
                    warn!(attempt, error = %e, "forced finish generation failed");
                    history.push_notice(format!(
                        "An error occured, you may ONLY call the finish_response function, \
                         do it now: {e}"
                    ));
                    continue;
                }
            };

            history.extend_parts(parts.clone());

            let Some(ModelPart::FunctionCall { name, arguments }) =
                parts.into_iter().find(ModelPart::is_function_call)
            else {
                warn!(attempt, "forced finish reply carried no function call");
                history.push_notice(
                    "No function call was returned, you may ONLY call the \
                     finish_response function, do it now.",
                );
                continue;
            };

            if name != FINISH_RESPONSE {
                warn!(attempt, %name, "forced finish called the wrong function");
                history.push_notice(format!(
                    "Unknown function name: {name} was called, you may ONLY call the \
                     finish_response function, do it now."
                ));
                continue;
            }

            let content = arguments
                .get("content")
                .and_then(serde_json::Value::as_str)
                .unwrap_or_default();
            if content.trim().is_empty() {
                warn!(attempt, "forced finish_response carried no content");
                history.push_notice(
                    "finish_response was called but no valid content was provided, \
                     you MUST provide a valid content string.",
                );
                continue;
            }

            info!(attempt, "forced finish succeeded");
            return Some(FinalAnswer::new(content));
        }

        warn!(
            max_attempts = self.max_forced_attempts,
            "all forced finish attempts failed, giving up"
        );
        None
    }
}

fn today() -> String {
    chrono::Utc::now().format("%Y-%m-%d").to_string()
}
