//! The core research loop, the heart of GraphScout.
//!
//! Each run follows a bounded, strictly sequential cycle:
//!
//! 1. **Compose** a prompt from objective, history, notepad and counters,
//!    truncated to the token budget (never below the 3 newest entries)
//! 2. **Invoke** the model with the three-tool schema
//! 3. **Dispatch** any tool call (graph query, notepad write, finish) and
//!    append its result to history
//! 4. **Repeat** until `finish_response` succeeds or the iteration ceiling
//!    is reached, at which point the forced-finish protocol compels an answer
//!
//! The loop guarantees termination and a defined result even when the
//! model misbehaves: every tool-level failure becomes a history notice the
//! model can read, and exhausted fallbacks yield `None` rather than panic.

pub mod dispatch;
pub mod prompt;
pub mod runner;
pub mod schema;
pub mod token;

pub use dispatch::{DispatchOutcome, ToolDispatcher, ToolInvocation};
pub use prompt::{PromptInputs, PromptKind, MIN_HISTORY_ENTRIES, TOKEN_LIMIT};
pub use runner::ResearchAgent;

#[cfg(test)]
pub(crate) mod test_helpers;
