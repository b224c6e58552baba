//! # GraphScout Core
//!
//! Domain types, traits, and error definitions for the GraphScout research
//! agent. This crate has **zero framework dependencies**: it defines the
//! domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every external collaborator is defined as a trait here: the model
//! capability (`Provider`) and the knowledge-graph backend (`Retriever`).
//! Implementations live in their respective crates. This enables:
//! - Swapping implementations via configuration
//! - Easy testing with mock/stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod error;
pub mod history;
pub mod part;
pub mod provider;
pub mod retrieval;

// Re-export key types at crate root for ergonomics
pub use error::{AuthError, Error, ProviderError, Result, ToolError};
pub use history::{History, HistoryEntry, Notepad};
pub use part::{FinalAnswer, ModelPart};
pub use provider::{GenerateRequest, Provider, ToolChoice, ToolDefinition};
pub use retrieval::{ContextRequest, Retriever};
