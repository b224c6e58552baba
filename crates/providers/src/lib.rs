//! Model provider implementations for GraphScout.
//!
//! All providers implement the `graphscout_core::Provider` trait.
//! `RetryingProvider` wraps any of them with a bounded fixed-delay
//! retry policy for transient failures.

pub mod gemini;
pub mod retry;

pub use gemini::GeminiProvider;
pub use retry::{RetryPolicy, RetryingProvider};
