//! Knowledge-graph retrieval for GraphScout.
//!
//! `GraphClient` implements the `graphscout_core::Retriever` trait against
//! the graph-output HTTP service. Authentication goes through the
//! `TokenSource` trait so the identity-credential exchange stays swappable
//! (and mockable in tests).

pub mod auth;
pub mod client;

pub use auth::{EnvTokenSource, StaticTokenSource, TokenSource};
pub use client::GraphClient;
