//! Bearer-token acquisition for the retrieval backend.
//!
//! The real deployment exchanges a service-account credential for a
//! short-lived identity token scoped to the service URL. That exchange
//! lives behind the `TokenSource` trait; the client only ever asks for
//! "a token for this audience".

use async_trait::async_trait;
use graphscout_core::error::AuthError;

/// A source of bearer tokens for a given audience.
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Fetch a token usable as `Authorization: Bearer {token}` against
    /// the given audience (the service URL).
    async fn token(&self, audience: &str) -> Result<String, AuthError>;
}

/// A fixed token, handed in at construction. Useful for tests and for
/// deployments where token refresh happens outside the process.
pub struct StaticTokenSource {
    token: String,
}

impl StaticTokenSource {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }
}

#[async_trait]
impl TokenSource for StaticTokenSource {
    async fn token(&self, _audience: &str) -> Result<String, AuthError> {
        Ok(self.token.clone())
    }
}

/// Reads the token from an environment variable on every call, so an
/// external refresher can rotate it without restarting the process.
pub struct EnvTokenSource {
    var: String,
}

impl EnvTokenSource {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

#[async_trait]
impl TokenSource for EnvTokenSource {
    async fn token(&self, _audience: &str) -> Result<String, AuthError> {
        std::env::var(&self.var)
            .map_err(|_| AuthError::MissingCredentials(format!("env var {} not set", self.var)))
    }
}
