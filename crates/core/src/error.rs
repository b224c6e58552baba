//! Error types for the GraphScout domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all GraphScout operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Auth errors ---
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    // --- Tool errors ---
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Malformed model reply: {0}")]
    MalformedReply(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

impl ProviderError {
    /// Whether this failure is worth retrying.
    ///
    /// Rate limits, transient server faults (5xx) and malformed-but-retryable
    /// replies get another attempt. Everything else (bad credentials, bad
    /// requests, unreachable hosts) propagates immediately so a permanently
    /// invalid request doesn't burn the iteration budget.
    pub fn is_transient(&self) -> bool {
        match self {
            ProviderError::RateLimited { .. } => true,
            ProviderError::MalformedReply(_) => true,
            ProviderError::ApiError { status_code, .. } => *status_code >= 500,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("Credentials not found: {0}")]
    MissingCredentials(String),

    #[error("Token exchange failed: {0}")]
    Exchange(String),
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Invalid arguments for {tool}: {reason}")]
    InvalidArguments { tool: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_displays_correctly() {
        let err = Error::Provider(ProviderError::ApiError {
            status_code: 429,
            message: "Too many requests".into(),
        });
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("Too many requests"));
    }

    #[test]
    fn rate_limit_is_transient() {
        assert!(ProviderError::RateLimited { retry_after_secs: 5 }.is_transient());
    }

    #[test]
    fn server_fault_is_transient() {
        let err = ProviderError::ApiError {
            status_code: 503,
            message: "overloaded".into(),
        };
        assert!(err.is_transient());
    }

    #[test]
    fn malformed_reply_is_transient() {
        assert!(ProviderError::MalformedReply("no candidates".into()).is_transient());
    }

    #[test]
    fn client_errors_are_permanent() {
        assert!(!ProviderError::AuthenticationFailed("bad key".into()).is_transient());
        assert!(
            !ProviderError::ApiError {
                status_code: 400,
                message: "bad request".into()
            }
            .is_transient()
        );
        assert!(!ProviderError::Network("conn refused".into()).is_transient());
    }

    #[test]
    fn tool_error_displays_correctly() {
        let err = Error::Tool(ToolError::InvalidArguments {
            tool: "query_graph".into(),
            reason: "missing 'query'".into(),
        });
        assert!(err.to_string().contains("query_graph"));
        assert!(err.to_string().contains("missing 'query'"));
    }
}
