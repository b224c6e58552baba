//! Bounded retry around a model provider.
//!
//! Transient failures (rate limits, 5xx faults, malformed replies) are
//! retried a fixed number of times with a fixed delay between attempts;
//! no jitter, no exponential backoff; the small retry ceiling keeps the
//! worst-case wait bounded. Permanent failures propagate immediately.
//!
//! The delay goes through `tokio::time::sleep`, so tests drive it under a
//! paused clock instead of waiting in real time.

use async_trait::async_trait;
use graphscout_core::error::ProviderError;
use graphscout_core::part::ModelPart;
use graphscout_core::provider::{GenerateRequest, Provider};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// An explicit retry policy: maximum retries and the fixed delay between
/// attempts. A policy with `max_retries = 3` allows 4 total attempts.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            delay: Duration::from_secs(5),
        }
    }
}

/// A provider wrapper that applies a [`RetryPolicy`] to every invocation.
pub struct RetryingProvider {
    inner: Arc<dyn Provider>,
    policy: RetryPolicy,
}

impl RetryingProvider {
    pub fn new(inner: Arc<dyn Provider>, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

#[async_trait]
impl Provider for RetryingProvider {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn generate(
        &self,
        request: GenerateRequest,
    ) -> std::result::Result<Vec<ModelPart>, ProviderError> {
        let mut attempt = 0u32;
        loop {
            match self.inner.generate(request.clone()).await {
                Ok(parts) => return Ok(parts),
                Err(e) if e.is_transient() && attempt < self.policy.max_retries => {
                    attempt += 1;
                    warn!(
                        provider = self.inner.name(),
                        attempt,
                        max_retries = self.policy.max_retries,
                        error = %e,
                        "Retryable provider error, waiting before retry"
                    );
                    tokio::time::sleep(self.policy.delay).await;
                }
                Err(e) => {
                    warn!(
                        provider = self.inner.name(),
                        attempts = attempt + 1,
                        error = %e,
                        "Provider call failed"
                    );
                    return Err(e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphscout_core::provider::ToolChoice;
    use std::sync::Mutex;
    use tokio::time::Instant;

    /// A mock provider that fails a set number of times, then succeeds.
    struct FlakyProvider {
        failures: Mutex<u32>,
        error: ProviderError,
        call_count: Mutex<u32>,
    }

    impl FlakyProvider {
        fn new(failures: u32, error: ProviderError) -> Self {
            Self {
                failures: Mutex::new(failures),
                error,
                call_count: Mutex::new(0),
            }
        }

        fn calls(&self) -> u32 {
            *self.call_count.lock().unwrap()
        }
    }

    #[async_trait]
    impl Provider for FlakyProvider {
        fn name(&self) -> &str {
            "flaky"
        }

        async fn generate(
            &self,
            _request: GenerateRequest,
        ) -> std::result::Result<Vec<ModelPart>, ProviderError> {
            *self.call_count.lock().unwrap() += 1;
            let mut failures = self.failures.lock().unwrap();
            if *failures > 0 {
                *failures -= 1;
                return Err(self.error.clone());
            }
            Ok(vec![ModelPart::text("ok")])
        }
    }

    fn test_request() -> GenerateRequest {
        GenerateRequest {
            model: "test-model".into(),
            prompt: "prompt".into(),
            tools: vec![],
            tool_choice: ToolChoice::Auto,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn retries_transient_then_succeeds() {
        let inner = Arc::new(FlakyProvider::new(
            2,
            ProviderError::RateLimited { retry_after_secs: 5 },
        ));
        let provider = RetryingProvider::new(inner.clone(), RetryPolicy::default());

        let start = Instant::now();
        let parts = provider.generate(test_request()).await.unwrap();
        assert_eq!(parts, vec![ModelPart::text("ok")]);
        assert_eq!(inner.calls(), 3);
        // Two retries, 5 seconds each of (virtual) fixed delay
        assert!(start.elapsed() >= Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn exhausts_retries_and_surfaces_error() {
        let inner = Arc::new(FlakyProvider::new(
            10,
            ProviderError::ApiError {
                status_code: 503,
                message: "overloaded".into(),
            },
        ));
        let provider = RetryingProvider::new(inner.clone(), RetryPolicy::default());

        let err = provider.generate(test_request()).await.unwrap_err();
        assert!(matches!(err, ProviderError::ApiError { status_code: 503, .. }));
        // max_retries + 1 total attempts
        assert_eq!(inner.calls(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn permanent_error_not_retried() {
        let inner = Arc::new(FlakyProvider::new(
            10,
            ProviderError::AuthenticationFailed("bad key".into()),
        ));
        let provider = RetryingProvider::new(inner.clone(), RetryPolicy::default());

        let start = Instant::now();
        let err = provider.generate(test_request()).await.unwrap_err();
        assert!(matches!(err, ProviderError::AuthenticationFailed(_)));
        assert_eq!(inner.calls(), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_retries_means_single_attempt() {
        let inner = Arc::new(FlakyProvider::new(
            1,
            ProviderError::RateLimited { retry_after_secs: 5 },
        ));
        let policy = RetryPolicy {
            max_retries: 0,
            delay: Duration::from_secs(5),
        };
        let provider = RetryingProvider::new(inner.clone(), policy);

        assert!(provider.generate(test_request()).await.is_err());
        assert_eq!(inner.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn malformed_reply_is_retried() {
        let inner = Arc::new(FlakyProvider::new(
            1,
            ProviderError::MalformedReply("no candidates".into()),
        ));
        let provider = RetryingProvider::new(inner.clone(), RetryPolicy::default());

        let parts = provider.generate(test_request()).await.unwrap();
        assert_eq!(parts.len(), 1);
        assert_eq!(inner.calls(), 2);
    }
}
