//! HTTP client for the graph-output service.
//!
//! One GET per query against `get_similar_entity_and_relationships`, bearer
//! authenticated. By contract every failure (auth, transport, status)
//! comes back as a descriptive string, not an error: the caller appends it
//! to history where the model (and ultimately the user) can read it.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use graphscout_config::RetrievalConfig;
use graphscout_core::retrieval::{ContextRequest, Retriever};
use tracing::{debug, warn};

use crate::auth::TokenSource;

const ENDPOINT: &str = "get_similar_entity_and_relationships";

/// Client for the knowledge-graph retrieval service.
pub struct GraphClient {
    client: reqwest::Client,
    config: RetrievalConfig,
    tokens: Arc<dyn TokenSource>,
}

impl GraphClient {
    pub fn new(config: RetrievalConfig, tokens: Arc<dyn TokenSource>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            config,
            tokens,
        }
    }

    /// Parse a "YYYY-MM-DD" date into Unix seconds (midnight UTC), falling
    /// back to the configured default when the model hands us garbage.
    fn timestamp_or(&self, date: &str, fallback: &str) -> i64 {
        parse_date(date)
            .or_else(|| {
                warn!(date, "Unparsable date in query, using default window bound");
                parse_date(fallback)
            })
            .unwrap_or(0)
    }

    async fn fetch(&self, request: &ContextRequest) -> Result<String, String> {
        let token = self
            .tokens
            .token(&self.config.base_url)
            .await
            .map_err(|e| e.to_string())?;

        let url = format!("{}/{}", self.config.base_url.trim_end_matches('/'), ENDPOINT);
        let start_ts = self.timestamp_or(&request.start_date, &self.config.start_date);
        let end_ts = self.timestamp_or(&request.end_date, &self.config.end_date);

        debug!(query = %request.query, start_ts, end_ts, "Querying knowledge graph");

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .query(&[
                ("project", self.config.project.as_str()),
                ("query_content", request.query.as_str()),
            ])
            .query(&[
                ("context_window", request.context_window),
                ("k", request.k),
            ])
            .query(&[("index", true)])
            .query(&[("start_timestamp", start_ts), ("end_timestamp", end_ts)])
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("service returned status {status}"));
        }

        let body: serde_json::Value = response.json().await.map_err(|e| e.to_string())?;
        Ok(body.to_string())
    }
}

#[async_trait]
impl Retriever for GraphClient {
    async fn get_context(&self, request: ContextRequest) -> String {
        match self.fetch(&request).await {
            Ok(context) => context,
            Err(e) => {
                warn!(error = %e, "Knowledge-graph retrieval failed");
                error_string(&e)
            }
        }
    }
}

/// Parse "YYYY-MM-DD" into Unix seconds at midnight UTC.
fn parse_date(date: &str) -> Option<i64> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp())
}

/// The collaborator contract: failures surface as readable text that
/// instructs downstream consumers to show the exact error to the user.
fn error_string(e: &str) -> String {
    format!(
        "error get_context: {e}. In your response, mention that an error occured \
         getting context with the exact error message to the user."
    )
}
