//! `graphscout research`: run one objective end to end.

use std::sync::Arc;
use std::time::Duration;

use graphscout_agent::ResearchAgent;
use graphscout_config::AppConfig;
use graphscout_providers::{GeminiProvider, RetryPolicy, RetryingProvider};
use graphscout_retrieval::{EnvTokenSource, GraphClient};

pub async fn run(
    objective: &str,
    max_iterations: Option<u32>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    // Check for the API key early and give a clear error
    let api_key = match std::env::var(&config.model.api_key_env) {
        Ok(key) if !key.is_empty() => key,
        _ => {
            eprintln!();
            eprintln!("  ERROR: No model API key configured!");
            eprintln!();
            eprintln!("  Set the environment variable named in config.toml:");
            eprintln!("    export {}='...'", config.model.api_key_env);
            eprintln!();
            return Err("No API key found. See above for setup instructions.".into());
        }
    };

    let provider = Arc::new(RetryingProvider::new(
        Arc::new(GeminiProvider::new(api_key)),
        RetryPolicy {
            max_retries: config.retry.max_retries,
            delay: Duration::from_secs(config.retry.delay_secs),
        },
    ));

    let token_env = config.retrieval.token_env.clone();
    let retriever = Arc::new(GraphClient::new(
        config.retrieval.clone(),
        Arc::new(EnvTokenSource::new(token_env)),
    ));

    let agent = ResearchAgent::new(provider, retriever)
        .with_model(&config.model.primary)
        .with_conservative_model(&config.model.conservative)
        .with_max_iterations(max_iterations.unwrap_or(config.research.max_iterations))
        .with_max_forced_attempts(config.research.max_forced_attempts)
        .with_token_limit(config.research.token_limit);

    match agent.run(objective).await {
        Some(answer) => {
            println!("{}", answer.content);
            if !answer.citations.is_empty() {
                println!();
                println!("Citations: [{}]", answer.citations.join("]["));
            }
            Ok(())
        }
        None => Err("No answer produced: the iteration ceiling was reached and every \
                     forced finish attempt failed."
            .into()),
    }
}
