//! `graphscout doctor`: diagnose configuration and credentials.

use graphscout_config::AppConfig;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("GraphScout Doctor");
    println!("=================\n");

    let mut issues = 0;

    let config_path = AppConfig::config_path();
    let config = if config_path.exists() {
        match AppConfig::load() {
            Ok(config) => {
                println!("  ok   Config file valid");
                Some(config)
            }
            Err(e) => {
                println!("  FAIL Config file invalid: {e}");
                issues += 1;
                None
            }
        }
    } else {
        println!("  warn No config file, using defaults (run `graphscout onboard`)");
        AppConfig::load().ok()
    };

    if let Some(config) = config {
        match std::env::var(&config.model.api_key_env) {
            Ok(key) if !key.is_empty() => println!("  ok   Model API key present"),
            _ => {
                println!(
                    "  FAIL Model API key missing (set {})",
                    config.model.api_key_env
                );
                issues += 1;
            }
        }

        match std::env::var(&config.retrieval.token_env) {
            Ok(token) if !token.is_empty() => println!("  ok   Retrieval token present"),
            _ => {
                println!(
                    "  FAIL Retrieval token missing (set {})",
                    config.retrieval.token_env
                );
                issues += 1;
            }
        }

        println!("  ok   Retrieval endpoint: {}", config.retrieval.base_url);
        println!(
            "  ok   Models: {} / {} (conservative)",
            config.model.primary, config.model.conservative
        );
    }

    println!();
    if issues == 0 {
        println!("  All checks passed.");
        Ok(())
    } else {
        Err(format!("{issues} issue(s) found. See above for details.").into())
    }
}
