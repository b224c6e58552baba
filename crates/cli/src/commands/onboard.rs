//! `graphscout onboard`: write a default config file.

use graphscout_config::AppConfig;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = AppConfig::config_path();

    if config_path.exists() {
        println!("Config already exists at {}", config_path.display());
        return Ok(());
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&config_path, AppConfig::default_toml())?;

    println!("Wrote default config to {}", config_path.display());
    println!();
    println!("Next steps:");
    println!("  1. export GOOGLE_API_KEY='...'              (model access)");
    println!("  2. export GRAPHSCOUT_RETRIEVAL_TOKEN='...'  (knowledge-graph access)");
    println!("  3. graphscout research \"your objective\"");

    Ok(())
}
