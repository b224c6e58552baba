//! GraphScout CLI, the main entry point.
//!
//! Commands:
//! - `onboard`  : Write a default config file
//! - `research` : Run a research objective against the knowledge graph
//! - `doctor`   : Diagnose configuration and credentials

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "graphscout",
    about = "GraphScout: autonomous knowledge-graph research agent",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Onboard,

    /// Research an objective and print the final answer
    Research {
        /// The research objective
        objective: String,

        /// Override the iteration ceiling
        #[arg(long)]
        max_iterations: Option<u32>,
    },

    /// Diagnose configuration and credentials
    Doctor,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Onboard => commands::onboard::run()?,
        Commands::Research {
            objective,
            max_iterations,
        } => commands::research::run(&objective, max_iterations).await?,
        Commands::Doctor => commands::doctor::run()?,
    }

    Ok(())
}
