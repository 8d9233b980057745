//! Game Scout - conversational game recommendation CLI
//!
#![doc = "Game Scout - conversational game recommendation CLI"]
#![doc = "Main entry point for the Game Scout application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use gamescout::cli::{Cli, Commands};
use gamescout::commands;
use gamescout::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose, cli.json_logs);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/gamescout.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Scout { mode } => {
            tracing::info!("Starting interactive scout session");
            if let Some(m) = &mode {
                tracing::debug!("Using mode override: {}", m);
            }
            commands::scout::run_scout(config, mode).await?;
            Ok(())
        }
        Commands::Ask { query } => {
            tracing::info!("Starting free-text search");
            commands::ask::run_ask(config, query).await?;
            Ok(())
        }
        Commands::Vibe {
            vibe,
            likes,
            dislikes,
        } => {
            tracing::info!("Starting vibe search");
            commands::vibe::run_vibe(config, vibe, likes, dislikes).await?;
            Ok(())
        }
        Commands::Catalog { json } => {
            tracing::info!("Listing option catalog");
            commands::catalog::list_catalog(&config, json).await?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
///
/// `RUST_LOG` wins over the default level; `verbose` only raises the
/// default. Logs go to stderr so they never mix with command output.
fn init_tracing(verbose: bool, json: bool) {
    let default_level = if verbose {
        "gamescout=debug"
    } else {
        "gamescout=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
