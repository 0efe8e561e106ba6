//! streamprobe
//!
//! Typed stream records from ffprobe's `-show_streams` report.
//!
//! # Usage
//!
//! ```bash
//! streamprobe inspect --input "movie.mkv"
//! streamprobe inspect --input "movie.mkv" --json --timeout 30
//! ffprobe -show_streams movie.mkv 2>&1 | streamprobe parse --report -
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::{debug, info};

use streamprobe::cli::{commands, Cli, Commands};
use streamprobe::config_initialization::initialize_configuration_hierarchy;
use streamprobe::utils::logging::LoggingSystem;

/// Main entry point for the streamprobe CLI application
#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Resolve configuration before logging so the level can come from any layer
    let (config, sources) = initialize_configuration_hierarchy(&cli)?;

    LoggingSystem::new(config.logging())
        .initialize()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;
    debug!(?config, ?sources, "Effective configuration");

    // Execute the requested command
    match cli.command {
        Commands::Inspect(args) => {
            info!("Executing inspect command");
            commands::inspect(args, &config).await?;
        }
        Commands::Parse(args) => {
            info!("Executing parse command");
            commands::parse(args, &config)?;
        }
    }

    Ok(())
}
