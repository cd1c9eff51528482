//! FrameZip
//!
//! Extracts still frames from up to three videos at a chosen rate and bundles
//! them into one ZIP archive.
//!
//! # Usage
//!
//! ```bash
//! framezip check holiday.mp4 birthday.webm
//! framezip extract holiday.mp4 birthday.webm --fps 2 --output ./frames
//! framezip formats
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::info;

use framezip::adapters::TracingLogAdapter;
use framezip::cli::{commands, Cli, Commands};
use framezip::config_initialization::initialize_configuration_hierarchy;

/// Main entry point for the FrameZip CLI application
#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    let config = initialize_configuration_hierarchy(&cli)?;
    TracingLogAdapter::init(&config.logging)?;

    info!("Starting FrameZip");

    // Execute the requested command
    match cli.command {
        Commands::Check(args) => {
            info!("Executing check command");
            commands::check(args, &config).await?;
        }
        Commands::Extract(args) => {
            info!("Executing extract command");
            commands::extract(args, &config).await?;
        }
        Commands::Formats => {
            info!("Executing formats command");
            commands::formats(&config)?;
        }
    }

    info!("FrameZip completed successfully");
    Ok(())
}
