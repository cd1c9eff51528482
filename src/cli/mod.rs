//! CLI module for FrameZip
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;

/// FrameZip
///
/// Extracts still frames from up to three videos at a chosen rate and bundles
/// every frame into one ZIP archive.
#[derive(Parser, Debug)]
#[command(name = "framezip")]
#[command(about = "FrameZip - Extract video frames into a ZIP archive")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Configuration file (default: ./framezip.toml when present)
    #[arg(long, global = true, env = "FRAMEZIP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Logging level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate videos and show what would be processed
    Check(args::CheckArgs),
    /// Extract frames from videos and save them as a ZIP archive
    Extract(args::ExtractArgs),
    /// Show accepted formats, limits and frame-rate options
    Formats,
}
