//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

/// Highest frame rate accepted on the command line
pub const MAX_CLI_FPS: u32 = 240;

fn parse_fps(s: &str) -> Result<u32, String> {
    clap_num::number_range(s, 1, MAX_CLI_FPS)
}

/// Arguments for the check command
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Video files, or directories whose files are all candidates
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Print the accepted files as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the extract command
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Video files, or directories whose files are all candidates
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Frames sampled per second; must be one of the configured options
    #[arg(long, value_parser = parse_fps)]
    pub fps: Option<u32>,

    /// Directory the archive is saved into
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Path to the ffmpeg executable
    #[arg(long)]
    pub ffmpeg: Option<String>,

    /// Archive entry compression (stored, deflated)
    #[arg(long)]
    pub compression: Option<String>,
}
