//! Configuration initialization and hierarchy management

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::adapters::toml_config::{AppConfig, Compression, TomlConfigAdapter, DEFAULT_CONFIG_FILE};
use crate::cli::{Cli, Commands};

/// Build the configuration following precedence: CLI > Env > File > Defaults
pub fn initialize_configuration_hierarchy(cli: &Cli) -> Result<AppConfig> {
    // Step 1: defaults, Step 2: file
    let mut config = load_config_file(cli.config.as_deref())?;

    // Step 3: environment
    let env_overrides = apply_environment_overrides(&mut config, |key| std::env::var(key).ok())?;
    if env_overrides > 0 {
        info!("Applied {} environment variable overrides", env_overrides);
    }

    // Step 4: CLI
    let cli_overrides = apply_cli_overrides(&mut config, cli)?;
    if cli_overrides > 0 {
        info!("Applied {} CLI configuration overrides", cli_overrides);
    }

    config.validate().context("Configuration is invalid")?;
    Ok(config)
}

/// Load the explicit config file, or the default one when it exists
fn load_config_file(explicit: Option<&Path>) -> Result<AppConfig> {
    if let Some(path) = explicit {
        info!("Loading configuration from: {}", path.display());
        return TomlConfigAdapter::load(path)
            .with_context(|| format!("Failed to load config file {}", path.display()));
    }

    let default_path = Path::new(DEFAULT_CONFIG_FILE);
    if default_path.exists() {
        info!("Loading configuration from: {}", default_path.display());
        return TomlConfigAdapter::load(default_path)
            .with_context(|| format!("Failed to load config file {}", default_path.display()));
    }

    debug!("No configuration file found, using defaults");
    Ok(AppConfig::default())
}

/// Apply `FRAMEZIP_*` variables; returns how many were applied
pub fn apply_environment_overrides<F>(config: &mut AppConfig, lookup: F) -> Result<usize>
where
    F: Fn(&str) -> Option<String>,
{
    let mut applied = 0;

    if let Some(value) = lookup("FRAMEZIP_MAX_FILE_SIZE") {
        config.limits.max_file_size = value
            .trim()
            .parse()
            .with_context(|| format!("Invalid FRAMEZIP_MAX_FILE_SIZE: {}", value))?;
        applied += 1;
    }
    if let Some(value) = lookup("FRAMEZIP_MAX_FILES") {
        config.limits.max_files = value
            .trim()
            .parse()
            .with_context(|| format!("Invalid FRAMEZIP_MAX_FILES: {}", value))?;
        applied += 1;
    }
    if let Some(value) = lookup("FRAMEZIP_FFMPEG_PATH") {
        config.extraction.ffmpeg_path = value;
        applied += 1;
    }
    if let Some(value) = lookup("FRAMEZIP_OUTPUT_DIR") {
        config.output.output_dir = value.into();
        applied += 1;
    }
    if let Some(value) = lookup("FRAMEZIP_LOG_LEVEL") {
        config.logging.level = value;
        applied += 1;
    }
    if let Some(value) = lookup("FRAMEZIP_COMPRESSION") {
        config.archive.compression = value.parse::<Compression>()?;
        applied += 1;
    }

    Ok(applied)
}

/// Apply command-line overrides; returns how many were applied
fn apply_cli_overrides(config: &mut AppConfig, cli: &Cli) -> Result<usize> {
    let mut applied = 0;

    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
        applied += 1;
    }
    if cli.json_logs {
        config.logging.json = true;
        applied += 1;
    }

    if let Commands::Extract(args) = &cli.command {
        if let Some(output) = &args.output {
            config.output.output_dir = output.clone();
            applied += 1;
        }
        if let Some(ffmpeg) = &args.ffmpeg {
            config.extraction.ffmpeg_path = ffmpeg.clone();
            applied += 1;
        }
        if let Some(compression) = &args.compression {
            config.archive.compression = compression.parse::<Compression>()?;
            applied += 1;
        }
    }

    Ok(applied)
}
