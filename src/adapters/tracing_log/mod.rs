// Tracing log adapter - Structured logging using tracing crate

use tracing_subscriber::EnvFilter;

use crate::adapters::toml_config::LoggingConfig;
use crate::domain::errors::*;

/// Levels accepted in configuration
const VALID_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Tracing log adapter
pub struct TracingLogAdapter;

impl TracingLogAdapter {
    /// Install the global subscriber.
    ///
    /// `RUST_LOG` takes precedence over the configured level. A second call
    /// is a no-op, so tests and the binary can both initialize freely.
    pub fn init(config: &LoggingConfig) -> Result<(), DomainError> {
        let level = Self::parse_level(&config.level)?;
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false);

        // Subscriber may already be installed
        let _ = if config.json {
            builder.json().try_init()
        } else {
            builder.try_init()
        };

        Ok(())
    }

    /// Normalize a configured level name
    pub fn parse_level(level: &str) -> Result<&'static str, DomainError> {
        let lowered = level.trim().to_lowercase();
        VALID_LEVELS
            .iter()
            .copied()
            .find(|valid| *valid == lowered)
            .ok_or_else(|| {
                DomainError::Config(format!(
                    "Invalid log level: {}. Valid levels: trace, debug, info, warn, error",
                    level
                ))
            })
    }
}
