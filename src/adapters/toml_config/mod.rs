// TOML config adapter - Configuration loaded from TOML files

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::FrameRateChooser;

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "framezip.toml";

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub limits: LimitsConfig,
    pub extraction: ExtractionConfig,
    pub archive: ArchiveConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

/// Selection limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    pub max_file_size: u64,
    pub max_files: usize,
    /// Informational; validation only checks the `video/` category
    pub supported_formats: Vec<String>,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_size: MAX_FILE_SIZE,
            max_files: MAX_FILES,
            supported_formats: SUPPORTED_FORMATS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Transcoder settings and offered frame rates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub frame_rate_options: Vec<u32>,
    pub ffmpeg_path: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            frame_rate_options: vec![1, 2, 5, 10, 15, 30],
            ffmpeg_path: "ffmpeg".to_string(),
        }
    }
}

/// Entry compression used inside the archive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    #[default]
    Stored,
    Deflated,
}

impl FromStr for Compression {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "stored" | "store" => Ok(Compression::Stored),
            "deflated" | "deflate" => Ok(Compression::Deflated),
            _ => Err(DomainError::Config(format!(
                "Invalid compression: {}. Valid values: stored, deflated",
                s
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    pub compression: Compression,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub output_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Limits handed to the selection validator
    pub fn selection_limits(&self) -> SelectionLimits {
        SelectionLimits {
            max_files: self.limits.max_files,
            max_file_size: self.limits.max_file_size,
        }
    }

    /// Frame rates offered to the user
    pub fn frame_rate_chooser(&self) -> Result<FrameRateChooser, DomainError> {
        let options = self
            .extraction
            .frame_rate_options
            .iter()
            .map(|fps| FrameRate::new(*fps))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| DomainError::Config(e.message().to_string()))?;
        Ok(FrameRateChooser::new(options))
    }

    /// Reject settings the controller cannot work with
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.limits.max_files == 0 {
            return Err(DomainError::Config(
                "max_files must be at least 1".to_string(),
            ));
        }
        if self.limits.max_file_size == 0 {
            return Err(DomainError::Config(
                "max_file_size must be positive".to_string(),
            ));
        }
        if self.extraction.frame_rate_options.is_empty() {
            return Err(DomainError::Config(
                "frame_rate_options cannot be empty".to_string(),
            ));
        }
        if self.extraction.ffmpeg_path.trim().is_empty() {
            return Err(DomainError::Config(
                "ffmpeg_path cannot be empty".to_string(),
            ));
        }
        self.frame_rate_chooser()?;
        Ok(())
    }
}

/// TOML configuration adapter
pub struct TomlConfigAdapter;

impl TomlConfigAdapter {
    /// Parse a TOML document; missing keys keep their defaults
    pub fn parse(toml_content: &str) -> Result<AppConfig, DomainError> {
        toml::from_str(toml_content)
            .map_err(|e| DomainError::Config(format!("Failed to parse TOML config: {}", e)))
    }

    /// Load configuration from a file
    pub fn load(file_path: &Path) -> Result<AppConfig, DomainError> {
        if !file_path.exists() {
            return Err(DomainError::FsFail(format!(
                "Config file does not exist: {}",
                file_path.display()
            )));
        }

        let content = std::fs::read_to_string(file_path)
            .map_err(|e| DomainError::FsFail(format!("Failed to read config file: {}", e)))?;

        Self::parse(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_limits() {
        let config = AppConfig::default();
        assert_eq!(config.limits.max_file_size, 104_857_600);
        assert_eq!(config.limits.max_files, 3);
        assert_eq!(
            config.limits.supported_formats,
            vec!["video/mp4", "video/webm", "video/quicktime"]
        );
        assert_eq!(config.archive.compression, Compression::Stored);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_document_keeps_defaults() {
        let config = TomlConfigAdapter::parse(
            r#"
            [limits]
            max_files = 2

            [archive]
            compression = "deflated"
            "#,
        )
        .unwrap();
        assert_eq!(config.limits.max_files, 2);
        assert_eq!(config.limits.max_file_size, MAX_FILE_SIZE);
        assert_eq!(config.archive.compression, Compression::Deflated);
        assert_eq!(config.extraction.ffmpeg_path, "ffmpeg");
    }

    #[test]
    fn test_parse_error_is_config_error() {
        let err = TomlConfigAdapter::parse("[limits\nmax_files = ").unwrap_err();
        assert!(matches!(err, DomainError::Config(_)));
    }

    #[test]
    fn test_validate_rejects_zero_frame_rate() {
        let mut config = AppConfig::default();
        config.extraction.frame_rate_options = vec![1, 0];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_max_files() {
        let mut config = AppConfig::default();
        config.limits.max_files = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_compression_from_str() {
        assert_eq!("Deflate".parse::<Compression>().unwrap(), Compression::Deflated);
        assert_eq!("stored".parse::<Compression>().unwrap(), Compression::Stored);
        assert!("bzip2".parse::<Compression>().is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = TomlConfigAdapter::load(Path::new("/no/such/framezip.toml")).unwrap_err();
        assert!(matches!(err, DomainError::FsFail(_)));
    }
}
