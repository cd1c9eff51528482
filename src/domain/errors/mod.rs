// Domain errors - Error types for the domain layer

use thiserror::Error;

/// Fallback shown to the user when an error carries no message
pub const GENERIC_FAILURE_MESSAGE: &str = "Error during processing";

/// Domain-specific error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Invalid arguments provided
    #[error("Bad arguments: {0}")]
    BadArgs(String),

    /// Configuration could not be loaded or is inconsistent
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// File system access failed
    #[error("File system error: {0}")]
    FsFail(String),

    /// Transcoder runtime could not be made ready
    #[error("Transcoder failed to load: {0}")]
    TranscoderLoad(String),

    /// Transcoder command exited unsuccessfully
    #[error("Transcoder command failed: {0}")]
    TranscoderRun(String),

    /// Transcoder virtual filesystem rejected an operation
    #[error("Transcoder filesystem error: {0}")]
    VirtualFs(String),

    /// Archive could not be produced
    #[error("Archive generation failed: {0}")]
    Archive(String),

    /// Download could not be staged or saved
    #[error("Download failed: {0}")]
    Download(String),
}

impl DomainError {
    /// Bare message carried by the error, without the category prefix
    pub fn message(&self) -> &str {
        match self {
            DomainError::BadArgs(msg)
            | DomainError::Config(msg)
            | DomainError::FsFail(msg)
            | DomainError::TranscoderLoad(msg)
            | DomainError::TranscoderRun(msg)
            | DomainError::VirtualFs(msg)
            | DomainError::Archive(msg)
            | DomainError::Download(msg) => msg,
        }
    }

    /// Text for the user-facing alert raised when a run fails
    pub fn alert_text(&self) -> String {
        let message = self.message().trim();
        if message.is_empty() {
            format!("Error: {}", GENERIC_FAILURE_MESSAGE)
        } else {
            format!("Error: {}", message)
        }
    }
}

impl From<std::io::Error> for DomainError {
    fn from(err: std::io::Error) -> Self {
        DomainError::FsFail(err.to_string())
    }
}

/// Result type alias for FrameZip operations
pub type FrameZipResult<T> = std::result::Result<T, DomainError>;
