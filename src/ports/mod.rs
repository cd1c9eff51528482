// Ports - Interface definitions (contracts)

use std::path::PathBuf;

use async_trait::async_trait;

use crate::domain::errors::*;
use crate::domain::model::*;

/// Port for the video transcoder and its private virtual filesystem.
///
/// The filesystem is flat and shared by every caller; the controller
/// serializes access so there is at most one writer.
#[async_trait]
pub trait TranscoderPort: Send + Sync {
    /// Whether the transcoder runtime is ready
    fn is_loaded(&self) -> bool;

    /// Make the runtime ready; resolves once it can accept commands
    async fn load(&self) -> Result<(), DomainError>;

    /// Store bytes under `name` in the virtual filesystem
    async fn write_file(&self, name: &str, data: &[u8]) -> Result<(), DomainError>;

    /// Run one transcoder command with ffmpeg-style arguments
    async fn run(&self, args: &[String]) -> Result<(), DomainError>;

    /// List entry names under `path`
    async fn read_dir(&self, path: &str) -> Result<Vec<String>, DomainError>;

    /// Read the bytes stored under `name`
    async fn read_file(&self, name: &str) -> Result<Vec<u8>, DomainError>;

    /// Remove the entry stored under `name`
    async fn unlink(&self, name: &str) -> Result<(), DomainError>;
}

/// Port for producing archives from named buffers
pub trait ArchiverPort: Send + Sync {
    /// Start a fresh, empty archive
    fn create(&self) -> Box<dyn ArchiveSession>;
}

/// One archive under construction
#[async_trait]
pub trait ArchiveSession: Send {
    /// Stage an entry; staging an existing name replaces it
    fn file(&mut self, name: &str, data: Vec<u8>);

    /// Number of staged entries
    fn entry_count(&self) -> usize;

    /// Compress every staged entry into a single blob, draining the session
    async fn generate(&mut self) -> Result<ArchiveBlob, DomainError>;
}

/// Handle to a staged download; valid until revoked
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DownloadRef {
    pub id: u64,
}

/// Port for handing finished archives to the user
#[async_trait]
pub trait DownloadPort: Send + Sync {
    /// Stage the blob and return a revocable reference to it
    async fn create_reference(&self, blob: ArchiveBlob) -> Result<DownloadRef, DomainError>;

    /// Save the referenced blob under `file_name`; returns where it landed
    async fn save(&self, reference: &DownloadRef, file_name: &str)
        -> Result<PathBuf, DomainError>;

    /// Release the reference and whatever it holds
    fn revoke(&self, reference: &DownloadRef);
}

/// Port for rendering selection and progress state
pub trait ViewPort: Send + Sync {
    /// Show one row per selected file
    fn render_file_list(&self, rows: &[FileRow]);

    /// Show the placeholder used when nothing is selected
    fn render_placeholder(&self, text: &str);

    /// Show or hide a region
    fn set_region_visible(&self, region: Region, visible: bool);

    /// Toggle the drop-zone highlight
    fn set_drop_highlight(&self, active: bool);
}

/// Port for blocking user alerts
pub trait NotifierPort: Send + Sync {
    fn alert(&self, message: &str);
}

/// Port for the wall clock
pub trait ClockPort: Send + Sync {
    /// Milliseconds since the Unix epoch
    fn now_millis(&self) -> i64;
}
