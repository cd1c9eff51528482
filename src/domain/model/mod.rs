// Domain models - Core types and data structures

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;

use crate::domain::errors::{DomainError, FrameZipResult};

/// Largest accepted video, in bytes (100 MiB)
pub const MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Largest accepted batch of videos
pub const MAX_FILES: usize = 3;

/// Media types the selection is known to work with
pub const SUPPORTED_FORMATS: [&str; 3] = ["video/mp4", "video/webm", "video/quicktime"];

const BYTES_PER_MIB: u128 = 1024 * 1024;

/// Where the bytes of a selected video live
#[derive(Debug, Clone)]
pub enum VideoSource {
    /// File on the local disk, read lazily when the video is processed
    Path(PathBuf),
    /// Bytes already held in memory
    Memory(Arc<[u8]>),
}

/// A user-supplied video; immutable once selected
#[derive(Debug, Clone)]
pub struct VideoFile {
    name: String,
    size: u64,
    media_type: String,
    source: VideoSource,
}

impl VideoFile {
    /// Create a video file description
    pub fn new(
        name: impl Into<String>,
        size: u64,
        media_type: impl Into<String>,
        source: VideoSource,
    ) -> Self {
        Self {
            name: name.into(),
            size,
            media_type: media_type.into(),
            source,
        }
    }

    /// Create a video whose bytes are held in memory; size is the buffer length
    pub fn in_memory(name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        let size = bytes.len() as u64;
        Self::new(name, size, media_type, VideoSource::Memory(bytes.into()))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// True when the media type belongs to the video category
    pub fn is_video(&self) -> bool {
        self.media_type.starts_with("video/")
    }

    /// Text after the last `.` of the name, or the whole name when there is no dot
    pub fn extension(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    /// Size in MiB with two decimals, e.g. `2.00`; exact halves round up
    pub fn size_in_mib(&self) -> String {
        let hundredths = (u128::from(self.size) * 100 + BYTES_PER_MIB / 2) / BYTES_PER_MIB;
        format!("{}.{:02}", hundredths / 100, hundredths % 100)
    }

    /// Load the video's bytes
    pub async fn read_bytes(&self) -> FrameZipResult<Vec<u8>> {
        match &self.source {
            VideoSource::Memory(bytes) => Ok(bytes.to_vec()),
            VideoSource::Path(path) => tokio::fs::read(path).await.map_err(|e| {
                DomainError::FsFail(format!("Failed to read {}: {}", path.display(), e))
            }),
        }
    }
}

/// Limits applied when accepting a selection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionLimits {
    pub max_files: usize,
    pub max_file_size: u64,
}

impl Default for SelectionLimits {
    fn default() -> Self {
        Self {
            max_files: MAX_FILES,
            max_file_size: MAX_FILE_SIZE,
        }
    }
}

/// Ordered videos that passed validation
#[derive(Debug, Clone, Default)]
pub struct ValidatedSelection {
    files: Vec<VideoFile>,
}

impl ValidatedSelection {
    /// Selection holding no videos
    pub fn empty() -> Self {
        Self::default()
    }

    /// Only the selection validator builds non-empty selections
    pub(crate) fn from_accepted(files: Vec<VideoFile>) -> Self {
        Self { files }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, VideoFile> {
        self.files.iter()
    }
}

/// Sampling rate for frame extraction, in frames per second
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FrameRate(u32);

impl FrameRate {
    /// Create a frame rate; zero is rejected
    pub fn new(fps: u32) -> Result<Self, DomainError> {
        if fps == 0 {
            return Err(DomainError::BadArgs(
                "Frame rate must be positive".to_string(),
            ));
        }
        Ok(Self(fps))
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One extracted still image
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub name: String,
    pub data: Vec<u8>,
}

impl Frame {
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}

/// Compressed archive holding every frame of one run
#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveBlob {
    pub bytes: Vec<u8>,
    pub entry_count: usize,
}

impl ArchiveBlob {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Whether a run is in progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingState {
    Idle,
    Running,
}

/// Toggleable regions of the user interface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    FrameRateChooser,
    SubmitAction,
    LoadingIndicator,
    DownloadContainer,
}

/// One rendered line of the selected-file list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileRow {
    pub name: String,
    pub size_mib: String,
}

impl FileRow {
    pub fn from_video(video: &VideoFile) -> Self {
        Self {
            name: video.name().to_string(),
            size_mib: video.size_in_mib(),
        }
    }
}

impl fmt::Display for FileRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}  {} MB", self.name, self.size_mib)
    }
}
