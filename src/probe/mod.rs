//! Candidate discovery
//!
//! Turns command-line paths into [`VideoFile`] candidates: directories
//! contribute their immediate files, and every file gets a size and a media
//! type sniffed from its leading bytes.

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::domain::errors::*;
use crate::domain::model::{VideoFile, VideoSource};

/// Media type used when neither content nor extension identify the file
pub const UNKNOWN_MEDIA_TYPE: &str = "application/octet-stream";

/// Media type by file extension, used when sniffing finds nothing
fn media_type_from_extension(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    let media_type = match ext.as_str() {
        "mp4" | "m4v" => "video/mp4",
        "webm" => "video/webm",
        "mov" | "qt" => "video/quicktime",
        "mkv" => "video/x-matroska",
        "avi" => "video/x-msvideo",
        "mpeg" | "mpg" => "video/mpeg",
        "ogv" => "video/ogg",
        "3gp" => "video/3gpp",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "txt" => "text/plain",
        _ => return None,
    };
    Some(media_type)
}

/// Detect the media type of a file from its content, falling back to its extension
pub fn detect_media_type(path: &Path) -> Result<String, DomainError> {
    let sniffed = infer::get_from_path(path).map_err(|e| {
        DomainError::FsFail(format!("Failed to read {}: {}", path.display(), e))
    })?;

    let media_type = match sniffed {
        Some(kind) => kind.mime_type().to_string(),
        None => media_type_from_extension(path)
            .unwrap_or(UNKNOWN_MEDIA_TYPE)
            .to_string(),
    };
    debug!("{} detected as {}", path.display(), media_type);
    Ok(media_type)
}

/// Describe one file on disk as a selection candidate
pub fn candidate_from_path(path: &Path) -> Result<VideoFile, DomainError> {
    let metadata = std::fs::metadata(path).map_err(|e| {
        DomainError::FsFail(format!("Failed to get metadata for {}: {}", path.display(), e))
    })?;
    if !metadata.is_file() {
        return Err(DomainError::FsFail(format!(
            "Not a regular file: {}",
            path.display()
        )));
    }

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| DomainError::BadArgs(format!("Invalid file path: {}", path.display())))?;

    Ok(VideoFile::new(
        name,
        metadata.len(),
        detect_media_type(path)?,
        VideoSource::Path(path.to_path_buf()),
    ))
}

/// Expand inputs into candidates, keeping argument order; directory contents are sorted by name
pub fn collect_candidates(inputs: &[PathBuf]) -> Result<Vec<VideoFile>, DomainError> {
    let mut candidates = Vec::new();

    for input in inputs {
        if input.is_dir() {
            let walker = WalkDir::new(input)
                .min_depth(1)
                .max_depth(1)
                .sort_by_file_name();
            for entry in walker {
                let entry = entry.map_err(|e| {
                    DomainError::FsFail(format!("Failed to list {}: {}", input.display(), e))
                })?;
                if entry.file_type().is_file() {
                    candidates.push(candidate_from_path(entry.path())?);
                }
            }
        } else {
            candidates.push(candidate_from_path(input)?);
        }
    }

    Ok(candidates)
}
