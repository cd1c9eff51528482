//! FFmpeg execution adapter
//!
//! Drives an `ffmpeg` executable. A private temporary directory plays the
//! role of the transcoder's virtual filesystem: every command runs with it as
//! the working directory, so relative names in arguments resolve inside it.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::process::Command;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::domain::errors::*;
use crate::ports::*;

/// FFmpeg-based transcoder adapter
pub struct FfmpegTranscoder {
    ffmpeg_path: String,
    workspace: OnceCell<TempDir>,
}

impl FfmpegTranscoder {
    /// Create a transcoder that will run `ffmpeg_path` once loaded
    pub fn new(ffmpeg_path: impl Into<String>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
            workspace: OnceCell::new(),
        }
    }

    /// Directory backing the virtual filesystem, if loaded
    pub fn workspace_path(&self) -> Option<&Path> {
        self.workspace.get().map(|dir| dir.path())
    }

    fn workspace(&self) -> Result<&Path, DomainError> {
        self.workspace_path()
            .ok_or_else(|| DomainError::VirtualFs("Transcoder is not loaded".to_string()))
    }

    /// Map a flat virtual name to its backing path
    fn entry_path(&self, name: &str) -> Result<PathBuf, DomainError> {
        if name.is_empty()
            || name == "."
            || name == ".."
            || name.contains('/')
            || name.contains('\\')
        {
            return Err(DomainError::VirtualFs(format!("Invalid entry name: {:?}", name)));
        }
        Ok(self.workspace()?.join(name))
    }

    async fn probe_binary(&self) -> Result<(), DomainError> {
        let output = Command::new(&self.ffmpeg_path)
            .arg("-version")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                DomainError::TranscoderLoad(format!("Cannot execute {}: {}", self.ffmpeg_path, e))
            })?;

        if !output.status.success() {
            return Err(DomainError::TranscoderLoad(format!(
                "{} -version exited with {}",
                self.ffmpeg_path, output.status
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        if let Some(banner) = stdout.lines().next() {
            info!("Transcoder ready: {}", banner);
        }
        Ok(())
    }
}

#[async_trait]
impl TranscoderPort for FfmpegTranscoder {
    fn is_loaded(&self) -> bool {
        self.workspace.initialized()
    }

    async fn load(&self) -> Result<(), DomainError> {
        self.workspace
            .get_or_try_init(|| async {
                self.probe_binary().await?;
                tempfile::Builder::new()
                    .prefix("framezip-")
                    .tempdir()
                    .map_err(|e| {
                        DomainError::TranscoderLoad(format!(
                            "Failed to create transcoder workspace: {}",
                            e
                        ))
                    })
            })
            .await?;
        Ok(())
    }

    async fn write_file(&self, name: &str, data: &[u8]) -> Result<(), DomainError> {
        let path = self.entry_path(name)?;
        tokio::fs::write(&path, data)
            .await
            .map_err(|e| DomainError::VirtualFs(format!("Failed to write {}: {}", name, e)))
    }

    async fn run(&self, args: &[String]) -> Result<(), DomainError> {
        let workspace = self.workspace()?;
        debug!("Running {} {}", self.ffmpeg_path, args.join(" "));

        let output = Command::new(&self.ffmpeg_path)
            .arg("-hide_banner")
            .arg("-nostdin")
            .args(args)
            .current_dir(workspace)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                DomainError::TranscoderRun(format!("Failed to spawn {}: {}", self.ffmpeg_path, e))
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        for line in stderr.lines() {
            debug!(target: "ffmpeg", "{}", line);
        }

        if !output.status.success() {
            let detail = stderr
                .lines()
                .rev()
                .find(|line| !line.trim().is_empty())
                .unwrap_or("no diagnostic output");
            return Err(DomainError::TranscoderRun(format!(
                "ffmpeg exited with {}: {}",
                output.status, detail
            )));
        }

        Ok(())
    }

    async fn read_dir(&self, path: &str) -> Result<Vec<String>, DomainError> {
        if !matches!(path, "/" | "" | ".") {
            return Err(DomainError::VirtualFs(format!(
                "Unsupported directory: {}",
                path
            )));
        }

        let mut entries = tokio::fs::read_dir(self.workspace()?)
            .await
            .map_err(|e| DomainError::VirtualFs(format!("Failed to list workspace: {}", e)))?;

        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| DomainError::VirtualFs(format!("Failed to list workspace: {}", e)))?
        {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }

    async fn read_file(&self, name: &str) -> Result<Vec<u8>, DomainError> {
        let path = self.entry_path(name)?;
        tokio::fs::read(&path)
            .await
            .map_err(|e| DomainError::VirtualFs(format!("Failed to read {}: {}", name, e)))
    }

    async fn unlink(&self, name: &str) -> Result<(), DomainError> {
        let path = self.entry_path(name)?;
        tokio::fs::remove_file(&path)
            .await
            .map_err(|e| DomainError::VirtualFs(format!("Failed to remove {}: {}", name, e)))
    }
}
