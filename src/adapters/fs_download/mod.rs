// Filesystem download adapter - Stages archives in temp files and saves them into an output directory

use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::domain::errors::*;
use crate::domain::model::ArchiveBlob;
use crate::ports::*;

/// Filesystem download adapter
pub struct FsDownloadAdapter {
    output_dir: PathBuf,
    staged: Mutex<HashMap<u64, NamedTempFile>>,
    next_id: AtomicU64,
}

impl FsDownloadAdapter {
    /// Create an adapter saving into `output_dir`
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            staged: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Number of references not yet revoked
    pub fn pending(&self) -> usize {
        self.staged().len()
    }

    fn staged(&self) -> MutexGuard<'_, HashMap<u64, NamedTempFile>> {
        self.staged.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn staged_path(&self, reference: &DownloadRef) -> Result<PathBuf, DomainError> {
        self.staged()
            .get(&reference.id)
            .map(|file| file.path().to_path_buf())
            .ok_or_else(|| {
                DomainError::Download(format!("Download reference {} was revoked", reference.id))
            })
    }
}

#[async_trait]
impl DownloadPort for FsDownloadAdapter {
    async fn create_reference(&self, blob: ArchiveBlob) -> Result<DownloadRef, DomainError> {
        let staged = tokio::task::spawn_blocking(move || -> std::io::Result<NamedTempFile> {
            let mut file = tempfile::Builder::new()
                .prefix("framezip-download-")
                .suffix(".zip")
                .tempfile()?;
            file.write_all(&blob.bytes)?;
            file.flush()?;
            Ok(file)
        })
        .await
        .map_err(|e| DomainError::Download(format!("Staging task failed: {}", e)))?
        .map_err(|e| DomainError::Download(format!("Failed to stage archive: {}", e)))?;

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        debug!("Staged download {} at {}", id, staged.path().display());
        self.staged().insert(id, staged);
        Ok(DownloadRef { id })
    }

    async fn save(
        &self,
        reference: &DownloadRef,
        file_name: &str,
    ) -> Result<PathBuf, DomainError> {
        if file_name.is_empty() || file_name.contains('/') || file_name.contains('\\') {
            return Err(DomainError::Download(format!(
                "Invalid download file name: {:?}",
                file_name
            )));
        }

        let source = self.staged_path(reference)?;
        tokio::fs::create_dir_all(&self.output_dir).await.map_err(|e| {
            DomainError::Download(format!(
                "Failed to create {}: {}",
                self.output_dir.display(),
                e
            ))
        })?;

        let destination = self.output_dir.join(file_name);
        tokio::fs::copy(&source, &destination).await.map_err(|e| {
            DomainError::Download(format!("Failed to save {}: {}", destination.display(), e))
        })?;
        Ok(destination)
    }

    fn revoke(&self, reference: &DownloadRef) {
        if self.staged().remove(&reference.id).is_some() {
            debug!("Revoked download {}", reference.id);
        }
    }
}
