// Download publisher - Offers the finished archive as a single-use download

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info};

use crate::domain::errors::*;
use crate::domain::model::ArchiveBlob;
use crate::ports::*;

/// Holds the most recent archive until the user triggers its download
pub struct DownloadPublisher {
    downloads: Arc<dyn DownloadPort>,
    clock: Arc<dyn ClockPort>,
    pending: Mutex<Option<DownloadRef>>,
}

impl DownloadPublisher {
    pub fn new(downloads: Arc<dyn DownloadPort>, clock: Arc<dyn ClockPort>) -> Self {
        Self {
            downloads,
            clock,
            pending: Mutex::new(None),
        }
    }

    fn pending(&self) -> MutexGuard<'_, Option<DownloadRef>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether an archive is waiting to be downloaded
    pub fn has_pending(&self) -> bool {
        self.pending().is_some()
    }

    /// Timestamped name the archive is saved under
    pub fn archive_file_name(&self) -> String {
        format!("frames-{}.zip", self.clock.now_millis())
    }

    /// Stage `blob` for download, superseding any archive not yet downloaded
    pub async fn publish(&self, blob: ArchiveBlob) -> Result<(), DomainError> {
        let size = blob.len();
        let reference = self.downloads.create_reference(blob).await?;
        debug!("Published archive of {} bytes as download {}", size, reference.id);

        let superseded = self.pending().replace(reference);
        if let Some(old) = superseded {
            self.downloads.revoke(&old);
        }
        Ok(())
    }

    /// Save the pending archive, then revoke its reference.
    ///
    /// Returns `None` when nothing is pending. The reference is revoked even
    /// when saving fails.
    pub async fn trigger(&self) -> Result<Option<PathBuf>, DomainError> {
        let Some(reference) = self.pending().take() else {
            return Ok(None);
        };

        let file_name = self.archive_file_name();
        let saved = self.downloads.save(&reference, &file_name).await;
        self.downloads.revoke(&reference);

        let path = saved?;
        info!("Archive saved to {}", path.display());
        Ok(Some(path))
    }
}
