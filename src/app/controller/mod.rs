// Frame extraction controller - Owns the selection and drives runs through the collaborators
//
// Run state machine:
//
//   Idle --submit [not running, frame rate chosen, selection non-empty]--> Running
//   Running --all videos extracted, archive published--> Idle (download offered)
//   Running --load/extract/archive/publish error--> Idle (error alerted)
//
// A submit while Running is ignored; a submit without a frame rate or with an
// empty selection alerts and stays Idle without touching the transcoder.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, error, info, trace, warn};

use crate::app::pipeline::ExtractionPipeline;
use crate::app::presenter::SelectionPresenter;
use crate::app::publisher::DownloadPublisher;
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::*;
use crate::ports::*;

/// Alert raised when submitting without a frame rate
pub const NO_FRAME_RATE_MESSAGE: &str = "Please select a frame rate.";

/// Alert raised when submitting with nothing selected
pub const NOTHING_SELECTED_MESSAGE: &str = "Please select at least one video.";

/// External collaborators injected into the controller
pub struct Collaborators {
    pub transcoder: Arc<dyn TranscoderPort>,
    pub archiver: Arc<dyn ArchiverPort>,
    pub downloads: Arc<dyn DownloadPort>,
    pub view: Arc<dyn ViewPort>,
    pub notifier: Arc<dyn NotifierPort>,
    pub clock: Arc<dyn ClockPort>,
}

/// Counts describing a completed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub videos: usize,
    pub frames: usize,
    pub archive_bytes: usize,
}

/// How a submit ended
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// Archive built and offered for download
    Completed(RunSummary),
    /// Another run was active; nothing happened
    AlreadyRunning,
    /// No frame rate was chosen; nothing happened
    NoFrameRate,
    /// The selection was empty; nothing happened
    NothingSelected,
    /// The run aborted; the error was alerted
    Failed(DomainError),
}

/// Holds the Running state; dropping it returns the controller to Idle
struct RunGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> RunGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Collects videos, runs extraction and offers the resulting archive
pub struct FrameExtractionController {
    limits: SelectionLimits,
    frame_rates: FrameRateChooser,
    transcoder: Arc<dyn TranscoderPort>,
    archiver: Arc<dyn ArchiverPort>,
    view: Arc<dyn ViewPort>,
    notifier: Arc<dyn NotifierPort>,
    pipeline: ExtractionPipeline,
    presenter: SelectionPresenter,
    publisher: DownloadPublisher,
    selection: RwLock<ValidatedSelection>,
    processing: AtomicBool,
}

impl FrameExtractionController {
    /// Create a controller with injected collaborators
    pub fn new(
        limits: SelectionLimits,
        frame_rates: FrameRateChooser,
        collaborators: Collaborators,
    ) -> Self {
        let Collaborators {
            transcoder,
            archiver,
            downloads,
            view,
            notifier,
            clock,
        } = collaborators;

        Self {
            limits,
            frame_rates,
            pipeline: ExtractionPipeline::new(Arc::clone(&transcoder), Arc::clone(&clock)),
            presenter: SelectionPresenter::new(Arc::clone(&view)),
            publisher: DownloadPublisher::new(downloads, clock),
            transcoder,
            archiver,
            view,
            notifier,
            selection: RwLock::new(ValidatedSelection::empty()),
            processing: AtomicBool::new(false),
        }
    }

    /// Put the view in its start-up state
    pub fn initialize(&self) {
        self.presenter.present(&self.selection());
        self.view.set_region_visible(Region::LoadingIndicator, false);
        self.view.set_region_visible(Region::DownloadContainer, false);
        self.view.set_drop_highlight(false);
    }

    /// Snapshot of the current selection
    pub fn selection(&self) -> ValidatedSelection {
        self.selection
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn state(&self) -> ProcessingState {
        if self.processing.load(Ordering::Acquire) {
            ProcessingState::Running
        } else {
            ProcessingState::Idle
        }
    }

    pub fn limits(&self) -> SelectionLimits {
        self.limits
    }

    /// Whether an archive is waiting behind the download control
    pub fn download_ready(&self) -> bool {
        self.publisher.has_pending()
    }

    /// File-picker handler: validate, install and present a new selection
    pub fn on_files_selected(&self, candidates: &[VideoFile]) -> usize {
        let report = SelectionValidator::validate(candidates, &self.limits);
        for warning in &report.warnings {
            self.notifier.alert(&warning.to_string());
        }

        let accepted = report.selection.len();
        debug!("Accepted {} of {} candidates", accepted, candidates.len());

        *self
            .selection
            .write()
            .unwrap_or_else(PoisonError::into_inner) = report.selection.clone();
        self.presenter.present(&report.selection);
        accepted
    }

    pub fn on_drag_enter(&self) {
        trace!("Drag entered drop zone");
    }

    pub fn on_drag_over(&self) {
        self.view.set_drop_highlight(true);
    }

    pub fn on_drag_leave(&self) {
        self.view.set_drop_highlight(false);
    }

    /// Drop handler: clears the highlight, then behaves like the file picker
    pub fn on_files_dropped(&self, candidates: &[VideoFile]) -> usize {
        self.view.set_drop_highlight(false);
        self.on_files_selected(candidates)
    }

    /// Submit handler: run extraction over the selection at the requested rate
    pub async fn on_submit(&self, requested_fps: Option<u32>) -> RunOutcome {
        if self.state() == ProcessingState::Running {
            debug!("Submit ignored, a run is already active");
            return RunOutcome::AlreadyRunning;
        }

        let Some(fps) = self.frame_rates.select(requested_fps) else {
            self.notifier.alert(NO_FRAME_RATE_MESSAGE);
            return RunOutcome::NoFrameRate;
        };

        let Some(_guard) = RunGuard::acquire(&self.processing) else {
            debug!("Submit ignored, a run is already active");
            return RunOutcome::AlreadyRunning;
        };

        let selection = self.selection();
        if selection.is_empty() {
            self.notifier.alert(NOTHING_SELECTED_MESSAGE);
            return RunOutcome::NothingSelected;
        }

        info!("Starting run over {} videos at {} fps", selection.len(), fps);
        self.view.set_region_visible(Region::LoadingIndicator, true);

        let outcome = match self.run(&selection, fps).await {
            Ok(summary) => {
                info!(
                    "Run completed: {} frames from {} videos, {} byte archive",
                    summary.frames, summary.videos, summary.archive_bytes
                );
                self.view.set_region_visible(Region::DownloadContainer, true);
                RunOutcome::Completed(summary)
            }
            Err(e) => {
                error!("Run failed: {}", e);
                self.notifier.alert(&e.alert_text());
                RunOutcome::Failed(e)
            }
        };

        self.view.set_region_visible(Region::LoadingIndicator, false);
        outcome
    }

    async fn run(
        &self,
        selection: &ValidatedSelection,
        fps: FrameRate,
    ) -> Result<RunSummary, DomainError> {
        if !self.transcoder.is_loaded() {
            info!("Loading transcoder");
            self.transcoder.load().await?;
        }

        let mut archive = self.archiver.create();
        let mut frames = 0usize;
        for video in selection.iter() {
            for frame in self.pipeline.extract_frames(video, fps).await? {
                archive.file(&frame.name, frame.data);
                frames += 1;
            }
        }

        let blob = archive.generate().await?;
        let archive_bytes = blob.len();
        self.publisher.publish(blob).await?;

        Ok(RunSummary {
            videos: selection.len(),
            frames,
            archive_bytes,
        })
    }

    /// Download-control handler: save the pending archive once.
    ///
    /// Returns where it was saved, or `None` when no archive is pending.
    pub async fn on_download_clicked(&self) -> Result<Option<PathBuf>, DomainError> {
        let saved = self.publisher.trigger().await;
        match &saved {
            Ok(None) => warn!("Download requested but no archive is ready"),
            Err(e) => self.notifier.alert(&e.alert_text()),
            Ok(Some(_)) => {}
        }
        saved
    }
}
