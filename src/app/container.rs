use std::sync::Arc;

use crate::adapters::{
    AppConfig, ConsoleView, FfmpegTranscoder, FsDownloadAdapter, SystemClock, ZipArchiver,
};
use crate::app::controller::{Collaborators, FrameExtractionController};
use crate::domain::errors::DomainError;
use crate::ports::{ArchiverPort, ClockPort, DownloadPort, NotifierPort, TranscoderPort, ViewPort};

pub trait AppContainer: Send + Sync {
    fn controller(&self) -> Arc<FrameExtractionController>;
}

/// Wires the production adapters into one controller
pub struct DefaultAppContainer {
    controller: Arc<FrameExtractionController>,
}

impl DefaultAppContainer {
    /// Build the controller; `quiet` keeps the console view off stdout
    pub fn new(config: &AppConfig, quiet: bool) -> Result<Self, DomainError> {
        config.validate()?;
        let frame_rates = config.frame_rate_chooser()?;

        let console = Arc::new(ConsoleView::new(frame_rates.options().to_vec(), quiet));
        let collaborators = Collaborators {
            transcoder: Arc::new(FfmpegTranscoder::new(config.extraction.ffmpeg_path.clone()))
                as Arc<dyn TranscoderPort>,
            archiver: Arc::new(ZipArchiver::new(config.archive.compression)) as Arc<dyn ArchiverPort>,
            downloads: Arc::new(FsDownloadAdapter::new(config.output.output_dir.clone()))
                as Arc<dyn DownloadPort>,
            view: Arc::clone(&console) as Arc<dyn ViewPort>,
            notifier: console as Arc<dyn NotifierPort>,
            clock: Arc::new(SystemClock) as Arc<dyn ClockPort>,
        };

        let controller = Arc::new(FrameExtractionController::new(
            config.selection_limits(),
            frame_rates,
            collaborators,
        ));

        Ok(Self { controller })
    }
}

impl AppContainer for DefaultAppContainer {
    fn controller(&self) -> Arc<FrameExtractionController> {
        Arc::clone(&self.controller)
    }
}
