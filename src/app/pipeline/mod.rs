// Extraction pipeline - Per-video load/write/run/read/cleanup sequence on the transcoder

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// Root of the transcoder's virtual filesystem
const VFS_ROOT: &str = "/";

/// Extracts frames from one video at a time through the transcoder
pub struct ExtractionPipeline {
    transcoder: Arc<dyn TranscoderPort>,
    clock: Arc<dyn ClockPort>,
    last_stamp: AtomicI64,
}

impl ExtractionPipeline {
    pub fn new(transcoder: Arc<dyn TranscoderPort>, clock: Arc<dyn ClockPort>) -> Self {
        Self {
            transcoder,
            clock,
            last_stamp: AtomicI64::new(0),
        }
    }

    /// Temporary name `input-<millis>.<ext>`; a millisecond value is never issued twice
    pub fn temp_name_for(&self, video: &VideoFile) -> String {
        let now = self.clock.now_millis();
        let next = |last: i64| if now > last { now } else { last + 1 };
        let previous = self
            .last_stamp
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| Some(next(last)))
            .unwrap_or_else(|last| last);
        format!("input-{}.{}", next(previous), video.extension())
    }

    /// Prefix shared by every frame produced for `temp_name`
    pub fn frame_prefix(temp_name: &str) -> String {
        format!("frame-{}", temp_name)
    }

    /// Transcoder arguments sampling `fps` frames per second into numbered PNGs
    pub fn command_args(temp_name: &str, fps: FrameRate) -> Vec<String> {
        vec![
            "-i".to_string(),
            temp_name.to_string(),
            "-vf".to_string(),
            format!("fps={}", fps),
            format!("{}-%d.png", Self::frame_prefix(temp_name)),
        ]
    }

    /// 1-based sequence number embedded in a frame name, if any
    fn frame_index(prefix: &str, name: &str) -> Option<u64> {
        name.strip_prefix(prefix)?
            .strip_prefix('-')?
            .strip_suffix(".png")?
            .parse()
            .ok()
    }

    /// Extract every sampled frame of `video`.
    ///
    /// All-or-nothing: on failure no frames are returned. Temporary entries
    /// are removed whether extraction succeeded or not.
    pub async fn extract_frames(
        &self,
        video: &VideoFile,
        fps: FrameRate,
    ) -> Result<Vec<Frame>, DomainError> {
        let temp_name = self.temp_name_for(video);
        info!("Extracting frames from {} as {} at {} fps", video.name(), temp_name, fps);

        let result = self.extract_into(&temp_name, video, fps).await;
        self.cleanup(&temp_name).await;

        if let Ok(frames) = &result {
            info!("Extracted {} frames from {}", frames.len(), video.name());
        }
        result
    }

    async fn extract_into(
        &self,
        temp_name: &str,
        video: &VideoFile,
        fps: FrameRate,
    ) -> Result<Vec<Frame>, DomainError> {
        let bytes = video.read_bytes().await?;
        self.transcoder.write_file(temp_name, &bytes).await?;
        drop(bytes);

        self.transcoder
            .run(&Self::command_args(temp_name, fps))
            .await?;

        let prefix = Self::frame_prefix(temp_name);
        let mut names: Vec<String> = self
            .transcoder
            .read_dir(VFS_ROOT)
            .await?
            .into_iter()
            .filter(|name| name.starts_with(&prefix))
            .collect();
        names.sort_by_key(|name| (Self::frame_index(&prefix, name).unwrap_or(u64::MAX), name.clone()));

        let mut frames = Vec::with_capacity(names.len());
        for name in names {
            let data = self.transcoder.read_file(&name).await?;
            frames.push(Frame::new(name, data));
        }
        Ok(frames)
    }

    /// Best-effort removal of every entry whose name contains `temp_name`; failures are only logged
    pub async fn cleanup(&self, temp_name: &str) {
        let entries = match self.transcoder.read_dir(VFS_ROOT).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Cleanup of {} skipped: {}", temp_name, e);
                return;
            }
        };

        let mut removed = 0usize;
        for entry in entries.iter().filter(|name| name.contains(temp_name)) {
            match self.transcoder.unlink(entry).await {
                Ok(()) => removed += 1,
                Err(e) => warn!("Cleanup failed for {}: {}", entry, e),
            }
        }
        debug!("Removed {} temporary entries for {}", removed, temp_name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedClock(i64);

    impl ClockPort for FixedClock {
        fn now_millis(&self) -> i64 {
            self.0
        }
    }

    struct NoTranscoder;

    #[async_trait::async_trait]
    impl TranscoderPort for NoTranscoder {
        fn is_loaded(&self) -> bool {
            false
        }
        async fn load(&self) -> Result<(), DomainError> {
            Ok(())
        }
        async fn write_file(&self, _name: &str, _data: &[u8]) -> Result<(), DomainError> {
            Ok(())
        }
        async fn run(&self, _args: &[String]) -> Result<(), DomainError> {
            Ok(())
        }
        async fn read_dir(&self, _path: &str) -> Result<Vec<String>, DomainError> {
            Ok(Vec::new())
        }
        async fn read_file(&self, name: &str) -> Result<Vec<u8>, DomainError> {
            Err(DomainError::VirtualFs(name.to_string()))
        }
        async fn unlink(&self, _name: &str) -> Result<(), DomainError> {
            Ok(())
        }
    }

    fn pipeline(now: i64) -> ExtractionPipeline {
        ExtractionPipeline::new(Arc::new(NoTranscoder), Arc::new(FixedClock(now)))
    }

    #[test]
    fn test_temp_name_uses_timestamp_and_extension() {
        let video = VideoFile::in_memory("holiday.MOV", "video/quicktime", vec![]);
        assert_eq!(pipeline(1_700_000_000_123).temp_name_for(&video), "input-1700000000123.MOV");
    }

    #[test]
    fn test_temp_names_never_collide_on_frozen_clock() {
        let pipeline = pipeline(500);
        let video = VideoFile::in_memory("a.mp4", "video/mp4", vec![]);
        let first = pipeline.temp_name_for(&video);
        let second = pipeline.temp_name_for(&video);
        assert_eq!(first, "input-500.mp4");
        assert_eq!(second, "input-501.mp4");
    }

    #[test]
    fn test_command_args() {
        let args = ExtractionPipeline::command_args("input-7.mp4", FrameRate::new(2).unwrap());
        assert_eq!(
            args,
            vec!["-i", "input-7.mp4", "-vf", "fps=2", "frame-input-7.mp4-%d.png"]
        );
    }

    #[test]
    fn test_frame_index_parsing() {
        let prefix = ExtractionPipeline::frame_prefix("input-7.mp4");
        assert_eq!(ExtractionPipeline::frame_index(&prefix, "frame-input-7.mp4-12.png"), Some(12));
        assert_eq!(ExtractionPipeline::frame_index(&prefix, "frame-input-7.mp4-x.png"), None);
    }
}
