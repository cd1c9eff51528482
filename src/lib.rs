//! FrameZip Library
//!
//! Extracts still frames from up to three videos at a chosen rate through an
//! external transcoder and bundles every frame into a single ZIP archive.
//!
//! The [`app::FrameExtractionController`] owns the selection and the run
//! state; every collaborator it talks to sits behind a trait in [`ports`].

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod ports;
pub mod probe;

// Re-export commonly used types
pub use app::{FrameExtractionController, RunOutcome, RunSummary};
pub use domain::errors::{DomainError, FrameZipResult};
pub use domain::model::{ArchiveBlob, Frame, FrameRate, ValidatedSelection, VideoFile, VideoSource};
