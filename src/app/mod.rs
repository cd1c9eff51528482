// Application layer - Controller and the stages it drives

pub mod container;
pub mod controller;
pub mod pipeline;
pub mod presenter;
pub mod publisher;

// Re-export application types
pub use container::{AppContainer, DefaultAppContainer};
pub use controller::{Collaborators, FrameExtractionController, RunOutcome, RunSummary};
pub use pipeline::ExtractionPipeline;
pub use presenter::SelectionPresenter;
pub use publisher::DownloadPublisher;
