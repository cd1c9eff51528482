// Adapters - External system implementations

pub mod console_view;
pub mod exec_ffmpeg;
pub mod fs_download;
pub mod system_clock;
pub mod toml_config;
pub mod tracing_log;
pub mod zip_archive;

// Re-export adapters
pub use console_view::ConsoleView;
pub use exec_ffmpeg::FfmpegTranscoder;
pub use fs_download::FsDownloadAdapter;
pub use system_clock::SystemClock;
pub use toml_config::{AppConfig, TomlConfigAdapter};
pub use tracing_log::TracingLogAdapter;
pub use zip_archive::ZipArchiver;
