//! Command implementations

use anyhow::{bail, Context, Result};
use serde::Serialize;
use tracing::info;

use crate::adapters::AppConfig;
use crate::app::container::{AppContainer, DefaultAppContainer};
use crate::app::controller::{RunOutcome, NOTHING_SELECTED_MESSAGE, NO_FRAME_RATE_MESSAGE};
use crate::app::presenter::SelectionPresenter;
use crate::cli::args::{CheckArgs, ExtractArgs};
use crate::domain::model::FileRow;
use crate::probe::collect_candidates;

/// Machine-readable result of the check command
#[derive(Debug, Serialize)]
struct CheckReport {
    accepted: Vec<FileRow>,
    rejected: usize,
    max_files: usize,
    max_file_size: u64,
}

/// Execute the check command
pub async fn check(args: CheckArgs, config: &AppConfig) -> Result<()> {
    info!("Checking {} inputs", args.inputs.len());
    let candidates = collect_candidates(&args.inputs).context("Failed to read inputs")?;

    let container = DefaultAppContainer::new(config, args.json)?;
    let controller = container.controller();
    let accepted = controller.on_files_selected(&candidates);

    if args.json {
        let limits = controller.limits();
        let report = CheckReport {
            accepted: SelectionPresenter::rows(&controller.selection()),
            rejected: candidates.len() - accepted,
            max_files: limits.max_files,
            max_file_size: limits.max_file_size,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    if accepted == 0 {
        bail!("No valid videos selected");
    }
    Ok(())
}

/// Execute the extract command
pub async fn extract(args: ExtractArgs, config: &AppConfig) -> Result<()> {
    info!("Extracting frames from {} inputs", args.inputs.len());
    let candidates = collect_candidates(&args.inputs).context("Failed to read inputs")?;

    let container = DefaultAppContainer::new(config, false)?;
    let controller = container.controller();
    controller.on_files_selected(&candidates);

    match controller.on_submit(args.fps).await {
        RunOutcome::Completed(summary) => {
            let saved = controller
                .on_download_clicked()
                .await
                .context("Failed to save archive")?;
            match saved {
                Some(path) => println!(
                    "Saved {} frames from {} videos to {}",
                    summary.frames,
                    summary.videos,
                    path.display()
                ),
                None => bail!("Archive was not available for download"),
            }
            Ok(())
        }
        RunOutcome::NoFrameRate => bail!(
            "{} Available rates: {}",
            NO_FRAME_RATE_MESSAGE,
            frame_rate_list(config)
        ),
        RunOutcome::NothingSelected => bail!(NOTHING_SELECTED_MESSAGE),
        RunOutcome::AlreadyRunning => bail!("A run is already in progress"),
        RunOutcome::Failed(e) => Err(e).context("Frame extraction failed"),
    }
}

/// Execute the formats command
pub fn formats(config: &AppConfig) -> Result<()> {
    println!("Supported formats: {}", config.limits.supported_formats.join(", "));
    println!("Maximum files: {}", config.limits.max_files);
    println!(
        "Maximum file size: {} bytes ({:.2} MB)",
        config.limits.max_file_size,
        config.limits.max_file_size as f64 / (1024.0 * 1024.0)
    );
    println!("Frame rates (fps): {}", frame_rate_list(config));
    Ok(())
}

fn frame_rate_list(config: &AppConfig) -> String {
    config
        .extraction
        .frame_rate_options
        .iter()
        .map(|fps| fps.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
