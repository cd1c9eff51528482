// Console view adapter - Renders selection and progress on the terminal

use std::io::Write;

use tracing::{debug, warn};

use crate::domain::model::{FileRow, FrameRate, Region};
use crate::ports::{NotifierPort, ViewPort};

/// Terminal rendering of the view and alerts.
///
/// Progress and selection go to stdout; alerts go to stderr. A quiet view
/// only logs, leaving stdout to machine-readable output.
pub struct ConsoleView {
    frame_rates: Vec<FrameRate>,
    quiet: bool,
}

impl ConsoleView {
    pub fn new(frame_rates: Vec<FrameRate>, quiet: bool) -> Self {
        Self { frame_rates, quiet }
    }

    fn line(&self, text: &str) {
        if self.quiet {
            debug!("{}", text);
            return;
        }
        let mut stdout = std::io::stdout().lock();
        // A closed stdout is not worth failing a run over
        let _ = writeln!(stdout, "{}", text);
    }

    fn frame_rate_list(&self) -> String {
        self.frame_rates
            .iter()
            .map(|fps| fps.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl ViewPort for ConsoleView {
    fn render_file_list(&self, rows: &[FileRow]) {
        self.line("Selected videos:");
        for row in rows {
            self.line(&format!("  {}", row));
        }
    }

    fn render_placeholder(&self, text: &str) {
        self.line(text);
    }

    fn set_region_visible(&self, region: Region, visible: bool) {
        debug!("Region {:?} visible: {}", region, visible);
        if !visible {
            return;
        }
        match region {
            Region::FrameRateChooser => {
                self.line(&format!("Frame rates (fps): {}", self.frame_rate_list()))
            }
            Region::LoadingIndicator => self.line("Extracting frames..."),
            Region::DownloadContainer => self.line("Archive ready for download"),
            Region::SubmitAction => {}
        }
    }

    fn set_drop_highlight(&self, active: bool) {
        debug!("Drop highlight: {}", active);
    }
}

impl NotifierPort for ConsoleView {
    fn alert(&self, message: &str) {
        warn!("{}", message);
        eprintln!("warning: {}", message);
    }
}
