// Selection presenter - Projects the current selection onto the view

use std::sync::Arc;

use crate::domain::model::*;
use crate::ports::ViewPort;

/// Text shown in the file list while nothing is selected
pub const EMPTY_SELECTION_PLACEHOLDER: &str = "Or drag and drop your videos here";

/// Renders the selection and toggles the controls that depend on it
pub struct SelectionPresenter {
    view: Arc<dyn ViewPort>,
}

impl SelectionPresenter {
    pub fn new(view: Arc<dyn ViewPort>) -> Self {
        Self { view }
    }

    /// One row per selected file, in selection order
    pub fn rows(selection: &ValidatedSelection) -> Vec<FileRow> {
        selection.iter().map(FileRow::from_video).collect()
    }

    /// Idempotent for a given selection
    pub fn present(&self, selection: &ValidatedSelection) {
        let has_files = !selection.is_empty();

        if has_files {
            self.view.render_file_list(&Self::rows(selection));
        } else {
            self.view.render_placeholder(EMPTY_SELECTION_PLACEHOLDER);
        }

        self.view.set_region_visible(Region::FrameRateChooser, has_files);
        self.view.set_region_visible(Region::SubmitAction, has_files);
    }
}
