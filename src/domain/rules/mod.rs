// Domain rules - Selection acceptance and frame-rate choice

use std::fmt;

use crate::domain::model::*;

/// A user-visible warning raised while filtering a candidate batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionWarning {
    /// The batch holds more candidates than allowed
    TooManyFiles { max_files: usize },
    /// One candidate is larger than allowed
    FileTooLarge { name: String },
}

impl fmt::Display for SelectionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionWarning::TooManyFiles { max_files } => {
                write!(f, "Maximum {} video files allowed", max_files)
            }
            SelectionWarning::FileTooLarge { name } => {
                write!(f, "The file {} exceeds the maximum allowed size", name)
            }
        }
    }
}

/// Result of validating one candidate batch
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub selection: ValidatedSelection,
    pub warnings: Vec<SelectionWarning>,
}

/// Business rules for accepting user-supplied videos
pub struct SelectionValidator;

impl SelectionValidator {
    /// Filter a candidate batch, preserving relative order.
    ///
    /// Each candidate is judged on its own: non-video media types are dropped
    /// silently, then the batch-size rule and the per-file size rule each
    /// raise a warning for the candidate they reject. The batch-size rule is
    /// evaluated per candidate, so an oversized batch yields one warning for
    /// every video candidate in it.
    pub fn validate(candidates: &[VideoFile], limits: &SelectionLimits) -> ValidationReport {
        let total = candidates.len();
        let mut accepted = Vec::with_capacity(total.min(limits.max_files));
        let mut warnings = Vec::new();

        for candidate in candidates {
            if !candidate.is_video() {
                continue;
            }
            if total > limits.max_files {
                warnings.push(SelectionWarning::TooManyFiles {
                    max_files: limits.max_files,
                });
                continue;
            }
            if candidate.size() > limits.max_file_size {
                warnings.push(SelectionWarning::FileTooLarge {
                    name: candidate.name().to_string(),
                });
                continue;
            }
            accepted.push(candidate.clone());
        }

        ValidationReport {
            selection: ValidatedSelection::from_accepted(accepted),
            warnings,
        }
    }
}

/// The set of frame rates a user may pick from
#[derive(Debug, Clone, PartialEq)]
pub struct FrameRateChooser {
    options: Vec<FrameRate>,
}

impl FrameRateChooser {
    pub fn new(options: Vec<FrameRate>) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &[FrameRate] {
        &self.options
    }

    /// Resolve a requested rate to a checked option; anything not offered counts as unchecked
    pub fn select(&self, requested: Option<u32>) -> Option<FrameRate> {
        let requested = requested?;
        self.options.iter().copied().find(|fps| fps.value() == requested)
    }
}
