//! Application state management.
//!
//! State is split by workflow component: the selected image, how images are
//! acquired, the processing lifecycle and the comparison slider. All changes
//! go through [`AppState::dispatch`].

mod acquisition;
mod comparison;
mod preview;
mod processing;
mod settings;
mod source;
mod workflow;

pub use acquisition::InputAcquisition;
pub use comparison::{ComparisonState, ComparisonView};
pub use preview::PreviewHandle;
pub use processing::{ProcessingController, ProcessingOutcome, RequestToken};
pub use settings::WorkbenchSettings;
pub use source::{ImageCandidate, ImageSource, SourceImage};
pub use workflow::{Action, Effect};

#[cfg(test)]
pub(crate) use preview::test_support;

use crate::error::WorkflowError;

/// Root application state containing all sub-states.
pub struct AppState {
    /// The current input image
    pub source: ImageSource,

    /// File picker and drag-and-drop state
    pub acquisition: InputAcquisition,

    /// Submit/running/result lifecycle
    pub processing: ProcessingController,

    /// Before/after slider
    pub comparison: ComparisonView,

    /// Theme and processing settings
    pub settings: WorkbenchSettings,

    /// Last validation or submit error, cleared by the next success of its kind
    pub error: Option<WorkflowError>,

    /// Application status message displayed in top bar
    pub status_message: String,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_settings(WorkbenchSettings::default())
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::with_settings(WorkbenchSettings::load())
    }

    pub fn with_settings(settings: WorkbenchSettings) -> Self {
        Self {
            source: ImageSource::new(),
            acquisition: InputAcquisition::new(),
            processing: ProcessingController::new(),
            comparison: ComparisonView::new(),
            settings,
            error: None,
            status_message: "Ready".to_string(),
        }
    }

    /// Message for the inline error box: a pending validation or submit error
    /// takes precedence over a failed request.
    pub fn visible_error(&self) -> Option<WorkflowError> {
        self.error.clone().or_else(|| {
            self.processing
                .failure()
                .cloned()
                .map(WorkflowError::Processing)
        })
    }

    /// The comparison is shown only for a finished, successful request.
    pub fn comparison_ready(&self) -> bool {
        self.comparison.is_active() && self.processing.result().is_some()
    }
}
