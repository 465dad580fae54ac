//! Message dispatch for the deraining workflow.
//!
//! UI callbacks and async completions are turned into [`Action`]s and applied
//! through [`AppState::dispatch`], the only place workflow state changes.
//! Anything that has to happen outside the state (opening a dialog, talking to
//! the service) comes back as an [`Effect`] for the application to run.

use super::processing::{Completion, ProcessingOutcome, RequestToken};
use super::source::ImageCandidate;
use super::AppState;
use crate::error::AcquisitionError;
use eframe::egui;
use std::sync::Arc;

/// A discrete user or network event.
#[derive(Debug)]
pub enum Action {
    /// "Choose File" was clicked.
    PickRequested,
    /// The file dialog returned a file.
    CandidatePicked(ImageCandidate),
    /// The file dialog was dismissed.
    PickCancelled,
    /// A file is being dragged over the window.
    DragHovered,
    /// The drag ended without a drop.
    DragLeft,
    /// Something was dropped; `None` when no readable file came with it.
    CandidateDropped(Option<ImageCandidate>),
    /// "Derain Image" was clicked.
    Submit,
    /// The service finished (or failed, or was cancelled).
    ProcessingFinished(ProcessingOutcome),
    /// The comparison divider was dragged to a 0..100 position.
    SliderMoved(f32),
    ToggleTheme,
    /// Tear the workflow down to its initial state.
    Reset,
}

/// Work requested by a dispatch, executed by the application shell.
#[derive(Debug)]
pub enum Effect {
    OpenFilePicker,
    StartProcessing {
        token: RequestToken,
        input: Arc<[u8]>,
    },
    CancelProcessing {
        token: RequestToken,
    },
}

impl AppState {
    /// Apply one action.
    pub fn dispatch(&mut self, ctx: &egui::Context, action: Action) -> Option<Effect> {
        match action {
            Action::PickRequested => {
                if self.acquisition.open_picker() {
                    self.status_message = "Opening file dialog...".to_string();
                    Some(Effect::OpenFilePicker)
                } else {
                    None
                }
            }
            Action::CandidatePicked(candidate) => {
                self.acquisition.picker_closed();
                let accepted = self
                    .acquisition
                    .accept_candidate(ctx, &mut self.source, candidate)
                    .map(|image| image.name().to_string());
                self.after_acquisition(accepted)
            }
            Action::PickCancelled => {
                self.acquisition.picker_closed();
                self.status_message = "File selection cancelled".to_string();
                None
            }
            Action::DragHovered => {
                self.acquisition.drag_hovered();
                None
            }
            Action::DragLeft => {
                self.acquisition.drag_left();
                None
            }
            Action::CandidateDropped(candidate) => {
                let accepted = self
                    .acquisition
                    .accept_drop(ctx, &mut self.source, candidate)
                    .map(|image| image.name().to_string());
                self.after_acquisition(accepted)
            }
            Action::Submit => self.submit(),
            Action::ProcessingFinished(outcome) => {
                self.finish_processing(ctx, outcome);
                None
            }
            Action::SliderMoved(position) => {
                self.comparison.set_position(position);
                None
            }
            Action::ToggleTheme => {
                self.settings.dark_mode = !self.settings.dark_mode;
                self.settings.save();
                None
            }
            Action::Reset => {
                log::info!("Resetting workflow");
                let superseded = self.processing.reset();
                self.comparison.discard();
                self.source.clear();
                self.error = None;
                self.status_message = "Ready".to_string();
                superseded.map(|token| Effect::CancelProcessing { token })
            }
        }
    }

    fn after_acquisition(&mut self, accepted: Result<String, AcquisitionError>) -> Option<Effect> {
        match accepted {
            Ok(name) => {
                self.error = None;
                self.comparison.discard();
                let superseded = self.processing.source_replaced();
                self.status_message = format!("Loaded image: {}", name);
                superseded.map(|token| Effect::CancelProcessing { token })
            }
            Err(e) => {
                self.status_message = "Image rejected".to_string();
                self.error = Some(e.into());
                None
            }
        }
    }

    fn submit(&mut self) -> Option<Effect> {
        match self.processing.submit(self.source.current()) {
            Ok(Some(request)) => {
                self.error = None;
                self.comparison.discard();
                self.status_message = "Deraining...".to_string();
                Some(Effect::StartProcessing {
                    token: request.token,
                    input: request.input,
                })
            }
            Ok(None) => None,
            Err(e) => {
                self.error = Some(e.into());
                None
            }
        }
    }

    fn finish_processing(&mut self, ctx: &egui::Context, outcome: ProcessingOutcome) {
        match self.processing.complete(ctx, outcome) {
            Completion::Stale => {}
            Completion::Succeeded { elapsed } => {
                self.comparison.activate();
                self.status_message = format!("Derained in {:.1}s", elapsed.as_secs_f64());
            }
            Completion::Failed(_) => {
                self.comparison.discard();
                self.status_message = "Deraining failed".to_string();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::preview::test_support::{allocated_textures, png};
    use super::super::processing::ProcessingPhase;
    use super::*;
    use crate::error::{ServiceError, SubmitError, WorkflowError};

    fn photo(name: &str) -> ImageCandidate {
        ImageCandidate::new(name, "image/jpeg", png(6, 4))
    }

    fn start(effect: Option<Effect>) -> (RequestToken, Arc<[u8]>) {
        match effect {
            Some(Effect::StartProcessing { token, input }) => (token, input),
            other => panic!("expected StartProcessing, got {other:?}"),
        }
    }

    fn succeed(state: &mut AppState, ctx: &egui::Context, token: RequestToken) {
        let effect = state.dispatch(
            ctx,
            Action::ProcessingFinished(ProcessingOutcome {
                token,
                result: Ok(png(6, 4)),
            }),
        );
        assert!(effect.is_none());
    }

    #[test]
    fn test_happy_path() {
        let ctx = egui::Context::default();
        let mut state = AppState::default();

        assert!(state
            .dispatch(&ctx, Action::CandidatePicked(photo("photo.jpg")))
            .is_none());
        assert!(matches!(state.processing.phase(), ProcessingPhase::Ready));

        let (token, input) = start(state.dispatch(&ctx, Action::Submit));
        assert!(state.processing.is_running());
        assert_eq!(input.len(), state.source.current().unwrap().byte_len());

        succeed(&mut state, &ctx, token);
        assert!(matches!(state.processing.phase(), ProcessingPhase::Succeeded(_)));
        assert!(state.comparison.is_active());
        assert!(state.visible_error().is_none());
    }

    #[test]
    fn test_rejected_file_then_submit() {
        let ctx = egui::Context::default();
        let mut state = AppState::default();

        state.dispatch(
            &ctx,
            Action::CandidatePicked(ImageCandidate::from_named_bytes(
                "notes.txt",
                b"hello".to_vec(),
            )),
        );
        assert!(matches!(state.error, Some(WorkflowError::Validation(_))));
        assert!(state.source.is_empty());

        assert!(state.dispatch(&ctx, Action::Submit).is_none());
        assert_eq!(
            state.error,
            Some(WorkflowError::NoInput(SubmitError::NoInput))
        );
        assert!(matches!(state.processing.phase(), ProcessingPhase::Idle));
    }

    #[test]
    fn test_dropped_non_image_is_rejected() {
        let ctx = egui::Context::default();
        let mut state = AppState::default();
        state.dispatch(&ctx, Action::CandidateDropped(Some(photo("photo.jpg"))));
        let textures = allocated_textures(&ctx);

        state.dispatch(&ctx, Action::DragHovered);
        let effect = state.dispatch(
            &ctx,
            Action::CandidateDropped(Some(ImageCandidate::new(
                "notes.txt",
                "text/plain",
                b"not a picture".to_vec(),
            ))),
        );

        assert!(effect.is_none());
        assert!(matches!(
            state.error,
            Some(WorkflowError::Validation(AcquisitionError::NotAnImage { .. }))
        ));
        assert_eq!(state.source.current().map(|s| s.name()), Some("photo.jpg"));
        assert!(matches!(state.processing.phase(), ProcessingPhase::Ready));
        assert!(!state.acquisition.is_dragging());
        assert_eq!(allocated_textures(&ctx), textures);
    }

    #[test]
    fn test_new_image_discards_comparison() {
        let ctx = egui::Context::default();
        let mut state = AppState::default();

        state.dispatch(&ctx, Action::CandidatePicked(photo("photo.jpg")));
        let (token, _) = start(state.dispatch(&ctx, Action::Submit));
        succeed(&mut state, &ctx, token);
        state.dispatch(&ctx, Action::SliderMoved(80.0));

        let effect = state.dispatch(&ctx, Action::CandidateDropped(Some(photo("photo2.jpg"))));
        assert!(effect.is_none());
        assert!(matches!(state.processing.phase(), ProcessingPhase::Ready));
        assert!(!state.comparison.is_active());
        assert!(state.processing.result().is_none());
        assert_eq!(state.source.current().map(|s| s.name()), Some("photo2.jpg"));
    }

    #[test]
    fn test_new_image_while_running_cancels() {
        let ctx = egui::Context::default();
        let mut state = AppState::default();

        state.dispatch(&ctx, Action::CandidatePicked(photo("photo.jpg")));
        let (old, _) = start(state.dispatch(&ctx, Action::Submit));

        let effect = state.dispatch(&ctx, Action::CandidatePicked(photo("photo2.jpg")));
        assert!(matches!(effect, Some(Effect::CancelProcessing { token }) if token == old));

        // The late result for the first image must not show up.
        succeed(&mut state, &ctx, old);
        assert!(matches!(state.processing.phase(), ProcessingPhase::Ready));
        assert!(!state.comparison.is_active());
    }

    #[test]
    fn test_repeated_submit_dispatches_once() {
        let ctx = egui::Context::default();
        let mut state = AppState::default();

        state.dispatch(&ctx, Action::CandidatePicked(photo("photo.jpg")));
        start(state.dispatch(&ctx, Action::Submit));
        for _ in 0..5 {
            assert!(state.dispatch(&ctx, Action::Submit).is_none());
        }
        assert!(state.processing.is_running());
    }

    #[test]
    fn test_failure_keeps_source_and_allows_retry() {
        let ctx = egui::Context::default();
        let mut state = AppState::default();

        state.dispatch(&ctx, Action::CandidatePicked(photo("photo.jpg")));
        let (token, _) = start(state.dispatch(&ctx, Action::Submit));
        state.dispatch(
            &ctx,
            Action::ProcessingFinished(ProcessingOutcome {
                token,
                result: Err(ServiceError::Timeout(std::time::Duration::from_secs(30))),
            }),
        );

        assert!(matches!(state.processing.phase(), ProcessingPhase::Failed(_)));
        assert_eq!(
            state.visible_error().map(|e| e.to_string()),
            Some("deraining timed out after 30s".to_string())
        );
        assert!(state.source.current().is_some());

        let (retry, _) = start(state.dispatch(&ctx, Action::Submit));
        assert_ne!(retry, token);
        assert!(state.visible_error().is_none());
    }

    #[test]
    fn test_validation_error_does_not_touch_result() {
        let ctx = egui::Context::default();
        let mut state = AppState::default();

        state.dispatch(&ctx, Action::CandidatePicked(photo("photo.jpg")));
        let (token, _) = start(state.dispatch(&ctx, Action::Submit));
        succeed(&mut state, &ctx, token);

        state.dispatch(&ctx, Action::CandidateDropped(None));
        assert!(matches!(state.error, Some(WorkflowError::Validation(_))));
        assert!(state.processing.result().is_some());
        assert!(state.comparison.is_active());

        state.dispatch(&ctx, Action::CandidatePicked(photo("photo2.jpg")));
        assert!(state.error.is_none());
    }

    #[test]
    fn test_slider_inert_without_result() {
        let ctx = egui::Context::default();
        let mut state = AppState::default();
        state.dispatch(&ctx, Action::SliderMoved(10.0));
        assert!(state.comparison.state().is_none());
    }

    #[test]
    fn test_reset_releases_everything() {
        let ctx = egui::Context::default();
        let baseline = allocated_textures(&ctx);
        let mut state = AppState::default();

        for i in 0..3 {
            state.dispatch(&ctx, Action::CandidatePicked(photo(&format!("photo{i}.jpg"))));
            let (token, _) = start(state.dispatch(&ctx, Action::Submit));
            succeed(&mut state, &ctx, token);
            // Source preview plus derained result.
            assert_eq!(allocated_textures(&ctx), baseline + 2);
        }

        state.dispatch(&ctx, Action::CandidatePicked(photo("last.jpg")));
        start(state.dispatch(&ctx, Action::Submit));
        let effect = state.dispatch(&ctx, Action::Reset);
        assert!(matches!(effect, Some(Effect::CancelProcessing { .. })));
        assert!(state.source.is_empty());
        assert!(matches!(state.processing.phase(), ProcessingPhase::Idle));
        assert_eq!(allocated_textures(&ctx), baseline);
    }

    #[test]
    fn test_picker_opens_once() {
        let ctx = egui::Context::default();
        let mut state = AppState::default();

        assert!(matches!(
            state.dispatch(&ctx, Action::PickRequested),
            Some(Effect::OpenFilePicker)
        ));
        assert!(state.dispatch(&ctx, Action::PickRequested).is_none());

        state.dispatch(&ctx, Action::PickCancelled);
        assert!(!state.acquisition.is_picker_open());
        assert!(state.source.is_empty());
    }

    #[test]
    fn test_toggle_theme() {
        let ctx = egui::Context::default();
        let mut state = AppState::default();
        let initial = state.settings.dark_mode;
        state.dispatch(&ctx, Action::ToggleTheme);
        assert_eq!(state.settings.dark_mode, !initial);
    }
}
