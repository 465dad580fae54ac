#![warn(clippy::all)]

//! Derain Workbench - a web-based single image deraining demo.
//!
//! The user picks or drops a rainy photo, submits it to the deraining
//! service, and compares the original against the result with a draggable
//! before/after slider.

mod derain;
mod error;
mod file_ops;
mod state;
mod ui;

use derain::{ProcessingChannel, SimulatedDerainService};
use eframe::egui;
use file_ops::{DroppedFileChannel, FilePickerChannel};
use state::{Action, AppState, Effect};
use std::time::Duration;

/// Repaint interval while a request is running, for the elapsed-time readout.
const RUNNING_REPAINT_INTERVAL: Duration = Duration::from_millis(100);

// Native entry point
#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result<()> {
    env_logger::init();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 720.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "Derain Workbench",
        native_options,
        Box::new(|cc| Ok(Box::new(DerainApp::new(cc)))),
    )
}

// WASM entry point - main is not called on wasm32
#[cfg(target_arch = "wasm32")]
fn main() {}

/// Entry point for the WASM application.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub async fn start() {
    use eframe::wasm_bindgen::JsCast as _;

    // Redirect `log` messages to `console.log`:
    eframe::WebLogger::init(log::LevelFilter::Debug).ok();

    let web_options = eframe::WebOptions::default();

    wasm_bindgen_futures::spawn_local(async {
        let document = web_sys::window()
            .expect("No window")
            .document()
            .expect("No document");

        let canvas = document
            .get_element_by_id("app_canvas")
            .expect("Failed to find app_canvas")
            .dyn_into::<web_sys::HtmlCanvasElement>()
            .expect("app_canvas was not a HtmlCanvasElement");

        let start_result = eframe::WebRunner::new()
            .start(
                canvas,
                web_options,
                Box::new(|cc| Ok(Box::new(DerainApp::new(cc)))),
            )
            .await;

        // Remove the loading text once the app has loaded:
        if let Some(loading_text) = document.get_element_by_id("loading_text") {
            match start_result {
                Ok(_) => {
                    loading_text.remove();
                }
                Err(e) => {
                    loading_text.set_inner_html(
                        "<p>The app has crashed. See the developer console for details.</p>",
                    );
                    panic!("Failed to start eframe: {e:?}");
                }
            }
        }
    });
}

/// Main application state and logic.
pub struct DerainApp {
    /// Workflow state; changed only through `AppState::dispatch`
    state: AppState,

    /// Channel for async file picker operations
    file_picker: FilePickerChannel,

    /// Channel for reading dropped files
    dropped_files: DroppedFileChannel,

    /// Channel for async deraining requests
    processing: ProcessingChannel<SimulatedDerainService>,

    /// Theme currently applied to the egui context
    applied_dark_mode: Option<bool>,
}

impl DerainApp {
    /// Creates a new DerainApp instance.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        let state = AppState::new();
        let service = SimulatedDerainService::from_settings(&state.settings);
        let processing = ProcessingChannel::new(service, state.settings.timeout());

        log::info!(
            "Derain Workbench started (delay {:?}, timeout {:?})",
            state.settings.simulated_delay(),
            state.settings.timeout()
        );

        Self {
            state,
            file_picker: FilePickerChannel::new(),
            dropped_files: DroppedFileChannel::new(),
            processing,
            applied_dark_mode: None,
        }
    }

    /// Turn pending async results and raw drag-and-drop input into actions.
    fn collect_input(&mut self, ctx: &egui::Context) -> Vec<Action> {
        let mut actions = Vec::new();

        // Check for completed file pick operations
        if let Some(result) = self.file_picker.try_recv() {
            actions.push(match result {
                Some(file_result) => Action::CandidatePicked(file_result.into()),
                None => Action::PickCancelled,
            });
        }

        // Drag-and-drop: the whole window is the drop target
        let (hovering, dropped) = ctx.input(|i| {
            (
                !i.raw.hovered_files.is_empty(),
                i.raw.dropped_files.clone(),
            )
        });
        if let Some(file) = dropped.first() {
            if dropped.len() > 1 {
                log::info!("{} files dropped, using the first", dropped.len());
            }
            self.dropped_files.read(ctx.clone(), file.clone());
        } else if hovering && !self.state.acquisition.is_dragging() {
            actions.push(Action::DragHovered);
        } else if !hovering && self.state.acquisition.is_dragging() {
            actions.push(Action::DragLeft);
        }

        // Check for read dropped files
        while let Some(candidate) = self.dropped_files.try_recv() {
            actions.push(Action::CandidateDropped(candidate));
        }

        // Check for finished deraining requests
        while let Some(outcome) = self.processing.try_recv() {
            actions.push(Action::ProcessingFinished(outcome));
        }

        actions
    }

    /// Dispatch actions in order and run the effects they produce.
    fn apply(&mut self, ctx: &egui::Context, actions: Vec<Action>) {
        if actions.is_empty() {
            return;
        }

        for action in actions {
            if let Some(effect) = self.state.dispatch(ctx, action) {
                self.run_effect(ctx, effect);
            }
        }
        ctx.request_repaint();
    }

    fn run_effect(&mut self, ctx: &egui::Context, effect: Effect) {
        match effect {
            Effect::OpenFilePicker => self.file_picker.pick_file(ctx.clone()),
            Effect::StartProcessing { token, input } => {
                self.processing.start(ctx.clone(), token, input)
            }
            Effect::CancelProcessing { token } => self.processing.cancel(token),
        }
    }

    fn apply_theme(&mut self, ctx: &egui::Context) {
        let dark = self.state.settings.dark_mode;
        if self.applied_dark_mode != Some(dark) {
            ctx.set_theme(if dark {
                egui::Theme::Dark
            } else {
                egui::Theme::Light
            });
            self.applied_dark_mode = Some(dark);
        }
    }
}

impl eframe::App for DerainApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let pending = self.collect_input(ctx);
        self.apply(ctx, pending);

        self.apply_theme(ctx);

        if self.state.processing.is_running() || self.processing.is_busy() {
            ctx.request_repaint_after(RUNNING_REPAINT_INTERVAL);
        }

        // Render UI panels in the correct order for egui layout
        // Side and top/bottom panels must be rendered before CentralPanel
        let mut actions = Vec::new();
        ui::render_top_bar(ctx, &self.state, &mut actions);
        ui::render_upload_panel(ctx, &self.state, &mut actions);
        ui::render_comparison(ctx, &self.state, &mut actions);
        ui::render_drop_overlay(ctx, &self.state);

        self.apply(ctx, actions);
    }
}
