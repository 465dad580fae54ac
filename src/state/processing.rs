//! Processing lifecycle: Idle -> Ready -> Running -> Succeeded / Failed.
//!
//! At most one request is live. Every submit mints a fresh [`RequestToken`];
//! outcomes carrying any other token are stale and are dropped.

use super::preview::{decode_color_image, max_texture_side, PreviewHandle};
use super::source::SourceImage;
use crate::error::{ServiceError, SubmitError};
use eframe::egui;
use std::sync::Arc;
use std::time::Duration;

/// Identifies one submitted request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestToken(u64);

impl std::fmt::Display for RequestToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What the deraining service produced for a request.
#[derive(Debug)]
pub struct ProcessingOutcome {
    pub token: RequestToken,
    pub result: Result<Vec<u8>, ServiceError>,
}

/// A request that should be dispatched to the service.
pub struct StartRequest {
    pub token: RequestToken,
    pub input: Arc<[u8]>,
}

/// The derained image of a successful request.
pub struct DerainedImage {
    preview: PreviewHandle,
    byte_len: usize,
    elapsed: Duration,
}

impl DerainedImage {
    pub fn preview(&self) -> &PreviewHandle {
        &self.preview
    }

    pub fn byte_len(&self) -> usize {
        self.byte_len
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

/// Lifecycle phase. The result exists only in `Succeeded` and the error only
/// in `Failed`.
#[derive(Default)]
pub enum ProcessingPhase {
    /// No image selected.
    #[default]
    Idle,
    /// Image present, nothing submitted for it yet.
    Ready,
    Running {
        token: RequestToken,
        started: web_time::Instant,
    },
    Succeeded(DerainedImage),
    Failed(ServiceError),
}

impl ProcessingPhase {
    pub fn label(&self) -> &'static str {
        match self {
            ProcessingPhase::Idle => "Idle",
            ProcessingPhase::Ready => "Ready",
            ProcessingPhase::Running { .. } => "Running",
            ProcessingPhase::Succeeded(_) => "Succeeded",
            ProcessingPhase::Failed(_) => "Failed",
        }
    }
}

/// How a completion was applied.
#[derive(Debug, PartialEq)]
pub enum Completion {
    /// The outcome belonged to a superseded request and was ignored.
    Stale,
    Succeeded { elapsed: Duration },
    Failed(ServiceError),
}

/// Owner of the single live processing request.
#[derive(Default)]
pub struct ProcessingController {
    phase: ProcessingPhase,
    /// Generation counter for request tokens.
    issued: u64,
}

impl ProcessingController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &ProcessingPhase {
        &self.phase
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, ProcessingPhase::Running { .. })
    }

    /// Token of the running request, if any.
    pub fn running_token(&self) -> Option<RequestToken> {
        match self.phase {
            ProcessingPhase::Running { token, .. } => Some(token),
            _ => None,
        }
    }

    /// Time since the running request was dispatched.
    pub fn running_elapsed(&self) -> Option<Duration> {
        match &self.phase {
            ProcessingPhase::Running { started, .. } => Some(started.elapsed()),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&DerainedImage> {
        match &self.phase {
            ProcessingPhase::Succeeded(image) => Some(image),
            _ => None,
        }
    }

    /// Why the last request failed.
    pub fn failure(&self) -> Option<&ServiceError> {
        match &self.phase {
            ProcessingPhase::Failed(e) => Some(e),
            _ => None,
        }
    }

    /// Begin a request for `source`.
    ///
    /// Without a source this fails and nothing changes. While a request is
    /// running it is a no-op returning `Ok(None)`.
    pub fn submit(
        &mut self,
        source: Option<&SourceImage>,
    ) -> Result<Option<StartRequest>, SubmitError> {
        let Some(source) = source else {
            log::warn!("Submit without an input image");
            return Err(SubmitError::NoInput);
        };

        if let Some(token) = self.running_token() {
            log::debug!("Submit ignored, request {} still running", token);
            return Ok(None);
        }

        self.issued += 1;
        let token = RequestToken(self.issued);
        self.phase = ProcessingPhase::Running {
            token,
            started: web_time::Instant::now(),
        };

        log::info!(
            "Submitting {} ({} bytes) as request {}",
            source.name(),
            source.byte_len(),
            token
        );

        Ok(Some(StartRequest {
            token,
            input: source.bytes(),
        }))
    }

    /// A new source image was accepted: back to `Ready`.
    ///
    /// Returns the token of a request that was running and is now superseded.
    pub fn source_replaced(&mut self) -> Option<RequestToken> {
        let superseded = self.running_token();
        if let Some(token) = superseded {
            log::info!("Request {} superseded by a new image", token);
        }
        self.phase = ProcessingPhase::Ready;
        superseded
    }

    /// Back to `Idle`, dropping any result. Returns a superseded running token.
    pub fn reset(&mut self) -> Option<RequestToken> {
        let superseded = self.running_token();
        self.phase = ProcessingPhase::Idle;
        superseded
    }

    /// Apply a service outcome.
    ///
    /// The returned bytes are decoded into the result texture here; an
    /// undecodable response fails the request.
    pub fn complete(&mut self, ctx: &egui::Context, outcome: ProcessingOutcome) -> Completion {
        let started = match self.phase {
            ProcessingPhase::Running { token, started } if token == outcome.token => started,
            _ => {
                log::debug!("Discarding stale outcome for request {}", outcome.token);
                return Completion::Stale;
            }
        };
        let elapsed = started.elapsed();

        let decoded = outcome.result.and_then(|bytes| {
            decode_color_image(&bytes, max_texture_side(ctx))
                .map(|image| (image, bytes.len()))
                .map_err(|e| {
                    log::warn!("Service output could not be decoded: {}", e);
                    ServiceError::UnreadableOutput
                })
        });

        match decoded {
            Ok((image, byte_len)) => {
                log::info!(
                    "Request {} succeeded in {:.2}s",
                    outcome.token,
                    elapsed.as_secs_f64()
                );
                let preview = PreviewHandle::upload(ctx, "derained_result", image);
                self.phase = ProcessingPhase::Succeeded(DerainedImage {
                    preview,
                    byte_len,
                    elapsed,
                });
                Completion::Succeeded { elapsed }
            }
            Err(e) => {
                log::warn!("Request {} failed: {}", outcome.token, e);
                self.phase = ProcessingPhase::Failed(e.clone());
                Completion::Failed(e)
            }
        }
    }
}
