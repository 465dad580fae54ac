//! Async deraining requests bridged into egui's update loop.
//!
//! Requests are async but egui's update() is synchronous. This struct runs
//! each request in the background and passes the outcome back through a
//! channel that the UI polls every frame.

use super::DerainService;
use super::timer;
use crate::error::ServiceError;
use crate::state::{ProcessingOutcome, RequestToken};
use eframe::egui;
use futures_util::future::{AbortHandle, AbortRegistration, Abortable};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;

/// Channel-based runner for deraining requests.
pub struct ProcessingChannel<S: DerainService> {
    service: S,
    timeout: Duration,
    sender: Sender<ProcessingOutcome>,
    receiver: Receiver<ProcessingOutcome>,
    /// The newest request and the handle that cancels it.
    in_flight: Option<(RequestToken, AbortHandle)>,
}

impl<S: DerainService> ProcessingChannel<S> {
    pub fn new(service: S, timeout: Duration) -> Self {
        let (sender, receiver) = channel();
        Self {
            service,
            timeout,
            sender,
            receiver,
            in_flight: None,
        }
    }

    /// Returns true while a request has been started and not yet received.
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Abort the request with `token` if it is still in flight.
    ///
    /// Its outcome, `ServiceError::Cancelled` or a result that raced the
    /// abort, still arrives through `try_recv()`.
    pub fn cancel(&mut self, token: RequestToken) {
        match self.in_flight.take() {
            Some((current, handle)) if current == token => {
                log::info!("Cancelling request {}", token);
                handle.abort();
            }
            other => self.in_flight = other,
        }
    }

    /// Non-blocking check for a finished request.
    ///
    /// Returns Some(outcome) if a request finished, None otherwise.
    pub fn try_recv(&mut self) -> Option<ProcessingOutcome> {
        let outcome = self.receiver.try_recv().ok()?;
        if matches!(self.in_flight, Some((token, _)) if token == outcome.token) {
            self.in_flight = None;
        }
        Some(outcome)
    }

    /// Register a new request, aborting any older one still running.
    fn register(&mut self, token: RequestToken) -> AbortRegistration {
        let (handle, registration) = AbortHandle::new_pair();
        if let Some((previous, previous_handle)) = self.in_flight.replace((token, handle)) {
            log::debug!("Request {} replaced by {}", previous, token);
            previous_handle.abort();
        }
        registration
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl<S: DerainService + Send> ProcessingChannel<S> {
    /// Start a request on a worker thread.
    ///
    /// When it completes the outcome is sent through the channel and
    /// ctx.request_repaint() is called to trigger a UI update.
    pub fn start(&mut self, ctx: egui::Context, token: RequestToken, input: Arc<[u8]>) {
        let registration = self.register(token);
        let sender = self.sender.clone();
        let service = self.service.clone();
        let timeout = self.timeout;

        std::thread::spawn(move || {
            let result = pollster::block_on(run_request(service, input, timeout, registration));
            let _ = sender.send(ProcessingOutcome { token, result });
            ctx.request_repaint();
        });
    }
}

#[cfg(target_arch = "wasm32")]
impl<S: DerainService> ProcessingChannel<S> {
    /// Start a request on the browser event loop.
    ///
    /// When it completes the outcome is sent through the channel and
    /// ctx.request_repaint() is called to trigger a UI update.
    pub fn start(&mut self, ctx: egui::Context, token: RequestToken, input: Arc<[u8]>) {
        let registration = self.register(token);
        let sender = self.sender.clone();
        let service = self.service.clone();
        let timeout = self.timeout;

        wasm_bindgen_futures::spawn_local(async move {
            let result = run_request(service, input, timeout, registration).await;
            let _ = sender.send(ProcessingOutcome { token, result });
            ctx.request_repaint();
        });
    }
}

/// One service call with timeout and cancellation applied.
async fn run_request<S: DerainService>(
    service: S,
    input: Arc<[u8]>,
    timeout: Duration,
    registration: AbortRegistration,
) -> Result<Vec<u8>, ServiceError> {
    let call = timer::with_timeout(service.derain(input), timeout);
    Abortable::new(call, registration)
        .await
        .unwrap_or(Err(ServiceError::Cancelled))
}
