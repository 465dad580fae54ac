//! Timers that work on both the browser event loop and native threads.

use crate::error::ServiceError;
use futures_util::future::{select, Either};
use std::future::Future;
use std::pin::pin;
use std::time::Duration;

/// Resolve after `duration`.
///
/// Dropping the future before it resolves clears the browser timeout, so the
/// callback never runs against a freed closure.
#[cfg(target_arch = "wasm32")]
pub async fn sleep(duration: Duration) {
    use wasm_bindgen::prelude::*;

    #[wasm_bindgen]
    extern "C" {
        #[wasm_bindgen(js_name = setTimeout)]
        fn set_timeout(closure: &Closure<dyn FnMut()>, millis: u32) -> i32;

        #[wasm_bindgen(js_name = clearTimeout)]
        fn clear_timeout(id: i32);
    }

    /// A scheduled timeout together with the closure it calls.
    struct PendingTimeout {
        id: i32,
        _closure: Closure<dyn FnMut()>,
    }

    impl Drop for PendingTimeout {
        fn drop(&mut self) {
            // Clearing a timeout that already fired is a no-op.
            clear_timeout(self.id);
        }
    }

    let millis = u32::try_from(duration.as_millis()).unwrap_or(u32::MAX);
    let (tx, rx) = futures_channel::oneshot::channel::<()>();
    let closure = Closure::once(move || {
        let _ = tx.send(());
    });
    let _pending = PendingTimeout {
        id: set_timeout(&closure, millis),
        _closure: closure,
    };
    let _ = rx.await;
}

/// Resolve after `duration`, using a helper thread so the awaiting executor
/// is not blocked.
///
/// Dropping the future wakes the helper thread, which then exits without
/// waiting out the rest of the duration.
#[cfg(not(target_arch = "wasm32"))]
pub async fn sleep(duration: Duration) {
    if duration.is_zero() {
        return;
    }

    let (fired, _cancel) = spawn_timer(duration);
    let _ = fired.await;
}

/// Start a helper thread that completes `fired` after `duration`.
///
/// The thread exits early, dropping `fired` unsent, as soon as the returned
/// sender is dropped.
#[cfg(not(target_arch = "wasm32"))]
fn spawn_timer(
    duration: Duration,
) -> (
    futures_channel::oneshot::Receiver<()>,
    std::sync::mpsc::Sender<()>,
) {
    use std::sync::mpsc::RecvTimeoutError;

    let (fired_tx, fired_rx) = futures_channel::oneshot::channel::<()>();
    let (cancel_tx, cancel_rx) = std::sync::mpsc::channel::<()>();
    std::thread::spawn(move || {
        if let Err(RecvTimeoutError::Timeout) = cancel_rx.recv_timeout(duration) {
            let _ = fired_tx.send(());
        }
    });
    (fired_rx, cancel_tx)
}

/// Run `future`, failing with [`ServiceError::Timeout`] if it has not
/// finished within `timeout`.
pub async fn with_timeout<T>(
    future: impl Future<Output = Result<T, ServiceError>>,
    timeout: Duration,
) -> Result<T, ServiceError> {
    let future = pin!(future);
    let deadline = pin!(sleep(timeout));

    match select(future, deadline).await {
        Either::Left((result, _)) => result,
        Either::Right(((), _)) => Err(ServiceError::Timeout(timeout)),
    }
}
