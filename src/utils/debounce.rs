//! Cancellable trailing-edge debounce.
//!
//! Each `start` supersedes the invocation still pending from the previous
//! call, so only the last value of a burst reaches the callback.

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::AbortHandle;

/// Handle to one scheduled invocation.
///
#[derive(Clone, Debug)]
pub struct DebounceHandle {
    abort: AbortHandle,
}

impl DebounceHandle {
    /// Cancel the invocation if it has not fired yet.
    ///
    pub fn cancel(&self) {
        self.abort.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.abort.is_finished()
    }
}

/// Delays calls to a callback until input has been quiet for the delay.
///
pub struct Debouncer<T> {
    callback: Arc<dyn Fn(T) + Send + Sync>,
    pending: Mutex<Option<AbortHandle>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        Debouncer {
            callback: Arc::new(callback),
            pending: Mutex::new(None),
        }
    }

    /// Schedule the callback with `value` after `delay`, cancelling the
    /// previously scheduled call. Must be called within a tokio runtime.
    ///
    pub fn start(&self, value: T, delay: Duration) -> DebounceHandle {
        let callback = self.callback.clone();
        let abort = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            callback(value);
        })
        .abort_handle();

        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = pending.replace(abort.clone()) {
            previous.abort();
        }
        DebounceHandle { abort }
    }

    /// Cancel whatever is pending.
    ///
    pub fn cancel(&self) {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = pending.take() {
            previous.abort();
        }
    }
}
