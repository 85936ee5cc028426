use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use client_logging::{client_trace, client_warn};
use thiserror::Error;
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

use crate::shared::lock;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DebounceError {
    #[error("no tokio runtime available to run the debounced call")]
    NoRuntime,
}

/// Coalesces bursts of calls on one channel into a single invocation that runs
/// once `window` has passed without another call.
///
/// Invocations run on the runtime that was current when the debouncer was
/// created, so `schedule` may be called from any thread. Dropping the debouncer
/// cancels a pending invocation; one that has already fired runs to completion.
#[derive(Debug)]
pub struct Debouncer {
    window: Duration,
    runtime: Option<Handle>,
    pending: Mutex<Option<CancellationToken>>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            runtime: Handle::try_current().ok(),
            pending: Mutex::new(None),
        }
    }

    pub fn with_handle(window: Duration, runtime: Handle) -> Self {
        Self {
            window,
            runtime: Some(runtime),
            pending: Mutex::new(None),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Replaces any pending invocation with `task`, restarting the window.
    ///
    /// Without a runtime the call is refused and the pending invocation, if
    /// any, is left in place.
    pub fn schedule<F>(&self, task: F) -> Result<(), DebounceError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let Some(runtime) = self
            .runtime
            .clone()
            .or_else(|| Handle::try_current().ok())
        else {
            client_warn!("debounced call dropped: {}", DebounceError::NoRuntime);
            return Err(DebounceError::NoRuntime);
        };

        let token = CancellationToken::new();
        if let Some(previous) = lock(&self.pending).replace(token.clone()) {
            previous.cancel();
        }

        let window = self.window;
        runtime.spawn(async move {
            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    client_trace!("debounced call superseded before firing");
                    return;
                }
                _ = tokio::time::sleep(window) => {}
            }
            task.await;
        });
        Ok(())
    }

    /// Drops the pending invocation, if any.
    pub fn cancel(&self) {
        if let Some(token) = lock(&self.pending).take() {
            token.cancel();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
