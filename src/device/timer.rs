// src/device/timer.rs

//! Deferred completion of long-running actions.

use std::time::Duration;

use tokio::runtime::Handle;
use tracing::debug;

use crate::job::CompletionSignal;

/// Finishes a task some time after its action was started.
///
/// Implementations must never block the caller: `defer` only arranges for
/// `signal.complete()` to be called later, from whatever context suits them.
pub trait CompletionTimer: Send + Sync {
    fn defer(&self, delay: Duration, signal: CompletionSignal);
}

/// Timer backed by the Tokio runtime it was created on.
///
/// Each deferred completion is a detached Tokio task. If the owning job was
/// cancelled in the meantime the signal still fires, but only flips a flag
/// nobody reads any more.
#[derive(Debug, Clone)]
pub struct TokioTimer {
    handle: Handle,
}

impl TokioTimer {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Timer bound to the runtime of the calling context, if there is one.
    pub fn try_current() -> Option<Self> {
        Handle::try_current().ok().map(Self::new)
    }
}

impl CompletionTimer for TokioTimer {
    fn defer(&self, delay: Duration, signal: CompletionSignal) {
        self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            debug!(?delay, "deferred completion fired");
            signal.complete();
        });
    }
}
