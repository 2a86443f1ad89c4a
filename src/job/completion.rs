// src/job/completion.rs

//! Completion flag shared between a task and whoever finishes it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Read side of a task's completion flag.
///
/// Polling is non-blocking and the flag only ever goes from unfinished to
/// finished.
#[derive(Debug, Clone, Default)]
pub struct Completion {
    done: Arc<AtomicBool>,
}

impl Completion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_finished(&self) -> bool {
        self.done.load(Ordering::Acquire)
    }

    /// Write side handed to a synchronous action or a background timer.
    pub fn signal(&self) -> CompletionSignal {
        CompletionSignal {
            done: Arc::clone(&self.done),
        }
    }
}

/// Write side of a completion flag. Consumed when fired.
#[derive(Debug)]
pub struct CompletionSignal {
    done: Arc<AtomicBool>,
}

impl CompletionSignal {
    pub fn complete(self) {
        self.done.store(true, Ordering::Release);
    }
}
