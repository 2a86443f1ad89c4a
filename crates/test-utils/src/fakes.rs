use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use wafflebot::device::{CompletionTimer, DeviceAction, DeviceDriver, DeviceFault};
use wafflebot::job::CompletionSignal;

/// A fake driver that:
/// - records every action it was asked to perform
/// - fails the next N actions if told to
#[derive(Debug, Default)]
pub struct RecordingDriver {
    actions: Mutex<Vec<DeviceAction>>,
    faults: Mutex<VecDeque<DeviceFault>>,
}

impl RecordingDriver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make the next call fail with `fault`. Queued faults fire in order.
    pub fn fail_next(&self, fault: DeviceFault) {
        self.faults.lock().unwrap().push_back(fault);
    }

    /// Actions that went through, in order.
    pub fn actions(&self) -> Vec<DeviceAction> {
        self.actions.lock().unwrap().clone()
    }

    pub fn tool_changes(&self) -> usize {
        self.actions
            .lock()
            .unwrap()
            .iter()
            .filter(|a| matches!(a, DeviceAction::ChangeTool { .. }))
            .count()
    }
}

impl DeviceDriver for RecordingDriver {
    fn run_action(&self, action: &DeviceAction) -> Result<(), DeviceFault> {
        if let Some(fault) = self.faults.lock().unwrap().pop_front() {
            return Err(fault);
        }
        self.actions.lock().unwrap().push(action.clone());
        Ok(())
    }
}

/// A timer that holds deferred completions until the test fires them.
#[derive(Debug, Default)]
pub struct ManualTimer {
    pending: Mutex<Vec<(Duration, CompletionSignal)>>,
}

impl ManualTimer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Number of completions waiting to fire.
    pub fn pending(&self) -> usize {
        self.pending.lock().unwrap().len()
    }

    /// Delays requested so far and not yet fired.
    pub fn pending_delays(&self) -> Vec<Duration> {
        self.pending.lock().unwrap().iter().map(|(d, _)| *d).collect()
    }

    /// Fire every pending completion. Returns how many fired.
    pub fn fire_all(&self) -> usize {
        let drained: Vec<_> = self.pending.lock().unwrap().drain(..).collect();
        let n = drained.len();
        for (_, signal) in drained {
            signal.complete();
        }
        n
    }
}

impl CompletionTimer for ManualTimer {
    fn defer(&self, delay: Duration, signal: CompletionSignal) {
        self.pending.lock().unwrap().push((delay, signal));
    }
}
