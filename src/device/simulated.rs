// src/device/simulated.rs

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::info;

use super::{DeviceAction, DeviceDriver, DeviceFault};

/// Driver that performs no IO and accepts every action.
#[derive(Debug, Default)]
pub struct SimulatedDriver {
    actions_run: AtomicU64,
}

impl SimulatedDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of actions accepted so far.
    pub fn actions_run(&self) -> u64 {
        self.actions_run.load(Ordering::Relaxed)
    }
}

impl DeviceDriver for SimulatedDriver {
    fn run_action(&self, action: &DeviceAction) -> Result<(), DeviceFault> {
        let n = self.actions_run.fetch_add(1, Ordering::Relaxed) + 1;
        info!(seq = n, %action, "simulated device action");
        Ok(())
    }
}
