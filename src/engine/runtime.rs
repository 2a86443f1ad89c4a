// src/engine/runtime.rs

use std::fmt;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::errors::Result;
use crate::job::JobId;

use super::coordinator::{DispatchOutcome, JobCoordinator};
use super::{RuntimeEvent, RuntimeOptions};

/// What one tick changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Jobs created from pending orders.
    pub created: Vec<JobId>,
    /// Number of tasks dispatched.
    pub dispatched: usize,
    /// Jobs that finished during this tick's dispatches.
    pub finished: Vec<JobId>,
}

/// One driver tick: create jobs while orders and irons allow, then dispatch.
///
/// Dispatching stops at the first idle outcome and after at most one dispatch
/// per running job, so a tick never spins.
pub fn run_tick(coordinator: &mut JobCoordinator) -> TickReport {
    let mut report = TickReport::default();

    while let Some(id) = coordinator.try_create_job_from_orders() {
        report.created.push(id);
    }

    let budget = coordinator.running_jobs().len().max(1);
    for _ in 0..budget {
        match coordinator.dispatch_once() {
            DispatchOutcome::Idle => break,
            DispatchOutcome::Advanced {
                job, job_finished, ..
            } => {
                report.dispatched += 1;
                if job_finished {
                    report.finished.push(job);
                }
            }
        }
    }

    report
}

/// Async shell around [`JobCoordinator`].
///
/// Reads [`RuntimeEvent`]s from a channel and maps them onto the
/// coordinator's control calls. All scheduling semantics stay in the
/// coordinator.
pub struct Runtime {
    coordinator: JobCoordinator,
    event_rx: mpsc::Receiver<RuntimeEvent>,
    options: RuntimeOptions,
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("coordinator", &self.coordinator)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Runtime {
    pub fn new(
        coordinator: JobCoordinator,
        event_rx: mpsc::Receiver<RuntimeEvent>,
        options: RuntimeOptions,
    ) -> Self {
        Self {
            coordinator,
            event_rx,
            options,
        }
    }

    /// Main event loop.
    ///
    /// Returns the coordinator once the loop stops, so callers can inspect
    /// what was produced.
    pub async fn run(mut self) -> Result<JobCoordinator> {
        info!("wafflebot runtime started");

        while let Some(event) = self.event_rx.recv().await {
            debug!(?event, "runtime received event");

            match event {
                RuntimeEvent::OrderPlaced => self.coordinator.add_order(),
                RuntimeEvent::OrdersWithdrawn(n) => {
                    if !self.coordinator.remove_orders(n) {
                        info!(
                            requested = n,
                            pending = self.coordinator.pending_orders(),
                            "cannot withdraw more orders than are pending"
                        );
                    }
                }
                RuntimeEvent::Tick => {
                    let report = run_tick(&mut self.coordinator);
                    if !report.created.is_empty() || !report.finished.is_empty() {
                        info!(
                            created = ?report.created,
                            finished = ?report.finished,
                            dispatched = report.dispatched,
                            pending = self.coordinator.pending_orders(),
                            "tick"
                        );
                    }

                    if self.options.exit_when_idle && self.coordinator.is_idle() {
                        info!("all orders served; stopping runtime");
                        break;
                    }
                }
                RuntimeEvent::ShutdownRequested => {
                    info!("shutdown requested; stopping runtime");
                    break;
                }
            }
        }

        info!(
            finished = self.coordinator.finished_jobs().len(),
            running = self.coordinator.running_jobs().len(),
            pending = self.coordinator.pending_orders(),
            "runtime exiting"
        );
        Ok(self.coordinator)
    }
}
