// src/engine/coordinator.rs

//! The job coordinator: turns orders into jobs and decides what runs next.
//!
//! The coordinator is synchronous and has no run loop of its own. An outer
//! driver (the async [`Runtime`](crate::engine::Runtime), a CLI, or a test)
//! steps it through `add_order`, `remove_orders`,
//! `try_create_job_from_orders` and `dispatch_once`.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::device::ToolStand;
use crate::engine::orders::OrderBook;
use crate::engine::selection::highest_priority;
use crate::errors::{Result, WaffleError};
use crate::job::{Job, JobFactory, JobId, Task, TaskContext};
use crate::registry::EquipmentRegistry;
use crate::types::{EquipmentKind, JobKind, Priority, Tool};

/// Result of one dispatch tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// No running job was ready.
    Idle,
    /// One task of `job` was dispatched.
    Advanced {
        job: JobId,
        task: String,
        /// The task completed before `dispatch_once` returned.
        task_finished: bool,
        /// The job completed and its iron was checked back in.
        job_finished: bool,
    },
}

#[derive(Debug)]
pub struct JobCoordinator {
    registry: Arc<EquipmentRegistry>,
    factory: JobFactory,
    ctx: TaskContext,
    orders: OrderBook,
    running: Vec<Job>,
    finished: Vec<Job>,
    tool_change_threshold: Priority,
    next_job_id: JobId,
}

impl JobCoordinator {
    /// The coordinator checks irons out of, and back into, `ctx.registry`.
    pub fn new(ctx: TaskContext, factory: JobFactory, tool_change_threshold: Priority) -> Self {
        Self {
            registry: Arc::clone(&ctx.registry),
            factory,
            ctx,
            orders: OrderBook::new(),
            running: Vec::new(),
            finished: Vec::new(),
            tool_change_threshold,
            next_job_id: 1,
        }
    }

    pub fn registry(&self) -> &Arc<EquipmentRegistry> {
        &self.registry
    }

    pub fn orders(&self) -> &OrderBook {
        &self.orders
    }

    pub fn pending_orders(&self) -> u32 {
        self.orders.pending()
    }

    pub fn running_jobs(&self) -> &[Job] {
        &self.running
    }

    pub fn finished_jobs(&self) -> &[Job] {
        &self.finished
    }

    pub fn tool_change_threshold(&self) -> Priority {
        self.tool_change_threshold
    }

    /// No pending orders and no running job.
    pub fn is_idle(&self) -> bool {
        self.orders.is_empty() && self.running.is_empty()
    }

    /// Tool currently held by the first free tool stand.
    pub fn equipped_tool(&self) -> Option<Tool> {
        self.registry
            .first_free(EquipmentKind::ToolStand)
            .and_then(|stand| stand.equipped_tool())
    }

    pub fn add_order(&mut self) {
        self.orders.add();
    }

    /// Withdraw `n` pending orders. Fails without side effects if fewer than
    /// `n` are pending.
    pub fn remove_orders(&mut self, n: u32) -> bool {
        self.orders.remove(n)
    }

    /// Turn pending orders into one job if an iron is available.
    ///
    /// Two or more pending orders ask for a two-slot iron, one order for a
    /// single slot. A dual job is built when the iron obtained has at least two
    /// slots and two orders are pending; otherwise a single job is built. If
    /// no iron is free nothing changes and `None` is returned.
    pub fn try_create_job_from_orders(&mut self) -> Option<JobId> {
        let pending = self.orders.pending();
        let desired_capacity = match pending {
            0 => {
                debug!("no pending orders; no job to create");
                return None;
            }
            1 => 1,
            _ => 2,
        };

        let Some(iron) = self.registry.checkout(EquipmentKind::Iron, desired_capacity) else {
            debug!(pending, desired_capacity, "no free iron; deferring job creation");
            return None;
        };

        let kind = if iron.capacity() >= 2 && pending >= 2 {
            JobKind::Dual
        } else {
            JobKind::Single
        };

        let id = self.next_job_id;
        let Some(job) = self.factory.create_job(kind, id, iron.clone()) else {
            warn!(%kind, equipment = %iron.id(), "factory could not build job; returning iron");
            self.registry.check_in(&iron);
            return None;
        };

        let served = kind.orders_served();
        let consumed = self.orders.remove(served);
        assert!(
            consumed,
            "job {id} consumes {served} orders but only {pending} were pending"
        );

        self.next_job_id += 1;
        info!(
            job = id,
            %kind,
            equipment = iron.name(),
            capacity = iron.capacity(),
            orders_left = self.orders.pending(),
            "job created from orders"
        );
        self.running.push(job);

        Some(id)
    }

    /// Id of the running job that should be advanced next.
    ///
    /// See [`highest_priority`] for the ranking rules.
    pub fn highest_priority_job(&self, threshold: Priority) -> Option<JobId> {
        highest_priority(&self.running, self.equipped_tool(), threshold)
            .map(|index| self.running[index].id())
    }

    /// Advance the highest-priority ready job by one task.
    ///
    /// Jobs whose last task finished in the background since the previous
    /// tick are retired first. A job finished by this dispatch is retired
    /// right away and its iron checked back in.
    pub fn dispatch_once(&mut self) -> DispatchOutcome {
        self.reap_finished();

        let Some(index) = highest_priority(
            &self.running,
            self.equipped_tool(),
            self.tool_change_threshold,
        ) else {
            debug!(running = self.running.len(), "no ready job; idle tick");
            return DispatchOutcome::Idle;
        };

        let job = &mut self.running[index];
        let id = job.id();
        let task = job.next_task_name().unwrap_or_default().to_string();

        if let Err(fault) = job.advance(&self.ctx) {
            // Fault details stop here; the job simply stays not ready.
            debug!(job = id, error = %fault, "task did not complete");
        }

        let task_finished = job.current_task().is_some_and(Task::is_finished);
        let job_finished = job.is_finished();

        if job_finished {
            self.finish_job(index);
        }

        DispatchOutcome::Advanced {
            job: id,
            task,
            task_finished,
            job_finished,
        }
    }

    /// Retire every running job whose tasks are all done. Returns their ids.
    pub fn reap_finished(&mut self) -> Vec<JobId> {
        let mut reaped = Vec::new();
        while let Some(index) = self.running.iter().position(Job::is_finished) {
            reaped.push(self.finish_job(index));
        }
        reaped
    }

    /// Remove a job from the running set without finishing it.
    ///
    /// The job's iron stays checked out. The caller gets the
    /// job back and is responsible for reconciling the iron, e.g. by checking
    /// `job.equipment()` back into the registry.
    pub fn cancel_job(&mut self, id: JobId) -> Option<Job> {
        let index = self.running.iter().position(|job| job.id() == id)?;
        let job = self.running.remove(index);

        warn!(
            job = id,
            equipment = %job.equipment().id(),
            tasks_left = job.tasks_left(),
            "job cancelled; equipment stays checked out until reconciled"
        );

        Some(job)
    }

    /// Re-run the faulted current task of a running job.
    ///
    /// Returns `Ok(true)` if a faulted task was re-run without a new fault,
    /// `Ok(false)` if there was nothing to retry or it faulted again.
    pub fn retry_current_task(&mut self, id: JobId) -> Result<bool> {
        let job = self
            .running
            .iter_mut()
            .find(|job| job.id() == id)
            .ok_or(WaffleError::JobNotFound(id))?;

        match job.retry_current(&self.ctx) {
            Some(Ok(())) => {
                info!(job = id, "faulted task recovered on retry");
                Ok(true)
            }
            Some(Err(fault)) => {
                debug!(job = id, error = %fault, "retry faulted again");
                Ok(false)
            }
            None => Ok(false),
        }
    }

    /// Append pre-built jobs to the running set.
    ///
    /// Meant for tests and tooling that assemble jobs by hand; the jobs' irons
    /// are expected to be checked out already.
    pub fn add_running_jobs(&mut self, jobs: impl IntoIterator<Item = Job>) {
        for job in jobs {
            self.next_job_id = self.next_job_id.max(job.id() + 1);
            self.running.push(job);
        }
    }

    fn finish_job(&mut self, index: usize) -> JobId {
        let job = self.running.remove(index);
        let id = job.id();

        let released = self.registry.check_in(job.equipment());
        assert!(
            released,
            "job {id} finished but its equipment {} was already checked in",
            job.equipment().id()
        );

        info!(job = id, kind = %job.kind(), "job finished");
        self.finished.push(job);
        id
    }
}
