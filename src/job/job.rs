// src/job/job.rs

use std::collections::VecDeque;

use tracing::debug;

use crate::job::task::{Task, TaskContext, TaskFault};
use crate::registry::EquipmentRef;
use crate::types::{JobKind, Priority, Tool};

/// Identifier handed out by the coordinator, unique per process.
pub type JobId = u64;

/// One production run: a FIFO queue of tasks bound to one checked-out iron.
///
/// The job holds its iron for its whole life but never releases it itself;
/// the coordinator checks it back in once the job is finished.
#[derive(Debug)]
pub struct Job {
    id: JobId,
    kind: JobKind,
    equipment: EquipmentRef,
    tasks: VecDeque<Task>,
    /// Most recently dispatched task; may still be waiting on its completion.
    current: Option<Task>,
}

impl Job {
    pub fn new(id: JobId, kind: JobKind, equipment: EquipmentRef, tasks: Vec<Task>) -> Self {
        Self {
            id,
            kind,
            equipment,
            tasks: tasks.into(),
            current: None,
        }
    }

    pub fn id(&self) -> JobId {
        self.id
    }

    pub fn kind(&self) -> JobKind {
        self.kind
    }

    pub fn equipment(&self) -> &EquipmentRef {
        &self.equipment
    }

    /// Ready iff nothing was dispatched yet or the last dispatched task is done.
    pub fn is_ready(&self) -> bool {
        self.current.as_ref().is_none_or(Task::is_finished)
    }

    /// Finished iff no task is left to dispatch and the last one completed.
    pub fn is_finished(&self) -> bool {
        self.tasks.is_empty() && self.is_ready()
    }

    /// Priority of the next task to dispatch, without dequeuing it.
    pub fn current_priority(&self) -> Option<Priority> {
        self.tasks.front().map(Task::priority)
    }

    /// Whether the next task needs the tool stand to switch from `equipped`.
    pub fn needs_tool_change(&self, equipped: Option<Tool>) -> bool {
        self.tasks
            .front()
            .is_some_and(|task| task.is_tool_change_needed(equipped))
    }

    pub fn tasks_left(&self) -> usize {
        self.tasks.len()
    }

    pub fn current_task(&self) -> Option<&Task> {
        self.current.as_ref()
    }

    pub fn current_task_name(&self) -> Option<&str> {
        self.current.as_ref().map(Task::name)
    }

    /// Name of the task the next `advance` would dispatch.
    pub fn next_task_name(&self) -> Option<&str> {
        self.tasks.front().map(Task::name)
    }

    /// Dequeue the next task, make it current and run it.
    ///
    /// # Panics
    ///
    /// Panics if the job is not ready or has no task left. Both mean the
    /// caller skipped the readiness check, which would break task ordering.
    pub fn advance(&mut self, ctx: &TaskContext) -> Result<(), TaskFault> {
        assert!(
            self.is_ready(),
            "job {} advanced while task '{}' is still in flight",
            self.id,
            self.current_task_name().unwrap_or("?"),
        );

        let Some(task) = self.tasks.pop_front() else {
            panic!("job {} advanced with an empty task queue", self.id);
        };

        debug!(
            job = self.id,
            task = task.name(),
            remaining = self.tasks.len(),
            "advancing job"
        );

        self.current.insert(task).run(ctx)
    }

    /// Run the current task again if its last attempt faulted.
    ///
    /// Returns `None` when there is no faulted task to retry.
    pub fn retry_current(&mut self, ctx: &TaskContext) -> Option<Result<(), TaskFault>> {
        let task = self.current.as_mut()?;
        if task.is_finished() || task.last_fault().is_none() {
            return None;
        }

        debug!(job = self.id, task = task.name(), "retrying faulted task");
        Some(task.run(ctx))
    }
}
