// src/job/task.rs

//! A single atomic step of robot work.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::device::{CompletionTimer, DeviceAction, DeviceDriver, DeviceFault, ToolStand};
use crate::job::completion::Completion;
use crate::registry::{EquipmentRef, EquipmentRegistry};
use crate::types::{EquipmentKind, Priority, Tool};

/// Everything a task needs to execute its side effect.
#[derive(Clone)]
pub struct TaskContext {
    pub driver: Arc<dyn DeviceDriver>,
    pub registry: Arc<EquipmentRegistry>,
    pub timer: Arc<dyn CompletionTimer>,
}

impl fmt::Debug for TaskContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskContext")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

/// What a task does to its iron.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskAction {
    OpenLid,
    CloseLid,
    Pour { slot: u32 },
    /// Completes in the background once `duration` has elapsed.
    Cook { duration: Duration },
    Serve { slot: u32 },
}

/// Public view of where a task is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// Not dispatched yet.
    Pending,
    /// Dispatched and waiting for its completion signal.
    Running,
    /// The last attempt hit a device fault; the task stays unfinished.
    Faulted,
    Finished,
}

/// A device fault attributed to the task that hit it.
#[derive(Error, Debug, Clone)]
#[error("task '{task}' failed: {fault}")]
pub struct TaskFault {
    pub task: String,
    #[source]
    pub fault: DeviceFault,
}

#[derive(Debug)]
pub struct Task {
    name: String,
    priority: Priority,
    tool: Option<Tool>,
    action: TaskAction,
    iron: EquipmentRef,
    completion: Completion,
    started: bool,
    last_fault: Option<DeviceFault>,
}

impl Task {
    pub fn new(
        name: impl Into<String>,
        priority: Priority,
        tool: Option<Tool>,
        action: TaskAction,
        iron: EquipmentRef,
    ) -> Self {
        Self {
            name: name.into(),
            priority,
            tool,
            action,
            iron,
            completion: Completion::new(),
            started: false,
            last_fault: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn tool(&self) -> Option<Tool> {
        self.tool
    }

    pub fn action(&self) -> TaskAction {
        self.action
    }

    pub fn is_finished(&self) -> bool {
        self.completion.is_finished()
    }

    pub fn last_fault(&self) -> Option<&DeviceFault> {
        self.last_fault.as_ref()
    }

    pub fn status(&self) -> TaskStatus {
        if self.is_finished() {
            TaskStatus::Finished
        } else if self.last_fault.is_some() {
            TaskStatus::Faulted
        } else if self.started {
            TaskStatus::Running
        } else {
            TaskStatus::Pending
        }
    }

    /// True iff this task needs a different tool than the one equipped.
    ///
    /// Tasks without a tool requirement never need a change.
    pub fn is_tool_change_needed(&self, equipped: Option<Tool>) -> bool {
        match self.tool {
            Some(required) => equipped != Some(required),
            None => false,
        }
    }

    /// Execute the task's side effect.
    ///
    /// Synchronous actions are finished when this returns `Ok`. A cook cycle
    /// is handed to the context's timer and finishes later. On a device fault
    /// the task stays unfinished and remembers the fault.
    pub fn run(&mut self, ctx: &TaskContext) -> Result<(), TaskFault> {
        if self.is_finished() {
            debug!(task = %self.name, "run on finished task; nothing to do");
            return Ok(());
        }

        self.started = true;
        self.last_fault = None;

        info!(
            task = %self.name,
            iron = self.iron.name(),
            priority = self.priority,
            "running task"
        );

        match self.execute(ctx) {
            Ok(()) => Ok(()),
            Err(fault) => {
                warn!(task = %self.name, error = %fault, "task hit a device fault");
                self.last_fault = Some(fault.clone());
                Err(TaskFault {
                    task: self.name.clone(),
                    fault,
                })
            }
        }
    }

    fn execute(&mut self, ctx: &TaskContext) -> Result<(), DeviceFault> {
        if let Some(tool) = self.tool {
            ensure_tool(ctx, tool)?;
        }

        let iron = self.iron.name().to_string();

        match self.action {
            TaskAction::OpenLid => {
                ctx.driver.run_action(&DeviceAction::OpenLid { iron })?;
                self.iron.set_lid_open(true);
            }
            TaskAction::CloseLid => {
                ctx.driver.run_action(&DeviceAction::CloseLid { iron })?;
                self.iron.set_lid_open(false);
            }
            TaskAction::Pour { slot } => {
                let bowl = fixture(ctx, EquipmentKind::Bowl)?;
                ctx.driver.run_action(&DeviceAction::Pour {
                    iron,
                    slot,
                    bowl: bowl.name().to_string(),
                })?;
                if !self.iron.fill_slot() {
                    warn!(task = %self.name, "poured into an iron with every slot filled");
                }
            }
            TaskAction::Cook { duration } => {
                ctx.driver.run_action(&DeviceAction::StartCook { iron })?;
                self.iron.record_cook_cycle();
                debug!(task = %self.name, ?duration, "cook cycle started; completion deferred");
                ctx.timer.defer(duration, self.completion.signal());
                return Ok(());
            }
            TaskAction::Serve { slot } => {
                let tray = fixture(ctx, EquipmentKind::Tray)?;
                ctx.driver.run_action(&DeviceAction::Serve {
                    iron,
                    slot,
                    tray: tray.name().to_string(),
                })?;
                if !self.iron.empty_slot() {
                    warn!(task = %self.name, "served from an empty iron");
                }
            }
        }

        self.completion.signal().complete();
        Ok(())
    }
}

/// Make sure the tool stand holds `tool`, changing it if needed.
fn ensure_tool(ctx: &TaskContext, tool: Tool) -> Result<(), DeviceFault> {
    let stand = fixture(ctx, EquipmentKind::ToolStand)?;
    if stand.equipped_tool() == Some(tool) {
        return Ok(());
    }

    info!(from = ?stand.equipped_tool(), to = %tool, "changing tool");
    ctx.driver.run_action(&DeviceAction::ChangeTool { tool })?;
    stand.change_tool(tool);
    Ok(())
}

fn fixture(ctx: &TaskContext, kind: EquipmentKind) -> Result<EquipmentRef, DeviceFault> {
    ctx.registry
        .first_free(kind)
        .ok_or(DeviceFault::FixtureUnavailable(kind))
}
