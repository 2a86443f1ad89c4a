// src/job/factory.rs

//! Builds jobs and their fixed task sequences from a job kind.

use std::collections::HashMap;
use std::time::Duration;

use tracing::{debug, warn};

use crate::job::job::{Job, JobId};
use crate::job::task::{Task, TaskAction};
use crate::registry::EquipmentRef;
use crate::types::{JobKind, Priority, Tool};

const LID_PRIORITY: Priority = 2.0;
const POUR_PRIORITY: Priority = 3.0;
const COOK_PRIORITY: Priority = 1.0;
const REOPEN_PRIORITY: Priority = 5.0;
const SERVE_PRIORITY: Priority = 6.0;

/// Durations that shape the task sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub cook: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            cook: Duration::from_secs(150),
        }
    }
}

/// Produces the task sequence for one job kind on the given iron.
pub type Recipe = fn(&EquipmentRef, &Timing) -> Vec<Task>;

/// Registration table from job kind to task sequence.
#[derive(Debug, Clone)]
pub struct JobFactory {
    recipes: HashMap<JobKind, Recipe>,
    timing: Timing,
}

impl JobFactory {
    /// A factory with no recipes registered.
    pub fn new(timing: Timing) -> Self {
        Self {
            recipes: HashMap::new(),
            timing,
        }
    }

    /// A factory that knows the `single` and `dual` waffle sequences.
    pub fn with_default_recipes(timing: Timing) -> Self {
        let mut factory = Self::new(timing);
        factory.register(JobKind::Single, single_waffle);
        factory.register(JobKind::Dual, dual_waffle);
        factory
    }

    /// Register (or replace) the recipe for `kind`.
    pub fn register(&mut self, kind: JobKind, recipe: Recipe) {
        self.recipes.insert(kind, recipe);
    }

    pub fn timing(&self) -> Timing {
        self.timing
    }

    /// Build a job of `kind` around an iron the caller already checked out.
    ///
    /// Returns `None` for a kind without a recipe. The iron is not released in
    /// that case; checking it back in is up to the caller.
    pub fn create_job(&self, kind: JobKind, id: JobId, equipment: EquipmentRef) -> Option<Job> {
        let Some(recipe) = self.recipes.get(&kind) else {
            warn!(%kind, "no recipe registered for job kind");
            return None;
        };

        let tasks = recipe(&equipment, &self.timing);
        debug!(
            job = id,
            %kind,
            equipment = %equipment.id(),
            tasks = tasks.len(),
            "created job"
        );

        Some(Job::new(id, kind, equipment, tasks))
    }
}

/// One waffle on slot 0.
pub fn single_waffle(iron: &EquipmentRef, timing: &Timing) -> Vec<Task> {
    vec![
        open_lid(iron, LID_PRIORITY),
        pour(iron, 0),
        close_lid(iron),
        cook(iron, timing.cook),
        open_lid(iron, REOPEN_PRIORITY),
        serve(iron, 0),
    ]
}

/// Two waffles sharing one iron: both slots are filled, cooked together and
/// served back to back.
pub fn dual_waffle(iron: &EquipmentRef, timing: &Timing) -> Vec<Task> {
    vec![
        open_lid(iron, LID_PRIORITY),
        pour(iron, 0),
        pour(iron, 1),
        close_lid(iron),
        cook(iron, timing.cook),
        open_lid(iron, REOPEN_PRIORITY),
        serve(iron, 0),
        serve(iron, 1),
    ]
}

fn open_lid(iron: &EquipmentRef, priority: Priority) -> Task {
    Task::new(
        "open lid",
        priority,
        Some(Tool::Gripper),
        TaskAction::OpenLid,
        iron.clone(),
    )
}

fn close_lid(iron: &EquipmentRef) -> Task {
    Task::new(
        "close lid",
        LID_PRIORITY,
        Some(Tool::Gripper),
        TaskAction::CloseLid,
        iron.clone(),
    )
}

fn pour(iron: &EquipmentRef, slot: u32) -> Task {
    Task::new(
        format!("pour batter (slot {slot})"),
        POUR_PRIORITY,
        Some(Tool::Scoop),
        TaskAction::Pour { slot },
        iron.clone(),
    )
}

fn cook(iron: &EquipmentRef, duration: Duration) -> Task {
    Task::new(
        "cook",
        COOK_PRIORITY,
        None,
        TaskAction::Cook { duration },
        iron.clone(),
    )
}

fn serve(iron: &EquipmentRef, slot: u32) -> Task {
    Task::new(
        format!("serve waffle (slot {slot})"),
        SERVE_PRIORITY,
        Some(Tool::Fork),
        TaskAction::Serve { slot },
        iron.clone(),
    )
}
