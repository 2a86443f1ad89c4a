#![allow(dead_code)]

use std::sync::Arc;

use wafflebot::device::ToolStand;
use wafflebot::engine::Schedulable;
use wafflebot::job::TaskContext;
use wafflebot::registry::{Equipment, EquipmentRef, EquipmentRegistry};
use wafflebot::types::{EquipmentKind, Priority, Tool};
use wafflebot_test_utils::fakes::{ManualTimer, RecordingDriver};

/// Stand-in job for exercising the selection rule in isolation.
#[derive(Debug, Clone, PartialEq)]
pub struct MockJob {
    pub name: &'static str,
    pub ready: bool,
    pub tool_change: bool,
    pub priority: Priority,
}

impl MockJob {
    pub fn new(name: &'static str, ready: bool, tool_change: bool, priority: Priority) -> Self {
        Self {
            name,
            ready,
            tool_change,
            priority,
        }
    }
}

impl Schedulable for MockJob {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn priority(&self) -> Priority {
        self.priority
    }

    fn needs_tool_change(&self, _equipped: Option<Tool>) -> bool {
        self.tool_change
    }
}

/// A bare task context: one checked-out iron plus bowl, tray and a tool stand
/// holding the gripper.
pub struct Bench {
    pub ctx: TaskContext,
    pub driver: Arc<RecordingDriver>,
    pub timer: Arc<ManualTimer>,
    pub iron: EquipmentRef,
    pub stand: EquipmentRef,
}

impl Bench {
    pub fn new(iron_capacity: u32) -> Self {
        let registry = Arc::new(EquipmentRegistry::new());
        registry.add(Equipment::new(EquipmentKind::Iron, "iron", iron_capacity));
        registry.add(Equipment::new(EquipmentKind::Bowl, "bowl", 1));
        registry.add(Equipment::new(EquipmentKind::Tray, "tray", 1));
        let stand = registry.add(Equipment::new(EquipmentKind::ToolStand, "stand", 1));
        stand.change_tool(Tool::Gripper);

        let iron = registry
            .checkout(EquipmentKind::Iron, iron_capacity)
            .expect("iron should be free");

        let driver = RecordingDriver::new();
        let timer = ManualTimer::new();
        let ctx = TaskContext {
            driver: driver.clone(),
            registry,
            timer: timer.clone(),
        };

        Self {
            ctx,
            driver,
            timer,
            iron,
            stand,
        }
    }
}
