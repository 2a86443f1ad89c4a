// src/config/model.rs

use std::time::Duration;

use serde::Deserialize;

use crate::device::ToolStand;
use crate::job::Timing;
use crate::registry::{Equipment, EquipmentRegistry};
use crate::types::{EquipmentKind, Priority, Tool};

/// Top-level configuration as read from a TOML file, before validation.
///
/// ```toml
/// [scheduler]
/// tool_change_threshold = 4.0
/// tick_interval_ms = 250
///
/// [timing]
/// cook_secs = 150
///
/// [tool_stand]
/// equipped = "gripper"
///
/// [[equipment]]
/// kind = "iron"
/// name = "big iron"
/// capacity = 2
/// ```
///
/// Every section except `[[equipment]]` is optional.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    #[serde(default)]
    pub scheduler: SchedulerSection,

    #[serde(default)]
    pub timing: TimingSection,

    #[serde(default)]
    pub tool_stand: ToolStandSection,

    /// Inventory, registered in declaration order.
    #[serde(default)]
    pub equipment: Vec<EquipmentConfig>,
}

/// Validated configuration. Only obtainable through `TryFrom<RawConfigFile>`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub scheduler: SchedulerSection,
    pub timing: TimingSection,
    pub tool_stand: ToolStandSection,
    pub equipment: Vec<EquipmentConfig>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(raw: RawConfigFile) -> Self {
        Self {
            scheduler: raw.scheduler,
            timing: raw.timing,
            tool_stand: raw.tool_stand,
            equipment: raw.equipment,
        }
    }

    /// Cook duration from `[timing]`.
    ///
    /// Validation guarantees `cook_secs` fits a `Duration`; a value edited
    /// after validation saturates instead of panicking.
    pub fn timing(&self) -> Timing {
        Timing {
            cook: Duration::try_from_secs_f64(self.timing.cook_secs).unwrap_or(Duration::MAX),
        }
    }

    /// Orders to seed at start-up: `[scheduler].initial_orders` plus `extra`.
    pub fn startup_orders(&self, extra: u32) -> u32 {
        self.scheduler.initial_orders.saturating_add(extra)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.scheduler.tick_interval_ms)
    }

    /// Build a registry holding the configured inventory, with the tool stand
    /// holding its configured start-up tool.
    pub fn build_registry(&self) -> EquipmentRegistry {
        let registry = EquipmentRegistry::new();

        for item in &self.equipment {
            let registered = registry.add(Equipment::new(item.kind, &item.name, item.capacity));

            if item.kind == EquipmentKind::ToolStand {
                if let Some(tool) = self.tool_stand.equipped {
                    registered.change_tool(tool);
                }
            }
        }

        registry
    }
}

/// `[scheduler]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerSection {
    /// Jobs at or above this priority are dispatched regardless of tool
    /// changes.
    #[serde(default = "default_tool_change_threshold")]
    pub tool_change_threshold: Priority,

    /// How often the runtime ticks the coordinator.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Orders placed at start-up.
    #[serde(default)]
    pub initial_orders: u32,
}

fn default_tool_change_threshold() -> Priority {
    4.0
}

fn default_tick_interval_ms() -> u64 {
    250
}

impl Default for SchedulerSection {
    fn default() -> Self {
        Self {
            tool_change_threshold: default_tool_change_threshold(),
            tick_interval_ms: default_tick_interval_ms(),
            initial_orders: 0,
        }
    }
}

/// `[timing]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct TimingSection {
    /// Length of one cook cycle in seconds.
    #[serde(default = "default_cook_secs")]
    pub cook_secs: f64,
}

fn default_cook_secs() -> f64 {
    150.0
}

impl Default for TimingSection {
    fn default() -> Self {
        Self {
            cook_secs: default_cook_secs(),
        }
    }
}

/// `[tool_stand]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ToolStandSection {
    /// Tool on the stand at start-up; `None` means the stand starts empty.
    #[serde(default)]
    pub equipped: Option<Tool>,
}

/// One `[[equipment]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct EquipmentConfig {
    pub kind: EquipmentKind,
    pub name: String,
    #[serde(default = "default_capacity")]
    pub capacity: u32,
}

fn default_capacity() -> u32 {
    1
}
