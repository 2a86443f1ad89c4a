use std::fmt;

use serde::Deserialize;

/// Urgency of a task. Higher is more urgent.
pub type Priority = f64;

/// Type key under which equipment is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentKind {
    Iron,
    Bowl,
    Tray,
    ToolStand,
}

impl EquipmentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EquipmentKind::Iron => "iron",
            EquipmentKind::Bowl => "bowl",
            EquipmentKind::Tray => "tray",
            EquipmentKind::ToolStand => "tool_stand",
        }
    }
}

impl fmt::Display for EquipmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Capability the robot arm picks up from the tool stand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    Gripper,
    Scoop,
    Fork,
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Tool::Gripper => "gripper",
            Tool::Scoop => "scoop",
            Tool::Fork => "fork",
        };
        f.write_str(s)
    }
}

/// Shape of a production run.
///
/// - `Single`: one waffle on one slot.
/// - `Dual`: two waffles sharing one two-slot iron, with the fill and serve
///   steps interleaved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobKind {
    Single,
    Dual,
}

impl JobKind {
    /// Number of orders one job of this kind satisfies.
    pub fn orders_served(&self) -> u32 {
        match self {
            JobKind::Single => 1,
            JobKind::Dual => 2,
        }
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobKind::Single => f.write_str("single"),
            JobKind::Dual => f.write_str("dual"),
        }
    }
}
