// src/device/mod.rs

//! Boundary to the physical cell.
//!
//! The scheduling core never talks to hardware directly. Tasks go through:
//!
//! - [`DeviceDriver`], which turns a [`DeviceAction`] into robot motion and
//!   reports success or a [`DeviceFault`];
//! - [`ToolStand`], the capability of a fixture that holds the arm's tool;
//! - [`CompletionTimer`] (in [`timer`]), which finishes long-running actions
//!   such as a cook cycle in the background.
//!
//! [`simulated`] provides a driver that performs no IO, used by the binary
//! when no hardware link is configured.

pub mod simulated;
pub mod timer;

use std::fmt;

use thiserror::Error;

use crate::types::{EquipmentKind, Tool};

pub use simulated::SimulatedDriver;
pub use timer::{CompletionTimer, TokioTimer};

/// One domain action the robot cell can perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceAction {
    ChangeTool { tool: Tool },
    OpenLid { iron: String },
    CloseLid { iron: String },
    Pour { iron: String, slot: u32, bowl: String },
    StartCook { iron: String },
    Serve { iron: String, slot: u32, tray: String },
}

impl fmt::Display for DeviceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceAction::ChangeTool { tool } => write!(f, "change tool to {tool}"),
            DeviceAction::OpenLid { iron } => write!(f, "open lid of {iron}"),
            DeviceAction::CloseLid { iron } => write!(f, "close lid of {iron}"),
            DeviceAction::Pour { iron, slot, bowl } => {
                write!(f, "pour from {bowl} into {iron} slot {slot}")
            }
            DeviceAction::StartCook { iron } => write!(f, "start cook cycle on {iron}"),
            DeviceAction::Serve { iron, slot, tray } => {
                write!(f, "serve {iron} slot {slot} onto {tray}")
            }
        }
    }
}

/// Why a device call did not complete.
///
/// The scheduler never inspects these; a fault only means "the task is not
/// finished".
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeviceFault {
    #[error("device rejected '{action}': {reason}")]
    Rejected { action: String, reason: String },

    #[error("no free {0} to work with")]
    FixtureUnavailable(EquipmentKind),

    #[error("device link is disconnected")]
    Disconnected,
}

/// Executes domain actions against the robot cell.
///
/// The binary ships [`SimulatedDriver`]; a hardware link plugs in here.
pub trait DeviceDriver: Send + Sync {
    fn run_action(&self, action: &DeviceAction) -> Result<(), DeviceFault>;
}

/// A fixture that holds exactly one tool for the arm.
pub trait ToolStand {
    fn equipped_tool(&self) -> Option<Tool>;
    fn change_tool(&self, tool: Tool);
}
