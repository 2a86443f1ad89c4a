#![allow(dead_code)]

use std::sync::Arc;

use wafflebot::config::{ConfigFile, EquipmentConfig, RawConfigFile};
use wafflebot::engine::JobCoordinator;
use wafflebot::registry::EquipmentRegistry;
use wafflebot::types::{EquipmentKind, Tool};

use crate::fakes::{ManualTimer, RecordingDriver};

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    /// Empty inventory and default scheduler settings.
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    /// Two-slot iron, one-slot iron, bowl, tray and a tool stand holding the
    /// gripper.
    pub fn standard_cell() -> Self {
        Self::new()
            .with_iron("big iron", 2)
            .with_iron("small iron", 1)
            .with_equipment(EquipmentKind::Bowl, "bowl", 1)
            .with_equipment(EquipmentKind::Tray, "tray", 1)
            .with_equipment(EquipmentKind::ToolStand, "stand", 1)
            .with_equipped_tool(Tool::Gripper)
    }

    pub fn with_equipment(mut self, kind: EquipmentKind, name: &str, capacity: u32) -> Self {
        self.config.equipment.push(EquipmentConfig {
            kind,
            name: name.to_string(),
            capacity,
        });
        self
    }

    pub fn with_iron(self, name: &str, capacity: u32) -> Self {
        self.with_equipment(EquipmentKind::Iron, name, capacity)
    }

    pub fn with_equipped_tool(mut self, tool: Tool) -> Self {
        self.config.tool_stand.equipped = Some(tool);
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.config.scheduler.tool_change_threshold = threshold;
        self
    }

    pub fn with_cook_secs(mut self, secs: f64) -> Self {
        self.config.timing.cook_secs = secs;
        self
    }

    pub fn with_tick_interval_ms(mut self, ms: u64) -> Self {
        self.config.scheduler.tick_interval_ms = ms;
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A coordinator wired to a recording driver and a manual timer.
pub struct TestCell {
    pub coordinator: JobCoordinator,
    pub driver: Arc<RecordingDriver>,
    pub timer: Arc<ManualTimer>,
}

impl TestCell {
    pub fn new(cfg: &ConfigFile) -> Self {
        let driver = RecordingDriver::new();
        let timer = ManualTimer::new();
        let coordinator = wafflebot::build_coordinator(cfg, driver.clone(), timer.clone());
        Self {
            coordinator,
            driver,
            timer,
        }
    }

    pub fn standard() -> Self {
        Self::new(&ConfigFileBuilder::standard_cell().build())
    }

    pub fn registry(&self) -> &Arc<EquipmentRegistry> {
        self.coordinator.registry()
    }

    pub fn add_orders(&mut self, n: u32) {
        for _ in 0..n {
            self.coordinator.add_order();
        }
    }
}
