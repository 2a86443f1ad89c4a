// src/config/validate.rs

use std::collections::HashSet;
use std::time::Duration;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{Result, WaffleError};
use crate::types::EquipmentKind;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::WaffleError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw))
    }
}

/// Run every semantic check on a raw config.
pub fn validate_config(cfg: &RawConfigFile) -> Result<()> {
    validate_scheduler(cfg)?;
    validate_timing(cfg)?;
    validate_inventory(cfg)?;
    Ok(())
}

fn validate_scheduler(cfg: &RawConfigFile) -> Result<()> {
    if !cfg.scheduler.tool_change_threshold.is_finite() {
        return Err(WaffleError::ConfigError(format!(
            "[scheduler].tool_change_threshold must be a finite number (got {})",
            cfg.scheduler.tool_change_threshold
        )));
    }

    if cfg.scheduler.tick_interval_ms == 0 {
        return Err(WaffleError::ConfigError(
            "[scheduler].tick_interval_ms must be >= 1 (got 0)".to_string(),
        ));
    }

    Ok(())
}

fn validate_timing(cfg: &RawConfigFile) -> Result<()> {
    let secs = cfg.timing.cook_secs;
    if !secs.is_finite() || secs < 0.0 {
        return Err(WaffleError::ConfigError(format!(
            "[timing].cook_secs must be a non-negative number (got {secs})"
        )));
    }

    if Duration::try_from_secs_f64(secs).is_err() {
        return Err(WaffleError::ConfigError(format!(
            "[timing].cook_secs is too large to be a duration (got {secs})"
        )));
    }
    Ok(())
}

fn validate_inventory(cfg: &RawConfigFile) -> Result<()> {
    let mut seen: HashSet<(EquipmentKind, &str)> = HashSet::new();

    for item in &cfg.equipment {
        if item.capacity == 0 {
            return Err(WaffleError::ConfigError(format!(
                "{} '{}' must have capacity >= 1 (got 0)",
                item.kind, item.name
            )));
        }

        if !seen.insert((item.kind, item.name.as_str())) {
            return Err(WaffleError::ConfigError(format!(
                "duplicate {} named '{}'",
                item.kind, item.name
            )));
        }
    }

    let count = |kind: EquipmentKind| cfg.equipment.iter().filter(|e| e.kind == kind).count();

    if count(EquipmentKind::Iron) == 0 {
        return Err(WaffleError::ConfigError(
            "config must contain at least one [[equipment]] with kind = \"iron\"".to_string(),
        ));
    }

    match count(EquipmentKind::ToolStand) {
        1 => Ok(()),
        n => Err(WaffleError::ConfigError(format!(
            "config must contain exactly one tool_stand (got {n})"
        ))),
    }
}
