// src/registry/mod.rs

//! Equipment registry (the resource pool).
//!
//! - [`equipment`] holds the equipment type, its domain state and the shared
//!   handles jobs carry around.
//! - [`pool`] owns availability: checkout by closest capacity, check-in,
//!   probing for shared fixtures and soft reservations.

pub mod equipment;
pub mod pool;

pub use equipment::{DomainState, Equipment, EquipmentId, EquipmentRef};
pub use pool::{EquipmentRegistry, EquipmentStatus};
