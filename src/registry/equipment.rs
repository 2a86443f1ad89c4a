// src/registry/equipment.rs

//! Equipment instances and the handles jobs hold on to.

use std::fmt;
use std::ops::Deref;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::device::ToolStand;
use crate::types::{EquipmentKind, Tool};

/// Lock a mutex, recovering the data if a previous holder panicked.
///
/// Registry and equipment state stay consistent across a panic because every
/// critical section is a handful of plain field writes.
pub(crate) fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Domain state of a piece of equipment.
///
/// Tasks mutate this through the driver; availability (free / reserved) lives
/// in the registry and is never touched from here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainState {
    pub lid_open: bool,
    pub equipped_tool: Option<Tool>,
    /// Slots currently holding batter or a cooked waffle.
    pub filled_slots: u32,
    /// Completed cook cycles since start-up.
    pub cook_cycles: u64,
}

/// A physical resource with a capacity rating.
#[derive(Debug)]
pub struct Equipment {
    name: String,
    kind: EquipmentKind,
    capacity: u32,
    state: Mutex<DomainState>,
}

impl Equipment {
    /// `capacity` is clamped to at least 1.
    pub fn new(kind: EquipmentKind, name: impl Into<String>, capacity: u32) -> Self {
        Self {
            name: name.into(),
            kind,
            capacity: capacity.max(1),
            state: Mutex::new(DomainState::default()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> EquipmentKind {
        self.kind
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Snapshot of the current domain state.
    pub fn domain_state(&self) -> DomainState {
        lock(&self.state).clone()
    }

    pub fn is_lid_open(&self) -> bool {
        lock(&self.state).lid_open
    }

    pub fn set_lid_open(&self, open: bool) {
        lock(&self.state).lid_open = open;
    }

    /// Mark one more slot as filled. Returns `false` if every slot is full.
    pub fn fill_slot(&self) -> bool {
        let mut state = lock(&self.state);
        if state.filled_slots >= self.capacity {
            return false;
        }
        state.filled_slots += 1;
        true
    }

    /// Empty one slot. Returns `false` if nothing was in the iron.
    pub fn empty_slot(&self) -> bool {
        let mut state = lock(&self.state);
        if state.filled_slots == 0 {
            return false;
        }
        state.filled_slots -= 1;
        true
    }

    pub fn record_cook_cycle(&self) {
        lock(&self.state).cook_cycles += 1;
    }
}

impl ToolStand for Equipment {
    fn equipped_tool(&self) -> Option<Tool> {
        lock(&self.state).equipped_tool
    }

    fn change_tool(&self, tool: Tool) {
        lock(&self.state).equipped_tool = Some(tool);
    }
}

/// Stable identity of a registered item: its kind plus registration index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EquipmentId {
    pub kind: EquipmentKind,
    pub index: usize,
}

impl fmt::Display for EquipmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.kind, self.index)
    }
}

/// Shared handle to a registered piece of equipment.
///
/// Handing one out does not transfer ownership: the registry keeps the
/// availability bookkeeping and expects every checked-out handle back via
/// `check_in`.
#[derive(Debug, Clone)]
pub struct EquipmentRef {
    id: EquipmentId,
    equipment: Arc<Equipment>,
}

impl EquipmentRef {
    pub(crate) fn new(id: EquipmentId, equipment: Arc<Equipment>) -> Self {
        Self { id, equipment }
    }

    pub fn id(&self) -> EquipmentId {
        self.id
    }

    pub(crate) fn shared(&self) -> &Arc<Equipment> {
        &self.equipment
    }
}

impl Deref for EquipmentRef {
    type Target = Equipment;

    fn deref(&self) -> &Self::Target {
        &self.equipment
    }
}

impl PartialEq for EquipmentRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && Arc::ptr_eq(&self.equipment, &other.equipment)
    }
}

impl Eq for EquipmentRef {}
