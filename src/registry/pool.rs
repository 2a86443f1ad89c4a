// src/registry/pool.rs

//! The equipment registry: checkout, check-in and reservation bookkeeping.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};

use crate::registry::equipment::{lock, Equipment, EquipmentId, EquipmentRef};
use crate::types::EquipmentKind;

/// Availability bookkeeping for one registered item.
#[derive(Debug)]
struct Slot {
    equipment: Arc<Equipment>,
    free: bool,
    reserved: bool,
    used_reserve_capacity: u32,
}

impl Slot {
    fn remaining_reserve_capacity(&self) -> u32 {
        self.equipment
            .capacity()
            .saturating_sub(self.used_reserve_capacity)
    }
}

/// Read-only view of one registered item, in registration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquipmentStatus {
    pub id: EquipmentId,
    pub name: String,
    pub capacity: u32,
    pub free: bool,
    pub reserved: bool,
    pub used_reserve_capacity: u32,
}

/// Owns every piece of equipment for the lifetime of the process.
///
/// All checkout / check-in calls go through one registry-wide lock, so two
/// concurrent dispatch ticks can never be handed the same free item.
#[derive(Debug, Default)]
pub struct EquipmentRegistry {
    items: Mutex<BTreeMap<EquipmentKind, Vec<Slot>>>,
}

impl EquipmentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an item under its kind. Items start out free and unreserved.
    ///
    /// Registration order within a kind is kept and used as the tie-breaker
    /// for checkout.
    pub fn add(&self, equipment: Equipment) -> EquipmentRef {
        let kind = equipment.kind();
        let equipment = Arc::new(equipment);

        let mut items = lock(&self.items);
        let slots = items.entry(kind).or_default();
        let id = EquipmentId {
            kind,
            index: slots.len(),
        };

        debug!(
            equipment = %id,
            name = equipment.name(),
            capacity = equipment.capacity(),
            "registered equipment"
        );

        slots.push(Slot {
            equipment: Arc::clone(&equipment),
            free: true,
            reserved: false,
            used_reserve_capacity: 0,
        });

        EquipmentRef::new(id, equipment)
    }

    /// First free item of `kind`, without checking it out.
    ///
    /// Used to bind tasks to shared fixtures such as the tool stand.
    pub fn first_free(&self, kind: EquipmentKind) -> Option<EquipmentRef> {
        let items = lock(&self.items);
        let slots = items.get(&kind)?;

        slots
            .iter()
            .enumerate()
            .find(|(_, slot)| slot.free)
            .map(|(index, slot)| {
                EquipmentRef::new(EquipmentId { kind, index }, Arc::clone(&slot.equipment))
            })
    }

    /// Check out the free item of `kind` whose capacity is closest to
    /// `desired_capacity`. Ties go to the earliest registered item.
    ///
    /// Returns `None` when nothing of that kind is free; callers treat that as
    /// backpressure and try again later.
    pub fn checkout(&self, kind: EquipmentKind, desired_capacity: u32) -> Option<EquipmentRef> {
        let mut items = lock(&self.items);
        let Some(slots) = items.get_mut(&kind) else {
            debug!(%kind, "checkout for kind with no registered equipment");
            return None;
        };

        let chosen = slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.free)
            .min_by_key(|(index, slot)| {
                (slot.equipment.capacity().abs_diff(desired_capacity), *index)
            })
            .map(|(index, _)| index);

        let Some(index) = chosen else {
            debug!(%kind, desired_capacity, "no free equipment available");
            return None;
        };

        let slot = &mut slots[index];
        slot.free = false;

        let id = EquipmentId { kind, index };
        info!(
            equipment = %id,
            name = slot.equipment.name(),
            capacity = slot.equipment.capacity(),
            desired_capacity,
            "checked out equipment"
        );

        Some(EquipmentRef::new(id, Arc::clone(&slot.equipment)))
    }

    /// Mark an item free again and drop any reservation it carried.
    ///
    /// Checking in an already free item is a no-op. Returns `true` if this call
    /// changed the item's state.
    pub fn check_in(&self, item: &EquipmentRef) -> bool {
        let mut items = lock(&self.items);
        let Some(slot) = Self::slot_mut(&mut items, item) else {
            warn!(equipment = %item.id(), "check-in for unregistered equipment; ignoring");
            return false;
        };

        if slot.free {
            debug!(equipment = %item.id(), "check-in of already free equipment; no-op");
            return false;
        }

        slot.free = true;
        if slot.reserved {
            debug!(
                equipment = %item.id(),
                used = slot.used_reserve_capacity,
                "dropping reservation on check-in"
            );
        }
        slot.reserved = false;
        slot.used_reserve_capacity = 0;
        info!(equipment = %item.id(), name = item.name(), "checked in equipment");
        true
    }

    /// Whether the item is currently free. `None` if it is not registered here.
    pub fn is_free(&self, item: &EquipmentRef) -> Option<bool> {
        let mut items = lock(&self.items);
        Self::slot_mut(&mut items, item).map(|slot| slot.free)
    }

    /// Whether the item currently carries a soft reservation.
    pub fn is_reserved(&self, item: &EquipmentRef) -> Option<bool> {
        let mut items = lock(&self.items);
        Self::slot_mut(&mut items, item).map(|slot| slot.reserved)
    }

    /// Soft-hold `slots` work slots on an item that is already checked out.
    ///
    /// Picks the checked-out item of `kind` with at least `slots` unreserved
    /// slots left whose capacity is closest to `slots`. Reservations on one
    /// item add up until its capacity is used. The free flag is left
    /// untouched, and `slots == 0` reserves nothing.
    pub fn reserve(&self, kind: EquipmentKind, slots: u32) -> Option<EquipmentRef> {
        if slots == 0 {
            return None;
        }

        let mut items = lock(&self.items);
        let candidates = items.get_mut(&kind)?;

        let index = candidates
            .iter()
            .enumerate()
            .filter(|(_, slot)| !slot.free && slot.remaining_reserve_capacity() >= slots)
            .min_by_key(|(index, slot)| (slot.equipment.capacity().abs_diff(slots), *index))
            .map(|(index, _)| index)?;

        let slot = &mut candidates[index];
        slot.reserved = true;
        slot.used_reserve_capacity += slots;

        let id = EquipmentId { kind, index };
        debug!(
            equipment = %id,
            slots,
            used = slot.used_reserve_capacity,
            "reserved equipment"
        );

        Some(EquipmentRef::new(id, Arc::clone(&slot.equipment)))
    }

    /// Drop every soft reservation on an item. Returns `true` if one was held.
    pub fn release_reservation(&self, item: &EquipmentRef) -> bool {
        let mut items = lock(&self.items);
        match Self::slot_mut(&mut items, item) {
            Some(slot) if slot.reserved => {
                slot.reserved = false;
                slot.used_reserve_capacity = 0;
                debug!(equipment = %item.id(), "released reservation");
                true
            }
            _ => false,
        }
    }

    /// Status of every registered item, grouped by kind in registration order.
    pub fn snapshot(&self) -> Vec<EquipmentStatus> {
        let items = lock(&self.items);
        items
            .iter()
            .flat_map(|(kind, slots)| {
                slots.iter().enumerate().map(|(index, slot)| EquipmentStatus {
                    id: EquipmentId { kind: *kind, index },
                    name: slot.equipment.name().to_string(),
                    capacity: slot.equipment.capacity(),
                    free: slot.free,
                    reserved: slot.reserved,
                    used_reserve_capacity: slot.used_reserve_capacity,
                })
            })
            .collect()
    }

    fn slot_mut<'a>(
        items: &'a mut BTreeMap<EquipmentKind, Vec<Slot>>,
        item: &EquipmentRef,
    ) -> Option<&'a mut Slot> {
        let id = item.id();
        let slot = items.get_mut(&id.kind)?.get_mut(id.index)?;
        // Handles from another registry can share an id; reject them.
        if Arc::ptr_eq(&slot.equipment, item.shared()) {
            Some(slot)
        } else {
            None
        }
    }
}
