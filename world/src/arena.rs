//! Fixed-capacity enemy storage with a free list of recycled slots.

use tempo_defence_core::EnemyId;

use crate::enemy::EnemyUnit;

#[derive(Clone, Debug)]
struct Slot {
    generation: u32,
    unit: Option<EnemyUnit>,
}

/// Arena owning every enemy in play.
///
/// Slots are allocated up front. Releasing an enemy bumps the slot's
/// generation and pushes it onto the free list, so no allocation happens
/// while the game runs and stale [`EnemyId`] values stop resolving.
#[derive(Clone, Debug)]
pub struct EnemyArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl EnemyArena {
    /// Creates an arena with `capacity` empty slots.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = u32::try_from(capacity).unwrap_or(u32::MAX);
        Self {
            slots: (0..capacity)
                .map(|_| Slot {
                    generation: 0,
                    unit: None,
                })
                .collect(),
            free: (0..capacity).rev().collect(),
        }
    }

    /// Total number of slots.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of occupied slots, including enemies in their death sequence.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Reports whether no slot is occupied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Places a new enemy in the lowest free slot, or returns `None` when full.
    pub fn insert(&mut self, build: impl FnOnce(EnemyId) -> EnemyUnit) -> Option<EnemyId> {
        let slot_index = self.free.pop()?;
        let slot = &mut self.slots[slot_index as usize];
        let id = EnemyId::new(slot_index, slot.generation);
        slot.unit = Some(build(id));
        Some(id)
    }

    /// Resolves an identifier to its enemy unless the slot was recycled.
    #[must_use]
    pub fn get(&self, id: EnemyId) -> Option<&EnemyUnit> {
        self.slots
            .get(id.slot() as usize)
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.unit.as_ref())
    }

    /// Mutable counterpart of [`EnemyArena::get`].
    pub fn get_mut(&mut self, id: EnemyId) -> Option<&mut EnemyUnit> {
        self.slots
            .get_mut(id.slot() as usize)
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.unit.as_mut())
    }

    /// Returns the enemy's slot to the free list.
    pub fn release(&mut self, id: EnemyId) -> Option<EnemyUnit> {
        let slot = self
            .slots
            .get_mut(id.slot() as usize)
            .filter(|slot| slot.generation == id.generation())?;
        let unit = slot.unit.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.slot());
        Some(unit)
    }

    /// Identifiers of every occupied slot in slot order.
    #[must_use]
    pub fn ids(&self) -> Vec<EnemyId> {
        self.iter().map(EnemyUnit::id).collect()
    }

    /// Iterates over occupied slots in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemyUnit> {
        self.slots.iter().filter_map(|slot| slot.unit.as_ref())
    }

    /// Mutably iterates over occupied slots in slot order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut EnemyUnit> {
        self.slots.iter_mut().filter_map(|slot| slot.unit.as_mut())
    }

    /// Releases every occupied slot without running any death logic.
    pub fn clear(&mut self) {
        for id in self.ids() {
            let _ = self.release(id);
        }
    }
}
