//! Authoritative tower state management utilities.

use std::{collections::BTreeMap, time::Duration};

use tempo_defence_core::{
    HexCell, TargetPolicy, TowerId, TowerKind, TowerProfile, TowerSnapshot, WorldPoint,
};

/// Attack and economy profiles available for each tower kind.
#[derive(Clone, Debug, PartialEq)]
pub struct TowerCatalog {
    profiles: BTreeMap<TowerKind, TowerProfile>,
}

impl TowerCatalog {
    /// Replaces the profile of a tower kind.
    #[must_use]
    pub fn with_profile(mut self, kind: TowerKind, profile: TowerProfile) -> Self {
        let _ = self.profiles.insert(kind, profile);
        self
    }

    /// Profile used when a tower of `kind` is placed.
    #[must_use]
    pub fn profile(&self, kind: TowerKind) -> TowerProfile {
        self.profiles
            .get(&kind)
            .copied()
            .unwrap_or_else(|| kind.default_profile())
    }

    /// Kinds whose profile has a non-positive range or interval.
    #[must_use]
    pub fn invalid_kinds(&self) -> Vec<TowerKind> {
        TowerKind::ALL
            .into_iter()
            .filter(|kind| {
                let profile = self.profile(*kind);
                !(profile.attack_range > 0.0)
                    || profile.attack_interval.is_zero()
                    || profile.attack_damage < 0.0
            })
            .collect()
    }
}

impl Default for TowerCatalog {
    fn default() -> Self {
        Self {
            profiles: TowerKind::ALL
                .into_iter()
                .map(|kind| (kind, kind.default_profile()))
                .collect(),
        }
    }
}

/// Snapshot of a tower stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct TowerState {
    /// Identifier allocated by the world for the tower.
    pub(crate) id: TowerId,
    /// Kind of tower that was constructed.
    pub(crate) kind: TowerKind,
    /// Tile occupied by the tower.
    pub(crate) tile: HexCell,
    /// World position of the tile.
    pub(crate) position: WorldPoint,
    /// Active targeting policy.
    pub(crate) policy: TargetPolicy,
    /// Attack parameters captured at placement.
    pub(crate) profile: TowerProfile,
    /// Time left before the tower may attack.
    pub(crate) arming: Duration,
}

impl TowerState {
    pub(crate) fn is_armed(&self) -> bool {
        self.arming.is_zero()
    }

    pub(crate) fn snapshot(&self) -> TowerSnapshot {
        TowerSnapshot {
            id: self.id,
            kind: self.kind,
            tile: self.tile,
            position: self.position,
            policy: self.policy,
            profile: self.profile,
            armed: self.is_armed(),
        }
    }
}

/// Registry that stores towers and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct TowerRegistry {
    entries: BTreeMap<TowerId, TowerState>,
    next_tower_id: TowerId,
}

impl TowerRegistry {
    /// Creates an empty tower registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_tower_id: TowerId::new(0),
        }
    }

    /// Stores a freshly placed tower and returns its identifier.
    pub(crate) fn insert(
        &mut self,
        kind: TowerKind,
        tile: HexCell,
        position: WorldPoint,
        policy: TargetPolicy,
        profile: TowerProfile,
    ) -> TowerId {
        let id = self.next_tower_id;
        self.next_tower_id = TowerId::new(id.get().saturating_add(1));
        let _ = self.entries.insert(
            id,
            TowerState {
                id,
                kind,
                tile,
                position,
                policy,
                profile,
                arming: profile.arming_delay,
            },
        );
        id
    }

    pub(crate) fn remove(&mut self, id: TowerId) -> Option<TowerState> {
        self.entries.remove(&id)
    }

    pub(crate) fn get(&self, id: TowerId) -> Option<&TowerState> {
        self.entries.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: TowerId) -> Option<&mut TowerState> {
        self.entries.get_mut(&id)
    }

    /// Tower standing on `tile`, if any.
    pub(crate) fn occupant(&self, tile: HexCell) -> Option<TowerId> {
        self.entries
            .values()
            .find(|tower| tower.tile == tile)
            .map(|tower| tower.id)
    }

    /// Counts down arming delays.
    pub(crate) fn advance_arming(&mut self, dt: Duration) {
        for tower in self.entries.values_mut() {
            tower.arming = tower.arming.saturating_sub(dt);
        }
    }

    /// Towers in identifier order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &TowerState> {
        self.entries.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(registry: &mut TowerRegistry, column: u32) -> TowerId {
        registry.insert(
            TowerKind::Lead,
            HexCell::new(column, 0),
            WorldPoint::new(column as f32, 0.0),
            TargetPolicy::Normal,
            TowerKind::Lead.default_profile(),
        )
    }

    #[test]
    fn registry_allocates_sequential_identifiers() {
        let mut registry = TowerRegistry::new();
        assert_eq!(place(&mut registry, 0), TowerId::new(0));
        assert_eq!(place(&mut registry, 1), TowerId::new(1));
        assert!(registry.remove(TowerId::new(0)).is_some());
        assert_eq!(place(&mut registry, 2), TowerId::new(2));
    }

    #[test]
    fn occupant_reports_tower_on_tile() {
        let mut registry = TowerRegistry::new();
        let id = place(&mut registry, 3);
        assert_eq!(registry.occupant(HexCell::new(3, 0)), Some(id));
        assert_eq!(registry.occupant(HexCell::new(4, 0)), None);
    }

    #[test]
    fn towers_arm_after_delay() {
        let mut registry = TowerRegistry::new();
        let id = place(&mut registry, 0);
        assert!(!registry.get(id).expect("placed").is_armed());
        registry.advance_arming(Duration::from_millis(300));
        assert!(!registry.get(id).expect("placed").snapshot().armed);
        registry.advance_arming(Duration::from_millis(150));
        assert!(registry.get(id).expect("placed").snapshot().armed);
    }

    #[test]
    fn catalog_overrides_replace_default_profiles() {
        let mut profile = TowerKind::Bass.default_profile();
        profile.attack_damage = 99.0;
        let catalog = TowerCatalog::default().with_profile(TowerKind::Bass, profile);
        assert_eq!(catalog.profile(TowerKind::Bass).attack_damage, 99.0);
        assert_eq!(catalog.profile(TowerKind::Lead), TowerKind::Lead.default_profile());
        assert!(catalog.invalid_kinds().is_empty());

        profile.attack_range = 0.0;
        let catalog = catalog.with_profile(TowerKind::Bass, profile);
        assert_eq!(catalog.invalid_kinds(), vec![TowerKind::Bass]);
    }
}
