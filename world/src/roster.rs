//! Registry of living enemies queried by towers.

use tempo_defence_core::{EnemyId, EnemySnapshot, WorldPoint};

use crate::{arena::EnemyArena, path::Path};

/// Insertion-ordered membership list of living enemies.
///
/// The roster does not own enemies; the arena does. Enemies are registered
/// when they spawn and unregistered the moment their death is determined.
#[derive(Clone, Debug, Default)]
pub struct CombatRoster {
    members: Vec<EnemyId>,
}

impl CombatRoster {
    /// Creates an empty roster.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an enemy; registering a member twice keeps its original position.
    pub fn register(&mut self, enemy: EnemyId) {
        if !self.contains(enemy) {
            self.members.push(enemy);
        }
    }

    /// Removes an enemy. Removing an absent enemy is a no-op.
    pub fn unregister(&mut self, enemy: EnemyId) {
        self.members.retain(|member| *member != enemy);
    }

    /// Reports whether the enemy is registered.
    #[must_use]
    pub fn contains(&self, enemy: EnemyId) -> bool {
        self.members.contains(&enemy)
    }

    /// Registered enemies in insertion order.
    #[must_use]
    pub fn members(&self) -> &[EnemyId] {
        &self.members
    }

    /// Number of registered enemies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Reports whether the roster is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Unregisters everyone.
    pub fn clear(&mut self) {
        self.members.clear();
    }

    /// Living enemies within `radius` of `center`, in insertion order.
    #[must_use]
    pub fn query_within_range(
        &self,
        center: WorldPoint,
        radius: f32,
        arena: &EnemyArena,
        path: &Path,
    ) -> Vec<EnemySnapshot> {
        self.members
            .iter()
            .filter_map(|id| arena.get(*id))
            .filter(|unit| unit.is_alive())
            .map(|unit| unit.snapshot(path))
            .filter(|snapshot| center.distance(snapshot.position) <= radius)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enemy::{EnemyArchetype, EnemyUnit};
    use std::time::Duration;
    use tempo_defence_core::{ArchetypeId, DeathCause};

    fn fixture(count: usize) -> (EnemyArena, Path, Vec<EnemyId>) {
        let path = Path::new(vec![WorldPoint::new(0.0, 0.0), WorldPoint::new(10.0, 0.0)])
            .expect("valid path");
        let archetype = EnemyArchetype {
            name: "grunt".to_owned(),
            max_health: 10.0,
            move_speed: 0.1,
            coin_reward: 1.0,
            death_duration: Duration::from_secs(1),
        };
        let mut arena = EnemyArena::with_capacity(count);
        let ids = (0..count)
            .filter_map(|_| {
                arena.insert(|id| EnemyUnit::spawn(id, ArchetypeId::new(0), &archetype, &path))
            })
            .collect();
        (arena, path, ids)
    }

    #[test]
    fn unregister_is_idempotent() {
        let (_, _, ids) = fixture(2);
        let mut roster = CombatRoster::new();
        roster.register(ids[0]);
        roster.register(ids[1]);
        roster.register(ids[0]);
        assert_eq!(roster.members(), &[ids[0], ids[1]]);

        roster.unregister(ids[0]);
        roster.unregister(ids[0]);
        assert_eq!(roster.members(), &[ids[1]]);
    }

    #[test]
    fn query_respects_radius_and_insertion_order() {
        let (mut arena, path, ids) = fixture(3);
        for (steps, id) in [(5, ids[0]), (0, ids[1]), (1, ids[2])] {
            let unit = arena.get_mut(id).expect("spawned");
            for _ in 0..steps {
                let _ = unit.walk(Duration::from_secs(1));
            }
        }

        let mut roster = CombatRoster::new();
        roster.register(ids[2]);
        roster.register(ids[0]);
        roster.register(ids[1]);

        let found: Vec<EnemyId> = roster
            .query_within_range(WorldPoint::new(0.0, 0.0), 1.5, &arena, &path)
            .into_iter()
            .map(|snapshot| snapshot.id)
            .collect();
        assert_eq!(found, vec![ids[2], ids[1]]);
    }

    #[test]
    fn dying_members_are_excluded_from_queries() {
        let (mut arena, path, ids) = fixture(1);
        let mut roster = CombatRoster::new();
        roster.register(ids[0]);
        assert!(arena
            .get_mut(ids[0])
            .expect("spawned")
            .begin_death(DeathCause::GameStopped));

        assert!(roster
            .query_within_range(WorldPoint::new(0.0, 0.0), 5.0, &arena, &path)
            .is_empty());
    }
}
