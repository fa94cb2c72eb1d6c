#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that picks tower targets from in-range enemy snapshots.

use std::collections::BTreeMap;

use tempo_defence_core::{
    EnemyId, EnemySnapshot, Event, TargetPolicy, TowerId, TowerSnapshot, WorldPoint,
};
use tracing::trace;

/// Chooses a target among `candidates` according to `policy`.
///
/// `Closest` compares Euclidean distance to `origin` and `Furthest` compares
/// waypoint index. Both keep the earliest candidate on ties.
#[must_use]
pub fn select(
    candidates: &[EnemySnapshot],
    policy: TargetPolicy,
    origin: WorldPoint,
) -> Option<EnemyId> {
    let (first, rest) = candidates.split_first()?;

    let chosen = match policy {
        TargetPolicy::Normal => first,
        TargetPolicy::Closest => {
            let mut best = first;
            let mut best_distance = origin.distance(first.position);
            for candidate in rest {
                let distance = origin.distance(candidate.position);
                if distance < best_distance {
                    best = candidate;
                    best_distance = distance;
                }
            }
            best
        }
        TargetPolicy::Furthest => rest.iter().fold(first, |best, candidate| {
            if candidate.waypoint_index > best.waypoint_index {
                candidate
            } else {
                best
            }
        }),
    };

    Some(chosen.id)
}

/// Tower targeting system that keeps a per-tower acquisition list.
///
/// Enemies join a tower's list in the order they enter its range and leave it
/// once they die or walk out of range, so `Normal` sticks to the enemy that
/// was acquired first.
#[derive(Debug, Default)]
pub struct TowerTargeting {
    acquisitions: BTreeMap<TowerId, Vec<EnemyId>>,
    ordered: Vec<EnemySnapshot>,
}

impl TowerTargeting {
    /// Creates a new tower targeting system with no acquired enemies.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Refreshes the tower's acquisition list and returns its current target.
    ///
    /// `candidates` are the alive enemies within the tower's range. When none
    /// remain, `Event::TargetsEmpty` is pushed to `out`.
    pub fn acquire(
        &mut self,
        tower: &TowerSnapshot,
        candidates: &[EnemySnapshot],
        out: &mut Vec<Event>,
    ) -> Option<EnemyId> {
        let acquired = self.acquisitions.entry(tower.id).or_default();
        acquired.retain(|id| {
            candidates
                .iter()
                .any(|candidate| candidate.id == *id && candidate.alive)
        });
        for candidate in candidates.iter().filter(|candidate| candidate.alive) {
            if !acquired.contains(&candidate.id) {
                acquired.push(candidate.id);
            }
        }

        if acquired.is_empty() {
            trace!(tower = ?tower.id, "no targets in range");
            out.push(Event::TargetsEmpty { tower: tower.id });
            return None;
        }

        self.ordered.clear();
        self.ordered.extend(acquired.iter().filter_map(|id| {
            candidates
                .iter()
                .find(|candidate| candidate.id == *id)
                .cloned()
        }));

        select(&self.ordered, tower.policy, tower.position)
    }

    /// Drops the acquisition list of a tower that left the world.
    pub fn forget(&mut self, tower: TowerId) {
        let _ = self.acquisitions.remove(&tower);
    }

    /// Enemies the tower has acquired, in acquisition order.
    #[must_use]
    pub fn acquired(&self, tower: TowerId) -> &[EnemyId] {
        self.acquisitions
            .get(&tower)
            .map_or(&[][..], Vec::as_slice)
    }
}
