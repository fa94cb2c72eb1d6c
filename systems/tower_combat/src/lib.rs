#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that paces tower attacks and emits strike commands.

use std::{collections::BTreeMap, time::Duration};

use tempo_defence_core::{Command, EnemySnapshot, TowerId, TowerSnapshot};

/// Attack pacing state of a single tower.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AttackCycle {
    /// The tower may attack as soon as it has a valid target.
    #[default]
    Ready,
    /// The tower attacked and waits for its interval to elapse.
    CoolingDown {
        /// Unpaused time accumulated since the last attack.
        elapsed: Duration,
    },
}

impl AttackCycle {
    /// Attempts an attack, entering the cooldown on success.
    ///
    /// Succeeds only when the cycle is ready and `target` is alive and within
    /// the tower's range.
    pub fn try_attack(&mut self, tower: &TowerSnapshot, target: Option<&EnemySnapshot>) -> bool {
        if !self.is_ready() {
            return false;
        }
        match target {
            Some(enemy) if tower.can_engage(enemy) => {
                *self = Self::CoolingDown {
                    elapsed: Duration::ZERO,
                };
                true
            }
            _ => false,
        }
    }

    /// Accumulates cooldown time. A paused advance leaves the cycle untouched.
    pub fn advance(&mut self, dt: Duration, paused: bool, attack_interval: Duration) {
        if paused {
            return;
        }
        if let Self::CoolingDown { elapsed } = self {
            *elapsed = elapsed.saturating_add(dt);
            if *elapsed >= attack_interval {
                *self = Self::Ready;
            }
        }
    }

    /// Reports whether the next attack may happen immediately.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

/// Tower combat system that keeps one attack cycle per tower.
#[derive(Debug, Default)]
pub struct TowerCombat {
    cycles: BTreeMap<TowerId, TowerCycle>,
}

#[derive(Clone, Copy, Debug)]
struct TowerCycle {
    cycle: AttackCycle,
    attack_interval: Duration,
}

impl TowerCombat {
    /// Creates a new tower combat system with no tracked towers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances every tracked tower's cooldown.
    pub fn advance(&mut self, dt: Duration, paused: bool) {
        for entry in self.cycles.values_mut() {
            entry.cycle.advance(dt, paused, entry.attack_interval);
        }
    }

    /// Emits `Command::Strike` when the tower is armed, ready and its target valid.
    pub fn engage(
        &mut self,
        tower: &TowerSnapshot,
        target: Option<&EnemySnapshot>,
        out: &mut Vec<Command>,
    ) {
        let entry = self.cycles.entry(tower.id).or_insert(TowerCycle {
            cycle: AttackCycle::Ready,
            attack_interval: tower.profile.attack_interval,
        });
        entry.attack_interval = tower.profile.attack_interval;

        if !tower.armed {
            return;
        }
        if let Some(enemy) = target {
            if entry.cycle.try_attack(tower, Some(enemy)) {
                out.push(Command::Strike {
                    tower: tower.id,
                    enemy: enemy.id,
                });
            }
        }
    }

    /// Current cycle of a tower; untracked towers are ready.
    #[must_use]
    pub fn cycle(&self, tower: TowerId) -> AttackCycle {
        self.cycles
            .get(&tower)
            .map_or(AttackCycle::Ready, |entry| entry.cycle)
    }

    /// Drops the cycle of a tower that left the world.
    pub fn forget(&mut self, tower: TowerId) {
        let _ = self.cycles.remove(&tower);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempo_defence_core::{
        ArchetypeId, EnemyId, HexCell, TargetPolicy, TowerKind, TowerProfile, WorldPoint,
    };

    fn tower(armed: bool) -> TowerSnapshot {
        TowerSnapshot {
            id: TowerId::new(3),
            kind: TowerKind::Lead,
            tile: HexCell::new(0, 0),
            position: WorldPoint::new(0.0, 0.0),
            policy: TargetPolicy::Normal,
            profile: TowerProfile {
                attack_damage: 10.0,
                attack_range: 5.0,
                attack_interval: Duration::from_secs(1),
                arming_delay: Duration::ZERO,
                buy_cost: 0.0,
                sell_value: 0.0,
            },
            armed,
        }
    }

    fn enemy(distance: f32, alive: bool) -> EnemySnapshot {
        EnemySnapshot {
            id: EnemyId::new(0, 0),
            archetype: ArchetypeId::new(0),
            position: WorldPoint::new(distance, 0.0),
            health: 25.0,
            max_health: 25.0,
            waypoint_index: 0,
            alive,
        }
    }

    #[test]
    fn attack_requires_valid_target() {
        let tower = tower(true);
        let mut cycle = AttackCycle::Ready;
        assert!(!cycle.try_attack(&tower, None));
        assert!(!cycle.try_attack(&tower, Some(&enemy(5.5, true))));
        assert!(!cycle.try_attack(&tower, Some(&enemy(1.0, false))));
        assert!(cycle.is_ready());

        assert!(cycle.try_attack(&tower, Some(&enemy(5.0, true))));
        assert_eq!(
            cycle,
            AttackCycle::CoolingDown {
                elapsed: Duration::ZERO
            }
        );
    }

    #[test]
    fn attacks_are_spaced_by_interval() {
        let tower = tower(true);
        let target = enemy(1.0, true);
        let mut cycle = AttackCycle::Ready;
        let mut attacks = 0;

        for _ in 0..40 {
            if cycle.try_attack(&tower, Some(&target)) {
                attacks += 1;
            }
            cycle.advance(Duration::from_millis(100), false, tower.profile.attack_interval);
        }

        assert_eq!(attacks, 4);
    }

    #[test]
    fn paused_advance_is_a_no_op() {
        let interval = Duration::from_secs(1);
        let mut cycle = AttackCycle::CoolingDown {
            elapsed: Duration::from_millis(300),
        };
        let before = cycle;
        for _ in 0..50 {
            cycle.advance(Duration::from_secs(1), true, interval);
        }
        assert_eq!(cycle, before);

        cycle.advance(Duration::from_millis(700), false, interval);
        assert!(cycle.is_ready());
    }

    #[test]
    fn engage_emits_strike_for_ready_armed_tower() {
        let mut system = TowerCombat::new();
        let target = enemy(2.0, true);
        let mut out = Vec::new();

        system.engage(&tower(false), Some(&target), &mut out);
        assert!(out.is_empty(), "unarmed towers hold fire");

        system.engage(&tower(true), Some(&target), &mut out);
        system.engage(&tower(true), Some(&target), &mut out);
        assert_eq!(
            out,
            vec![Command::Strike {
                tower: TowerId::new(3),
                enemy: target.id,
            }]
        );

        system.advance(Duration::from_secs(1), false);
        assert!(system.cycle(TowerId::new(3)).is_ready());

        system.forget(TowerId::new(3));
        assert!(system.cycle(TowerId::new(3)).is_ready());
    }
}
