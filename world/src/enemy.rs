//! Enemy units: health, path progress, and the death sequence.

use std::time::Duration;

use tempo_defence_core::{ArchetypeId, DeathCause, EnemyId, EnemySnapshot};

use crate::path::{Path, PathAdvance, PathTracker};

/// Stats shared by every enemy spawned from the same template.
#[derive(Clone, Debug, PartialEq)]
pub struct EnemyArchetype {
    /// Human-readable name used in logs.
    pub name: String,
    /// Health the enemy spawns with; must be positive.
    pub max_health: f32,
    /// Path segments walked per second.
    pub move_speed: f32,
    /// Coins granted when a tower kills the enemy.
    pub coin_reward: f32,
    /// Time between death and the slot returning to the arena.
    pub death_duration: Duration,
}

impl EnemyArchetype {
    /// Reports whether the stats describe a spawnable enemy.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.max_health > 0.0
            && self.max_health.is_finite()
            && self.move_speed >= 0.0
            && self.coin_reward >= 0.0
    }
}

/// Lifecycle state of an enemy occupying an arena slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyState {
    /// Walking the path; can be targeted and damaged.
    Alive,
    /// Death determined; inert until the sequence completes.
    Dying {
        /// Time left before the slot is recycled.
        remaining: Duration,
        /// Why the enemy died.
        cause: DeathCause,
    },
}

/// Result of applying damage to an enemy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DamageOutcome {
    /// The enemy was not alive; nothing changed.
    Ignored,
    /// The enemy survived with the given health.
    Wounded {
        /// Health left after the hit.
        remaining: f32,
    },
    /// The hit depleted the enemy's health and started its death sequence.
    Killed,
}

/// A single enemy walking the path.
#[derive(Clone, Debug)]
pub struct EnemyUnit {
    id: EnemyId,
    archetype: ArchetypeId,
    max_health: f32,
    health: f32,
    move_speed: f32,
    coin_reward: f32,
    death_duration: Duration,
    tracker: PathTracker,
    state: EnemyState,
}

impl EnemyUnit {
    /// Creates a living enemy at full health on the first waypoint.
    #[must_use]
    pub fn spawn(
        id: EnemyId,
        archetype_id: ArchetypeId,
        archetype: &EnemyArchetype,
        path: &Path,
    ) -> Self {
        Self {
            id,
            archetype: archetype_id,
            max_health: archetype.max_health,
            health: archetype.max_health,
            move_speed: archetype.move_speed,
            coin_reward: archetype.coin_reward,
            death_duration: archetype.death_duration,
            tracker: PathTracker::new(path),
            state: EnemyState::Alive,
        }
    }

    /// Identifier of the enemy.
    #[must_use]
    pub const fn id(&self) -> EnemyId {
        self.id
    }

    /// Archetype the enemy was spawned from.
    #[must_use]
    pub const fn archetype(&self) -> ArchetypeId {
        self.archetype
    }

    /// Current health within `[0, max_health]`.
    #[must_use]
    pub const fn health(&self) -> f32 {
        self.health
    }

    /// Maximum health.
    #[must_use]
    pub const fn max_health(&self) -> f32 {
        self.max_health
    }

    /// Coins granted on an attack kill.
    #[must_use]
    pub const fn coin_reward(&self) -> f32 {
        self.coin_reward
    }

    /// Lifecycle state.
    #[must_use]
    pub const fn state(&self) -> EnemyState {
        self.state
    }

    /// Reports whether the enemy can still be targeted and damaged.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        matches!(self.state, EnemyState::Alive)
    }

    /// Path progress of the enemy.
    #[must_use]
    pub const fn tracker(&self) -> &PathTracker {
        &self.tracker
    }

    /// Applies damage; ignored unless the enemy is alive.
    pub fn take_damage(&mut self, amount: f32) -> DamageOutcome {
        if !self.is_alive() {
            return DamageOutcome::Ignored;
        }

        self.health = (self.health - amount.max(0.0)).max(0.0);
        if self.health > 0.0 {
            return DamageOutcome::Wounded {
                remaining: self.health,
            };
        }

        let _ = self.begin_death(DeathCause::KilledByAttack);
        DamageOutcome::Killed
    }

    /// Starts the death sequence. Returns `false` if the enemy already died.
    pub fn begin_death(&mut self, cause: DeathCause) -> bool {
        if !self.is_alive() {
            return false;
        }

        let remaining = match cause {
            DeathCause::ReachedObjective => Duration::ZERO,
            DeathCause::KilledByAttack | DeathCause::GameStopped => self.death_duration,
        };
        self.state = EnemyState::Dying { remaining, cause };
        true
    }

    /// Advances the death sequence, returning `true` once it completed.
    pub fn advance_death(&mut self, dt: Duration) -> bool {
        match &mut self.state {
            EnemyState::Alive => false,
            EnemyState::Dying { remaining, .. } => {
                *remaining = remaining.saturating_sub(dt);
                remaining.is_zero()
            }
        }
    }

    /// Walks the path for `dt`; dead enemies stay where they fell.
    pub fn walk(&mut self, dt: Duration) -> Option<PathAdvance> {
        if !self.is_alive() {
            return None;
        }
        self.tracker.advance(self.move_speed * dt.as_secs_f32())
    }

    /// Reports whether a living enemy stands on the final waypoint.
    #[must_use]
    pub fn reached_objective(&self) -> bool {
        self.is_alive() && self.tracker.is_finished()
    }

    /// Heals a living enemy to full health.
    pub fn restore_health(&mut self) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.health = self.max_health;
        true
    }

    /// Replaces the maximum health of a living enemy, clamping current health.
    pub fn set_max_health(&mut self, max_health: f32) -> bool {
        if !self.is_alive() || !max_health.is_finite() || max_health <= 0.0 {
            return false;
        }
        self.max_health = max_health;
        self.health = self.health.min(max_health);
        true
    }

    /// Captures an immutable snapshot of the enemy.
    #[must_use]
    pub fn snapshot(&self, path: &Path) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            archetype: self.archetype,
            position: self.tracker.position(path),
            health: self.health,
            max_health: self.max_health,
            waypoint_index: self.tracker.waypoint_index(),
            alive: self.is_alive(),
        }
    }
}
