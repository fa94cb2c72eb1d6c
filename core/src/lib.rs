#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Tempo Defence combat engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values that listeners
//! react to deterministically. Systems read immutable snapshots such as
//! [`EnemySnapshot`] and [`TowerSnapshot`] and respond with new commands.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Tempo Defence.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Broadcasts the global pause flag.
    SetPaused {
        /// Whether the simulation should be paused.
        paused: bool,
    },
    /// Requests that a new enemy of the provided archetype enters the path.
    SpawnEnemy {
        /// Archetype describing the enemy's stats.
        archetype: ArchetypeId,
    },
    /// Applies the tower's attack damage to the enemy after re-validating it.
    Strike {
        /// Tower delivering the attack.
        tower: TowerId,
        /// Enemy receiving the attack.
        enemy: EnemyId,
    },
    /// Requests placement of a tower on the provided hex tile.
    PlaceTower {
        /// Type of tower to construct.
        kind: TowerKind,
        /// Tile that hosts the tower.
        tile: HexCell,
        /// Initial targeting policy of the tower.
        policy: TargetPolicy,
    },
    /// Requests that a tower is sold back for its sell value.
    SellTower {
        /// Identifier of the tower being sold.
        tower: TowerId,
    },
    /// Switches the targeting policy of an existing tower.
    SetTargetPolicy {
        /// Identifier of the tower to reconfigure.
        tower: TowerId,
        /// Policy the tower should use from now on.
        policy: TargetPolicy,
    },
    /// Overrides the maximum health of a living enemy.
    SetMaxHealth {
        /// Enemy to adjust.
        enemy: EnemyId,
        /// New maximum health; current health is clamped to it.
        max_health: f32,
    },
    /// Heals a living enemy back to its maximum health.
    RestoreHealth {
        /// Enemy to heal.
        enemy: EnemyId,
    },
    /// Stops the game, sending every living enemy into its death sequence
    /// without rewarding the player.
    StopGame,
}

/// Events broadcast by the world and systems after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces a change of the global pause flag.
    PauseChanged {
        /// Whether the simulation is now paused.
        paused: bool,
    },
    /// Confirms that an enemy entered the path.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Archetype the enemy was created from.
        archetype: ArchetypeId,
        /// World position of the first waypoint.
        position: WorldPoint,
    },
    /// Reports that a spawn request could not be honoured.
    SpawnRejected {
        /// Archetype that was requested.
        archetype: ArchetypeId,
        /// Specific reason the spawn failed.
        reason: SpawnError,
    },
    /// Reports that an enemy landed on a new waypoint of its path.
    WaypointReached {
        /// Enemy that advanced.
        enemy: EnemyId,
        /// Index of the waypoint the enemy now stands on or has passed.
        waypoint_index: u32,
    },
    /// Reports that an enemy took damage and survived or died.
    EnemyDamaged {
        /// Enemy that was hit.
        enemy: EnemyId,
        /// Tower that delivered the damage.
        tower: TowerId,
        /// Kind of the attacking tower.
        source: TowerKind,
        /// Amount of damage applied.
        amount: f32,
        /// Health left after the hit, clamped at zero.
        remaining: f32,
    },
    /// Fired exactly once per enemy at the moment its death is determined.
    EnemyDestroyed {
        /// Enemy that died.
        enemy: EnemyId,
        /// Why the enemy died.
        cause: DeathCause,
    },
    /// Reports that an enemy's slot was returned to the arena.
    EnemyRemoved {
        /// Enemy whose slot was recycled.
        enemy: EnemyId,
    },
    /// Reports the player's coin total after it changed.
    CoinsChanged {
        /// New coin total.
        total: f32,
    },
    /// Reports the player's remaining lives after they changed.
    LivesChanged {
        /// Lives left, never negative.
        remaining: u32,
    },
    /// Confirms that a tower was placed into the world.
    TowerPlaced {
        /// Identifier assigned to the tower by the world.
        tower: TowerId,
        /// Type of tower that was placed.
        kind: TowerKind,
        /// Tile occupied by the tower.
        tile: HexCell,
    },
    /// Reports that a tower placement request was rejected.
    TowerPlacementRejected {
        /// Type of tower requested for placement.
        kind: TowerKind,
        /// Tile provided in the placement request.
        tile: HexCell,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that a tower was sold and removed.
    TowerSold {
        /// Identifier of the tower that was sold.
        tower: TowerId,
        /// Coins refunded to the player.
        refund: f32,
    },
    /// Reports that a sale or reconfiguration request referenced no tower.
    TowerRequestRejected {
        /// Identifier used in the request.
        tower: TowerId,
        /// Specific reason the request failed.
        reason: TowerRequestError,
    },
    /// Confirms that a tower switched targeting policy.
    TargetPolicyChanged {
        /// Tower that was reconfigured.
        tower: TowerId,
        /// Policy now in effect.
        policy: TargetPolicy,
    },
    /// Fired by a tower's selector when it has no candidate in range.
    TargetsEmpty {
        /// Tower whose candidate set was empty.
        tower: TowerId,
    },
    /// Announces that the game was stopped.
    GameStopped,
}

/// Targeting rule used by a tower to choose among in-range candidates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetPolicy {
    /// First acquired enemy, kept until it dies or leaves range.
    #[default]
    Normal,
    /// Enemy with the smallest distance to the tower.
    Closest,
    /// Enemy that progressed furthest along the path.
    Furthest,
}

/// Reason an enemy left play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeathCause {
    /// Health was depleted by tower attacks; the player is rewarded.
    KilledByAttack,
    /// The enemy completed its path and cost the player a life.
    ReachedObjective,
    /// The game was stopped externally.
    GameStopped,
}

impl DeathCause {
    /// Reports whether this cause of death grants the enemy's coin reward.
    #[must_use]
    pub const fn grants_reward(self) -> bool {
        matches!(self, Self::KilledByAttack)
    }
}

/// Unique identifier assigned to an enemy.
///
/// The slot addresses the enemy arena while the generation distinguishes the
/// successive occupants of that slot, so identifiers held by towers never
/// resolve to a recycled enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId {
    slot: u32,
    generation: u32,
}

impl EnemyId {
    /// Creates a new enemy identifier from an arena slot and generation.
    #[must_use]
    pub const fn new(slot: u32, generation: u32) -> Self {
        Self { slot, generation }
    }

    /// Arena slot occupied by the enemy.
    #[must_use]
    pub const fn slot(&self) -> u32 {
        self.slot
    }

    /// Generation of the slot when the enemy was spawned.
    #[must_use]
    pub const fn generation(&self) -> u32 {
        self.generation
    }
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Index into the world's enemy archetype table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ArchetypeId(u32);

impl ArchetypeId {
    /// Creates a new archetype identifier.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the archetype identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Position expressed in continuous world units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldPoint {
    x: f32,
    y: f32,
}

impl WorldPoint {
    /// Creates a new point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical coordinate.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Euclidean distance between two points.
    #[must_use]
    pub fn distance(self, other: WorldPoint) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Linear interpolation toward `other`; `t` is clamped to `[0, 1]`.
    #[must_use]
    pub fn lerp(self, other: WorldPoint, t: f32) -> WorldPoint {
        let t = t.clamp(0.0, 1.0);
        WorldPoint::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }
}

/// Location of a single hex tile expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HexCell {
    column: u32,
    row: u32,
}

impl HexCell {
    /// Creates a new hex tile coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the tile.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the tile.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// Types of towers that can be constructed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TowerKind {
    /// Laser tower that fires on the lead track.
    Lead,
    /// Electric tower that fires on the bass track.
    Bass,
    /// Percussive tower that fires on the drum track.
    Drum,
}

impl TowerKind {
    /// Every tower kind in catalogue order.
    pub const ALL: [TowerKind; 3] = [TowerKind::Lead, TowerKind::Bass, TowerKind::Drum];

    /// Returns the stock attack profile for the tower kind.
    #[must_use]
    pub const fn default_profile(self) -> TowerProfile {
        match self {
            Self::Lead => TowerProfile {
                attack_damage: 10.0,
                attack_range: 3.0,
                attack_interval: Duration::from_secs(1),
                arming_delay: Duration::from_millis(450),
                buy_cost: 100.0,
                sell_value: 50.0,
            },
            Self::Bass => TowerProfile {
                attack_damage: 6.0,
                attack_range: 2.5,
                attack_interval: Duration::from_millis(500),
                arming_delay: Duration::from_millis(450),
                buy_cost: 120.0,
                sell_value: 60.0,
            },
            Self::Drum => TowerProfile {
                attack_damage: 25.0,
                attack_range: 2.0,
                attack_interval: Duration::from_secs(2),
                arming_delay: Duration::from_millis(450),
                buy_cost: 150.0,
                sell_value: 75.0,
            },
        }
    }
}

/// Attack and economy parameters of a tower.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TowerProfile {
    /// Damage applied per successful attack.
    pub attack_damage: f32,
    /// Maximum Euclidean distance at which enemies can be attacked.
    pub attack_range: f32,
    /// Minimum simulated time between successive attacks.
    pub attack_interval: Duration,
    /// Time after placement before the tower may attack.
    pub arming_delay: Duration,
    /// Coins charged when the tower is placed.
    pub buy_cost: f32,
    /// Coins refunded when the tower is sold.
    pub sell_value: f32,
}

/// Reasons a tower placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// The requested tile lies outside the hex grid.
    OutOfBounds,
    /// The requested tile is not a turret spawn point.
    NotBuildable,
    /// Another tower already stands on the tile.
    Occupied,
    /// The player cannot afford the tower.
    InsufficientCoins,
}

/// Reasons a request addressed to an existing tower may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TowerRequestError {
    /// No tower with the provided identifier exists.
    MissingTower,
}

/// Reasons a spawn request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpawnError {
    /// Every arena slot is occupied.
    ArenaFull,
    /// The archetype identifier does not exist.
    UnknownArchetype,
    /// The game was stopped; no further enemies enter.
    GameStopped,
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Archetype the enemy was created from.
    pub archetype: ArchetypeId,
    /// Current world position.
    pub position: WorldPoint,
    /// Current health, within `[0, max_health]`.
    pub health: f32,
    /// Maximum health.
    pub max_health: f32,
    /// Index of the last waypoint reached along the path.
    pub waypoint_index: u32,
    /// Whether the enemy can still be targeted and damaged.
    pub alive: bool,
}

/// Read-only snapshot describing enemies in roster insertion order.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view, preserving the provided order.
    #[must_use]
    pub fn from_snapshots(snapshots: Vec<EnemySnapshot>) -> Self {
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Number of captured snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Kind of tower that was constructed.
    pub kind: TowerKind,
    /// Tile the tower stands on.
    pub tile: HexCell,
    /// World position of the tower.
    pub position: WorldPoint,
    /// Active targeting policy.
    pub policy: TargetPolicy,
    /// Attack parameters of the tower.
    pub profile: TowerProfile,
    /// Whether the tower finished arming and may attack.
    pub armed: bool,
}

impl TowerSnapshot {
    /// Reports whether `enemy` is a valid attack target for this tower.
    #[must_use]
    pub fn can_engage(&self, enemy: &EnemySnapshot) -> bool {
        enemy.alive && self.position.distance(enemy.position) <= self.profile.attack_range
    }
}

/// Read-only snapshot describing all towers in registration order.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerSnapshot> {
        self.snapshots
    }
}
