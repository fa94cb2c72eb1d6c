#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Tempo Defence.

pub mod arena;
pub mod economy;
pub mod enemy;
pub mod hex;
pub mod path;
pub mod roster;
mod towers;

use std::time::Duration;

use tempo_defence_core::{
    ArchetypeId, Command, DeathCause, EnemyId, Event, HexCell, PlacementError, SpawnError,
    TargetPolicy, TowerId, TowerKind, TowerRequestError, WELCOME_BANNER,
};
use thiserror::Error;
use tracing::{debug, info, trace};

use crate::{
    arena::EnemyArena,
    economy::{PlayerEconomy, PlayerLedger},
    enemy::{DamageOutcome, EnemyArchetype, EnemyUnit},
    hex::{HexGrid, HexLayout, TileState},
    path::{Path, PathError},
    roster::CombatRoster,
    towers::TowerRegistry,
};

pub use towers::TowerCatalog;

/// Lives lost when an enemy reaches the objective.
const OBJECTIVE_LIFE_COST: u32 = 1;

/// Defects in a [`WorldConfig`] detected while building the world.
#[derive(Debug, Error, PartialEq)]
pub enum WorldError {
    /// The path could not be built.
    #[error(transparent)]
    Path(#[from] PathError),
    /// The hex grid has no tiles.
    #[error("hex grid must have at least one column and one row")]
    EmptyGrid,
    /// The arena cannot hold any enemy.
    #[error("enemy arena capacity must be positive")]
    ZeroArenaCapacity,
    /// An archetype has non-positive health or negative speed or reward.
    #[error("enemy archetype `{name}` has invalid stats")]
    InvalidArchetype {
        /// Name of the archetype.
        name: String,
    },
    /// A turret tile does not exist in the hex grid.
    #[error("turret tile ({column}, {row}) lies outside the hex grid")]
    TurretTileOutOfBounds {
        /// Column of the offending tile.
        column: u32,
        /// Row of the offending tile.
        row: u32,
    },
    /// A turret tile overlaps the enemy path.
    #[error("turret tile ({column}, {row}) overlaps the path")]
    TurretTileOnPath {
        /// Column of the offending tile.
        column: u32,
        /// Row of the offending tile.
        row: u32,
    },
    /// A tower profile has a non-positive range or interval.
    #[error("tower profile for {kind:?} must have positive range and interval")]
    InvalidTowerProfile {
        /// Kind whose profile is invalid.
        kind: TowerKind,
    },
}

/// Everything required to build a [`World`].
#[derive(Clone, Debug)]
pub struct WorldConfig {
    /// Number of hex columns.
    pub grid_columns: u32,
    /// Number of hex rows.
    pub grid_rows: u32,
    /// Spacing of hex tiles in world units.
    pub layout: HexLayout,
    /// Tiles enemies walk, from spawn to objective.
    pub path: Vec<HexCell>,
    /// Tiles that accept towers.
    pub turret_tiles: Vec<HexCell>,
    /// Maximum number of enemies in play, dying ones included.
    pub arena_capacity: usize,
    /// Coins the player starts with.
    pub starting_coins: f32,
    /// Lives the player starts with.
    pub starting_lives: u32,
    /// Enemy templates addressed by [`ArchetypeId`] index.
    pub archetypes: Vec<EnemyArchetype>,
    /// Tower profiles used on placement.
    pub tower_catalog: TowerCatalog,
}

/// Represents the authoritative Tempo Defence world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    grid: HexGrid,
    path: Path,
    arena: EnemyArena,
    roster: CombatRoster,
    ledger: PlayerLedger,
    towers: TowerRegistry,
    catalog: TowerCatalog,
    archetypes: Vec<EnemyArchetype>,
    paused: bool,
    stopped: bool,
    tick_index: u64,
}

impl World {
    /// Builds a world, failing fast on malformed configuration.
    pub fn new(config: WorldConfig) -> Result<Self, WorldError> {
        if config.grid_columns == 0 || config.grid_rows == 0 {
            return Err(WorldError::EmptyGrid);
        }
        if config.arena_capacity == 0 {
            return Err(WorldError::ZeroArenaCapacity);
        }
        if let Some(archetype) = config.archetypes.iter().find(|archetype| !archetype.is_valid()) {
            return Err(WorldError::InvalidArchetype {
                name: archetype.name.clone(),
            });
        }
        if let Some(kind) = config.tower_catalog.invalid_kinds().first() {
            return Err(WorldError::InvalidTowerProfile { kind: *kind });
        }

        let mut grid = HexGrid::new(config.grid_columns, config.grid_rows, config.layout);
        let path = Path::from_cells(&grid, &config.path)?;
        for cell in &config.path {
            let _ = grid.set_state(*cell, TileState::Path);
        }
        for cell in &config.turret_tiles {
            match grid.state(*cell) {
                None => {
                    return Err(WorldError::TurretTileOutOfBounds {
                        column: cell.column(),
                        row: cell.row(),
                    })
                }
                Some(TileState::Path) => {
                    return Err(WorldError::TurretTileOnPath {
                        column: cell.column(),
                        row: cell.row(),
                    })
                }
                Some(_) => {
                    let _ = grid.set_state(*cell, TileState::TurretSpawn);
                }
            }
        }

        info!(
            columns = config.grid_columns,
            rows = config.grid_rows,
            waypoints = path.len(),
            arena_capacity = config.arena_capacity,
            "world configured"
        );

        Ok(Self {
            banner: WELCOME_BANNER,
            grid,
            path,
            arena: EnemyArena::with_capacity(config.arena_capacity),
            roster: CombatRoster::new(),
            ledger: PlayerLedger::new(config.starting_coins, config.starting_lives),
            towers: TowerRegistry::new(),
            catalog: config.tower_catalog,
            archetypes: config.archetypes,
            paused: false,
            stopped: false,
            tick_index: 0,
        })
    }

    /// Discards every enemy, including pending death sequences, without
    /// rewards, penalties, or events.
    pub fn discard_enemies(&mut self) {
        self.roster.clear();
        self.arena.clear();
    }

    fn spawn_enemy(&mut self, archetype_id: ArchetypeId, out_events: &mut Vec<Event>) {
        if self.stopped {
            out_events.push(Event::SpawnRejected {
                archetype: archetype_id,
                reason: SpawnError::GameStopped,
            });
            return;
        }

        let Some(archetype) = usize::try_from(archetype_id.get())
            .ok()
            .and_then(|index| self.archetypes.get(index))
        else {
            out_events.push(Event::SpawnRejected {
                archetype: archetype_id,
                reason: SpawnError::UnknownArchetype,
            });
            return;
        };

        let path = &self.path;
        let Some(enemy) = self
            .arena
            .insert(|id| EnemyUnit::spawn(id, archetype_id, archetype, path))
        else {
            debug!(archetype = %archetype.name, "spawn rejected, arena full");
            out_events.push(Event::SpawnRejected {
                archetype: archetype_id,
                reason: SpawnError::ArenaFull,
            });
            return;
        };

        self.roster.register(enemy);
        debug!(?enemy, archetype = %archetype.name, "enemy spawned");
        out_events.push(Event::EnemySpawned {
            enemy,
            archetype: archetype_id,
            position: self.path.start(),
        });
    }

    fn strike(&mut self, tower_id: TowerId, enemy: EnemyId, out_events: &mut Vec<Event>) {
        let Some(tower) = self.towers.get(tower_id) else {
            return;
        };
        if !tower.is_armed() {
            return;
        }
        let (kind, position, profile) = (tower.kind, tower.position, tower.profile);

        let path = &self.path;
        let Some(unit) = self.arena.get_mut(enemy) else {
            return;
        };
        if !unit.is_alive() || position.distance(unit.tracker().position(path)) > profile.attack_range
        {
            trace!(tower = ?tower_id, ?enemy, "strike on invalid target ignored");
            return;
        }

        let outcome = unit.take_damage(profile.attack_damage);
        let remaining = unit.health();
        match outcome {
            DamageOutcome::Ignored => {}
            DamageOutcome::Wounded { .. } | DamageOutcome::Killed => {
                out_events.push(Event::EnemyDamaged {
                    enemy,
                    tower: tower_id,
                    source: kind,
                    amount: profile.attack_damage,
                    remaining,
                });
            }
        }

        if outcome == DamageOutcome::Killed {
            self.on_death(enemy, DeathCause::KilledByAttack, out_events);
        }
    }

    fn kill(&mut self, enemy: EnemyId, cause: DeathCause, out_events: &mut Vec<Event>) {
        let began = self
            .arena
            .get_mut(enemy)
            .map_or(false, |unit| unit.begin_death(cause));
        if began {
            self.on_death(enemy, cause, out_events);
        }
    }

    /// Side effects of a death that was just determined.
    fn on_death(&mut self, enemy: EnemyId, cause: DeathCause, out_events: &mut Vec<Event>) {
        self.roster.unregister(enemy);
        out_events.push(Event::EnemyDestroyed { enemy, cause });

        if cause.grants_reward() {
            let reward = self.arena.get(enemy).map_or(0.0, EnemyUnit::coin_reward);
            self.ledger.grant_coins(reward);
            info!(?enemy, reward, "enemy killed");
            out_events.push(Event::CoinsChanged {
                total: self.ledger.coins(),
            });
        }

        match cause {
            DeathCause::KilledByAttack => {}
            DeathCause::ReachedObjective => {
                self.ledger.lose_lives(OBJECTIVE_LIFE_COST);
                info!(?enemy, lives = self.ledger.lives(), "enemy reached the objective");
                out_events.push(Event::LivesChanged {
                    remaining: self.ledger.lives(),
                });
                if self.arena.release(enemy).is_some() {
                    out_events.push(Event::EnemyRemoved { enemy });
                }
            }
            DeathCause::GameStopped => {
                debug!(?enemy, "enemy retired by game stop");
            }
        }
    }

    fn advance_death_sequences(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let finished: Vec<EnemyId> = self
            .arena
            .iter_mut()
            .filter(|unit| !unit.is_alive())
            .filter_map(|unit| unit.advance_death(dt).then(|| unit.id()))
            .collect();

        for enemy in finished {
            if self.arena.release(enemy).is_some() {
                trace!(?enemy, "enemy returned to arena");
                out_events.push(Event::EnemyRemoved { enemy });
            }
        }
    }

    fn advance_enemies(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let members = self.roster.members().to_vec();
        let mut arrived = Vec::new();

        for enemy in members {
            let Some(unit) = self.arena.get_mut(enemy) else {
                continue;
            };
            if let Some(advance) = unit.walk(dt) {
                for waypoint_index in advance.reached() {
                    out_events.push(Event::WaypointReached {
                        enemy,
                        waypoint_index,
                    });
                }
            }
            if unit.reached_objective() {
                arrived.push(enemy);
            }
        }

        for enemy in arrived {
            self.kill(enemy, DeathCause::ReachedObjective, out_events);
        }
    }

    fn place_tower(
        &mut self,
        kind: TowerKind,
        tile: HexCell,
        policy: TargetPolicy,
        out_events: &mut Vec<Event>,
    ) {
        let rejection = match self.grid.state(tile) {
            None => Some(PlacementError::OutOfBounds),
            Some(TileState::TurretSpawn) if self.towers.occupant(tile).is_some() => {
                Some(PlacementError::Occupied)
            }
            Some(TileState::TurretSpawn) => None,
            Some(_) => Some(PlacementError::NotBuildable),
        };

        let profile = self.catalog.profile(kind);
        let rejection = rejection.or_else(|| {
            (!self.ledger.spend_coins(profile.buy_cost)).then_some(PlacementError::InsufficientCoins)
        });

        if let Some(reason) = rejection {
            debug!(?kind, ?tile, ?reason, "tower placement rejected");
            out_events.push(Event::TowerPlacementRejected { kind, tile, reason });
            return;
        }

        let position = self.grid.layout().position(tile);
        let tower = self.towers.insert(kind, tile, position, policy, profile);
        info!(?tower, ?kind, ?tile, "tower placed");
        out_events.push(Event::TowerPlaced { tower, kind, tile });
        out_events.push(Event::CoinsChanged {
            total: self.ledger.coins(),
        });
    }

    fn sell_tower(&mut self, tower: TowerId, out_events: &mut Vec<Event>) {
        let Some(state) = self.towers.remove(tower) else {
            out_events.push(Event::TowerRequestRejected {
                tower,
                reason: TowerRequestError::MissingTower,
            });
            return;
        };

        let refund = state.profile.sell_value;
        self.ledger.grant_coins(refund);
        info!(?tower, refund, "tower sold");
        out_events.push(Event::TowerSold { tower, refund });
        out_events.push(Event::CoinsChanged {
            total: self.ledger.coins(),
        });
    }

    fn stop_game(&mut self, out_events: &mut Vec<Event>) {
        if self.stopped {
            return;
        }
        self.stopped = true;
        info!(enemies = self.roster.len(), "game stopped");
        out_events.push(Event::GameStopped);

        for enemy in self.roster.members().to_vec() {
            self.kill(enemy, DeathCause::GameStopped, out_events);
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => {
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced { dt });

            world.towers.advance_arming(dt);
            world.advance_death_sequences(dt, out_events);
            if !world.paused {
                world.advance_enemies(dt, out_events);
            }
        }
        Command::SetPaused { paused } => {
            if world.paused != paused {
                world.paused = paused;
                debug!(paused, "pause toggled");
                out_events.push(Event::PauseChanged { paused });
            }
        }
        Command::SpawnEnemy { archetype } => world.spawn_enemy(archetype, out_events),
        Command::Strike { tower, enemy } => world.strike(tower, enemy, out_events),
        Command::PlaceTower { kind, tile, policy } => {
            world.place_tower(kind, tile, policy, out_events);
        }
        Command::SellTower { tower } => world.sell_tower(tower, out_events),
        Command::SetTargetPolicy { tower, policy } => match world.towers.get_mut(tower) {
            Some(state) => {
                state.policy = policy;
                out_events.push(Event::TargetPolicyChanged { tower, policy });
            }
            None => out_events.push(Event::TowerRequestRejected {
                tower,
                reason: TowerRequestError::MissingTower,
            }),
        },
        Command::SetMaxHealth { enemy, max_health } => {
            if let Some(unit) = world.arena.get_mut(enemy) {
                let _ = unit.set_max_health(max_health);
            }
        }
        Command::RestoreHealth { enemy } => {
            if let Some(unit) = world.arena.get_mut(enemy) {
                let _ = unit.restore_health();
            }
        }
        Command::StopGame => world.stop_game(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use tempo_defence_core::{
        ArchetypeId, EnemyId, EnemySnapshot, EnemyView, TowerId, TowerSnapshot, TowerView,
        WorldPoint,
    };

    use super::World;
    use crate::{enemy::EnemyArchetype, hex::HexGrid, path::Path};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the hex grid.
    #[must_use]
    pub fn grid(world: &World) -> &HexGrid {
        &world.grid
    }

    /// Provides read-only access to the enemy path.
    #[must_use]
    pub fn path(world: &World) -> &Path {
        &world.path
    }

    /// Reports whether the global pause flag is set.
    #[must_use]
    pub fn is_paused(world: &World) -> bool {
        world.paused
    }

    /// Reports whether the game was stopped.
    #[must_use]
    pub fn is_stopped(world: &World) -> bool {
        world.stopped
    }

    /// Number of ticks processed so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Player's coin total.
    #[must_use]
    pub fn coins(world: &World) -> f32 {
        world.ledger.coins()
    }

    /// Player's remaining lives.
    #[must_use]
    pub fn lives(world: &World) -> u32 {
        world.ledger.lives()
    }

    /// Snapshot of a single enemy, dying ones included.
    #[must_use]
    pub fn enemy(world: &World, enemy: EnemyId) -> Option<EnemySnapshot> {
        world
            .arena
            .get(enemy)
            .map(|unit| unit.snapshot(&world.path))
    }

    /// Living enemies in roster insertion order.
    #[must_use]
    pub fn roster_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(
            world
                .roster
                .members()
                .iter()
                .filter_map(|id| world.arena.get(*id))
                .map(|unit| unit.snapshot(&world.path))
                .collect(),
        )
    }

    /// Living enemies within `radius` of `center`, in roster insertion order.
    #[must_use]
    pub fn enemies_within_range(world: &World, center: WorldPoint, radius: f32) -> Vec<EnemySnapshot> {
        world
            .roster
            .query_within_range(center, radius, &world.arena, &world.path)
    }

    /// Number of occupied arena slots, dying enemies included.
    #[must_use]
    pub fn occupied_slots(world: &World) -> usize {
        world.arena.len()
    }

    /// Captures a read-only view of every tower in identifier order.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        TowerView::from_snapshots(world.towers.iter().map(|tower| tower.snapshot()).collect())
    }

    /// Snapshot of a single tower.
    #[must_use]
    pub fn tower(world: &World, tower: TowerId) -> Option<TowerSnapshot> {
        world.towers.get(tower).map(|state| state.snapshot())
    }

    /// Enemy template addressed by `archetype`.
    #[must_use]
    pub fn archetype(world: &World, archetype: ArchetypeId) -> Option<&EnemyArchetype> {
        usize::try_from(archetype.get())
            .ok()
            .and_then(|index| world.archetypes.get(index))
    }

    /// Number of enemy templates.
    #[must_use]
    pub fn archetype_count(world: &World) -> usize {
        world.archetypes.len()
    }
}
