//! Scenario files describing the map, economy, enemies and opening towers.

use std::{collections::BTreeSet, fs, path::Path, time::Duration};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tempo_defence_core::{Command, HexCell, TargetPolicy, TowerKind, TowerProfile};
use tempo_defence_simulation::SimulationConfig;
use tempo_defence_system_spawning::Config as SpawningConfig;
use tempo_defence_world::{
    enemy::EnemyArchetype,
    hex::{HexLayout, OffsetAxis},
    TowerCatalog, WorldConfig,
};

const SUPPORTED_SCENARIO_VERSION: u32 = 1;
const DEFAULT_SEED: u64 = 0x7e3f_0d5a_9c21_b486;

/// Parsed scenario file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Scenario {
    version: u32,
    seed: Option<u64>,
    spawn_interval_ms: u64,
    path: Vec<[u32; 2]>,
    turret_tiles: Vec<[u32; 2]>,
    grid: GridSection,
    economy: EconomySection,
    archetypes: Vec<ArchetypeSection>,
    #[serde(default)]
    towers: Vec<TowerSection>,
    #[serde(default)]
    placements: Vec<PlacementSection>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GridSection {
    columns: u32,
    rows: u32,
    tile_offset_x: f32,
    tile_offset_y: f32,
    offset_axis: String,
    off_row_offset: f32,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EconomySection {
    coins: f32,
    lives: u32,
    arena_capacity: usize,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ArchetypeSection {
    name: String,
    max_health: f32,
    move_speed: f32,
    coin_reward: f32,
    death_duration_ms: u64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TowerSection {
    kind: TowerKind,
    attack_damage: f32,
    attack_range: f32,
    attack_interval_ms: u64,
    arming_delay_ms: u64,
    buy_cost: f32,
    sell_value: f32,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PlacementSection {
    kind: TowerKind,
    column: u32,
    row: u32,
    #[serde(default)]
    policy: TargetPolicy,
}

impl Scenario {
    /// Reads and parses the scenario stored at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario at {}", path.display()))?;
        parse_scenario(&contents)
            .with_context(|| format!("invalid scenario at {}", path.display()))
    }

    /// Builds the simulation configuration, preferring `seed_override` to the file's seed.
    pub(crate) fn simulation_config(&self, seed_override: Option<u64>) -> Result<SimulationConfig> {
        let offset_axis = parse_offset_axis(&self.grid.offset_axis)?;

        let mut tower_catalog = TowerCatalog::default();
        for tower in &self.towers {
            tower_catalog = tower_catalog.with_profile(
                tower.kind,
                TowerProfile {
                    attack_damage: tower.attack_damage,
                    attack_range: tower.attack_range,
                    attack_interval: Duration::from_millis(tower.attack_interval_ms),
                    arming_delay: Duration::from_millis(tower.arming_delay_ms),
                    buy_cost: tower.buy_cost,
                    sell_value: tower.sell_value,
                },
            );
        }

        let world = WorldConfig {
            grid_columns: self.grid.columns,
            grid_rows: self.grid.rows,
            layout: HexLayout::new(
                self.grid.tile_offset_x,
                self.grid.tile_offset_y,
                offset_axis,
                self.grid.off_row_offset,
            ),
            path: cells(&self.path),
            turret_tiles: cells(&self.turret_tiles),
            arena_capacity: self.economy.arena_capacity,
            starting_coins: self.economy.coins,
            starting_lives: self.economy.lives,
            archetypes: self
                .archetypes
                .iter()
                .map(|archetype| EnemyArchetype {
                    name: archetype.name.clone(),
                    max_health: archetype.max_health,
                    move_speed: archetype.move_speed,
                    coin_reward: archetype.coin_reward,
                    death_duration: Duration::from_millis(archetype.death_duration_ms),
                })
                .collect(),
            tower_catalog,
        };

        let seed = seed_override.or(self.seed).unwrap_or(DEFAULT_SEED);
        Ok(SimulationConfig {
            world,
            spawning: SpawningConfig::new(Duration::from_millis(self.spawn_interval_ms), seed),
        })
    }

    /// Tower placements applied before the first tick.
    pub(crate) fn opening_commands(&self) -> Vec<Command> {
        self.placements
            .iter()
            .map(|placement| Command::PlaceTower {
                kind: placement.kind,
                tile: HexCell::new(placement.column, placement.row),
                policy: placement.policy,
            })
            .collect()
    }
}

fn parse_scenario(contents: &str) -> Result<Scenario> {
    let scenario: Scenario =
        toml::from_str(contents).context("failed to parse scenario toml contents")?;
    if scenario.version != SUPPORTED_SCENARIO_VERSION {
        bail!(
            "unsupported scenario version {}; expected {}",
            scenario.version,
            SUPPORTED_SCENARIO_VERSION
        );
    }
    if scenario.archetypes.is_empty() {
        bail!("scenario defines no enemy archetypes");
    }

    let mut seen = BTreeSet::new();
    for tower in &scenario.towers {
        if !seen.insert(tower.kind) {
            bail!("scenario contains duplicate tower entry for {:?}", tower.kind);
        }
    }

    Ok(scenario)
}

fn parse_offset_axis(name: &str) -> Result<OffsetAxis> {
    match name {
        "x" | "X" => Ok(OffsetAxis::X),
        "y" | "Y" => Ok(OffsetAxis::Y),
        _ => bail!("unknown offset axis `{name}`"),
    }
}

fn cells(pairs: &[[u32; 2]]) -> Vec<HexCell> {
    pairs
        .iter()
        .map(|[column, row]| HexCell::new(*column, *row))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        version = 1
        spawn_interval_ms = 1000
        path = [[0, 0], [1, 0]]
        turret_tiles = [[0, 1]]

        [grid]
        columns = 2
        rows = 2
        tile_offset_x = 1.0
        tile_offset_y = 0.75
        offset_axis = "y"
        off_row_offset = 0.5

        [economy]
        coins = 10.0
        lives = 3
        arena_capacity = 4

        [[archetypes]]
        name = "grunt"
        max_health = 10.0
        move_speed = 1.0
        coin_reward = 1.0
        death_duration_ms = 250
    "#;

    #[test]
    fn bundled_scenario_parses() {
        let scenario = parse_scenario(include_str!("../../../scenarios/default.toml"))
            .expect("bundled scenario should parse");
        let config = scenario.simulation_config(None).expect("valid config");
        assert!(!config.world.archetypes.is_empty());
        assert!(!scenario.opening_commands().is_empty());
    }

    #[test]
    fn minimal_scenario_maps_into_world_config() {
        let scenario = parse_scenario(MINIMAL).expect("minimal scenario should parse");
        let config = scenario.simulation_config(Some(9)).expect("valid config");

        assert_eq!(config.world.path, vec![HexCell::new(0, 0), HexCell::new(1, 0)]);
        assert_eq!(config.world.turret_tiles, vec![HexCell::new(0, 1)]);
        assert_eq!(
            config.world.archetypes[0].death_duration,
            Duration::from_millis(250)
        );
        assert_eq!(config.spawning.spawn_interval(), Duration::from_secs(1));
        assert_eq!(
            config.world.tower_catalog.profile(TowerKind::Drum),
            TowerKind::Drum.default_profile()
        );
        assert!(scenario.opening_commands().is_empty());
    }

    #[test]
    fn unsupported_version_is_rejected() {
        let contents = MINIMAL.replace("version = 1", "version = 2");
        let error = parse_scenario(&contents).unwrap_err();
        assert!(error.to_string().contains("unsupported scenario version"));
    }

    #[test]
    fn duplicate_tower_overrides_are_rejected() {
        let tower = r#"
            [[towers]]
            kind = "Bass"
            attack_damage = 1.0
            attack_range = 1.0
            attack_interval_ms = 100
            arming_delay_ms = 0
            buy_cost = 1.0
            sell_value = 1.0
        "#;
        let contents = format!("{MINIMAL}{tower}{tower}");
        let error = parse_scenario(&contents).unwrap_err();
        assert!(error.to_string().contains("duplicate tower entry"));
    }

    #[test]
    fn unknown_offset_axis_is_rejected() {
        let contents = MINIMAL.replace(r#"offset_axis = "y""#, r#"offset_axis = "z""#);
        let scenario = parse_scenario(&contents).expect("axis is validated later");
        assert!(scenario.simulation_config(None).is_err());
    }
}
