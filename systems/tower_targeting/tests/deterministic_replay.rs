use std::time::Duration;

use tempo_defence_core::{
    ArchetypeId, Command, EnemyId, Event, HexCell, TargetPolicy, TowerKind, TowerProfile,
};
use tempo_defence_system_tower_targeting::TowerTargeting;
use tempo_defence_world::{
    self as world,
    enemy::EnemyArchetype,
    hex::{HexLayout, OffsetAxis},
    query, TowerCatalog, World, WorldConfig,
};

const FIRST: EnemyId = EnemyId::new(0, 0);
const SECOND: EnemyId = EnemyId::new(1, 0);

#[test]
fn normal_policy_sticks_to_first_acquired_enemy() {
    let outcome = replay(TargetPolicy::Normal);
    assert_eq!(
        outcome.targets,
        vec![
            None,
            Some(FIRST),
            Some(FIRST),
            Some(FIRST),
            Some(FIRST),
            Some(SECOND),
            None,
        ]
    );
}

#[test]
fn closest_policy_switches_to_nearer_enemy() {
    let outcome = replay(TargetPolicy::Closest);
    assert_eq!(
        outcome.targets,
        vec![
            None,
            Some(FIRST),
            Some(FIRST),
            Some(FIRST),
            Some(SECOND),
            Some(SECOND),
            None,
        ]
    );
}

#[test]
fn furthest_policy_breaks_progress_ties_by_acquisition_order() {
    let outcome = replay(TargetPolicy::Furthest);
    assert_eq!(
        outcome.targets,
        vec![
            None,
            Some(FIRST),
            Some(FIRST),
            Some(FIRST),
            Some(FIRST),
            Some(SECOND),
            None,
        ]
    );
}

#[test]
fn deterministic_replay_matches_across_runs() {
    for policy in [
        TargetPolicy::Normal,
        TargetPolicy::Closest,
        TargetPolicy::Furthest,
    ] {
        let first = replay(policy);
        let second = replay(policy);
        assert_eq!(first, second, "replay diverged between runs");
        assert_eq!(first.empty_reports, 2);
    }
}

#[derive(Debug, PartialEq)]
struct ReplayOutcome {
    targets: Vec<Option<EnemyId>>,
    empty_reports: usize,
}

fn replay(policy: TargetPolicy) -> ReplayOutcome {
    let mut world = World::new(world_config()).expect("valid config");
    let mut targeting = TowerTargeting::new();
    let mut outcome = ReplayOutcome {
        targets: Vec::new(),
        empty_reports: 0,
    };

    for command in scripted_commands(policy) {
        let mut events = Vec::new();
        world::apply(&mut world, command, &mut events);

        let tower = query::tower_view(&world)
            .iter()
            .next()
            .copied()
            .expect("tower placement succeeded");
        let candidates =
            query::enemies_within_range(&world, tower.position, tower.profile.attack_range);

        let mut notifications = Vec::new();
        outcome
            .targets
            .push(targeting.acquire(&tower, &candidates, &mut notifications));
        outcome.empty_reports += notifications
            .iter()
            .filter(|event| matches!(event, Event::TargetsEmpty { .. }))
            .count();
    }

    outcome
}

fn scripted_commands(policy: TargetPolicy) -> Vec<Command> {
    let spawn = Command::SpawnEnemy {
        archetype: ArchetypeId::new(0),
    };
    let tick = |millis| Command::Tick {
        dt: Duration::from_millis(millis),
    };

    vec![
        Command::PlaceTower {
            kind: TowerKind::Lead,
            tile: HexCell::new(1, 0),
            policy,
        },
        spawn.clone(),
        tick(500),
        spawn,
        tick(1_000),
        tick(1_000),
        tick(2_000),
    ]
}

fn world_config() -> WorldConfig {
    WorldConfig {
        grid_columns: 8,
        grid_rows: 2,
        layout: HexLayout::new(1.0, 1.0, OffsetAxis::X, 0.0),
        path: (0..8).map(|column| HexCell::new(column, 1)).collect(),
        turret_tiles: vec![HexCell::new(1, 0)],
        arena_capacity: 4,
        starting_coins: 500.0,
        starting_lives: 5,
        archetypes: vec![EnemyArchetype {
            name: "grunt".to_owned(),
            max_health: 30.0,
            move_speed: 1.0,
            coin_reward: 2.0,
            death_duration: Duration::from_millis(300),
        }],
        tower_catalog: TowerCatalog::default().with_profile(
            TowerKind::Lead,
            TowerProfile {
                attack_damage: 10.0,
                attack_range: 1.5,
                attack_interval: Duration::from_secs(1),
                arming_delay: Duration::ZERO,
                buy_cost: 100.0,
                sell_value: 50.0,
            },
        ),
    }
}
