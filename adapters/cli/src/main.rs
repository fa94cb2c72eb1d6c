#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a Tempo Defence scenario headlessly.

mod scenario;

use std::{cell::RefCell, path::PathBuf, rc::Rc, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use tempo_defence_core::{Command, DeathCause, Event, PlacementError};
use tempo_defence_simulation::{NotificationBus, Simulation};
use tempo_defence_world::query;
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::scenario::Scenario;

/// Command-line arguments accepted by the headless runner.
#[derive(Debug, Parser)]
#[command(name = "tempo-defence", about = "Runs a Tempo Defence scenario headlessly")]
struct Args {
    /// Scenario file to load.
    #[arg(long, default_value = "scenarios/default.toml")]
    scenario: PathBuf,
    /// Number of ticks to simulate.
    #[arg(long, default_value_t = 1_200)]
    ticks: u32,
    /// Simulated milliseconds per tick.
    #[arg(long, default_value_t = 50)]
    dt_ms: u64,
    /// Overrides the scenario's spawn seed.
    #[arg(long)]
    seed: Option<u64>,
    /// Tracing filter directive; falls back to `RUST_LOG`, then `info`.
    #[arg(long)]
    log_filter: Option<String>,
}

/// Counters collected from the notification bus.
#[derive(Debug, Default)]
struct RunSummary {
    spawned: u32,
    killed: u32,
    escaped: u32,
    rejected_placements: u32,
}

impl RunSummary {
    fn record(&mut self, event: &Event) {
        match event {
            Event::EnemySpawned { .. } => self.spawned += 1,
            Event::EnemyDestroyed {
                cause: DeathCause::KilledByAttack,
                ..
            } => self.killed += 1,
            Event::EnemyDestroyed {
                cause: DeathCause::ReachedObjective,
                ..
            } => self.escaped += 1,
            Event::TowerPlacementRejected { kind, tile, reason } => {
                self.rejected_placements += 1;
                if *reason == PlacementError::InsufficientCoins {
                    warn!(?kind, ?tile, "scenario cannot afford opening tower");
                }
            }
            _ => {}
        }
    }
}

fn init_logging(filter: Option<&str>) -> Result<()> {
    let filter = match filter {
        Some(directive) => EnvFilter::try_new(directive)
            .with_context(|| format!("invalid log filter `{directive}`"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init()
        .context("failed to install tracing subscriber")
}

/// Entry point for the Tempo Defence command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_filter.as_deref())?;

    let scenario = Scenario::load(&args.scenario)?;
    let config = scenario.simulation_config(args.seed)?;

    let summary = Rc::new(RefCell::new(RunSummary::default()));
    let mut bus = NotificationBus::new();
    let sink = Rc::clone(&summary);
    let _ = bus.subscribe(move |event| sink.borrow_mut().record(event));

    let mut simulation =
        Simulation::init(config, bus).context("scenario describes an invalid world")?;
    println!("{}", query::welcome_banner(simulation.world()));

    for command in scenario.opening_commands() {
        simulation.apply(command);
    }

    let dt = Duration::from_millis(args.dt_ms);
    for _ in 0..args.ticks {
        simulation.tick(dt);
        if query::lives(simulation.world()) == 0 && !query::is_stopped(simulation.world()) {
            info!(tick = query::tick_index(simulation.world()), "no lives left");
            simulation.apply(Command::StopGame);
        }
    }

    let coins = query::coins(simulation.world());
    let lives = query::lives(simulation.world());
    let survivors = query::roster_view(simulation.world());
    for enemy in survivors.iter() {
        debug!(
            enemy = ?enemy.id,
            health = enemy.health,
            waypoint = enemy.waypoint_index,
            "enemy still on the path"
        );
    }
    simulation.shutdown();

    let summary = summary.borrow();
    println!(
        "spawned {} | killed {} | escaped {} | on path {} | rejected placements {} | coins {coins:.1} | lives {lives}",
        summary.spawned,
        summary.killed,
        summary.escaped,
        survivors.len(),
        summary.rejected_placements,
    );
    Ok(())
}
