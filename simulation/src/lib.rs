#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Tick driver that wires the Tempo Defence world to its systems.

mod bus;

use std::time::Duration;

use tempo_defence_core::{Command, Event};
use tempo_defence_system_spawning::{Config as SpawningConfig, Spawning};
use tempo_defence_system_tower_combat::TowerCombat;
use tempo_defence_system_tower_targeting::TowerTargeting;
use tempo_defence_world::{self as world, query, World, WorldConfig, WorldError};
use tracing::{debug, info, trace, warn};

pub use bus::{NotificationBus, SubscriptionId};

/// Everything required to start a simulation.
#[derive(Clone, Debug)]
pub struct SimulationConfig {
    /// World layout, economy and enemy templates.
    pub world: WorldConfig,
    /// Spawn cadence; a zero interval disables automatic spawning.
    pub spawning: SpawningConfig,
}

/// Deterministic single-threaded game loop.
#[derive(Debug)]
pub struct Simulation {
    world: World,
    spawning: Spawning,
    targeting: TowerTargeting,
    combat: TowerCombat,
    bus: NotificationBus,
    events: Vec<Event>,
    commands: Vec<Command>,
    running: bool,
}

impl Simulation {
    /// Builds the world and systems, failing fast on invalid configuration.
    pub fn init(config: SimulationConfig, bus: NotificationBus) -> Result<Self, WorldError> {
        let world = World::new(config.world)?;
        info!(
            banner = query::welcome_banner(&world),
            listeners = bus.listener_count(),
            "simulation initialised"
        );
        Ok(Self {
            world,
            spawning: Spawning::new(config.spawning),
            targeting: TowerTargeting::new(),
            combat: TowerCombat::new(),
            bus,
            events: Vec::new(),
            commands: Vec::new(),
            running: true,
        })
    }

    /// Read-only access to the world for queries.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable access to the notification bus.
    pub fn bus_mut(&mut self) -> &mut NotificationBus {
        &mut self.bus
    }

    /// Reports whether [`Simulation::shutdown`] has not been called yet.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Applies an external command and publishes the resulting events.
    ///
    /// `Command::Strike` is ignored here: strikes are issued only by tower
    /// combat, so every hit is gated by the tower's attack cycle.
    pub fn apply(&mut self, command: Command) {
        if !self.running {
            return;
        }
        if let Command::Strike { tower, enemy } = command {
            warn!(?tower, ?enemy, "ignoring external strike request");
            return;
        }
        self.events.clear();
        self.apply_to_world(command);
        self.notify_spawning();
        self.flush();
    }

    /// Advances the game by `dt`.
    pub fn tick(&mut self, dt: Duration) {
        if !self.running {
            return;
        }
        self.events.clear();

        self.apply_to_world(Command::Tick { dt });
        self.notify_spawning();

        let paused = query::is_paused(&self.world);
        self.combat.advance(dt, paused);

        for tower in query::tower_view(&self.world).into_vec() {
            let candidates =
                query::enemies_within_range(&self.world, tower.position, tower.profile.attack_range);
            let target = self
                .targeting
                .acquire(&tower, &candidates, &mut self.events)
                .and_then(|enemy| query::enemy(&self.world, enemy));

            self.combat
                .engage(&tower, target.as_ref(), &mut self.commands);
            let strikes: Vec<Command> = self.commands.drain(..).collect();
            for strike in strikes {
                self.apply_to_world(strike);
            }
        }

        trace!(
            tick = query::tick_index(&self.world),
            events = self.events.len(),
            enemies = query::roster_view(&self.world).len(),
            "tick processed"
        );
        self.flush();
    }

    /// Stops the loop and discards in-flight enemies without side effects.
    pub fn shutdown(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.world.discard_enemies();
        self.events.clear();
        self.commands.clear();
        info!(tick = query::tick_index(&self.world), "simulation shut down");
    }

    fn apply_to_world(&mut self, command: Command) {
        let start = self.events.len();
        world::apply(&mut self.world, command, &mut self.events);

        for event in &self.events[start..] {
            if let Event::TowerSold { tower, .. } = event {
                debug!(?tower, "dropping tower system state");
                self.targeting.forget(*tower);
                self.combat.forget(*tower);
            }
        }
    }

    /// Lets the spawner observe time and stop events, applying its requests.
    fn notify_spawning(&mut self) {
        self.spawning.handle(
            &self.events,
            query::is_paused(&self.world),
            query::archetype_count(&self.world),
            &mut self.commands,
        );
        let spawns: Vec<Command> = self.commands.drain(..).collect();
        for spawn in spawns {
            self.apply_to_world(spawn);
        }
    }

    fn flush(&mut self) {
        self.bus.publish(&self.events);
    }
}
