#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system responsible for emitting enemy spawn commands.

use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tempo_defence_core::{ArchetypeId, Command, Event};

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    spawn_interval: Duration,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided spawn cadence and seed.
    #[must_use]
    pub const fn new(spawn_interval: Duration, rng_seed: u64) -> Self {
        Self {
            spawn_interval,
            rng_seed,
        }
    }

    /// Time between two consecutive spawns.
    #[must_use]
    pub const fn spawn_interval(&self) -> Duration {
        self.spawn_interval
    }
}

/// Pure system that deterministically emits spawn commands while the game runs.
#[derive(Debug)]
pub struct Spawning {
    spawn_interval: Duration,
    accumulator: Duration,
    rng: ChaCha8Rng,
    stopped: bool,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            spawn_interval: config.spawn_interval,
            accumulator: Duration::ZERO,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            stopped: false,
        }
    }

    /// Consumes world events to emit spawn commands.
    ///
    /// Elapsed time is ignored while `paused`, so the cadence resumes exactly
    /// where it left off. A `GameStopped` event silences the system for good.
    pub fn handle(
        &mut self,
        events: &[Event],
        paused: bool,
        archetype_count: usize,
        out: &mut Vec<Command>,
    ) {
        if events.iter().any(|event| matches!(event, Event::GameStopped)) {
            self.stopped = true;
            self.accumulator = Duration::ZERO;
        }

        if self.stopped || paused || self.spawn_interval.is_zero() || archetype_count == 0 {
            return;
        }

        let accumulated = events
            .iter()
            .filter_map(|event| match event {
                Event::TimeAdvanced { dt } => Some(*dt),
                _ => None,
            })
            .fold(Duration::ZERO, Duration::saturating_add);

        if accumulated.is_zero() {
            return;
        }

        self.accumulator = self.accumulator.saturating_add(accumulated);
        for _ in 0..self.resolve_spawn_attempts() {
            let archetype = self.select_archetype(archetype_count);
            out.push(Command::SpawnEnemy { archetype });
        }
    }

    fn resolve_spawn_attempts(&mut self) -> usize {
        if self.spawn_interval.is_zero() {
            return 0;
        }

        let mut attempts = 0;
        while self.accumulator >= self.spawn_interval {
            self.accumulator -= self.spawn_interval;
            attempts += 1;
        }
        attempts
    }

    fn select_archetype(&mut self, archetype_count: usize) -> ArchetypeId {
        let index = self.rng.gen_range(0..archetype_count);
        ArchetypeId::new(u32::try_from(index).unwrap_or(u32::MAX))
    }
}
