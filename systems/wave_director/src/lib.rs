#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic wave director responsible for pacing enemy spawns.
//!
//! A wave moves through three phases. While [`WavePhase::Spawning`] the
//! director counts the spawn timer down by the effective tick delta and emits
//! one `SpawnEnemy` command every time it elapses. Once the whole wave has
//! been emitted it waits for the roster to empty, then runs a fixed
//! intermission before starting the next, larger wave and paying the wave
//! bonus.

use rand::{distributions::WeightedIndex, prelude::Distribution, SeedableRng};
use rand_chacha::ChaCha8Rng;
use wave_defence_core::{Command, EnemyKind, Event, Gold};

const DEFAULT_BASE_COUNT: u32 = 5;
const DEFAULT_COUNT_INCREMENT: u32 = 2;
const DEFAULT_SPAWN_INTERVAL_TICKS: f32 = 120.0;
const DEFAULT_INTERMISSION_TICKS: f32 = 300.0;
const DEFAULT_WAVE_BONUS: Gold = Gold::new(50);

/// Configuration parameters required to construct the wave director.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    base_count: u32,
    count_increment: u32,
    spawn_interval_ticks: f32,
    intermission_ticks: f32,
    wave_bonus: Gold,
    health_multiplier: f32,
    rng_seed: u64,
}

impl Config {
    /// Creates a configuration with the stock pacing and the provided seed.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self {
            base_count: DEFAULT_BASE_COUNT,
            count_increment: DEFAULT_COUNT_INCREMENT,
            spawn_interval_ticks: DEFAULT_SPAWN_INTERVAL_TICKS,
            intermission_ticks: DEFAULT_INTERMISSION_TICKS,
            wave_bonus: DEFAULT_WAVE_BONUS,
            health_multiplier: 1.0,
            rng_seed,
        }
    }

    /// Wave size is `base_count + increment × wave_number`.
    #[must_use]
    pub const fn with_wave_size(mut self, base_count: u32, increment: u32) -> Self {
        self.base_count = base_count;
        self.count_increment = increment;
        self
    }

    /// Ticks between consecutive spawns within a wave.
    #[must_use]
    pub const fn with_spawn_interval(mut self, ticks: f32) -> Self {
        self.spawn_interval_ticks = ticks;
        self
    }

    /// Ticks of quiet between a cleared wave and the next one.
    #[must_use]
    pub const fn with_intermission(mut self, ticks: f32) -> Self {
        self.intermission_ticks = ticks;
        self
    }

    /// Gold credited when leaving an intermission.
    #[must_use]
    pub const fn with_wave_bonus(mut self, bonus: Gold) -> Self {
        self.wave_bonus = bonus;
        self
    }

    /// Multiplier applied to every spawned enemy's health.
    #[must_use]
    pub const fn with_health_multiplier(mut self, multiplier: f32) -> Self {
        self.health_multiplier = multiplier;
        self
    }

    /// Number of enemies emitted during `wave`.
    #[must_use]
    pub const fn wave_size(&self, wave: u32) -> u32 {
        self.base_count
            .saturating_add(self.count_increment.saturating_mul(wave))
    }
}

/// Phase of the per-wave state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WavePhase {
    /// Enemies for the current wave are still being emitted.
    Spawning,
    /// Every enemy was emitted and some are still on the path.
    Waiting,
    /// The wave was cleared and the countdown to the next one is running.
    Intermission,
}

/// Read-only wave counters exposed to callers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveProgress {
    /// Wave currently being played, starting at one.
    pub wave_number: u32,
    /// Phase of the current wave.
    pub phase: WavePhase,
    /// Enemies the current wave emits in total.
    pub enemies_to_spawn: u32,
    /// Enemies emitted so far in the current wave.
    pub enemies_spawned: u32,
    /// Ticks until the next spawn.
    pub spawn_timer: f32,
    /// Ticks left in the intermission, zero outside of it.
    pub wave_timer: f32,
}

/// Pure system that emits spawn and wave bonus commands.
#[derive(Debug)]
pub struct WaveDirector {
    config: Config,
    rng: ChaCha8Rng,
    phase: WavePhase,
    wave_number: u32,
    enemies_to_spawn: u32,
    enemies_spawned: u32,
    spawn_timer: f32,
    wave_timer: f32,
}

impl WaveDirector {
    /// Creates a director that starts spawning wave one immediately.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            phase: WavePhase::Spawning,
            wave_number: 1,
            enemies_to_spawn: config.wave_size(1),
            enemies_spawned: 0,
            spawn_timer: 0.0,
            wave_timer: 0.0,
        }
    }

    /// Consumes world events and emits spawn or bonus commands.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        let dt: f32 = events
            .iter()
            .filter_map(|event| match event {
                Event::TimeAdvanced { dt } => Some(*dt),
                _ => None,
            })
            .sum();
        if dt.is_nan() || dt <= 0.0 {
            return;
        }

        match self.phase {
            WavePhase::Spawning => self.emit_spawns(dt, out),
            WavePhase::Waiting => {}
            WavePhase::Intermission => self.count_down_intermission(dt, out),
        }
    }

    /// Re-evaluates the wave-clear condition against the live roster size.
    pub fn reconcile(&mut self, live_enemies: usize) {
        if self.phase == WavePhase::Waiting && live_enemies == 0 {
            self.phase = WavePhase::Intermission;
            self.wave_timer = self.config.intermission_ticks;
            tracing::info!(wave = self.wave_number, "wave cleared");
        }
    }

    /// Current wave counters.
    #[must_use]
    pub fn progress(&self) -> WaveProgress {
        WaveProgress {
            wave_number: self.wave_number,
            phase: self.phase,
            enemies_to_spawn: self.enemies_to_spawn,
            enemies_spawned: self.enemies_spawned,
            spawn_timer: self.spawn_timer.max(0.0),
            wave_timer: self.wave_timer.max(0.0),
        }
    }

    fn emit_spawns(&mut self, dt: f32, out: &mut Vec<Command>) {
        self.spawn_timer -= dt;
        while self.spawn_timer <= 0.0 && self.enemies_spawned < self.enemies_to_spawn {
            let kind = self.select_kind();
            let stats = kind
                .stats_for_wave(self.wave_number)
                .with_health_multiplier(self.config.health_multiplier);
            out.push(Command::SpawnEnemy { kind, stats });
            self.enemies_spawned += 1;
            self.spawn_timer += self.config.spawn_interval_ticks.max(f32::EPSILON);
        }

        if self.enemies_spawned >= self.enemies_to_spawn {
            self.phase = WavePhase::Waiting;
            self.spawn_timer = 0.0;
            tracing::debug!(wave = self.wave_number, "wave fully spawned");
        }
    }

    fn count_down_intermission(&mut self, dt: f32, out: &mut Vec<Command>) {
        self.wave_timer -= dt;
        if self.wave_timer > 0.0 {
            return;
        }

        self.wave_number = self.wave_number.saturating_add(1);
        self.phase = WavePhase::Spawning;
        self.enemies_to_spawn = self.config.wave_size(self.wave_number);
        self.enemies_spawned = 0;
        self.spawn_timer = 0.0;
        self.wave_timer = 0.0;
        tracing::info!(
            wave = self.wave_number,
            enemies = self.enemies_to_spawn,
            "wave started"
        );

        out.push(Command::AwardWaveBonus {
            wave: self.wave_number,
            gold: self.config.wave_bonus,
        });
    }

    fn select_kind(&mut self) -> EnemyKind {
        let weights = EnemyKind::ALL.map(|kind| kind.spawn_weight(self.wave_number));
        match WeightedIndex::new(weights) {
            Ok(distribution) => EnemyKind::ALL[distribution.sample(&mut self.rng)],
            Err(_) => EnemyKind::Grunt,
        }
    }
}
