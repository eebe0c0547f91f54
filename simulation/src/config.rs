//! Session configuration loaded by adapters.

use serde::{Deserialize, Serialize};
use wave_defence_core::Gold;
use wave_defence_system_wave_director::Config as WaveConfig;

/// Difficulty preset chosen before a round starts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// More lives and weaker enemies.
    Easy,
    /// Stock values.
    #[default]
    Medium,
    /// Fewer lives and tougher enemies.
    Hard,
}

impl Difficulty {
    /// Multiplier applied to the configured starting lives.
    #[must_use]
    pub const fn lives_multiplier(self) -> f32 {
        match self {
            Self::Easy => 1.5,
            Self::Medium => 1.0,
            Self::Hard => 0.5,
        }
    }

    /// Multiplier applied to every spawned enemy's health.
    #[must_use]
    pub const fn health_multiplier(self) -> f32 {
        match self {
            Self::Easy => 0.8,
            Self::Medium => 1.0,
            Self::Hard => 1.3,
        }
    }
}

/// Parameters for a single round.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Gold available before the first purchase.
    #[serde(default = "default_gold")]
    pub starting_gold: u32,
    /// Lives before the difficulty preset is applied.
    #[serde(default = "default_lives")]
    pub starting_lives: u32,
    /// Initial multiplier applied to tick deltas.
    #[serde(default = "default_time_scale")]
    pub time_scale: f32,
    /// Difficulty preset.
    #[serde(default)]
    pub difficulty: Difficulty,
    /// Seed for the weighted enemy choice.
    #[serde(default)]
    pub seed: u64,
    /// Ticks between spawns within a wave.
    #[serde(default = "default_spawn_interval")]
    pub spawn_interval_ticks: f32,
    /// Ticks between a cleared wave and the next.
    #[serde(default = "default_intermission")]
    pub intermission_ticks: f32,
    /// Gold paid when each wave after the first starts.
    #[serde(default = "default_wave_bonus")]
    pub wave_bonus: u32,
}

fn default_gold() -> u32 {
    400
}

fn default_lives() -> u32 {
    20
}

fn default_time_scale() -> f32 {
    1.0
}

fn default_spawn_interval() -> f32 {
    120.0
}

fn default_intermission() -> f32 {
    300.0
}

fn default_wave_bonus() -> u32 {
    50
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            starting_gold: default_gold(),
            starting_lives: default_lives(),
            time_scale: default_time_scale(),
            difficulty: Difficulty::default(),
            seed: 0,
            spawn_interval_ticks: default_spawn_interval(),
            intermission_ticks: default_intermission(),
            wave_bonus: default_wave_bonus(),
        }
    }
}

impl SessionConfig {
    /// Starting lives after the difficulty preset, never below one.
    #[must_use]
    pub fn effective_lives(&self) -> u32 {
        let scaled = self.starting_lives as f32 * self.difficulty.lives_multiplier();
        (scaled.round() as u32).max(1)
    }

    /// Wave director configuration derived from the session settings.
    #[must_use]
    pub fn wave_config(&self) -> WaveConfig {
        WaveConfig::new(self.seed)
            .with_spawn_interval(self.spawn_interval_ticks)
            .with_intermission(self.intermission_ticks)
            .with_wave_bonus(Gold::new(self.wave_bonus))
            .with_health_multiplier(self.difficulty.health_multiplier())
    }
}
