#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Session facade that drives the Wave Defence simulation one tick at a time.
//!
//! [`Simulation`] owns the authoritative world together with the wave
//! director, targeting and combat systems. Each call to [`Simulation::tick`]
//! runs the fixed pipeline: clock, spawns, enemy motion, targeting, firing,
//! projectile resolution and the wave-clear check. Player actions are applied
//! immediately and their events are carried into the next tick report.

mod config;

pub use config::{Difficulty, SessionConfig};
pub use wave_defence_system_wave_director::{WavePhase, WaveProgress};

use wave_defence_core::{
    Command, EconomySnapshot, EnemyView, Event, Gold, Path, ProjectileView, PurchaseError,
    SaleError, TowerId, TowerKind, TowerSnapshot, TowerTarget, TowerView, UpgradeCost,
    UpgradeError, UpgradePath, Vec2,
};
use wave_defence_system_tower_combat::TowerCombat;
use wave_defence_system_tower_targeting::TowerTargeting;
use wave_defence_system_wave_director::WaveDirector;
use wave_defence_world::{self as world, query, World};

/// Outcome of a single simulation tick.
#[derive(Clone, Debug, PartialEq)]
pub struct TickReport {
    /// Every event produced since the previous report, in order.
    pub events: Vec<Event>,
    /// Whether the player has run out of lives.
    pub round_over: bool,
}

/// Read-only summary of the session counters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SessionSnapshot {
    /// Gold, score, lives and time scale.
    pub economy: EconomySnapshot,
    /// Wave number, phase and spawn counters.
    pub wave: WaveProgress,
    /// Ticks processed so far.
    pub tick: u64,
}

impl SessionSnapshot {
    /// Reports whether the round reached its terminal condition.
    #[must_use]
    pub const fn is_round_over(&self) -> bool {
        self.economy.is_round_over()
    }
}

/// Owns a round's world and systems.
#[derive(Debug)]
pub struct Simulation {
    world: World,
    wave_director: WaveDirector,
    targeting: TowerTargeting,
    combat: TowerCombat,
    targets: Vec<TowerTarget>,
    commands: Vec<Command>,
    pending_events: Vec<Event>,
}

impl Simulation {
    /// Creates a session on `path` using the provided configuration.
    #[must_use]
    pub fn new(path: Path, config: &SessionConfig) -> Self {
        let lives = config.effective_lives();
        let mut simulation = Self {
            world: World::new(path, Gold::new(config.starting_gold), lives),
            wave_director: WaveDirector::new(config.wave_config()),
            targeting: TowerTargeting::new(),
            combat: TowerCombat::new(),
            targets: Vec::new(),
            commands: Vec::new(),
            pending_events: Vec::new(),
        };
        tracing::info!(
            gold = config.starting_gold,
            lives,
            difficulty = ?config.difficulty,
            seed = config.seed,
            "session created"
        );
        if config.time_scale != 1.0 {
            simulation.set_time_scale(config.time_scale);
        }
        simulation
    }

    /// Advances the simulation by `dt` unscaled ticks.
    pub fn tick(&mut self, dt: f32) -> TickReport {
        let mut events = std::mem::take(&mut self.pending_events);

        let clock_start = events.len();
        world::apply(&mut self.world, Command::Tick { dt }, &mut events);

        self.commands.clear();
        self.wave_director
            .handle(&events[clock_start..], &mut self.commands);
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut events);
        }

        world::apply(&mut self.world, Command::AdvanceEnemies, &mut events);

        let towers = query::tower_view(&self.world);
        let enemies = query::enemy_view(&self.world);
        self.targeting.handle(&towers, &enemies, &mut self.targets);
        self.combat.handle(&towers, &self.targets, &mut self.commands);
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut events);
        }

        world::apply(&mut self.world, Command::AdvanceProjectiles, &mut events);

        self.wave_director
            .reconcile(query::live_enemy_count(&self.world));

        TickReport {
            events,
            round_over: query::economy(&self.world).is_round_over(),
        }
    }

    /// Buys a tower at `position` unless `is_blocked` refuses the spot.
    pub fn purchase_tower(
        &mut self,
        kind: TowerKind,
        position: Vec2,
        is_blocked: impl Fn(Vec2) -> bool,
    ) -> Result<TowerId, PurchaseError> {
        if is_blocked(position) {
            tracing::warn!(?kind, x = position.x, y = position.y, "tower placement blocked");
            return Err(PurchaseError::Blocked);
        }

        let events = self.submit(Command::PurchaseTower { kind, position });
        events
            .iter()
            .find_map(|event| match event {
                Event::TowerPurchased { tower, .. } => Some(Ok(*tower)),
                Event::TowerPurchaseRejected { reason, .. } => Some(Err(*reason)),
                _ => None,
            })
            .unwrap_or(Err(PurchaseError::RoundOver))
    }

    /// Advances one of a tower's upgrade paths and returns the gold charged.
    pub fn upgrade_tower(
        &mut self,
        tower: TowerId,
        path: UpgradePath,
    ) -> Result<Gold, UpgradeError> {
        let events = self.submit(Command::UpgradeTower { tower, path });
        events
            .iter()
            .find_map(|event| match event {
                Event::TowerUpgraded { cost, .. } => Some(Ok(*cost)),
                Event::TowerUpgradeRejected { reason, .. } => Some(Err(*reason)),
                _ => None,
            })
            .unwrap_or(Err(UpgradeError::UnknownTower))
    }

    /// Sells a tower and returns the refund.
    pub fn sell_tower(&mut self, tower: TowerId) -> Result<Gold, SaleError> {
        let events = self.submit(Command::SellTower { tower });
        events
            .iter()
            .find_map(|event| match event {
                Event::TowerSold { refund, .. } => Some(Ok(*refund)),
                Event::TowerSaleRejected { reason, .. } => Some(Err(*reason)),
                _ => None,
            })
            .unwrap_or(Err(SaleError::UnknownTower))
    }

    /// Changes the time scale. Negative or non-finite values are ignored.
    pub fn set_time_scale(&mut self, multiplier: f32) {
        let _ = self.submit(Command::SetTimeScale { multiplier });
    }

    /// Price of the next level on `path`, or `None` for unknown towers and
    /// paths the tower does not offer.
    #[must_use]
    pub fn get_upgrade_cost(&self, tower: TowerId, path: UpgradePath) -> Option<UpgradeCost> {
        query::upgrade_cost(&self.world, tower, path)
    }

    /// Gold the tower would refund if sold now.
    #[must_use]
    pub fn sell_value(&self, tower: TowerId) -> Option<Gold> {
        query::sell_value(&self.world, tower)
    }

    /// Session counters.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            economy: query::economy(&self.world),
            wave: self.wave_director.progress(),
            tick: query::tick_index(&self.world),
        }
    }

    /// The path enemies follow.
    #[must_use]
    pub fn path(&self) -> &Path {
        query::path(&self.world)
    }

    /// Live enemies in spawn order.
    #[must_use]
    pub fn enemies(&self) -> EnemyView {
        query::enemy_view(&self.world)
    }

    /// Placed towers in purchase order.
    #[must_use]
    pub fn towers(&self) -> TowerView {
        query::tower_view(&self.world)
    }

    /// A single tower, if it exists.
    #[must_use]
    pub fn tower(&self, tower: TowerId) -> Option<TowerSnapshot> {
        query::tower(&self.world, tower)
    }

    /// Projectiles in flight or lingering.
    #[must_use]
    pub fn projectiles(&self) -> ProjectileView {
        query::projectile_view(&self.world)
    }

    /// Applies a player command and queues its events for the next report.
    fn submit(&mut self, command: Command) -> &[Event] {
        let start = self.pending_events.len();
        world::apply(&mut self.world, command, &mut self.pending_events);
        &self.pending_events[start..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simulation(gold: u32) -> Simulation {
        let path = Path::new(vec![Vec2::ZERO, Vec2::new(500.0, 0.0)]).expect("valid path");
        let config = SessionConfig {
            starting_gold: gold,
            ..SessionConfig::default()
        };
        Simulation::new(path, &config)
    }

    #[test]
    fn player_events_are_reported_with_next_tick() {
        let mut simulation = simulation(400);
        let tower = simulation
            .purchase_tower(TowerKind::Basic, Vec2::new(0.0, 30.0), |_| false)
            .expect("purchase succeeds");

        let report = simulation.tick(1.0);

        assert_eq!(
            report.events.first(),
            Some(&Event::TowerPurchased {
                tower,
                kind: TowerKind::Basic,
                cost: Gold::new(100),
            })
        );
        assert!(simulation.tick(1.0).events.iter().all(|event| !matches!(
            event,
            Event::TowerPurchased { .. }
        )));
    }

    #[test]
    fn blocked_position_is_refused_without_charge() {
        let mut simulation = simulation(400);

        let result = simulation.purchase_tower(TowerKind::Basic, Vec2::ZERO, |_| true);

        assert_eq!(result, Err(PurchaseError::Blocked));
        assert_eq!(simulation.snapshot().economy.gold, Gold::new(400));
        assert!(simulation.towers().is_empty());
    }

    #[test]
    fn configured_time_scale_is_applied() {
        let path = Path::new(vec![Vec2::ZERO, Vec2::new(500.0, 0.0)]).expect("valid path");
        let config = SessionConfig {
            time_scale: 2.0,
            ..SessionConfig::default()
        };
        let mut simulation = Simulation::new(path, &config);

        let report = simulation.tick(1.0);

        assert!(report.events.contains(&Event::TimeAdvanced { dt: 2.0 }));
        assert_eq!(simulation.snapshot().economy.time_scale, 2.0);
    }

    #[test]
    fn first_tick_spawns_first_enemy() {
        let mut simulation = simulation(0);

        let report = simulation.tick(1.0);

        assert!(report
            .events
            .iter()
            .any(|event| matches!(event, Event::EnemySpawned { .. })));
        let snapshot = simulation.snapshot();
        assert_eq!(snapshot.wave.wave_number, 1);
        assert_eq!(snapshot.wave.enemies_spawned, 1);
        assert_eq!(snapshot.wave.enemies_to_spawn, 7);
        assert_eq!(snapshot.tick, 1);
        assert_eq!(simulation.enemies().len(), 1);
    }
}
