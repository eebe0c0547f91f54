#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Wave Defence.
//!
//! The world owns the enemy roster, the tower registry, the projectile roster
//! and the economy. Every mutation flows through [`apply`]; read access goes
//! through the [`query`] module.

mod economy;
mod enemies;
mod projectiles;
mod towers;

use wave_defence_core::{
    Command, EnemyId, EnemyKind, EnemyState, EnemyStats, Event, Gold, Path, ProjectileId,
    PurchaseError, SaleError, TowerId, TowerKind, UpgradeCost, UpgradeError, UpgradePath, Vec2,
};

use crate::{
    economy::Economy,
    enemies::Enemy,
    projectiles::{Flight, Projectile},
    towers::TowerRegistry,
};

/// Represents the authoritative Wave Defence world state.
#[derive(Debug)]
pub struct World {
    path: Path,
    enemies: Vec<Enemy>,
    towers: TowerRegistry,
    projectiles: Vec<Projectile>,
    economy: Economy,
    time_scale: f32,
    tick_dt: f32,
    tick_index: u64,
    next_enemy_id: u32,
    next_projectile_id: u32,
}

impl World {
    /// Creates a world for a single round on the provided path.
    #[must_use]
    pub fn new(path: Path, starting_gold: Gold, starting_lives: u32) -> Self {
        Self {
            path,
            enemies: Vec::new(),
            towers: TowerRegistry::new(),
            projectiles: Vec::new(),
            economy: Economy::new(starting_gold, starting_lives),
            time_scale: 1.0,
            tick_dt: 0.0,
            tick_index: 0,
            next_enemy_id: 0,
            next_projectile_id: 0,
        }
    }

    fn spawn_enemy(&mut self, kind: EnemyKind, stats: EnemyStats, out_events: &mut Vec<Event>) {
        let id = EnemyId::new(self.next_enemy_id);
        self.next_enemy_id = self.next_enemy_id.saturating_add(1);
        self.enemies.push(Enemy::spawn(id, kind, stats, &self.path));
        tracing::debug!(enemy = id.get(), ?kind, health = stats.max_health, "enemy spawned");
        out_events.push(Event::EnemySpawned { enemy: id, kind });
    }

    fn advance_enemies(&mut self, out_events: &mut Vec<Event>) {
        let dt = self.tick_dt;
        for enemy in self.enemies.iter_mut() {
            let _ = enemy.advance(&self.path, dt);
        }
        self.settle_casualties(out_events);
    }

    fn fire_projectile(&mut self, tower_id: TowerId, target: EnemyId, out_events: &mut Vec<Event>) {
        let target_alive = self
            .enemies
            .binary_search_by_key(&target, |enemy| enemy.id)
            .is_ok_and(|index| self.enemies[index].is_alive());
        if !target_alive {
            tracing::debug!(
                tower = tower_id.get(),
                enemy = target.get(),
                "fire request for absent target"
            );
            return;
        }

        let Some(tower) = self.towers.get_mut(tower_id) else {
            tracing::warn!(tower = tower_id.get(), "fire request for unknown tower");
            return;
        };
        if !tower.is_ready() {
            return;
        }

        let payload = tower.fire();
        let id = ProjectileId::new(self.next_projectile_id);
        self.next_projectile_id = self.next_projectile_id.saturating_add(1);
        self.projectiles
            .push(Projectile::launch(
                id,
                tower_id,
                target,
                tower.position,
                payload,
            ));
        tracing::debug!(
            projectile = id.get(),
            tower = tower_id.get(),
            enemy = target.get(),
            "projectile fired"
        );
        out_events.push(Event::ProjectileFired {
            projectile: id,
            tower: tower_id,
            target,
        });
    }

    fn advance_projectiles(&mut self, out_events: &mut Vec<Event>) {
        let dt = self.tick_dt;
        for projectile in self.projectiles.iter_mut() {
            match projectile.advance(dt, &mut self.enemies) {
                Flight::Impacted { hits } => out_events.push(Event::ProjectileImpacted {
                    projectile: projectile.id,
                    hits,
                }),
                Flight::Fizzled => out_events.push(Event::ProjectileFizzled {
                    projectile: projectile.id,
                }),
                Flight::InFlight | Flight::Spent => {}
            }
        }
        self.projectiles.retain(|projectile| !projectile.is_finished());
        self.settle_casualties(out_events);
    }

    /// Pays out kills, charges leaks and compacts the roster. Runs after
    /// every roster-wide update so no enemy is skipped or settled twice.
    fn settle_casualties(&mut self, out_events: &mut Vec<Event>) {
        for enemy in &self.enemies {
            match enemy.state {
                EnemyState::Alive => {}
                EnemyState::Killed => {
                    self.economy.record_kill(enemy.reward, enemy.points);
                    tracing::debug!(
                        enemy = enemy.id.get(),
                        reward = enemy.reward.get(),
                        "enemy killed"
                    );
                    out_events.push(Event::EnemyKilled {
                        enemy: enemy.id,
                        reward: enemy.reward,
                        points: enemy.points,
                    });
                }
                EnemyState::Leaked => {
                    let lives_remaining = self.economy.record_leak();
                    tracing::debug!(enemy = enemy.id.get(), lives_remaining, "enemy leaked");
                    out_events.push(Event::EnemyLeaked {
                        enemy: enemy.id,
                        lives_remaining,
                    });
                }
            }
        }
        self.enemies.retain(Enemy::is_alive);

        if self.economy.mark_round_lost() {
            tracing::info!(score = self.economy.score, "round lost");
            out_events.push(Event::RoundLost);
        }
    }

    fn purchase_tower(
        &mut self,
        kind: TowerKind,
        position: Vec2,
    ) -> Result<TowerId, PurchaseError> {
        if self.economy.is_depleted() {
            return Err(PurchaseError::RoundOver);
        }

        let cost = kind.placement_cost();
        self.economy
            .try_spend(cost)
            .map_err(|available| PurchaseError::InsufficientGold {
                required: cost,
                available,
            })?;
        Ok(self.towers.insert(kind, position))
    }

    fn upgrade_tower(
        &mut self,
        tower_id: TowerId,
        path: UpgradePath,
    ) -> Result<(u8, Gold), UpgradeError> {
        let tower = self
            .towers
            .get_mut(tower_id)
            .ok_or(UpgradeError::UnknownTower)?;

        let cost = match tower.upgrade_cost(path) {
            None => return Err(UpgradeError::UnsupportedPath),
            Some(UpgradeCost::Max) => return Err(UpgradeError::MaxLevel),
            Some(UpgradeCost::Locked) => return Err(UpgradeError::Locked),
            Some(UpgradeCost::Available(cost)) => cost,
        };
        if self.economy.gold < cost {
            return Err(UpgradeError::InsufficientGold {
                required: cost,
                available: self.economy.gold,
            });
        }

        let charged = tower.upgrade(path)?;
        let level = tower.level(path).unwrap_or(1);
        self.economy
            .try_spend(charged)
            .map_err(|available| UpgradeError::InsufficientGold {
                required: charged,
                available,
            })?;
        Ok((level, charged))
    }

    fn sell_tower(&mut self, tower_id: TowerId) -> Result<Gold, SaleError> {
        let tower = self.towers.remove(tower_id).ok_or(SaleError::UnknownTower)?;
        let refund = tower.sell_value();
        self.economy.credit(refund);
        Ok(refund)
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => {
            let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
            world.tick_index = world.tick_index.saturating_add(1);
            world.tick_dt = dt * world.time_scale;
            for tower in world.towers.iter_mut() {
                tower.tick_cooldown(world.tick_dt);
            }
            out_events.push(Event::TimeAdvanced { dt: world.tick_dt });
        }
        Command::SetTimeScale { multiplier } => {
            if !multiplier.is_finite() || multiplier < 0.0 {
                tracing::warn!(multiplier, "ignoring invalid time scale");
                return;
            }
            world.time_scale = multiplier;
            tracing::info!(multiplier, "time scale changed");
            out_events.push(Event::TimeScaleChanged { multiplier });
        }
        Command::SpawnEnemy { kind, stats } => world.spawn_enemy(kind, stats, out_events),
        Command::AdvanceEnemies => world.advance_enemies(out_events),
        Command::FireProjectile { tower, target } => {
            world.fire_projectile(tower, target, out_events);
        }
        Command::AdvanceProjectiles => world.advance_projectiles(out_events),
        Command::PurchaseTower { kind, position } => match world.purchase_tower(kind, position) {
            Ok(tower) => {
                tracing::info!(
                    tower = tower.get(),
                    ?kind,
                    x = position.x,
                    y = position.y,
                    "tower purchased"
                );
                out_events.push(Event::TowerPurchased {
                    tower,
                    kind,
                    cost: kind.placement_cost(),
                });
            }
            Err(reason) => {
                tracing::warn!(?kind, %reason, "tower purchase rejected");
                out_events.push(Event::TowerPurchaseRejected { kind, reason });
            }
        },
        Command::UpgradeTower { tower, path } => match world.upgrade_tower(tower, path) {
            Ok((level, cost)) => {
                tracing::info!(tower = tower.get(), ?path, level, %cost, "tower upgraded");
                out_events.push(Event::TowerUpgraded {
                    tower,
                    path,
                    level,
                    cost,
                });
            }
            Err(reason) => {
                tracing::warn!(tower = tower.get(), ?path, %reason, "tower upgrade rejected");
                out_events.push(Event::TowerUpgradeRejected {
                    tower,
                    path,
                    reason,
                });
            }
        },
        Command::SellTower { tower } => match world.sell_tower(tower) {
            Ok(refund) => {
                tracing::info!(tower = tower.get(), %refund, "tower sold");
                out_events.push(Event::TowerSold { tower, refund });
            }
            Err(reason) => {
                tracing::warn!(tower = tower.get(), %reason, "tower sale rejected");
                out_events.push(Event::TowerSaleRejected { tower, reason });
            }
        },
        Command::AwardWaveBonus { wave, gold } => {
            world.economy.credit(gold);
            tracing::info!(wave, %gold, "wave bonus awarded");
            out_events.push(Event::WaveBonusAwarded { wave, gold });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use wave_defence_core::{
        EconomySnapshot, EnemyView, Gold, Path, ProjectileView, TowerId, TowerSnapshot,
        TowerView, UpgradeCost, UpgradePath,
    };

    /// Provides read-only access to the path enemies follow.
    #[must_use]
    pub fn path(world: &World) -> &Path {
        &world.path
    }

    /// Captures a read-only view of the live enemies.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(
            world
                .enemies
                .iter()
                .map(|enemy| enemy.snapshot())
                .collect(),
        )
    }

    /// Number of enemies still on the path.
    #[must_use]
    pub fn live_enemy_count(world: &World) -> usize {
        world.enemies.len()
    }

    /// Captures a read-only view of every placed tower.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        TowerView::from_snapshots(
            world
                .towers
                .iter()
                .map(|tower| tower.snapshot())
                .collect(),
        )
    }

    /// Captures a single tower, if it exists.
    #[must_use]
    pub fn tower(world: &World, tower: TowerId) -> Option<TowerSnapshot> {
        world.towers.get(tower).map(|state| state.snapshot())
    }

    /// Price of the next level on `path` for the tower, or `None` when the
    /// tower does not exist or does not offer the path.
    #[must_use]
    pub fn upgrade_cost(world: &World, tower: TowerId, path: UpgradePath) -> Option<UpgradeCost> {
        world
            .towers
            .get(tower)
            .and_then(|state| state.upgrade_cost(path))
    }

    /// Gold refunded if the tower were sold now.
    #[must_use]
    pub fn sell_value(world: &World, tower: TowerId) -> Option<Gold> {
        world.towers.get(tower).map(|state| state.sell_value())
    }

    /// Captures a read-only view of projectiles in flight or lingering.
    #[must_use]
    pub fn projectile_view(world: &World) -> ProjectileView {
        ProjectileView::from_snapshots(
            world
                .projectiles
                .iter()
                .map(|projectile| projectile.snapshot())
                .collect(),
        )
    }

    /// Captures the economy counters.
    #[must_use]
    pub fn economy(world: &World) -> EconomySnapshot {
        EconomySnapshot {
            gold: world.economy.gold,
            score: world.economy.score,
            lives: world.economy.lives,
            time_scale: world.time_scale,
        }
    }

    /// Number of ticks processed so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }
}
