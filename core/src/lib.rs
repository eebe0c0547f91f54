#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Wave Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! views, and respond exclusively with new command batches.
//!
//! Per-variant stat tables for towers, enemies and upgrade paths live here so
//! that every crate resolves a kind's numbers from the same source.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use glam::Vec2;

/// Number of simulation ticks that make up one second of game time.
pub const TICKS_PER_SECOND: f32 = 60.0;

/// Distance a projectile travels per tick, measured in world units.
pub const PROJECTILE_SPEED: f32 = 5.0;

/// Ticks an area projectile remains in the roster after detonating.
pub const AREA_LINGER_TICKS: f32 = 15.0;

/// Share of the total investment refunded when a tower is sold.
pub const SELL_REFUND_RATIO: f32 = 0.75;

/// Multiplicative growth applied to an upgrade path's cost per level.
pub const UPGRADE_COST_GROWTH: f32 = 1.8;

/// Lower bound on the derived fire rate of any tower, in ticks.
pub const MIN_FIRE_RATE_TICKS: f32 = 10.0;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided unscaled delta.
    Tick {
        /// Ticks elapsed since the previous update before time scaling.
        dt: f32,
    },
    /// Changes the multiplier applied to every subsequent tick delta.
    SetTimeScale {
        /// New multiplier; must be finite and non-negative.
        multiplier: f32,
    },
    /// Places a new enemy at the start of the path.
    SpawnEnemy {
        /// Archetype of the spawned enemy.
        kind: EnemyKind,
        /// Wave-scaled stats assigned to the enemy.
        stats: EnemyStats,
    },
    /// Advances every live enemy along the path using the current tick delta.
    AdvanceEnemies,
    /// Requests that a tower launch a projectile at the provided enemy.
    FireProjectile {
        /// Tower that fires.
        tower: TowerId,
        /// Enemy the projectile homes toward.
        target: EnemyId,
    },
    /// Advances every projectile and resolves impacts.
    AdvanceProjectiles,
    /// Requests the purchase of a tower at the provided position.
    PurchaseTower {
        /// Type of tower to construct.
        kind: TowerKind,
        /// World position of the tower's centre.
        position: Vec2,
    },
    /// Requests the next level on one of a tower's upgrade paths.
    UpgradeTower {
        /// Tower to upgrade.
        tower: TowerId,
        /// Upgrade path to advance.
        path: UpgradePath,
    },
    /// Requests that a tower be sold for its current sell value.
    SellTower {
        /// Tower to sell.
        tower: TowerId,
    },
    /// Credits the wave completion bonus.
    AwardWaveBonus {
        /// Wave that is starting once the bonus is paid.
        wave: u32,
        /// Amount of gold credited.
        gold: Gold,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Effective delta after applying the time scale.
        dt: f32,
    },
    /// Announces that the time scale multiplier changed.
    TimeScaleChanged {
        /// Multiplier now in effect.
        multiplier: f32,
    },
    /// Confirms that an enemy entered the path.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Archetype of the enemy.
        kind: EnemyKind,
    },
    /// Reports that an enemy was killed and its bounty was paid out.
    EnemyKilled {
        /// Identifier of the enemy that died.
        enemy: EnemyId,
        /// Gold credited for the kill.
        reward: Gold,
        /// Score credited for the kill.
        points: u32,
    },
    /// Reports that an enemy reached the end of the path.
    EnemyLeaked {
        /// Identifier of the enemy that escaped.
        enemy: EnemyId,
        /// Lives remaining after the leak was settled.
        lives_remaining: u32,
    },
    /// Confirms that a tower launched a projectile.
    ProjectileFired {
        /// Identifier assigned to the projectile.
        projectile: ProjectileId,
        /// Tower that fired.
        tower: TowerId,
        /// Enemy the projectile homes toward.
        target: EnemyId,
    },
    /// Reports that a projectile reached its target and resolved its payload.
    ProjectileImpacted {
        /// Identifier of the projectile.
        projectile: ProjectileId,
        /// Number of enemies the payload damaged.
        hits: usize,
    },
    /// Reports that a projectile lost its target and resolved nothing.
    ProjectileFizzled {
        /// Identifier of the projectile.
        projectile: ProjectileId,
    },
    /// Confirms that a tower was purchased.
    TowerPurchased {
        /// Identifier assigned to the tower.
        tower: TowerId,
        /// Type of tower purchased.
        kind: TowerKind,
        /// Gold charged for the purchase.
        cost: Gold,
    },
    /// Reports that a tower purchase was refused.
    TowerPurchaseRejected {
        /// Type of tower requested.
        kind: TowerKind,
        /// Specific reason the purchase failed.
        reason: PurchaseError,
    },
    /// Confirms that a tower upgrade was applied.
    TowerUpgraded {
        /// Tower that was upgraded.
        tower: TowerId,
        /// Path that advanced.
        path: UpgradePath,
        /// Level reached on the path.
        level: u8,
        /// Gold charged for the upgrade.
        cost: Gold,
    },
    /// Reports that a tower upgrade was refused.
    TowerUpgradeRejected {
        /// Tower targeted by the request.
        tower: TowerId,
        /// Path targeted by the request.
        path: UpgradePath,
        /// Specific reason the upgrade failed.
        reason: UpgradeError,
    },
    /// Confirms that a tower was sold and removed.
    TowerSold {
        /// Tower that was sold.
        tower: TowerId,
        /// Gold refunded to the player.
        refund: Gold,
    },
    /// Reports that a tower sale was refused.
    TowerSaleRejected {
        /// Tower targeted by the request.
        tower: TowerId,
        /// Specific reason the sale failed.
        reason: SaleError,
    },
    /// Confirms that the wave completion bonus was credited.
    WaveBonusAwarded {
        /// Wave that starts after the bonus.
        wave: u32,
        /// Gold credited.
        gold: Gold,
    },
    /// Signals that the player ran out of lives. Emitted once per round.
    RoundLost,
}

/// Amount of in-game currency.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Gold(u32);

impl Gold {
    /// No gold at all.
    pub const ZERO: Self = Self(0);

    /// Wraps a raw gold amount.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the raw gold amount.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Adds two amounts, saturating at the numeric bound.
    #[must_use]
    pub const fn saturating_add(self, other: Gold) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Subtracts `other`, returning `None` when the balance would go negative.
    #[must_use]
    pub fn checked_sub(self, other: Gold) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }
}

impl fmt::Display for Gold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}g", self.0)
    }
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Ordered waypoint sequence enemies follow from spawn to exit.
#[derive(Clone, Debug, PartialEq)]
pub struct Path {
    waypoints: Vec<Vec2>,
}

impl Path {
    /// Wraps a waypoint sequence produced by the path generator.
    ///
    /// A path needs a start and an end, so fewer than two waypoints is a
    /// contract violation by the producer and is rejected outright.
    pub fn new(waypoints: Vec<Vec2>) -> Result<Self, PathError> {
        if waypoints.len() < 2 {
            return Err(PathError::TooShort {
                waypoints: waypoints.len(),
            });
        }
        Ok(Self { waypoints })
    }

    /// All waypoints in travel order.
    #[must_use]
    pub fn waypoints(&self) -> &[Vec2] {
        &self.waypoints
    }

    /// Waypoint at the provided index, if any.
    #[must_use]
    pub fn waypoint(&self, index: usize) -> Option<Vec2> {
        self.waypoints.get(index).copied()
    }

    /// Spawn point of the path.
    #[must_use]
    pub fn start(&self) -> Vec2 {
        self.waypoints[0]
    }

    /// Number of waypoints in the path. Always at least two.
    #[must_use]
    pub fn waypoint_count(&self) -> usize {
        self.waypoints.len()
    }

    /// Largest `path_index` an enemy can hold, i.e. the final segment.
    #[must_use]
    pub fn last_segment(&self) -> usize {
        self.waypoints.len() - 2
    }
}

/// Reasons a waypoint sequence is refused.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Hash)]
pub enum PathError {
    /// Fewer than two waypoints were supplied.
    #[error("path requires at least two waypoints, got {waypoints}")]
    TooShort {
        /// Number of waypoints that were supplied.
        waypoints: usize,
    },
}

/// Types of towers that can be purchased.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TowerKind {
    /// Single-target tower with balanced stats.
    Basic,
    /// Slow tower whose shells damage everything near the impact point.
    Bomb,
    /// Tower whose shots ignite the target for a few seconds.
    Fire,
    /// Rapid-fire tower with low damage per shot.
    Minigun,
}

impl TowerKind {
    /// Every purchasable tower kind.
    pub const ALL: [TowerKind; 4] = [Self::Basic, Self::Bomb, Self::Fire, Self::Minigun];

    /// Level-one stats for the tower kind.
    #[must_use]
    pub const fn base_stats(self) -> TowerBaseStats {
        match self {
            Self::Basic => TowerBaseStats {
                range: 100.0,
                damage: 30.0,
                fire_rate_ticks: 60.0,
                cost: Gold::new(100),
                tertiary: TertiaryStat::None,
            },
            Self::Bomb => TowerBaseStats {
                range: 120.0,
                damage: 40.0,
                fire_rate_ticks: 90.0,
                cost: Gold::new(200),
                tertiary: TertiaryStat::AreaRadius(50.0),
            },
            Self::Fire => TowerBaseStats {
                range: 90.0,
                damage: 10.0,
                fire_rate_ticks: 45.0,
                cost: Gold::new(175),
                tertiary: TertiaryStat::BurnSeconds(3.0),
            },
            Self::Minigun => TowerBaseStats {
                range: 110.0,
                damage: 8.0,
                fire_rate_ticks: 15.0,
                cost: Gold::new(250),
                tertiary: TertiaryStat::None,
            },
        }
    }

    /// Gold charged when the tower is placed.
    #[must_use]
    pub const fn placement_cost(self) -> Gold {
        self.base_stats().cost
    }

    /// The three upgrade paths offered by the kind: its type-specific slot
    /// followed by damage and rate.
    #[must_use]
    pub const fn upgrade_paths(self) -> [UpgradePath; 3] {
        let tertiary = match self {
            Self::Basic | Self::Minigun => UpgradePath::Range,
            Self::Bomb => UpgradePath::Area,
            Self::Fire => UpgradePath::Duration,
        };
        [tertiary, UpgradePath::Damage, UpgradePath::Rate]
    }

    /// Whether non-primary paths are capped once a primary path is chosen.
    #[must_use]
    pub const fn caps_secondary_paths(self) -> bool {
        matches!(self, Self::Basic | Self::Minigun)
    }
}

/// Level-one stats shared by every tower of a kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerBaseStats {
    /// Targeting radius in world units.
    pub range: f32,
    /// Damage carried by each projectile.
    pub damage: f32,
    /// Ticks between shots.
    pub fire_rate_ticks: f32,
    /// Placement cost.
    pub cost: Gold,
    /// Type-specific third stat.
    pub tertiary: TertiaryStat,
}

/// Type-specific stat carried by some tower kinds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TertiaryStat {
    /// The kind has no third stat beyond range.
    None,
    /// Blast radius of area payloads, in world units.
    AreaRadius(f32),
    /// Burn duration of damage-over-time payloads, in seconds.
    BurnSeconds(f32),
}

/// Independent upgrade tracks a tower can advance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpgradePath {
    /// Adds targeting range.
    Range,
    /// Adds projectile damage.
    Damage,
    /// Shortens the delay between shots.
    Rate,
    /// Widens the blast radius.
    Area,
    /// Extends the burn duration.
    Duration,
}

impl UpgradePath {
    /// Every upgrade path known to the engine.
    pub const ALL: [UpgradePath; 5] = [
        Self::Range,
        Self::Damage,
        Self::Rate,
        Self::Area,
        Self::Duration,
    ];

    /// Highest level the path can reach.
    #[must_use]
    pub const fn max_level(self) -> u8 {
        match self {
            Self::Range | Self::Damage | Self::Rate => 5,
            Self::Area | Self::Duration => 3,
        }
    }

    /// Cost of the first upgrade on the path. Damage is the priciest track
    /// and rate the cheapest.
    #[must_use]
    pub const fn base_cost(self) -> u32 {
        match self {
            Self::Damage => 60,
            Self::Range | Self::Area | Self::Duration => 50,
            Self::Rate => 40,
        }
    }

    /// Cost of advancing the path from `level` to `level + 1`.
    ///
    /// Computed as `base_cost × 1.8^(level − 1)` and rounded to whole gold.
    #[must_use]
    pub fn cost_at(self, level: u8) -> Gold {
        let exponent = i32::from(level.max(1)) - 1;
        let raw = self.base_cost() as f32 * UPGRADE_COST_GROWTH.powi(exponent);
        Gold::new(raw.round() as u32)
    }
}

/// Result of querying the price of a tower's next upgrade on a path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UpgradeCost {
    /// The upgrade can be bought for the contained price.
    Available(Gold),
    /// The path already sits at its maximum level.
    Max,
    /// The path can never be upgraded again.
    Locked,
}

impl UpgradeCost {
    /// Price of the upgrade when it is purchasable.
    #[must_use]
    pub const fn gold(self) -> Option<Gold> {
        match self {
            Self::Available(gold) => Some(gold),
            Self::Max | Self::Locked => None,
        }
    }
}

/// Reasons a tower purchase may be rejected.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PurchaseError {
    /// The placement predicate refused the position.
    #[error("position is blocked for tower placement")]
    Blocked,
    /// The player cannot afford the tower.
    #[error("insufficient gold: need {required}, have {available}")]
    InsufficientGold {
        /// Price of the tower.
        required: Gold,
        /// Gold held when the request was made.
        available: Gold,
    },
    /// The round already ended.
    #[error("round is over")]
    RoundOver,
}

/// Reasons a tower upgrade may be rejected.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeError {
    /// The path already sits at its maximum level.
    #[error("upgrade path is already at its maximum level")]
    MaxLevel,
    /// The path is locked and can never be upgraded again.
    #[error("upgrade path is locked")]
    Locked,
    /// The tower's kind does not offer the requested path.
    #[error("tower kind does not offer this upgrade path")]
    UnsupportedPath,
    /// The player cannot afford the upgrade.
    #[error("insufficient gold: need {required}, have {available}")]
    InsufficientGold {
        /// Price of the upgrade.
        required: Gold,
        /// Gold held when the request was made.
        available: Gold,
    },
    /// No tower with the provided identifier exists.
    #[error("no tower with the provided identifier exists")]
    UnknownTower,
}

/// Reasons a tower sale may be rejected.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SaleError {
    /// No tower with the provided identifier exists.
    #[error("no tower with the provided identifier exists")]
    UnknownTower,
}

/// Archetypes of enemies the wave director can emit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    /// Baseline enemy present in every wave.
    Grunt,
    /// Fast, fragile enemy that appears from wave two.
    Runner,
    /// Slow, heavily armoured enemy that appears from wave three.
    Brute,
}

impl EnemyKind {
    /// Every enemy archetype in weighted-selection order.
    pub const ALL: [EnemyKind; 3] = [Self::Grunt, Self::Runner, Self::Brute];

    /// Unscaled stats for the archetype.
    #[must_use]
    pub const fn base_stats(self) -> EnemyStats {
        match self {
            Self::Grunt => EnemyStats::new(150.0, 0.5, Gold::new(10), 10),
            Self::Runner => EnemyStats::new(80.0, 0.9, Gold::new(8), 12),
            Self::Brute => EnemyStats::new(400.0, 0.3, Gold::new(25), 30),
        }
    }

    /// Stats for the archetype scaled linearly by wave number.
    ///
    /// Health grows by 15% of the base per wave after the first and speed by
    /// 0.02 units per tick per wave.
    #[must_use]
    pub fn stats_for_wave(self, wave: u32) -> EnemyStats {
        let base = self.base_stats();
        let waves_elapsed = wave.saturating_sub(1) as f32;
        EnemyStats {
            max_health: base.max_health * (1.0 + 0.15 * waves_elapsed),
            speed: base.speed + 0.02 * waves_elapsed,
            ..base
        }
    }

    /// Relative likelihood of the archetype being chosen in `wave`.
    #[must_use]
    pub fn spawn_weight(self, wave: u32) -> u32 {
        match self {
            Self::Grunt => 10,
            Self::Runner => (wave.saturating_sub(1) * 2).min(8),
            Self::Brute => (wave.saturating_sub(2) * 2).min(6),
        }
    }
}

/// Stats assigned to an enemy when it spawns.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyStats {
    /// Starting and maximum health.
    pub max_health: f32,
    /// Travel distance per tick.
    pub speed: f32,
    /// Gold paid out on a kill.
    pub reward: Gold,
    /// Score awarded on a kill.
    pub points: u32,
}

impl EnemyStats {
    /// Creates a stat block from explicit values.
    #[must_use]
    pub const fn new(max_health: f32, speed: f32, reward: Gold, points: u32) -> Self {
        Self {
            max_health,
            speed,
            reward,
            points,
        }
    }

    /// Returns a copy with health scaled by `multiplier`.
    #[must_use]
    pub fn with_health_multiplier(self, multiplier: f32) -> Self {
        Self {
            max_health: self.max_health * multiplier,
            ..self
        }
    }
}

/// Lifecycle of an enemy. Both dead states are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnemyState {
    /// The enemy is on the path and can be targeted.
    Alive,
    /// The enemy's health was depleted.
    Killed,
    /// The enemy reached the final waypoint.
    Leaked,
}

impl EnemyState {
    /// Reports whether the enemy is still in play.
    #[must_use]
    pub const fn is_alive(self) -> bool {
        matches!(self, Self::Alive)
    }
}

/// Effect a projectile applies when it reaches its target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Payload {
    /// Damages the target once.
    Direct {
        /// Damage dealt on impact.
        damage: f32,
    },
    /// Damages every live enemy within `radius` of the impact point.
    Area {
        /// Damage dealt to each enemy caught in the blast.
        damage: f32,
        /// Blast radius in world units.
        radius: f32,
    },
    /// Damages the target once and ignites it.
    DamageOverTime {
        /// Damage dealt on impact.
        damage: f32,
        /// Burn damage per second.
        dps: f32,
        /// Burn duration in seconds.
        duration_secs: f32,
    },
}

/// Active burn carried by an enemy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BurnSnapshot {
    /// Damage per second.
    pub dps: f32,
    /// Seconds left before the burn expires.
    pub remaining_secs: f32,
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Archetype of the enemy.
    pub kind: EnemyKind,
    /// Current world position.
    pub position: Vec2,
    /// Index of the segment the enemy is travelling along.
    pub path_index: usize,
    /// Health remaining, never negative.
    pub health: f32,
    /// Health at spawn.
    pub max_health: f32,
    /// Lifecycle state.
    pub state: EnemyState,
    /// Active burn, if any.
    pub burn: Option<BurnSnapshot>,
}

impl EnemySnapshot {
    /// Fraction of health remaining in `[0, 1]`.
    #[must_use]
    pub fn health_ratio(&self) -> f32 {
        if self.max_health <= 0.0 {
            return 0.0;
        }
        (self.health / self.max_health).clamp(0.0, 1.0)
    }
}

/// Read-only snapshot describing all enemies on the path.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Number of enemies captured.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no enemies were captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Upgrade state of one of a tower's three paths.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UpgradeSlot {
    /// Path tracked by the slot.
    pub path: UpgradePath,
    /// Current level, starting at one.
    pub level: u8,
    /// Whether the path was permanently locked.
    pub locked: bool,
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Kind of tower that was constructed.
    pub kind: TowerKind,
    /// World position of the tower's centre.
    pub position: Vec2,
    /// Derived targeting range.
    pub range: f32,
    /// Derived projectile damage.
    pub damage: f32,
    /// Derived ticks between shots.
    pub fire_rate_ticks: f32,
    /// Ticks remaining before the tower may fire again.
    pub cooldown: f32,
    /// Per-path upgrade state in the kind's path order.
    pub upgrades: [UpgradeSlot; 3],
    /// First path that reached level three.
    pub primary_path: Option<UpgradePath>,
    /// Primary path once it reached its maximum level.
    pub specialization: Option<UpgradePath>,
}

impl TowerSnapshot {
    /// Reports whether the cooldown elapsed.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.cooldown <= 0.0
    }

    /// Remaining cooldown as a fraction of the full fire interval.
    #[must_use]
    pub fn cooldown_fraction(&self) -> f32 {
        if self.fire_rate_ticks <= 0.0 {
            return 0.0;
        }
        (self.cooldown / self.fire_rate_ticks).clamp(0.0, 1.0)
    }

    /// Current level on `path`, if the tower offers it.
    #[must_use]
    pub fn level(&self, path: UpgradePath) -> Option<u8> {
        self.upgrades
            .iter()
            .find(|slot| slot.path == path)
            .map(|slot| slot.level)
    }

    /// Paths permanently locked on the tower.
    pub fn locked_paths(&self) -> impl Iterator<Item = UpgradePath> + '_ {
        self.upgrades
            .iter()
            .filter(|slot| slot.locked)
            .map(|slot| slot.path)
    }
}

/// Read-only snapshot describing all towers on the map.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Looks up the snapshot captured for `tower`.
    #[must_use]
    pub fn get(&self, tower: TowerId) -> Option<&TowerSnapshot> {
        self.snapshots
            .binary_search_by_key(&tower, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Number of towers captured.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no towers were captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single projectile used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Identifier allocated to the projectile.
    pub id: ProjectileId,
    /// Tower that launched the projectile.
    pub source: TowerId,
    /// Enemy the projectile homes toward.
    pub target: EnemyId,
    /// Current world position.
    pub position: Vec2,
    /// Effect resolved on impact.
    pub payload: Payload,
    /// Whether the payload is still pending.
    pub active: bool,
    /// Whether a detonated area shell is still lingering for presentation.
    pub lingering: bool,
}

/// Read-only snapshot describing all projectiles in flight or lingering.
#[derive(Clone, Debug, Default)]
pub struct ProjectileView {
    snapshots: Vec<ProjectileSnapshot>,
}

impl ProjectileView {
    /// Creates a new projectile view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ProjectileSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured projectile snapshots in launch order.
    pub fn iter(&self) -> impl Iterator<Item = &ProjectileSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<ProjectileSnapshot> {
        self.snapshots
    }
}

/// Economy counters owned by the world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EconomySnapshot {
    /// Spendable gold.
    pub gold: Gold,
    /// Accumulated score.
    pub score: u64,
    /// Lives remaining, never negative.
    pub lives: u32,
    /// Multiplier applied to tick deltas.
    pub time_scale: f32,
}

impl EconomySnapshot {
    /// Reports whether the round reached its terminal condition.
    #[must_use]
    pub const fn is_round_over(&self) -> bool {
        self.lives == 0
    }
}

/// Target assignment produced for a tower.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerTarget {
    /// Tower that acquired the target.
    pub tower: TowerId,
    /// Enemy selected as the target.
    pub enemy: EnemyId,
    /// Tower position when the target was chosen.
    pub tower_position: Vec2,
    /// Enemy position when the target was chosen.
    pub enemy_position: Vec2,
}

#[cfg(test)]
mod tests {
    use super::{
        EnemyKind, Gold, Path, PathError, TowerId, TowerKind, TowerSnapshot, UpgradeCost,
        UpgradePath, UpgradeSlot, Vec2,
    };
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn tower_id_round_trips_through_bincode() {
        assert_round_trip(&TowerId::new(42));
    }

    #[test]
    fn enemy_stats_round_trip_through_bincode() {
        assert_round_trip(&EnemyKind::Brute.stats_for_wave(4));
    }

    #[test]
    fn path_rejects_fewer_than_two_waypoints() {
        assert_eq!(
            Path::new(vec![Vec2::ZERO]),
            Err(PathError::TooShort { waypoints: 1 })
        );
        assert!(Path::new(Vec::new()).is_err());
    }

    #[test]
    fn path_exposes_last_segment() {
        let path = Path::new(vec![Vec2::ZERO, Vec2::X, Vec2::ONE]).expect("valid path");
        assert_eq!(path.last_segment(), 1);
        assert_eq!(path.start(), Vec2::ZERO);
    }

    #[test]
    fn upgrade_cost_strictly_increases_with_level() {
        for path in UpgradePath::ALL {
            for level in 1..path.max_level() {
                assert!(
                    path.cost_at(level + 1) > path.cost_at(level),
                    "{path:?} cost did not grow past level {level}"
                );
            }
        }
    }

    #[test]
    fn damage_path_is_priciest_and_rate_cheapest() {
        for path in UpgradePath::ALL {
            assert!(UpgradePath::Damage.base_cost() >= path.base_cost());
            assert!(UpgradePath::Rate.base_cost() <= path.base_cost());
        }
        assert_eq!(UpgradePath::Damage.cost_at(2), Gold::new(108));
    }

    #[test]
    fn every_kind_offers_damage_and_rate() {
        for kind in TowerKind::ALL {
            let paths = kind.upgrade_paths();
            assert!(paths.contains(&UpgradePath::Damage));
            assert!(paths.contains(&UpgradePath::Rate));
        }
        assert_eq!(TowerKind::Bomb.upgrade_paths()[0], UpgradePath::Area);
        assert_eq!(TowerKind::Fire.upgrade_paths()[0], UpgradePath::Duration);
        assert_eq!(TowerKind::Minigun.upgrade_paths()[0], UpgradePath::Range);
    }

    #[test]
    fn cooldown_fraction_tracks_remaining_interval() {
        let snapshot = |cooldown: f32| TowerSnapshot {
            id: TowerId::new(1),
            kind: TowerKind::Basic,
            position: Vec2::ZERO,
            range: 100.0,
            damage: 30.0,
            fire_rate_ticks: 60.0,
            cooldown,
            upgrades: [UpgradePath::Range, UpgradePath::Damage, UpgradePath::Rate].map(|path| {
                UpgradeSlot {
                    path,
                    level: 1,
                    locked: false,
                }
            }),
            primary_path: None,
            specialization: None,
        };

        assert_eq!(snapshot(0.0).cooldown_fraction(), 0.0);
        assert!(snapshot(0.0).is_ready());
        assert_eq!(snapshot(30.0).cooldown_fraction(), 0.5);
        assert_eq!(snapshot(60.0).cooldown_fraction(), 1.0);
        assert!(!snapshot(60.0).is_ready());
    }

    #[test]
    fn enemy_stats_scale_with_wave() {
        let first = EnemyKind::Grunt.stats_for_wave(1);
        let fifth = EnemyKind::Grunt.stats_for_wave(5);
        assert_eq!(first, EnemyKind::Grunt.base_stats());
        assert!(fifth.max_health > first.max_health);
        assert!(fifth.speed > first.speed);
        assert_eq!(fifth.reward, first.reward);
    }

    #[test]
    fn late_archetypes_are_unweighted_in_first_wave() {
        assert_eq!(EnemyKind::Runner.spawn_weight(1), 0);
        assert_eq!(EnemyKind::Brute.spawn_weight(2), 0);
        assert!(EnemyKind::Brute.spawn_weight(3) > 0);
    }

    #[test]
    fn upgrade_cost_exposes_price_only_when_available() {
        assert_eq!(UpgradeCost::Available(Gold::new(5)).gold(), Some(Gold::new(5)));
        assert_eq!(UpgradeCost::Max.gold(), None);
        assert_eq!(UpgradeCost::Locked.gold(), None);
    }
}
