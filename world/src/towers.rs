//! Authoritative tower state management utilities.
//!
//! Each tower tracks three upgrade paths. Two rules shape how they progress:
//!
//! * While no primary path exists, the moment two paths sit at level two or
//!   higher the remaining level-one path is locked for good.
//! * The first path to reach level three becomes the primary path. When it
//!   reaches its maximum level the tower is specialised in that path.
//!
//! Basic and minigun towers additionally cap every non-primary path at level
//! two once a primary exists.

use std::collections::BTreeMap;

use wave_defence_core::{
    Gold, Payload, TertiaryStat, TowerId, TowerKind, TowerSnapshot, UpgradeCost, UpgradeError,
    UpgradePath, UpgradeSlot, Vec2, MIN_FIRE_RATE_TICKS, SELL_REFUND_RATIO,
};

const DAMAGE_PER_LEVEL: f32 = 10.0;
const RATE_TICKS_PER_LEVEL: f32 = 8.0;
const RANGE_PER_LEVEL: f32 = 25.0;
const AREA_GROWTH_PER_LEVEL: f32 = 1.05;
const DURATION_GROWTH_PER_LEVEL: f32 = 1.10;
const SECONDARY_PATH_CAP: u8 = 2;

/// Stats recomputed from the base table and the current upgrade levels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct DerivedStats {
    pub(crate) range: f32,
    pub(crate) damage: f32,
    pub(crate) fire_rate_ticks: f32,
    pub(crate) tertiary: TertiaryStat,
}

/// State of a tower stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct TowerState {
    pub(crate) id: TowerId,
    pub(crate) kind: TowerKind,
    pub(crate) position: Vec2,
    pub(crate) cooldown: f32,
    slots: [UpgradeSlot; 3],
    primary_path: Option<UpgradePath>,
    specialization: Option<UpgradePath>,
    stats: DerivedStats,
}

impl TowerState {
    pub(crate) fn new(id: TowerId, kind: TowerKind, position: Vec2) -> Self {
        let slots = kind.upgrade_paths().map(|path| UpgradeSlot {
            path,
            level: 1,
            locked: false,
        });
        Self {
            id,
            kind,
            position,
            cooldown: 0.0,
            slots,
            primary_path: None,
            specialization: None,
            stats: derive_stats(kind, &slots),
        }
    }

    pub(crate) fn level(&self, path: UpgradePath) -> Option<u8> {
        self.slot(path).map(|slot| slot.level)
    }

    /// Price of the next level on `path`, or `None` when the kind does not
    /// offer the path.
    pub(crate) fn upgrade_cost(&self, path: UpgradePath) -> Option<UpgradeCost> {
        let slot = self.slot(path)?;
        if slot.locked || self.secondary_capped(slot) {
            return Some(UpgradeCost::Locked);
        }
        if slot.level >= path.max_level() {
            return Some(UpgradeCost::Max);
        }
        Some(UpgradeCost::Available(path.cost_at(slot.level)))
    }

    /// Advances `path` by one level and returns the gold the level costs.
    ///
    /// The caller is responsible for charging the returned amount. Nothing
    /// changes when an error is returned.
    pub(crate) fn upgrade(&mut self, path: UpgradePath) -> Result<Gold, UpgradeError> {
        let cost = match self.upgrade_cost(path) {
            None => return Err(UpgradeError::UnsupportedPath),
            Some(UpgradeCost::Max) => return Err(UpgradeError::MaxLevel),
            Some(UpgradeCost::Locked) => return Err(UpgradeError::Locked),
            Some(UpgradeCost::Available(cost)) => cost,
        };

        let Some(slot) = self.slots.iter_mut().find(|slot| slot.path == path) else {
            return Err(UpgradeError::UnsupportedPath);
        };
        slot.level += 1;
        let level = slot.level;

        self.lock_untouched_path();
        if self.primary_path.is_none() && level >= 3 {
            self.primary_path = Some(path);
        }
        if let Some(primary) = self.primary_path {
            if self.level(primary) == Some(primary.max_level()) {
                self.specialization = Some(primary);
            }
        }

        self.recompute_stats();
        Ok(cost)
    }

    /// Refund for selling the tower: three quarters of every gold piece
    /// spent on placement and upgrades, rounded down.
    pub(crate) fn sell_value(&self) -> Gold {
        let upgrades: u64 = self
            .slots
            .iter()
            .flat_map(|slot| (1..slot.level).map(move |level| slot.path.cost_at(level)))
            .map(|gold| u64::from(gold.get()))
            .sum();
        let total = u64::from(self.kind.placement_cost().get()) + upgrades;
        let refund = (total as f64 * f64::from(SELL_REFUND_RATIO)).floor();
        Gold::new(refund.min(f64::from(u32::MAX)) as u32)
    }

    pub(crate) fn tick_cooldown(&mut self, dt: f32) {
        self.cooldown = (self.cooldown - dt).max(0.0);
    }

    pub(crate) fn is_ready(&self) -> bool {
        self.cooldown <= 0.0
    }

    /// Resets the cooldown and returns the payload for a new projectile.
    pub(crate) fn fire(&mut self) -> Payload {
        self.cooldown = self.stats.fire_rate_ticks;
        self.payload()
    }

    pub(crate) fn payload(&self) -> Payload {
        let damage = self.stats.damage;
        match self.stats.tertiary {
            TertiaryStat::None => Payload::Direct { damage },
            TertiaryStat::AreaRadius(radius) => Payload::Area { damage, radius },
            TertiaryStat::BurnSeconds(duration_secs) => Payload::DamageOverTime {
                damage,
                dps: damage,
                duration_secs,
            },
        }
    }

    pub(crate) fn snapshot(&self) -> TowerSnapshot {
        TowerSnapshot {
            id: self.id,
            kind: self.kind,
            position: self.position,
            range: self.stats.range,
            damage: self.stats.damage,
            fire_rate_ticks: self.stats.fire_rate_ticks,
            cooldown: self.cooldown,
            upgrades: self.slots,
            primary_path: self.primary_path,
            specialization: self.specialization,
        }
    }

    fn slot(&self, path: UpgradePath) -> Option<&UpgradeSlot> {
        self.slots.iter().find(|slot| slot.path == path)
    }

    fn secondary_capped(&self, slot: &UpgradeSlot) -> bool {
        if !self.kind.caps_secondary_paths() {
            return false;
        }
        let Some(primary) = self.primary_path else {
            return false;
        };
        slot.path != primary && slot.level >= SECONDARY_PATH_CAP
    }

    fn lock_untouched_path(&mut self) {
        if self.primary_path.is_some() || self.slots.iter().any(|slot| slot.locked) {
            return;
        }

        let raised = self.slots.iter().filter(|slot| slot.level >= 2).count();
        if raised < 2 {
            return;
        }

        for slot in self.slots.iter_mut().filter(|slot| slot.level == 1) {
            slot.locked = true;
            tracing::debug!(tower = self.id.get(), path = ?slot.path, "upgrade path locked");
        }
    }

    fn recompute_stats(&mut self) {
        self.stats = derive_stats(self.kind, &self.slots);
    }
}

fn derive_stats(kind: TowerKind, slots: &[UpgradeSlot; 3]) -> DerivedStats {
    let base = kind.base_stats();
    let level_of = |path: UpgradePath| {
        slots
            .iter()
            .find(|slot| slot.path == path)
            .map_or(0.0, |slot| f32::from(slot.level.saturating_sub(1)))
    };

    let damage = base.damage + DAMAGE_PER_LEVEL * level_of(UpgradePath::Damage);
    let fire_rate_ticks = (base.fire_rate_ticks
        - RATE_TICKS_PER_LEVEL * level_of(UpgradePath::Rate))
    .max(MIN_FIRE_RATE_TICKS);
    let range = base.range + RANGE_PER_LEVEL * level_of(UpgradePath::Range);
    let tertiary = match base.tertiary {
        TertiaryStat::None => TertiaryStat::None,
        TertiaryStat::AreaRadius(radius) => TertiaryStat::AreaRadius(
            radius * AREA_GROWTH_PER_LEVEL.powf(level_of(UpgradePath::Area)),
        ),
        TertiaryStat::BurnSeconds(seconds) => TertiaryStat::BurnSeconds(
            seconds * DURATION_GROWTH_PER_LEVEL.powf(level_of(UpgradePath::Duration)),
        ),
    };

    DerivedStats {
        range,
        damage,
        fire_rate_ticks,
        tertiary,
    }
}

/// Registry that stores towers and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct TowerRegistry {
    entries: BTreeMap<TowerId, TowerState>,
    next_tower_id: TowerId,
}

impl TowerRegistry {
    /// Creates an empty tower registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_tower_id: TowerId::new(0),
        }
    }

    pub(crate) fn insert(&mut self, kind: TowerKind, position: Vec2) -> TowerId {
        let id = self.next_tower_id;
        self.next_tower_id = TowerId::new(id.get().saturating_add(1));
        let _ = self.entries.insert(id, TowerState::new(id, kind, position));
        id
    }

    pub(crate) fn get(&self, id: TowerId) -> Option<&TowerState> {
        self.entries.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: TowerId) -> Option<&mut TowerState> {
        self.entries.get_mut(&id)
    }

    pub(crate) fn remove(&mut self, id: TowerId) -> Option<TowerState> {
        self.entries.remove(&id)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &TowerState> {
        self.entries.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut TowerState> {
        self.entries.values_mut()
    }
}
