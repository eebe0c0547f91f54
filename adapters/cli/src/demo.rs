//! Scripted demo round: a fixed path and a defence bought as gold allows.

use wave_defence_core::{Path, PathError, TowerId, TowerKind, UpgradePath, Vec2};
use wave_defence_simulation::Simulation;

/// Minimum distance between a tower centre and the path.
const PATH_CLEARANCE: f32 = 20.0;

const WAYPOINTS: [(f32, f32); 6] = [
    (0.0, 100.0),
    (300.0, 100.0),
    (300.0, 300.0),
    (100.0, 300.0),
    (100.0, 500.0),
    (600.0, 500.0),
];

const PLACEMENTS: [(TowerKind, (f32, f32)); 6] = [
    (TowerKind::Basic, (150.0, 140.0)),
    (TowerKind::Basic, (260.0, 200.0)),
    (TowerKind::Fire, (200.0, 260.0)),
    (TowerKind::Bomb, (140.0, 400.0)),
    (TowerKind::Minigun, (340.0, 200.0)),
    (TowerKind::Bomb, (300.0, 460.0)),
];

const UPGRADE_ORDER: [UpgradePath; 4] = [
    UpgradePath::Damage,
    UpgradePath::Damage,
    UpgradePath::Rate,
    UpgradePath::Damage,
];

pub(crate) fn demo_path() -> Result<Path, PathError> {
    Path::new(
        WAYPOINTS
            .iter()
            .map(|&(x, y)| Vec2::new(x, y))
            .collect(),
    )
}

/// Reports whether `position` is too close to any segment of `path`.
pub(crate) fn blocks_path(path: &Path, position: Vec2) -> bool {
    path.waypoints().windows(2).any(|segment| {
        distance_to_segment(position, segment[0], segment[1]) < PATH_CLEARANCE
    })
}

fn distance_to_segment(point: Vec2, start: Vec2, end: Vec2) -> f32 {
    let segment = end - start;
    let length_sq = segment.length_squared();
    if length_sq <= f32::EPSILON {
        return point.distance(start);
    }
    let t = ((point - start).dot(segment) / length_sq).clamp(0.0, 1.0);
    point.distance(start + segment * t)
}

/// Buys the next tower of the plan once affordable, then spends on upgrades.
#[derive(Debug, Default)]
pub(crate) struct DefencePlan {
    next_placement: usize,
    placed: Vec<TowerId>,
    next_upgrade: usize,
}

impl DefencePlan {
    pub(crate) fn step(&mut self, simulation: &mut Simulation) {
        let gold = simulation.snapshot().economy.gold;

        if let Some(&(kind, (x, y))) = PLACEMENTS.get(self.next_placement) {
            if gold < kind.placement_cost() {
                return;
            }
            let path = simulation.path().clone();
            match simulation.purchase_tower(kind, Vec2::new(x, y), |position| {
                blocks_path(&path, position)
            }) {
                Ok(tower) => self.placed.push(tower),
                Err(error) => tracing::warn!(?kind, %error, "scripted placement skipped"),
            }
            self.next_placement += 1;
            return;
        }

        let upgrades_per_tower = UPGRADE_ORDER.len();
        let total = self.placed.len() * upgrades_per_tower;
        if self.next_upgrade >= total {
            return;
        }
        let tower = self.placed[self.next_upgrade / upgrades_per_tower];
        let path = UPGRADE_ORDER[self.next_upgrade % upgrades_per_tower];
        let Some(price) = simulation
            .get_upgrade_cost(tower, path)
            .and_then(|cost| cost.gold())
        else {
            self.next_upgrade += 1;
            return;
        };
        if gold < price {
            return;
        }
        if let Err(error) = simulation.upgrade_tower(tower, path) {
            tracing::warn!(tower = tower.get(), ?path, %error, "scripted upgrade skipped");
        }
        self.next_upgrade += 1;
    }

    pub(crate) fn towers_placed(&self) -> usize {
        self.placed.len()
    }
}
