#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that computes deterministic tower targets from world snapshots.
//!
//! Every tower picks the live enemy within its range that has progressed
//! furthest along the path. Ties on progress keep the enemy encountered first
//! in the enemy view, which is spawn order.

use wave_defence_core::{EnemyId, EnemyView, TowerId, TowerTarget, TowerView, Vec2};

/// Tower targeting system that reuses scratch buffers to avoid repeated allocations.
#[derive(Debug, Default)]
pub struct TowerTargeting {
    tower_workspace: Vec<TowerWorkspace>,
    enemy_workspace: Vec<EnemyCandidate>,
}

impl TowerTargeting {
    /// Creates a new tower targeting system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes tower targets for the provided world snapshot.
    ///
    /// The output buffer is cleared before populating it with the latest
    /// assignments. Towers without an enemy in range produce no entry.
    pub fn handle(&mut self, towers: &TowerView, enemies: &EnemyView, out: &mut Vec<TowerTarget>) {
        out.clear();

        if towers.is_empty() || enemies.is_empty() {
            return;
        }

        self.prepare_tower_workspace(towers);
        if self.tower_workspace.is_empty() {
            return;
        }

        self.prepare_enemy_workspace(enemies);
        if self.enemy_workspace.is_empty() {
            return;
        }

        for tower in &self.tower_workspace {
            let mut best: Option<&EnemyCandidate> = None;

            for candidate in &self.enemy_workspace {
                if candidate.position.distance_squared(tower.position) > tower.range_sq {
                    continue;
                }

                match best {
                    Some(existing) if candidate.path_index <= existing.path_index => {}
                    _ => best = Some(candidate),
                }
            }

            if let Some(best_candidate) = best {
                out.push(TowerTarget {
                    tower: tower.id,
                    enemy: best_candidate.id,
                    tower_position: tower.position,
                    enemy_position: best_candidate.position,
                });
            }
        }
    }

    fn prepare_tower_workspace(&mut self, towers: &TowerView) {
        self.tower_workspace.clear();
        self.tower_workspace.reserve(towers.len());

        for snapshot in towers.iter() {
            if snapshot.range <= 0.0 {
                continue;
            }

            self.tower_workspace.push(TowerWorkspace {
                id: snapshot.id,
                position: snapshot.position,
                range_sq: snapshot.range * snapshot.range,
            });
        }
    }

    fn prepare_enemy_workspace(&mut self, enemies: &EnemyView) {
        self.enemy_workspace.clear();
        self.enemy_workspace.reserve(enemies.len());

        for snapshot in enemies.iter().filter(|snapshot| snapshot.state.is_alive()) {
            self.enemy_workspace.push(EnemyCandidate {
                id: snapshot.id,
                position: snapshot.position,
                path_index: snapshot.path_index,
            });
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct TowerWorkspace {
    id: TowerId,
    position: Vec2,
    range_sq: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct EnemyCandidate {
    id: EnemyId,
    position: Vec2,
    path_index: usize,
}
