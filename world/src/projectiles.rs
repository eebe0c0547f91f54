//! Homing projectiles and payload resolution.

use wave_defence_core::{
    EnemyId, Payload, ProjectileId, ProjectileSnapshot, TowerId, Vec2, AREA_LINGER_TICKS,
    PROJECTILE_SPEED,
};

use crate::enemies::Enemy;

/// Outcome of advancing a projectile by one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Flight {
    /// Still travelling toward the target.
    InFlight,
    /// Reached the target and resolved the payload against `hits` enemies.
    Impacted { hits: usize },
    /// Lost the target and resolved nothing.
    Fizzled,
    /// Already spent; only the presentation linger is counting down.
    Spent,
}

/// Projectile homing toward an enemy it does not own.
#[derive(Clone, Debug)]
pub(crate) struct Projectile {
    pub(crate) id: ProjectileId,
    pub(crate) source: TowerId,
    pub(crate) target: EnemyId,
    pub(crate) position: Vec2,
    pub(crate) payload: Payload,
    active: bool,
    linger: Option<f32>,
}

impl Projectile {
    pub(crate) fn launch(
        id: ProjectileId,
        source: TowerId,
        target: EnemyId,
        origin: Vec2,
        payload: Payload,
    ) -> Self {
        Self {
            id,
            source,
            target,
            position: origin,
            payload,
            active: true,
            linger: None,
        }
    }

    /// Moves toward the target's current position and resolves the payload
    /// once it is within a single step.
    ///
    /// `enemies` must be sorted by identifier; the target is looked up on
    /// every call and a missing or dead target cancels the shot.
    pub(crate) fn advance(&mut self, dt: f32, enemies: &mut [Enemy]) -> Flight {
        if !self.active {
            if let Some(remaining) = self.linger.as_mut() {
                *remaining -= dt;
            }
            return Flight::Spent;
        }

        let target = enemies
            .binary_search_by_key(&self.target, |enemy| enemy.id)
            .ok()
            .filter(|&index| enemies[index].is_alive());
        let Some(target_index) = target else {
            self.active = false;
            return Flight::Fizzled;
        };

        let destination = enemies[target_index].position;
        let offset = destination - self.position;
        let distance = offset.length();
        let travel = PROJECTILE_SPEED * dt;

        if distance < travel {
            self.position = destination;
            self.active = false;
            let hits = self.resolve(target_index, enemies);
            if matches!(self.payload, Payload::Area { .. }) {
                self.linger = Some(AREA_LINGER_TICKS);
            }
            return Flight::Impacted { hits };
        }

        if travel > 0.0 {
            self.position += offset / distance * travel;
        }
        Flight::InFlight
    }

    /// Reports whether the projectile can leave the roster.
    pub(crate) fn is_finished(&self) -> bool {
        !self.active && self.linger.map_or(true, |remaining| remaining <= 0.0)
    }

    fn resolve(&self, target_index: usize, enemies: &mut [Enemy]) -> usize {
        match self.payload {
            Payload::Direct { damage } => {
                enemies[target_index].take_damage(damage);
                1
            }
            Payload::Area { damage, radius } => {
                let radius_sq = radius * radius;
                let mut hits = 0;
                for enemy in enemies.iter_mut().filter(|enemy| enemy.is_alive()) {
                    if enemy.position.distance_squared(self.position) <= radius_sq {
                        enemy.take_damage(damage);
                        hits += 1;
                    }
                }
                hits
            }
            Payload::DamageOverTime {
                damage,
                dps,
                duration_secs,
            } => {
                let enemy = &mut enemies[target_index];
                enemy.take_damage(damage);
                enemy.apply_dot(dps, duration_secs);
                1
            }
        }
    }

    pub(crate) fn snapshot(&self) -> ProjectileSnapshot {
        ProjectileSnapshot {
            id: self.id,
            source: self.source,
            target: self.target,
            position: self.position,
            payload: self.payload,
            active: self.active,
            lingering: !self.active && !self.is_finished(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wave_defence_core::{EnemyKind, EnemyState, EnemyStats, Gold, Path};

    fn path() -> Path {
        Path::new(vec![Vec2::new(0.0, 0.0), Vec2::new(1000.0, 0.0)]).expect("valid path")
    }

    fn enemy_at(id: u32, position: Vec2, health: f32) -> Enemy {
        let mut enemy = Enemy::spawn(
            EnemyId::new(id),
            EnemyKind::Grunt,
            EnemyStats::new(health, 0.5, Gold::new(10), 10),
            &path(),
        );
        enemy.position = position;
        enemy
    }

    fn projectile_at(origin: Vec2, target: u32, payload: Payload) -> Projectile {
        Projectile::launch(
            ProjectileId::new(0),
            TowerId::new(0),
            EnemyId::new(target),
            origin,
            payload,
        )
    }

    #[test]
    fn homes_toward_target_current_position() {
        let mut enemies = vec![enemy_at(0, Vec2::new(100.0, 0.0), 50.0)];
        let mut projectile = projectile_at(Vec2::ZERO, 0, Payload::Direct { damage: 10.0 });

        assert_eq!(projectile.advance(1.0, &mut enemies), Flight::InFlight);
        assert_eq!(projectile.position, Vec2::new(5.0, 0.0));

        enemies[0].position = Vec2::new(5.0, 100.0);
        assert_eq!(projectile.advance(1.0, &mut enemies), Flight::InFlight);
        assert_eq!(projectile.position, Vec2::new(5.0, 5.0));
    }

    #[test]
    fn direct_payload_applies_once() {
        let mut enemies = vec![enemy_at(0, Vec2::new(3.0, 0.0), 50.0)];
        let mut projectile = projectile_at(Vec2::ZERO, 0, Payload::Direct { damage: 10.0 });

        assert_eq!(
            projectile.advance(1.0, &mut enemies),
            Flight::Impacted { hits: 1 }
        );
        assert_eq!(projectile.advance(1.0, &mut enemies), Flight::Spent);

        assert_eq!(enemies[0].health, 40.0);
        assert!(projectile.is_finished());
    }

    #[test]
    fn dead_target_fizzles_without_damage() {
        let mut enemies = vec![
            enemy_at(0, Vec2::new(3.0, 0.0), 50.0),
            enemy_at(1, Vec2::new(3.0, 1.0), 50.0),
        ];
        enemies[0].take_damage(100.0);
        let mut projectile = projectile_at(
            Vec2::ZERO,
            0,
            Payload::Area {
                damage: 10.0,
                radius: 50.0,
            },
        );

        assert_eq!(projectile.advance(1.0, &mut enemies), Flight::Fizzled);

        assert_eq!(enemies[1].health, 50.0);
        assert!(projectile.is_finished());
    }

    #[test]
    fn missing_target_fizzles() {
        let mut enemies = vec![enemy_at(4, Vec2::new(3.0, 0.0), 50.0)];
        let mut projectile = projectile_at(Vec2::ZERO, 2, Payload::Direct { damage: 10.0 });

        assert_eq!(projectile.advance(1.0, &mut enemies), Flight::Fizzled);
        assert_eq!(enemies[0].health, 50.0);
    }

    #[test]
    fn area_payload_hits_everything_within_radius() {
        let mut enemies = vec![
            enemy_at(0, Vec2::new(2.0, 0.0), 50.0),
            enemy_at(1, Vec2::new(2.0, 20.0), 50.0),
            enemy_at(2, Vec2::new(2.0, 20.5), 50.0),
            enemy_at(3, Vec2::new(-18.0, 0.0), 50.0),
        ];
        let mut projectile = projectile_at(
            Vec2::ZERO,
            0,
            Payload::Area {
                damage: 15.0,
                radius: 20.0,
            },
        );

        assert_eq!(
            projectile.advance(1.0, &mut enemies),
            Flight::Impacted { hits: 3 }
        );

        assert_eq!(enemies[0].health, 35.0);
        assert_eq!(enemies[1].health, 35.0);
        assert_eq!(enemies[2].health, 50.0);
        assert_eq!(enemies[3].health, 35.0);
    }

    #[test]
    fn area_projectile_lingers_before_leaving() {
        let mut enemies = vec![enemy_at(0, Vec2::new(2.0, 0.0), 50.0)];
        let mut projectile = projectile_at(
            Vec2::ZERO,
            0,
            Payload::Area {
                damage: 15.0,
                radius: 20.0,
            },
        );

        let _ = projectile.advance(1.0, &mut enemies);
        assert!(!projectile.is_finished());
        assert!(projectile.snapshot().lingering);

        let _ = projectile.advance(AREA_LINGER_TICKS, &mut enemies);
        assert!(projectile.is_finished());
        assert_eq!(enemies[0].health, 35.0, "linger must not deal damage");
    }

    #[test]
    fn burn_payload_damages_and_ignites() {
        let mut enemies = vec![enemy_at(0, Vec2::new(1.0, 0.0), 50.0)];
        let mut projectile = projectile_at(
            Vec2::ZERO,
            0,
            Payload::DamageOverTime {
                damage: 10.0,
                dps: 4.0,
                duration_secs: 3.0,
            },
        );

        let _ = projectile.advance(1.0, &mut enemies);

        assert_eq!(enemies[0].health, 40.0);
        let burn = enemies[0].burn.expect("target should be burning");
        assert_eq!(burn.dps, 4.0);
        assert_eq!(burn.remaining_secs, 3.0);
    }

    #[test]
    fn lethal_hit_marks_target_killed() {
        let mut enemies = vec![enemy_at(0, Vec2::new(1.0, 0.0), 5.0)];
        let mut projectile = projectile_at(Vec2::ZERO, 0, Payload::Direct { damage: 10.0 });

        let _ = projectile.advance(1.0, &mut enemies);

        assert_eq!(enemies[0].state, EnemyState::Killed);
    }
}
