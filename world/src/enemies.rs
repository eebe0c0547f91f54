//! Enemy state, status effects and path-following motion.

use wave_defence_core::{
    BurnSnapshot, EnemyId, EnemyKind, EnemySnapshot, EnemyState, EnemyStats, Gold, Path, Vec2,
    TICKS_PER_SECOND,
};

/// Damage-over-time effect. An enemy carries at most one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Burn {
    pub(crate) dps: f32,
    pub(crate) remaining_secs: f32,
}

/// Authoritative state of a single enemy on the path.
#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    pub(crate) id: EnemyId,
    pub(crate) kind: EnemyKind,
    pub(crate) position: Vec2,
    pub(crate) path_index: usize,
    pub(crate) speed: f32,
    pub(crate) health: f32,
    pub(crate) max_health: f32,
    pub(crate) reward: Gold,
    pub(crate) points: u32,
    pub(crate) burn: Option<Burn>,
    pub(crate) state: EnemyState,
}

impl Enemy {
    pub(crate) fn spawn(id: EnemyId, kind: EnemyKind, stats: EnemyStats, path: &Path) -> Self {
        Self {
            id,
            kind,
            position: path.start(),
            path_index: 0,
            speed: stats.speed,
            health: stats.max_health,
            max_health: stats.max_health,
            reward: stats.reward,
            points: stats.points,
            burn: None,
            state: EnemyState::Alive,
        }
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.state.is_alive()
    }

    /// Ticks the burn and then moves toward the next waypoint.
    ///
    /// Returns `true` only on the tick the enemy leaks off the end of the
    /// path. A burn kill stops the enemy in place and returns `false`.
    pub(crate) fn advance(&mut self, path: &Path, dt: f32) -> bool {
        if !self.is_alive() {
            return false;
        }

        self.tick_burn(dt);
        if !self.is_alive() {
            return false;
        }

        let travel = self.speed * dt;
        if travel <= 0.0 {
            return false;
        }

        let Some(next) = path.waypoint(self.path_index + 1) else {
            self.state = EnemyState::Leaked;
            return true;
        };

        let offset = next - self.position;
        let distance = offset.length();
        if distance < travel {
            self.position = next;
            if self.path_index >= path.last_segment() {
                self.state = EnemyState::Leaked;
                return true;
            }
            self.path_index += 1;
            return false;
        }

        self.position += offset / distance * travel;
        false
    }

    pub(crate) fn take_damage(&mut self, amount: f32) {
        if !self.is_alive() {
            return;
        }

        self.health -= amount;
        if self.health <= 0.0 {
            self.health = 0.0;
            self.state = EnemyState::Killed;
        }
    }

    /// Applies a burn, keeping only the strongest effect.
    ///
    /// A higher dps replaces the current burn, an equal dps resets its
    /// duration, and a weaker dps is ignored.
    pub(crate) fn apply_dot(&mut self, dps: f32, duration_secs: f32) {
        if !self.is_alive() {
            return;
        }

        match self.burn.as_mut() {
            Some(current) if dps < current.dps => {}
            Some(current) if dps == current.dps => current.remaining_secs = duration_secs,
            _ => {
                self.burn = Some(Burn {
                    dps,
                    remaining_secs: duration_secs,
                });
            }
        }
    }

    fn tick_burn(&mut self, dt: f32) {
        let Some(burn) = self.burn.as_mut() else {
            return;
        };

        let seconds = dt / TICKS_PER_SECOND;
        burn.remaining_secs -= seconds;
        let damage = burn.dps * seconds;
        if burn.remaining_secs <= 0.0 {
            self.burn = None;
        }
        self.take_damage(damage);
    }

    pub(crate) fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            kind: self.kind,
            position: self.position,
            path_index: self.path_index,
            health: self.health.max(0.0),
            max_health: self.max_health,
            state: self.state,
            burn: self.burn.map(|burn| BurnSnapshot {
                dps: burn.dps,
                remaining_secs: burn.remaining_secs.max(0.0),
            }),
        }
    }
}
