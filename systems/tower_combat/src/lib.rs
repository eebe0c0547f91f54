#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that emits projectile firing commands from targeting data.

use wave_defence_core::{Command, TowerTarget, TowerView};

/// Tower combat system that queues firing commands for ready towers.
#[derive(Debug, Default)]
pub struct TowerCombat {
    scratch: Vec<Command>,
}

impl TowerCombat {
    /// Creates a new tower combat system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits `Command::FireProjectile` entries for towers ready to fire.
    ///
    /// Targets referencing towers absent from the view or still cooling down
    /// are skipped.
    pub fn handle(
        &mut self,
        towers: &TowerView,
        tower_targets: &[TowerTarget],
        out: &mut Vec<Command>,
    ) {
        if tower_targets.is_empty() || towers.is_empty() {
            return;
        }

        self.scratch.clear();

        for target in tower_targets {
            if towers
                .get(target.tower)
                .is_some_and(|snapshot| snapshot.is_ready())
            {
                self.scratch.push(Command::FireProjectile {
                    tower: target.tower,
                    target: target.enemy,
                });
            }
        }

        if self.scratch.is_empty() {
            return;
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }
}
