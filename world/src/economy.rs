//! Gold, score and lives bookkeeping.

use wave_defence_core::Gold;

#[derive(Clone, Debug)]
pub(crate) struct Economy {
    pub(crate) gold: Gold,
    pub(crate) score: u64,
    pub(crate) lives: u32,
    round_lost: bool,
}

impl Economy {
    pub(crate) fn new(gold: Gold, lives: u32) -> Self {
        Self {
            gold,
            score: 0,
            lives,
            round_lost: false,
        }
    }

    pub(crate) fn credit(&mut self, amount: Gold) {
        self.gold = self.gold.saturating_add(amount);
    }

    /// Deducts `cost` atomically. On failure the balance is untouched and
    /// the current balance is returned.
    pub(crate) fn try_spend(&mut self, cost: Gold) -> Result<(), Gold> {
        match self.gold.checked_sub(cost) {
            Some(remaining) => {
                self.gold = remaining;
                Ok(())
            }
            None => Err(self.gold),
        }
    }

    pub(crate) fn record_kill(&mut self, reward: Gold, points: u32) {
        self.credit(reward);
        self.score = self.score.saturating_add(u64::from(points));
    }

    /// Removes a life and returns the lives left, never below zero.
    pub(crate) fn record_leak(&mut self) -> u32 {
        self.lives = self.lives.saturating_sub(1);
        self.lives
    }

    pub(crate) fn is_depleted(&self) -> bool {
        self.lives == 0
    }

    /// Latches the round-lost flag. Returns `true` only the first time.
    pub(crate) fn mark_round_lost(&mut self) -> bool {
        if self.round_lost || !self.is_depleted() {
            return false;
        }
        self.round_lost = true;
        true
    }
}
