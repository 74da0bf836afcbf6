//! Score ledger: awarded points wait as "incoming" and drain into the settled
//! score one point at a time.

use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreLedger {
    settled: u32,
    incoming: u32,
    /// Wait after the latest award before draining starts.
    update_delay: Duration,
    /// Time per drained point once draining.
    update_speed: Duration,
    timer: Duration,
    /// Set by every award; the next drain waits for `update_delay` first.
    fresh_award: bool,
    bonus_requirement: u32,
    bonus_multiplier: f64,
}

impl ScoreLedger {
    pub fn new(
        update_delay: Duration,
        update_speed: Duration,
        bonus_requirement: u32,
        bonus_multiplier: f64,
    ) -> Self {
        Self {
            settled: 0,
            incoming: 0,
            update_delay,
            update_speed,
            timer: Duration::ZERO,
            fresh_award: false,
            bonus_requirement,
            bonus_multiplier,
        }
    }

    #[inline]
    pub fn settled(&self) -> u32 {
        self.settled
    }

    #[inline]
    pub fn incoming(&self) -> u32 {
        self.incoming
    }

    /// No points left to drain.
    pub fn is_idle(&self) -> bool {
        self.incoming == 0
    }

    /// Queue points from a removal. Scores never decrease through this path;
    /// any award, even zero, restarts the drain delay.
    pub fn add_settled_increase(&mut self, delta: u32) {
        self.incoming = self.incoming.saturating_add(delta);
        self.fresh_award = true;
        self.timer = Duration::ZERO;
    }

    /// Advance the drain clock by `dt`, moving one point per `update_speed`
    /// from incoming to settled once the delay has passed.
    /// Returns the number of points drained.
    pub fn advance(&mut self, dt: Duration) -> u32 {
        if self.incoming == 0 {
            self.timer = Duration::ZERO;
            return 0;
        }
        self.timer += dt;

        if self.fresh_award {
            if self.timer < self.update_delay {
                return 0;
            }
            self.timer -= self.update_delay;
            self.fresh_award = false;
        }

        let mut drained = 0;
        while self.incoming > 0 && self.timer >= self.update_speed {
            self.timer -= self.update_speed;
            self.incoming -= 1;
            self.settled = self.settled.saturating_add(1);
            drained += 1;
        }
        if self.incoming == 0 {
            self.timer = Duration::ZERO;
        }
        drained
    }

    /// Enough incoming points remain at level end to earn the bonus.
    pub fn bonus_requirement_met(&self) -> bool {
        self.incoming >= self.bonus_requirement
    }

    /// End-of-level bonus: when the requirement is met, `incoming * multiplier`
    /// (truncated) joins the incoming points. Returns the bonus, or `None`
    /// when the requirement is not met. The caller ensures once per level.
    pub fn award_level_bonus(&mut self) -> Option<u32> {
        if !self.bonus_requirement_met() {
            return None;
        }
        let bonus = (f64::from(self.incoming) * self.bonus_multiplier) as u32;
        if bonus > 0 {
            self.add_settled_increase(bonus);
        }
        Some(bonus)
    }

    /// Back to zero for a new game.
    pub fn reset(&mut self) {
        self.settled = 0;
        self.incoming = 0;
        self.timer = Duration::ZERO;
        self.fresh_award = false;
    }
}
