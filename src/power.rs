//! Power budget: limited "free removals" for tiles that have no match.

/// Invariant: `current <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerBudget {
    current: u32,
    max: u32,
    /// One use is earned each time the settled score reaches a multiple of this.
    score_requirement: u32,
}

impl PowerBudget {
    pub fn new(starting: u32, max: u32, score_requirement: u32) -> Self {
        Self {
            current: starting.min(max),
            max,
            score_requirement: score_requirement.max(1),
        }
    }

    #[inline]
    pub fn current(&self) -> u32 {
        self.current
    }

    #[inline]
    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn is_full(&self) -> bool {
        self.current == self.max
    }

    pub fn is_exhausted(&self) -> bool {
        self.current == 0
    }

    /// Spend one use. Refused (returns false, nothing changes) when exhausted.
    pub fn try_use(&mut self) -> bool {
        if self.current == 0 {
            return false;
        }
        self.current -= 1;
        true
    }

    /// Earn one use unless already at max.
    pub fn gain(&mut self) -> bool {
        if self.current >= self.max {
            return false;
        }
        self.current += 1;
        true
    }

    /// Score milestones passed when the settled score went from `before` to
    /// `after`: multiples of the requirement in `(before, after]`.
    pub fn milestones_between(&self, before: u32, after: u32) -> u32 {
        if after <= before {
            return 0;
        }
        after / self.score_requirement - before / self.score_requirement
    }

    /// Apply a settled-score change; returns the uses actually gained (capped at max).
    pub fn on_score_settled(&mut self, before: u32, after: u32) -> u32 {
        (0..self.milestones_between(before, after))
            .filter(|_| self.gain())
            .count() as u32
    }

    /// Restore a new-game budget.
    pub fn reset(&mut self, starting: u32) {
        self.current = starting.min(self.max);
    }
}
