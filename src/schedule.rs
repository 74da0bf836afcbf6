//! Fixed-interval timers driven by explicit time deltas.

use std::time::Duration;

/// Fires once after `first`, then every `period`. Fed by [`Interval::advance`],
/// so the host loop decides how time passes and tests can step it exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    first: Duration,
    period: Duration,
    /// Time until the next firing.
    remaining: Duration,
}

impl Interval {
    /// `period` is clamped to at least one millisecond.
    pub fn new(first: Duration, period: Duration) -> Self {
        Self {
            first,
            period: period.max(Duration::from_millis(1)),
            remaining: first,
        }
    }

    /// Advance by `dt`; returns how many times the interval fired.
    pub fn advance(&mut self, dt: Duration) -> u32 {
        let mut fired = 0;
        let mut dt = dt;
        while dt >= self.remaining {
            dt -= self.remaining;
            self.remaining = self.period;
            fired += 1;
        }
        self.remaining -= dt;
        fired
    }

    /// Start over, waiting `first` again.
    pub fn reset(&mut self) {
        self.remaining = self.first;
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

/// One-shot countdown; at most one can be pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Countdown {
    remaining: Option<Duration>,
}

impl Countdown {
    /// Arm the countdown. No-op while one is already pending.
    pub fn start(&mut self, delay: Duration) -> bool {
        if self.remaining.is_some() {
            return false;
        }
        self.remaining = Some(delay);
        true
    }

    pub fn is_pending(&self) -> bool {
        self.remaining.is_some()
    }

    pub fn cancel(&mut self) {
        self.remaining = None;
    }

    /// Advance by `dt`; true exactly once, when the countdown expires.
    pub fn advance(&mut self, dt: Duration) -> bool {
        match self.remaining {
            Some(left) if dt >= left => {
                self.remaining = None;
                true
            }
            Some(left) => {
                self.remaining = Some(left - dt);
                false
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_interval_first_then_period() {
        let mut every = Interval::new(ms(500), ms(200));
        assert_eq!(every.advance(ms(499)), 0);
        assert_eq!(every.advance(ms(1)), 1);
        assert_eq!(every.advance(ms(199)), 0);
        assert_eq!(every.advance(ms(1)), 1);
        assert_eq!(every.advance(ms(650)), 3);
        assert_eq!(every.advance(ms(150)), 1);
    }

    #[test]
    fn test_interval_reset() {
        let mut every = Interval::new(ms(100), ms(10));
        every.advance(ms(150));
        every.reset();
        assert_eq!(every.advance(ms(99)), 0);
        assert_eq!(every.advance(ms(1)), 1);
    }

    #[test]
    fn test_zero_period_does_not_spin() {
        let mut every = Interval::new(Duration::ZERO, Duration::ZERO);
        assert_eq!(every.period(), ms(1));
        assert_eq!(every.advance(ms(3)), 4);
    }

    #[test]
    fn test_countdown_single_pending() {
        let mut next = Countdown::default();
        assert!(next.start(ms(2000)));
        assert!(!next.start(ms(10)));
        assert!(!next.advance(ms(1999)));
        assert!(next.advance(ms(1)));
        assert!(!next.is_pending());
        assert!(!next.advance(ms(5000)));
    }
}
