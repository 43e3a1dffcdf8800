//! Tick scheduling
//!
//! The host calls [`TickScheduler::poll`] from its frame callback. A tick is
//! due once the fixed delay has passed since the previous one, so the
//! effective period is at least the delay and at most the delay plus one
//! frame. Missed time is never caught up with back-to-back ticks.

use crate::consts::TICK_INTERVAL_MS;

#[derive(Debug, Clone)]
pub struct TickScheduler {
    delay_ms: f64,
    next_due: Option<f64>,
}

impl Default for TickScheduler {
    fn default() -> Self {
        Self::new(TICK_INTERVAL_MS as f64)
    }
}

impl TickScheduler {
    pub fn new(delay_ms: f64) -> Self {
        Self {
            delay_ms: delay_ms.max(0.0),
            next_due: None,
        }
    }

    /// Forget the previous tick; the next poll fires immediately
    pub fn reset(&mut self) {
        self.next_due = None;
    }

    /// Returns true if a tick should run at frame time `now` (ms)
    pub fn poll(&mut self, now: f64) -> bool {
        match self.next_due {
            Some(due) if now < due => false,
            _ => {
                self.next_due = Some(now + self.delay_ms);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_poll_fires() {
        let mut sched = TickScheduler::default();
        assert!(sched.poll(1000.0));
        assert!(!sched.poll(1000.0));
        assert!(!sched.poll(1119.0));
        assert!(sched.poll(1120.0));
    }

    #[test]
    fn test_period_bounds_at_60hz() {
        let frame = 1000.0 / 60.0;
        let mut sched = TickScheduler::default();
        let mut fired = Vec::new();
        for i in 0..600 {
            let now = i as f64 * frame;
            if sched.poll(now) {
                fired.push(now);
            }
        }
        for pair in fired.windows(2) {
            let gap = pair[1] - pair[0];
            assert!(gap >= 120.0, "gap {} shorter than delay", gap);
            assert!(gap <= 120.0 + frame + 1e-9, "gap {} longer than delay + frame", gap);
        }
    }

    #[test]
    fn test_stall_does_not_burst() {
        let mut sched = TickScheduler::default();
        assert!(sched.poll(0.0));
        // Tab hidden for 5 seconds: one tick, not forty
        assert!(sched.poll(5000.0));
        assert!(!sched.poll(5016.0));
    }

    #[test]
    fn test_reset() {
        let mut sched = TickScheduler::default();
        assert!(sched.poll(0.0));
        sched.reset();
        assert!(sched.poll(10.0));
    }
}
