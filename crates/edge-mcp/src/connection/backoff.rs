//! Exponential reconnection backoff.

use std::time::{Duration, Instant};

/// Tracks reconnection attempts and the wait before the next one.
#[derive(Debug, Clone)]
pub struct Backoff {
    initial: Duration,
    max: Duration,
    current: Duration,
    attempts: u32,
    last_attempt: Option<Instant>,
}

impl Backoff {
    pub fn new(initial: Duration, max: Duration) -> Self {
        Self {
            initial,
            max,
            current: initial,
            attempts: 0,
            last_attempt: None,
        }
    }

    /// Whether an attempt is due at `now`.
    pub fn is_due(&self, now: Instant) -> bool {
        match self.last_attempt {
            None => true,
            Some(last) => now.saturating_duration_since(last) > self.current,
        }
    }

    /// Record an attempt if one is due. Returns whether it was recorded.
    ///
    /// Each recorded attempt doubles the wait, clamped to the maximum.
    pub fn try_attempt(&mut self, now: Instant) -> bool {
        if !self.is_due(now) {
            return false;
        }
        self.attempts = self.attempts.saturating_add(1);
        self.last_attempt = Some(now);
        self.current = self.current.saturating_mul(2).min(self.max);
        true
    }

    /// Back to the initial wait with no attempts recorded.
    pub fn reset(&mut self) {
        self.current = self.initial;
        self.attempts = 0;
        self.last_attempt = None;
    }

    pub fn current(&self) -> Duration {
        self.current
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn last_attempt(&self) -> Option<Instant> {
        self.last_attempt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const B0: Duration = Duration::from_millis(1000);
    const BMAX: Duration = Duration::from_millis(60_000);

    /// Record `n` attempts, each made once the previous wait has elapsed.
    fn run_attempts(backoff: &mut Backoff, start: Instant, n: u32) -> Instant {
        let mut now = start;
        for _ in 0..n {
            assert!(backoff.try_attempt(now));
            now += backoff.current() + Duration::from_millis(1);
        }
        now
    }

    #[test]
    fn test_doubles_and_clamps() {
        for n in 0..10u32 {
            let mut backoff = Backoff::new(B0, BMAX);
            run_attempts(&mut backoff, Instant::now(), n);
            let expected = (B0 * 2u32.pow(n)).min(BMAX);
            assert_eq!(backoff.current(), expected, "after {n} attempts");
            assert_eq!(backoff.attempts(), n);
        }
    }

    #[test]
    fn test_first_attempt_immediate() {
        let backoff = Backoff::new(B0, BMAX);
        assert!(backoff.is_due(Instant::now()));
    }

    #[test]
    fn test_waits_for_current_interval() {
        let start = Instant::now();
        let mut backoff = Backoff::new(B0, BMAX);
        assert!(backoff.try_attempt(start));
        // Wait is now 2s; exactly 2s is not enough, the elapsed time must exceed it.
        assert!(!backoff.try_attempt(start + Duration::from_secs(1)));
        assert!(!backoff.try_attempt(start + Duration::from_secs(2)));
        assert!(backoff.try_attempt(start + Duration::from_millis(2001)));
        assert_eq!(backoff.attempts(), 2);
    }

    #[test]
    fn test_counters_saturate() {
        let mut backoff = Backoff {
            attempts: u32::MAX,
            ..Backoff::new(B0, BMAX)
        };
        assert!(backoff.try_attempt(Instant::now()));
        assert_eq!(backoff.attempts(), u32::MAX);
        assert_eq!(backoff.current(), B0 * 2);
    }

    #[test]
    fn test_reset() {
        let mut backoff = Backoff::new(B0, BMAX);
        run_attempts(&mut backoff, Instant::now(), 5);
        backoff.reset();
        assert_eq!(backoff.current(), B0);
        assert_eq!(backoff.attempts(), 0);
        assert!(backoff.last_attempt().is_none());
    }
}
