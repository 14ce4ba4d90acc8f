#![forbid(unsafe_code)]

//! Owned, replaceable one-shot deadlines.
//!
//! A [`Timeout`] is the only timer primitive in snapdeck. Each component owns
//! its own handles; scheduling always replaces the pending deadline, so a
//! stale expiry can never fire after a newer one was set. Components fire due
//! handles from their `poll(now)`/`tick(now)` methods, which keeps every
//! timing contract testable with a simulated clock.

use std::time::Duration;

use web_time::Instant;

/// A single pending deadline, or nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timeout {
    deadline: Option<Instant>,
}

impl Timeout {
    #[must_use]
    pub const fn new() -> Self {
        Self { deadline: None }
    }

    /// Arm the timeout to expire `after` from `now`, replacing any pending one.
    pub fn schedule(&mut self, now: Instant, after: Duration) {
        self.deadline = Some(now + after);
    }

    /// Drop the pending deadline, if any.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Pending deadline.
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Whether a deadline is armed and has not yet been reached at `now`.
    #[must_use]
    pub fn is_pending(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now < deadline)
    }

    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Fire the timeout if its deadline has been reached.
    ///
    /// Returns `true` exactly once per armed deadline; the handle is disarmed
    /// afterwards.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Earliest of several optional deadlines.
#[must_use]
pub fn earliest(deadlines: impl IntoIterator<Item = Option<Instant>>) -> Option<Instant> {
    deadlines.into_iter().flatten().min()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_100: Duration = Duration::from_millis(100);

    #[test]
    fn fires_once_at_deadline() {
        let t = Instant::now();
        let mut timeout = Timeout::new();
        timeout.schedule(t, MS_100);

        assert!(timeout.is_pending(t + Duration::from_millis(99)));
        assert!(!timeout.fire_if_due(t + Duration::from_millis(99)));
        assert!(timeout.fire_if_due(t + MS_100));
        assert!(!timeout.fire_if_due(t + MS_100));
        assert!(!timeout.is_armed());
    }

    #[test]
    fn reschedule_replaces_pending_deadline() {
        let t = Instant::now();
        let mut timeout = Timeout::new();
        timeout.schedule(t, MS_100);
        timeout.schedule(t + Duration::from_millis(50), MS_100);

        assert!(!timeout.fire_if_due(t + MS_100));
        assert!(timeout.fire_if_due(t + Duration::from_millis(150)));
    }

    #[test]
    fn cancel_disarms() {
        let t = Instant::now();
        let mut timeout = Timeout::new();
        timeout.schedule(t, MS_100);
        timeout.cancel();
        assert!(!timeout.fire_if_due(t + MS_100 * 2));
        assert_eq!(timeout.deadline(), None);
    }

    #[test]
    fn earliest_skips_unarmed() {
        let t = Instant::now();
        assert_eq!(earliest([None, Some(t + MS_100), Some(t)]), Some(t));
        assert_eq!(earliest([None, None]), None);
    }
}
