/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Caller-side reconnection backoff.
//!
//! The connection driver never reconnects on its own; callers decide when to
//! call `connect()` again from their close notification. This helper keeps
//! that policy in one place: each consecutive failure grows the wait by a
//! fixed step up to a cap, and a successful session resets it.

use std::time::Duration;

/// Default growth step between consecutive reconnect attempts.
pub const DEFAULT_STEP: Duration = Duration::from_secs(1);

/// Default ceiling for the reconnect delay.
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(30);

/// Capped growing-delay reconnection policy.
#[derive(Debug, Clone)]
pub struct ReconnectPolicy {
    step: Duration,
    max: Duration,
    current: Duration,
}

impl ReconnectPolicy {
    /// Creates a policy with the given step and cap.
    ///
    /// # Arguments
    /// * `step` - Added to the delay on every consecutive failure
    /// * `max` - Ceiling the delay never exceeds
    #[must_use]
    pub fn new(step: Duration, max: Duration) -> Self {
        Self {
            step,
            max,
            current: Duration::ZERO,
        }
    }

    /// Returns the delay to wait before the next `connect()` attempt.
    ///
    /// Grows by one step per call, saturating at the cap. The first call
    /// after a reset returns one step.
    pub fn next_delay(&mut self) -> Duration {
        self.current = (self.current + self.step).min(self.max);
        self.current
    }

    /// Resets the policy after a session was successfully established.
    pub fn reset(&mut self) {
        self.current = Duration::ZERO;
    }

    /// Returns the current delay without advancing it.
    #[must_use]
    pub const fn current(&self) -> Duration {
        self.current
    }
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_STEP, DEFAULT_MAX_DELAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_grows_by_step() {
        let mut policy = ReconnectPolicy::default();
        assert_eq!(policy.next_delay(), Duration::from_secs(1));
        assert_eq!(policy.next_delay(), Duration::from_secs(2));
        assert_eq!(policy.next_delay(), Duration::from_secs(3));
    }

    #[test]
    fn test_delay_saturates_at_cap() {
        let mut policy = ReconnectPolicy::new(Duration::from_secs(10), Duration::from_secs(25));
        assert_eq!(policy.next_delay(), Duration::from_secs(10));
        assert_eq!(policy.next_delay(), Duration::from_secs(20));
        assert_eq!(policy.next_delay(), Duration::from_secs(25));
        assert_eq!(policy.next_delay(), Duration::from_secs(25));
    }

    #[test]
    fn test_reset_starts_over() {
        let mut policy = ReconnectPolicy::default();
        let _ = policy.next_delay();
        let _ = policy.next_delay();
        policy.reset();
        assert_eq!(policy.current(), Duration::ZERO);
        assert_eq!(policy.next_delay(), Duration::from_secs(1));
    }
}
