/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Keep-alive heartbeat scheduling.
//!
//! Every successful exchange re-arms a single deadline timer; if nothing
//! else re-arms it first, its firing forces an empty send-request that
//! refreshes the session id and detects a dead server. Arming supersedes
//! any previous timer, so only one heartbeat is ever pending.

use std::time::Duration;

/// Default heartbeat interval.
pub const DEFAULT_HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

/// Generation-based single-timer heartbeat schedule.
#[derive(Debug)]
pub struct HeartbeatSchedule {
    interval: Duration,
    generation: u64,
    armed: bool,
}

impl HeartbeatSchedule {
    /// Creates a schedule with the specified interval.
    ///
    /// # Arguments
    /// * `interval` - Time of inactivity after which a keep-alive fires
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            generation: 0,
            armed: false,
        }
    }

    /// Arms the deadline, superseding any previously armed timer.
    ///
    /// Returns the generation the caller should stamp the scheduled timer
    /// with.
    #[must_use]
    pub fn arm(&mut self) -> u64 {
        self.generation += 1;
        self.armed = true;
        self.generation
    }

    /// Answers whether a firing with this generation is the current one.
    ///
    /// A current firing disarms the schedule; stale firings are dropped.
    #[must_use]
    pub fn accepts(&mut self, generation: u64) -> bool {
        if self.armed && generation == self.generation {
            self.armed = false;
            return true;
        }
        false
    }

    /// Cancels the pending deadline, if any.
    pub fn cancel(&mut self) {
        self.armed = false;
        self.generation += 1;
    }

    /// Returns the heartbeat interval.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }
}

impl Default for HeartbeatSchedule {
    fn default() -> Self {
        Self::new(DEFAULT_HEARTBEAT_INTERVAL)
    }
}
