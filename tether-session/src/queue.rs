/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Outbound queue and flush debouncing.
//!
//! `send()` calls append envelopes here; a short single-shot debounce timer
//! coalesces bursts into one network round trip. The queue is drained the
//! moment a send-request is dispatched, before its outcome is known: delivery
//! is at-most-once per enqueue and an envelope is never re-queued on failure.

use tether_core::Envelope;

/// Ordered, unbounded queue of pending outbound envelopes.
#[derive(Debug, Default)]
pub struct OutboundQueue {
    items: Vec<Envelope>,
}

impl OutboundQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Appends an envelope, preserving insertion order.
    pub fn push(&mut self, envelope: Envelope) {
        self.items.push(envelope);
    }

    /// Empties the queue and returns the batch accumulated since the
    /// previous flush.
    #[must_use]
    pub fn drain(&mut self) -> Vec<Envelope> {
        std::mem::take(&mut self.items)
    }

    /// Discards all pending envelopes.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Returns the number of pending envelopes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true when nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Debounce gate for the flush timer.
///
/// At most one flush timer is armed at a time; re-arming while armed is a
/// no-op. Firings carry the generation they were armed with, so a reset
/// (`cancel_all`) invalidates every timer still in flight.
#[derive(Debug, Default)]
pub struct FlushGate {
    armed: bool,
    generation: u64,
}

impl FlushGate {
    /// Creates a disarmed gate.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms the gate.
    ///
    /// Returns the generation to schedule a timer for, or `None` when a
    /// timer is already pending.
    #[must_use]
    pub fn arm(&mut self) -> Option<u64> {
        if self.armed {
            return None;
        }
        self.armed = true;
        self.generation += 1;
        Some(self.generation)
    }

    /// Records a timer firing.
    ///
    /// Disarms the gate and returns true when the firing is current; stale
    /// firings (superseded by `cancel_all`) return false and are dropped by
    /// the caller.
    #[must_use]
    pub fn fired(&mut self, generation: u64) -> bool {
        if generation != self.generation {
            return false;
        }
        self.armed = false;
        true
    }

    /// Invalidates every outstanding firing and disarms the gate.
    pub fn cancel_all(&mut self) {
        self.armed = false;
        self.generation += 1;
    }

    /// Returns true while a timer is pending.
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.armed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_queue_preserves_insertion_order() {
        let mut queue = OutboundQueue::new();
        queue.push(Envelope::new("a", json!(1)));
        queue.push(Envelope::new("b", json!(2)));

        let batch = queue.drain();
        assert_eq!(batch[0].name, "a");
        assert_eq!(batch[1].name, "b");
        assert!(queue.is_empty());
    }

    #[test]
    fn test_drain_empties_before_outcome_is_known() {
        let mut queue = OutboundQueue::new();
        queue.push(Envelope::new("a", json!(null)));
        let _batch = queue.drain();
        // Nothing to re-queue: at-most-once.
        assert_eq!(queue.len(), 0);
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn test_flush_gate_arms_once() {
        let mut gate = FlushGate::new();
        let first = gate.arm();
        assert!(first.is_some());
        assert!(gate.arm().is_none());
        assert!(gate.is_armed());
    }

    #[test]
    fn test_flush_gate_fire_then_rearm() {
        let mut gate = FlushGate::new();
        let generation = gate.arm().unwrap();
        assert!(gate.fired(generation));
        assert!(!gate.is_armed());

        let next = gate.arm().unwrap();
        assert_ne!(next, generation);
    }

    #[test]
    fn test_cancel_all_invalidates_pending_firing() {
        let mut gate = FlushGate::new();
        let generation = gate.arm().unwrap();
        gate.cancel_all();
        assert!(!gate.fired(generation));

        // A fresh arming works and its firing is accepted.
        let next = gate.arm().unwrap();
        assert!(gate.fired(next));
    }
}
