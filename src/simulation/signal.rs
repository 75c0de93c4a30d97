//! One-shot green-light gate.
//!
//! Standalone implementation with no scheduling dependency: the signal only
//! collects waiters and hands them back on fire; resuming them is the
//! caller's job.

use super::vehicle::VehicleId;

/// Outcome of waiting on a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The signal already fired; the caller proceeds immediately.
    Ready,
    /// The caller is parked until the signal fires.
    Suspended,
}

/// A one-shot gate that vehicle processes park on until it fires.
///
/// Once fired it stays fired. A new waitable condition means a fresh
/// instance; the light controller swaps one in on each red entry so waiters
/// from a previous cycle are never confused with current ones.
#[derive(Debug, Clone)]
pub enum WaitableSignal {
    Unfired(Vec<VehicleId>),
    Fired,
}

impl WaitableSignal {
    pub fn new() -> Self {
        WaitableSignal::Unfired(Vec::new())
    }

    pub fn is_fired(&self) -> bool {
        matches!(self, WaitableSignal::Fired)
    }

    /// Park `id` on the signal, or report `Ready` if it already fired.
    pub fn wait(&mut self, id: VehicleId) -> WaitOutcome {
        match self {
            WaitableSignal::Fired => WaitOutcome::Ready,
            WaitableSignal::Unfired(waiters) => {
                waiters.push(id);
                WaitOutcome::Suspended
            }
        }
    }

    /// Fire the signal, returning the parked waiters in arrival order.
    /// Firing an already-fired signal is a no-op and returns no waiters.
    pub fn fire(&mut self) -> Vec<VehicleId> {
        match std::mem::replace(self, WaitableSignal::Fired) {
            WaitableSignal::Unfired(waiters) => waiters,
            WaitableSignal::Fired => Vec::new(),
        }
    }
}

impl Default for WaitableSignal {
    fn default() -> Self {
        Self::new()
    }
}
