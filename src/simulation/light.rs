//! Periodic traffic light.
//!
//! Owns the light phase and the green signal. Every reader goes through this
//! handle; there is no process-wide light global, so several independent
//! simulations can coexist in one process.

use log::debug;

use super::signal::{WaitOutcome, WaitableSignal};
use super::vehicle::VehicleId;

/// Phase of the traffic light.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightState {
    Red,
    Green,
}

/// The light controlling the stop line.
///
/// Starts red with an unfired signal. Every `period` simulated seconds the
/// phase toggles: the signal fires exactly at the red-to-green edge and a
/// fresh one replaces it at the green-to-red edge.
#[derive(Debug)]
pub struct LightController {
    state: LightState,
    period: f32,
    signal: WaitableSignal,
}

impl LightController {
    pub fn new(period: f32) -> Self {
        Self {
            state: LightState::Red,
            period,
            signal: WaitableSignal::new(),
        }
    }

    pub fn state(&self) -> LightState {
        self.state
    }

    pub fn is_green(&self) -> bool {
        self.state == LightState::Green
    }

    /// Seconds each red and each green phase lasts.
    pub fn period(&self) -> f32 {
        self.period
    }

    /// Park `id` on the current green signal, or proceed if it already
    /// fired this cycle.
    pub fn wait_for_green(&mut self, id: VehicleId) -> WaitOutcome {
        self.signal.wait(id)
    }

    /// Toggle the phase. Returns the waiters released by a red-to-green
    /// edge, in arrival order; a green-to-red edge releases nobody and
    /// installs a fresh signal for the coming cycle.
    pub fn flip(&mut self) -> Vec<VehicleId> {
        match self.state {
            LightState::Red => {
                self.state = LightState::Green;
                debug!("light changed to green");
                // only the flip that actually latches the signal notifies
                if !self.signal.is_fired() {
                    self.signal.fire()
                } else {
                    Vec::new()
                }
            }
            LightState::Green => {
                self.state = LightState::Red;
                debug!("light changed to red");
                self.signal = WaitableSignal::new();
                Vec::new()
            }
        }
    }
}
