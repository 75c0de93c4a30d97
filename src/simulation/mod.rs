//! Standalone intersection simulation module
//!
//! This module contains the discrete-event core of the simulation: the
//! clock, the traffic light, the crossing slot, and the per-vehicle
//! intersection protocol. It runs and tests from the console without any
//! rendering dependency.

mod clock;
mod config;
mod generator;
mod light;
mod resource;
mod signal;
mod vehicle;
mod world;

// Re-export public types for external use
// These may not be used within this crate but are part of the public API
#[allow(unused_imports)]
pub use clock::EventClock;
#[allow(unused_imports)]
pub use config::SimConfig;
#[allow(unused_imports)]
pub use generator::ArrivalGenerator;
#[allow(unused_imports)]
pub use light::{LightController, LightState};
#[allow(unused_imports)]
pub use resource::{Acquire, CrossingResource};
#[allow(unused_imports)]
pub use signal::{WaitOutcome, WaitableSignal};
#[allow(unused_imports)]
pub use vehicle::{ProtocolState, Vehicle, VehicleId};
pub use world::{SimWorld, WaitStats};
