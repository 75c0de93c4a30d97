//! Stoplight Simulation Library
//!
//! A single-lane intersection governed by a periodic traffic light. The
//! `simulation` module is a discrete-event core advancing in simulated time;
//! the `visual` module derives on-screen car motion from it one frame at a
//! time. Both run independently of the optional Bevy UI.

pub mod simulation;
pub mod visual;

#[cfg(feature = "ui")]
pub mod ui;
