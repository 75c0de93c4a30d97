//! Frame-rate visual layer.
//!
//! Derives on-screen car motion from the event core, one rendered frame at
//! a time. Everything here is plain state and arithmetic with no rendering
//! dependency, so the sync logic tests headlessly; the optional Bevy UI
//! only draws what this module computes.

mod layout;
mod scene;
mod view;

// Re-export public types for external use
// These may not be used within this crate but are part of the public API
#[allow(unused_imports)]
pub use layout::SceneLayout;
#[allow(unused_imports)]
pub use scene::VisualScene;
#[allow(unused_imports)]
pub use view::{MotionState, VehicleView};
