//! Scene geometry and kinematics.

use anyhow::{bail, Result};

/// Pixel-space geometry and speeds, supplied at start and immutable for
/// the run. The coordinate frame is the classic screen frame: x grows
/// rightward from the left edge, cars drive in +x.
#[derive(Debug, Clone)]
pub struct SceneLayout {
    /// Frame width in pixels; cars despawn past it.
    pub width: f32,
    /// Frame height in pixels (rendering only).
    pub height: f32,
    /// Road centerline y (rendering only).
    pub road_y: f32,
    /// X of the stop line.
    pub stop_line: f32,
    /// Car length in pixels, along the road.
    pub vehicle_len: f32,
    /// Car width in pixels, across the road.
    pub vehicle_wid: f32,
    /// Gap between stopped cars.
    pub vehicle_gap: f32,
    /// Speed while approaching or easing into a slot, px/s.
    pub approach_speed: f32,
    /// Speed while crossing the intersection, px/s.
    pub cross_speed: f32,
    /// Maximum random offset behind the left edge at spawn, pixels.
    pub spawn_jitter: u32,
    /// How far past the right edge a car must be before it despawns.
    pub despawn_margin: f32,
}

impl Default for SceneLayout {
    fn default() -> Self {
        let width = 640.0;
        let height = 360.0;
        Self {
            width,
            height,
            road_y: height / 2.0 + 15.0,
            stop_line: width / 2.0 - 20.0,
            vehicle_len: 40.0,
            vehicle_wid: 22.0,
            vehicle_gap: 10.0,
            approach_speed: 180.0,
            cross_speed: 220.0,
            spawn_jitter: 60,
            despawn_margin: 10.0,
        }
    }
}

impl SceneLayout {
    /// Target x (left edge) of the k-th stopped car, front of the queue
    /// first: `stop_line − len − k·(len + gap)`.
    pub fn slot_position(&self, index: usize) -> f32 {
        self.stop_line - self.vehicle_len - index as f32 * (self.vehicle_len + self.vehicle_gap)
    }

    /// X past which a car counts as fully off screen.
    pub fn offscreen_x(&self) -> f32 {
        self.width + self.despawn_margin
    }

    /// Reject unusable geometry before the run starts.
    pub fn validate(&self) -> Result<()> {
        if self.width <= 0.0 || self.height <= 0.0 {
            bail!("frame dimensions must be positive");
        }
        if self.vehicle_len <= 0.0 || self.vehicle_wid <= 0.0 {
            bail!("vehicle dimensions must be positive");
        }
        if self.vehicle_gap < 0.0 {
            bail!("vehicle gap cannot be negative, got {}", self.vehicle_gap);
        }
        if self.approach_speed <= 0.0 || self.cross_speed <= 0.0 {
            bail!("speeds must be positive");
        }
        Ok(())
    }
}
