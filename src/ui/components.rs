//! UI components and resources for linking Bevy entities to the scene

use bevy::prelude::*;
use std::collections::HashMap;

use crate::simulation::{SimWorld, VehicleId};
use crate::visual::{SceneLayout, VisualScene};

/// Resource wrapper for the event core.
#[derive(Resource)]
pub struct SimWorldResource(pub SimWorld);

/// Resource wrapper for the frame-rate sync layer.
#[derive(Resource)]
pub struct VisualSceneResource(pub VisualScene);

/// Marker component for the light indicator disc.
#[derive(Component)]
pub struct LightIndicator;

/// Links a Bevy entity to a visual-side car.
#[derive(Component)]
pub struct CarLink(pub VehicleId);

/// Resource to track Bevy entities mapped to car views.
#[derive(Resource, Default)]
pub struct EntityMappings {
    pub cars: HashMap<VehicleId, Entity>,
}

/// Marker for HUD text lines.
#[derive(Component)]
pub enum HudText {
    /// Light phase and on-screen car count.
    LightAndCars,
    /// Simulated time and average wait.
    Clock,
}

/// Convert a pixel-frame center point (origin top-left, y down) to Bevy
/// world coordinates (origin center, y up).
pub fn frame_to_world(layout: &SceneLayout, center_x: f32, center_y: f32, z: f32) -> Vec3 {
    Vec3::new(
        center_x - layout.width / 2.0,
        layout.height / 2.0 - center_y,
        z,
    )
}

/// Translation of a car sprite whose left edge is at `x`.
pub fn car_translation(layout: &SceneLayout, x: f32) -> Vec3 {
    frame_to_world(layout, x + layout.vehicle_len / 2.0, layout.road_y, 0.5)
}
