//! Systems for syncing Bevy entities with the scene

use bevy::prelude::*;
use std::collections::HashMap;

use super::components::{
    car_translation, CarLink, EntityMappings, HudText, LightIndicator, SimWorldResource,
    VisualSceneResource,
};
use crate::simulation::{LightState, VehicleId};

const CAR_COLOR: Color = Color::srgb(0.86, 0.24, 0.24);
const GREEN_LIGHT: Color = Color::srgb(0.24, 0.82, 0.24);
const RED_LIGHT: Color = Color::srgb(0.82, 0.20, 0.20);

/// System to advance the event core and the sync layer by the frame's
/// elapsed wall time
pub fn tick_scene(
    time: Res<Time>,
    mut sim: ResMut<SimWorldResource>,
    mut scene: ResMut<VisualSceneResource>,
) {
    scene.0.update(&mut sim.0, time.delta_secs());
}

/// System to sync car sprites from the scene views
pub fn sync_cars(
    mut commands: Commands,
    scene: Res<VisualSceneResource>,
    mut mappings: ResMut<EntityMappings>,
    mut car_query: Query<(Entity, &CarLink, &mut Transform)>,
) {
    let layout = scene.0.layout();

    // current position per live view
    let positions: HashMap<VehicleId, f32> =
        scene.0.views.iter().map(|v| (v.vehicle, v.x)).collect();

    // update existing sprites; despawn those whose view was retired
    for (entity, link, mut transform) in car_query.iter_mut() {
        match positions.get(&link.0) {
            Some(&x) => {
                transform.translation = car_translation(layout, x);
            }
            None => {
                commands.entity(entity).despawn();
                mappings.cars.remove(&link.0);
            }
        }
    }

    // spawn sprites for new views
    for view in &scene.0.views {
        if mappings.cars.contains_key(&view.vehicle) {
            continue;
        }
        let entity = commands
            .spawn((
                CarLink(view.vehicle),
                Sprite {
                    color: CAR_COLOR,
                    custom_size: Some(Vec2::new(layout.vehicle_len, layout.vehicle_wid)),
                    ..default()
                },
                Transform::from_translation(car_translation(layout, view.x)),
            ))
            .id();
        mappings.cars.insert(view.vehicle, entity);
    }
}

/// System to recolor the light indicator from the controller state
pub fn update_light_indicator(
    sim: Res<SimWorldResource>,
    indicator_query: Query<&MeshMaterial2d<ColorMaterial>, With<LightIndicator>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    for material_handle in indicator_query.iter() {
        if let Some(material) = materials.get_mut(&material_handle.0) {
            material.color = match sim.0.light_state() {
                LightState::Green => GREEN_LIGHT,
                LightState::Red => RED_LIGHT,
            };
        }
    }
}

/// System to refresh the HUD text
pub fn update_hud(
    sim: Res<SimWorldResource>,
    scene: Res<VisualSceneResource>,
    mut text_query: Query<(&HudText, &mut Text)>,
) {
    for (kind, mut text) in text_query.iter_mut() {
        match kind {
            HudText::LightAndCars => {
                let light = match sim.0.light_state() {
                    LightState::Green => "GREEN",
                    LightState::Red => "RED",
                };
                **text = format!("Light: {}    Cars: {}", light, scene.0.active_count());
            }
            HudText::Clock => {
                **text = format!(
                    "Sim time: {:.1}s / {:.0}s    Avg wait: {:.2}s",
                    sim.0.now(),
                    sim.0.config().sim_time,
                    sim.0.stats().average_wait()
                );
            }
        }
    }
}
