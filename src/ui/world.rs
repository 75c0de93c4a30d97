//! Scene setup systems: camera, road, stop line, light indicator, HUD

use bevy::prelude::*;

use super::components::{frame_to_world, HudText, LightIndicator, VisualSceneResource};

const ROAD_COLOR: Color = Color::srgb(0.24, 0.27, 0.30);
const DASH_COLOR: Color = Color::srgb(0.95, 0.91, 0.19);
const RED_LIGHT: Color = Color::srgb(0.82, 0.20, 0.20);

/// System to set up the static scenery
pub fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    scene: Res<VisualSceneResource>,
) {
    let layout = scene.0.layout().clone();
    let road_top = layout.height / 4.0 + 50.0;
    let road_height = 100.0;

    commands.spawn(Camera2d);

    // road surface
    commands.spawn((
        Sprite {
            color: ROAD_COLOR,
            custom_size: Some(Vec2::new(layout.width, road_height)),
            ..default()
        },
        Transform::from_translation(frame_to_world(
            &layout,
            layout.width / 2.0,
            road_top + road_height / 2.0,
            0.0,
        )),
    ));

    // center dashed line
    let dash = Vec2::new(25.0, 5.0);
    let mut x = 0.0;
    while x < layout.width {
        commands.spawn((
            Sprite {
                color: DASH_COLOR,
                custom_size: Some(dash),
                ..default()
            },
            Transform::from_translation(frame_to_world(
                &layout,
                x + dash.x / 2.0,
                layout.height / 2.0 + dash.y / 2.0,
                0.1,
            )),
        ));
        x += 50.0;
    }

    // stop line
    commands.spawn((
        Sprite {
            color: Color::WHITE,
            custom_size: Some(Vec2::new(5.0, road_height)),
            ..default()
        },
        Transform::from_translation(frame_to_world(
            &layout,
            layout.stop_line + 2.5,
            road_top + road_height / 2.0,
            0.2,
        )),
    ));

    // light indicator; red at startup to match the controller
    commands.spawn((
        LightIndicator,
        Mesh2d(meshes.add(Circle::new(10.0))),
        MeshMaterial2d(materials.add(RED_LIGHT)),
        Transform::from_translation(frame_to_world(
            &layout,
            layout.stop_line + 60.0,
            layout.height / 4.0 + 75.0,
            0.3,
        )),
    ));
}

/// System to set up the HUD text overlay
pub fn setup_hud(mut commands: Commands) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(8.0),
                left: Val::Px(8.0),
                flex_direction: FlexDirection::Column,
                padding: UiRect::all(Val::Px(4.0)),
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.5)),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("Light: RED    Cars: 0"),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(Color::srgb(0.86, 0.86, 0.86)),
                HudText::LightAndCars,
            ));
            parent.spawn((
                Text::new("Sim time: 0.0s"),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(Color::srgb(0.86, 0.86, 0.86)),
                HudText::Clock,
            ));
        });
}
