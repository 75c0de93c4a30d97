//! UI module that visualizes the scene using Bevy
//!
//! This module is purely for visualization - all simulation logic lives in
//! the `simulation` module and all motion derivation in `visual`. The UI
//! reads their state and draws it as 2D sprites.

mod components;
mod sync;
mod world;

use bevy::prelude::*;

pub use components::{EntityMappings, SimWorldResource, VisualSceneResource};

use crate::simulation::{SimConfig, SimWorld};
use crate::visual::{SceneLayout, VisualScene};
use sync::{sync_cars, tick_scene, update_hud, update_light_indicator};
use world::{setup_hud, setup_scene};

/// Plugin wiring one intersection scene into a Bevy app.
///
/// The config must already be validated; `main` rejects bad parameters
/// before the app is built.
pub struct StoplightUiPlugin {
    pub config: SimConfig,
    pub seed: Option<u64>,
}

impl Plugin for StoplightUiPlugin {
    fn build(&self, app: &mut App) {
        let mut world = match self.seed {
            Some(seed) => SimWorld::with_seed(self.config.clone(), seed),
            None => SimWorld::new(self.config.clone()),
        }
        .expect("configuration validated at startup");
        world.start();

        let layout = SceneLayout::default();
        let scene = match self.seed {
            Some(seed) => VisualScene::with_seed(layout, seed),
            None => VisualScene::new(layout),
        }
        .expect("default layout is valid");

        app.insert_resource(SimWorldResource(world))
            .insert_resource(VisualSceneResource(scene))
            .init_resource::<EntityMappings>()
            .add_systems(Startup, (setup_scene, setup_hud))
            .add_systems(
                Update,
                (
                    tick_scene,
                    sync_cars.after(tick_scene),
                    update_light_indicator,
                    update_hud,
                ),
            );
    }
}
