//! Frame-rate sync layer deriving car motion from the event core.
//!
//! Runs once per rendered frame: advances the event clock by the frame's
//! elapsed wall time (simulated time tracks wall time 1:1, capped at the
//! run ceiling), then re-derives every car's on-screen state from the
//! light and permission snapshots. Data flows one way across this
//! boundary: the scene reads the event core and never writes it.

use std::collections::VecDeque;

use anyhow::{Context, Result};
use log::error;
use ordered_float::OrderedFloat;
use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;

use crate::simulation::{SimWorld, VehicleId};

use super::layout::SceneLayout;
use super::view::{MotionState, VehicleView};

/// All visual state for one intersection scene.
pub struct VisualScene {
    layout: SceneLayout,

    /// Every car on screen, in spawn order.
    pub views: Vec<VehicleView>,

    /// Cars stopped at the light, ordered by ascending on-screen position.
    /// Join order is position order, not arrival order.
    queue: VecDeque<VehicleId>,

    /// Optional seeded RNG for reproducible spawn jitter.
    rng: Option<StdRng>,
}

impl VisualScene {
    fn new_internal(layout: SceneLayout, rng: Option<StdRng>) -> Result<Self> {
        layout.validate().context("invalid scene layout")?;
        Ok(Self {
            layout,
            views: Vec::new(),
            queue: VecDeque::new(),
            rng,
        })
    }

    pub fn new(layout: SceneLayout) -> Result<Self> {
        Self::new_internal(layout, None)
    }

    /// Create a scene with a seeded RNG for reproducible spawn jitter.
    pub fn with_seed(layout: SceneLayout, seed: u64) -> Result<Self> {
        Self::new_internal(layout, Some(StdRng::seed_from_u64(seed)))
    }

    pub fn layout(&self) -> &SceneLayout {
        &self.layout
    }

    /// Ids of the cars stopped at the light, front first.
    pub fn queued(&self) -> impl Iterator<Item = VehicleId> + '_ {
        self.queue.iter().copied()
    }

    /// Cars currently on screen.
    pub fn active_count(&self) -> usize {
        self.views.len()
    }

    /// Advance one frame: `dt` is the elapsed wall time since the previous
    /// frame, in seconds.
    pub fn update(&mut self, sim: &mut SimWorld, dt: f32) {
        // lockstep: simulated time tracks wall time 1:1, capped at the ceiling
        let ceiling = sim.config().sim_time;
        if sim.now() < ceiling {
            sim.advance_to((sim.now() + dt).min(ceiling));
        }

        self.spawn_views(sim);
        self.advance_approaching(sim, dt);
        self.rebuild_queue(sim);
        self.ease_queued(dt);
        self.release_front(sim);
        self.advance_crossing(dt);
        self.retire_offscreen();
    }

    /// Create a view for every vehicle spawned since the last frame,
    /// starting just off the left edge with a random setback.
    fn spawn_views(&mut self, sim: &mut SimWorld) {
        for id in sim.drain_spawned() {
            let setback = self.random_setback();
            let x = -self.layout.vehicle_len - setback;
            let front_slot = self.layout.slot_position(0);
            self.views.push(VehicleView::new(id, x, front_slot));
        }
    }

    fn random_setback(&mut self) -> f32 {
        let max = self.layout.spawn_jitter;
        let px = match &mut self.rng {
            Some(rng) => rng.random_range(0..=max),
            None => rand::rng().random_range(0..=max),
        };
        px as f32
    }

    /// Approaching cars drive freely only under a green light with an empty
    /// queue; otherwise they clamp at the stop line so they never overlap
    /// the queue or cross on red.
    fn advance_approaching(&mut self, sim: &SimWorld, dt: f32) {
        let free_run = sim.is_green() && self.queue.is_empty();
        let front_limit = self.layout.stop_line - self.layout.vehicle_len;
        for view in &mut self.views {
            if view.state != MotionState::Approaching {
                continue;
            }
            let next = view.x + self.layout.approach_speed * dt;
            view.x = if free_run { next } else { next.min(front_limit) };
        }
    }

    /// Keep the existing queue, then promote approaching cars that have
    /// reached the next free slot. Join order is ascending on-screen
    /// position, not arrival order.
    fn rebuild_queue(&mut self, sim: &SimWorld) {
        let views = &self.views;
        self.queue
            .retain(|id| views.iter().any(|v| v.vehicle == *id && v.state == MotionState::Queued));

        // the queue only forms under red, or behind cars already stopped
        if sim.is_green() && self.queue.is_empty() {
            return;
        }

        let mut approaching: Vec<usize> = self
            .views
            .iter()
            .enumerate()
            .filter(|(_, v)| v.state == MotionState::Approaching)
            .map(|(i, _)| i)
            .collect();
        approaching.sort_by_key(|&i| OrderedFloat(self.views[i].x));

        let mut next_slot = self.queue.len();
        for i in approaching {
            let target = self.layout.slot_position(next_slot);
            let view = &mut self.views[i];
            if view.leading_edge(self.layout.vehicle_len) >= target {
                view.state = MotionState::Queued;
                view.target_stop_x = target;
                self.queue.push_back(view.vehicle);
                next_slot += 1;
            }
        }
    }

    /// Queued cars ease toward their slot at approach speed, never
    /// overshooting; a car past its slot snaps back onto it.
    fn ease_queued(&mut self, dt: f32) {
        for view in &mut self.views {
            if view.state != MotionState::Queued {
                continue;
            }
            if view.x < view.target_stop_x {
                view.x = (view.x + self.layout.approach_speed * dt).min(view.target_stop_x);
            } else {
                view.x = view.target_stop_x;
            }
        }
    }

    /// The queue front starts crossing once its vehicle holds crossing
    /// permission in the event core.
    fn release_front(&mut self, sim: &SimWorld) {
        let Some(&front) = self.queue.front() else {
            return;
        };
        let Some(vehicle) = sim.vehicle(front) else {
            // a view outliving its vehicle record is a logic defect; drop
            // the view rather than mask it with a retry
            error!("car view {} has no vehicle record", front.0);
            self.queue.pop_front();
            if let Some(view) = self.views.iter_mut().find(|v| v.vehicle == front) {
                view.state = MotionState::Done;
            }
            return;
        };
        if vehicle.crossing_permitted {
            self.queue.pop_front();
            if let Some(view) = self.views.iter_mut().find(|v| v.vehicle == front) {
                view.state = MotionState::Crossing;
            }
        }
    }

    /// Crossing cars move at crossing speed from the frame they are
    /// released, including the release frame itself.
    fn advance_crossing(&mut self, dt: f32) {
        let gone = self.layout.offscreen_x();
        for view in &mut self.views {
            if view.state != MotionState::Crossing {
                continue;
            }
            view.x += self.layout.cross_speed * dt;
            if view.x > gone {
                view.state = MotionState::Done;
            }
        }
    }

    /// Drop finished cars, and any car that has left the frame in some
    /// other state (a green-light pass-through never stops being
    /// `Approaching`).
    fn retire_offscreen(&mut self) {
        let gone = self.layout.offscreen_x();
        self.views
            .retain(|v| v.state != MotionState::Done && v.x <= gone);
    }
}
