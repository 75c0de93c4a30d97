//! The event core tying everything together.
//!
//! Owns the clock, the light, the crossing slot, the arrival generator, and
//! every vehicle record, and runs the cooperative dispatch loop that resumes
//! suspended vehicle protocols. Scheduling is fully deterministic: wakeups
//! fire in `(time, registration)` order, so a seeded run always produces the
//! same departures.

use anyhow::{Context, Result};
use log::{info, warn};
use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;
use std::collections::HashMap;

use super::clock::EventClock;
use super::config::SimConfig;
use super::generator::ArrivalGenerator;
use super::light::{LightController, LightState};
use super::resource::{Acquire, CrossingResource};
use super::signal::WaitOutcome;
use super::vehicle::{ProtocolState, Vehicle, VehicleId};

/// A pending wakeup target in the event queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Wakeup {
    /// Toggle the light phase and reschedule the next toggle.
    FlipLight,
    /// Spawn the next vehicle and reschedule the generator.
    NextArrival,
    /// Resume a suspended vehicle protocol.
    ResumeVehicle(VehicleId),
}

/// Aggregate wait statistics across departed vehicles.
#[derive(Debug, Clone, Copy, Default)]
pub struct WaitStats {
    pub completed: usize,
    pub total_wait: f32,
}

impl WaitStats {
    fn record(&mut self, wait: f32) {
        self.completed += 1;
        self.total_wait += wait;
    }

    /// Mean seconds from arrival to departure; zero before any departure.
    pub fn average_wait(&self) -> f32 {
        if self.completed == 0 {
            0.0
        } else {
            self.total_wait / self.completed as f32
        }
    }
}

/// The event core for one intersection run.
pub struct SimWorld {
    clock: EventClock<Wakeup>,
    light: LightController,
    resource: CrossingResource,
    generator: ArrivalGenerator,

    /// Every vehicle ever spawned, kept for the whole run so a visual view
    /// can never reference a missing record.
    vehicles: HashMap<VehicleId, Vehicle>,

    /// Spawn notifications not yet collected by the visual layer.
    newly_spawned: Vec<VehicleId>,

    stats: WaitStats,
    config: SimConfig,

    /// Optional seeded RNG for reproducible simulations.
    rng: Option<StdRng>,

    started: bool,
}

impl SimWorld {
    fn new_internal(config: SimConfig, rng: Option<StdRng>) -> Result<Self> {
        config.validate().context("invalid simulation config")?;
        Ok(Self {
            clock: EventClock::new(),
            light: LightController::new(config.light_period),
            resource: CrossingResource::new(config.capacity),
            generator: ArrivalGenerator::new(config.arrival_min, config.arrival_max),
            vehicles: HashMap::new(),
            newly_spawned: Vec::new(),
            stats: WaitStats::default(),
            config,
            rng,
            started: false,
        })
    }

    pub fn new(config: SimConfig) -> Result<Self> {
        Self::new_internal(config, None)
    }

    /// Create a world with a seeded RNG for reproducible simulations.
    pub fn with_seed(config: SimConfig, seed: u64) -> Result<Self> {
        Self::new_internal(config, Some(StdRng::seed_from_u64(seed)))
    }

    /// Draw the next inter-arrival delay, using the seeded RNG if available.
    fn random_interval(&mut self) -> f32 {
        let (min, max) = self.generator.interval_bounds();
        let secs = match &mut self.rng {
            Some(rng) => rng.random_range(min..=max),
            None => rand::rng().random_range(min..=max),
        };
        secs as f32
    }

    pub fn now(&self) -> f32 {
        self.clock.now()
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn light_state(&self) -> LightState {
        self.light.state()
    }

    pub fn is_green(&self) -> bool {
        self.light.is_green()
    }

    /// Read-only view of the crossing slot state.
    pub fn resource(&self) -> &CrossingResource {
        &self.resource
    }

    pub fn stats(&self) -> WaitStats {
        self.stats
    }

    pub fn vehicle(&self, id: VehicleId) -> Option<&Vehicle> {
        self.vehicles.get(&id)
    }

    pub fn vehicles(&self) -> impl Iterator<Item = &Vehicle> {
        self.vehicles.values()
    }

    /// Vehicles whose protocol has not finished yet.
    pub fn active_vehicle_count(&self) -> usize {
        self.vehicles
            .values()
            .filter(|v| v.protocol != ProtocolState::Done)
            .count()
    }

    /// Schedule the light toggle and the first arrival. Idempotent; must
    /// run before the first advance.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        self.clock
            .schedule_after(self.config.light_period, Wakeup::FlipLight);
        let first = self.random_interval();
        self.clock.schedule_after(first, Wakeup::NextArrival);
    }

    /// Advance simulated time to `limit`, dispatching every wakeup due at
    /// or before it in `(time, registration)` order, then settle the clock
    /// at `limit`. Never blocks on wall time.
    pub fn advance_to(&mut self, limit: f32) {
        while let Some(wakeup) = self.clock.pop_due(limit) {
            self.dispatch(wakeup);
        }
        self.clock.finish_advance(limit);
    }

    fn dispatch(&mut self, wakeup: Wakeup) {
        match wakeup {
            Wakeup::FlipLight => {
                let released = self.light.flip();
                for id in released {
                    self.clock.schedule_now(Wakeup::ResumeVehicle(id));
                }
                self.clock
                    .schedule_after(self.config.light_period, Wakeup::FlipLight);
            }
            Wakeup::NextArrival => {
                self.spawn_vehicle();
                let next = self.random_interval();
                self.clock.schedule_after(next, Wakeup::NextArrival);
            }
            Wakeup::ResumeVehicle(id) => {
                if let Err(err) = self.resume_vehicle(id) {
                    // fatal to this vehicle's process only, not the run
                    warn!("car {} aborted: {:#}", id.0, err);
                    if let Some(vehicle) = self.vehicles.get_mut(&id) {
                        vehicle.protocol = ProtocolState::Done;
                    }
                }
            }
        }
    }

    /// Create a vehicle arriving now, record the spawn notification, and
    /// start its intersection protocol.
    pub fn spawn_vehicle(&mut self) -> VehicleId {
        let vehicle = self.generator.spawn(self.clock.now());
        let id = vehicle.id;
        info!("car {} arrived at {:.2}", id.0, vehicle.arrival_time);
        self.vehicles.insert(id, vehicle);
        // the spawn notification precedes the first protocol step
        self.newly_spawned.push(id);
        if let Err(err) = self.start_protocol(id) {
            warn!("car {} aborted: {:#}", id.0, err);
            if let Some(vehicle) = self.vehicles.get_mut(&id) {
                vehicle.protocol = ProtocolState::Done;
            }
        }
        id
    }

    /// Take the ids of vehicles spawned since the last call, in spawn
    /// order. Each vehicle is reported exactly once; this is the visual
    /// layer's only view-creation path.
    pub fn drain_spawned(&mut self) -> Vec<VehicleId> {
        std::mem::take(&mut self.newly_spawned)
    }

    // --- intersection protocol -------------------------------------------
    //
    // One function per segment between suspension points. `resume_vehicle`
    // is the continuation dispatcher: the stored protocol state says which
    // suspension the vehicle is returning from.

    fn start_protocol(&mut self, id: VehicleId) -> Result<()> {
        if self.light.is_green() {
            self.request_slot(id)
        } else {
            self.park_for_green(id, ProtocolState::AwaitingGreen)
        }
    }

    fn resume_vehicle(&mut self, id: VehicleId) -> Result<()> {
        let state = self
            .vehicles
            .get(&id)
            .context("resumed a vehicle with no record")?
            .protocol;
        match state {
            // released by the green signal; now contend for a slot
            ProtocolState::AwaitingGreen => self.request_slot(id),
            // handed a slot by a release; the light may have flipped back
            ProtocolState::AwaitingSlot => self.recheck_light(id),
            // green again while already holding a slot
            ProtocolState::AwaitingGreenWithSlot => self.begin_crossing(id),
            // crossing timeout expired
            ProtocolState::Crossing => self.finish_crossing(id),
            ProtocolState::Done => {
                warn!("car {} resumed after finishing", id.0);
                Ok(())
            }
        }
    }

    fn park_for_green(&mut self, id: VehicleId, parked: ProtocolState) -> Result<()> {
        self.set_protocol(id, parked)?;
        // a red phase always carries an unfired signal
        let outcome = self.light.wait_for_green(id);
        debug_assert_eq!(outcome, WaitOutcome::Suspended, "red light with a fired signal");
        Ok(())
    }

    fn request_slot(&mut self, id: VehicleId) -> Result<()> {
        match self.resource.acquire(id) {
            Acquire::Granted => self.recheck_light(id),
            Acquire::Queued => self.set_protocol(id, ProtocolState::AwaitingSlot),
        }
    }

    /// The light may have flipped back to red while the vehicle queued for
    /// its slot; a stale green is never trusted.
    fn recheck_light(&mut self, id: VehicleId) -> Result<()> {
        if self.light.is_green() {
            self.begin_crossing(id)
        } else {
            self.park_for_green(id, ProtocolState::AwaitingGreenWithSlot)
        }
    }

    fn begin_crossing(&mut self, id: VehicleId) -> Result<()> {
        debug_assert!(self.light.is_green(), "crossing permitted under a red light");
        let vehicle = self
            .vehicles
            .get_mut(&id)
            .context("permitting a vehicle with no record")?;
        debug_assert!(!vehicle.crossing_permitted, "permission latch set twice");
        vehicle.crossing_permitted = true;
        vehicle.protocol = ProtocolState::Crossing;
        self.clock
            .schedule_after(self.config.cross_time, Wakeup::ResumeVehicle(id));
        Ok(())
    }

    fn finish_crossing(&mut self, id: VehicleId) -> Result<()> {
        let now = self.clock.now();
        let vehicle = self
            .vehicles
            .get_mut(&id)
            .context("finishing a vehicle with no record")?;
        vehicle.departure_time = Some(now);
        vehicle.protocol = ProtocolState::Done;
        let wait = now - vehicle.arrival_time;
        self.stats.record(wait);
        info!("car {} departed at {:.2} after waiting {:.2}", id.0, now, wait);

        if let Some(next) = self.resource.release().context("crossing slot release")? {
            // the freed slot passes straight to the wait-list head
            self.clock.schedule_now(Wakeup::ResumeVehicle(next));
        }
        Ok(())
    }

    fn set_protocol(&mut self, id: VehicleId, state: ProtocolState) -> Result<()> {
        let vehicle = self
            .vehicles
            .get_mut(&id)
            .context("updating a vehicle with no record")?;
        vehicle.protocol = state;
        Ok(())
    }

    /// Print a summary of the run state.
    pub fn print_summary(&self) {
        println!("=== Intersection Summary ===");
        println!("Time: {:.2}s  Light: {:?}", self.clock.now(), self.light.state());
        println!(
            "Cars spawned: {}  departed: {}  active: {}",
            self.generator.spawned_count(),
            self.stats.completed,
            self.active_vehicle_count()
        );
        println!(
            "Waiting for a slot: {}  holding: {}/{}",
            self.resource.queue_len(),
            self.resource.held(),
            self.resource.capacity()
        );
        println!("Average wait: {:.2}s", self.stats.average_wait());
    }
}
