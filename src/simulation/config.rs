//! Run parameters for the event core.

use anyhow::{bail, Result};

/// Event-side parameters, supplied at start and immutable for the run.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Seconds each red and each green phase lasts.
    pub light_period: f32,
    /// Number of crossing slots; 1 models a single lane.
    pub capacity: usize,
    /// Inclusive lower bound (seconds) of the uniform inter-arrival draw.
    pub arrival_min: u32,
    /// Inclusive upper bound (seconds) of the uniform inter-arrival draw.
    pub arrival_max: u32,
    /// Seconds a vehicle holds its slot to clear the intersection.
    pub cross_time: f32,
    /// Run ceiling in simulated seconds.
    pub sim_time: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            light_period: 6.0,
            capacity: 1,
            arrival_min: 1,
            arrival_max: 5,
            cross_time: 1.2,
            sim_time: 120.0,
        }
    }
}

impl SimConfig {
    /// Reject unusable parameters before the run starts.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            bail!("capacity must be at least 1");
        }
        if self.light_period <= 0.0 {
            bail!("light period must be positive, got {}", self.light_period);
        }
        if self.cross_time < 0.0 {
            bail!("crossing duration cannot be negative, got {}", self.cross_time);
        }
        if self.sim_time < 0.0 {
            bail!("simulation time cannot be negative, got {}", self.sim_time);
        }
        if self.arrival_min > self.arrival_max {
            bail!(
                "arrival interval bounds are inverted: {}..={}",
                self.arrival_min,
                self.arrival_max
            );
        }
        Ok(())
    }
}
