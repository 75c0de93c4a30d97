//! Event-side vehicle state.
//!
//! These are the records the visual layer reads snapshots of; all mutation
//! happens inside the event core's dispatch.

/// A unique identifier for vehicles, strictly increasing from zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VehicleId(pub usize);

/// Where a vehicle's intersection protocol currently stands.
///
/// Each variant before `Done` names a suspension point: the vehicle is
/// parked there until the scheduler resumes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolState {
    /// Parked on the green signal before requesting a crossing slot.
    AwaitingGreen,
    /// Parked in the crossing slot's FIFO wait list.
    AwaitingSlot,
    /// Holding a slot but parked on the signal again: the light flipped
    /// back to red while the vehicle queued for the slot.
    AwaitingGreenWithSlot,
    /// Holding a slot and clearing the intersection.
    Crossing,
    /// Protocol finished; the slot has been released.
    Done,
}

/// A vehicle in the event core.
#[derive(Debug, Clone)]
pub struct Vehicle {
    pub id: VehicleId,
    pub arrival_time: f32,
    pub departure_time: Option<f32>,
    /// Latch: set once when the vehicle is cleared to cross, never cleared.
    pub crossing_permitted: bool,
    pub protocol: ProtocolState,
}

impl Vehicle {
    pub fn new(id: VehicleId, arrival_time: f32) -> Self {
        Self {
            id,
            arrival_time,
            departure_time: None,
            crossing_permitted: false,
            protocol: ProtocolState::AwaitingGreen,
        }
    }

    /// Seconds from arrival to departure, once departed.
    pub fn wait_time(&self) -> Option<f32> {
        self.departure_time.map(|d| d - self.arrival_time)
    }
}
