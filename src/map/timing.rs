// Timing points (BPM sections) and scroll velocities

use crate::map::collection::Timed;
use serde::{Deserialize, Serialize};

pub type TimingPointId = u64;
pub type ScrollVelocityId = u64;

/// Default number of beats per measure
pub const DEFAULT_SIGNATURE: u32 = 4;

/// A BPM section starting at `start_time`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingPoint {
    pub id: TimingPointId,

    /// Start time in milliseconds
    pub start_time: f32,

    pub bpm: f32,

    /// Beats per measure
    pub signature: u32,

    /// Hidden timing points do not draw measure lines
    pub hidden: bool,
}

impl TimingPoint {
    pub fn new(id: TimingPointId, start_time: f32, bpm: f32) -> Self {
        Self {
            id,
            start_time,
            bpm,
            signature: DEFAULT_SIGNATURE,
            hidden: false,
        }
    }

    pub fn with_signature(mut self, signature: u32) -> Self {
        self.signature = signature;
        self
    }

    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    /// Length of one beat in milliseconds
    pub fn beat_length(&self) -> f64 {
        60_000.0 / f64::from(self.bpm)
    }
}

impl Timed for TimingPoint {
    fn id(&self) -> u64 {
        self.id
    }

    fn time(&self) -> f64 {
        f64::from(self.start_time)
    }
}

/// A scroll speed change, owned by a timing group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrollVelocity {
    pub id: ScrollVelocityId,

    /// Start time in milliseconds
    pub start_time: f32,

    pub multiplier: f32,
}

impl ScrollVelocity {
    pub fn new(id: ScrollVelocityId, start_time: f32, multiplier: f32) -> Self {
        Self {
            id,
            start_time,
            multiplier,
        }
    }
}

impl Timed for ScrollVelocity {
    fn id(&self) -> u64 {
        self.id
    }

    fn time(&self) -> f64 {
        f64::from(self.start_time)
    }
}
