// Hit objects (notes and long notes) placed on the playfield

use crate::map::collection::Timed;
use crate::map::layer::{DEFAULT_LAYER, LayerId};
use crate::map::timing_group::DEFAULT_TIMING_GROUP;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Unique identifier for hit objects
pub type HitObjectId = u64;

bitflags! {
    /// Hitsounds played when an object is hit
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct HitSounds: u8 {
        const NORMAL = 1;
        const WHISTLE = 1 << 1;
        const FINISH = 1 << 2;
        const CLAP = 1 << 3;
    }
}

impl HitSounds {
    /// Parse a hitsound name as used by scripts ("whistle", "finish", "clap", "normal")
    pub fn from_script_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "normal" => Some(Self::NORMAL),
            "whistle" => Some(Self::WHISTLE),
            "finish" => Some(Self::FINISH),
            "clap" => Some(Self::CLAP),
            _ => None,
        }
    }
}

/// A note on the playfield
///
/// A hit object without `end_time` is a regular note; with one it is a long
/// note held until `end_time`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitObject {
    pub id: HitObjectId,

    /// Lane, 1-based (1..=key_count)
    pub lane: u8,

    /// Start time in milliseconds
    pub start_time: i32,

    /// End time in milliseconds for long notes
    pub end_time: Option<i32>,

    pub hitsounds: HitSounds,

    /// Editor layer the object is displayed on
    pub layer: LayerId,

    /// Timing group whose scroll velocities drive this object
    pub timing_group: String,
}

impl HitObject {
    /// Creates a regular note on the default layer and timing group
    pub fn new(id: HitObjectId, lane: u8, start_time: i32) -> Self {
        Self {
            id,
            lane,
            start_time,
            end_time: None,
            hitsounds: HitSounds::empty(),
            layer: DEFAULT_LAYER,
            timing_group: DEFAULT_TIMING_GROUP.to_string(),
        }
    }

    /// Turn this object into a long note ending at `end_time`
    pub fn with_end_time(mut self, end_time: i32) -> Self {
        self.end_time = Some(end_time);
        self
    }

    pub fn with_layer(mut self, layer: LayerId) -> Self {
        self.layer = layer;
        self
    }

    pub fn with_timing_group(mut self, timing_group: impl Into<String>) -> Self {
        self.timing_group = timing_group.into();
        self
    }

    pub fn with_hitsounds(mut self, hitsounds: HitSounds) -> Self {
        self.hitsounds = hitsounds;
        self
    }

    pub fn is_long_note(&self) -> bool {
        self.end_time.is_some()
    }

    /// End time for long notes, start time otherwise
    pub fn end_or_start(&self) -> i32 {
        self.end_time.unwrap_or(self.start_time)
    }
}

impl Timed for HitObject {
    fn id(&self) -> u64 {
        self.id
    }

    fn time(&self) -> f64 {
        f64::from(self.start_time)
    }
}
