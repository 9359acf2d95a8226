// Timing groups - sets of hit objects sharing scroll velocities

use crate::map::collection::TimedCollection;
use crate::map::timing::ScrollVelocity;
use serde::Serialize;

/// Group every hit object belongs to unless moved elsewhere
pub const DEFAULT_TIMING_GROUP: &str = "$Default";

/// Group holding scroll velocities applied to the whole map
pub const GLOBAL_TIMING_GROUP: &str = "$Global";

pub fn is_reserved_timing_group(id: &str) -> bool {
    id == DEFAULT_TIMING_GROUP || id == GLOBAL_TIMING_GROUP
}

/// Whether `id` is usable as a timing group identifier (`[A-Za-z0-9_]+`)
pub fn is_valid_timing_group_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimingGroup {
    pub id: String,
    pub initial_scroll_velocity: f32,
    pub color: [u8; 3],
    pub scroll_velocities: TimedCollection<ScrollVelocity>,
}

impl TimingGroup {
    pub fn new(id: impl Into<String>, initial_scroll_velocity: f32, color: [u8; 3]) -> Self {
        Self {
            id: id.into(),
            initial_scroll_velocity,
            color,
            scroll_velocities: TimedCollection::new(),
        }
    }
}
