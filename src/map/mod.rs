// Beatmap document model
//
// The in-memory document the editor actions read and write. It only offers
// keyed collections with add/remove/mutate-in-place; every edit that should
// be undoable goes through `crate::command` instead of touching it directly.

pub mod bookmark;
pub mod collection;
pub mod hit_object;
pub mod layer;
pub mod timing;
pub mod timing_group;

pub use bookmark::{Bookmark, BookmarkId};
pub use collection::{Timed, TimedCollection};
pub use hit_object::{HitObject, HitObjectId, HitSounds};
pub use layer::{DEFAULT_LAYER, EditorLayer, LayerId};
pub use timing::{ScrollVelocity, ScrollVelocityId, TimingPoint, TimingPointId};
pub use timing_group::{
    DEFAULT_TIMING_GROUP, GLOBAL_TIMING_GROUP, TimingGroup, is_reserved_timing_group,
    is_valid_timing_group_id,
};

use serde::Serialize;
use std::collections::BTreeMap;

/// Default number of lanes
pub const DEFAULT_KEY_COUNT: u8 = 4;

/// Colour given to new layers and timing groups when none is specified
pub const DEFAULT_COLOR: [u8; 3] = [255, 255, 255];

/// A beatmap being edited
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Beatmap {
    key_count: u8,

    /// Song preview start in milliseconds
    pub preview_time: i32,

    pub hit_objects: TimedCollection<HitObject>,
    pub timing_points: TimedCollection<TimingPoint>,
    pub bookmarks: TimedCollection<Bookmark>,

    /// User layers in display order (the default layer is implicit)
    pub layers: Vec<EditorLayer>,

    /// Timing groups by id, always containing the default and global groups
    pub timing_groups: BTreeMap<String, TimingGroup>,

    #[serde(skip)]
    next_id: u64,
}

impl Beatmap {
    /// Create an empty map with `key_count` lanes
    pub fn new(key_count: u8) -> Self {
        let mut timing_groups = BTreeMap::new();
        for id in [DEFAULT_TIMING_GROUP, GLOBAL_TIMING_GROUP] {
            timing_groups.insert(id.to_string(), TimingGroup::new(id, 1.0, DEFAULT_COLOR));
        }

        Self {
            key_count: key_count.max(1),
            preview_time: 0,
            hit_objects: TimedCollection::new(),
            timing_points: TimedCollection::new(),
            bookmarks: TimedCollection::new(),
            layers: Vec::new(),
            timing_groups,
            next_id: 1,
        }
    }

    pub fn key_count(&self) -> u8 {
        self.key_count
    }

    pub fn is_valid_lane(&self, lane: i64) -> bool {
        lane >= 1 && lane <= i64::from(self.key_count)
    }

    /// Reserve a fresh entity id
    ///
    /// Ids are never reused within a map, so an id reserved for an action that
    /// is later rejected simply goes unused.
    pub fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Make sure ids handed out by `other` (a scratch copy of this map) are
    /// never handed out again here
    pub fn adopt_id_counter(&mut self, other: &Beatmap) {
        self.next_id = self.next_id.max(other.next_id);
    }

    pub fn hit_object(&self, id: HitObjectId) -> Option<&HitObject> {
        self.hit_objects.get(id)
    }

    /// Whether the layer exists (the default layer always does)
    pub fn has_layer(&self, id: LayerId) -> bool {
        id == DEFAULT_LAYER || self.layer_index(id).is_some()
    }

    pub fn layer(&self, id: LayerId) -> Option<&EditorLayer> {
        self.layers.iter().find(|layer| layer.id == id)
    }

    pub fn layer_mut(&mut self, id: LayerId) -> Option<&mut EditorLayer> {
        self.layers.iter_mut().find(|layer| layer.id == id)
    }

    pub fn layer_index(&self, id: LayerId) -> Option<usize> {
        self.layers.iter().position(|layer| layer.id == id)
    }

    pub fn timing_group(&self, id: &str) -> Option<&TimingGroup> {
        self.timing_groups.get(id)
    }

    pub fn timing_group_mut(&mut self, id: &str) -> Option<&mut TimingGroup> {
        self.timing_groups.get_mut(id)
    }

    /// Find a scroll velocity in any timing group, returning the owning group id
    pub fn find_scroll_velocity(&self, id: ScrollVelocityId) -> Option<(&str, &ScrollVelocity)> {
        self.timing_groups.values().find_map(|group| {
            group
                .scroll_velocities
                .get(id)
                .map(|velocity| (group.id.as_str(), velocity))
        })
    }

    /// Timing point in effect at `time` (the first one if `time` precedes all)
    pub fn timing_point_at(&self, time: f64) -> Option<&TimingPoint> {
        self.timing_points
            .iter()
            .rev()
            .find(|point| f64::from(point.start_time) <= time)
            .or_else(|| self.timing_points.iter().next())
    }

    /// Ids of the hit objects on a layer
    pub fn objects_on_layer(&self, layer: LayerId) -> Vec<HitObjectId> {
        self.hit_objects
            .iter()
            .filter(|object| object.layer == layer)
            .map(|object| object.id)
            .collect()
    }

    /// Ids of the hit objects in a timing group
    pub fn objects_in_timing_group(&self, group: &str) -> Vec<HitObjectId> {
        self.hit_objects
            .iter()
            .filter(|object| object.timing_group == group)
            .map(|object| object.id)
            .collect()
    }
}

impl Default for Beatmap {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_COUNT)
    }
}
