// Selected hit objects of an editing session

use crate::map::{Beatmap, HitObjectId};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    hit_objects: BTreeSet<HitObjectId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, id: HitObjectId) {
        self.hit_objects.insert(id);
    }

    pub fn select_all(&mut self, ids: impl IntoIterator<Item = HitObjectId>) {
        self.hit_objects.extend(ids);
    }

    pub fn deselect(&mut self, id: HitObjectId) -> bool {
        self.hit_objects.remove(&id)
    }

    /// Replace the selection
    pub fn set(&mut self, ids: impl IntoIterator<Item = HitObjectId>) {
        self.hit_objects = ids.into_iter().collect();
    }

    pub fn clear(&mut self) {
        self.hit_objects.clear();
    }

    pub fn contains(&self, id: HitObjectId) -> bool {
        self.hit_objects.contains(&id)
    }

    /// Selected ids in ascending order
    pub fn ids(&self) -> Vec<HitObjectId> {
        self.hit_objects.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.hit_objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hit_objects.is_empty()
    }

    /// Forget ids that no longer exist in `map`
    pub fn prune(&mut self, map: &Beatmap) {
        self.hit_objects.retain(|&id| map.hit_objects.contains(id));
    }
}
