// Time-ordered entity collection
// Entities are kept sorted by (time, id) so the same set of entities always
// produces the same order, whatever sequence of inserts built it.

use serde::Serialize;
use std::cmp::Ordering;

/// An entity that lives at a point on the map's timeline
pub trait Timed {
    /// Identity of the entity, unique within its map
    fn id(&self) -> u64;

    /// Position on the timeline in milliseconds
    fn time(&self) -> f64;
}

fn ordering<T: Timed>(a: &T, b: &T) -> Ordering {
    a.time()
        .total_cmp(&b.time())
        .then_with(|| a.id().cmp(&b.id()))
}

/// Collection of timed entities, keyed by id and sorted by time
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TimedCollection<T> {
    items: Vec<T>,
}

impl<T> Default for TimedCollection<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Timed> TimedCollection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    fn position(&self, id: u64) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    pub fn contains(&self, id: u64) -> bool {
        self.position(id).is_some()
    }

    pub fn get(&self, id: u64) -> Option<&T> {
        self.position(id).map(|index| &self.items[index])
    }

    /// Insert an entity at its sorted position
    ///
    /// Returns the entity back if one with the same id is already present.
    pub fn insert(&mut self, item: T) -> Result<(), T> {
        if self.contains(item.id()) {
            return Err(item);
        }

        let index = self
            .items
            .partition_point(|existing| ordering(existing, &item) == Ordering::Less);
        self.items.insert(index, item);
        Ok(())
    }

    /// Remove an entity by id
    pub fn remove(&mut self, id: u64) -> Option<T> {
        self.position(id).map(|index| self.items.remove(index))
    }

    /// Mutate an entity in place, keeping the collection sorted afterwards
    pub fn update<R>(&mut self, id: u64, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let index = self.position(id)?;
        let mut item = self.items.remove(index);
        let result = f(&mut item);

        let index = self
            .items
            .partition_point(|existing| ordering(existing, &item) == Ordering::Less);
        self.items.insert(index, item);
        Some(result)
    }
}

impl<'a, T> IntoIterator for &'a TimedCollection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Marker {
        id: u64,
        time: f64,
    }

    impl Timed for Marker {
        fn id(&self) -> u64 {
            self.id
        }

        fn time(&self) -> f64 {
            self.time
        }
    }

    fn marker(id: u64, time: f64) -> Marker {
        Marker { id, time }
    }

    #[test]
    fn test_insert_keeps_time_order() {
        let mut markers = TimedCollection::new();
        markers.insert(marker(1, 300.0)).unwrap();
        markers.insert(marker(2, 100.0)).unwrap();
        markers.insert(marker(3, 200.0)).unwrap();

        let ids: Vec<u64> = markers.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_ties_are_ordered_by_id() {
        let mut a = TimedCollection::new();
        a.insert(marker(5, 100.0)).unwrap();
        a.insert(marker(2, 100.0)).unwrap();

        let mut b = TimedCollection::new();
        b.insert(marker(2, 100.0)).unwrap();
        b.insert(marker(5, 100.0)).unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn test_duplicate_id_is_refused() {
        let mut markers = TimedCollection::new();
        markers.insert(marker(1, 100.0)).unwrap();

        let refused = markers.insert(marker(1, 500.0));
        assert_eq!(refused, Err(marker(1, 500.0)));
        assert_eq!(markers.len(), 1);
    }

    #[test]
    fn test_update_resorts_item() {
        let mut markers = TimedCollection::new();
        markers.insert(marker(1, 100.0)).unwrap();
        markers.insert(marker(2, 200.0)).unwrap();

        markers.update(1, |m| m.time = 300.0).unwrap();

        let ids: Vec<u64> = markers.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert!(markers.update(42, |m| m.time = 0.0).is_none());
    }

    #[test]
    fn test_remove() {
        let mut markers = TimedCollection::new();
        markers.insert(marker(1, 100.0)).unwrap();

        assert_eq!(markers.remove(1), Some(marker(1, 100.0)));
        assert!(markers.remove(1).is_none());
        assert!(markers.is_empty());
    }
}
