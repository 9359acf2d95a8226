// Concrete editor action payloads, grouped by the part of the map they edit
//
// Every payload is built by a constructor that validates the request against
// the live map and captures old and new values up front. `perform` and `undo`
// then only write those captured values back.

pub mod bookmarks;
pub mod hit_objects;
pub mod layers;
pub mod metadata;
pub mod scroll_velocities;
pub mod timing_groups;
pub mod timing_points;

use crate::command::trait_def::{ActionError, ActionResult, EntityKind, Rejection};
use crate::map::{Timed, TimedCollection};
use serde::Serialize;

/// Old and new value of one field of one entity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueChange<T> {
    pub id: u64,
    pub old: T,
    pub new: T,
}

impl<T> ValueChange<T> {
    pub fn new(id: u64, old: T, new: T) -> Self {
        Self { id, old, new }
    }
}

/// Insert clones of `items`, failing without side effects if any id is taken
pub(crate) fn insert_all<T: Timed + Clone>(
    collection: &mut TimedCollection<T>,
    items: &[T],
    kind: EntityKind,
) -> ActionResult<()> {
    if let Some(taken) = items.iter().find(|item| collection.contains(item.id())) {
        return Err(ActionError::duplicate(kind, taken.id()));
    }
    for item in items {
        // Ids were checked above
        let _ = collection.insert(item.clone());
    }
    Ok(())
}

/// Remove every id, failing without side effects if any is missing
pub(crate) fn remove_all<T: Timed>(
    collection: &mut TimedCollection<T>,
    ids: impl IntoIterator<Item = u64> + Clone,
    kind: EntityKind,
) -> ActionResult<()> {
    require_all(collection, ids.clone(), kind)?;
    for id in ids {
        collection.remove(id);
    }
    Ok(())
}

/// Check that every id is present
pub(crate) fn require_all<T: Timed>(
    collection: &TimedCollection<T>,
    ids: impl IntoIterator<Item = u64>,
    kind: EntityKind,
) -> ActionResult<()> {
    for id in ids {
        if !collection.contains(id) {
            return Err(ActionError::missing(kind, id));
        }
    }
    Ok(())
}

/// Resolve ids to entity clones at construction time
pub(crate) fn lookup_all<T: Timed + Clone>(
    collection: &TimedCollection<T>,
    ids: &[u64],
    kind: EntityKind,
) -> ActionResult<Vec<T>> {
    if ids.is_empty() {
        return Err(Rejection::EmptyTarget.into());
    }
    let mut found: Vec<T> = Vec::with_capacity(ids.len());
    for &id in ids {
        if found.iter().any(|item| item.id() == id) {
            continue;
        }
        let item = collection.get(id).ok_or_else(|| Rejection::unknown(kind, id))?;
        found.push(item.clone());
    }
    Ok(found)
}

/// Apply one captured value per entity, checking presence first
pub(crate) fn apply_changes<T: Timed, V: Clone>(
    collection: &mut TimedCollection<T>,
    changes: &[ValueChange<V>],
    kind: EntityKind,
    use_new: bool,
    set: impl Fn(&mut T, V),
) -> ActionResult<()> {
    require_all(collection, changes.iter().map(|change| change.id), kind)?;
    for change in changes {
        let value = if use_new {
            change.new.clone()
        } else {
            change.old.clone()
        };
        collection.update(change.id, |item| set(item, value));
    }
    Ok(())
}

/// Drop changes that would not alter anything; an all-no-op edit is refused
pub(crate) fn changed<T: PartialEq>(
    changes: Vec<ValueChange<T>>,
) -> ActionResult<Vec<ValueChange<T>>> {
    let changes: Vec<ValueChange<T>> = changes
        .into_iter()
        .filter(|change| change.old != change.new)
        .collect();
    if changes.is_empty() {
        return Err(Rejection::EmptyTarget.into());
    }
    Ok(changes)
}

pub(crate) fn require_finite(field: &'static str, value: f32) -> ActionResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Rejection::InvalidValue {
            field,
            value: f64::from(value),
        }
        .into())
    }
}

pub(crate) fn require_positive(field: &'static str, value: f32) -> ActionResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Rejection::InvalidValue {
            field,
            value: f64::from(value),
        }
        .into())
    }
}
