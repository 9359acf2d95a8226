// Scroll velocity actions
//
// Scroll velocities live inside timing groups, so every payload remembers the
// group each velocity belongs to.

use crate::command::actions::{ValueChange, require_finite};
use crate::command::trait_def::{ActionError, ActionResult, EntityKind, Rejection, UndoableAction};
use crate::map::{Beatmap, ScrollVelocity, ScrollVelocityId, TimedCollection};
use serde::Serialize;

const KIND: EntityKind = EntityKind::ScrollVelocity;

/// A scroll velocity together with the timing group that owns it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupedVelocity {
    pub group: String,
    pub velocity: ScrollVelocity,
}

/// A value change on a scroll velocity in a given timing group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VelocityChange {
    pub group: String,
    pub change: ValueChange<f32>,
}

fn velocities_mut<'a>(
    map: &'a mut Beatmap,
    group: &str,
) -> ActionResult<&'a mut TimedCollection<ScrollVelocity>> {
    map.timing_group_mut(group)
        .map(|group| &mut group.scroll_velocities)
        .ok_or_else(|| ActionError::missing(EntityKind::TimingGroup, group))
}

fn insert_entries(map: &mut Beatmap, entries: &[GroupedVelocity]) -> ActionResult<()> {
    for entry in entries {
        if map.timing_group(&entry.group).is_none() {
            return Err(ActionError::missing(EntityKind::TimingGroup, &entry.group));
        }
        if map.find_scroll_velocity(entry.velocity.id).is_some() {
            return Err(ActionError::duplicate(KIND, entry.velocity.id));
        }
    }
    for entry in entries {
        let _ = velocities_mut(map, &entry.group)?.insert(entry.velocity.clone());
    }
    Ok(())
}

fn remove_entries(map: &mut Beatmap, entries: &[GroupedVelocity]) -> ActionResult<()> {
    for entry in entries {
        let present = map
            .timing_group(&entry.group)
            .is_some_and(|group| group.scroll_velocities.contains(entry.velocity.id));
        if !present {
            return Err(ActionError::missing(KIND, entry.velocity.id));
        }
    }
    for entry in entries {
        velocities_mut(map, &entry.group)?.remove(entry.velocity.id);
    }
    Ok(())
}

fn apply_velocity_changes(
    map: &mut Beatmap,
    changes: &[VelocityChange],
    use_new: bool,
    set: fn(&mut ScrollVelocity, f32),
) -> ActionResult<()> {
    for entry in changes {
        let present = map
            .timing_group(&entry.group)
            .is_some_and(|group| group.scroll_velocities.contains(entry.change.id));
        if !present {
            return Err(ActionError::missing(KIND, entry.change.id));
        }
    }
    for entry in changes {
        let value = if use_new {
            entry.change.new
        } else {
            entry.change.old
        };
        velocities_mut(map, &entry.group)?.update(entry.change.id, |velocity| set(velocity, value));
    }
    Ok(())
}

fn validate_new_velocities(
    map: &Beatmap,
    group: &str,
    velocities: &[ScrollVelocity],
) -> ActionResult<()> {
    if map.timing_group(group).is_none() {
        return Err(Rejection::unknown(EntityKind::TimingGroup, group).into());
    }
    for (index, velocity) in velocities.iter().enumerate() {
        require_finite("start_time", velocity.start_time)?;
        require_finite("multiplier", velocity.multiplier)?;
        let taken = map.find_scroll_velocity(velocity.id).is_some()
            || velocities[..index].iter().any(|other| other.id == velocity.id);
        if taken {
            return Err(ActionError::duplicate(KIND, velocity.id));
        }
    }
    Ok(())
}

fn lookup_entries(map: &Beatmap, ids: &[ScrollVelocityId]) -> ActionResult<Vec<GroupedVelocity>> {
    if ids.is_empty() {
        return Err(Rejection::EmptyTarget.into());
    }
    let mut entries: Vec<GroupedVelocity> = Vec::with_capacity(ids.len());
    for &id in ids {
        if entries.iter().any(|entry| entry.velocity.id == id) {
            continue;
        }
        let (group, velocity) = map
            .find_scroll_velocity(id)
            .ok_or_else(|| Rejection::unknown(KIND, id))?;
        entries.push(GroupedVelocity {
            group: group.to_string(),
            velocity: velocity.clone(),
        });
    }
    Ok(entries)
}

fn changed(changes: Vec<VelocityChange>) -> ActionResult<Vec<VelocityChange>> {
    let changes: Vec<VelocityChange> = changes
        .into_iter()
        .filter(|entry| entry.change.old != entry.change.new)
        .collect();
    if changes.is_empty() {
        return Err(Rejection::EmptyTarget.into());
    }
    Ok(changes)
}

fn set_start_time(velocity: &mut ScrollVelocity, start_time: f32) {
    velocity.start_time = start_time;
}

fn set_multiplier(velocity: &mut ScrollVelocity, multiplier: f32) {
    velocity.multiplier = multiplier;
}

#[derive(Debug)]
pub struct AddScrollVelocity {
    pub(crate) entry: GroupedVelocity,
}

impl AddScrollVelocity {
    pub fn new(map: &Beatmap, group: &str, velocity: ScrollVelocity) -> ActionResult<Self> {
        validate_new_velocities(map, group, std::slice::from_ref(&velocity))?;
        Ok(Self {
            entry: GroupedVelocity {
                group: group.to_string(),
                velocity,
            },
        })
    }
}

impl UndoableAction for AddScrollVelocity {
    fn perform(&self, map: &mut Beatmap) -> ActionResult<()> {
        insert_entries(map, std::slice::from_ref(&self.entry))
    }

    fn undo(&self, map: &mut Beatmap) -> ActionResult<()> {
        remove_entries(map, std::slice::from_ref(&self.entry))
    }

    fn description(&self) -> String {
        format!(
            "Add Scroll Velocity {}x at {}ms",
            self.entry.velocity.multiplier, self.entry.velocity.start_time
        )
    }
}

#[derive(Debug)]
pub struct RemoveScrollVelocity {
    pub(crate) entry: GroupedVelocity,
}

impl RemoveScrollVelocity {
    pub fn new(map: &Beatmap, id: ScrollVelocityId) -> ActionResult<Self> {
        let mut entries = lookup_entries(map, &[id])?;
        Ok(Self {
            entry: entries.remove(0),
        })
    }
}

impl UndoableAction for RemoveScrollVelocity {
    fn perform(&self, map: &mut Beatmap) -> ActionResult<()> {
        remove_entries(map, std::slice::from_ref(&self.entry))
    }

    fn undo(&self, map: &mut Beatmap) -> ActionResult<()> {
        insert_entries(map, std::slice::from_ref(&self.entry))
    }

    fn description(&self) -> String {
        format!(
            "Remove Scroll Velocity at {}ms",
            self.entry.velocity.start_time
        )
    }
}

/// Add several scroll velocities to one timing group
#[derive(Debug)]
pub struct AddScrollVelocityBatch {
    pub(crate) group: String,
    pub(crate) entries: Vec<GroupedVelocity>,
}

impl AddScrollVelocityBatch {
    pub fn new(map: &Beatmap, group: &str, velocities: Vec<ScrollVelocity>) -> ActionResult<Self> {
        if velocities.is_empty() {
            return Err(Rejection::EmptyTarget.into());
        }
        validate_new_velocities(map, group, &velocities)?;
        let entries = velocities
            .into_iter()
            .map(|velocity| GroupedVelocity {
                group: group.to_string(),
                velocity,
            })
            .collect();
        Ok(Self {
            group: group.to_string(),
            entries,
        })
    }
}

impl UndoableAction for AddScrollVelocityBatch {
    fn perform(&self, map: &mut Beatmap) -> ActionResult<()> {
        insert_entries(map, &self.entries)
    }

    fn undo(&self, map: &mut Beatmap) -> ActionResult<()> {
        remove_entries(map, &self.entries)
    }

    fn description(&self) -> String {
        format!(
            "Add {} Scroll Velocities to {}",
            self.entries.len(),
            self.group
        )
    }
}

/// Remove scroll velocities, possibly from several timing groups
#[derive(Debug)]
pub struct RemoveScrollVelocityBatch {
    pub(crate) entries: Vec<GroupedVelocity>,
}

impl RemoveScrollVelocityBatch {
    pub fn new(map: &Beatmap, ids: &[ScrollVelocityId]) -> ActionResult<Self> {
        Ok(Self {
            entries: lookup_entries(map, ids)?,
        })
    }
}

impl UndoableAction for RemoveScrollVelocityBatch {
    fn perform(&self, map: &mut Beatmap) -> ActionResult<()> {
        remove_entries(map, &self.entries)
    }

    fn undo(&self, map: &mut Beatmap) -> ActionResult<()> {
        insert_entries(map, &self.entries)
    }

    fn description(&self) -> String {
        format!("Remove {} Scroll Velocities", self.entries.len())
    }
}

#[derive(Debug)]
pub struct ChangeScrollVelocityOffsetBatch {
    pub(crate) delta: f32,
    pub(crate) changes: Vec<VelocityChange>,
}

impl ChangeScrollVelocityOffsetBatch {
    pub fn new(map: &Beatmap, ids: &[ScrollVelocityId], delta: f32) -> ActionResult<Self> {
        require_finite("offset", delta)?;
        let changes = lookup_entries(map, ids)?
            .into_iter()
            .map(|entry| {
                let moved = entry.velocity.start_time + delta;
                require_finite("start_time", moved)?;
                Ok(VelocityChange {
                    change: ValueChange::new(entry.velocity.id, entry.velocity.start_time, moved),
                    group: entry.group,
                })
            })
            .collect::<ActionResult<Vec<_>>>()?;
        Ok(Self {
            delta,
            changes: changed(changes)?,
        })
    }
}

impl UndoableAction for ChangeScrollVelocityOffsetBatch {
    fn perform(&self, map: &mut Beatmap) -> ActionResult<()> {
        apply_velocity_changes(map, &self.changes, true, set_start_time)
    }

    fn undo(&self, map: &mut Beatmap) -> ActionResult<()> {
        apply_velocity_changes(map, &self.changes, false, set_start_time)
    }

    fn description(&self) -> String {
        format!(
            "Move {} Scroll Velocities by {:+}ms",
            self.changes.len(),
            self.delta
        )
    }
}

#[derive(Debug)]
pub struct ChangeScrollVelocityMultiplierBatch {
    pub(crate) multiplier: f32,
    pub(crate) changes: Vec<VelocityChange>,
}

impl ChangeScrollVelocityMultiplierBatch {
    pub fn new(map: &Beatmap, ids: &[ScrollVelocityId], multiplier: f32) -> ActionResult<Self> {
        require_finite("multiplier", multiplier)?;
        let changes = lookup_entries(map, ids)?
            .into_iter()
            .map(|entry| VelocityChange {
                change: ValueChange::new(entry.velocity.id, entry.velocity.multiplier, multiplier),
                group: entry.group,
            })
            .collect();
        Ok(Self {
            multiplier,
            changes: changed(changes)?,
        })
    }
}

impl UndoableAction for ChangeScrollVelocityMultiplierBatch {
    fn perform(&self, map: &mut Beatmap) -> ActionResult<()> {
        apply_velocity_changes(map, &self.changes, true, set_multiplier)
    }

    fn undo(&self, map: &mut Beatmap) -> ActionResult<()> {
        apply_velocity_changes(map, &self.changes, false, set_multiplier)
    }

    fn description(&self) -> String {
        format!(
            "Set {} Scroll Velocities to {}x",
            self.changes.len(),
            self.multiplier
        )
    }
}
