// Timing group actions

use crate::command::actions::{ValueChange, apply_changes, lookup_all, require_all, require_finite};
use crate::command::trait_def::{ActionError, ActionResult, EntityKind, Rejection, UndoableAction};
use crate::map::{
    Beatmap, DEFAULT_TIMING_GROUP, GLOBAL_TIMING_GROUP, HitObject, HitObjectId, TimingGroup,
    is_reserved_timing_group, is_valid_timing_group_id,
};

const KIND: EntityKind = EntityKind::TimingGroup;

/// Check that `id` may be used as the id of a new or renamed group
fn validate_new_id(map: &Beatmap, id: &str) -> ActionResult<()> {
    if is_reserved_timing_group(id) {
        return Err(Rejection::ReservedTimingGroup(id.to_string()).into());
    }
    if !is_valid_timing_group_id(id) {
        return Err(Rejection::InvalidTimingGroupId(id.to_string()).into());
    }
    if map.timing_group(id).is_some() {
        return Err(Rejection::DuplicateTimingGroup(id.to_string()).into());
    }
    Ok(())
}

/// A user-created group that may be renamed, removed or recolored
fn user_group<'a>(map: &'a Beatmap, id: &str) -> ActionResult<&'a TimingGroup> {
    if is_reserved_timing_group(id) {
        return Err(Rejection::ReservedTimingGroup(id.to_string()).into());
    }
    map.timing_group(id)
        .ok_or_else(|| Rejection::unknown(KIND, id).into())
}

fn membership_changes(
    map: &Beatmap,
    ids: &[HitObjectId],
    group: &str,
) -> ActionResult<Vec<ValueChange<String>>> {
    Ok(lookup_all(&map.hit_objects, ids, EntityKind::HitObject)?
        .into_iter()
        .filter(|object| object.timing_group != group)
        .map(|object| ValueChange::new(object.id, object.timing_group, group.to_string()))
        .collect())
}

fn set_membership(
    map: &mut Beatmap,
    changes: &[ValueChange<String>],
    use_new: bool,
) -> ActionResult<()> {
    apply_changes(
        &mut map.hit_objects,
        changes,
        EntityKind::HitObject,
        use_new,
        |object: &mut HitObject, group| object.timing_group = group,
    )
}

fn require_members(map: &Beatmap, changes: &[ValueChange<String>]) -> ActionResult<()> {
    require_all(
        &map.hit_objects,
        changes.iter().map(|change| change.id),
        EntityKind::HitObject,
    )
}

fn require_absent(map: &Beatmap, id: &str) -> ActionResult<()> {
    if map.timing_group(id).is_some() {
        return Err(ActionError::duplicate(KIND, id));
    }
    Ok(())
}

fn require_present(map: &Beatmap, id: &str) -> ActionResult<()> {
    if map.timing_group(id).is_none() {
        return Err(ActionError::missing(KIND, id));
    }
    Ok(())
}

fn insert_group(map: &mut Beatmap, group: &TimingGroup) -> ActionResult<()> {
    require_absent(map, &group.id)?;
    map.timing_groups.insert(group.id.clone(), group.clone());
    Ok(())
}

fn take_group(map: &mut Beatmap, id: &str) -> ActionResult<TimingGroup> {
    map.timing_groups
        .remove(id)
        .ok_or_else(|| ActionError::missing(KIND, id))
}

fn group_mut<'a>(map: &'a mut Beatmap, id: &str) -> ActionResult<&'a mut TimingGroup> {
    map.timing_group_mut(id)
        .ok_or_else(|| ActionError::missing(KIND, id))
}

/// Create a timing group, optionally moving hit objects into it
#[derive(Debug)]
pub struct CreateTimingGroup {
    pub(crate) group: TimingGroup,
    pub(crate) members: Vec<ValueChange<String>>,
}

impl CreateTimingGroup {
    pub fn new(map: &Beatmap, group: TimingGroup, members: &[HitObjectId]) -> ActionResult<Self> {
        validate_new_id(map, &group.id)?;
        require_finite("initial_scroll_velocity", group.initial_scroll_velocity)?;
        let members = if members.is_empty() {
            Vec::new()
        } else {
            membership_changes(map, members, &group.id)?
        };
        Ok(Self { group, members })
    }
}

impl UndoableAction for CreateTimingGroup {
    fn perform(&self, map: &mut Beatmap) -> ActionResult<()> {
        require_absent(map, &self.group.id)?;
        require_members(map, &self.members)?;
        insert_group(map, &self.group)?;
        set_membership(map, &self.members, true)
    }

    fn undo(&self, map: &mut Beatmap) -> ActionResult<()> {
        require_present(map, &self.group.id)?;
        set_membership(map, &self.members, false)?;
        take_group(map, &self.group.id).map(|_| ())
    }

    fn description(&self) -> String {
        format!("Create Timing Group {}", self.group.id)
    }
}

/// Remove a timing group; its hit objects fall back to the default group
#[derive(Debug)]
pub struct RemoveTimingGroup {
    pub(crate) group: TimingGroup,
    pub(crate) members: Vec<ValueChange<String>>,
}

impl RemoveTimingGroup {
    pub fn new(map: &Beatmap, id: &str) -> ActionResult<Self> {
        let group = user_group(map, id)?.clone();
        let members = map
            .objects_in_timing_group(id)
            .into_iter()
            .map(|object| {
                ValueChange::new(object, id.to_string(), DEFAULT_TIMING_GROUP.to_string())
            })
            .collect();
        Ok(Self { group, members })
    }
}

impl UndoableAction for RemoveTimingGroup {
    fn perform(&self, map: &mut Beatmap) -> ActionResult<()> {
        require_present(map, &self.group.id)?;
        set_membership(map, &self.members, true)?;
        take_group(map, &self.group.id).map(|_| ())
    }

    fn undo(&self, map: &mut Beatmap) -> ActionResult<()> {
        require_absent(map, &self.group.id)?;
        require_members(map, &self.members)?;
        insert_group(map, &self.group)?;
        set_membership(map, &self.members, false)
    }

    fn description(&self) -> String {
        format!("Remove Timing Group {}", self.group.id)
    }
}

#[derive(Debug)]
pub struct RenameTimingGroup {
    pub(crate) old_id: String,
    pub(crate) new_id: String,
    pub(crate) members: Vec<HitObjectId>,
}

impl RenameTimingGroup {
    pub fn new(map: &Beatmap, id: &str, new_id: &str) -> ActionResult<Self> {
        user_group(map, id)?;
        validate_new_id(map, new_id)?;
        Ok(Self {
            old_id: id.to_string(),
            new_id: new_id.to_string(),
            members: map.objects_in_timing_group(id),
        })
    }

    fn rename(&self, map: &mut Beatmap, from: &str, to: &str) -> ActionResult<()> {
        require_absent(map, to)?;
        require_present(map, from)?;
        require_all(&map.hit_objects, self.members.iter().copied(), EntityKind::HitObject)?;
        let mut group = take_group(map, from)?;
        group.id = to.to_string();
        map.timing_groups.insert(to.to_string(), group);
        for &id in &self.members {
            map.hit_objects.update(id, |object| object.timing_group = to.to_string());
        }
        Ok(())
    }
}

impl UndoableAction for RenameTimingGroup {
    fn perform(&self, map: &mut Beatmap) -> ActionResult<()> {
        self.rename(map, &self.old_id, &self.new_id)
    }

    fn undo(&self, map: &mut Beatmap) -> ActionResult<()> {
        self.rename(map, &self.new_id, &self.old_id)
    }

    fn description(&self) -> String {
        format!("Rename Timing Group {} to {}", self.old_id, self.new_id)
    }
}

#[derive(Debug)]
pub struct ColorTimingGroup {
    pub(crate) group_id: String,
    pub(crate) old_color: [u8; 3],
    pub(crate) new_color: [u8; 3],
}

impl ColorTimingGroup {
    pub fn new(map: &Beatmap, id: &str, color: [u8; 3]) -> ActionResult<Self> {
        let group = user_group(map, id)?;
        if group.color == color {
            return Err(Rejection::EmptyTarget.into());
        }
        Ok(Self {
            group_id: id.to_string(),
            old_color: group.color,
            new_color: color,
        })
    }
}

impl UndoableAction for ColorTimingGroup {
    fn perform(&self, map: &mut Beatmap) -> ActionResult<()> {
        group_mut(map, &self.group_id)?.color = self.new_color;
        Ok(())
    }

    fn undo(&self, map: &mut Beatmap) -> ActionResult<()> {
        group_mut(map, &self.group_id)?.color = self.old_color;
        Ok(())
    }

    fn description(&self) -> String {
        format!("Change Timing Group {} Color", self.group_id)
    }
}

/// Move hit objects into a timing group. The global group only holds
/// scroll velocities, so it never receives hit objects.
#[derive(Debug)]
pub struct MoveObjectsToTimingGroup {
    pub(crate) group_id: String,
    pub(crate) changes: Vec<ValueChange<String>>,
}

impl MoveObjectsToTimingGroup {
    pub fn new(map: &Beatmap, ids: &[HitObjectId], group: &str) -> ActionResult<Self> {
        if group == GLOBAL_TIMING_GROUP {
            return Err(Rejection::ReservedTimingGroup(group.to_string()).into());
        }
        if map.timing_group(group).is_none() {
            return Err(Rejection::unknown(KIND, group).into());
        }
        let changes = membership_changes(map, ids, group)?;
        if changes.is_empty() {
            return Err(Rejection::EmptyTarget.into());
        }
        Ok(Self {
            group_id: group.to_string(),
            changes,
        })
    }
}

impl UndoableAction for MoveObjectsToTimingGroup {
    fn perform(&self, map: &mut Beatmap) -> ActionResult<()> {
        set_membership(map, &self.changes, true)
    }

    fn undo(&self, map: &mut Beatmap) -> ActionResult<()> {
        set_membership(map, &self.changes, false)
    }

    fn description(&self) -> String {
        format!(
            "Move {} Hit Objects to Timing Group {}",
            self.changes.len(),
            self.group_id
        )
    }
}

#[derive(Debug)]
pub struct ChangeInitialScrollVelocity {
    pub(crate) group_id: String,
    pub(crate) old: f32,
    pub(crate) new: f32,
}

impl ChangeInitialScrollVelocity {
    pub fn new(map: &Beatmap, id: &str, multiplier: f32) -> ActionResult<Self> {
        require_finite("initial_scroll_velocity", multiplier)?;
        let group = map
            .timing_group(id)
            .ok_or_else(|| Rejection::unknown(KIND, id))?;
        if group.initial_scroll_velocity == multiplier {
            return Err(Rejection::EmptyTarget.into());
        }
        Ok(Self {
            group_id: id.to_string(),
            old: group.initial_scroll_velocity,
            new: multiplier,
        })
    }
}

impl UndoableAction for ChangeInitialScrollVelocity {
    fn perform(&self, map: &mut Beatmap) -> ActionResult<()> {
        group_mut(map, &self.group_id)?.initial_scroll_velocity = self.new;
        Ok(())
    }

    fn undo(&self, map: &mut Beatmap) -> ActionResult<()> {
        group_mut(map, &self.group_id)?.initial_scroll_velocity = self.old;
        Ok(())
    }

    fn description(&self) -> String {
        format!(
            "Set Timing Group {} Initial Scroll Velocity to {}x",
            self.group_id, self.new
        )
    }
}
