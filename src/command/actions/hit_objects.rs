// Hit object actions: placement, removal, lane/time transforms and hitsounds

use crate::command::actions::{
    ValueChange, apply_changes, insert_all, lookup_all, remove_all, require_all,
};
use crate::command::trait_def::{ActionError, ActionResult, EntityKind, Rejection, UndoableAction};
use crate::map::{Beatmap, GLOBAL_TIMING_GROUP, HitObject, HitObjectId, HitSounds};
use serde::Serialize;

const KIND: EntityKind = EntityKind::HitObject;

/// Lane and timing of a hit object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Placement {
    pub lane: u8,
    pub start_time: i32,
    pub end_time: Option<i32>,
}

impl Placement {
    pub fn of(object: &HitObject) -> Self {
        Self {
            lane: object.lane,
            start_time: object.start_time,
            end_time: object.end_time,
        }
    }

    fn write_to(self, object: &mut HitObject) {
        object.lane = self.lane;
        object.start_time = self.start_time;
        object.end_time = self.end_time;
    }
}

/// Where a hit object was and where it ends up
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacementChange {
    pub id: HitObjectId,
    pub old: Placement,
    pub new: Placement,
}

fn apply_placements(
    map: &mut Beatmap,
    changes: &[PlacementChange],
    use_new: bool,
) -> ActionResult<()> {
    require_all(&map.hit_objects, changes.iter().map(|change| change.id), KIND)?;
    for change in changes {
        let placement = if use_new { change.new } else { change.old };
        map.hit_objects
            .update(change.id, |object| placement.write_to(object));
    }
    Ok(())
}

/// Keep only the changes that actually move something
fn effective(changes: Vec<PlacementChange>) -> ActionResult<Vec<PlacementChange>> {
    let changes: Vec<PlacementChange> = changes
        .into_iter()
        .filter(|change| change.old != change.new)
        .collect();
    if changes.is_empty() {
        return Err(Rejection::EmptyTarget.into());
    }
    Ok(changes)
}

fn require_lane(map: &Beatmap, lane: i64) -> ActionResult<u8> {
    if map.is_valid_lane(lane) {
        // is_valid_lane bounds the lane to 1..=key_count
        Ok(lane as u8)
    } else {
        Err(Rejection::LaneOutOfRange {
            lane,
            key_count: map.key_count(),
        }
        .into())
    }
}

/// Validate an object that is about to be added to the map
fn validate_new_object(map: &Beatmap, object: &HitObject) -> ActionResult<()> {
    require_lane(map, i64::from(object.lane))?;
    if let Some(end_time) = object.end_time {
        if end_time <= object.start_time {
            return Err(Rejection::InvalidValue {
                field: "end_time",
                value: f64::from(end_time),
            }
            .into());
        }
    }
    if !map.has_layer(object.layer) {
        return Err(Rejection::unknown(EntityKind::Layer, object.layer).into());
    }
    if object.timing_group == GLOBAL_TIMING_GROUP {
        return Err(Rejection::ReservedTimingGroup(object.timing_group.clone()).into());
    }
    if map.timing_group(&object.timing_group).is_none() {
        return Err(Rejection::unknown(EntityKind::TimingGroup, &object.timing_group).into());
    }
    if map.hit_objects.contains(object.id) {
        return Err(ActionError::duplicate(KIND, object.id));
    }
    Ok(())
}

/// Place a single hit object
#[derive(Debug)]
pub struct PlaceHitObject {
    pub(crate) object: HitObject,
}

impl PlaceHitObject {
    pub fn new(map: &Beatmap, object: HitObject) -> ActionResult<Self> {
        validate_new_object(map, &object)?;
        Ok(Self { object })
    }

    pub fn object(&self) -> &HitObject {
        &self.object
    }
}

impl UndoableAction for PlaceHitObject {
    fn perform(&self, map: &mut Beatmap) -> ActionResult<()> {
        insert_all(&mut map.hit_objects, std::slice::from_ref(&self.object), KIND)
    }

    fn undo(&self, map: &mut Beatmap) -> ActionResult<()> {
        remove_all(&mut map.hit_objects, [self.object.id], KIND)
    }

    fn description(&self) -> String {
        format!(
            "Place Hit Object at {}ms lane {}",
            self.object.start_time, self.object.lane
        )
    }
}

/// Place several hit objects at once
#[derive(Debug)]
pub struct PlaceHitObjectBatch {
    pub(crate) objects: Vec<HitObject>,
}

impl PlaceHitObjectBatch {
    pub fn new(map: &Beatmap, objects: Vec<HitObject>) -> ActionResult<Self> {
        if objects.is_empty() {
            return Err(Rejection::EmptyTarget.into());
        }
        for (index, object) in objects.iter().enumerate() {
            validate_new_object(map, object)?;
            if objects[..index].iter().any(|other| other.id == object.id) {
                return Err(ActionError::duplicate(KIND, object.id));
            }
        }
        Ok(Self { objects })
    }

    pub fn objects(&self) -> &[HitObject] {
        &self.objects
    }
}

impl UndoableAction for PlaceHitObjectBatch {
    fn perform(&self, map: &mut Beatmap) -> ActionResult<()> {
        insert_all(&mut map.hit_objects, &self.objects, KIND)
    }

    fn undo(&self, map: &mut Beatmap) -> ActionResult<()> {
        remove_all(
            &mut map.hit_objects,
            self.objects.iter().map(|object| object.id),
            KIND,
        )
    }

    fn description(&self) -> String {
        format!("Place {} Hit Objects", self.objects.len())
    }
}

/// Remove a single hit object
#[derive(Debug)]
pub struct RemoveHitObject {
    pub(crate) object: HitObject,
}

impl RemoveHitObject {
    pub fn new(map: &Beatmap, id: HitObjectId) -> ActionResult<Self> {
        let object = map
            .hit_object(id)
            .cloned()
            .ok_or_else(|| Rejection::unknown(KIND, id))?;
        Ok(Self { object })
    }

    pub fn object(&self) -> &HitObject {
        &self.object
    }
}

impl UndoableAction for RemoveHitObject {
    fn perform(&self, map: &mut Beatmap) -> ActionResult<()> {
        remove_all(&mut map.hit_objects, [self.object.id], KIND)
    }

    fn undo(&self, map: &mut Beatmap) -> ActionResult<()> {
        insert_all(&mut map.hit_objects, std::slice::from_ref(&self.object), KIND)
    }

    fn description(&self) -> String {
        format!(
            "Remove Hit Object at {}ms lane {}",
            self.object.start_time, self.object.lane
        )
    }
}

/// Remove several hit objects at once
#[derive(Debug)]
pub struct RemoveHitObjectBatch {
    pub(crate) objects: Vec<HitObject>,
}

impl RemoveHitObjectBatch {
    pub fn new(map: &Beatmap, ids: &[HitObjectId]) -> ActionResult<Self> {
        let objects = lookup_all(&map.hit_objects, ids, KIND)?;
        Ok(Self { objects })
    }

    pub fn objects(&self) -> &[HitObject] {
        &self.objects
    }
}

impl UndoableAction for RemoveHitObjectBatch {
    fn perform(&self, map: &mut Beatmap) -> ActionResult<()> {
        remove_all(
            &mut map.hit_objects,
            self.objects.iter().map(|object| object.id),
            KIND,
        )
    }

    fn undo(&self, map: &mut Beatmap) -> ActionResult<()> {
        insert_all(&mut map.hit_objects, &self.objects, KIND)
    }

    fn description(&self) -> String {
        format!("Remove {} Hit Objects", self.objects.len())
    }
}

/// Change the end time of a hit object
///
/// An end time at or before the start turns a long note back into a note.
#[derive(Debug)]
pub struct ResizeLongNote {
    pub(crate) id: HitObjectId,
    pub(crate) old_end: Option<i32>,
    pub(crate) new_end: Option<i32>,
}

impl ResizeLongNote {
    pub fn new(map: &Beatmap, id: HitObjectId, end_time: i32) -> ActionResult<Self> {
        let object = map.hit_object(id).ok_or_else(|| Rejection::unknown(KIND, id))?;
        let new_end = (end_time > object.start_time).then_some(end_time);
        if new_end == object.end_time {
            return Err(Rejection::EmptyTarget.into());
        }
        Ok(Self {
            id,
            old_end: object.end_time,
            new_end,
        })
    }

    fn write(&self, map: &mut Beatmap, end_time: Option<i32>) -> ActionResult<()> {
        map.hit_objects
            .update(self.id, |object| object.end_time = end_time)
            .ok_or_else(|| ActionError::missing(KIND, self.id))
    }
}

impl UndoableAction for ResizeLongNote {
    fn perform(&self, map: &mut Beatmap) -> ActionResult<()> {
        self.write(map, self.new_end)
    }

    fn undo(&self, map: &mut Beatmap) -> ActionResult<()> {
        self.write(map, self.old_end)
    }

    fn description(&self) -> String {
        match self.new_end {
            Some(end) => format!("Resize Long Note to {}ms", end),
            None => "Convert Long Note to Note".to_string(),
        }
    }
}

/// Mirror hit objects horizontally across the playfield
#[derive(Debug)]
pub struct FlipHitObjects {
    pub(crate) changes: Vec<PlacementChange>,
}

impl FlipHitObjects {
    pub fn new(map: &Beatmap, ids: &[HitObjectId]) -> ActionResult<Self> {
        let key_count = map.key_count();
        let changes = lookup_all(&map.hit_objects, ids, KIND)?
            .iter()
            .map(|object| {
                let old = Placement::of(object);
                let new = Placement {
                    lane: key_count + 1 - object.lane,
                    ..old
                };
                PlacementChange { id: object.id, old, new }
            })
            .collect();
        Ok(Self {
            changes: effective(changes)?,
        })
    }
}

impl UndoableAction for FlipHitObjects {
    fn perform(&self, map: &mut Beatmap) -> ActionResult<()> {
        apply_placements(map, &self.changes, true)
    }

    fn undo(&self, map: &mut Beatmap) -> ActionResult<()> {
        apply_placements(map, &self.changes, false)
    }

    fn description(&self) -> String {
        format!("Flip {} Hit Objects", self.changes.len())
    }
}

/// Reflect `time` around half of `pivot`, refusing results outside `i32`
fn mirror(pivot: i64, time: i32) -> ActionResult<i32> {
    let mirrored = pivot - i64::from(time);
    i32::try_from(mirrored).map_err(|_| {
        Rejection::InvalidValue {
            field: "start_time",
            value: mirrored as f64,
        }
        .into()
    })
}

/// Reverse hit objects in time within the span they cover
#[derive(Debug)]
pub struct ReverseHitObjects {
    pub(crate) changes: Vec<PlacementChange>,
}

impl ReverseHitObjects {
    pub fn new(map: &Beatmap, ids: &[HitObjectId]) -> ActionResult<Self> {
        let objects = lookup_all(&map.hit_objects, ids, KIND)?;
        let first = objects.iter().map(|o| o.start_time).min().unwrap_or(0);
        let last = objects.iter().map(HitObject::end_or_start).max().unwrap_or(0);
        let pivot = i64::from(first) + i64::from(last);

        let changes = objects
            .iter()
            .map(|object| -> ActionResult<PlacementChange> {
                let old = Placement::of(object);
                let new = Placement {
                    lane: object.lane,
                    start_time: mirror(pivot, object.end_or_start())?,
                    end_time: match object.end_time {
                        Some(_) => Some(mirror(pivot, object.start_time)?),
                        None => None,
                    },
                };
                Ok(PlacementChange { id: object.id, old, new })
            })
            .collect::<ActionResult<Vec<_>>>()?;
        Ok(Self {
            changes: effective(changes)?,
        })
    }
}

impl UndoableAction for ReverseHitObjects {
    fn perform(&self, map: &mut Beatmap) -> ActionResult<()> {
        apply_placements(map, &self.changes, true)
    }

    fn undo(&self, map: &mut Beatmap) -> ActionResult<()> {
        apply_placements(map, &self.changes, false)
    }

    fn description(&self) -> String {
        format!("Reverse {} Hit Objects", self.changes.len())
    }
}

/// Exchange the lanes of hit objects sitting in two given lanes
#[derive(Debug)]
pub struct SwapLanes {
    pub(crate) lane_a: u8,
    pub(crate) lane_b: u8,
    pub(crate) changes: Vec<PlacementChange>,
}

impl SwapLanes {
    pub fn new(map: &Beatmap, ids: &[HitObjectId], lane_a: i64, lane_b: i64) -> ActionResult<Self> {
        let lane_a = require_lane(map, lane_a)?;
        let lane_b = require_lane(map, lane_b)?;

        let changes = lookup_all(&map.hit_objects, ids, KIND)?
            .iter()
            .filter(|object| object.lane == lane_a || object.lane == lane_b)
            .map(|object| {
                let old = Placement::of(object);
                let lane = if object.lane == lane_a { lane_b } else { lane_a };
                PlacementChange {
                    id: object.id,
                    old,
                    new: Placement { lane, ..old },
                }
            })
            .collect();
        Ok(Self {
            lane_a,
            lane_b,
            changes: effective(changes)?,
        })
    }
}

impl UndoableAction for SwapLanes {
    fn perform(&self, map: &mut Beatmap) -> ActionResult<()> {
        apply_placements(map, &self.changes, true)
    }

    fn undo(&self, map: &mut Beatmap) -> ActionResult<()> {
        apply_placements(map, &self.changes, false)
    }

    fn description(&self) -> String {
        format!("Swap Lanes {} and {}", self.lane_a, self.lane_b)
    }
}

/// Shift hit objects by a lane and time offset
#[derive(Debug)]
pub struct MoveHitObjects {
    pub(crate) lane_offset: i32,
    pub(crate) time_offset: i32,
    pub(crate) changes: Vec<PlacementChange>,
}

impl MoveHitObjects {
    pub fn new(
        map: &Beatmap,
        ids: &[HitObjectId],
        lane_offset: i32,
        time_offset: i32,
    ) -> ActionResult<Self> {
        let objects = lookup_all(&map.hit_objects, ids, KIND)?;
        let mut changes = Vec::with_capacity(objects.len());
        for object in &objects {
            let old = Placement::of(object);
            let lane = require_lane(map, i64::from(object.lane) + i64::from(lane_offset))?;
            let new = Placement {
                lane,
                start_time: object.start_time.saturating_add(time_offset),
                end_time: object.end_time.map(|end| end.saturating_add(time_offset)),
            };
            changes.push(PlacementChange { id: object.id, old, new });
        }
        Ok(Self {
            lane_offset,
            time_offset,
            changes: effective(changes)?,
        })
    }
}

impl UndoableAction for MoveHitObjects {
    fn perform(&self, map: &mut Beatmap) -> ActionResult<()> {
        apply_placements(map, &self.changes, true)
    }

    fn undo(&self, map: &mut Beatmap) -> ActionResult<()> {
        apply_placements(map, &self.changes, false)
    }

    fn description(&self) -> String {
        format!(
            "Move {} Hit Objects ({:+} lanes, {:+}ms)",
            self.changes.len(),
            self.lane_offset,
            self.time_offset
        )
    }
}

/// Snap `time` to the closest 1/`snap` beat of the timing point in effect
pub(crate) fn snap_time(map: &Beatmap, time: i32, snap: u32) -> i32 {
    let Some(point) = map.timing_point_at(f64::from(time)) else {
        return time;
    };
    let interval = point.beat_length() / f64::from(snap.max(1));
    let origin = f64::from(point.start_time);
    let beats = ((f64::from(time) - origin) / interval).round();
    (origin + beats * interval).round() as i32
}

/// Snap hit objects to the beat grid
#[derive(Debug)]
pub struct ResnapHitObjects {
    pub(crate) snap: u32,
    pub(crate) changes: Vec<PlacementChange>,
}

impl ResnapHitObjects {
    pub fn new(map: &Beatmap, ids: &[HitObjectId], snap: u32) -> ActionResult<Self> {
        if snap == 0 {
            return Err(Rejection::InvalidValue {
                field: "snap",
                value: 0.0,
            }
            .into());
        }
        if map.timing_points.is_empty() {
            return Err(Rejection::NoTimingPoints.into());
        }

        let changes = lookup_all(&map.hit_objects, ids, KIND)?
            .iter()
            .map(|object| -> ActionResult<PlacementChange> {
                let old = Placement::of(object);
                let start_time = snap_time(map, object.start_time, snap);
                let end_time = match object.end_time {
                    Some(end) => {
                        let shortest = start_time.checked_add(1).ok_or(Rejection::InvalidValue {
                            field: "end_time",
                            value: f64::from(end),
                        })?;
                        Some(snap_time(map, end, snap).max(shortest))
                    }
                    None => None,
                };
                Ok(PlacementChange {
                    id: object.id,
                    old,
                    new: Placement {
                        lane: object.lane,
                        start_time,
                        end_time,
                    },
                })
            })
            .collect::<ActionResult<Vec<_>>>()?;
        Ok(Self {
            snap,
            changes: effective(changes)?,
        })
    }
}

impl UndoableAction for ResnapHitObjects {
    fn perform(&self, map: &mut Beatmap) -> ActionResult<()> {
        apply_placements(map, &self.changes, true)
    }

    fn undo(&self, map: &mut Beatmap) -> ActionResult<()> {
        apply_placements(map, &self.changes, false)
    }

    fn description(&self) -> String {
        format!("Resnap {} Hit Objects to 1/{}", self.changes.len(), self.snap)
    }
}

fn hitsound_changes(
    map: &Beatmap,
    ids: &[HitObjectId],
    sound: HitSounds,
    combine: impl Fn(HitSounds) -> HitSounds,
) -> ActionResult<Vec<ValueChange<HitSounds>>> {
    if sound.is_empty() {
        return Err(Rejection::InvalidValue {
            field: "hitsound",
            value: 0.0,
        }
        .into());
    }
    let changes: Vec<ValueChange<HitSounds>> = lookup_all(&map.hit_objects, ids, KIND)?
        .iter()
        .map(|object| ValueChange::new(object.id, object.hitsounds, combine(object.hitsounds)))
        .filter(|change| change.old != change.new)
        .collect();
    if changes.is_empty() {
        return Err(Rejection::EmptyTarget.into());
    }
    Ok(changes)
}

fn set_hitsounds(object: &mut HitObject, hitsounds: HitSounds) {
    object.hitsounds = hitsounds;
}

/// Add a hitsound to hit objects
#[derive(Debug)]
pub struct AddHitsound {
    pub(crate) sound: HitSounds,
    pub(crate) changes: Vec<ValueChange<HitSounds>>,
}

impl AddHitsound {
    pub fn new(map: &Beatmap, ids: &[HitObjectId], sound: HitSounds) -> ActionResult<Self> {
        let changes = hitsound_changes(map, ids, sound, |current| current | sound)?;
        Ok(Self { sound, changes })
    }
}

impl UndoableAction for AddHitsound {
    fn perform(&self, map: &mut Beatmap) -> ActionResult<()> {
        apply_changes(&mut map.hit_objects, &self.changes, KIND, true, set_hitsounds)
    }

    fn undo(&self, map: &mut Beatmap) -> ActionResult<()> {
        apply_changes(&mut map.hit_objects, &self.changes, KIND, false, set_hitsounds)
    }

    fn description(&self) -> String {
        format!("Add Hitsound {:?} to {} Hit Objects", self.sound, self.changes.len())
    }
}

/// Remove a hitsound from hit objects
#[derive(Debug)]
pub struct RemoveHitsound {
    pub(crate) sound: HitSounds,
    pub(crate) changes: Vec<ValueChange<HitSounds>>,
}

impl RemoveHitsound {
    pub fn new(map: &Beatmap, ids: &[HitObjectId], sound: HitSounds) -> ActionResult<Self> {
        let changes = hitsound_changes(map, ids, sound, |current| current - sound)?;
        Ok(Self { sound, changes })
    }
}

impl UndoableAction for RemoveHitsound {
    fn perform(&self, map: &mut Beatmap) -> ActionResult<()> {
        apply_changes(&mut map.hit_objects, &self.changes, KIND, true, set_hitsounds)
    }

    fn undo(&self, map: &mut Beatmap) -> ActionResult<()> {
        apply_changes(&mut map.hit_objects, &self.changes, KIND, false, set_hitsounds)
    }

    fn description(&self) -> String {
        format!(
            "Remove Hitsound {:?} from {} Hit Objects",
            self.sound,
            self.changes.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::TimingPoint;

    fn map_with_notes() -> Beatmap {
        let mut map = Beatmap::new(4);
        map.hit_objects.insert(HitObject::new(1, 1, 1000)).unwrap();
        map.hit_objects
            .insert(HitObject::new(2, 2, 1500).with_end_time(2000))
            .unwrap();
        map.hit_objects.insert(HitObject::new(3, 4, 3000)).unwrap();
        map
    }

    fn assert_inverse(map: &mut Beatmap, action: &dyn UndoableAction) {
        let before = map.clone();
        action.perform(map).unwrap();
        assert_ne!(*map, before, "{} changed nothing", action.description());
        action.undo(map).unwrap();
        assert_eq!(*map, before, "{} is not inverted", action.description());
    }

    #[test]
    fn test_place_and_undo() {
        let mut map = map_with_notes();
        let action = PlaceHitObject::new(&map, HitObject::new(10, 3, 500)).unwrap();

        action.perform(&mut map).unwrap();
        assert!(map.hit_objects.contains(10));
        assert_eq!(map.hit_objects.iter().next().map(|o| o.id), Some(10));

        action.undo(&mut map).unwrap();
        assert!(!map.hit_objects.contains(10));
    }

    #[test]
    fn test_place_rejects_invalid_lane() {
        let map = map_with_notes();
        let err = PlaceHitObject::new(&map, HitObject::new(10, 5, 500)).unwrap_err();
        assert_eq!(
            err,
            ActionError::Rejected(Rejection::LaneOutOfRange {
                lane: 5,
                key_count: 4
            })
        );
    }

    #[test]
    fn test_place_rejects_global_group() {
        let map = map_with_notes();
        let object = HitObject::new(10, 1, 0).with_timing_group(GLOBAL_TIMING_GROUP);
        assert!(PlaceHitObject::new(&map, object).is_err());
    }

    #[test]
    fn test_place_batch_rejects_duplicate_ids() {
        let map = map_with_notes();
        let objects = vec![HitObject::new(10, 1, 0), HitObject::new(10, 2, 0)];
        assert!(PlaceHitObjectBatch::new(&map, objects).is_err());
        assert!(PlaceHitObjectBatch::new(&map, Vec::new()).is_err());
    }

    #[test]
    fn test_place_twice_reports_duplicate() {
        let mut map = map_with_notes();
        let action = PlaceHitObject::new(&map, HitObject::new(10, 3, 500)).unwrap();
        action.perform(&mut map).unwrap();

        assert_eq!(
            action.perform(&mut map),
            Err(ActionError::duplicate(KIND, 10))
        );
    }

    #[test]
    fn test_remove_batch_inverse() {
        let mut map = map_with_notes();
        let action = RemoveHitObjectBatch::new(&map, &[1, 3]).unwrap();
        assert_inverse(&mut map, &action);
    }

    #[test]
    fn test_remove_unknown_is_rejected() {
        let map = map_with_notes();
        assert!(RemoveHitObject::new(&map, 99).unwrap_err().is_rejection());
    }

    #[test]
    fn test_resize_long_note() {
        let mut map = map_with_notes();
        let action = ResizeLongNote::new(&map, 1, 1400).unwrap();
        action.perform(&mut map).unwrap();
        assert_eq!(map.hit_object(1).unwrap().end_time, Some(1400));
        action.undo(&mut map).unwrap();
        assert_eq!(map.hit_object(1).unwrap().end_time, None);

        let shrink = ResizeLongNote::new(&map, 2, 1500).unwrap();
        assert_eq!(shrink.new_end, None);
        assert_inverse(&mut map, &shrink);
    }

    #[test]
    fn test_flip() {
        let mut map = map_with_notes();
        let action = FlipHitObjects::new(&map, &[1, 3]).unwrap();
        action.perform(&mut map).unwrap();

        assert_eq!(map.hit_object(1).unwrap().lane, 4);
        assert_eq!(map.hit_object(3).unwrap().lane, 1);
        action.undo(&mut map).unwrap();
        assert_eq!(map.hit_object(1).unwrap().lane, 1);
    }

    #[test]
    fn test_reverse() {
        let mut map = map_with_notes();
        let action = ReverseHitObjects::new(&map, &[1, 2, 3]).unwrap();
        action.perform(&mut map).unwrap();

        // Span is 1000..3000, pivot 4000
        assert_eq!(map.hit_object(1).unwrap().start_time, 3000);
        assert_eq!(map.hit_object(3).unwrap().start_time, 1000);
        let long_note = map.hit_object(2).unwrap();
        assert_eq!(long_note.start_time, 2000);
        assert_eq!(long_note.end_time, Some(2500));

        action.undo(&mut map).unwrap();
        assert_eq!(map, map_with_notes());
    }

    #[test]
    fn test_swap_lanes() {
        let mut map = map_with_notes();
        let action = SwapLanes::new(&map, &[1, 2, 3], 1, 2).unwrap();
        assert_eq!(action.changes.len(), 2);

        action.perform(&mut map).unwrap();
        assert_eq!(map.hit_object(1).unwrap().lane, 2);
        assert_eq!(map.hit_object(2).unwrap().lane, 1);
        assert_eq!(map.hit_object(3).unwrap().lane, 4);

        assert!(SwapLanes::new(&map, &[3], 1, 2).is_err());
    }

    #[test]
    fn test_move_out_of_range_is_rejected() {
        let map = map_with_notes();
        assert!(MoveHitObjects::new(&map, &[3], 1, 0).is_err());
        assert!(MoveHitObjects::new(&map, &[1], 0, 0).is_err());
    }

    #[test]
    fn test_move_inverse() {
        let mut map = map_with_notes();
        let action = MoveHitObjects::new(&map, &[1, 2], 1, 250).unwrap();
        action.perform(&mut map).unwrap();
        let moved = map.hit_object(2).unwrap();
        assert_eq!((moved.lane, moved.start_time, moved.end_time), (3, 1750, Some(2250)));
        action.undo(&mut map).unwrap();
        assert_eq!(map, map_with_notes());
    }

    #[test]
    fn test_resnap() {
        let mut map = Beatmap::new(4);
        map.timing_points
            .insert(TimingPoint::new(100, 0.0, 120.0))
            .unwrap();
        map.hit_objects.insert(HitObject::new(1, 1, 260)).unwrap();
        map.hit_objects.insert(HitObject::new(2, 2, 500)).unwrap();

        // 1/4 snap at 120 BPM is 125ms
        let action = ResnapHitObjects::new(&map, &[1, 2], 4).unwrap();
        assert_eq!(action.changes.len(), 1);
        assert_inverse(&mut map, &action);

        action.perform(&mut map).unwrap();
        assert_eq!(map.hit_object(1).unwrap().start_time, 250);
    }

    #[test]
    fn test_resnap_long_note_at_end_of_time_range() {
        let mut map = Beatmap::new(4);
        // 2ms beats, so both ends snap onto i32::MAX
        map.timing_points
            .insert(TimingPoint::new(100, 1.0, 30000.0))
            .unwrap();
        map.hit_objects
            .insert(HitObject::new(2, 1, i32::MAX - 1).with_end_time(i32::MAX))
            .unwrap();

        assert_eq!(
            ResnapHitObjects::new(&map, &[2], 1).unwrap_err(),
            ActionError::Rejected(Rejection::InvalidValue {
                field: "end_time",
                value: f64::from(i32::MAX),
            })
        );
    }

    #[test]
    fn test_reverse_near_end_of_time_range() {
        let mut map = Beatmap::new(4);
        map.hit_objects
            .insert(HitObject::new(1, 1, i32::MAX - 10))
            .unwrap();
        map.hit_objects.insert(HitObject::new(2, 2, i32::MAX)).unwrap();

        let action = ReverseHitObjects::new(&map, &[1, 2]).unwrap();
        assert_inverse(&mut map, &action);
        action.perform(&mut map).unwrap();
        assert_eq!(map.hit_object(1).unwrap().start_time, i32::MAX);
        assert_eq!(map.hit_object(2).unwrap().start_time, i32::MAX - 10);
    }

    #[test]
    fn test_resnap_without_timing_points() {
        let map = map_with_notes();
        assert_eq!(
            ResnapHitObjects::new(&map, &[1], 4).unwrap_err(),
            ActionError::Rejected(Rejection::NoTimingPoints)
        );
    }

    #[test]
    fn test_hitsounds_restore_exact_flags() {
        let mut map = map_with_notes();
        map.hit_objects
            .update(1, |o| o.hitsounds = HitSounds::CLAP)
            .unwrap();
        let before = map.clone();

        let add = AddHitsound::new(&map, &[1, 3], HitSounds::CLAP).unwrap();
        assert_eq!(add.changes.len(), 1);
        add.perform(&mut map).unwrap();
        assert_eq!(map.hit_object(3).unwrap().hitsounds, HitSounds::CLAP);
        add.undo(&mut map).unwrap();
        assert_eq!(map, before);

        let remove = RemoveHitsound::new(&map, &[1, 3], HitSounds::CLAP).unwrap();
        assert_inverse(&mut map, &remove);
        assert!(RemoveHitsound::new(&map, &[3], HitSounds::CLAP).is_err());
    }
}
