// Timing point actions

use crate::command::actions::{
    ValueChange, apply_changes, changed, insert_all, lookup_all, remove_all, require_finite,
    require_positive,
};
use crate::command::trait_def::{ActionError, ActionResult, EntityKind, Rejection, UndoableAction};
use crate::map::{Beatmap, TimingPoint, TimingPointId};

const KIND: EntityKind = EntityKind::TimingPoint;

fn validate_new_point(map: &Beatmap, point: &TimingPoint) -> ActionResult<()> {
    require_finite("start_time", point.start_time)?;
    require_positive("bpm", point.bpm)?;
    if point.signature == 0 {
        return Err(Rejection::InvalidValue {
            field: "signature",
            value: 0.0,
        }
        .into());
    }
    if map.timing_points.contains(point.id) {
        return Err(ActionError::duplicate(KIND, point.id));
    }
    Ok(())
}

fn lookup(map: &Beatmap, id: TimingPointId) -> ActionResult<&TimingPoint> {
    map.timing_points
        .get(id)
        .ok_or_else(|| Rejection::unknown(KIND, id).into())
}

fn set_start_time(point: &mut TimingPoint, start_time: f32) {
    point.start_time = start_time;
}

fn set_bpm(point: &mut TimingPoint, bpm: f32) {
    point.bpm = bpm;
}

fn set_hidden(point: &mut TimingPoint, hidden: bool) {
    point.hidden = hidden;
}

fn set_signature(point: &mut TimingPoint, signature: u32) {
    point.signature = signature;
}

#[derive(Debug)]
pub struct AddTimingPoint {
    pub(crate) point: TimingPoint,
}

impl AddTimingPoint {
    pub fn new(map: &Beatmap, point: TimingPoint) -> ActionResult<Self> {
        validate_new_point(map, &point)?;
        Ok(Self { point })
    }
}

impl UndoableAction for AddTimingPoint {
    fn perform(&self, map: &mut Beatmap) -> ActionResult<()> {
        insert_all(&mut map.timing_points, std::slice::from_ref(&self.point), KIND)
    }

    fn undo(&self, map: &mut Beatmap) -> ActionResult<()> {
        remove_all(&mut map.timing_points, [self.point.id], KIND)
    }

    fn description(&self) -> String {
        format!(
            "Add Timing Point at {}ms ({} BPM)",
            self.point.start_time, self.point.bpm
        )
    }
}

#[derive(Debug)]
pub struct RemoveTimingPoint {
    pub(crate) point: TimingPoint,
}

impl RemoveTimingPoint {
    pub fn new(map: &Beatmap, id: TimingPointId) -> ActionResult<Self> {
        Ok(Self {
            point: lookup(map, id)?.clone(),
        })
    }
}

impl UndoableAction for RemoveTimingPoint {
    fn perform(&self, map: &mut Beatmap) -> ActionResult<()> {
        remove_all(&mut map.timing_points, [self.point.id], KIND)
    }

    fn undo(&self, map: &mut Beatmap) -> ActionResult<()> {
        insert_all(&mut map.timing_points, std::slice::from_ref(&self.point), KIND)
    }

    fn description(&self) -> String {
        format!("Remove Timing Point at {}ms", self.point.start_time)
    }
}

#[derive(Debug)]
pub struct AddTimingPointBatch {
    pub(crate) points: Vec<TimingPoint>,
}

impl AddTimingPointBatch {
    pub fn new(map: &Beatmap, points: Vec<TimingPoint>) -> ActionResult<Self> {
        if points.is_empty() {
            return Err(Rejection::EmptyTarget.into());
        }
        for (index, point) in points.iter().enumerate() {
            validate_new_point(map, point)?;
            if points[..index].iter().any(|other| other.id == point.id) {
                return Err(ActionError::duplicate(KIND, point.id));
            }
        }
        Ok(Self { points })
    }
}

impl UndoableAction for AddTimingPointBatch {
    fn perform(&self, map: &mut Beatmap) -> ActionResult<()> {
        insert_all(&mut map.timing_points, &self.points, KIND)
    }

    fn undo(&self, map: &mut Beatmap) -> ActionResult<()> {
        remove_all(
            &mut map.timing_points,
            self.points.iter().map(|point| point.id),
            KIND,
        )
    }

    fn description(&self) -> String {
        format!("Add {} Timing Points", self.points.len())
    }
}

#[derive(Debug)]
pub struct RemoveTimingPointBatch {
    pub(crate) points: Vec<TimingPoint>,
}

impl RemoveTimingPointBatch {
    pub fn new(map: &Beatmap, ids: &[TimingPointId]) -> ActionResult<Self> {
        Ok(Self {
            points: lookup_all(&map.timing_points, ids, KIND)?,
        })
    }
}

impl UndoableAction for RemoveTimingPointBatch {
    fn perform(&self, map: &mut Beatmap) -> ActionResult<()> {
        remove_all(
            &mut map.timing_points,
            self.points.iter().map(|point| point.id),
            KIND,
        )
    }

    fn undo(&self, map: &mut Beatmap) -> ActionResult<()> {
        insert_all(&mut map.timing_points, &self.points, KIND)
    }

    fn description(&self) -> String {
        format!("Remove {} Timing Points", self.points.len())
    }
}

/// Move one timing point to a new offset
#[derive(Debug)]
pub struct ChangeTimingPointOffset {
    pub(crate) change: ValueChange<f32>,
}

impl ChangeTimingPointOffset {
    pub fn new(map: &Beatmap, id: TimingPointId, offset: f32) -> ActionResult<Self> {
        require_finite("start_time", offset)?;
        let point = lookup(map, id)?;
        let change = changed(vec![ValueChange::new(id, point.start_time, offset)])?;
        Ok(Self {
            change: change[0].clone(),
        })
    }
}

fn apply_single<V: Clone>(
    map: &mut Beatmap,
    change: &ValueChange<V>,
    use_new: bool,
    set: impl Fn(&mut TimingPoint, V),
) -> ActionResult<()> {
    let changes = std::slice::from_ref(change);
    apply_changes(&mut map.timing_points, changes, KIND, use_new, set)
}

impl UndoableAction for ChangeTimingPointOffset {
    fn perform(&self, map: &mut Beatmap) -> ActionResult<()> {
        apply_single(map, &self.change, true, set_start_time)
    }

    fn undo(&self, map: &mut Beatmap) -> ActionResult<()> {
        apply_single(map, &self.change, false, set_start_time)
    }

    fn description(&self) -> String {
        format!("Move Timing Point to {}ms", self.change.new)
    }
}

#[derive(Debug)]
pub struct ChangeTimingPointBpm {
    pub(crate) change: ValueChange<f32>,
}

impl ChangeTimingPointBpm {
    pub fn new(map: &Beatmap, id: TimingPointId, bpm: f32) -> ActionResult<Self> {
        require_positive("bpm", bpm)?;
        let point = lookup(map, id)?;
        let change = changed(vec![ValueChange::new(id, point.bpm, bpm)])?;
        Ok(Self {
            change: change[0].clone(),
        })
    }
}

impl UndoableAction for ChangeTimingPointBpm {
    fn perform(&self, map: &mut Beatmap) -> ActionResult<()> {
        apply_single(map, &self.change, true, set_bpm)
    }

    fn undo(&self, map: &mut Beatmap) -> ActionResult<()> {
        apply_single(map, &self.change, false, set_bpm)
    }

    fn description(&self) -> String {
        format!("Change Timing Point BPM to {}", self.change.new)
    }
}

#[derive(Debug)]
pub struct ChangeTimingPointHidden {
    pub(crate) change: ValueChange<bool>,
}

impl ChangeTimingPointHidden {
    pub fn new(map: &Beatmap, id: TimingPointId, hidden: bool) -> ActionResult<Self> {
        let point = lookup(map, id)?;
        let change = changed(vec![ValueChange::new(id, point.hidden, hidden)])?;
        Ok(Self {
            change: change[0].clone(),
        })
    }
}

impl UndoableAction for ChangeTimingPointHidden {
    fn perform(&self, map: &mut Beatmap) -> ActionResult<()> {
        apply_single(map, &self.change, true, set_hidden)
    }

    fn undo(&self, map: &mut Beatmap) -> ActionResult<()> {
        apply_single(map, &self.change, false, set_hidden)
    }

    fn description(&self) -> String {
        if self.change.new {
            "Hide Timing Point".to_string()
        } else {
            "Show Timing Point".to_string()
        }
    }
}

/// Shift several timing points by the same offset
#[derive(Debug)]
pub struct ChangeTimingPointOffsetBatch {
    pub(crate) delta: f32,
    pub(crate) changes: Vec<ValueChange<f32>>,
}

impl ChangeTimingPointOffsetBatch {
    pub fn new(map: &Beatmap, ids: &[TimingPointId], delta: f32) -> ActionResult<Self> {
        require_finite("offset", delta)?;
        let changes = lookup_all(&map.timing_points, ids, KIND)?
            .iter()
            .map(|point| {
                let moved = point.start_time + delta;
                require_finite("start_time", moved)?;
                Ok(ValueChange::new(point.id, point.start_time, moved))
            })
            .collect::<ActionResult<Vec<_>>>()?;
        Ok(Self {
            delta,
            changes: changed(changes)?,
        })
    }
}

impl UndoableAction for ChangeTimingPointOffsetBatch {
    fn perform(&self, map: &mut Beatmap) -> ActionResult<()> {
        apply_changes(&mut map.timing_points, &self.changes, KIND, true, set_start_time)
    }

    fn undo(&self, map: &mut Beatmap) -> ActionResult<()> {
        apply_changes(&mut map.timing_points, &self.changes, KIND, false, set_start_time)
    }

    fn description(&self) -> String {
        format!("Move {} Timing Points by {:+}ms", self.changes.len(), self.delta)
    }
}

/// Set the BPM of several timing points
#[derive(Debug)]
pub struct ChangeTimingPointBpmBatch {
    pub(crate) bpm: f32,
    pub(crate) changes: Vec<ValueChange<f32>>,
}

impl ChangeTimingPointBpmBatch {
    pub fn new(map: &Beatmap, ids: &[TimingPointId], bpm: f32) -> ActionResult<Self> {
        require_positive("bpm", bpm)?;
        let changes = lookup_all(&map.timing_points, ids, KIND)?
            .iter()
            .map(|point| ValueChange::new(point.id, point.bpm, bpm))
            .collect();
        Ok(Self {
            bpm,
            changes: changed(changes)?,
        })
    }
}

impl UndoableAction for ChangeTimingPointBpmBatch {
    fn perform(&self, map: &mut Beatmap) -> ActionResult<()> {
        apply_changes(&mut map.timing_points, &self.changes, KIND, true, set_bpm)
    }

    fn undo(&self, map: &mut Beatmap) -> ActionResult<()> {
        apply_changes(&mut map.timing_points, &self.changes, KIND, false, set_bpm)
    }

    fn description(&self) -> String {
        format!("Set {} Timing Points to {} BPM", self.changes.len(), self.bpm)
    }
}

/// Set the time signature of several timing points
#[derive(Debug)]
pub struct ChangeTimingPointSignatureBatch {
    pub(crate) signature: u32,
    pub(crate) changes: Vec<ValueChange<u32>>,
}

impl ChangeTimingPointSignatureBatch {
    pub fn new(map: &Beatmap, ids: &[TimingPointId], signature: u32) -> ActionResult<Self> {
        if signature == 0 {
            return Err(Rejection::InvalidValue {
                field: "signature",
                value: 0.0,
            }
            .into());
        }
        let changes = lookup_all(&map.timing_points, ids, KIND)?
            .iter()
            .map(|point| ValueChange::new(point.id, point.signature, signature))
            .collect();
        Ok(Self {
            signature,
            changes: changed(changes)?,
        })
    }
}

impl UndoableAction for ChangeTimingPointSignatureBatch {
    fn perform(&self, map: &mut Beatmap) -> ActionResult<()> {
        apply_changes(&mut map.timing_points, &self.changes, KIND, true, set_signature)
    }

    fn undo(&self, map: &mut Beatmap) -> ActionResult<()> {
        apply_changes(&mut map.timing_points, &self.changes, KIND, false, set_signature)
    }

    fn description(&self) -> String {
        format!(
            "Set {} Timing Points to {}/4",
            self.changes.len(),
            self.signature
        )
    }
}
