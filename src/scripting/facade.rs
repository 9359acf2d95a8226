// ScriptFacade - the editor as seen by plugins
//
// Scripts name an action by its tag name and pass positional JSON values.
// Selection, playhead and snap come from the session, never from the
// arguments. Whatever gets built here is performed through the session's
// history, exactly like a native edit.

use crate::command::actions::bookmarks::{
    AddBookmark, AddBookmarkBatch, ChangeBookmarkOffsetBatch, EditBookmark, RemoveBookmark,
    RemoveBookmarkBatch,
};
use crate::command::actions::hit_objects::{
    AddHitsound, FlipHitObjects, MoveHitObjects, PlaceHitObject, PlaceHitObjectBatch,
    RemoveHitObject, RemoveHitObjectBatch, RemoveHitsound, ResizeLongNote, ResnapHitObjects,
    ReverseHitObjects, SwapLanes,
};
use crate::command::actions::layers::{
    ColorLayer, CreateLayer, MoveToLayer, RemoveLayer, RenameLayer, ToggleLayerVisibility,
};
use crate::command::actions::metadata::ChangePreviewTime;
use crate::command::actions::scroll_velocities::{
    AddScrollVelocity, AddScrollVelocityBatch, ChangeScrollVelocityMultiplierBatch,
    ChangeScrollVelocityOffsetBatch, RemoveScrollVelocity, RemoveScrollVelocityBatch,
};
use crate::command::actions::timing_groups::{
    ChangeInitialScrollVelocity, ColorTimingGroup, CreateTimingGroup, MoveObjectsToTimingGroup,
    RemoveTimingGroup, RenameTimingGroup,
};
use crate::command::actions::timing_points::{
    AddTimingPoint, AddTimingPointBatch, ChangeTimingPointBpm, ChangeTimingPointBpmBatch,
    ChangeTimingPointHidden, ChangeTimingPointOffset, ChangeTimingPointOffsetBatch,
    ChangeTimingPointSignatureBatch, RemoveTimingPoint, RemoveTimingPointBatch,
};
use crate::command::{
    ActionError, ActionOrigin, ActionTag, BatchAction, EditorAction, Rejection, UndoableAction,
};
use crate::editor::EditorSession;
use crate::map::{
    Beatmap, Bookmark, DEFAULT_COLOR, DEFAULT_TIMING_GROUP, EditorLayer, HitObject, HitObjectId,
    ScrollVelocity, TimingGroup, TimingPoint,
};
use crate::scripting::{ArgReader, Arity, ScriptError, ScriptResult};
use log::{debug, warn};
use serde_json::Value;

/// Session state a script call may read while building an action
struct Context {
    selection: Vec<HitObjectId>,
    current_time: i32,
    beat_snap: u32,
}

impl Context {
    fn of(session: &EditorSession) -> Self {
        Self {
            selection: session.selection().ids(),
            current_time: session.current_time(),
            beat_snap: session.beat_snap(),
        }
    }
}

fn lane(map: &Beatmap, args: &ArgReader, index: usize) -> ScriptResult<u8> {
    let lane = args.integer(index)?;
    if !map.is_valid_lane(lane) {
        let rejection = Rejection::LaneOutOfRange {
            lane,
            key_count: map.key_count(),
        };
        return Err(ActionError::from(rejection).into());
    }
    Ok(lane as u8)
}

/// `[lane, start_time, end_time?, hitsounds?]`
fn hit_object(map: &mut Beatmap, args: &ArgReader) -> ScriptResult<HitObject> {
    let lane = lane(map, args, 0)?;
    let start_time = args.i32(1)?;
    let mut object = HitObject::new(map.allocate_id(), lane, start_time);
    if !args.is_missing(2) {
        object = object.with_end_time(args.i32(2)?);
    }
    if !args.is_missing(3) {
        object = object.with_hitsounds(args.hitsounds(3)?);
    }
    Ok(object)
}

/// `[start_time, bpm, signature?, hidden?]`
fn timing_point(map: &mut Beatmap, args: &ArgReader) -> ScriptResult<TimingPoint> {
    let mut point = TimingPoint::new(map.allocate_id(), args.float(0)?, args.float(1)?);
    if !args.is_missing(2) {
        point = point.with_signature(args.u32(2)?);
    }
    if !args.is_missing(3) {
        point = point.with_hidden(args.bool(3)?);
    }
    Ok(point)
}

/// `[start_time, multiplier]`
fn scroll_velocity(map: &mut Beatmap, args: &ArgReader) -> ScriptResult<ScrollVelocity> {
    Ok(ScrollVelocity::new(
        map.allocate_id(),
        args.float(0)?,
        args.float(1)?,
    ))
}

/// `[start_time, note?]`
fn bookmark(map: &mut Beatmap, args: &ArgReader, default_time: i32) -> ScriptResult<Bookmark> {
    let start_time = if args.is_missing(0) {
        default_time
    } else {
        args.i32(0)?
    };
    let note = if args.is_missing(1) {
        String::new()
    } else {
        args.string(1)?
    };
    Ok(Bookmark::new(map.allocate_id(), start_time, note))
}

fn rows<T>(
    map: &mut Beatmap,
    args: &ArgReader,
    index: usize,
    mut read: impl FnMut(&mut Beatmap, &ArgReader) -> ScriptResult<T>,
) -> ScriptResult<Vec<T>> {
    args.rows(index)?
        .iter()
        .map(|row| read(map, row))
        .collect()
}

fn group_or_default(args: &ArgReader, index: usize) -> ScriptResult<String> {
    if args.is_missing(index) {
        Ok(DEFAULT_TIMING_GROUP.to_string())
    } else {
        args.string(index)
    }
}

/// Build one action. `Ok(None)` means a nested batch named an unknown tag.
fn build(
    map: &mut Beatmap,
    context: &Context,
    tag: ActionTag,
    values: &[Value],
) -> ScriptResult<Option<EditorAction>> {
    let expected = ScriptFacade::arity(tag);
    if !expected.accepts(values.len()) {
        return Err(ScriptError::Arity {
            tag,
            expected,
            got: values.len(),
        });
    }

    let args = ArgReader::new(values);
    let selected = context.selection.as_slice();
    let action: EditorAction = match tag {
        ActionTag::PlaceHitObject => {
            let object = hit_object(map, &args)?;
            PlaceHitObject::new(map, object)?.into()
        }
        ActionTag::PlaceHitObjectBatch => {
            let objects = rows(map, &args, 0, hit_object)?;
            PlaceHitObjectBatch::new(map, objects)?.into()
        }
        ActionTag::RemoveHitObject => RemoveHitObject::new(map, args.id(0)?)?.into(),
        ActionTag::RemoveHitObjectBatch => RemoveHitObjectBatch::new(map, selected)?.into(),
        ActionTag::ResizeLongNote => ResizeLongNote::new(map, args.id(0)?, args.i32(1)?)?.into(),
        ActionTag::FlipHitObjects => FlipHitObjects::new(map, selected)?.into(),
        ActionTag::ReverseHitObjects => ReverseHitObjects::new(map, selected)?.into(),
        ActionTag::SwapLanes => {
            SwapLanes::new(map, selected, args.integer(0)?, args.integer(1)?)?.into()
        }
        ActionTag::MoveHitObjects => {
            MoveHitObjects::new(map, selected, args.i32(0)?, args.i32(1)?)?.into()
        }
        ActionTag::ResnapHitObjects => {
            let snap = if args.is_missing(0) {
                context.beat_snap
            } else {
                args.u32(0)?
            };
            ResnapHitObjects::new(map, selected, snap)?.into()
        }
        ActionTag::AddHitsound => AddHitsound::new(map, selected, args.hitsounds(0)?)?.into(),
        ActionTag::RemoveHitsound => RemoveHitsound::new(map, selected, args.hitsounds(0)?)?.into(),

        ActionTag::CreateLayer => {
            let name = args.string(0)?;
            let color = if args.is_missing(1) {
                DEFAULT_COLOR
            } else {
                args.color(1)?
            };
            let layer = EditorLayer::new(map.allocate_id(), name, color);
            CreateLayer::new(map, layer)?.into()
        }
        ActionTag::RemoveLayer => RemoveLayer::new(map, args.id(0)?)?.into(),
        ActionTag::RenameLayer => RenameLayer::new(map, args.id(0)?, args.string(1)?)?.into(),
        ActionTag::ColorLayer => ColorLayer::new(map, args.id(0)?, args.color(1)?)?.into(),
        ActionTag::ToggleLayerVisibility => ToggleLayerVisibility::new(map, args.id(0)?)?.into(),
        ActionTag::MoveToLayer => MoveToLayer::new(map, selected, args.id(0)?)?.into(),

        ActionTag::AddTimingPoint => {
            let point = timing_point(map, &args)?;
            AddTimingPoint::new(map, point)?.into()
        }
        ActionTag::RemoveTimingPoint => RemoveTimingPoint::new(map, args.id(0)?)?.into(),
        ActionTag::AddTimingPointBatch => {
            let points = rows(map, &args, 0, timing_point)?;
            AddTimingPointBatch::new(map, points)?.into()
        }
        ActionTag::RemoveTimingPointBatch => {
            RemoveTimingPointBatch::new(map, &args.ids(0)?)?.into()
        }
        ActionTag::ChangeTimingPointOffset => {
            ChangeTimingPointOffset::new(map, args.id(0)?, args.float(1)?)?.into()
        }
        ActionTag::ChangeTimingPointBpm => {
            ChangeTimingPointBpm::new(map, args.id(0)?, args.float(1)?)?.into()
        }
        ActionTag::ChangeTimingPointHidden => {
            ChangeTimingPointHidden::new(map, args.id(0)?, args.bool(1)?)?.into()
        }
        ActionTag::ChangeTimingPointOffsetBatch => {
            ChangeTimingPointOffsetBatch::new(map, &args.ids(0)?, args.float(1)?)?.into()
        }
        ActionTag::ChangeTimingPointBpmBatch => {
            ChangeTimingPointBpmBatch::new(map, &args.ids(0)?, args.float(1)?)?.into()
        }
        ActionTag::ChangeTimingPointSignatureBatch => {
            ChangeTimingPointSignatureBatch::new(map, &args.ids(0)?, args.u32(1)?)?.into()
        }

        ActionTag::AddScrollVelocity => {
            let velocity = scroll_velocity(map, &args)?;
            let group = group_or_default(&args, 2)?;
            AddScrollVelocity::new(map, &group, velocity)?.into()
        }
        ActionTag::RemoveScrollVelocity => RemoveScrollVelocity::new(map, args.id(0)?)?.into(),
        ActionTag::AddScrollVelocityBatch => {
            let velocities = rows(map, &args, 0, scroll_velocity)?;
            let group = group_or_default(&args, 1)?;
            AddScrollVelocityBatch::new(map, &group, velocities)?.into()
        }
        ActionTag::RemoveScrollVelocityBatch => {
            RemoveScrollVelocityBatch::new(map, &args.ids(0)?)?.into()
        }
        ActionTag::ChangeScrollVelocityOffsetBatch => {
            ChangeScrollVelocityOffsetBatch::new(map, &args.ids(0)?, args.float(1)?)?.into()
        }
        ActionTag::ChangeScrollVelocityMultiplierBatch => {
            ChangeScrollVelocityMultiplierBatch::new(map, &args.ids(0)?, args.float(1)?)?.into()
        }

        ActionTag::CreateTimingGroup => {
            let initial_scroll_velocity = if args.is_missing(1) {
                1.0
            } else {
                args.float(1)?
            };
            let color = if args.is_missing(2) {
                DEFAULT_COLOR
            } else {
                args.color(2)?
            };
            let group = TimingGroup::new(args.string(0)?, initial_scroll_velocity, color);
            CreateTimingGroup::new(map, group, selected)?.into()
        }
        ActionTag::RemoveTimingGroup => RemoveTimingGroup::new(map, &args.string(0)?)?.into(),
        ActionTag::RenameTimingGroup => {
            RenameTimingGroup::new(map, &args.string(0)?, &args.string(1)?)?.into()
        }
        ActionTag::ColorTimingGroup => {
            ColorTimingGroup::new(map, &args.string(0)?, args.color(1)?)?.into()
        }
        ActionTag::MoveObjectsToTimingGroup => {
            MoveObjectsToTimingGroup::new(map, selected, &args.string(0)?)?.into()
        }
        ActionTag::ChangeInitialScrollVelocity => {
            ChangeInitialScrollVelocity::new(map, &args.string(0)?, args.float(1)?)?.into()
        }

        ActionTag::AddBookmark => {
            let bookmark = bookmark(map, &args, context.current_time)?;
            AddBookmark::new(map, bookmark)?.into()
        }
        ActionTag::RemoveBookmark => RemoveBookmark::new(map, args.id(0)?)?.into(),
        ActionTag::AddBookmarkBatch => {
            let time = context.current_time;
            let bookmarks = rows(map, &args, 0, |map, row| bookmark(map, row, time))?;
            AddBookmarkBatch::new(map, bookmarks)?.into()
        }
        ActionTag::RemoveBookmarkBatch => RemoveBookmarkBatch::new(map, &args.ids(0)?)?.into(),
        ActionTag::EditBookmark => EditBookmark::new(map, args.id(0)?, args.string(1)?)?.into(),
        ActionTag::ChangeBookmarkOffsetBatch => {
            ChangeBookmarkOffsetBatch::new(map, &args.ids(0)?, args.i32(1)?)?.into()
        }

        ActionTag::ChangePreviewTime => {
            let time = if args.is_missing(0) {
                context.current_time
            } else {
                args.i32(0)?
            };
            ChangePreviewTime::new(map, time)?.into()
        }

        ActionTag::Batch => return build_batch(map, context, &args),
    };
    Ok(Some(action))
}

/// `[[tag_name, [args...]], ...]`
///
/// Children are built one after another against a scratch copy of the map
/// with the earlier children already applied, so a child may refer to
/// entities an earlier child creates.
fn build_batch(
    map: &mut Beatmap,
    context: &Context,
    args: &ArgReader,
) -> ScriptResult<Option<EditorAction>> {
    let mut scratch = map.clone();
    let mut children = Vec::new();

    for row in args.rows(0)? {
        let name = row.string(0)?;
        let child_args = if row.is_missing(1) { &[][..] } else { row.list(1)? };

        let Some(tag) = ActionTag::from_name(&name) else {
            warn!("Unsupported script action '{}' inside batch", name);
            return Ok(None);
        };
        let Some(child) = build(&mut scratch, context, tag, child_args)? else {
            return Ok(None);
        };
        child.perform(&mut scratch)?;
        children.push(child);
    }

    map.adopt_id_counter(&scratch);
    Ok(Some(BatchAction::new(children)?.into()))
}

/// Narrow, marshalled access to an editing session for scripts
pub struct ScriptFacade<'s> {
    session: &'s mut EditorSession,
}

impl<'s> ScriptFacade<'s> {
    pub fn new(session: &'s mut EditorSession) -> Self {
        Self { session }
    }

    /// How many positional arguments each tag takes
    pub fn arity(tag: ActionTag) -> Arity {
        match tag {
            ActionTag::PlaceHitObject => Arity::between(2, 4),
            ActionTag::PlaceHitObjectBatch => Arity::exactly(1),
            ActionTag::RemoveHitObject => Arity::exactly(1),
            ActionTag::RemoveHitObjectBatch => Arity::exactly(0),
            ActionTag::ResizeLongNote => Arity::exactly(2),
            ActionTag::FlipHitObjects => Arity::exactly(0),
            ActionTag::ReverseHitObjects => Arity::exactly(0),
            ActionTag::SwapLanes => Arity::exactly(2),
            ActionTag::MoveHitObjects => Arity::exactly(2),
            ActionTag::ResnapHitObjects => Arity::between(0, 1),
            ActionTag::AddHitsound => Arity::exactly(1),
            ActionTag::RemoveHitsound => Arity::exactly(1),
            ActionTag::CreateLayer => Arity::between(1, 2),
            ActionTag::RemoveLayer => Arity::exactly(1),
            ActionTag::RenameLayer => Arity::exactly(2),
            ActionTag::ColorLayer => Arity::exactly(2),
            ActionTag::ToggleLayerVisibility => Arity::exactly(1),
            ActionTag::MoveToLayer => Arity::exactly(1),
            ActionTag::AddTimingPoint => Arity::between(2, 4),
            ActionTag::RemoveTimingPoint => Arity::exactly(1),
            ActionTag::AddTimingPointBatch => Arity::exactly(1),
            ActionTag::RemoveTimingPointBatch => Arity::exactly(1),
            ActionTag::ChangeTimingPointOffset => Arity::exactly(2),
            ActionTag::ChangeTimingPointBpm => Arity::exactly(2),
            ActionTag::ChangeTimingPointHidden => Arity::exactly(2),
            ActionTag::ChangeTimingPointOffsetBatch => Arity::exactly(2),
            ActionTag::ChangeTimingPointBpmBatch => Arity::exactly(2),
            ActionTag::ChangeTimingPointSignatureBatch => Arity::exactly(2),
            ActionTag::AddScrollVelocity => Arity::between(2, 3),
            ActionTag::RemoveScrollVelocity => Arity::exactly(1),
            ActionTag::AddScrollVelocityBatch => Arity::between(1, 2),
            ActionTag::RemoveScrollVelocityBatch => Arity::exactly(1),
            ActionTag::ChangeScrollVelocityOffsetBatch => Arity::exactly(2),
            ActionTag::ChangeScrollVelocityMultiplierBatch => Arity::exactly(2),
            ActionTag::CreateTimingGroup => Arity::between(1, 3),
            ActionTag::RemoveTimingGroup => Arity::exactly(1),
            ActionTag::RenameTimingGroup => Arity::exactly(2),
            ActionTag::ColorTimingGroup => Arity::exactly(2),
            ActionTag::MoveObjectsToTimingGroup => Arity::exactly(1),
            ActionTag::ChangeInitialScrollVelocity => Arity::exactly(2),
            ActionTag::AddBookmark => Arity::between(0, 2),
            ActionTag::RemoveBookmark => Arity::exactly(1),
            ActionTag::AddBookmarkBatch => Arity::exactly(1),
            ActionTag::RemoveBookmarkBatch => Arity::exactly(1),
            ActionTag::EditBookmark => Arity::exactly(2),
            ActionTag::ChangeBookmarkOffsetBatch => Arity::exactly(2),
            ActionTag::ChangePreviewTime => Arity::between(0, 1),
            ActionTag::Batch => Arity::exactly(1),
        }
    }

    /// Build the action named `tag_name` without performing it
    ///
    /// Unknown tag names yield `Ok(None)` so scripts can probe for support.
    pub fn construct(
        &mut self,
        tag_name: &str,
        args: &[Value],
    ) -> ScriptResult<Option<EditorAction>> {
        let Some(tag) = ActionTag::from_name(tag_name) else {
            warn!("Unsupported script action '{}'", tag_name);
            return Ok(None);
        };
        let context = Context::of(self.session);
        build(self.session.map_mut(), &context, tag, args)
            .inspect_err(|err| warn!("Script action '{}' refused: {}", tag_name, err))
    }

    /// Build and perform an action. Returns false for unknown tags.
    pub fn perform(&mut self, tag_name: &str, args: &[Value]) -> ScriptResult<bool> {
        let Some(action) = self.construct(tag_name, args)? else {
            return Ok(false);
        };
        debug!("Script performs {}", tag_name);
        self.session
            .perform_with_origin(action, ActionOrigin::Script)?;
        Ok(true)
    }

    pub fn undo(&mut self) -> ScriptResult<bool> {
        Ok(self.session.undo_with_origin(ActionOrigin::Script)?)
    }

    pub fn redo(&mut self) -> ScriptResult<bool> {
        Ok(self.session.redo_with_origin(ActionOrigin::Script)?)
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.session.has_unsaved_changes()
    }

    // Read-only queries. Everything is returned by value so scripts never
    // hold references into the map.

    pub fn selected_hit_objects(&self) -> Vec<HitObject> {
        let map = self.session.map();
        self.session
            .selection()
            .ids()
            .into_iter()
            .filter_map(|id| map.hit_object(id).cloned())
            .collect()
    }

    pub fn current_time(&self) -> i32 {
        self.session.current_time()
    }

    pub fn beat_snap(&self) -> u32 {
        self.session.beat_snap()
    }

    pub fn key_count(&self) -> u8 {
        self.session.map().key_count()
    }

    pub fn hit_object(&self, id: HitObjectId) -> Option<HitObject> {
        self.session.map().hit_object(id).cloned()
    }

    pub fn timing_points(&self) -> Vec<TimingPoint> {
        self.session.map().timing_points.iter().cloned().collect()
    }

    pub fn layers(&self) -> Vec<EditorLayer> {
        self.session.map().layers.clone()
    }

    pub fn bookmarks(&self) -> Vec<Bookmark> {
        self.session.map().bookmarks.iter().cloned().collect()
    }
}
