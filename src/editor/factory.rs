// Typed entry points for the native editor, one per edit kind
//
// Each method builds the matching action against the live map and performs
// it. A rejected edit is logged and returned without touching the history.

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
use crate::command::{ActionResult, EditorAction};
use crate::editor::EditorSession;
use crate::map::{
    Bookmark, BookmarkId, EditorLayer, HitObject, HitObjectId, HitSounds, LayerId,
    ScrollVelocity, ScrollVelocityId, TimingGroup, TimingPoint, TimingPointId,
};
use log::warn;

impl EditorSession {
    fn submit<A: Into<EditorAction>>(&mut self, built: ActionResult<A>) -> ActionResult<()> {
        let action = built.inspect_err(|err| warn!("Edit rejected: {}", err))?;
        self.perform(action.into())
    }

    /// A hit object with a fresh id, not yet placed
    pub fn new_hit_object(&mut self, lane: u8, start_time: i32) -> HitObject {
        HitObject::new(self.map.allocate_id(), lane, start_time)
    }

    /// A timing point with a fresh id, not yet added
    pub fn new_timing_point(&mut self, start_time: f32, bpm: f32) -> TimingPoint {
        TimingPoint::new(self.map.allocate_id(), start_time, bpm)
    }

    /// A scroll velocity with a fresh id, not yet added
    pub fn new_scroll_velocity(&mut self, start_time: f32, multiplier: f32) -> ScrollVelocity {
        ScrollVelocity::new(self.map.allocate_id(), start_time, multiplier)
    }

    /// A bookmark with a fresh id, not yet added
    pub fn new_bookmark(&mut self, start_time: i32, note: impl Into<String>) -> Bookmark {
        Bookmark::new(self.map.allocate_id(), start_time, note)
    }

    // Hit objects

    pub fn place_hit_object(&mut self, lane: u8, start_time: i32) -> ActionResult<HitObjectId> {
        let object = self.new_hit_object(lane, start_time);
        self.place(object)
    }

    pub fn place_long_note(
        &mut self,
        lane: u8,
        start_time: i32,
        end_time: i32,
    ) -> ActionResult<HitObjectId> {
        let object = self.new_hit_object(lane, start_time).with_end_time(end_time);
        self.place(object)
    }

    /// Place a fully specified hit object
    pub fn place(&mut self, object: HitObject) -> ActionResult<HitObjectId> {
        let id = object.id;
        self.submit(PlaceHitObject::new(&self.map, object))?;
        Ok(id)
    }

    pub fn place_hit_objects(&mut self, objects: Vec<HitObject>) -> ActionResult<()> {
        self.submit(PlaceHitObjectBatch::new(&self.map, objects))
    }

    pub fn remove_hit_object(&mut self, id: HitObjectId) -> ActionResult<()> {
        self.submit(RemoveHitObject::new(&self.map, id))
    }

    pub fn remove_hit_objects(&mut self, ids: &[HitObjectId]) -> ActionResult<()> {
        self.submit(RemoveHitObjectBatch::new(&self.map, ids))
    }

    pub fn resize_long_note(&mut self, id: HitObjectId, end_time: i32) -> ActionResult<()> {
        self.submit(ResizeLongNote::new(&self.map, id, end_time))
    }

    pub fn flip_hit_objects(&mut self, ids: &[HitObjectId]) -> ActionResult<()> {
        self.submit(FlipHitObjects::new(&self.map, ids))
    }

    pub fn reverse_hit_objects(&mut self, ids: &[HitObjectId]) -> ActionResult<()> {
        self.submit(ReverseHitObjects::new(&self.map, ids))
    }

    pub fn swap_lanes(&mut self, ids: &[HitObjectId], lane_a: u8, lane_b: u8) -> ActionResult<()> {
        self.submit(SwapLanes::new(
            &self.map,
            ids,
            i64::from(lane_a),
            i64::from(lane_b),
        ))
    }

    pub fn move_hit_objects(
        &mut self,
        ids: &[HitObjectId],
        lane_offset: i32,
        time_offset: i32,
    ) -> ActionResult<()> {
        self.submit(MoveHitObjects::new(&self.map, ids, lane_offset, time_offset))
    }

    /// Snap hit objects to the session's beat snap
    pub fn resnap_hit_objects(&mut self, ids: &[HitObjectId]) -> ActionResult<()> {
        let snap = self.beat_snap;
        self.submit(ResnapHitObjects::new(&self.map, ids, snap))
    }

    pub fn add_hitsound(&mut self, ids: &[HitObjectId], sound: HitSounds) -> ActionResult<()> {
        self.submit(AddHitsound::new(&self.map, ids, sound))
    }

    pub fn remove_hitsound(&mut self, ids: &[HitObjectId], sound: HitSounds) -> ActionResult<()> {
        self.submit(RemoveHitsound::new(&self.map, ids, sound))
    }

    // Layers

    pub fn create_layer(&mut self, name: &str, color: [u8; 3]) -> ActionResult<LayerId> {
        let id = self.map.allocate_id();
        self.submit(CreateLayer::new(&self.map, EditorLayer::new(id, name, color)))?;
        Ok(id)
    }

    pub fn remove_layer(&mut self, id: LayerId) -> ActionResult<()> {
        self.submit(RemoveLayer::new(&self.map, id))
    }

    pub fn rename_layer(&mut self, id: LayerId, name: &str) -> ActionResult<()> {
        self.submit(RenameLayer::new(&self.map, id, name))
    }

    pub fn color_layer(&mut self, id: LayerId, color: [u8; 3]) -> ActionResult<()> {
        self.submit(ColorLayer::new(&self.map, id, color))
    }

    pub fn toggle_layer_visibility(&mut self, id: LayerId) -> ActionResult<()> {
        self.submit(ToggleLayerVisibility::new(&self.map, id))
    }

    pub fn move_to_layer(&mut self, ids: &[HitObjectId], layer: LayerId) -> ActionResult<()> {
        self.submit(MoveToLayer::new(&self.map, ids, layer))
    }

    // Timing points

    pub fn add_timing_point(&mut self, start_time: f32, bpm: f32) -> ActionResult<TimingPointId> {
        let point = self.new_timing_point(start_time, bpm);
        let id = point.id;
        self.submit(AddTimingPoint::new(&self.map, point))?;
        Ok(id)
    }

    pub fn add_timing_points(&mut self, points: Vec<TimingPoint>) -> ActionResult<()> {
        self.submit(AddTimingPointBatch::new(&self.map, points))
    }

    pub fn remove_timing_point(&mut self, id: TimingPointId) -> ActionResult<()> {
        self.submit(RemoveTimingPoint::new(&self.map, id))
    }

    pub fn remove_timing_points(&mut self, ids: &[TimingPointId]) -> ActionResult<()> {
        self.submit(RemoveTimingPointBatch::new(&self.map, ids))
    }

    pub fn change_timing_point_offset(
        &mut self,
        id: TimingPointId,
        offset: f32,
    ) -> ActionResult<()> {
        self.submit(ChangeTimingPointOffset::new(&self.map, id, offset))
    }

    pub fn change_timing_point_bpm(&mut self, id: TimingPointId, bpm: f32) -> ActionResult<()> {
        self.submit(ChangeTimingPointBpm::new(&self.map, id, bpm))
    }

    pub fn set_timing_point_hidden(&mut self, id: TimingPointId, hidden: bool) -> ActionResult<()> {
        self.submit(ChangeTimingPointHidden::new(&self.map, id, hidden))
    }

    pub fn change_timing_point_offsets(
        &mut self,
        ids: &[TimingPointId],
        delta: f32,
    ) -> ActionResult<()> {
        self.submit(ChangeTimingPointOffsetBatch::new(&self.map, ids, delta))
    }

    pub fn change_timing_point_bpms(
        &mut self,
        ids: &[TimingPointId],
        bpm: f32,
    ) -> ActionResult<()> {
        self.submit(ChangeTimingPointBpmBatch::new(&self.map, ids, bpm))
    }

    pub fn change_timing_point_signatures(
        &mut self,
        ids: &[TimingPointId],
        signature: u32,
    ) -> ActionResult<()> {
        self.submit(ChangeTimingPointSignatureBatch::new(&self.map, ids, signature))
    }

    // Scroll velocities

    pub fn add_scroll_velocity(
        &mut self,
        group: &str,
        start_time: f32,
        multiplier: f32,
    ) -> ActionResult<ScrollVelocityId> {
        let velocity = self.new_scroll_velocity(start_time, multiplier);
        let id = velocity.id;
        self.submit(AddScrollVelocity::new(&self.map, group, velocity))?;
        Ok(id)
    }

    pub fn add_scroll_velocities(
        &mut self,
        group: &str,
        velocities: Vec<ScrollVelocity>,
    ) -> ActionResult<()> {
        self.submit(AddScrollVelocityBatch::new(&self.map, group, velocities))
    }

    pub fn remove_scroll_velocity(&mut self, id: ScrollVelocityId) -> ActionResult<()> {
        self.submit(RemoveScrollVelocity::new(&self.map, id))
    }

    pub fn remove_scroll_velocities(&mut self, ids: &[ScrollVelocityId]) -> ActionResult<()> {
        self.submit(RemoveScrollVelocityBatch::new(&self.map, ids))
    }

    pub fn change_scroll_velocity_offsets(
        &mut self,
        ids: &[ScrollVelocityId],
        delta: f32,
    ) -> ActionResult<()> {
        self.submit(ChangeScrollVelocityOffsetBatch::new(&self.map, ids, delta))
    }

    pub fn change_scroll_velocity_multipliers(
        &mut self,
        ids: &[ScrollVelocityId],
        multiplier: f32,
    ) -> ActionResult<()> {
        self.submit(ChangeScrollVelocityMultiplierBatch::new(
            &self.map, ids, multiplier,
        ))
    }

    // Timing groups

    pub fn create_timing_group(
        &mut self,
        id: &str,
        initial_scroll_velocity: f32,
        color: [u8; 3],
        members: &[HitObjectId],
    ) -> ActionResult<()> {
        let group = TimingGroup::new(id, initial_scroll_velocity, color);
        self.submit(CreateTimingGroup::new(&self.map, group, members))
    }

    pub fn remove_timing_group(&mut self, id: &str) -> ActionResult<()> {
        self.submit(RemoveTimingGroup::new(&self.map, id))
    }

    pub fn rename_timing_group(&mut self, id: &str, new_id: &str) -> ActionResult<()> {
        self.submit(RenameTimingGroup::new(&self.map, id, new_id))
    }

    pub fn color_timing_group(&mut self, id: &str, color: [u8; 3]) -> ActionResult<()> {
        self.submit(ColorTimingGroup::new(&self.map, id, color))
    }

    pub fn move_objects_to_timing_group(
        &mut self,
        ids: &[HitObjectId],
        group: &str,
    ) -> ActionResult<()> {
        self.submit(MoveObjectsToTimingGroup::new(&self.map, ids, group))
    }

    pub fn change_initial_scroll_velocity(
        &mut self,
        id: &str,
        multiplier: f32,
    ) -> ActionResult<()> {
        self.submit(ChangeInitialScrollVelocity::new(&self.map, id, multiplier))
    }

    // Bookmarks

    pub fn add_bookmark(&mut self, start_time: i32, note: &str) -> ActionResult<BookmarkId> {
        let bookmark = self.new_bookmark(start_time, note);
        let id = bookmark.id;
        self.submit(AddBookmark::new(&self.map, bookmark))?;
        Ok(id)
    }

    pub fn add_bookmarks(&mut self, bookmarks: Vec<Bookmark>) -> ActionResult<()> {
        self.submit(AddBookmarkBatch::new(&self.map, bookmarks))
    }

    pub fn remove_bookmark(&mut self, id: BookmarkId) -> ActionResult<()> {
        self.submit(RemoveBookmark::new(&self.map, id))
    }

    pub fn remove_bookmarks(&mut self, ids: &[BookmarkId]) -> ActionResult<()> {
        self.submit(RemoveBookmarkBatch::new(&self.map, ids))
    }

    pub fn edit_bookmark(&mut self, id: BookmarkId, note: &str) -> ActionResult<()> {
        self.submit(EditBookmark::new(&self.map, id, note))
    }

    pub fn change_bookmark_offsets(&mut self, ids: &[BookmarkId], delta: i32) -> ActionResult<()> {
        self.submit(ChangeBookmarkOffsetBatch::new(&self.map, ids, delta))
    }

    // Metadata

    pub fn set_preview_time(&mut self, time: i32) -> ActionResult<()> {
        self.submit(ChangePreviewTime::new(&self.map, time))
    }
}
