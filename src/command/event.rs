// Notifications fired after every history transition
use crate::command::action::EditorAction;
use crate::command::actions::ValueChange;
use crate::command::actions::hit_objects::PlacementChange;
use crate::command::actions::scroll_velocities::{GroupedVelocity, VelocityChange};
use crate::command::tag::ActionTag;
use crate::map::{
    Bookmark, BookmarkId, EditorLayer, HitObject, HitObjectId, HitSounds, LayerId,
    ScrollVelocity, TimingGroup, TimingPoint,
};
use serde::Serialize;

/// Which history transition produced a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    /// First perform of a freshly constructed action
    New,
    Undo,
    Redo,
}

/// Who asked for the transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionOrigin {
    Native,
    Script,
}

/// What an action changed, one variant per action tag
///
/// Payloads describe the action itself (its forward direction); the
/// `TransitionKind` of the surrounding notification says whether the change
/// was just applied or reverted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionEvent {
    HitObjectPlaced {
        object: HitObject,
    },
    HitObjectBatchPlaced {
        objects: Vec<HitObject>,
    },
    HitObjectRemoved {
        object: HitObject,
    },
    HitObjectBatchRemoved {
        objects: Vec<HitObject>,
    },
    LongNoteResized {
        id: HitObjectId,
        old_end: Option<i32>,
        new_end: Option<i32>,
    },
    HitObjectsFlipped {
        changes: Vec<PlacementChange>,
    },
    HitObjectsReversed {
        changes: Vec<PlacementChange>,
    },
    LanesSwapped {
        lane_a: u8,
        lane_b: u8,
        changes: Vec<PlacementChange>,
    },
    HitObjectsMoved {
        lane_offset: i32,
        time_offset: i32,
        changes: Vec<PlacementChange>,
    },
    HitObjectsResnapped {
        snap: u32,
        changes: Vec<PlacementChange>,
    },
    HitsoundAdded {
        sound: HitSounds,
        changes: Vec<ValueChange<HitSounds>>,
    },
    HitsoundRemoved {
        sound: HitSounds,
        changes: Vec<ValueChange<HitSounds>>,
    },

    LayerCreated {
        layer: EditorLayer,
    },
    LayerRemoved {
        layer: EditorLayer,
        members: Vec<HitObjectId>,
    },
    LayerRenamed {
        layer: LayerId,
        old_name: String,
        new_name: String,
    },
    LayerColorChanged {
        layer: LayerId,
        old_color: [u8; 3],
        new_color: [u8; 3],
    },
    LayerVisibilityToggled {
        layer: LayerId,
        /// Hidden state after the forward change
        hidden: bool,
    },
    ObjectsMovedToLayer {
        layer: LayerId,
        changes: Vec<ValueChange<LayerId>>,
    },

    TimingPointAdded {
        point: TimingPoint,
    },
    TimingPointRemoved {
        point: TimingPoint,
    },
    TimingPointBatchAdded {
        points: Vec<TimingPoint>,
    },
    TimingPointBatchRemoved {
        points: Vec<TimingPoint>,
    },
    TimingPointOffsetChanged {
        change: ValueChange<f32>,
    },
    TimingPointBpmChanged {
        change: ValueChange<f32>,
    },
    TimingPointHiddenChanged {
        change: ValueChange<bool>,
    },
    TimingPointOffsetBatchChanged {
        delta: f32,
        changes: Vec<ValueChange<f32>>,
    },
    TimingPointBpmBatchChanged {
        bpm: f32,
        changes: Vec<ValueChange<f32>>,
    },
    TimingPointSignatureBatchChanged {
        signature: u32,
        changes: Vec<ValueChange<u32>>,
    },

    ScrollVelocityAdded {
        group: String,
        velocity: ScrollVelocity,
    },
    ScrollVelocityRemoved {
        group: String,
        velocity: ScrollVelocity,
    },
    ScrollVelocityBatchAdded {
        group: String,
        velocities: Vec<ScrollVelocity>,
    },
    ScrollVelocityBatchRemoved {
        velocities: Vec<GroupedVelocity>,
    },
    ScrollVelocityOffsetBatchChanged {
        delta: f32,
        changes: Vec<VelocityChange>,
    },
    ScrollVelocityMultiplierBatchChanged {
        multiplier: f32,
        changes: Vec<VelocityChange>,
    },

    TimingGroupCreated {
        group: TimingGroup,
        members: Vec<HitObjectId>,
    },
    TimingGroupRemoved {
        group: TimingGroup,
        members: Vec<HitObjectId>,
    },
    TimingGroupRenamed {
        old_id: String,
        new_id: String,
    },
    TimingGroupColorChanged {
        group: String,
        old_color: [u8; 3],
        new_color: [u8; 3],
    },
    ObjectsMovedToTimingGroup {
        group: String,
        changes: Vec<ValueChange<String>>,
    },
    InitialScrollVelocityChanged {
        group: String,
        old: f32,
        new: f32,
    },

    BookmarkAdded {
        bookmark: Bookmark,
    },
    BookmarkRemoved {
        bookmark: Bookmark,
    },
    BookmarkBatchAdded {
        bookmarks: Vec<Bookmark>,
    },
    BookmarkBatchRemoved {
        bookmarks: Vec<Bookmark>,
    },
    BookmarkEdited {
        id: BookmarkId,
        old_note: String,
        new_note: String,
    },
    BookmarkOffsetsChanged {
        delta: i32,
        bookmarks: Vec<ValueChange<i32>>,
    },

    PreviewTimeChanged {
        old: i32,
        new: i32,
    },

    /// Child events in the order the children were performed
    Batch {
        events: Vec<ActionEvent>,
    },
}

impl ActionEvent {
    /// The tag of the action that produced this event
    pub fn tag(&self) -> ActionTag {
        match self {
            ActionEvent::HitObjectPlaced { .. } => ActionTag::PlaceHitObject,
            ActionEvent::HitObjectBatchPlaced { .. } => ActionTag::PlaceHitObjectBatch,
            ActionEvent::HitObjectRemoved { .. } => ActionTag::RemoveHitObject,
            ActionEvent::HitObjectBatchRemoved { .. } => ActionTag::RemoveHitObjectBatch,
            ActionEvent::LongNoteResized { .. } => ActionTag::ResizeLongNote,
            ActionEvent::HitObjectsFlipped { .. } => ActionTag::FlipHitObjects,
            ActionEvent::HitObjectsReversed { .. } => ActionTag::ReverseHitObjects,
            ActionEvent::LanesSwapped { .. } => ActionTag::SwapLanes,
            ActionEvent::HitObjectsMoved { .. } => ActionTag::MoveHitObjects,
            ActionEvent::HitObjectsResnapped { .. } => ActionTag::ResnapHitObjects,
            ActionEvent::HitsoundAdded { .. } => ActionTag::AddHitsound,
            ActionEvent::HitsoundRemoved { .. } => ActionTag::RemoveHitsound,
            ActionEvent::LayerCreated { .. } => ActionTag::CreateLayer,
            ActionEvent::LayerRemoved { .. } => ActionTag::RemoveLayer,
            ActionEvent::LayerRenamed { .. } => ActionTag::RenameLayer,
            ActionEvent::LayerColorChanged { .. } => ActionTag::ColorLayer,
            ActionEvent::LayerVisibilityToggled { .. } => ActionTag::ToggleLayerVisibility,
            ActionEvent::ObjectsMovedToLayer { .. } => ActionTag::MoveToLayer,
            ActionEvent::TimingPointAdded { .. } => ActionTag::AddTimingPoint,
            ActionEvent::TimingPointRemoved { .. } => ActionTag::RemoveTimingPoint,
            ActionEvent::TimingPointBatchAdded { .. } => ActionTag::AddTimingPointBatch,
            ActionEvent::TimingPointBatchRemoved { .. } => ActionTag::RemoveTimingPointBatch,
            ActionEvent::TimingPointOffsetChanged { .. } => ActionTag::ChangeTimingPointOffset,
            ActionEvent::TimingPointBpmChanged { .. } => ActionTag::ChangeTimingPointBpm,
            ActionEvent::TimingPointHiddenChanged { .. } => ActionTag::ChangeTimingPointHidden,
            ActionEvent::TimingPointOffsetBatchChanged { .. } => {
                ActionTag::ChangeTimingPointOffsetBatch
            }
            ActionEvent::TimingPointBpmBatchChanged { .. } => ActionTag::ChangeTimingPointBpmBatch,
            ActionEvent::TimingPointSignatureBatchChanged { .. } => {
                ActionTag::ChangeTimingPointSignatureBatch
            }
            ActionEvent::ScrollVelocityAdded { .. } => ActionTag::AddScrollVelocity,
            ActionEvent::ScrollVelocityRemoved { .. } => ActionTag::RemoveScrollVelocity,
            ActionEvent::ScrollVelocityBatchAdded { .. } => ActionTag::AddScrollVelocityBatch,
            ActionEvent::ScrollVelocityBatchRemoved { .. } => ActionTag::RemoveScrollVelocityBatch,
            ActionEvent::ScrollVelocityOffsetBatchChanged { .. } => {
                ActionTag::ChangeScrollVelocityOffsetBatch
            }
            ActionEvent::ScrollVelocityMultiplierBatchChanged { .. } => {
                ActionTag::ChangeScrollVelocityMultiplierBatch
            }
            ActionEvent::TimingGroupCreated { .. } => ActionTag::CreateTimingGroup,
            ActionEvent::TimingGroupRemoved { .. } => ActionTag::RemoveTimingGroup,
            ActionEvent::TimingGroupRenamed { .. } => ActionTag::RenameTimingGroup,
            ActionEvent::TimingGroupColorChanged { .. } => ActionTag::ColorTimingGroup,
            ActionEvent::ObjectsMovedToTimingGroup { .. } => ActionTag::MoveObjectsToTimingGroup,
            ActionEvent::InitialScrollVelocityChanged { .. } => {
                ActionTag::ChangeInitialScrollVelocity
            }
            ActionEvent::BookmarkAdded { .. } => ActionTag::AddBookmark,
            ActionEvent::BookmarkRemoved { .. } => ActionTag::RemoveBookmark,
            ActionEvent::BookmarkBatchAdded { .. } => ActionTag::AddBookmarkBatch,
            ActionEvent::BookmarkBatchRemoved { .. } => ActionTag::RemoveBookmarkBatch,
            ActionEvent::BookmarkEdited { .. } => ActionTag::EditBookmark,
            ActionEvent::BookmarkOffsetsChanged { .. } => ActionTag::ChangeBookmarkOffsetBatch,
            ActionEvent::PreviewTimeChanged { .. } => ActionTag::ChangePreviewTime,
            ActionEvent::Batch { .. } => ActionTag::Batch,
        }
    }
}

fn member_ids<T>(changes: &[ValueChange<T>]) -> Vec<HitObjectId> {
    changes.iter().map(|change| change.id).collect()
}

impl EditorAction {
    /// Build the event payload describing this action
    pub fn event(&self) -> ActionEvent {
        match self {
            EditorAction::PlaceHitObject(a) => ActionEvent::HitObjectPlaced {
                object: a.object.clone(),
            },
            EditorAction::PlaceHitObjectBatch(a) => ActionEvent::HitObjectBatchPlaced {
                objects: a.objects.clone(),
            },
            EditorAction::RemoveHitObject(a) => ActionEvent::HitObjectRemoved {
                object: a.object.clone(),
            },
            EditorAction::RemoveHitObjectBatch(a) => ActionEvent::HitObjectBatchRemoved {
                objects: a.objects.clone(),
            },
            EditorAction::ResizeLongNote(a) => ActionEvent::LongNoteResized {
                id: a.id,
                old_end: a.old_end,
                new_end: a.new_end,
            },
            EditorAction::FlipHitObjects(a) => ActionEvent::HitObjectsFlipped {
                changes: a.changes.clone(),
            },
            EditorAction::ReverseHitObjects(a) => ActionEvent::HitObjectsReversed {
                changes: a.changes.clone(),
            },
            EditorAction::SwapLanes(a) => ActionEvent::LanesSwapped {
                lane_a: a.lane_a,
                lane_b: a.lane_b,
                changes: a.changes.clone(),
            },
            EditorAction::MoveHitObjects(a) => ActionEvent::HitObjectsMoved {
                lane_offset: a.lane_offset,
                time_offset: a.time_offset,
                changes: a.changes.clone(),
            },
            EditorAction::ResnapHitObjects(a) => ActionEvent::HitObjectsResnapped {
                snap: a.snap,
                changes: a.changes.clone(),
            },
            EditorAction::AddHitsound(a) => ActionEvent::HitsoundAdded {
                sound: a.sound,
                changes: a.changes.clone(),
            },
            EditorAction::RemoveHitsound(a) => ActionEvent::HitsoundRemoved {
                sound: a.sound,
                changes: a.changes.clone(),
            },
            EditorAction::CreateLayer(a) => ActionEvent::LayerCreated {
                layer: a.layer.clone(),
            },
            EditorAction::RemoveLayer(a) => ActionEvent::LayerRemoved {
                layer: a.layer.clone(),
                members: a.members.clone(),
            },
            EditorAction::RenameLayer(a) => ActionEvent::LayerRenamed {
                layer: a.layer,
                old_name: a.old_name.clone(),
                new_name: a.new_name.clone(),
            },
            EditorAction::ColorLayer(a) => ActionEvent::LayerColorChanged {
                layer: a.layer,
                old_color: a.old_color,
                new_color: a.new_color,
            },
            EditorAction::ToggleLayerVisibility(a) => ActionEvent::LayerVisibilityToggled {
                layer: a.layer,
                hidden: !a.was_hidden,
            },
            EditorAction::MoveToLayer(a) => ActionEvent::ObjectsMovedToLayer {
                layer: a.layer,
                changes: a.changes.clone(),
            },
            EditorAction::AddTimingPoint(a) => ActionEvent::TimingPointAdded {
                point: a.point.clone(),
            },
            EditorAction::RemoveTimingPoint(a) => ActionEvent::TimingPointRemoved {
                point: a.point.clone(),
            },
            EditorAction::AddTimingPointBatch(a) => ActionEvent::TimingPointBatchAdded {
                points: a.points.clone(),
            },
            EditorAction::RemoveTimingPointBatch(a) => ActionEvent::TimingPointBatchRemoved {
                points: a.points.clone(),
            },
            EditorAction::ChangeTimingPointOffset(a) => ActionEvent::TimingPointOffsetChanged {
                change: a.change.clone(),
            },
            EditorAction::ChangeTimingPointBpm(a) => ActionEvent::TimingPointBpmChanged {
                change: a.change.clone(),
            },
            EditorAction::ChangeTimingPointHidden(a) => ActionEvent::TimingPointHiddenChanged {
                change: a.change.clone(),
            },
            EditorAction::ChangeTimingPointOffsetBatch(a) => {
                ActionEvent::TimingPointOffsetBatchChanged {
                    delta: a.delta,
                    changes: a.changes.clone(),
                }
            }
            EditorAction::ChangeTimingPointBpmBatch(a) => ActionEvent::TimingPointBpmBatchChanged {
                bpm: a.bpm,
                changes: a.changes.clone(),
            },
            EditorAction::ChangeTimingPointSignatureBatch(a) => {
                ActionEvent::TimingPointSignatureBatchChanged {
                    signature: a.signature,
                    changes: a.changes.clone(),
                }
            }
            EditorAction::AddScrollVelocity(a) => ActionEvent::ScrollVelocityAdded {
                group: a.entry.group.clone(),
                velocity: a.entry.velocity.clone(),
            },
            EditorAction::RemoveScrollVelocity(a) => ActionEvent::ScrollVelocityRemoved {
                group: a.entry.group.clone(),
                velocity: a.entry.velocity.clone(),
            },
            EditorAction::AddScrollVelocityBatch(a) => ActionEvent::ScrollVelocityBatchAdded {
                group: a.group.clone(),
                velocities: a.entries.iter().map(|e| e.velocity.clone()).collect(),
            },
            EditorAction::RemoveScrollVelocityBatch(a) => {
                ActionEvent::ScrollVelocityBatchRemoved {
                    velocities: a.entries.clone(),
                }
            }
            EditorAction::ChangeScrollVelocityOffsetBatch(a) => {
                ActionEvent::ScrollVelocityOffsetBatchChanged {
                    delta: a.delta,
                    changes: a.changes.clone(),
                }
            }
            EditorAction::ChangeScrollVelocityMultiplierBatch(a) => {
                ActionEvent::ScrollVelocityMultiplierBatchChanged {
                    multiplier: a.multiplier,
                    changes: a.changes.clone(),
                }
            }
            EditorAction::CreateTimingGroup(a) => ActionEvent::TimingGroupCreated {
                group: a.group.clone(),
                members: member_ids(&a.members),
            },
            EditorAction::RemoveTimingGroup(a) => ActionEvent::TimingGroupRemoved {
                group: a.group.clone(),
                members: member_ids(&a.members),
            },
            EditorAction::RenameTimingGroup(a) => ActionEvent::TimingGroupRenamed {
                old_id: a.old_id.clone(),
                new_id: a.new_id.clone(),
            },
            EditorAction::ColorTimingGroup(a) => ActionEvent::TimingGroupColorChanged {
                group: a.group_id.clone(),
                old_color: a.old_color,
                new_color: a.new_color,
            },
            EditorAction::MoveObjectsToTimingGroup(a) => ActionEvent::ObjectsMovedToTimingGroup {
                group: a.group_id.clone(),
                changes: a.changes.clone(),
            },
            EditorAction::ChangeInitialScrollVelocity(a) => {
                ActionEvent::InitialScrollVelocityChanged {
                    group: a.group_id.clone(),
                    old: a.old,
                    new: a.new,
                }
            }
            EditorAction::AddBookmark(a) => ActionEvent::BookmarkAdded {
                bookmark: a.bookmark.clone(),
            },
            EditorAction::RemoveBookmark(a) => ActionEvent::BookmarkRemoved {
                bookmark: a.bookmark.clone(),
            },
            EditorAction::AddBookmarkBatch(a) => ActionEvent::BookmarkBatchAdded {
                bookmarks: a.bookmarks.clone(),
            },
            EditorAction::RemoveBookmarkBatch(a) => ActionEvent::BookmarkBatchRemoved {
                bookmarks: a.bookmarks.clone(),
            },
            EditorAction::EditBookmark(a) => ActionEvent::BookmarkEdited {
                id: a.change.id,
                old_note: a.change.old.clone(),
                new_note: a.change.new.clone(),
            },
            EditorAction::ChangeBookmarkOffsetBatch(a) => ActionEvent::BookmarkOffsetsChanged {
                delta: a.delta,
                bookmarks: a.changes.clone(),
            },
            EditorAction::ChangePreviewTime(a) => ActionEvent::PreviewTimeChanged {
                old: a.old,
                new: a.new,
            },
            EditorAction::Batch(batch) => ActionEvent::Batch {
                events: batch.children().iter().map(EditorAction::event).collect(),
            },
        }
    }
}

/// A delivered notification
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub kind: TransitionKind,
    pub origin: ActionOrigin,
    pub event: ActionEvent,
}

impl Notification {
    pub fn tag(&self) -> ActionTag {
        self.event.tag()
    }
}
