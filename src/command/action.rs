// EditorAction - the closed set of editor edits

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
use crate::command::batch::BatchAction;
use crate::command::tag::ActionTag;
use crate::command::trait_def::{ActionResult, UndoableAction};
use crate::map::Beatmap;

// Each variant shares its name with the matching ActionTag, so the tag
// mapping and the From conversions are generated together.
macro_rules! editor_actions {
    ($($variant:ident($payload:ty)),+ $(,)?) => {
        /// One recorded edit
        ///
        /// Not `Clone`: the ledger takes ownership on perform, so a given
        /// action value can only ever be recorded once.
        #[derive(Debug)]
        pub enum EditorAction {
            $($variant($payload),)+
        }

        impl EditorAction {
            /// The discriminator used for routing and script construction
            pub fn tag(&self) -> ActionTag {
                match self {
                    $(EditorAction::$variant(_) => ActionTag::$variant,)+
                }
            }

            fn payload(&self) -> &dyn UndoableAction {
                match self {
                    $(EditorAction::$variant(action) => action,)+
                }
            }
        }

        $(
            impl From<$payload> for EditorAction {
                fn from(action: $payload) -> Self {
                    EditorAction::$variant(action)
                }
            }
        )+
    };
}

editor_actions! {
    PlaceHitObject(PlaceHitObject),
    PlaceHitObjectBatch(PlaceHitObjectBatch),
    RemoveHitObject(RemoveHitObject),
    RemoveHitObjectBatch(RemoveHitObjectBatch),
    ResizeLongNote(ResizeLongNote),
    FlipHitObjects(FlipHitObjects),
    ReverseHitObjects(ReverseHitObjects),
    SwapLanes(SwapLanes),
    MoveHitObjects(MoveHitObjects),
    ResnapHitObjects(ResnapHitObjects),
    AddHitsound(AddHitsound),
    RemoveHitsound(RemoveHitsound),
    CreateLayer(CreateLayer),
    RemoveLayer(RemoveLayer),
    RenameLayer(RenameLayer),
    ColorLayer(ColorLayer),
    ToggleLayerVisibility(ToggleLayerVisibility),
    MoveToLayer(MoveToLayer),
    AddTimingPoint(AddTimingPoint),
    RemoveTimingPoint(RemoveTimingPoint),
    AddTimingPointBatch(AddTimingPointBatch),
    RemoveTimingPointBatch(RemoveTimingPointBatch),
    ChangeTimingPointOffset(ChangeTimingPointOffset),
    ChangeTimingPointBpm(ChangeTimingPointBpm),
    ChangeTimingPointHidden(ChangeTimingPointHidden),
    ChangeTimingPointOffsetBatch(ChangeTimingPointOffsetBatch),
    ChangeTimingPointBpmBatch(ChangeTimingPointBpmBatch),
    ChangeTimingPointSignatureBatch(ChangeTimingPointSignatureBatch),
    AddScrollVelocity(AddScrollVelocity),
    RemoveScrollVelocity(RemoveScrollVelocity),
    AddScrollVelocityBatch(AddScrollVelocityBatch),
    RemoveScrollVelocityBatch(RemoveScrollVelocityBatch),
    ChangeScrollVelocityOffsetBatch(ChangeScrollVelocityOffsetBatch),
    ChangeScrollVelocityMultiplierBatch(ChangeScrollVelocityMultiplierBatch),
    CreateTimingGroup(CreateTimingGroup),
    RemoveTimingGroup(RemoveTimingGroup),
    RenameTimingGroup(RenameTimingGroup),
    ColorTimingGroup(ColorTimingGroup),
    MoveObjectsToTimingGroup(MoveObjectsToTimingGroup),
    ChangeInitialScrollVelocity(ChangeInitialScrollVelocity),
    AddBookmark(AddBookmark),
    RemoveBookmark(RemoveBookmark),
    AddBookmarkBatch(AddBookmarkBatch),
    RemoveBookmarkBatch(RemoveBookmarkBatch),
    EditBookmark(EditBookmark),
    ChangeBookmarkOffsetBatch(ChangeBookmarkOffsetBatch),
    ChangePreviewTime(ChangePreviewTime),
    Batch(BatchAction),
}

impl UndoableAction for EditorAction {
    fn perform(&self, map: &mut Beatmap) -> ActionResult<()> {
        self.payload().perform(map)
    }

    fn undo(&self, map: &mut Beatmap) -> ActionResult<()> {
        self.payload().undo(map)
    }

    fn description(&self) -> String {
        self.payload().description()
    }
}
