// ActionTag - discriminator for every editor action kind

use serde::Serialize;
use std::fmt;

/// Identifies which kind of edit an action performs
///
/// Used to route notifications and to construct actions from script calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionTag {
    PlaceHitObject,
    PlaceHitObjectBatch,
    RemoveHitObject,
    RemoveHitObjectBatch,
    ResizeLongNote,
    FlipHitObjects,
    ReverseHitObjects,
    SwapLanes,
    MoveHitObjects,
    ResnapHitObjects,
    AddHitsound,
    RemoveHitsound,
    CreateLayer,
    RemoveLayer,
    RenameLayer,
    ColorLayer,
    ToggleLayerVisibility,
    MoveToLayer,
    AddTimingPoint,
    RemoveTimingPoint,
    AddTimingPointBatch,
    RemoveTimingPointBatch,
    ChangeTimingPointOffset,
    ChangeTimingPointBpm,
    ChangeTimingPointHidden,
    ChangeTimingPointOffsetBatch,
    ChangeTimingPointBpmBatch,
    ChangeTimingPointSignatureBatch,
    AddScrollVelocity,
    RemoveScrollVelocity,
    AddScrollVelocityBatch,
    RemoveScrollVelocityBatch,
    ChangeScrollVelocityOffsetBatch,
    ChangeScrollVelocityMultiplierBatch,
    CreateTimingGroup,
    RemoveTimingGroup,
    RenameTimingGroup,
    ColorTimingGroup,
    MoveObjectsToTimingGroup,
    ChangeInitialScrollVelocity,
    AddBookmark,
    RemoveBookmark,
    AddBookmarkBatch,
    RemoveBookmarkBatch,
    EditBookmark,
    ChangeBookmarkOffsetBatch,
    ChangePreviewTime,
    Batch,
}

impl ActionTag {
    /// Every tag, in declaration order
    pub const ALL: [ActionTag; 48] = [
        ActionTag::PlaceHitObject,
        ActionTag::PlaceHitObjectBatch,
        ActionTag::RemoveHitObject,
        ActionTag::RemoveHitObjectBatch,
        ActionTag::ResizeLongNote,
        ActionTag::FlipHitObjects,
        ActionTag::ReverseHitObjects,
        ActionTag::SwapLanes,
        ActionTag::MoveHitObjects,
        ActionTag::ResnapHitObjects,
        ActionTag::AddHitsound,
        ActionTag::RemoveHitsound,
        ActionTag::CreateLayer,
        ActionTag::RemoveLayer,
        ActionTag::RenameLayer,
        ActionTag::ColorLayer,
        ActionTag::ToggleLayerVisibility,
        ActionTag::MoveToLayer,
        ActionTag::AddTimingPoint,
        ActionTag::RemoveTimingPoint,
        ActionTag::AddTimingPointBatch,
        ActionTag::RemoveTimingPointBatch,
        ActionTag::ChangeTimingPointOffset,
        ActionTag::ChangeTimingPointBpm,
        ActionTag::ChangeTimingPointHidden,
        ActionTag::ChangeTimingPointOffsetBatch,
        ActionTag::ChangeTimingPointBpmBatch,
        ActionTag::ChangeTimingPointSignatureBatch,
        ActionTag::AddScrollVelocity,
        ActionTag::RemoveScrollVelocity,
        ActionTag::AddScrollVelocityBatch,
        ActionTag::RemoveScrollVelocityBatch,
        ActionTag::ChangeScrollVelocityOffsetBatch,
        ActionTag::ChangeScrollVelocityMultiplierBatch,
        ActionTag::CreateTimingGroup,
        ActionTag::RemoveTimingGroup,
        ActionTag::RenameTimingGroup,
        ActionTag::ColorTimingGroup,
        ActionTag::MoveObjectsToTimingGroup,
        ActionTag::ChangeInitialScrollVelocity,
        ActionTag::AddBookmark,
        ActionTag::RemoveBookmark,
        ActionTag::AddBookmarkBatch,
        ActionTag::RemoveBookmarkBatch,
        ActionTag::EditBookmark,
        ActionTag::ChangeBookmarkOffsetBatch,
        ActionTag::ChangePreviewTime,
        ActionTag::Batch,
    ];

    /// Stable snake_case name used by scripts and serialized events
    pub fn name(self) -> &'static str {
        match self {
            ActionTag::PlaceHitObject => "place_hit_object",
            ActionTag::PlaceHitObjectBatch => "place_hit_object_batch",
            ActionTag::RemoveHitObject => "remove_hit_object",
            ActionTag::RemoveHitObjectBatch => "remove_hit_object_batch",
            ActionTag::ResizeLongNote => "resize_long_note",
            ActionTag::FlipHitObjects => "flip_hit_objects",
            ActionTag::ReverseHitObjects => "reverse_hit_objects",
            ActionTag::SwapLanes => "swap_lanes",
            ActionTag::MoveHitObjects => "move_hit_objects",
            ActionTag::ResnapHitObjects => "resnap_hit_objects",
            ActionTag::AddHitsound => "add_hitsound",
            ActionTag::RemoveHitsound => "remove_hitsound",
            ActionTag::CreateLayer => "create_layer",
            ActionTag::RemoveLayer => "remove_layer",
            ActionTag::RenameLayer => "rename_layer",
            ActionTag::ColorLayer => "color_layer",
            ActionTag::ToggleLayerVisibility => "toggle_layer_visibility",
            ActionTag::MoveToLayer => "move_to_layer",
            ActionTag::AddTimingPoint => "add_timing_point",
            ActionTag::RemoveTimingPoint => "remove_timing_point",
            ActionTag::AddTimingPointBatch => "add_timing_point_batch",
            ActionTag::RemoveTimingPointBatch => "remove_timing_point_batch",
            ActionTag::ChangeTimingPointOffset => "change_timing_point_offset",
            ActionTag::ChangeTimingPointBpm => "change_timing_point_bpm",
            ActionTag::ChangeTimingPointHidden => "change_timing_point_hidden",
            ActionTag::ChangeTimingPointOffsetBatch => "change_timing_point_offset_batch",
            ActionTag::ChangeTimingPointBpmBatch => "change_timing_point_bpm_batch",
            ActionTag::ChangeTimingPointSignatureBatch => "change_timing_point_signature_batch",
            ActionTag::AddScrollVelocity => "add_scroll_velocity",
            ActionTag::RemoveScrollVelocity => "remove_scroll_velocity",
            ActionTag::AddScrollVelocityBatch => "add_scroll_velocity_batch",
            ActionTag::RemoveScrollVelocityBatch => "remove_scroll_velocity_batch",
            ActionTag::ChangeScrollVelocityOffsetBatch => "change_scroll_velocity_offset_batch",
            ActionTag::ChangeScrollVelocityMultiplierBatch => {
                "change_scroll_velocity_multiplier_batch"
            }
            ActionTag::CreateTimingGroup => "create_timing_group",
            ActionTag::RemoveTimingGroup => "remove_timing_group",
            ActionTag::RenameTimingGroup => "rename_timing_group",
            ActionTag::ColorTimingGroup => "color_timing_group",
            ActionTag::MoveObjectsToTimingGroup => "move_objects_to_timing_group",
            ActionTag::ChangeInitialScrollVelocity => "change_initial_scroll_velocity",
            ActionTag::AddBookmark => "add_bookmark",
            ActionTag::RemoveBookmark => "remove_bookmark",
            ActionTag::AddBookmarkBatch => "add_bookmark_batch",
            ActionTag::RemoveBookmarkBatch => "remove_bookmark_batch",
            ActionTag::EditBookmark => "edit_bookmark",
            ActionTag::ChangeBookmarkOffsetBatch => "change_bookmark_offset_batch",
            ActionTag::ChangePreviewTime => "change_preview_time",
            ActionTag::Batch => "batch",
        }
    }

    /// Look a tag up by its script name
    pub fn from_name(name: &str) -> Option<ActionTag> {
        Self::ALL.iter().copied().find(|tag| tag.name() == name)
    }
}

impl fmt::Display for ActionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_names_are_unique_and_round_trip() {
        let mut seen = HashSet::new();
        for tag in ActionTag::ALL {
            assert!(seen.insert(tag.name()), "duplicate name {}", tag.name());
            assert_eq!(ActionTag::from_name(tag.name()), Some(tag));
        }
    }

    #[test]
    fn test_names_match_serde() {
        for tag in ActionTag::ALL {
            let json = serde_json::to_value(tag).unwrap();
            assert_eq!(json, serde_json::Value::String(tag.name().to_string()));
        }
    }

    #[test]
    fn test_unknown_name() {
        assert_eq!(ActionTag::from_name("delete_everything"), None);
        assert_eq!(ActionTag::from_name(""), None);
    }
}
