//! Every action tag can be built from script arguments
//!
//! Builds each tag through the scripting facade against one prepared map and
//! checks the resulting action, its event and its arity all agree on the tag.

use beatmap_editor::map::{DEFAULT_COLOR, DEFAULT_TIMING_GROUP, HitSounds};
use beatmap_editor::{ActionTag, EditorSession, ScriptFacade, UndoableAction};
use serde_json::{Value, json};

struct Fixture {
    session: EditorSession,
    objects: [u64; 3],
    long_note: u64,
    layer: u64,
    timing_points: [u64; 2],
    velocities: [u64; 2],
    bookmark: u64,
}

fn fixture() -> Fixture {
    let mut session = EditorSession::default();
    let tp = session.add_timing_point(0.0, 120.0).unwrap();
    let tp2 = session.add_timing_point(1000.0, 150.0).unwrap();

    let a = session.place_hit_object(1, 0).unwrap();
    let b = session.place_long_note(2, 500, 1000).unwrap();
    let c = session.place_hit_object(3, 260).unwrap();
    session.add_hitsound(&[a], HitSounds::CLAP).unwrap();

    let layer = session.create_layer("Lead", [255, 0, 0]).unwrap();
    session
        .create_timing_group("verse", 1.0, DEFAULT_COLOR, &[])
        .unwrap();
    let sv = session.add_scroll_velocity("verse", 0.0, 1.0).unwrap();
    let sv2 = session
        .add_scroll_velocity(DEFAULT_TIMING_GROUP, 100.0, 0.8)
        .unwrap();
    let bookmark = session.add_bookmark(100, "intro").unwrap();

    session.selection_mut().set([a, b, c]);
    Fixture {
        session,
        objects: [a, b, c],
        long_note: b,
        layer,
        timing_points: [tp, tp2],
        velocities: [sv, sv2],
        bookmark,
    }
}

fn sample_args(tag: ActionTag, f: &Fixture) -> Vec<Value> {
    let [tp, tp2] = f.timing_points;
    let [sv, sv2] = f.velocities;
    let layer = f.layer;
    let bm = f.bookmark;
    match tag {
        ActionTag::PlaceHitObject => vec![json!(4), json!(3000)],
        ActionTag::PlaceHitObjectBatch => vec![json!([[1, 4000], [2, 4100, 4500]])],
        ActionTag::RemoveHitObject => vec![json!(f.objects[0])],
        ActionTag::RemoveHitObjectBatch => vec![],
        ActionTag::ResizeLongNote => vec![json!(f.long_note), json!(1200)],
        ActionTag::FlipHitObjects => vec![],
        ActionTag::ReverseHitObjects => vec![],
        ActionTag::SwapLanes => vec![json!(1), json!(2)],
        ActionTag::MoveHitObjects => vec![json!(1), json!(100)],
        ActionTag::ResnapHitObjects => vec![],
        ActionTag::AddHitsound => vec![json!("whistle")],
        ActionTag::RemoveHitsound => vec![json!("clap")],
        ActionTag::CreateLayer => vec![json!("Drums")],
        ActionTag::RemoveLayer => vec![json!(layer)],
        ActionTag::RenameLayer => vec![json!(layer), json!("Bass")],
        ActionTag::ColorLayer => vec![json!(layer), json!("#00ff00")],
        ActionTag::ToggleLayerVisibility => vec![json!(layer)],
        ActionTag::MoveToLayer => vec![json!(layer)],
        ActionTag::AddTimingPoint => vec![json!(2000), json!(180)],
        ActionTag::RemoveTimingPoint => vec![json!(tp2)],
        ActionTag::AddTimingPointBatch => vec![json!([[3000, 90], [4000, 100, 3]])],
        ActionTag::RemoveTimingPointBatch => vec![json!([tp2])],
        ActionTag::ChangeTimingPointOffset => vec![json!(tp2), json!(1100)],
        ActionTag::ChangeTimingPointBpm => vec![json!(tp2), json!(160)],
        ActionTag::ChangeTimingPointHidden => vec![json!(tp2), json!(true)],
        ActionTag::ChangeTimingPointOffsetBatch => vec![json!([tp, tp2]), json!(10)],
        ActionTag::ChangeTimingPointBpmBatch => vec![json!([tp, tp2]), json!(200)],
        ActionTag::ChangeTimingPointSignatureBatch => vec![json!([tp, tp2]), json!(3)],
        ActionTag::AddScrollVelocity => vec![json!(200), json!(1.5)],
        ActionTag::RemoveScrollVelocity => vec![json!(sv)],
        ActionTag::AddScrollVelocityBatch => vec![json!([[300, 1.2], [400, 0.9]]), json!("verse")],
        ActionTag::RemoveScrollVelocityBatch => vec![json!([sv, sv2])],
        ActionTag::ChangeScrollVelocityOffsetBatch => vec![json!([sv, sv2]), json!(5)],
        ActionTag::ChangeScrollVelocityMultiplierBatch => vec![json!([sv, sv2]), json!(2.0)],
        ActionTag::CreateTimingGroup => vec![json!("chorus")],
        ActionTag::RemoveTimingGroup => vec![json!("verse")],
        ActionTag::RenameTimingGroup => vec![json!("verse"), json!("bridge")],
        ActionTag::ColorTimingGroup => vec![json!("verse"), json!([0, 0, 255])],
        ActionTag::MoveObjectsToTimingGroup => vec![json!("verse")],
        ActionTag::ChangeInitialScrollVelocity => vec![json!("verse"), json!(1.5)],
        ActionTag::AddBookmark => vec![json!(300), json!("drop")],
        ActionTag::RemoveBookmark => vec![json!(bm)],
        ActionTag::AddBookmarkBatch => vec![json!([[400], [500, "build"]])],
        ActionTag::RemoveBookmarkBatch => vec![json!([bm])],
        ActionTag::EditBookmark => vec![json!(bm), json!("outro")],
        ActionTag::ChangeBookmarkOffsetBatch => vec![json!([bm]), json!(50)],
        ActionTag::ChangePreviewTime => vec![json!(1234)],
        ActionTag::Batch => vec![json!([["change_preview_time", [1]], ["add_bookmark", []]])],
    }
}

#[test]
fn test_every_tag_builds_from_script_arguments() {
    let mut fixture = fixture();

    for tag in ActionTag::ALL {
        let args = sample_args(tag, &fixture);
        assert!(
            ScriptFacade::arity(tag).accepts(args.len()),
            "sample arguments for {tag} do not fit its arity"
        );

        let mut facade = ScriptFacade::new(&mut fixture.session);
        let action = facade
            .construct(tag.name(), &args)
            .unwrap_or_else(|err| panic!("{tag} refused: {err}"))
            .unwrap_or_else(|| panic!("{tag} not recognised"));

        assert_eq!(action.tag(), tag);
        assert_eq!(action.event().tag(), tag);
        assert!(!action.description().is_empty(), "{tag} has no description");
    }
}

/// Each built action performs, undoes back to the fixture and redoes
#[test]
fn test_every_tag_round_trips_through_history() {
    for tag in ActionTag::ALL {
        let mut fixture = fixture();
        let args = sample_args(tag, &fixture);
        let before = serde_json::to_value(fixture.session.map()).unwrap();

        let mut facade = ScriptFacade::new(&mut fixture.session);
        assert!(facade.perform(tag.name(), &args).unwrap(), "{tag}");
        let after = serde_json::to_value(fixture.session.map()).unwrap();
        assert_ne!(after, before, "{tag} changed nothing");
        assert_eq!(fixture.session.history().undo_tags().last(), Some(&tag));

        fixture.session.undo().unwrap();
        assert_eq!(serde_json::to_value(fixture.session.map()).unwrap(), before, "{tag} undo");

        fixture.session.redo().unwrap();
        assert_eq!(serde_json::to_value(fixture.session.map()).unwrap(), after, "{tag} redo");
    }
}

#[test]
fn test_tag_names_round_trip() {
    for tag in ActionTag::ALL {
        assert_eq!(ActionTag::from_name(tag.name()), Some(tag));
    }
    assert_eq!(ActionTag::from_name("PlaceHitObject"), None);
}
