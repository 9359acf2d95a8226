//! Scripting facade integration tests
//!
//! A plugin-style caller driving the editor purely through tag names and JSON
//! arguments.

use beatmap_editor::scripting::Arity;
use beatmap_editor::{
    ActionError, ActionOrigin, ActionTag, EditorSession, Notification, Rejection, ScriptError,
    ScriptFacade,
};
use serde_json::{Value, json};
use std::cell::RefCell;
use std::rc::Rc;

fn call(session: &mut EditorSession, tag: &str, args: Value) -> Result<bool, ScriptError> {
    let args = match args {
        Value::Array(items) => items,
        other => vec![other],
    };
    ScriptFacade::new(session).perform(tag, &args)
}

#[test]
fn test_chart_section_built_by_script() {
    let mut session = EditorSession::default();

    call(&mut session, "add_timing_point", json!([0, 180, 4])).unwrap();
    call(
        &mut session,
        "place_hit_object_batch",
        json!([[[1, 0], [2, 83], [3, 166, 500, "finish"], [4, 250]]]),
    )
    .unwrap();
    assert_eq!(session.map().hit_objects.len(), 4);

    let ids: Vec<u64> = session.map().hit_objects.iter().map(|o| o.id).collect();
    session.selection_mut().set(ids.iter().copied());

    call(&mut session, "resnap_hit_objects", json!([])).unwrap();
    call(&mut session, "flip_hit_objects", json!([])).unwrap();

    let facade = ScriptFacade::new(&mut session);
    let selected = facade.selected_hit_objects();
    let lanes: Vec<u8> = selected.iter().map(|o| o.lane).collect();
    assert_eq!(lanes, vec![4, 3, 2, 1]);
    assert!(selected.iter().all(|o| o.start_time % 83 <= 1));
    assert_eq!(facade.timing_points()[0].bpm, 180.0);

    assert_eq!(
        session.history().undo_tags(),
        vec![
            ActionTag::AddTimingPoint,
            ActionTag::PlaceHitObjectBatch,
            ActionTag::ResnapHitObjects,
            ActionTag::FlipHitObjects,
        ]
    );
}

#[test]
fn test_rejections_reach_the_script() {
    let mut session = EditorSession::default();

    let err = call(&mut session, "place_hit_object", json!([9, 0])).unwrap_err();
    assert_eq!(
        err,
        ScriptError::Rejected(ActionError::Rejected(Rejection::LaneOutOfRange {
            lane: 9,
            key_count: 4,
        }))
    );

    let err = call(&mut session, "create_timing_group", json!(["$Global"])).unwrap_err();
    assert!(matches!(
        err,
        ScriptError::Rejected(ActionError::Rejected(Rejection::ReservedTimingGroup(_)))
    ));

    let err = call(&mut session, "remove_bookmark", json!([77])).unwrap_err();
    assert!(matches!(
        err,
        ScriptError::Rejected(ActionError::Rejected(Rejection::UnknownEntity { .. }))
    ));

    let err = call(&mut session, "edit_bookmark", json!([1])).unwrap_err();
    assert_eq!(
        err,
        ScriptError::Arity {
            tag: ActionTag::EditBookmark,
            expected: Arity::exactly(2),
            got: 1,
        }
    );

    assert!(!session.history().can_undo());
    assert!(!session.has_unsaved_changes());
}

#[test]
fn test_script_notifications_carry_script_origin() {
    let mut session = EditorSession::default();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    session.subscribe(ActionTag::CreateLayer, move |n: &Notification| {
        sink.borrow_mut().push((n.kind, n.origin));
    });

    call(&mut session, "create_layer", json!(["Backing", [10, 20, 30]])).unwrap();
    call(&mut session, "add_bookmark", json!([])).unwrap();
    ScriptFacade::new(&mut session).undo().unwrap();
    ScriptFacade::new(&mut session).undo().unwrap();

    // Only the layer tag was subscribed
    assert_eq!(seen.borrow().len(), 2);
    assert!(seen.borrow().iter().all(|(_, origin)| *origin == ActionOrigin::Script));
}

#[test]
fn test_nested_batches() {
    let mut session = EditorSession::default();
    let args = json!([[
        ["add_bookmark", [0, "a"]],
        ["batch", [[["add_bookmark", [10, "b"]], ["add_bookmark", [20, "c"]]]]],
    ]]);

    assert!(call(&mut session, "batch", args).unwrap());
    assert_eq!(session.map().bookmarks.len(), 3);
    assert_eq!(session.history().undo_count(), 1);

    session.undo().unwrap();
    assert!(session.map().bookmarks.is_empty());
}

#[test]
fn test_batch_child_rejection_aborts_whole_batch() {
    let mut session = EditorSession::default();
    let args = json!([[
        ["add_bookmark", [0, "ok"]],
        ["rename_layer", [0, "Nope"]],
    ]]);

    let err = call(&mut session, "batch", args).unwrap_err();
    assert_eq!(
        err,
        ScriptError::Rejected(ActionError::Rejected(Rejection::ReservedLayer))
    );
    assert!(session.map().bookmarks.is_empty());
    assert!(!session.history().can_undo());
}

#[test]
fn test_empty_batch_is_rejected() {
    let mut session = EditorSession::default();
    let err = call(&mut session, "batch", json!([[]])).unwrap_err();
    assert_eq!(
        err,
        ScriptError::Rejected(ActionError::Rejected(Rejection::EmptyBatch))
    );
}

#[test]
fn test_queries_return_copies() {
    let mut session = EditorSession::default();
    session.set_current_time(640);
    session.set_beat_snap(8);
    call(&mut session, "add_bookmark", json!([])).unwrap();

    let facade = ScriptFacade::new(&mut session);
    let mut bookmarks = facade.bookmarks();
    bookmarks[0].note = "changed".to_string();

    assert_eq!(facade.current_time(), 640);
    assert_eq!(facade.beat_snap(), 8);
    assert_eq!(facade.key_count(), 4);
    assert_eq!(facade.bookmarks()[0].start_time, 640);
    assert_eq!(facade.bookmarks()[0].note, "");
    assert!(facade.hit_object(12345).is_none());
    assert!(facade.layers().is_empty());
}
