//! Randomized history tests
//!
//! Drives a session with seeded random edits, undos, redos and saves, and
//! checks after every step that undo restores the exact previous document,
//! that redo replays it, and that the unsaved-changes flag never claims the
//! document is clean when it differs from what was saved.

use beatmap_editor::command::actions::hit_objects::{PlaceHitObject, ResizeLongNote};
use beatmap_editor::map::{DEFAULT_LAYER, DEFAULT_TIMING_GROUP, GLOBAL_TIMING_GROUP};
use beatmap_editor::{
    Beatmap, EditorAction, EditorConfig, EditorSession, HitSounds, ScriptFacade, UndoableAction,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde_json::{Value, json};

const GROUPS: [&str; 5] = ["verse", "chorus", "bridge", DEFAULT_TIMING_GROUP, GLOBAL_TIMING_GROUP];
const SOUNDS: [HitSounds; 3] = [HitSounds::WHISTLE, HitSounds::FINISH, HitSounds::CLAP];

/// Entity ids handed out are not part of the document
fn snapshot(map: &Beatmap) -> Value {
    serde_json::to_value(map).unwrap()
}

fn session_with_depth(depth: usize) -> EditorSession {
    let config = EditorConfig::from_ron_str(&format!("(history: (max_depth: {}))", depth)).unwrap();
    EditorSession::new(&config)
}

/// Ids of everything currently in the document, grouped by kind
struct Ids {
    objects: Vec<u64>,
    layers: Vec<u64>,
    points: Vec<u64>,
    velocities: Vec<u64>,
    bookmarks: Vec<u64>,
}

impl Ids {
    fn of(map: &Beatmap) -> Self {
        Self {
            objects: map.hit_objects.iter().map(|o| o.id).collect(),
            layers: map.layers.iter().map(|l| l.id).collect(),
            points: map.timing_points.iter().map(|p| p.id).collect(),
            velocities: map
                .timing_groups
                .values()
                .flat_map(|g| g.scroll_velocities.iter().map(|v| v.id))
                .collect(),
            bookmarks: map.bookmarks.iter().map(|b| b.id).collect(),
        }
    }
}

fn some(ids: &[u64], rng: &mut StdRng, amount: usize) -> Vec<u64> {
    ids.choose_multiple(rng, amount).copied().collect()
}

fn color(rng: &mut StdRng) -> [u8; 3] {
    [rng.r#gen(), rng.r#gen(), rng.r#gen()]
}

fn group(rng: &mut StdRng) -> &'static str {
    GROUPS[rng.gen_range(0..GROUPS.len())]
}

fn hit_object_edit(session: &mut EditorSession, ids: &Ids, rng: &mut StdRng) -> Option<bool> {
    let objects = &ids.objects;
    let lane = rng.gen_range(1..=4);
    let time = rng.gen_range(0..200) * 10;
    let result = match rng.gen_range(0..14) {
        0..=2 => session.place_hit_object(lane, time).map(|_| ()),
        3 => session
            .place_long_note(lane, time, time + rng.gen_range(1..50) * 10)
            .map(|_| ()),
        4 => {
            let batch = (0..3)
                .map(|i| session.new_hit_object(1 + (lane + i) % 4, time + i32::from(i) * 20))
                .collect();
            session.place_hit_objects(batch)
        }
        5 => session.remove_hit_object(*objects.choose(rng)?),
        6 => session.remove_hit_objects(&some(objects, rng, 3)),
        7 => session.resize_long_note(*objects.choose(rng)?, rng.gen_range(0..250) * 10),
        8 => session.move_hit_objects(
            &some(objects, rng, 3),
            rng.gen_range(-1..=1),
            rng.gen_range(-50..=50),
        ),
        9 => session.flip_hit_objects(&some(objects, rng, 4)),
        10 => session.reverse_hit_objects(&some(objects, rng, 4)),
        11 => session.swap_lanes(&some(objects, rng, 6), lane, rng.gen_range(1..=4)),
        12 => session.resnap_hit_objects(&some(objects, rng, 4)),
        _ => {
            let picked = some(objects, rng, 3);
            let sound = *SOUNDS.choose(rng)?;
            if rng.gen_bool(0.5) {
                session.add_hitsound(&picked, sound)
            } else {
                session.remove_hitsound(&picked, sound)
            }
        }
    };
    Some(result.is_ok())
}

fn layer_edit(session: &mut EditorSession, ids: &Ids, rng: &mut StdRng) -> Option<bool> {
    let name = format!("Layer {}", rng.gen_range(0..3));
    let result = match rng.gen_range(0..6) {
        0 => session.create_layer(&name, color(rng)).map(|_| ()),
        1 => session.remove_layer(*ids.layers.choose(rng)?),
        2 => session.rename_layer(*ids.layers.choose(rng)?, &name),
        3 => session.color_layer(*ids.layers.choose(rng)?, color(rng)),
        4 => session.toggle_layer_visibility(*ids.layers.choose(rng)?),
        _ => {
            let layer = ids.layers.choose(rng).copied().unwrap_or(DEFAULT_LAYER);
            session.move_to_layer(&some(&ids.objects, rng, 3), layer)
        }
    };
    Some(result.is_ok())
}

fn timing_point_edit(session: &mut EditorSession, ids: &Ids, rng: &mut StdRng) -> Option<bool> {
    let points = &ids.points;
    let time = rng.gen_range(0..40_i32) as f32 * 50.0;
    let bpm = rng.gen_range(60..=240_i32) as f32;
    let result = match rng.gen_range(0..9) {
        0 | 1 => session.add_timing_point(time, bpm).map(|_| ()),
        2 => {
            let batch = vec![
                session.new_timing_point(time, bpm),
                session.new_timing_point(time + 500.0, bpm * 0.5),
            ];
            session.add_timing_points(batch)
        }
        3 => session.remove_timing_point(*points.choose(rng)?),
        4 => session.remove_timing_points(&some(points, rng, 2)),
        5 => session.change_timing_point_offset(*points.choose(rng)?, time),
        6 => session.change_timing_point_bpm(*points.choose(rng)?, bpm),
        7 => session.set_timing_point_hidden(*points.choose(rng)?, rng.r#gen()),
        _ => {
            let picked = some(points, rng, 3);
            match rng.gen_range(0..3) {
                0 => session.change_timing_point_offsets(&picked, rng.gen_range(-20.0..20.0)),
                1 => session.change_timing_point_bpms(&picked, bpm),
                _ => session.change_timing_point_signatures(&picked, rng.gen_range(3..=7)),
            }
        }
    };
    Some(result.is_ok())
}

fn scroll_velocity_edit(session: &mut EditorSession, ids: &Ids, rng: &mut StdRng) -> Option<bool> {
    let velocities = &ids.velocities;
    let time = rng.gen_range(0..40_i32) as f32 * 50.0;
    let multiplier = rng.gen_range(1..=20_i32) as f32 * 0.1;
    let result = match rng.gen_range(0..6) {
        0 | 1 => session
            .add_scroll_velocity(group(rng), time, multiplier)
            .map(|_| ()),
        2 => {
            let batch = vec![
                session.new_scroll_velocity(time, multiplier),
                session.new_scroll_velocity(time + 250.0, 1.0),
            ];
            session.add_scroll_velocities(group(rng), batch)
        }
        3 => session.remove_scroll_velocity(*velocities.choose(rng)?),
        4 => session.remove_scroll_velocities(&some(velocities, rng, 2)),
        _ => {
            let picked = some(velocities, rng, 3);
            if rng.gen_bool(0.5) {
                session.change_scroll_velocity_offsets(&picked, rng.gen_range(-30.0..30.0))
            } else {
                session.change_scroll_velocity_multipliers(&picked, multiplier)
            }
        }
    };
    Some(result.is_ok())
}

fn timing_group_edit(session: &mut EditorSession, ids: &Ids, rng: &mut StdRng) -> Option<bool> {
    let name = group(rng);
    let result = match rng.gen_range(0..6) {
        0 => {
            let members = some(&ids.objects, rng, 2);
            session.create_timing_group(name, 1.0, color(rng), &members)
        }
        1 => session.remove_timing_group(name),
        2 => session.rename_timing_group(name, group(rng)),
        3 => session.color_timing_group(name, color(rng)),
        4 => session.move_objects_to_timing_group(&some(&ids.objects, rng, 3), name),
        _ => session.change_initial_scroll_velocity(name, rng.gen_range(1..=20_i32) as f32 * 0.1),
    };
    Some(result.is_ok())
}

fn bookmark_edit(session: &mut EditorSession, ids: &Ids, rng: &mut StdRng) -> Option<bool> {
    let bookmarks = &ids.bookmarks;
    let time = rng.gen_range(0..2000);
    let result = match rng.gen_range(0..8) {
        0 | 1 => session.add_bookmark(time, "mark").map(|_| ()),
        2 => {
            let batch = vec![
                session.new_bookmark(time, "a"),
                session.new_bookmark(time + 100, "b"),
            ];
            session.add_bookmarks(batch)
        }
        3 => session.remove_bookmark(*bookmarks.choose(rng)?),
        4 => session.remove_bookmarks(&some(bookmarks, rng, 2)),
        5 => {
            let note = format!("note {}", rng.gen_range(0..3));
            session.edit_bookmark(*bookmarks.choose(rng)?, &note)
        }
        6 => session.change_bookmark_offsets(&some(bookmarks, rng, 3), rng.gen_range(-100..=100)),
        _ => session.set_preview_time(time),
    };
    Some(result.is_ok())
}

/// Batches whose later children only make sense after the earlier ones
fn dependent_batch(session: &mut EditorSession, ids: &Ids, rng: &mut StdRng) -> Option<bool> {
    session.selection_mut().set(some(&ids.objects, rng, 4));
    let accepted = match rng.gen_range(0..3) {
        0 => {
            let name = group(rng);
            let children = json!([
                ["create_timing_group", [name, 1.0]],
                ["move_objects_to_timing_group", [name]],
                ["add_scroll_velocity", [rng.gen_range(0..20) * 100, 0.5, name]],
            ]);
            ScriptFacade::new(session).perform("batch", &[children])
        }
        1 => {
            let children = json!([
                ["add_timing_point", [rng.gen_range(0..10) * 100, rng.gen_range(60..=240)]],
                ["resnap_hit_objects", []],
            ]);
            ScriptFacade::new(session).perform("batch", &[children])
        }
        _ => {
            let time = rng.gen_range(0..200) * 10;
            let object = session.new_hit_object(rng.gen_range(1..=4), time);
            let id = object.id;
            let mut scratch = session.map().clone();
            let place: EditorAction = PlaceHitObject::new(&scratch, object).ok()?.into();
            place.perform(&mut scratch).ok()?;
            let resize: EditorAction = ResizeLongNote::new(&scratch, id, time + 300).ok()?.into();
            return Some(session.perform_batch(vec![place, resize]).is_ok());
        }
    };
    Some(matches!(accepted, Ok(true)))
}

/// Apply one random edit of any kind. Returns whether it was accepted.
fn random_edit(session: &mut EditorSession, rng: &mut StdRng) -> bool {
    let ids = Ids::of(session.map());
    let accepted = match rng.gen_range(0..20) {
        0..=6 => hit_object_edit(session, &ids, rng),
        7 | 8 => layer_edit(session, &ids, rng),
        9 | 10 => timing_point_edit(session, &ids, rng),
        11 | 12 => scroll_velocity_edit(session, &ids, rng),
        13 | 14 => timing_group_edit(session, &ids, rng),
        15 | 16 => bookmark_edit(session, &ids, rng),
        _ => dependent_batch(session, &ids, rng),
    };
    accepted.unwrap_or(false)
}

fn run(seed: u64, depth: usize, steps: usize) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut session = session_with_depth(depth);

    // States reachable by undo (top = current) and by redo
    let mut past = vec![snapshot(session.map())];
    let mut future: Vec<Value> = Vec::new();
    let mut saved = Some(snapshot(session.map()));

    for step in 0..steps {
        match rng.gen_range(0..10) {
            0..=4 => {
                let before = snapshot(session.map());
                if random_edit(&mut session, &mut rng) {
                    past.push(snapshot(session.map()));
                    future.clear();
                } else {
                    assert_eq!(snapshot(session.map()), before, "seed {seed} step {step}");
                }
            }
            5 | 6 => {
                let undone = session.undo().unwrap();
                assert_eq!(undone, past.len() > 1, "seed {seed} step {step}");
                if undone {
                    future.push(past.pop().unwrap());
                    let current = snapshot(session.map());
                    assert_eq!(&current, past.last().unwrap(), "seed {seed} step {step}");
                }
            }
            7 | 8 => {
                let redone = session.redo().unwrap();
                assert_eq!(redone, !future.is_empty(), "seed {seed} step {step}");
                if redone {
                    past.push(future.pop().unwrap());
                    let current = snapshot(session.map());
                    assert_eq!(&current, past.last().unwrap(), "seed {seed} step {step}");
                }
            }
            _ => {
                session.mark_saved();
                saved = Some(snapshot(session.map()));
                assert!(!session.has_unsaved_changes());
            }
        }

        // Evicted states can no longer be undone into
        if depth > 0 && past.len() > depth + 1 {
            let excess = past.len() - (depth + 1);
            past.drain(..excess);
        }
        assert_eq!(session.history().undo_count(), past.len() - 1, "seed {seed} step {step}");
        assert_eq!(session.history().redo_count(), future.len(), "seed {seed} step {step}");

        if !session.has_unsaved_changes() {
            assert_eq!(saved.as_ref(), Some(&snapshot(session.map())), "seed {seed} step {step}");
        }
    }
}

#[test]
fn test_random_history_unlimited() {
    for seed in 0..16 {
        run(seed, 0, 300);
    }
}

#[test]
fn test_random_history_with_eviction() {
    for seed in 100..116 {
        run(seed, 5, 300);
    }
}

/// Undoing everything and redoing everything lands on the same document
#[test]
fn test_full_unwind_and_replay() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut session = session_with_depth(0);
    let empty = snapshot(session.map());

    let mut accepted = 0;
    while accepted < 50 {
        if random_edit(&mut session, &mut rng) {
            accepted += 1;
        }
    }
    let edited = snapshot(session.map());

    while session.undo().unwrap() {}
    assert_eq!(snapshot(session.map()), empty);
    assert!(!session.has_unsaved_changes());

    while session.redo().unwrap() {}
    assert_eq!(snapshot(session.map()), edited);
    assert_eq!(session.history().undo_count(), 50);
}
