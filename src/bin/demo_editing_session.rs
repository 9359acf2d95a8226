// Quick demonstration of the editing core: history, save marker, events and scripting
// Run with: cargo run --bin demo_editing_session [-- path/to/editor.ron]

use beatmap_editor::map::HitSounds;
use beatmap_editor::{EditorConfig, EditorSession, ScriptFacade};
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🎼 Beatmap Editor - Editing Session Demo");
    println!("========================================");

    let config = match std::env::args().nth(1) {
        Some(path) => {
            println!("⚙️  Loading config from {}", path);
            EditorConfig::load(&path)?
        }
        None => EditorConfig::default(),
    };

    let mut session = EditorSession::new(&config);
    println!("✅ Opened a {}K map", session.map().key_count());
    println!("   - History depth: {}", session.history().max_history());
    println!("   - Beat snap: 1/{}", session.beat_snap());

    // Print every notification as JSON, the way a plugin host would forward it
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    session.subscribe_all(move |notification| {
        if let Ok(line) = serde_json::to_string(notification) {
            sink.borrow_mut().push(line);
        }
    });

    // Native edits
    session.add_timing_point(0.0, 120.0)?;
    let first = session.place_hit_object(2, 1000)?;
    let second = session.place_long_note(3, 1500, 2000)?;
    session.add_hitsound(&[first, second], HitSounds::CLAP)?;

    println!("\n✏️  Native edits:");
    println!("   - Hit objects: {}", session.map().hit_objects.len());
    println!("   - Undo stack: {:?}", session.history().undo_tags());
    println!("   - Unsaved changes: {}", session.has_unsaved_changes());

    session.mark_saved();
    println!("\n💾 Marked as saved");
    println!("   - Unsaved changes: {}", session.has_unsaved_changes());

    session.undo()?;
    println!("\n↩️  Undo: {:?}", session.history().redo_description());
    println!("   - Unsaved changes: {}", session.has_unsaved_changes());

    session.redo()?;
    println!("↪️  Redo");
    println!("   - Unsaved changes: {}", session.has_unsaved_changes());

    // Scripted edits share the same history
    session.selection_mut().set([first, second]);
    {
        let mut facade = ScriptFacade::new(&mut session);
        facade.perform("move_hit_objects", &[json!(-1), json!(250)])?;
        facade.perform(
            "batch",
            &[json!([
                ["create_timing_group", ["chorus", 1.5]],
                ["add_scroll_velocity", [1250, 0.75, "chorus"]],
            ])],
        )?;
        let known = facade.perform("sparkle_everything", &[])?;
        println!("\n🔌 Scripted edits:");
        println!("   - Unknown action accepted: {}", known);
        for object in facade.selected_hit_objects() {
            println!(
                "   - Object {}: lane {} at {}ms in {}",
                object.id, object.lane, object.start_time, object.timing_group
            );
        }
    }

    println!("\n📜 History:");
    println!("   - Undo stack: {:?}", session.history().undo_tags());
    println!("   - Redo stack: {:?}", session.history().redo_tags());

    println!("\n📣 Notifications ({}):", log.borrow().len());
    for line in log.borrow().iter() {
        println!("   {}", line);
    }

    let map = session.close();
    println!(
        "\n✅ Session closed with {} hit objects and {} timing groups",
        map.hit_objects.len(),
        map.timing_groups.len()
    );

    Ok(())
}
