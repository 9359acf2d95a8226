// Beatmap editor - Library exports for the editor shell, plugins and tests

pub mod command;
pub mod config;
pub mod editor;
pub mod map;
pub mod scripting;

// Re-export commonly used types for convenience
pub use command::{
    ActionError, ActionEvent, ActionManager, ActionOrigin, ActionResult, ActionTag, BatchAction,
    EditorAction, Notification, Rejection, TransitionKind, UndoableAction,
};
pub use config::{ConfigError, EditorConfig};
pub use editor::{EditorSession, Selection};
pub use map::{Beatmap, HitObject, HitSounds};
pub use scripting::{ScriptError, ScriptFacade};
