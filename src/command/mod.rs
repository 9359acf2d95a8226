// Action core for undo/redo of beatmap edits
//
// Every change to a beatmap goes through an EditorAction so it can be undone,
// redone and observed.
//
// Architecture:
// - UndoableAction trait: perform(), undo(), description()
// - EditorAction: closed enum, one variant per ActionTag
// - BatchAction: several actions recorded as one history entry
// - ActionManager: undo/redo stacks, save marker, notifications
// - EventDispatcher: per-tag and wildcard subscribers
//
// Actions validate against the live map when constructed and capture every
// value they need, so perform/undo never re-derive state.

pub mod action;
pub mod actions;
pub mod batch;
pub mod dispatcher;
pub mod event;
pub mod manager;
pub mod tag;
pub mod trait_def;

pub use action::EditorAction;
pub use batch::BatchAction;
pub use dispatcher::{EventDispatcher, Handler, SubscriptionId};
pub use event::{ActionEvent, ActionOrigin, Notification, TransitionKind};
pub use manager::{ActionManager, EntryId};
pub use tag::ActionTag;
pub use trait_def::{ActionError, ActionResult, EntityKind, Rejection, UndoableAction};
