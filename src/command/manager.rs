// ActionManager - undo/redo stacks, save marker and notifications

use crate::command::action::EditorAction;
use crate::command::batch::BatchAction;
use crate::command::dispatcher::EventDispatcher;
use crate::command::event::{ActionOrigin, TransitionKind};
use crate::command::tag::ActionTag;
use crate::command::trait_def::{ActionResult, UndoableAction};
use crate::map::Beatmap;
use log::{debug, error};
use std::collections::VecDeque;

/// Default maximum number of actions to keep in history
pub const DEFAULT_MAX_HISTORY: usize = 100;

/// Identity of one recorded perform
///
/// Assigned by the manager when an action is first performed and never
/// reused, so two structurally identical actions never share an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(u64);

#[derive(Debug)]
struct Entry {
    id: EntryId,
    action: EditorAction,
}

/// Manages action execution, undo/redo and dirty tracking
///
/// The ActionManager maintains two stacks:
/// - Undo stack: actions that have been performed and can be undone
/// - Redo stack: actions that have been undone and can be redone
///
/// When a new action is performed:
/// 1. Perform the action
/// 2. Push it onto the undo stack
/// 3. Clear the redo stack (we're on a new timeline)
/// 4. Notify subscribers
///
/// # Dirty tracking
/// `mark_saved` remembers the id of the entry on top of the undo stack. The
/// document has unsaved changes whenever the top entry differs from that id.
///
/// # Memory Management
/// The undo stack is limited to `max_history` entries (0 means unlimited).
/// When the limit is reached, the oldest entry is dropped.
pub struct ActionManager {
    /// Actions that can be undone (most recent at the back)
    undo_stack: VecDeque<Entry>,

    /// Actions that can be redone (most recent at the back)
    redo_stack: VecDeque<Entry>,

    /// Entry on top of the undo stack at the last save, `None` if the
    /// stack was empty then
    last_save_marker: Option<EntryId>,

    max_history: usize,
    next_entry: u64,
    dispatcher: EventDispatcher,
}

impl ActionManager {
    /// Create an ActionManager with the default history limit
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_HISTORY)
    }

    /// Create an ActionManager with a custom history limit (0 = unlimited)
    pub fn with_capacity(max_history: usize) -> Self {
        Self {
            undo_stack: VecDeque::with_capacity(max_history.min(DEFAULT_MAX_HISTORY)),
            redo_stack: VecDeque::new(),
            last_save_marker: None,
            max_history,
            next_entry: 0,
            dispatcher: EventDispatcher::new(),
        }
    }

    fn allocate_entry_id(&mut self) -> EntryId {
        self.next_entry += 1;
        EntryId(self.next_entry)
    }

    /// Perform a freshly constructed action and record it
    ///
    /// # Errors
    /// Returns an error if the action cannot be applied to the map. Nothing
    /// is recorded and no notification is sent in that case.
    pub fn perform(
        &mut self,
        action: EditorAction,
        map: &mut Beatmap,
        origin: ActionOrigin,
    ) -> ActionResult<()> {
        if let Err(err) = action.perform(map) {
            error!("Perform failed for '{}': {}", action.description(), err);
            return Err(err);
        }
        debug!("Perform: {}", action.description());

        let id = self.allocate_entry_id();
        self.redo_stack.clear();
        self.undo_stack.push_back(Entry { id, action });
        self.trim_history();

        if let Some(entry) = self.undo_stack.back() {
            self.dispatcher
                .dispatch(&entry.action, TransitionKind::New, origin);
        }
        Ok(())
    }

    /// Wrap `actions` in a batch and perform it as one entry
    pub fn perform_batch(
        &mut self,
        actions: Vec<EditorAction>,
        map: &mut Beatmap,
        origin: ActionOrigin,
    ) -> ActionResult<()> {
        let batch = BatchAction::new(actions)?;
        self.perform(batch.into(), map, origin)
    }

    fn trim_history(&mut self) {
        if self.max_history == 0 {
            return;
        }
        while self.undo_stack.len() > self.max_history {
            let Some(evicted) = self.undo_stack.pop_front() else {
                break;
            };
            debug!("Evicted from history: {}", evicted.action.description());

            // The new bottom of the stack now stands for the state after the
            // evicted entry, and the state before it is unreachable
            self.last_save_marker = match self.last_save_marker {
                Some(marker) if marker == evicted.id => None,
                None => Some(self.allocate_entry_id()),
                other => other,
            };
        }
    }

    /// Undo the most recent action
    ///
    /// Returns `Ok(false)` without notifying anyone if there is nothing to
    /// undo.
    ///
    /// # Errors
    /// If the undo fails the entry stays on the undo stack.
    pub fn undo(&mut self, map: &mut Beatmap, origin: ActionOrigin) -> ActionResult<bool> {
        let Some(entry) = self.undo_stack.pop_back() else {
            return Ok(false);
        };

        if let Err(err) = entry.action.undo(map) {
            error!("Undo failed for '{}': {}", entry.action.description(), err);
            self.undo_stack.push_back(entry);
            return Err(err);
        }
        debug!("Undo: {}", entry.action.description());

        self.redo_stack.push_back(entry);
        if let Some(entry) = self.redo_stack.back() {
            self.dispatcher
                .dispatch(&entry.action, TransitionKind::Undo, origin);
        }
        Ok(true)
    }

    /// Redo the most recently undone action
    ///
    /// Returns `Ok(false)` without notifying anyone if there is nothing to
    /// redo.
    ///
    /// # Errors
    /// If the redo fails the entry stays on the redo stack.
    pub fn redo(&mut self, map: &mut Beatmap, origin: ActionOrigin) -> ActionResult<bool> {
        let Some(entry) = self.redo_stack.pop_back() else {
            return Ok(false);
        };

        if let Err(err) = entry.action.perform(map) {
            error!("Redo failed for '{}': {}", entry.action.description(), err);
            self.redo_stack.push_back(entry);
            return Err(err);
        }
        debug!("Redo: {}", entry.action.description());

        self.undo_stack.push_back(entry);
        if let Some(entry) = self.undo_stack.back() {
            self.dispatcher
                .dispatch(&entry.action, TransitionKind::Redo, origin);
        }
        Ok(true)
    }

    /// Remember the current state as the saved one
    pub fn mark_saved(&mut self) {
        self.last_save_marker = self.undo_stack.back().map(|entry| entry.id);
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.undo_stack.back().map(|entry| entry.id) != self.last_save_marker
    }

    /// Check if there are actions that can be undone
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if there are actions that can be redone
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Get a description of the action that would be undone
    pub fn undo_description(&self) -> Option<String> {
        self.undo_stack.back().map(|entry| entry.action.description())
    }

    /// Get a description of the action that would be redone
    pub fn redo_description(&self) -> Option<String> {
        self.redo_stack.back().map(|entry| entry.action.description())
    }

    /// Tags on the undo stack, oldest first
    pub fn undo_tags(&self) -> Vec<ActionTag> {
        self.undo_stack.iter().map(|entry| entry.action.tag()).collect()
    }

    /// Tags on the redo stack, oldest first
    pub fn redo_tags(&self) -> Vec<ActionTag> {
        self.redo_stack.iter().map(|entry| entry.action.tag()).collect()
    }

    /// Get the number of actions in the undo stack
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Get the number of actions in the redo stack
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn max_history(&self) -> usize {
        self.max_history
    }

    /// Clear all history, keeping the current dirty state
    pub fn clear(&mut self) {
        let dirty = self.has_unsaved_changes();
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.last_save_marker = if dirty {
            Some(self.allocate_entry_id())
        } else {
            None
        };
    }

    pub fn dispatcher(&self) -> &EventDispatcher {
        &self.dispatcher
    }

    pub fn dispatcher_mut(&mut self) -> &mut EventDispatcher {
        &mut self.dispatcher
    }

    /// Drop all history and every subscriber
    pub fn dispose(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.last_save_marker = None;
        self.dispatcher.clear();
    }
}

impl Default for ActionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ActionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionManager")
            .field("undo", &self.undo_tags())
            .field("redo", &self.redo_tags())
            .field("last_save_marker", &self.last_save_marker)
            .field("max_history", &self.max_history)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::actions::hit_objects::PlaceHitObject;
    use crate::command::actions::metadata::ChangePreviewTime;
    use crate::command::event::Notification;
    use crate::command::trait_def::ActionError;
    use crate::map::HitObject;
    use std::cell::RefCell;
    use std::rc::Rc;

    const NATIVE: ActionOrigin = ActionOrigin::Native;

    fn preview(map: &Beatmap, time: i32) -> EditorAction {
        ChangePreviewTime::new(map, time).unwrap().into()
    }

    fn place(map: &mut Beatmap, lane: u8, time: i32) -> EditorAction {
        let id = map.allocate_id();
        PlaceHitObject::new(map, HitObject::new(id, lane, time))
            .unwrap()
            .into()
    }

    #[test]
    fn test_perform_action() {
        let mut manager = ActionManager::new();
        let mut map = Beatmap::default();

        let action = preview(&map, 42);
        manager.perform(action, &mut map, NATIVE).unwrap();

        assert_eq!(map.preview_time, 42);
        assert_eq!(manager.undo_count(), 1);
        assert_eq!(manager.redo_count(), 0);
        assert!(manager.can_undo());
        assert!(!manager.can_redo());
    }

    #[test]
    fn test_undo() {
        let mut manager = ActionManager::new();
        let mut map = Beatmap::default();

        let action = preview(&map, 42);
        manager.perform(action, &mut map, NATIVE).unwrap();

        assert_eq!(
            manager.undo_description().as_deref(),
            Some("Set Preview Time to 42ms")
        );
        assert!(manager.undo(&mut map, NATIVE).unwrap());
        assert_eq!(map.preview_time, 0);
        assert_eq!(manager.undo_count(), 0);
        assert_eq!(manager.redo_count(), 1);
    }

    #[test]
    fn test_redo() {
        let mut manager = ActionManager::new();
        let mut map = Beatmap::default();

        let action = preview(&map, 42);
        manager.perform(action, &mut map, NATIVE).unwrap();
        manager.undo(&mut map, NATIVE).unwrap();

        assert!(manager.redo(&mut map, NATIVE).unwrap());
        assert_eq!(map.preview_time, 42);
        assert_eq!(manager.undo_count(), 1);
        assert_eq!(manager.redo_count(), 0);
    }

    #[test]
    fn test_redo_stack_cleared_on_new_action() {
        let mut manager = ActionManager::new();
        let mut map = Beatmap::default();

        // Perform, undo, then perform a new action
        let first = preview(&map, 1);
        manager.perform(first, &mut map, NATIVE).unwrap();
        manager.undo(&mut map, NATIVE).unwrap();
        let second = preview(&map, 2);
        manager.perform(second, &mut map, NATIVE).unwrap();

        // Redo stack should be cleared
        assert!(!manager.can_redo());
        assert_eq!(manager.redo_count(), 0);
    }

    #[test]
    fn test_history_limit() {
        let mut manager = ActionManager::with_capacity(3);
        let mut map = Beatmap::default();

        // Perform 5 actions (more than limit)
        for time in 1..=5 {
            let action = preview(&map, time);
            manager.perform(action, &mut map, NATIVE).unwrap();
        }

        // Should only keep the last 3
        assert_eq!(manager.undo_count(), 3);
        while manager.undo(&mut map, NATIVE).unwrap() {}
        assert_eq!(map.preview_time, 2);
    }

    #[test]
    fn test_unlimited_history() {
        let mut manager = ActionManager::with_capacity(0);
        let mut map = Beatmap::default();

        for time in 1..=150 {
            let action = preview(&map, time);
            manager.perform(action, &mut map, NATIVE).unwrap();
        }
        assert_eq!(manager.undo_count(), 150);
    }

    #[test]
    fn test_undo_with_empty_stack() {
        let mut manager = ActionManager::new();
        let mut map = Beatmap::default();
        let notified = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&notified);
        manager
            .dispatcher_mut()
            .subscribe_all(Box::new(move |_: &Notification| *sink.borrow_mut() += 1));

        assert!(!manager.undo(&mut map, NATIVE).unwrap());
        assert!(!manager.redo(&mut map, NATIVE).unwrap());
        assert_eq!(*notified.borrow(), 0);
    }

    #[test]
    fn test_failed_perform_records_nothing() {
        let mut manager = ActionManager::new();
        let mut map = Beatmap::default();

        let action = place(&mut map, 1, 0);
        // Something else claims the id before the action runs
        map.hit_objects.insert(HitObject::new(1, 2, 0)).unwrap();

        let err = manager.perform(action, &mut map, NATIVE).unwrap_err();
        assert!(matches!(err, ActionError::DuplicateEntity { .. }));
        assert_eq!(manager.undo_count(), 0);
        assert!(!manager.has_unsaved_changes());
    }

    #[test]
    fn test_failed_undo_keeps_entry() {
        let mut manager = ActionManager::new();
        let mut map = Beatmap::default();

        let action = place(&mut map, 1, 0);
        manager.perform(action, &mut map, NATIVE).unwrap();
        map.hit_objects.remove(1);

        assert!(manager.undo(&mut map, NATIVE).is_err());
        assert_eq!(manager.undo_count(), 1);
        assert_eq!(manager.redo_count(), 0);
    }

    #[test]
    fn test_dirty_flag_sequence() {
        let mut manager = ActionManager::new();
        let mut map = Beatmap::default();
        assert!(!manager.has_unsaved_changes());

        let action = place(&mut map, 1, 0);
        manager.perform(action, &mut map, NATIVE).unwrap();
        assert!(manager.has_unsaved_changes());

        manager.mark_saved();
        assert!(!manager.has_unsaved_changes());

        let action = place(&mut map, 2, 0);
        manager.perform(action, &mut map, NATIVE).unwrap();
        assert!(manager.has_unsaved_changes());
        manager.undo(&mut map, NATIVE).unwrap();
        assert!(!manager.has_unsaved_changes());
    }

    #[test]
    fn test_redo_past_save_marker_is_dirty() {
        let mut manager = ActionManager::new();
        let mut map = Beatmap::default();

        let first = place(&mut map, 1, 0);
        manager.perform(first, &mut map, NATIVE).unwrap();
        let second = place(&mut map, 2, 0);
        manager.perform(second, &mut map, NATIVE).unwrap();
        manager.undo(&mut map, NATIVE).unwrap();
        manager.mark_saved();
        assert!(!manager.has_unsaved_changes());

        manager.redo(&mut map, NATIVE).unwrap();
        assert!(manager.has_unsaved_changes());
    }

    #[test]
    fn test_identical_actions_are_not_interchangeable() {
        let mut manager = ActionManager::new();
        let mut map = Beatmap::default();

        let action = preview(&map, 10);
        manager.perform(action, &mut map, NATIVE).unwrap();
        manager.mark_saved();
        manager.undo(&mut map, NATIVE).unwrap();

        // Same payload, new perform: a different history entry
        let again = preview(&map, 10);
        manager.perform(again, &mut map, NATIVE).unwrap();
        assert_eq!(map.preview_time, 10);
        assert!(manager.has_unsaved_changes());
    }

    #[test]
    fn test_eviction_never_reports_clean_by_mistake() {
        let mut manager = ActionManager::with_capacity(2);
        let mut map = Beatmap::default();
        manager.mark_saved();

        for time in 1..=3 {
            let action = preview(&map, time);
            manager.perform(action, &mut map, NATIVE).unwrap();
        }
        while manager.undo(&mut map, NATIVE).unwrap() {}

        // The saved state (preview 0) is no longer reachable
        assert_eq!(map.preview_time, 1);
        assert!(manager.has_unsaved_changes());
    }

    #[test]
    fn test_eviction_of_saved_entry() {
        let mut manager = ActionManager::with_capacity(2);
        let mut map = Beatmap::default();

        let action = preview(&map, 1);
        manager.perform(action, &mut map, NATIVE).unwrap();
        manager.mark_saved();
        for time in 2..=3 {
            let action = preview(&map, time);
            manager.perform(action, &mut map, NATIVE).unwrap();
        }
        assert!(manager.has_unsaved_changes());

        while manager.undo(&mut map, NATIVE).unwrap() {}
        assert_eq!(map.preview_time, 1);
        assert!(!manager.has_unsaved_changes());
    }

    #[test]
    fn test_clear_keeps_dirty_state() {
        let mut manager = ActionManager::new();
        let mut map = Beatmap::default();

        let action = preview(&map, 1);
        manager.perform(action, &mut map, NATIVE).unwrap();
        manager.clear();
        assert!(!manager.can_undo());
        assert!(manager.has_unsaved_changes());

        manager.mark_saved();
        manager.clear();
        assert!(!manager.has_unsaved_changes());
    }

    #[test]
    fn test_notifications_per_transition() {
        let mut manager = ActionManager::new();
        let mut map = Beatmap::default();
        let kinds = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&kinds);
        manager.dispatcher_mut().subscribe(
            ActionTag::ChangePreviewTime,
            Box::new(move |n: &Notification| sink.borrow_mut().push((n.kind, n.origin))),
        );

        let action = preview(&map, 5);
        manager.perform(action, &mut map, NATIVE).unwrap();
        manager.undo(&mut map, ActionOrigin::Script).unwrap();
        manager.redo(&mut map, NATIVE).unwrap();

        assert_eq!(
            *kinds.borrow(),
            vec![
                (TransitionKind::New, ActionOrigin::Native),
                (TransitionKind::Undo, ActionOrigin::Script),
                (TransitionKind::Redo, ActionOrigin::Native),
            ]
        );
    }

    #[test]
    fn test_batch_occupies_one_slot() {
        let mut manager = ActionManager::new();
        let mut map = Beatmap::default();

        let actions = vec![place(&mut map, 1, 0), place(&mut map, 2, 0), place(&mut map, 3, 0)];
        manager.perform_batch(actions, &mut map, NATIVE).unwrap();
        assert_eq!(manager.undo_tags(), vec![ActionTag::Batch]);
        assert_eq!(map.hit_objects.len(), 3);

        manager.undo(&mut map, NATIVE).unwrap();
        assert!(map.hit_objects.is_empty());
        assert_eq!(manager.redo_tags(), vec![ActionTag::Batch]);
    }

    #[test]
    fn test_empty_batch_is_rejected() {
        let mut manager = ActionManager::new();
        let mut map = Beatmap::default();

        assert!(manager.perform_batch(Vec::new(), &mut map, NATIVE).is_err());
        assert_eq!(manager.undo_count(), 0);
    }

    #[test]
    fn test_dispose_drops_subscribers() {
        let mut manager = ActionManager::new();
        let mut map = Beatmap::default();
        manager
            .dispatcher_mut()
            .subscribe_all(Box::new(|_: &Notification| {}));
        let action = preview(&map, 1);
        manager.perform(action, &mut map, NATIVE).unwrap();

        manager.dispose();
        assert_eq!(manager.dispatcher().subscriber_count(), 0);
        assert!(!manager.can_undo());
    }
}
