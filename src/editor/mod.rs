// Editing session: the map, its history and the editor context
//
// A session is created when a map is opened for editing and dropped when the
// editor closes. It is the only owner of the map; every mutation goes through
// its ActionManager.

pub mod factory;
pub mod selection;

pub use selection::Selection;

use crate::command::{
    ActionManager, ActionOrigin, ActionResult, ActionTag, EditorAction, Notification,
    SubscriptionId,
};
use crate::config::EditorConfig;
use crate::map::Beatmap;
use log::info;

pub struct EditorSession {
    map: Beatmap,
    history: ActionManager,
    selection: Selection,

    /// Playhead position in milliseconds
    current_time: i32,

    /// Beat divisor used for snapping
    beat_snap: u32,
}

impl EditorSession {
    /// Open a session on an empty map shaped by `config`
    pub fn new(config: &EditorConfig) -> Self {
        Self::with_map(Beatmap::new(config.key_count), config)
    }

    /// Open a session on an existing map
    pub fn with_map(map: Beatmap, config: &EditorConfig) -> Self {
        info!(
            "Editor session opened ({}K, history depth {})",
            map.key_count(),
            config.history.max_depth
        );
        Self {
            map,
            history: ActionManager::with_capacity(config.history.max_depth),
            selection: Selection::new(),
            current_time: 0,
            beat_snap: config.default_beat_snap.max(1),
        }
    }

    pub fn map(&self) -> &Beatmap {
        &self.map
    }

    /// Mutable map access for id allocation while building actions. Entities
    /// must only change through `perform`.
    pub(crate) fn map_mut(&mut self) -> &mut Beatmap {
        &mut self.map
    }

    pub fn history(&self) -> &ActionManager {
        &self.history
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    pub fn current_time(&self) -> i32 {
        self.current_time
    }

    pub fn set_current_time(&mut self, time: i32) {
        self.current_time = time;
    }

    pub fn beat_snap(&self) -> u32 {
        self.beat_snap
    }

    pub fn set_beat_snap(&mut self, snap: u32) {
        self.beat_snap = snap.max(1);
    }

    /// Perform an action on behalf of the native editor
    pub fn perform(&mut self, action: EditorAction) -> ActionResult<()> {
        self.perform_with_origin(action, ActionOrigin::Native)
    }

    pub fn perform_with_origin(
        &mut self,
        action: EditorAction,
        origin: ActionOrigin,
    ) -> ActionResult<()> {
        self.history.perform(action, &mut self.map, origin)?;
        self.selection.prune(&self.map);
        Ok(())
    }

    /// Perform several actions as one undo step
    pub fn perform_batch(&mut self, actions: Vec<EditorAction>) -> ActionResult<()> {
        self.history
            .perform_batch(actions, &mut self.map, ActionOrigin::Native)?;
        self.selection.prune(&self.map);
        Ok(())
    }

    /// Undo the last action. Returns false if there was nothing to undo.
    pub fn undo(&mut self) -> ActionResult<bool> {
        self.undo_with_origin(ActionOrigin::Native)
    }

    pub fn undo_with_origin(&mut self, origin: ActionOrigin) -> ActionResult<bool> {
        let undone = self.history.undo(&mut self.map, origin)?;
        self.selection.prune(&self.map);
        Ok(undone)
    }

    /// Redo the last undone action. Returns false if there was nothing to redo.
    pub fn redo(&mut self) -> ActionResult<bool> {
        self.redo_with_origin(ActionOrigin::Native)
    }

    pub fn redo_with_origin(&mut self, origin: ActionOrigin) -> ActionResult<bool> {
        let redone = self.history.redo(&mut self.map, origin)?;
        self.selection.prune(&self.map);
        Ok(redone)
    }

    /// Called after the map was written to disk
    pub fn mark_saved(&mut self) {
        self.history.mark_saved();
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.history.has_unsaved_changes()
    }

    pub fn subscribe(
        &mut self,
        tag: ActionTag,
        handler: impl FnMut(&Notification) + 'static,
    ) -> SubscriptionId {
        self.history.dispatcher_mut().subscribe(tag, Box::new(handler))
    }

    pub fn subscribe_all(
        &mut self,
        handler: impl FnMut(&Notification) + 'static,
    ) -> SubscriptionId {
        self.history.dispatcher_mut().subscribe_all(Box::new(handler))
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.history.dispatcher_mut().unsubscribe(id)
    }

    /// Tear the session down, dropping history and subscribers
    pub fn close(mut self) -> Beatmap {
        self.history.dispose();
        info!("Editor session closed");
        self.map
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

impl std::fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorSession")
            .field("history", &self.history)
            .field("selection", &self.selection)
            .field("current_time", &self.current_time)
            .field("beat_snap", &self.beat_snap)
            .finish()
    }
}
