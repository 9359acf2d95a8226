// BatchAction - several actions recorded as one history entry

use crate::command::action::EditorAction;
use crate::command::trait_def::{ActionResult, Rejection, UndoableAction};
use crate::map::Beatmap;
use log::error;

/// An ordered, non-empty group of actions that undo and redo together
///
/// Children are performed in list order and undone in reverse order, so a
/// child may depend on state produced by the children before it.
#[derive(Debug)]
pub struct BatchAction {
    children: Vec<EditorAction>,
    label: Option<String>,
}

impl BatchAction {
    pub fn new(children: Vec<EditorAction>) -> ActionResult<Self> {
        if children.is_empty() {
            return Err(Rejection::EmptyBatch.into());
        }
        Ok(Self {
            children,
            label: None,
        })
    }

    /// Use a custom label instead of the generated one
    pub fn with_description(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn children(&self) -> &[EditorAction] {
        &self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl UndoableAction for BatchAction {
    fn perform(&self, map: &mut Beatmap) -> ActionResult<()> {
        for (index, child) in self.children.iter().enumerate() {
            if let Err(err) = child.perform(map) {
                // Roll back the children that already applied
                for applied in self.children[..index].iter().rev() {
                    if let Err(rollback) = applied.undo(map) {
                        error!(
                            "Batch rollback failed on '{}': {}",
                            applied.description(),
                            rollback
                        );
                    }
                }
                return Err(err);
            }
        }
        Ok(())
    }

    fn undo(&self, map: &mut Beatmap) -> ActionResult<()> {
        for (index, child) in self.children.iter().enumerate().rev() {
            if let Err(err) = child.undo(map) {
                for undone in &self.children[index + 1..] {
                    if let Err(rollback) = undone.perform(map) {
                        error!(
                            "Batch rollback failed on '{}': {}",
                            undone.description(),
                            rollback
                        );
                    }
                }
                return Err(err);
            }
        }
        Ok(())
    }

    fn description(&self) -> String {
        match &self.label {
            Some(label) => label.clone(),
            None => format!("Batch of {} actions", self.children.len()),
        }
    }
}
