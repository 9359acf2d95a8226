// Map metadata actions

use crate::command::trait_def::{ActionResult, Rejection, UndoableAction};
use crate::map::Beatmap;

/// Move the song preview point
#[derive(Debug)]
pub struct ChangePreviewTime {
    pub(crate) old: i32,
    pub(crate) new: i32,
}

impl ChangePreviewTime {
    pub fn new(map: &Beatmap, time: i32) -> ActionResult<Self> {
        if map.preview_time == time {
            return Err(Rejection::EmptyTarget.into());
        }
        Ok(Self {
            old: map.preview_time,
            new: time,
        })
    }
}

impl UndoableAction for ChangePreviewTime {
    fn perform(&self, map: &mut Beatmap) -> ActionResult<()> {
        map.preview_time = self.new;
        Ok(())
    }

    fn undo(&self, map: &mut Beatmap) -> ActionResult<()> {
        map.preview_time = self.old;
        Ok(())
    }

    fn description(&self) -> String {
        format!("Set Preview Time to {}ms", self.new)
    }
}
