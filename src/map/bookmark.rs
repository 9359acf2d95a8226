// Bookmarks - annotated positions on the timeline

use crate::map::collection::Timed;
use serde::{Deserialize, Serialize};

pub type BookmarkId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: BookmarkId,

    /// Position in milliseconds
    pub start_time: i32,

    pub note: String,
}

impl Bookmark {
    pub fn new(id: BookmarkId, start_time: i32, note: impl Into<String>) -> Self {
        Self {
            id,
            start_time,
            note: note.into(),
        }
    }
}

impl Timed for Bookmark {
    fn id(&self) -> u64 {
        self.id
    }

    fn time(&self) -> f64 {
        f64::from(self.start_time)
    }
}
