// Bookmark actions

use crate::command::actions::{
    ValueChange, apply_changes, changed, insert_all, lookup_all, remove_all,
};
use crate::command::trait_def::{ActionError, ActionResult, EntityKind, Rejection, UndoableAction};
use crate::map::{Beatmap, Bookmark, BookmarkId};

const KIND: EntityKind = EntityKind::Bookmark;

fn validate_new_bookmarks(map: &Beatmap, bookmarks: &[Bookmark]) -> ActionResult<()> {
    for (index, bookmark) in bookmarks.iter().enumerate() {
        let taken = map.bookmarks.contains(bookmark.id)
            || bookmarks[..index].iter().any(|other| other.id == bookmark.id);
        if taken {
            return Err(ActionError::duplicate(KIND, bookmark.id));
        }
    }
    Ok(())
}

fn ids(bookmarks: &[Bookmark]) -> impl Iterator<Item = u64> + Clone + '_ {
    bookmarks.iter().map(|bookmark| bookmark.id)
}

#[derive(Debug)]
pub struct AddBookmark {
    pub(crate) bookmark: Bookmark,
}

impl AddBookmark {
    pub fn new(map: &Beatmap, bookmark: Bookmark) -> ActionResult<Self> {
        validate_new_bookmarks(map, std::slice::from_ref(&bookmark))?;
        Ok(Self { bookmark })
    }
}

impl UndoableAction for AddBookmark {
    fn perform(&self, map: &mut Beatmap) -> ActionResult<()> {
        insert_all(&mut map.bookmarks, std::slice::from_ref(&self.bookmark), KIND)
    }

    fn undo(&self, map: &mut Beatmap) -> ActionResult<()> {
        remove_all(&mut map.bookmarks, [self.bookmark.id], KIND)
    }

    fn description(&self) -> String {
        format!("Add Bookmark at {}ms", self.bookmark.start_time)
    }
}

#[derive(Debug)]
pub struct RemoveBookmark {
    pub(crate) bookmark: Bookmark,
}

impl RemoveBookmark {
    pub fn new(map: &Beatmap, id: BookmarkId) -> ActionResult<Self> {
        let bookmark = map
            .bookmarks
            .get(id)
            .ok_or_else(|| Rejection::unknown(KIND, id))?
            .clone();
        Ok(Self { bookmark })
    }
}

impl UndoableAction for RemoveBookmark {
    fn perform(&self, map: &mut Beatmap) -> ActionResult<()> {
        remove_all(&mut map.bookmarks, [self.bookmark.id], KIND)
    }

    fn undo(&self, map: &mut Beatmap) -> ActionResult<()> {
        insert_all(&mut map.bookmarks, std::slice::from_ref(&self.bookmark), KIND)
    }

    fn description(&self) -> String {
        format!("Remove Bookmark at {}ms", self.bookmark.start_time)
    }
}

#[derive(Debug)]
pub struct AddBookmarkBatch {
    pub(crate) bookmarks: Vec<Bookmark>,
}

impl AddBookmarkBatch {
    pub fn new(map: &Beatmap, bookmarks: Vec<Bookmark>) -> ActionResult<Self> {
        if bookmarks.is_empty() {
            return Err(Rejection::EmptyTarget.into());
        }
        validate_new_bookmarks(map, &bookmarks)?;
        Ok(Self { bookmarks })
    }
}

impl UndoableAction for AddBookmarkBatch {
    fn perform(&self, map: &mut Beatmap) -> ActionResult<()> {
        insert_all(&mut map.bookmarks, &self.bookmarks, KIND)
    }

    fn undo(&self, map: &mut Beatmap) -> ActionResult<()> {
        remove_all(&mut map.bookmarks, ids(&self.bookmarks), KIND)
    }

    fn description(&self) -> String {
        format!("Add {} Bookmarks", self.bookmarks.len())
    }
}

#[derive(Debug)]
pub struct RemoveBookmarkBatch {
    pub(crate) bookmarks: Vec<Bookmark>,
}

impl RemoveBookmarkBatch {
    pub fn new(map: &Beatmap, ids: &[BookmarkId]) -> ActionResult<Self> {
        Ok(Self {
            bookmarks: lookup_all(&map.bookmarks, ids, KIND)?,
        })
    }
}

impl UndoableAction for RemoveBookmarkBatch {
    fn perform(&self, map: &mut Beatmap) -> ActionResult<()> {
        remove_all(&mut map.bookmarks, ids(&self.bookmarks), KIND)
    }

    fn undo(&self, map: &mut Beatmap) -> ActionResult<()> {
        insert_all(&mut map.bookmarks, &self.bookmarks, KIND)
    }

    fn description(&self) -> String {
        format!("Remove {} Bookmarks", self.bookmarks.len())
    }
}

/// Replace the note text of a bookmark
#[derive(Debug)]
pub struct EditBookmark {
    pub(crate) change: ValueChange<String>,
}

impl EditBookmark {
    pub fn new(map: &Beatmap, id: BookmarkId, note: impl Into<String>) -> ActionResult<Self> {
        let bookmark = map
            .bookmarks
            .get(id)
            .ok_or_else(|| Rejection::unknown(KIND, id))?;
        let mut change = changed(vec![ValueChange::new(id, bookmark.note.clone(), note.into())])?;
        Ok(Self {
            change: change.remove(0),
        })
    }
}

impl UndoableAction for EditBookmark {
    fn perform(&self, map: &mut Beatmap) -> ActionResult<()> {
        apply_changes(
            &mut map.bookmarks,
            std::slice::from_ref(&self.change),
            KIND,
            true,
            |bookmark: &mut Bookmark, note| bookmark.note = note,
        )
    }

    fn undo(&self, map: &mut Beatmap) -> ActionResult<()> {
        apply_changes(
            &mut map.bookmarks,
            std::slice::from_ref(&self.change),
            KIND,
            false,
            |bookmark: &mut Bookmark, note| bookmark.note = note,
        )
    }

    fn description(&self) -> String {
        format!("Edit Bookmark \"{}\"", self.change.new)
    }
}

#[derive(Debug)]
pub struct ChangeBookmarkOffsetBatch {
    pub(crate) delta: i32,
    pub(crate) changes: Vec<ValueChange<i32>>,
}

impl ChangeBookmarkOffsetBatch {
    pub fn new(map: &Beatmap, ids: &[BookmarkId], delta: i32) -> ActionResult<Self> {
        let changes = lookup_all(&map.bookmarks, ids, KIND)?
            .into_iter()
            .map(|bookmark| {
                ValueChange::new(
                    bookmark.id,
                    bookmark.start_time,
                    bookmark.start_time.saturating_add(delta),
                )
            })
            .collect();
        Ok(Self {
            delta,
            changes: changed(changes)?,
        })
    }

    fn apply(&self, map: &mut Beatmap, use_new: bool) -> ActionResult<()> {
        apply_changes(
            &mut map.bookmarks,
            &self.changes,
            KIND,
            use_new,
            |bookmark: &mut Bookmark, time| bookmark.start_time = time,
        )
    }
}

impl UndoableAction for ChangeBookmarkOffsetBatch {
    fn perform(&self, map: &mut Beatmap) -> ActionResult<()> {
        self.apply(map, true)
    }

    fn undo(&self, map: &mut Beatmap) -> ActionResult<()> {
        self.apply(map, false)
    }

    fn description(&self) -> String {
        format!(
            "Move {} Bookmarks by {:+}ms",
            self.changes.len(),
            self.delta
        )
    }
}
