// UndoableAction trait definition and action errors

use crate::map::Beatmap;
use serde::Serialize;
use std::fmt;

/// Result type for action construction and execution
pub type ActionResult<T> = Result<T, ActionError>;

/// Kind of map entity an action refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    HitObject,
    TimingPoint,
    ScrollVelocity,
    Layer,
    TimingGroup,
    Bookmark,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::HitObject => "hit object",
            EntityKind::TimingPoint => "timing point",
            EntityKind::ScrollVelocity => "scroll velocity",
            EntityKind::Layer => "layer",
            EntityKind::TimingGroup => "timing group",
            EntityKind::Bookmark => "bookmark",
        };
        f.write_str(name)
    }
}

/// Reasons an action is refused before it is ever constructed
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Rejection {
    #[error("nothing to act on")]
    EmptyTarget,

    #[error("a batch needs at least one action")]
    EmptyBatch,

    #[error("the default layer cannot be changed")]
    ReservedLayer,

    #[error("timing group '{0}' is reserved")]
    ReservedTimingGroup(String),

    #[error("timing group '{0}' already exists")]
    DuplicateTimingGroup(String),

    #[error("'{0}' is not a valid timing group id")]
    InvalidTimingGroupId(String),

    #[error("lane {lane} is outside 1..={key_count}")]
    LaneOutOfRange { lane: i64, key_count: u8 },

    #[error("invalid {field}: {value}")]
    InvalidValue { field: &'static str, value: f64 },

    #[error("the map has no timing points")]
    NoTimingPoints,

    #[error("unknown {kind} {id}")]
    UnknownEntity { kind: EntityKind, id: String },
}

impl Rejection {
    pub fn unknown(kind: EntityKind, id: impl ToString) -> Self {
        Rejection::UnknownEntity {
            kind,
            id: id.to_string(),
        }
    }
}

/// Errors produced while building or applying an action
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ActionError {
    /// The action was refused at construction time
    #[error("action rejected: {0}")]
    Rejected(#[from] Rejection),

    /// An entity the action refers to is gone from the map
    #[error("{kind} {id} is missing from the map")]
    MissingEntity { kind: EntityKind, id: String },

    /// An entity the action would add is already in the map
    #[error("{kind} {id} is already in the map")]
    DuplicateEntity { kind: EntityKind, id: String },
}

impl ActionError {
    pub fn missing(kind: EntityKind, id: impl ToString) -> Self {
        ActionError::MissingEntity {
            kind,
            id: id.to_string(),
        }
    }

    pub fn duplicate(kind: EntityKind, id: impl ToString) -> Self {
        ActionError::DuplicateEntity {
            kind,
            id: id.to_string(),
        }
    }

    pub fn is_rejection(&self) -> bool {
        matches!(self, ActionError::Rejected(_))
    }
}

/// Behaviour shared by every editor action payload
///
/// Payloads capture all before/after values when they are constructed, so
/// `perform` and `undo` only write state and never need to read it back.
///
/// # Contract
/// `undo` called right after `perform` must leave the map equal to what it
/// was before `perform`. A failure from either method means the map no
/// longer holds an entity the action was built against.
pub trait UndoableAction {
    /// Apply the edit
    fn perform(&self, map: &mut Beatmap) -> ActionResult<()>;

    /// Revert the edit
    fn undo(&self, map: &mut Beatmap) -> ActionResult<()>;

    /// Human-readable description (e.g. "Undo: Rename Layer to Drums")
    fn description(&self) -> String;
}
