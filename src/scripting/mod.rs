// Scripting surface
//
// Plugins call into the editor with a tag name and a list of loosely typed
// JSON values. The facade checks the argument count for the tag, coerces each
// value, builds the action and routes it through the same history as the
// native editor.

pub mod args;
pub mod facade;

pub use args::ArgReader;
pub use facade::ScriptFacade;

use crate::command::{ActionError, ActionTag};
use std::fmt;
use thiserror::Error;

pub type ScriptResult<T> = Result<T, ScriptError>;

/// Number of positional arguments a tag accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arity {
    pub min: usize,
    pub max: usize,
}

impl Arity {
    pub const fn exactly(count: usize) -> Self {
        Self {
            min: count,
            max: count,
        }
    }

    pub const fn between(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    pub fn accepts(self, count: usize) -> bool {
        (self.min..=self.max).contains(&count)
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.min == self.max {
            write!(f, "{}", self.min)
        } else {
            write!(f, "{} to {}", self.min, self.max)
        }
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum ScriptError {
    #[error("{tag} takes {expected} arguments, got {got}")]
    Arity {
        tag: ActionTag,
        expected: Arity,
        got: usize,
    },

    #[error("argument {index}: expected {expected}, got {got}")]
    Argument {
        index: usize,
        expected: &'static str,
        got: String,
    },

    #[error(transparent)]
    Rejected(#[from] ActionError),
}
