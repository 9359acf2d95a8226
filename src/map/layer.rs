// Editor layers - purely organisational groups of hit objects

use serde::{Deserialize, Serialize};

pub type LayerId = u64;

/// Reserved id of the default layer
///
/// The default layer always exists and is not stored in the layer list.
pub const DEFAULT_LAYER: LayerId = 0;

/// A named, coloured editor layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorLayer {
    pub id: LayerId,
    pub name: String,
    pub color: [u8; 3],
    pub hidden: bool,
}

impl EditorLayer {
    pub fn new(id: LayerId, name: impl Into<String>, color: [u8; 3]) -> Self {
        Self {
            id,
            name: name.into(),
            color,
            hidden: false,
        }
    }
}
