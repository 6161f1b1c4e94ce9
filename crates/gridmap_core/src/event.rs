//! Per-cell event identifiers

use serde::{Deserialize, Serialize};

/// A free-text event identifier attached to one grid cell
///
/// The id means nothing to the editor; the consuming game matches on it to
/// trigger logic when the player reaches the cell. Like collision, the
/// event grid is shared across all layers. An empty id is "no event".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EventTile {
    #[serde(default)]
    pub id: String,
}

impl EventTile {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// Check if no event is assigned here
    pub fn is_empty(&self) -> bool {
        self.id.is_empty()
    }
}
