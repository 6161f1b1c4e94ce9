//! The complete serialized map state
//!
//! `MapSnapshot` is the single unit of persistence: it is what gets written
//! to disk, what the undo history stacks, and what `Map::load` consumes.
//! Parsing always runs normalize + validate before anything is returned, so
//! a malformed document can never half-apply.

use crate::{CollisionTile, EventTile, TileState};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when parsing or serializing snapshots
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Serialize error: {0}")]
    SerializeError(String),
    #[error("Invalid snapshot: {0}")]
    InvalidShape(String),
}

/// A complete, self-contained serialization of a map
///
/// Grids are indexed `[x][y]`; the tile grids additionally carry a leading
/// layer index, bottom layer first. A cell with no painted tile is `None`
/// (JSON `null`), never a default-valued state object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapSnapshot {
    /// Per layer, per column, per row: the painted state or `None`
    pub tiles: Vec<Vec<Vec<Option<TileState>>>>,
    /// Shared collision grid; its shape defines the map dimensions
    pub collision: Vec<Vec<CollisionTile>>,
    /// Shared event grid; absent in older saves
    #[serde(default)]
    pub events: Vec<Vec<EventTile>>,
    /// Which layer the player token renders above; absent in older saves
    #[serde(default, rename = "playerLayer")]
    pub player_layer: usize,
}

impl MapSnapshot {
    /// Map width in cells, derived from the collision grid
    pub fn width(&self) -> u32 {
        self.collision.len() as u32
    }

    /// Map height in cells, derived from the collision grid
    pub fn height(&self) -> u32 {
        self.collision.first().map(|col| col.len()).unwrap_or(0) as u32
    }

    /// Number of layers
    pub fn layer_count(&self) -> usize {
        self.tiles.len()
    }

    /// Parse a snapshot from JSON, normalizing and validating it
    ///
    /// Nothing is returned unless the whole document is well-formed, so a
    /// caller can load the result without risking partial application.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let mut snapshot: MapSnapshot =
            serde_json::from_str(json).map_err(|e| SnapshotError::ParseError(e.to_string()))?;

        snapshot.normalize();
        snapshot.validate()?;

        Ok(snapshot)
    }

    /// Serialize to compact JSON
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string(self).map_err(|e| SnapshotError::SerializeError(e.to_string()))
    }

    /// Serialize to pretty-printed JSON, for files meant to be read by hand
    pub fn to_json_pretty(&self) -> Result<String, SnapshotError> {
        serde_json::to_string_pretty(self).map_err(|e| SnapshotError::SerializeError(e.to_string()))
    }

    /// Fill in what older or hand-edited saves legitimately leave out
    ///
    /// - no layers at all becomes one empty layer (a map always has one)
    /// - an absent event grid becomes all-empty cells
    /// - a painted state with an empty texture id collapses to `None`
    /// - `player_layer` is clamped into the layer range
    pub fn normalize(&mut self) {
        let width = self.width() as usize;
        let height = self.height() as usize;

        if self.tiles.is_empty() {
            self.tiles.push(vec![vec![None; height]; width]);
        }

        if self.events.is_empty() {
            self.events = vec![vec![EventTile::default(); height]; width];
        }

        for layer in &mut self.tiles {
            for column in layer {
                for cell in column {
                    if matches!(cell, Some(state) if state.is_empty()) {
                        *cell = None;
                    }
                }
            }
        }

        self.player_layer = self.player_layer.min(self.tiles.len().saturating_sub(1));
    }

    /// Check that every grid is rectangular and agrees on the dimensions
    pub fn validate(&self) -> Result<(), SnapshotError> {
        let width = self.collision.len();
        if width == 0 {
            return Err(SnapshotError::InvalidShape(
                "collision grid is empty".to_string(),
            ));
        }
        let height = self.collision[0].len();
        if height == 0 {
            return Err(SnapshotError::InvalidShape(
                "collision grid has zero height".to_string(),
            ));
        }
        for (x, column) in self.collision.iter().enumerate() {
            if column.len() != height {
                return Err(SnapshotError::InvalidShape(format!(
                    "collision column {} has height {}, expected {}",
                    x,
                    column.len(),
                    height
                )));
            }
        }

        check_grid_shape("events", self.events.len(), width)?;
        for (x, column) in self.events.iter().enumerate() {
            check_grid_shape(&format!("events column {}", x), column.len(), height)?;
        }

        for (layer_idx, layer) in self.tiles.iter().enumerate() {
            check_grid_shape(&format!("layer {}", layer_idx), layer.len(), width)?;
            for (x, column) in layer.iter().enumerate() {
                check_grid_shape(
                    &format!("layer {} column {}", layer_idx, x),
                    column.len(),
                    height,
                )?;
            }
        }

        Ok(())
    }
}

fn check_grid_shape(what: &str, got: usize, expected: usize) -> Result<(), SnapshotError> {
    if got != expected {
        Err(SnapshotError::InvalidShape(format!(
            "{} has size {}, expected {}",
            what, got, expected
        )))
    } else {
        Ok(())
    }
}
