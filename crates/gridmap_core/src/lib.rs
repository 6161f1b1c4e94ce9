//! Core data structures for gridmap
//!
//! This crate provides the fundamental types for representing layered tile
//! maps:
//! - `TileState` / `TilePatch` - The visual attributes of one grid cell and
//!   partial updates against them
//! - `Tile` - A single cell: one state plus a fixed grid coordinate
//! - `CollisionTile` - Per-cell edge-blocking flags
//! - `EventTile` - Per-cell free-text event identifier
//! - `MapSnapshot` - The complete serialized map: the unit of persistence
//!   and of undo history
//! - `TilesetDescriptor` - Atlas metadata mapping texture ids to pixel
//!   regions
//!
//! Everything here is plain serde data with no rendering or editor
//! dependencies, so runtimes can load maps without pulling in the editor.

mod collision;
mod event;
mod snapshot;
mod tile;
mod tileset;

pub use collision::{CollisionEdge, CollisionTile};
pub use event::EventTile;
pub use snapshot::{MapSnapshot, SnapshotError};
pub use tile::{Tile, TileOffset, TilePatch, TileState};
pub use tileset::{NamedRegion, TextureRegion, TilesetDescriptor, TilesetError};
