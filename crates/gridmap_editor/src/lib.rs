//! Layered tile-map editing core
//!
//! This crate is the state machine behind a grid-based map editor. It owns
//! layers of paintable tiles, the shared collision and event grids, a
//! bounded undo history of full snapshots, and the viewport pan/zoom state.
//! It deliberately does no drawing and no widget work: the host application
//! renders from the getters here (`Map::layer_opacity`, `tile_visual`,
//! `Viewport::offset`) and drives edits through the public operations and
//! the tile-click callback.
//!
//! Typical wiring:
//!
//! ```rust,ignore
//! use gridmap_core::TilePatch;
//! use gridmap_editor::{Map, MapConfig, PointerButton, ViewportConfig};
//!
//! let mut map = Map::new(MapConfig::new(20, 15), ViewportConfig::default());
//! map.set_on_tile_click(Box::new(|tile| {
//!     tile.set_state(&TilePatch::new().texture("wall"));
//!     true // committed a change, take a history snapshot
//! }));
//!
//! map.pointer_down(3, 4, PointerButton::Primary);
//! map.undo();
//! ```

mod history;
mod layer;
mod map;
mod session;
mod tileset;
mod viewport;
mod visual;

pub use history::{History, HISTORY_CAPACITY};
pub use layer::MapLayer;
pub use map::{Map, MapConfig, MapError, PointerButton, TileClickHandler, INACTIVE_LAYER_ALPHA};
pub use session::{SessionCache, SessionError};
pub use tileset::Tileset;
pub use viewport::{PanController, Viewport, ViewportConfig, MAX_ZOOM, MIN_ZOOM};
pub use visual::{tile_visual, TileVisual};
