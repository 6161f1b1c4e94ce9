//! The map: layers, shared grids, history, viewport and click routing

use crate::{
    tile_visual, History, MapLayer, PanController, TileVisual, Tileset, Viewport, ViewportConfig,
};
use gridmap_core::{
    CollisionEdge, CollisionTile, EventTile, MapSnapshot, Tile, TilePatch, TileState,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Opacity used for layers other than the active one, outside reveal mode
pub const INACTIVE_LAYER_ALPHA: f32 = 0.5;

/// Errors that can occur on the map's save/load boundary
#[derive(Debug, Error)]
pub enum MapError {
    #[error("Snapshot error: {0}")]
    Snapshot(String),
    #[error("Snapshot shape mismatch: {0}")]
    SnapshotShapeMismatch(String),
}

/// Map construction parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    /// Grid width in cells
    pub width: u32,
    /// Grid height in cells
    pub height: u32,
    /// Cell size in pixels; purely a canvas concern but kept here so the
    /// viewport can compute the grid's pixel extent
    pub cell_size: u32,
    /// Whether edits record undo snapshots; off for play/read-only maps
    pub history: bool,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            width: 10,
            height: 10,
            cell_size: 100,
            history: true,
        }
    }
}

impl MapConfig {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            ..Self::default()
        }
    }
}

/// Which pointer button an interaction used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// Decides what a click on a tile means right now (paint, erase, ...)
///
/// Supplied by the UI, which knows the selected tool and palette entry.
/// The return value reports whether committed state changed; `true` takes
/// a history snapshot.
pub type TileClickHandler = Box<dyn FnMut(&mut Tile) -> bool + Send>;

/// A layered tile map under edit
///
/// Owns the ordered layers (index 0 = bottom of the render order), the
/// collision and event grids shared across layers, the active- and
/// player-layer indices, the undo history, and the viewport. All
/// operations run synchronously on the calling thread; re-entrant calls
/// from inside the click handler are not supported.
pub struct Map {
    config: MapConfig,
    layers: Vec<MapLayer>,
    collision: Vec<Vec<CollisionTile>>,
    events: Vec<Vec<EventTile>>,
    active_layer: usize,
    player_layer: usize,
    reveal: bool,
    history: History,
    viewport: Viewport,
    panning: PanController,
    tileset: Option<Tileset>,
    on_tile_click: Option<TileClickHandler>,
}

impl Map {
    /// Create a blank single-layer map
    pub fn new(config: MapConfig, viewport_config: ViewportConfig) -> Self {
        let config = MapConfig {
            width: config.width.max(1),
            height: config.height.max(1),
            ..config
        };
        let viewport = Viewport::new(
            viewport_config,
            (config.width * config.cell_size) as f32,
            (config.height * config.cell_size) as f32,
        );
        let mut map = Self {
            config,
            layers: vec![MapLayer::new(config.width, config.height)],
            collision: blank_grid(config.width, config.height),
            events: blank_grid(config.width, config.height),
            active_layer: 0,
            player_layer: 0,
            reveal: false,
            history: History::new(config.history),
            viewport,
            panning: PanController::new(),
            tileset: None,
            on_tile_click: None,
        };
        let baseline = map.save();
        map.history.reset(baseline);
        map
    }

    pub fn config(&self) -> MapConfig {
        self.config
    }

    // ---- layers ----------------------------------------------------------

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn active_layer(&self) -> usize {
        self.active_layer
    }

    pub fn layer(&self, index: usize) -> Option<&MapLayer> {
        self.layers.get(index)
    }

    pub fn layers(&self) -> &[MapLayer] {
        &self.layers
    }

    /// Make a layer the edit target; out-of-range indices clamp silently
    pub fn set_active_layer(&mut self, index: usize) {
        self.active_layer = index.min(self.layers.len() - 1);
    }

    pub fn next_layer(&mut self) {
        self.set_active_layer(self.active_layer + 1);
    }

    pub fn previous_layer(&mut self) {
        self.set_active_layer(self.active_layer.saturating_sub(1));
    }

    /// Insert an empty layer directly below the active one
    ///
    /// The active index stays put, so it now addresses the new layer and
    /// the previously active content sits one slot above.
    pub fn add_layer_below(&mut self) {
        let layer = MapLayer::new(self.config.width, self.config.height);
        self.layers.insert(self.active_layer, layer);
        if self.player_layer >= self.active_layer {
            self.player_layer += 1;
        }
        self.update_history();
    }

    /// Insert an empty layer directly above the active one and focus it
    pub fn add_layer_above(&mut self) {
        let layer = MapLayer::new(self.config.width, self.config.height);
        self.layers.insert(self.active_layer + 1, layer);
        if self.player_layer > self.active_layer {
            self.player_layer += 1;
        }
        self.active_layer += 1;
        self.update_history();
    }

    /// Remove the active layer; a map always keeps at least one layer
    pub fn remove_layer(&mut self) {
        if self.layers.len() <= 1 {
            return;
        }
        self.layers.remove(self.active_layer);
        if self.player_layer > self.active_layer {
            self.player_layer -= 1;
        }
        self.player_layer = self.player_layer.min(self.layers.len() - 1);
        self.active_layer = self
            .active_layer
            .saturating_sub(1)
            .min(self.layers.len() - 1);
        self.update_history();
    }

    /// Opacity the canvas should draw a layer with
    pub fn layer_opacity(&self, index: usize) -> f32 {
        if self.reveal || index == self.active_layer {
            1.0
        } else {
            INACTIVE_LAYER_ALPHA
        }
    }

    /// Show every layer fully opaque (true) or restore the normal
    /// active/inactive dimming (false)
    pub fn reveal_map(&mut self, reveal: bool) {
        self.reveal = reveal;
    }

    pub fn is_revealed(&self) -> bool {
        self.reveal
    }

    /// Mark the active layer as the one the player token renders above
    pub fn set_player_layer(&mut self) {
        self.player_layer = self.active_layer;
    }

    pub fn player_layer(&self) -> usize {
        self.player_layer
    }

    // ---- painting --------------------------------------------------------

    /// Register the click-interpretation callback supplied by the UI
    pub fn set_on_tile_click(&mut self, handler: TileClickHandler) {
        self.on_tile_click = Some(handler);
    }

    /// Primary-button press on a cell of the active layer
    pub fn pointer_down(&mut self, x: u32, y: u32, button: PointerButton) {
        if button == PointerButton::Primary {
            self.dispatch_tile_click(x, y);
        }
    }

    /// Pointer moved onto a cell; paints when dragging with the primary
    /// button held, and highlights the cell either way
    pub fn pointer_enter(&mut self, x: u32, y: u32, primary_held: bool) {
        if primary_held {
            self.dispatch_tile_click(x, y);
        }
        if let Some(layer) = self.layers.get_mut(self.active_layer) {
            layer.set_highlight(x, y);
        }
    }

    /// Pointer left a cell; clears the highlight only if it was there
    pub fn pointer_leave(&mut self, x: u32, y: u32) {
        if let Some(layer) = self.layers.get_mut(self.active_layer) {
            layer.clear_highlight_at(x, y);
        }
    }

    fn dispatch_tile_click(&mut self, x: u32, y: u32) {
        let Some(handler) = self.on_tile_click.as_mut() else {
            return;
        };
        let Some(layer) = self.layers.get_mut(self.active_layer) else {
            return;
        };
        let Some(tile) = layer.tile_mut(x, y) else {
            return;
        };
        if handler(tile) {
            self.update_history();
        }
    }

    /// Clear every cell of the active layer
    pub fn clear_layer(&mut self) {
        let layer = &mut self.layers[self.active_layer];
        let changed = !layer.is_empty();
        layer.clear();
        if changed {
            self.update_history();
        }
    }

    /// Overwrite every cell of the active layer with the given state
    pub fn fill_tiles(&mut self, state: &TileState) {
        let mut changed = false;
        self.layers[self.active_layer].for_each_tile_mut(|tile| {
            let before = tile.raw_state().clone();
            tile.set_state(&TilePatch::from(state.clone()));
            changed |= *tile.raw_state() != before;
        });
        if changed {
            self.update_history();
        }
    }

    // ---- highlighted-tile editing ---------------------------------------

    /// The tile currently under the pointer on the active layer
    pub fn highlighted_tile(&self) -> Option<&Tile> {
        self.layers
            .get(self.active_layer)?
            .highlighted_tile()
    }

    /// Add to the highlighted tile's pixel offset
    pub fn nudge_highlighted_tile(&mut self, dx: f32, dy: f32) {
        self.patch_highlighted_tile(|state| {
            TilePatch::new().offset(state.offset.x + dx, state.offset.y + dy)
        });
    }

    /// Add to the highlighted tile's rotation, in degrees
    pub fn rotate_highlighted_tile(&mut self, delta: f32) {
        self.patch_highlighted_tile(|state| {
            TilePatch::new().rotation(state.rotation_degrees + delta)
        });
    }

    /// Add to the highlighted tile's scale multiplier
    pub fn scale_highlighted_tile(&mut self, delta: f32) {
        self.patch_highlighted_tile(|state| TilePatch::new().scale(state.scale + delta));
    }

    /// Reset the highlighted tile's offset, rotation and scale, keeping
    /// its texture, tint and alpha
    pub fn reset_highlighted_tile_position(&mut self) {
        self.patch_highlighted_tile(|_| TilePatch::new().offset(0.0, 0.0).rotation(0.0).scale(1.0));
    }

    /// Clear the highlighted tile entirely
    pub fn clear_highlighted_tile(&mut self) {
        let Some(layer) = self.layers.get_mut(self.active_layer) else {
            return;
        };
        let changed = match layer.highlighted_tile_mut() {
            Some(tile) if !tile.is_empty() => {
                tile.clear();
                true
            }
            _ => false,
        };
        if changed {
            self.update_history();
        }
    }

    /// Apply a patch derived from the highlighted tile's current state;
    /// no-op when nothing is highlighted or the cell is unpainted
    fn patch_highlighted_tile(&mut self, build: impl FnOnce(&TileState) -> TilePatch) {
        let Some(layer) = self.layers.get_mut(self.active_layer) else {
            return;
        };
        let Some(tile) = layer.highlighted_tile_mut() else {
            return;
        };
        let Some(state) = tile.state() else {
            return;
        };
        let patch = build(state);
        let before = tile.raw_state().clone();
        tile.set_state(&patch);
        if *tile.raw_state() != before {
            self.update_history();
        }
    }

    // ---- collision and events -------------------------------------------

    pub fn collision(&self) -> &[Vec<CollisionTile>] {
        &self.collision
    }

    pub fn collision_at(&self, x: u32, y: u32) -> Option<&CollisionTile> {
        self.collision.get(x as usize)?.get(y as usize)
    }

    /// Flip one collision edge of the cell under the pointer
    pub fn toggle_collision_on_highlighted_tile(&mut self, edge: CollisionEdge) {
        let Some(layer) = self.layers.get(self.active_layer) else {
            return;
        };
        let Some((x, y)) = layer.highlighted_coords() else {
            return;
        };
        self.collision[x as usize][y as usize].toggle(edge);
        self.update_history();
    }

    pub fn events(&self) -> &[Vec<EventTile>] {
        &self.events
    }

    /// Event id at a cell, if the coordinate is on the grid
    pub fn event(&self, x: u32, y: u32) -> Option<&str> {
        self.events
            .get(x as usize)?
            .get(y as usize)
            .map(|event| event.id.as_str())
    }

    /// Assign an event id to a cell; out-of-grid coordinates are ignored
    ///
    /// Commits a history entry, but only when the id actually changes.
    pub fn set_event(&mut self, x: u32, y: u32, id: impl Into<String>) {
        let id = id.into();
        let Some(cell) = self
            .events
            .get_mut(x as usize)
            .and_then(|column| column.get_mut(y as usize))
        else {
            return;
        };
        if cell.id == id {
            return;
        }
        cell.id = id;
        self.update_history();
    }

    // ---- viewport --------------------------------------------------------

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    /// Move the viewport, clamped to the pan bounds
    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.viewport.pan(dx, dy);
    }

    /// Recenter the viewport on the grid
    pub fn reset_pan(&mut self) {
        self.viewport.reset();
    }

    /// Turn the drag-to-pan tool on or off
    pub fn enable_panning(&mut self, enabled: bool) {
        self.panning.set_enabled(enabled);
    }

    /// Pointer pressed anywhere on the canvas (pan tool)
    pub fn pan_pointer_down(&mut self) {
        self.panning.pointer_down();
    }

    /// Pointer released or cancelled (pan tool)
    pub fn pan_pointer_up(&mut self) {
        self.panning.pointer_up();
    }

    /// Raw pointer movement while the pan tool may be dragging
    pub fn pan_pointer_move(&mut self, dx: f32, dy: f32) {
        let speed = self.viewport.config().pan_speed;
        if let Some((px, py)) = self.panning.pan_delta(dx, dy, speed) {
            self.viewport.pan(px, py);
        }
    }

    // ---- tileset and visuals --------------------------------------------

    pub fn tileset(&self) -> Option<&Tileset> {
        self.tileset.as_ref()
    }

    /// Swap the tileset and re-resolve every tile's texture against it
    ///
    /// Tile states are untouched; ids the new atlas does not know simply
    /// render as placeholders until repainted.
    pub fn change_tileset(&mut self, tileset: Tileset) {
        self.tileset = Some(tileset);
        self.refresh();
    }

    /// Draw parameters for one cell of one layer
    pub fn tile_visual(&self, layer: usize, x: u32, y: u32) -> Option<TileVisual> {
        let tile = self.layers.get(layer)?.tile(x, y)?;
        Some(tile_visual(tile.raw_state(), self.tileset.as_ref()))
    }

    // ---- history ---------------------------------------------------------

    /// Record the current state as an undo snapshot
    ///
    /// Every mutating operation that actually changes grid content calls
    /// this; it is public so a host driving bulk edits through the layers
    /// directly can still commit them.
    pub fn update_history(&mut self) {
        if !self.history.is_enabled() {
            return;
        }
        let snapshot = self.save();
        self.history.push(snapshot);
    }

    /// Step back to the previous snapshot; no-op at the baseline or when
    /// history is disabled
    pub fn undo(&mut self) {
        if let Some(snapshot) = self.history.undo() {
            self.apply_snapshot(&snapshot);
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn history_depth(&self) -> usize {
        self.history.depth()
    }

    // ---- save / load -----------------------------------------------------

    /// Deep-copy the complete map state
    pub fn save(&self) -> MapSnapshot {
        MapSnapshot {
            tiles: self.layers.iter().map(MapLayer::tile_states).collect(),
            collision: self.collision.clone(),
            events: self.events.clone(),
            player_layer: self.player_layer,
        }
    }

    /// Serialize the complete map state to JSON
    pub fn save_json(&self) -> Result<String, MapError> {
        self.save()
            .to_json_pretty()
            .map_err(|e| MapError::Snapshot(e.to_string()))
    }

    /// Rebuild the map from a snapshot
    ///
    /// With `hard` the grid is resized to the snapshot's shape, the pan
    /// recentered and the history reset to a single baseline; without it
    /// the snapshot's dimensions must match the map's and history is left
    /// alone. Validation runs up front: on any error the map is unchanged.
    pub fn load(&mut self, snapshot: &MapSnapshot, hard: bool) -> Result<(), MapError> {
        let mut snapshot = snapshot.clone();
        snapshot.normalize();
        snapshot
            .validate()
            .map_err(|e| MapError::Snapshot(e.to_string()))?;

        if hard {
            self.config.width = snapshot.width();
            self.config.height = snapshot.height();
            self.viewport.set_grid_size(
                (self.config.width * self.config.cell_size) as f32,
                (self.config.height * self.config.cell_size) as f32,
            );
            self.apply_snapshot(&snapshot);
            self.reset_pan();
            let baseline = self.save();
            self.history.reset(baseline);
        } else {
            if snapshot.width() != self.config.width || snapshot.height() != self.config.height {
                return Err(MapError::SnapshotShapeMismatch(format!(
                    "snapshot is {}x{}, map is {}x{}",
                    snapshot.width(),
                    snapshot.height(),
                    self.config.width,
                    self.config.height
                )));
            }
            self.apply_snapshot(&snapshot);
        }
        Ok(())
    }

    /// Parse a JSON export and load it; the map is untouched on any error
    pub fn load_json(&mut self, json: &str, hard: bool) -> Result<(), MapError> {
        let snapshot = MapSnapshot::from_json(json).map_err(|e| MapError::Snapshot(e.to_string()))?;
        self.load(&snapshot, hard)
    }

    /// Force every tile to re-resolve against the current tileset by
    /// round-tripping the state through a snapshot
    pub fn refresh(&mut self) {
        let snapshot = self.save();
        self.apply_snapshot(&snapshot);
    }

    /// Discard everything and start a blank map with the given dimensions
    pub fn reset(&mut self, width: u32, height: u32) {
        self.config.width = width.max(1);
        self.config.height = height.max(1);
        self.layers = vec![MapLayer::new(self.config.width, self.config.height)];
        self.collision = blank_grid(self.config.width, self.config.height);
        self.events = blank_grid(self.config.width, self.config.height);
        self.active_layer = 0;
        self.player_layer = 0;
        self.viewport.set_grid_size(
            (self.config.width * self.config.cell_size) as f32,
            (self.config.height * self.config.cell_size) as f32,
        );
        self.reset_pan();
        let baseline = self.save();
        self.history.reset(baseline);
    }

    /// Replace layers and grids from a known-good, shape-matching snapshot
    fn apply_snapshot(&mut self, snapshot: &MapSnapshot) {
        let (width, height) = (self.config.width, self.config.height);
        self.layers = snapshot
            .tiles
            .iter()
            .map(|grid| {
                let mut layer = MapLayer::new(width, height);
                layer.set_tile_states(grid);
                layer
            })
            .collect();
        if self.layers.is_empty() {
            self.layers.push(MapLayer::new(width, height));
        }
        self.collision = snapshot.collision.clone();
        self.events = snapshot.events.clone();
        self.player_layer = snapshot.player_layer.min(self.layers.len() - 1);
        self.active_layer = self.active_layer.min(self.layers.len() - 1);
    }
}

fn blank_grid<T: Default + Clone>(width: u32, height: u32) -> Vec<Vec<T>> {
    vec![vec![T::default(); height as usize]; width as usize]
}
