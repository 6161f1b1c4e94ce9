//! A single layer: a fixed-shape grid of tiles plus highlight tracking

use gridmap_core::{Tile, TilePatch, TileState};

/// One full-grid plane of paintable tiles
///
/// The grid shape is fixed at construction and immutable for the layer's
/// lifetime; resizing a map means rebuilding its layers. Storage is
/// column-major so iteration runs x-outer/y-inner, which the save format
/// (`[x][y]` grids) and every order-sensitive consumer rely on.
///
/// The layer also tracks at most one "highlighted" cell, the one under the
/// pointer. The highlight is a coordinate back-reference into the grid,
/// never an owning handle.
#[derive(Debug, Clone)]
pub struct MapLayer {
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
    highlighted: Option<(u32, u32)>,
}

impl MapLayer {
    /// Create a layer of empty tiles
    pub fn new(width: u32, height: u32) -> Self {
        let mut tiles = Vec::with_capacity((width * height) as usize);
        for x in 0..width {
            for y in 0..height {
                tiles.push(Tile::new(x, y));
            }
        }
        Self {
            width,
            height,
            tiles,
            highlighted: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Check a coordinate against the grid shape
    pub fn in_bounds(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (x * self.height + y) as usize
    }

    /// Get the tile at a coordinate
    pub fn tile(&self, x: u32, y: u32) -> Option<&Tile> {
        if self.in_bounds(x, y) {
            self.tiles.get(self.index(x, y))
        } else {
            None
        }
    }

    /// Get the tile at a coordinate, mutably
    pub fn tile_mut(&mut self, x: u32, y: u32) -> Option<&mut Tile> {
        if self.in_bounds(x, y) {
            let index = self.index(x, y);
            self.tiles.get_mut(index)
        } else {
            None
        }
    }

    /// Visit every tile, x-outer / y-inner
    pub fn for_each_tile(&self, mut callback: impl FnMut(&Tile)) {
        for tile in &self.tiles {
            callback(tile);
        }
    }

    /// Visit every tile mutably, x-outer / y-inner
    pub fn for_each_tile_mut(&mut self, mut callback: impl FnMut(&mut Tile)) {
        for tile in &mut self.tiles {
            callback(tile);
        }
    }

    /// Clear every tile on this layer
    pub fn clear(&mut self) {
        for tile in &mut self.tiles {
            tile.clear();
        }
    }

    /// Check if every tile on this layer is empty
    pub fn is_empty(&self) -> bool {
        self.tiles.iter().all(|tile| tile.is_empty())
    }

    /// Deep-copy all tile states as an `[x][y]` grid, `None` where empty
    pub fn tile_states(&self) -> Vec<Vec<Option<TileState>>> {
        (0..self.width)
            .map(|x| {
                (0..self.height)
                    .map(|y| self.tiles[self.index(x, y)].state().cloned())
                    .collect()
            })
            .collect()
    }

    /// Apply an `[x][y]` grid of states onto this layer
    ///
    /// Cells that are `None` in the grid are left as they are; this is
    /// meant for freshly constructed layers during load, where every tile
    /// starts empty anyway. Out-of-shape input is simply truncated to the
    /// layer's own bounds.
    pub fn set_tile_states(&mut self, states: &[Vec<Option<TileState>>]) {
        for (x, column) in states.iter().enumerate().take(self.width as usize) {
            for (y, cell) in column.iter().enumerate().take(self.height as usize) {
                if let Some(state) = cell {
                    let index = self.index(x as u32, y as u32);
                    self.tiles[index].set_state(&TilePatch::from(state.clone()));
                }
            }
        }
    }

    /// Mark the cell under the pointer
    pub fn set_highlight(&mut self, x: u32, y: u32) {
        if self.in_bounds(x, y) {
            self.highlighted = Some((x, y));
        }
    }

    /// Clear the highlight, but only if it is on the given cell
    ///
    /// Pointer-leave events arrive per cell; leaving cell A after cell B
    /// was already entered must not clear B's highlight.
    pub fn clear_highlight_at(&mut self, x: u32, y: u32) {
        if self.highlighted == Some((x, y)) {
            self.highlighted = None;
        }
    }

    /// Clear the highlight unconditionally
    pub fn clear_highlight(&mut self) {
        self.highlighted = None;
    }

    /// Coordinate of the highlighted cell, if any
    pub fn highlighted_coords(&self) -> Option<(u32, u32)> {
        self.highlighted
    }

    /// The highlighted tile, if any
    pub fn highlighted_tile(&self) -> Option<&Tile> {
        self.highlighted.and_then(|(x, y)| self.tile(x, y))
    }

    /// The highlighted tile mutably, if any
    pub fn highlighted_tile_mut(&mut self) -> Option<&mut Tile> {
        match self.highlighted {
            Some((x, y)) => self.tile_mut(x, y),
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridmap_core::TilePatch;

    #[test]
    fn test_new_layer_is_empty() {
        let layer = MapLayer::new(4, 3);
        assert!(layer.is_empty());
        assert_eq!(layer.tile(3, 2).unwrap().coords(), (3, 2));
        assert!(layer.tile(4, 0).is_none());
        assert!(layer.tile(0, 3).is_none());
    }

    #[test]
    fn test_iteration_order_is_column_major() {
        let layer = MapLayer::new(2, 2);
        let mut visited = Vec::new();
        layer.for_each_tile(|tile| visited.push(tile.coords()));
        assert_eq!(visited, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
    }

    #[test]
    fn test_tile_states_roundtrip() {
        let mut layer = MapLayer::new(3, 3);
        layer
            .tile_mut(1, 2)
            .unwrap()
            .set_state(&TilePatch::new().texture("wall").rotation(90.0));

        let states = layer.tile_states();
        assert!(states[0][0].is_none());
        assert_eq!(states[1][2].as_ref().unwrap().texture_id, "wall");

        let mut restored = MapLayer::new(3, 3);
        restored.set_tile_states(&states);
        assert_eq!(restored.tile_states(), states);
    }

    #[test]
    fn test_clear_empties_every_tile() {
        let mut layer = MapLayer::new(2, 2);
        layer
            .tile_mut(0, 0)
            .unwrap()
            .set_state(&TilePatch::new().texture("wall"));
        layer
            .tile_mut(1, 1)
            .unwrap()
            .set_state(&TilePatch::new().texture("floor"));

        layer.clear();
        assert!(layer.is_empty());
    }

    #[test]
    fn test_highlight_tracking() {
        let mut layer = MapLayer::new(3, 3);
        assert!(layer.highlighted_tile().is_none());

        layer.set_highlight(1, 1);
        assert_eq!(layer.highlighted_coords(), Some((1, 1)));

        // Leaving a different cell does not clear it
        layer.clear_highlight_at(0, 0);
        assert_eq!(layer.highlighted_coords(), Some((1, 1)));

        layer.clear_highlight_at(1, 1);
        assert!(layer.highlighted_coords().is_none());
    }

    #[test]
    fn test_highlight_ignores_out_of_bounds() {
        let mut layer = MapLayer::new(2, 2);
        layer.set_highlight(5, 5);
        assert!(layer.highlighted_coords().is_none());
    }
}
