//! Derives what the canvas should draw for a tile

use crate::Tileset;
use gridmap_core::{TextureRegion, TileOffset, TileState};
use log::warn;

/// Draw parameters for one tile, ready for the canvas
///
/// `region` is `None` for the untextured placeholder (nothing painted, no
/// tileset loaded, or an id the current tileset does not know).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileVisual {
    pub region: Option<TextureRegion>,
    pub alpha: f32,
    pub rotation_degrees: f32,
    pub tint: u32,
    pub scale: f32,
    pub offset: TileOffset,
}

/// Resolve a tile state against a tileset into draw parameters
///
/// Empty states come back fully transparent while the state's own
/// requested alpha stays untouched in the record. An id missing from the
/// tileset degrades to the placeholder instead of failing: stale ids are
/// an expected consequence of swapping tilesets, and the map must stay
/// drawable through them.
pub fn tile_visual(state: &TileState, tileset: Option<&Tileset>) -> TileVisual {
    let mut visual = TileVisual {
        region: None,
        alpha: state.alpha,
        rotation_degrees: state.rotation_degrees,
        tint: state.tint,
        scale: state.scale,
        offset: state.offset,
    };

    if state.is_empty() {
        visual.alpha = 0.0;
        return visual;
    }

    if let Some(tileset) = tileset {
        match tileset.resolve(&state.texture_id) {
            Ok(region) => visual.region = Some(*region),
            Err(_) => {
                warn!(
                    "texture id '{}' missing from tileset '{}', drawing placeholder",
                    state.texture_id,
                    tileset.name()
                );
            }
        }
    }

    visual
}
