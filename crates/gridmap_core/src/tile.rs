//! Tile state records and the per-cell tile owner

use serde::{Deserialize, Serialize};

/// White, i.e. no tint applied
pub(crate) const TINT_WHITE: u32 = 0xFFFFFF;

fn default_scale() -> f32 {
    1.0
}

fn default_alpha() -> f32 {
    1.0
}

fn default_tint() -> u32 {
    TINT_WHITE
}

/// Pixel nudge applied to a tile relative to its cell
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TileOffset {
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
}

impl TileOffset {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// The visual attributes of one grid cell
///
/// An empty `texture_id` is the canonical "no tile painted here"
/// representation; every other field keeps its value regardless, so a
/// cleared-then-repainted cell does not inherit stale settings.
///
/// Older saves may lack `scale`, `tint` or `alpha`; absent fields take the
/// documented defaults (1.0, white, 1.0) rather than being an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileState {
    /// Texture id resolved against the current tileset; empty = no tile
    #[serde(default)]
    pub texture_id: String,
    /// Rotation in degrees, clockwise
    #[serde(default)]
    pub rotation_degrees: f32,
    /// Pixel nudge relative to the cell
    #[serde(default)]
    pub offset: TileOffset,
    /// Size multiplier relative to the cell size
    #[serde(default = "default_scale")]
    pub scale: f32,
    /// RGB-packed tint color, `0xFFFFFF` = untinted
    #[serde(default = "default_tint")]
    pub tint: u32,
    /// Opacity in `[0, 1]`
    #[serde(default = "default_alpha")]
    pub alpha: f32,
}

impl Default for TileState {
    fn default() -> Self {
        Self {
            texture_id: String::new(),
            rotation_degrees: 0.0,
            offset: TileOffset::default(),
            scale: 1.0,
            tint: TINT_WHITE,
            alpha: 1.0,
        }
    }
}

impl TileState {
    /// Create a state painting the given texture, all other fields default
    pub fn with_texture(texture_id: impl Into<String>) -> Self {
        Self {
            texture_id: texture_id.into(),
            ..Self::default()
        }
    }

    /// Check if this is the "no tile painted" state
    pub fn is_empty(&self) -> bool {
        self.texture_id.is_empty()
    }

    /// Build a new state from this one with the patch's fields applied
    ///
    /// Never mutates in place: history snapshots hold clones of previous
    /// states and must stay trustworthy.
    pub fn patched(&self, patch: &TilePatch) -> TileState {
        TileState {
            texture_id: patch
                .texture_id
                .clone()
                .unwrap_or_else(|| self.texture_id.clone()),
            rotation_degrees: patch.rotation_degrees.unwrap_or(self.rotation_degrees),
            offset: patch.offset.unwrap_or(self.offset),
            scale: patch.scale.unwrap_or(self.scale),
            tint: patch.tint.unwrap_or(self.tint),
            alpha: patch.alpha.unwrap_or(self.alpha),
        }
    }
}

/// A partial update against a `TileState`
///
/// Unset fields keep their current value when applied.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TilePatch {
    pub texture_id: Option<String>,
    pub rotation_degrees: Option<f32>,
    pub offset: Option<TileOffset>,
    pub scale: Option<f32>,
    pub tint: Option<u32>,
    pub alpha: Option<f32>,
}

impl TilePatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the texture id
    pub fn texture(mut self, texture_id: impl Into<String>) -> Self {
        self.texture_id = Some(texture_id.into());
        self
    }

    /// Set the rotation in degrees
    pub fn rotation(mut self, degrees: f32) -> Self {
        self.rotation_degrees = Some(degrees);
        self
    }

    /// Set the pixel offset
    pub fn offset(mut self, x: f32, y: f32) -> Self {
        self.offset = Some(TileOffset::new(x, y));
        self
    }

    /// Set the scale multiplier
    pub fn scale(mut self, scale: f32) -> Self {
        self.scale = Some(scale);
        self
    }

    /// Set the RGB-packed tint
    pub fn tint(mut self, tint: u32) -> Self {
        self.tint = Some(tint);
        self
    }

    /// Set the opacity
    pub fn alpha(mut self, alpha: f32) -> Self {
        self.alpha = Some(alpha);
        self
    }
}

impl From<TileState> for TilePatch {
    /// A patch that overwrites every field with the given state
    fn from(state: TileState) -> Self {
        Self {
            texture_id: Some(state.texture_id),
            rotation_degrees: Some(state.rotation_degrees),
            offset: Some(state.offset),
            scale: Some(state.scale),
            tint: Some(state.tint),
            alpha: Some(state.alpha),
        }
    }
}

/// One grid cell: a state plus the coordinate it was created at
///
/// Tiles are created when their owning layer is constructed and live as
/// long as it does; the coordinate never changes.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    state: TileState,
    x: u32,
    y: u32,
}

impl Tile {
    /// Create an empty tile at the given grid coordinate
    pub fn new(x: u32, y: u32) -> Self {
        Self {
            state: TileState::default(),
            x,
            y,
        }
    }

    /// Get the grid coordinate (a copy, never the live value)
    pub fn coords(&self) -> (u32, u32) {
        (self.x, self.y)
    }

    /// Merge a partial update into the current state
    pub fn set_state(&mut self, patch: &TilePatch) {
        self.state = self.state.patched(patch);
    }

    /// Get the state, or `None` when nothing is painted here
    ///
    /// Emptiness is deliberately distinguishable from "has a
    /// default-looking but real state".
    pub fn state(&self) -> Option<&TileState> {
        if self.state.is_empty() {
            None
        } else {
            Some(&self.state)
        }
    }

    /// Get the underlying state record even when empty
    ///
    /// The requested alpha and the other fields survive clearing the
    /// texture, which the rendering layer needs to honour.
    pub fn raw_state(&self) -> &TileState {
        &self.state
    }

    /// Check if nothing is painted here
    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    /// Reset the state to the canonical empty default
    pub fn clear(&mut self) {
        self.state = TileState::default();
    }
}
