//! Viewport pan/zoom state and the drag-to-pan controller

use serde::{Deserialize, Serialize};

/// Smallest allowed zoom factor
pub const MIN_ZOOM: f32 = 0.25;
/// Largest allowed zoom factor
pub const MAX_ZOOM: f32 = 4.0;

/// Viewport tuning; the pixel constants are cosmetic and host-adjustable
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportConfig {
    /// Canvas width in pixels
    pub screen_width: f32,
    /// Canvas height in pixels
    pub screen_height: f32,
    /// How far past the edge the grid may be dragged, in pixels
    #[serde(default = "default_pan_margin")]
    pub pan_margin: f32,
    /// Multiplier applied to raw pointer movement while dragging
    #[serde(default = "default_pan_speed")]
    pub pan_speed: f32,
}

fn default_pan_margin() -> f32 {
    5.0
}

fn default_pan_speed() -> f32 {
    2.0
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            screen_width: 1500.0,
            screen_height: 1000.0,
            pan_margin: default_pan_margin(),
            pan_speed: default_pan_speed(),
        }
    }
}

/// Where the grid sits on screen: a clamped pan offset plus a zoom factor
///
/// The offset is the screen position of the grid's center. Panning is
/// clamped so the grid can travel at most half its own pixel size, plus the
/// configured margin, past the viewport edge in any direction.
#[derive(Debug, Clone)]
pub struct Viewport {
    config: ViewportConfig,
    grid_width_px: f32,
    grid_height_px: f32,
    x: f32,
    y: f32,
    zoom: f32,
}

impl Viewport {
    /// Create a viewport centered on the grid
    pub fn new(config: ViewportConfig, grid_width_px: f32, grid_height_px: f32) -> Self {
        let mut viewport = Self {
            config,
            grid_width_px,
            grid_height_px,
            x: 0.0,
            y: 0.0,
            zoom: 1.0,
        };
        viewport.reset();
        viewport
    }

    pub fn config(&self) -> ViewportConfig {
        self.config
    }

    /// Current pan offset (the grid center's screen position)
    pub fn offset(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Set the zoom factor, clamped to `[MIN_ZOOM, MAX_ZOOM]`
    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Adjust the zoom factor by a delta, clamped
    pub fn zoom_by(&mut self, delta: f32) {
        self.set_zoom(self.zoom + delta);
    }

    /// Move the viewport and clamp it to the pan bounds
    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.x += dx;
        self.y += dy;
        self.clamp();
    }

    /// Recenter on the grid
    pub fn reset(&mut self) {
        self.x = self.config.screen_width / 2.0;
        self.y = self.config.screen_height / 2.0;
    }

    /// Tell the viewport the grid's pixel size changed (map resize)
    pub fn set_grid_size(&mut self, grid_width_px: f32, grid_height_px: f32) {
        self.grid_width_px = grid_width_px;
        self.grid_height_px = grid_height_px;
        self.clamp();
    }

    fn bound(grid_px: f32, margin: f32) -> f32 {
        grid_px / 2.0 + margin
    }

    fn clamp(&mut self) {
        // The grid center may sit at most `bound` past either edge. When
        // the grid is smaller than the screen the two limits swap sides,
        // so order them before clamping.
        let bound_x = Self::bound(self.grid_width_px, self.config.pan_margin);
        let bound_y = Self::bound(self.grid_height_px, self.config.pan_margin);
        let other_x = self.config.screen_width - bound_x;
        let other_y = self.config.screen_height - bound_y;
        self.x = self.x.clamp(other_x.min(bound_x), other_x.max(bound_x));
        self.y = self.y.clamp(other_y.min(bound_y), other_y.max(bound_y));
    }
}

/// The drag-to-pan state machine
///
/// Disabled by default: painting and panning share the pointer, and the UI
/// flips this on only while its pan tool is selected. A drag that starts
/// while disabled stays dead even if panning is enabled mid-drag.
#[derive(Debug, Clone)]
pub struct PanController {
    enabled: bool,
    panning: bool,
}

impl Default for PanController {
    fn default() -> Self {
        Self::new()
    }
}

impl PanController {
    pub fn new() -> Self {
        Self {
            enabled: false,
            panning: false,
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Pointer pressed: start a drag if the tool is enabled
    pub fn pointer_down(&mut self) {
        self.panning = self.enabled;
    }

    /// Pointer released or cancelled: end any drag
    pub fn pointer_up(&mut self) {
        self.panning = false;
    }

    /// Translate raw pointer movement into a pan delta, if dragging
    pub fn pan_delta(&mut self, dx: f32, dy: f32, speed: f32) -> Option<(f32, f32)> {
        if self.panning && self.enabled {
            Some((dx * speed, dy * speed))
        } else {
            self.panning = false;
            None
        }
    }
}
