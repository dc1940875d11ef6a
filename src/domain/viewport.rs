// Zoom/pan viewport state machine
use serde::Serialize;

pub const MIN_SCALE: f64 = 0.1;
pub const MAX_SCALE: f64 = 5.0;

/// Screen-space zoom and pan state for the interactive chart. Scale is clamped
/// to `[0.1, 5]`; offsets are unbounded.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    #[serde(skip)]
    dragging: bool,
    #[serde(skip)]
    last_pos: (f64, f64),
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
            dragging: false,
            last_pos: (0.0, 0.0),
        }
    }
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zooms by `delta` about the screen point `(center_x, center_y)`. The
    /// offsets are recomputed so that the data point currently under the
    /// center stays under the same screen position after the zoom.
    pub fn zoom(&mut self, delta: f64, center_x: f64, center_y: f64) {
        let new_scale = (self.scale + delta).clamp(MIN_SCALE, MAX_SCALE);
        let factor = new_scale / self.scale;
        self.offset_x = center_x - (center_x - self.offset_x) * factor;
        self.offset_y = center_y - (center_y - self.offset_y) * factor;
        self.scale = new_scale;
    }

    pub fn pan_start(&mut self, x: f64, y: f64) {
        self.dragging = true;
        self.last_pos = (x, y);
    }

    pub fn pan_move(&mut self, x: f64, y: f64) {
        if !self.dragging {
            return;
        }
        self.offset_x += x - self.last_pos.0;
        self.offset_y += y - self.last_pos.1;
        self.last_pos = (x, y);
    }

    pub fn pan_end(&mut self) {
        self.dragging = false;
    }

    /// Restores scale and offsets to defaults; an in-progress drag is
    /// unaffected.
    pub fn reset(&mut self) {
        self.scale = 1.0;
        self.offset_x = 0.0;
        self.offset_y = 0.0;
    }

    /// Maps a pixel coordinate through the viewport: scale about the origin,
    /// then translate. This composition is what makes `zoom`'s offset update
    /// hold the point under the zoom center fixed on screen.
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            x * self.scale + self.offset_x,
            y * self.scale + self.offset_y,
        )
    }
}
