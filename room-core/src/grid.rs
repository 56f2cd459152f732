use serde::{Deserialize, Serialize};

/// Bounding rectangle of the room canvas in client (viewport) pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CanvasRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl CanvasRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        CanvasRect {
            left,
            top,
            width,
            height,
        }
    }

    /// Convert client coordinates into canvas-relative coordinates.
    pub fn to_local(&self, client_x: f64, client_y: f64) -> (f64, f64) {
        (client_x - self.left, client_y - self.top)
    }

    /// Convert canvas-relative coordinates back into client coordinates.
    pub fn to_client(&self, x: f64, y: f64) -> (f64, f64) {
        (x + self.left, y + self.top)
    }
}

/// Number of grid columns (`x`) and rows (`y`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSize {
    pub x: u32,
    pub y: u32,
}

impl Default for GridSize {
    fn default() -> Self {
        GridSize { x: 12, y: 8 }
    }
}

impl GridSize {
    /// Cell dimensions for the given canvas. Recomputed on every call since
    /// the canvas can be resized at any time.
    pub fn cell(&self, rect: &CanvasRect) -> (f64, f64) {
        (
            rect.width / self.x.max(1) as f64,
            rect.height / self.y.max(1) as f64,
        )
    }
}

fn quantize(v: f64, cell: f64) -> f64 {
    if cell.is_finite() && cell > 0.0 {
        (v / cell).floor() * cell
    } else {
        v
    }
}

/// Snap a canvas-relative point to the top-left corner of its grid cell.
/// With `enabled == false` the point passes through unchanged.
pub fn snap(px: f64, py: f64, rect: &CanvasRect, grid: GridSize, enabled: bool) -> (f64, f64) {
    if !enabled {
        return (px, py);
    }
    let (cw, ch) = grid.cell(rect);
    (quantize(px, cw), quantize(py, ch))
}

/// Keep a position inside the canvas so a whole cell remains visible.
/// For canvases smaller than one cell the lower bound wins.
pub fn clamp_to_canvas(x: f64, y: f64, rect: &CanvasRect, grid: GridSize) -> (f64, f64) {
    let (cw, ch) = grid.cell(rect);
    (
        x.min(rect.width - cw).max(0.0),
        y.min(rect.height - ch).max(0.0),
    )
}
