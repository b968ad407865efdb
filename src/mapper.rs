//! Conversion between grid cells and window pixels.

use crate::grid::{Coord, Size};

/// A `side × side` pixel square with its top-left corner at `(x, y)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Square {
    pub x: u32,
    pub y: u32,
    pub side: u32,
}

/// Largest whole number of pixels per cell that fits the grid in the window
/// along both axes. Zero when the window is smaller than the grid.
pub fn compute_scale(grid: Size, window: Size) -> u32 {
    (window.width / grid.width).min(window.height / grid.height)
}

/// Top-left pixel of a cell.
pub fn cell_origin(cell_x: u32, cell_y: u32, scale: u32) -> (u32, u32) {
    (cell_x * scale, cell_y * scale)
}

/// The cell under a pixel, before any bounds check against the grid.
///
/// Returns `None` when nothing is drawn (`scale == 0`).
pub fn cell_from_pixel(px: u32, py: u32, scale: u32) -> Option<Coord> {
    if scale == 0 {
        return None;
    }
    let x = i32::try_from(px / scale).ok()?;
    let y = i32::try_from(py / scale).ok()?;
    Some(Coord::new(x, y))
}

/// Background and foreground squares for a cell.
///
/// The foreground is shrunk by `margin` on every side so that the background
/// shows through as a grid line. When the cell is too small to spare the
/// margin both squares are the same.
pub fn cell_squares(cell_x: u32, cell_y: u32, scale: u32, margin: u32) -> (Square, Square) {
    let (x, y) = cell_origin(cell_x, cell_y, scale);
    let outer = Square { x, y, side: scale };
    let inner = if scale > 2 * margin {
        Square {
            x: x + margin,
            y: y + margin,
            side: scale - 2 * margin,
        }
    } else {
        outer
    };
    (outer, inner)
}

/// Last known window size and the scale derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    window: Size,
    scale: u32,
}

impl Viewport {
    pub fn new(grid: Size, window: Size) -> Self {
        Viewport {
            window,
            scale: compute_scale(grid, window),
        }
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    pub fn window(&self) -> Size {
        self.window
    }

    /// Recomputes the scale if the window changed. Returns whether it did.
    pub fn resize(&mut self, grid: Size, window: Size) -> bool {
        if window == self.window {
            return false;
        }
        self.window = window;
        self.scale = compute_scale(grid, window);
        true
    }

    /// Maps a click to a cell. The caller still has to check the grid bounds,
    /// since clicks in the letterbox beyond the grid map past its edge.
    pub fn cell_at(&self, px: u32, py: u32) -> Option<Coord> {
        cell_from_pixel(px, py, self.scale)
    }
}
