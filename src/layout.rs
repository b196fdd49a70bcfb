//! Layout Engine - deterministic grid placement for both sides.
//!
//! A position is a pure function of (side, ID, population size, canvas
//! geometry). Positions are recomputed wholesale on every snapshot and never
//! patched incrementally.

use crate::registry::Side;

/// A 2D point in canvas coordinates (origin top-left, y grows downward).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };
}

/// Canvas geometry the positions are derived from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Canvas {
    pub width: f32,
    pub height: f32,
}

/// Default marker diameter in canvas units.
pub const MARKER_DIAMETER: f32 = 40.0;

/// Grid placement for one side of the population.
///
/// Men are anchored near the top edge and women near the bottom, so a
/// vertical line meaningfully represents a pairing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Layout {
    canvas: Canvas,
    diameter: f32,
}

impl Layout {
    pub fn new(canvas: Canvas) -> Self {
        Self::with_diameter(canvas, MARKER_DIAMETER)
    }

    pub fn with_diameter(canvas: Canvas, diameter: f32) -> Self {
        Self { canvas, diameter }
    }

    #[inline]
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Horizontal gap between markers, derived from the population size.
    /// Goes negative once markers no longer fit side by side; the grid
    /// degrades by overlapping instead of faulting.
    #[inline]
    fn margin(&self, count: usize) -> f32 {
        (self.canvas.width / count as f32).floor() - self.diameter
    }

    /// Markers per row for a side of `count` participants.
    ///
    /// `capacity = floor(width / (margin + diameter))`, with the spacing
    /// clamped so a crowded canvas never divides by zero.
    pub fn capacity(&self, count: usize) -> usize {
        let spacing = (self.margin(count) + self.diameter).max(1.0);
        ((self.canvas.width / spacing).floor() as usize).max(1)
    }

    /// Position of the participant with `id` on `side`, out of `count`
    /// participants on that side. `count == 0` short-circuits to `None`.
    pub fn position(&self, side: Side, id: u32, count: usize) -> Option<Point> {
        if count == 0 {
            return None;
        }

        let capacity = self.capacity(count) as u32;
        let row = (id / capacity) as f32;
        let column = id % capacity;

        let x = column as f32 * self.margin(count) + (column + 1) as f32 * self.diameter;
        let y = match side {
            Side::Man => self.diameter + row * self.diameter,
            Side::Woman => (self.canvas.height - self.diameter) - row * self.diameter,
        };

        Some(Point { x, y })
    }
}
