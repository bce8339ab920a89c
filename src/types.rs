// Core types shared by the front window, the overlay and the cube view.

use glam::{DVec2, Vec2};

/// What a window actually shows this frame.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameBuffer {
    pub width: usize,      // pixels across
    pub height: usize,     // pixels down
    pub pixels: Vec<u32>,  // each entry is 0x00RRGGBB for minifb
}

/// A window's rectangle in desktop coordinates. Read fresh from the OS every
/// frame; never cached, since the owner may be mid-drag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WindowRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl WindowRect {
    pub fn from_origin_size(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { left: x, top: y, right: x + width, bottom: y + height }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(
            self.left as f32 + self.width() as f32 / 2.0,
            self.top as f32 + self.height() as f32 / 2.0,
        )
    }

    /// Inclusive of the left/top edge, exclusive of right/bottom.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }
}

/// Opaque OS identity of a top-level window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WindowId(pub isize);

/// One straight line primitive, `P(t) = a + t * (b - a)` for t in [0,1].
/// Kept in f64 so split points land within 1e-6 of the exact edge; drawing
/// narrows to f32.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub a: DVec2,
    pub b: DVec2,
}

impl Segment {
    #[cfg(test)]
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { a: DVec2::new(x0, y0), b: DVec2::new(x1, y1) }
    }

    /// Single-precision corners in, double-precision segment out.
    pub fn between(a: Vec2, b: Vec2) -> Self {
        Self { a: a.as_dvec2(), b: b.as_dvec2() }
    }

    pub fn point_at(&self, t: f64) -> DVec2 {
        self.a + (self.b - self.a) * t
    }

    /// The piece of this segment between parameters `t0` and `t1`.
    pub fn sub(&self, t0: f64, t1: f64) -> Segment {
        Segment { a: self.point_at(t0), b: self.point_at(t1) }
    }
}

/// Parametric interval of a segment lying inside a rectangle.
/// When `intersects`, `0 <= t_enter <= t_exit <= 1`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClipResult {
    pub t_enter: f64,
    pub t_exit: f64,
    pub intersects: bool,
}

impl ClipResult {
    pub const OUTSIDE: ClipResult = ClipResult { t_enter: 0.0, t_exit: 0.0, intersects: false };
}

/// Drag tracking for the front window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DragState {
    pub active: bool,
    /// Pointer minus window origin, captured at pointer-down.
    pub grab_offset: (i32, i32),
}
