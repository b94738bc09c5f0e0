//! Incremental stroke bounds tracking.

use kurbo::{Point, Rect, Vec2};

/// The tightest axis-aligned frame enclosing every point of a stroke so far,
/// padded by the stroke radius on all sides.
///
/// The frame only ever grows. Growth toward negative x or y moves the frame
/// origin, which invalidates local coordinates recorded against the old
/// origin; [`StrokeBounds::add`] returns the translation that restores them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeBounds {
    frame: Rect,
    radius: f64,
}

impl StrokeBounds {
    /// Bounds for a stroke consisting of a single point: a zero-size content
    /// rect centered on `origin`, padded by `radius` on all sides.
    pub fn new(origin: Point, radius: f64) -> Self {
        debug_assert!(radius >= 0.0, "stroke radius must be non-negative");
        let radius = radius.max(0.0);
        Self {
            frame: footprint(origin, radius),
            radius,
        }
    }

    /// The padded frame in surface coordinates.
    pub fn frame(&self) -> Rect {
        self.frame
    }

    /// Top-left corner of the frame.
    pub fn origin(&self) -> Point {
        self.frame.origin()
    }

    /// Half the rendered line width.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Grow the frame so it also contains `point`'s radius-padded footprint.
    ///
    /// Returns the translation to apply to local coordinates recorded before
    /// this call; both components are non-negative. The zero vector means the
    /// origin did not move and the existing path is still valid. Re-adding a
    /// point already inside the frame grows nothing.
    pub fn add(&mut self, point: Point) -> Vec2 {
        let old = self.frame.origin();
        self.frame = self.frame.union(footprint(point, self.radius));
        old - self.frame.origin()
    }

    /// Express a surface-space point relative to the current frame origin.
    pub fn to_local(&self, point: Point) -> Point {
        (point - self.frame.origin()).to_point()
    }
}

/// The radius-padded rect a single point occupies.
fn footprint(center: Point, radius: f64) -> Rect {
    Rect::new(
        center.x - radius,
        center.y - radius,
        center.x + radius,
        center.y + radius,
    )
}
