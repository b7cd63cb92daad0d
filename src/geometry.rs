//! Container geometry and clamping.
//!
//! All overlay coordinates are pixels relative to the video container's
//! top-left corner. Pointer coordinates arrive in client (viewport) space and
//! are translated here.

use serde::{Deserialize, Serialize};

/// A point in pixels. Used both for client-space pointers and
/// container-relative overlay positions.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Overlay dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for Size {
    fn default() -> Self {
        Self::new(200.0, 60.0)
    }
}

/// Bounding rectangle of the video container in client space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Container anchored at the client origin.
    #[must_use]
    pub const fn sized(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    #[must_use]
    pub const fn top_left(&self) -> Point {
        Point::new(self.left, self.top)
    }

    /// Clamp a container-relative position so an overlay of `size` stays
    /// fully inside this container.
    ///
    /// When the overlay is larger than the container on an axis, the
    /// coordinate pins to 0 on that axis.
    #[must_use]
    pub fn clamp(&self, position: Point, size: Size) -> Point {
        Point::new(
            clamp_axis(position.x, self.width - size.width),
            clamp_axis(position.y, self.height - size.height),
        )
    }

    /// Translate a client-space pointer into the container-relative top-left
    /// of an overlay grabbed at `grab_offset`, then clamp it.
    #[must_use]
    pub fn place(&self, pointer: Point, grab_offset: Point, size: Size) -> Point {
        let raw = pointer - self.top_left() - grab_offset;
        self.clamp(raw, size)
    }

    /// Whether an overlay at `position` with `size` lies fully inside.
    #[must_use]
    pub fn contains(&self, position: Point, size: Size) -> bool {
        position.x >= 0.0
            && position.y >= 0.0
            && position.x + size.width <= self.width
            && position.y + size.height <= self.height
    }
}

// f64::clamp panics when max < min, which happens for oversized overlays.
fn clamp_axis(value: f64, max: f64) -> f64 {
    value.min(max).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn place_subtracts_container_origin_and_grab_offset() {
        let container = Rect::new(100.0, 40.0, 800.0, 500.0);
        let pos = container.place(
            Point::new(400.0, 300.0),
            Point::new(20.0, 10.0),
            Size::new(200.0, 60.0),
        );
        assert_eq!(pos, Point::new(280.0, 250.0));
    }

    #[test]
    fn clamp_pins_to_edges() {
        let container = Rect::sized(800.0, 500.0);
        let size = Size::new(200.0, 60.0);
        assert_eq!(
            container.clamp(Point::new(-50.0, -1.0), size),
            Point::new(0.0, 0.0)
        );
        assert_eq!(
            container.clamp(Point::new(10_000.0, 10_000.0), size),
            Point::new(600.0, 440.0)
        );
    }

    #[test]
    fn oversized_overlay_pins_to_zero() {
        let container = Rect::sized(100.0, 50.0);
        let pos = container.clamp(Point::new(30.0, 30.0), Size::new(200.0, 60.0));
        assert_eq!(pos, Point::new(0.0, 0.0));
    }

    #[test]
    fn placed_positions_always_fit() {
        let container = Rect::new(13.0, 7.0, 640.0, 360.0);
        let size = Size::new(120.0, 45.0);
        let offset = Point::new(30.0, 12.0);
        for px in (-400..1200).step_by(37) {
            for py in (-300..800).step_by(29) {
                let pos = container.place(Point::new(f64::from(px), f64::from(py)), offset, size);
                assert!(
                    container.contains(pos, size),
                    "pointer ({px}, {py}) produced {pos:?}"
                );
            }
        }
    }
}
