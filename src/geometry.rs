//! Geometry primitives for panel placement
//!
//! All coordinates are viewport pixels measured from the top-left corner.

use serde::{Deserialize, Serialize};

// ============================================================================
// Core Types
// ============================================================================

/// A point in viewport (client) coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Displacement from `origin` to `self`
    #[inline]
    pub fn delta_from(self, origin: Point) -> (f64, f64) {
        (self.x - origin.x, self.y - origin.y)
    }
}

/// Width and height in pixels
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle in viewport coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    pub fn contains(&self, pt: Point) -> bool {
        pt.x >= self.x && pt.x < self.x + self.width && pt.y >= self.y && pt.y < self.y + self.height
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Top-left position of a panel.
///
/// This is also the persisted record format: `{"left":124.0,"top":44.0}`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PanelPosition {
    pub left: f64,
    pub top: f64,
}

impl PanelPosition {
    pub fn new(left: f64, top: f64) -> Self {
        Self { left, top }
    }

    pub fn is_finite(&self) -> bool {
        self.left.is_finite() && self.top.is_finite()
    }

    /// Shift by a displacement
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.left + dx, self.top + dy)
    }

    /// Clamp so a panel of `panel` size stays inside `viewport`
    pub fn clamped(self, panel: Size, viewport: Size) -> Self {
        Self::new(
            clamp_axis(self.left, panel.width, viewport.width),
            clamp_axis(self.top, panel.height, viewport.height),
        )
    }
}

impl From<Point> for PanelPosition {
    fn from(pt: Point) -> Self {
        Self::new(pt.x, pt.y)
    }
}

// ============================================================================
// Clamping
// ============================================================================

/// Clamp one axis to `[0, viewport - extent]`.
///
/// When the panel is larger than the viewport the range collapses to `[0, 0]`.
/// A NaN proposal pins to the origin.
#[inline]
pub fn clamp_axis(value: f64, extent: f64, viewport: f64) -> f64 {
    let max = viewport - extent;
    let max = if max.is_nan() { 0.0 } else { max.max(0.0) };
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, max)
}
