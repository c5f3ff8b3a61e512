//! Pointer event types
//!
//! A pointer is any device that can press, move and release: the mouse, a
//! finger on a touch screen, a pen. Each active pointer has a stable id for
//! the lifetime of its contact.

use crate::geometry::Point;

/// Identifier of one pointer (the mouse is always [`PointerId::MOUSE`])
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointerId(pub u64);

impl PointerId {
    pub const MOUSE: PointerId = PointerId(0);

    /// Touch contacts are offset past the mouse id
    pub fn touch(finger: u64) -> Self {
        PointerId(finger.saturating_add(1))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    Down,
    Move,
    Up,
    /// The platform interrupted the gesture
    Cancel,
    /// Delivered to the element that held capture once capture ends
    LostCapture,
}

impl PointerEventKind {
    /// Whether this kind ends a press (and so implicitly releases capture)
    pub fn ends_press(self) -> bool {
        matches!(self, PointerEventKind::Up | PointerEventKind::Cancel)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub pointer_id: PointerId,
    pub kind: PointerEventKind,
    /// Position in client (viewport) coordinates
    pub client: Point,
}

impl PointerEvent {
    pub fn new(pointer_id: PointerId, kind: PointerEventKind, x: f64, y: f64) -> Self {
        Self {
            pointer_id,
            kind,
            client: Point::new(x, y),
        }
    }

    pub fn down(pointer_id: PointerId, x: f64, y: f64) -> Self {
        Self::new(pointer_id, PointerEventKind::Down, x, y)
    }

    pub fn moved(pointer_id: PointerId, x: f64, y: f64) -> Self {
        Self::new(pointer_id, PointerEventKind::Move, x, y)
    }

    pub fn up(pointer_id: PointerId, x: f64, y: f64) -> Self {
        Self::new(pointer_id, PointerEventKind::Up, x, y)
    }

    pub fn cancel(pointer_id: PointerId, x: f64, y: f64) -> Self {
        Self::new(pointer_id, PointerEventKind::Cancel, x, y)
    }
}
