//! Pointer input translation
//!
//! winit reports the mouse and touch contacts as unrelated event streams and
//! in physical pixels. This module folds them into the scene's pointer model:
//! - The left mouse button becomes [`PointerId::MOUSE`] down/move/up
//! - Each touch contact becomes its own pointer
//! - Losing window focus while anything is pressed cancels those pointers

use std::collections::HashMap;

use winit::event::{ElementState, MouseButton, TouchPhase, WindowEvent};

use panel_drag::geometry::Point;
use panel_drag::pointer::{PointerEvent, PointerId};

/// Tracks press state so winit events can be turned into pointer events
#[derive(Debug, Default)]
pub struct PointerTranslator {
    cursor: Option<Point>,
    mouse_down: bool,
    touches: HashMap<u64, Point>,
}

impl PointerTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last known mouse position in logical pixels
    pub fn cursor_position(&self) -> Option<Point> {
        self.cursor
    }

    /// Map one window event to zero or more pointer events (logical pixels)
    pub fn translate(&mut self, event: &WindowEvent, scale_factor: f64) -> Vec<PointerEvent> {
        let scale = if scale_factor > 0.0 { scale_factor } else { 1.0 };
        match event {
            WindowEvent::CursorMoved { position, .. } => self
                .cursor_moved(position.x / scale, position.y / scale)
                .into_iter()
                .collect(),
            WindowEvent::CursorLeft { .. } => {
                self.cursor_left();
                Vec::new()
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => self
                .left_button(*state == ElementState::Pressed)
                .into_iter()
                .collect(),
            WindowEvent::Touch(touch) => self
                .touch(
                    touch.id,
                    touch.phase,
                    touch.location.x / scale,
                    touch.location.y / scale,
                )
                .into_iter()
                .collect(),
            WindowEvent::Focused(false) => self.focus_lost(),
            _ => Vec::new(),
        }
    }

    pub fn cursor_moved(&mut self, x: f64, y: f64) -> Option<PointerEvent> {
        self.cursor = Some(Point::new(x, y));
        Some(PointerEvent::moved(PointerId::MOUSE, x, y))
    }

    /// The cursor left the window. Position is kept while the button is held.
    pub fn cursor_left(&mut self) {
        if !self.mouse_down {
            self.cursor = None;
        }
    }

    pub fn left_button(&mut self, pressed: bool) -> Option<PointerEvent> {
        let pos = self.cursor?;
        match (pressed, self.mouse_down) {
            (true, false) => {
                self.mouse_down = true;
                Some(PointerEvent::down(PointerId::MOUSE, pos.x, pos.y))
            }
            (false, true) => {
                self.mouse_down = false;
                Some(PointerEvent::up(PointerId::MOUSE, pos.x, pos.y))
            }
            // Repeated press or stray release
            _ => None,
        }
    }

    pub fn touch(&mut self, finger: u64, phase: TouchPhase, x: f64, y: f64) -> Option<PointerEvent> {
        let id = PointerId::touch(finger);
        match phase {
            TouchPhase::Started => {
                self.touches.insert(finger, Point::new(x, y));
                Some(PointerEvent::down(id, x, y))
            }
            TouchPhase::Moved => {
                let last = self.touches.get_mut(&finger)?;
                *last = Point::new(x, y);
                Some(PointerEvent::moved(id, x, y))
            }
            TouchPhase::Ended => self
                .touches
                .remove(&finger)
                .map(|_| PointerEvent::up(id, x, y)),
            TouchPhase::Cancelled => self
                .touches
                .remove(&finger)
                .map(|_| PointerEvent::cancel(id, x, y)),
        }
    }

    /// Cancel every pressed pointer
    pub fn focus_lost(&mut self) -> Vec<PointerEvent> {
        let mut events = Vec::new();
        if self.mouse_down {
            self.mouse_down = false;
            if let Some(pos) = self.cursor {
                events.push(PointerEvent::cancel(PointerId::MOUSE, pos.x, pos.y));
            }
        }
        let mut touches: Vec<(u64, Point)> = self.touches.drain().collect();
        touches.sort_by_key(|(finger, _)| *finger);
        events.extend(
            touches
                .into_iter()
                .map(|(finger, pt)| PointerEvent::cancel(PointerId::touch(finger), pt.x, pt.y)),
        );
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use panel_drag::pointer::PointerEventKind;

    #[test]
    fn test_mouse_press_release_cycle() {
        let mut input = PointerTranslator::new();
        assert_eq!(input.left_button(true), None, "no position yet");

        input.cursor_moved(110.0, 110.0);
        let down = input.left_button(true).unwrap();
        assert_eq!(down.kind, PointerEventKind::Down);
        assert_eq!(down.client, Point::new(110.0, 110.0));

        assert_eq!(input.left_button(true), None);

        let moved = input.cursor_moved(210.0, 130.0).unwrap();
        assert_eq!(moved.kind, PointerEventKind::Move);

        let up = input.left_button(false).unwrap();
        assert_eq!(up.kind, PointerEventKind::Up);
        assert_eq!(up.client, Point::new(210.0, 130.0));
        assert_eq!(input.left_button(false), None);
    }

    #[test]
    fn test_cursor_kept_while_pressed_outside_window() {
        let mut input = PointerTranslator::new();
        input.cursor_moved(5.0, 5.0);
        input.left_button(true);
        input.cursor_left();
        assert!(input.cursor_position().is_some());

        input.left_button(false);
        input.cursor_left();
        assert!(input.cursor_position().is_none());
    }

    #[test]
    fn test_touch_contacts_are_separate_pointers() {
        let mut input = PointerTranslator::new();
        let a = input.touch(0, TouchPhase::Started, 1.0, 1.0).unwrap();
        let b = input.touch(1, TouchPhase::Started, 2.0, 2.0).unwrap();
        assert_ne!(a.pointer_id, b.pointer_id);
        assert_ne!(a.pointer_id, PointerId::MOUSE);

        assert_eq!(input.touch(7, TouchPhase::Moved, 0.0, 0.0), None);
        let cancel = input.touch(1, TouchPhase::Cancelled, 3.0, 3.0).unwrap();
        assert_eq!(cancel.kind, PointerEventKind::Cancel);
        assert_eq!(input.touch(1, TouchPhase::Ended, 3.0, 3.0), None);
    }

    #[test]
    fn test_focus_lost_cancels_everything_pressed() {
        let mut input = PointerTranslator::new();
        input.cursor_moved(10.0, 10.0);
        input.left_button(true);
        input.touch(3, TouchPhase::Started, 50.0, 50.0);

        let events = input.focus_lost();
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.kind == PointerEventKind::Cancel));
        assert!(input.focus_lost().is_empty());
        assert_eq!(input.left_button(false), None);
    }
}
