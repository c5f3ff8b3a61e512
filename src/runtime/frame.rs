//! Frame abstraction for drawing primitives
//!
//! Provides a small, safe API over the softbuffer pixel buffer instead of
//! direct buffer indexing in the renderer.

use panel_drag::geometry::Rect;

/// A frame buffer wrapper providing safe drawing primitives.
///
/// All coordinates are in physical pixels. Out-of-bounds operations are clipped.
pub struct Frame<'a> {
    buffer: &'a mut [u32],
    width: usize,
    height: usize,
}

impl<'a> Frame<'a> {
    /// Create a new frame from a mutable pixel buffer
    ///
    /// If the buffer is smaller than width*height, the height is reduced to
    /// what the buffer can hold.
    pub fn new(buffer: &'a mut [u32], width: usize, height: usize) -> Self {
        let height = if width > 0 {
            height.min(buffer.len() / width)
        } else {
            0
        };
        Self {
            buffer,
            width,
            height,
        }
    }

    /// Clear the entire buffer with a solid color
    #[inline]
    pub fn clear(&mut self, color: u32) {
        self.buffer.fill(color);
    }

    /// Fill a rectangle with a solid color
    pub fn fill_rect(&mut self, rect: Rect, color: u32) {
        let (x0, y0, x1, y1) = self.clip(rect);
        for y in y0..y1 {
            let row_start = y * self.width;
            self.buffer[row_start + x0..row_start + x1].fill(color);
        }
    }

    /// Draw a 1px outline just inside `rect`
    pub fn stroke_rect(&mut self, rect: Rect, color: u32) {
        let Rect {
            x,
            y,
            width,
            height,
        } = rect;
        self.fill_rect(Rect::new(x, y, width, 1.0), color);
        self.fill_rect(Rect::new(x, y + height - 1.0, width, 1.0), color);
        self.fill_rect(Rect::new(x, y, 1.0, height), color);
        self.fill_rect(Rect::new(x + width - 1.0, y, 1.0, height), color);
    }

    /// Clip a rectangle to the frame, returning pixel bounds (exclusive end)
    fn clip(&self, rect: Rect) -> (usize, usize, usize, usize) {
        let to_px = |v: f64, max: usize| -> usize {
            if v.is_nan() || v <= 0.0 {
                0
            } else {
                (v.round() as usize).min(max)
            }
        };
        let x0 = to_px(rect.x, self.width);
        let y0 = to_px(rect.y, self.height);
        let x1 = to_px(rect.x + rect.width, self.width).max(x0);
        let y1 = to_px(rect.y + rect.height, self.height).max(y0);
        (x0, y0, x1, y1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_rect_clips_to_frame() {
        let mut buffer = vec![0u32; 10 * 10];
        let mut frame = Frame::new(&mut buffer, 10, 10);
        frame.fill_rect(Rect::new(-5.0, 8.0, 100.0, 100.0), 1);

        assert_eq!(buffer.iter().filter(|p| **p == 1).count(), 20);
        assert_eq!(buffer[7 * 10], 0);
        assert_eq!(buffer[8 * 10], 1);
    }

    #[test]
    fn test_short_buffer_reduces_height() {
        let mut buffer = vec![0u32; 10 * 5];
        let mut frame = Frame::new(&mut buffer, 10, 10);
        frame.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), 7);
        assert!(buffer.iter().all(|p| *p == 7));
    }

    #[test]
    fn test_stroke_rect_leaves_interior() {
        let mut buffer = vec![0u32; 10 * 10];
        let mut frame = Frame::new(&mut buffer, 10, 10);
        frame.stroke_rect(Rect::new(2.0, 2.0, 5.0, 5.0), 9);

        assert_eq!(buffer[2 * 10 + 2], 9);
        assert_eq!(buffer[6 * 10 + 6], 9);
        assert_eq!(buffer[4 * 10 + 4], 0);
    }
}
