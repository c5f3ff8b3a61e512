//! Software renderer for the scene
//!
//! Paints every element with a background color in paint order, outlining
//! top-level panels. The scene is in logical pixels; the surface is physical.

use std::num::NonZeroU32;
use std::rc::Rc;

use anyhow::Result;
use softbuffer::{Context, Surface};
use winit::window::Window;

use panel_drag::geometry::Rect;
use panel_drag::scene::Scene;

use super::frame::Frame;

const BACKGROUND: u32 = 0xFF1E1F22;
const PANEL_BORDER: u32 = 0xFF4E5157;

pub struct Renderer {
    surface: Surface<Rc<Window>, Rc<Window>>,
    width: u32,
    height: u32,
    scale_factor: f64,
}

impl Renderer {
    pub fn new(window: Rc<Window>, context: &Context<Rc<Window>>) -> Result<Self> {
        let size = window.inner_size();
        let scale_factor = window.scale_factor();
        let surface = Surface::new(context, Rc::clone(&window))
            .map_err(|e| anyhow::anyhow!("Failed to create surface: {}", e))?;

        let mut renderer = Self {
            surface,
            width: 0,
            height: 0,
            scale_factor,
        };
        renderer.resize(size.width, size.height)?;
        Ok(renderer)
    }

    /// Resize the surface to match the window (physical pixels)
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        let (Some(w), Some(h)) = (NonZeroU32::new(width), NonZeroU32::new(height)) else {
            // Minimized; keep the old surface and skip drawing
            self.width = 0;
            self.height = 0;
            return Ok(());
        };
        self.surface
            .resize(w, h)
            .map_err(|e| anyhow::anyhow!("Failed to resize surface: {}", e))?;
        self.width = width;
        self.height = height;
        Ok(())
    }

    pub fn set_scale_factor(&mut self, scale_factor: f64) {
        self.scale_factor = scale_factor;
    }

    pub fn render(&mut self, scene: &Scene) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Ok(());
        }
        let (width, height, scale) = (self.width as usize, self.height as usize, self.scale_factor);

        let mut buffer = self
            .surface
            .buffer_mut()
            .map_err(|e| anyhow::anyhow!("Failed to get surface buffer: {}", e))?;
        {
            let mut frame = Frame::new(&mut buffer, width, height);
            frame.clear(BACKGROUND);

            for id in scene.paint_order() {
                let (Some(element), Some(rect)) = (scene.element(id), scene.bounding_rect(id))
                else {
                    continue;
                };
                let rect = Rect::new(
                    rect.x * scale,
                    rect.y * scale,
                    rect.width * scale,
                    rect.height * scale,
                );
                if let Some(color) = element.style.background {
                    frame.fill_rect(rect, color);
                }
                if element.parent().is_none() {
                    frame.stroke_rect(rect, PANEL_BORDER);
                }
            }
        }
        buffer
            .present()
            .map_err(|e| anyhow::anyhow!("Failed to present frame: {}", e))?;
        Ok(())
    }
}
