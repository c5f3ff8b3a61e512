//! Runtime module - winit/platform integration
//!
//! This module contains the platform-specific code for running the demo:
//! - `app` - ApplicationHandler and window management
//! - `input` - winit mouse/touch events to pointer events
//! - `panels` - the demo panels and their drag options
//! - `render` / `frame` - softbuffer drawing

pub mod app;
pub mod frame;
pub mod input;
pub mod panels;
pub mod render;

pub use app::App;
