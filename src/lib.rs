//! Panel Drag - draggable floating panels
//!
//! This crate provides a scene of styled elements with a browser-like pointer
//! event system, and a drag behavior that can be attached to any number of
//! panels in it. Panels stay inside the viewport and can remember their
//! position across sessions through a pluggable store.

pub mod cli;
pub mod config;
pub mod config_paths;
pub mod draggable;
pub mod geometry;
pub mod pointer;
pub mod scene;
pub mod store;
pub mod tracing;

// Re-export commonly used types
pub use config::PanelDragConfig;
pub use draggable::{attach, DetachHandle, DragOptions, DraggableBinding, SharedStore};
pub use geometry::{PanelPosition, Point, Rect, Size};
pub use pointer::{PointerEvent, PointerEventKind, PointerId};
pub use scene::{Element, ElementId, Scene};
pub use store::{FileStore, MemoryStore, PositionStore};
