//! The demo's floating panels
//!
//! Two panels, each with a title strip that acts as the drag handle and a
//! key under which its position is remembered.

use panel_drag::draggable::DragOptions;
use panel_drag::geometry::{PanelPosition, Size};
use panel_drag::scene::{Element, ElementId, PositionMode, Scene, Style};

pub struct PanelSpec {
    pub name: &'static str,
    pub handle_class: &'static str,
    pub storage_key: &'static str,
    pub size: Size,
    pub header_height: f64,
    /// Explicit starting position; `None` leaves it to the drag defaults
    pub initial: Option<PanelPosition>,
    pub header_color: u32,
    pub body_color: u32,
}

pub const DEMO_PANELS: [PanelSpec; 2] = [
    PanelSpec {
        name: "general-chat",
        handle_class: "chat-header",
        storage_key: "pos:general-chat",
        size: Size {
            width: 320.0,
            height: 420.0,
        },
        header_height: 36.0,
        initial: None,
        header_color: 0xFF3574F0,
        body_color: 0xFF2B2D30,
    },
    PanelSpec {
        name: "backend-test",
        handle_class: "panel-handle",
        storage_key: "pos:backend-test",
        size: Size {
            width: 300.0,
            height: 200.0,
        },
        header_height: 28.0,
        initial: Some(PanelPosition {
            left: 380.0,
            top: 24.0,
        }),
        header_color: 0xFF5FB865,
        body_color: 0xFF2B2D30,
    },
];

/// Add a panel (root, handle strip, body) to the scene
pub fn build_panel(scene: &mut Scene, spec: &PanelSpec) -> ElementId {
    let style = match spec.initial {
        Some(pos) => Style {
            position: PositionMode::Fixed,
            left: Some(pos.left),
            top: Some(pos.top),
            background: Some(spec.body_color),
            ..Default::default()
        },
        None => Style {
            background: Some(spec.body_color),
            ..Default::default()
        },
    };
    let panel = scene.add_root(
        Element::new("section")
            .with_id(spec.name)
            .with_size(spec.size.width, spec.size.height)
            .with_style(style),
    );

    let header_style = Style {
        background: Some(spec.header_color),
        ..Default::default()
    };
    scene.add_child(
        panel,
        Element::new("header")
            .with_class(spec.handle_class)
            .with_size(spec.size.width, spec.header_height)
            .with_style(header_style),
    );
    scene.add_child(
        panel,
        Element::new("div")
            .with_class("panel-body")
            .with_size(spec.size.width, spec.size.height - spec.header_height)
            .at(0.0, spec.header_height),
    );
    panel
}

pub fn drag_options(spec: &PanelSpec, default_origin: PanelPosition) -> DragOptions {
    DragOptions::new()
        .with_handle(format!(".{}", spec.handle_class))
        .with_storage_key(spec.storage_key)
        .with_default_origin(default_origin)
}
