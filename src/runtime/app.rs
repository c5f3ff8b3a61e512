use std::rc::Rc;

use anyhow::Result;
use softbuffer::Context;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow};
use winit::window::{CursorIcon, Window, WindowId};

use panel_drag::cli::{StartupConfig, StoreLocation};
use panel_drag::config::PanelDragConfig;
use panel_drag::draggable::{DraggableBinding, SharedStore};
use panel_drag::geometry::Size;
use panel_drag::pointer::{PointerEvent, PointerEventKind};
use panel_drag::scene::{CursorStyle, ElementId, Scene};
use panel_drag::store::{FileStore, MemoryStore};

use super::input::PointerTranslator;
use super::panels::{build_panel, drag_options, DEMO_PANELS};
use super::render::Renderer;

struct DemoPanel {
    element: ElementId,
    binding: DraggableBinding,
}

pub struct App {
    config: PanelDragConfig,
    scene: Scene,
    panels: Vec<DemoPanel>,
    translator: PointerTranslator,
    renderer: Option<Renderer>,
    window: Option<Rc<Window>>,
    context: Option<Context<Rc<Window>>>,
    window_size: (u32, u32),
    scale_factor: f64,
}

impl App {
    pub fn new(startup: StartupConfig, config: PanelDragConfig) -> Self {
        let store = open_store(&startup);
        let (width, height) = startup.window_size;
        let mut scene = Scene::new(Size::new(width as f64, height as f64));

        let panels = DEMO_PANELS
            .iter()
            .map(|spec| {
                let element = build_panel(&mut scene, spec);
                let mut binding = DraggableBinding::new(Rc::clone(&store));
                if !binding.bind(
                    &mut scene,
                    Some(element),
                    drag_options(spec, config.default_origin),
                ) {
                    tracing::warn!(panel = spec.name, "panel is not draggable");
                }
                DemoPanel { element, binding }
            })
            .collect();

        Self {
            config,
            scene,
            panels,
            translator: PointerTranslator::new(),
            renderer: None,
            window: None,
            context: None,
            window_size: startup.window_size,
            scale_factor: 1.0,
        }
    }

    fn init_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attributes = Window::default_attributes()
            .with_title("Panel Drag")
            .with_inner_size(LogicalSize::new(self.window_size.0, self.window_size.1));
        let window = Rc::new(event_loop.create_window(attributes)?);
        let context = Context::new(Rc::clone(&window))
            .map_err(|e| anyhow::anyhow!("Failed to create graphics context: {}", e))?;
        let renderer = Renderer::new(Rc::clone(&window), &context)?;

        self.scale_factor = window.scale_factor();
        self.sync_viewport(window.inner_size().width, window.inner_size().height);
        self.renderer = Some(renderer);
        self.window = Some(window);
        self.context = Some(context);
        Ok(())
    }

    /// Viewport follows the window in logical pixels
    fn sync_viewport(&mut self, physical_width: u32, physical_height: u32) {
        self.scene.set_viewport(Size::new(
            physical_width as f64 / self.scale_factor,
            physical_height as f64 / self.scale_factor,
        ));
    }

    fn dispatch_pointer(&mut self, event: PointerEvent) {
        if event.kind == PointerEventKind::Down {
            if let Some(hit) = self.scene.hit_test(event.client) {
                self.scene.raise(hit);
            }
        }
        self.scene.dispatch(event);
    }

    fn update_cursor_icon(&self) {
        let Some(window) = &self.window else { return };
        let icon = match self
            .translator
            .cursor_position()
            .and_then(|pt| self.scene.cursor_at(pt))
        {
            Some(CursorStyle::Move) => CursorIcon::Move,
            Some(CursorStyle::Pointer) => CursorIcon::Pointer,
            Some(CursorStyle::Text) => CursorIcon::Text,
            Some(CursorStyle::Default) | None => CursorIcon::Default,
        };
        window.set_cursor(icon);
    }

    fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    /// Detach every panel before the scene goes away and remember the
    /// window size for the next run
    fn shutdown(&mut self) {
        for panel in &mut self.panels {
            tracing::debug!(element = ?panel.element, "detaching panel");
            panel.binding.unbind(&mut self.scene);
        }

        let viewport = self.scene.viewport();
        let (width, height) = (viewport.width.round() as u32, viewport.height.round() as u32);
        if self.config.set_window_size(width, height) {
            if let Err(e) = self.config.save() {
                tracing::warn!("Failed to save window size: {}", e);
            }
        }
    }
}

fn open_store(startup: &StartupConfig) -> SharedStore {
    let file = match &startup.store {
        StoreLocation::Memory => return Rc::new(MemoryStore::new()),
        StoreLocation::Default => FileStore::open_default(),
        StoreLocation::File(path) => Some(FileStore::open(path)),
    };
    let Some(file) = file else {
        tracing::warn!("No config directory available, panel positions will not be saved");
        return Rc::new(MemoryStore::new());
    };
    if startup.reset_positions {
        match file.clear() {
            Ok(()) => tracing::info!("Cleared saved positions in {}", file.path().display()),
            Err(e) => tracing::warn!("Failed to clear saved positions: {:#}", e),
        }
    }
    Rc::new(file)
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.init_window(event_loop) {
                tracing::error!("Failed to create window: {:#}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        if self.window.as_ref().map(|w| w.id()) != Some(window_id) {
            return;
        }

        match &event {
            WindowEvent::CloseRequested => {
                self.shutdown();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(renderer) = &mut self.renderer {
                    if let Err(e) = renderer.resize(size.width, size.height) {
                        tracing::warn!("{:#}", e);
                    }
                }
                self.sync_viewport(size.width, size.height);
                self.request_redraw();
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.scale_factor = *scale_factor;
                if let Some(renderer) = &mut self.renderer {
                    renderer.set_scale_factor(*scale_factor);
                }
            }
            WindowEvent::RedrawRequested => {
                if let Some(renderer) = &mut self.renderer {
                    if let Err(e) = renderer.render(&self.scene) {
                        tracing::warn!("Render failed: {:#}", e);
                    }
                }
            }
            _ => {
                let events = self.translator.translate(&event, self.scale_factor);
                if events.is_empty() {
                    return;
                }
                for pointer_event in events {
                    self.dispatch_pointer(pointer_event);
                }
                self.update_cursor_icon();
                self.request_redraw();
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);
    }
}
