//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;

use anyhow::{bail, Result};
use panel_drag::draggable::{parse_saved_position, SharedStore};
use panel_drag::geometry::{PanelPosition, Size};
use panel_drag::pointer::{PointerEvent, PointerId};
use panel_drag::scene::{Element, ElementId, Scene};
use panel_drag::store::{MemoryStore, PositionStore};

pub const VIEWPORT: Size = Size {
    width: 1024.0,
    height: 768.0,
};

/// Element ids of a test panel
#[derive(Debug, Clone, Copy)]
pub struct TestPanel {
    pub panel: ElementId,
    /// 30px tall strip with class `handle`
    pub header: ElementId,
    /// Child of the header
    pub title: ElementId,
    pub body: ElementId,
}

/// Add a panel of the given size with no explicit position
pub fn add_panel(scene: &mut Scene, width: f64, height: f64) -> TestPanel {
    let panel = scene.add_root(Element::new("section").with_size(width, height));
    let header = scene
        .add_child(
            panel,
            Element::new("header")
                .with_class("handle")
                .with_size(width, 30.0),
        )
        .unwrap();
    let title = scene
        .add_child(
            header,
            Element::new("span")
                .with_class("title")
                .with_size(100.0, 20.0)
                .at(5.0, 5.0),
        )
        .unwrap();
    let body = scene
        .add_child(
            panel,
            Element::new("div")
                .with_class("body")
                .with_size(width, height - 30.0)
                .at(0.0, 30.0),
        )
        .unwrap();
    TestPanel {
        panel,
        header,
        title,
        body,
    }
}

/// 1024x768 scene with one 300x200 panel
pub fn scene_with_panel() -> (Scene, TestPanel) {
    let mut scene = Scene::new(VIEWPORT);
    let panel = add_panel(&mut scene, 300.0, 200.0);
    (scene, panel)
}

pub fn memory_store() -> Rc<MemoryStore> {
    Rc::new(MemoryStore::new())
}

pub fn shared<S: PositionStore + 'static>(store: &Rc<S>) -> SharedStore {
    Rc::clone(store) as SharedStore
}

/// Current on-screen top-left of an element
pub fn position(scene: &Scene, element: ElementId) -> PanelPosition {
    PanelPosition::from(scene.bounding_rect(element).unwrap().origin())
}

pub fn stored_position(store: &dyn PositionStore, key: &str) -> Option<PanelPosition> {
    store
        .get(key)
        .unwrap()
        .as_deref()
        .and_then(parse_saved_position)
}

pub fn press(scene: &mut Scene, x: f64, y: f64) {
    scene.dispatch(PointerEvent::down(PointerId::MOUSE, x, y));
}

pub fn move_to(scene: &mut Scene, x: f64, y: f64) {
    scene.dispatch(PointerEvent::moved(PointerId::MOUSE, x, y));
}

pub fn release(scene: &mut Scene, x: f64, y: f64) {
    scene.dispatch(PointerEvent::up(PointerId::MOUSE, x, y));
}

/// Full mouse drag: press at `from`, move to `to`, release there
pub fn drag(scene: &mut Scene, from: (f64, f64), to: (f64, f64)) {
    press(scene, from.0, from.1);
    move_to(scene, to.0, to.1);
    release(scene, to.0, to.1);
}

/// Store whose every operation fails
#[derive(Debug, Default)]
pub struct FailingStore {
    pub reads: Cell<usize>,
    pub writes: Cell<usize>,
}

impl PositionStore for FailingStore {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        self.reads.set(self.reads.get() + 1);
        bail!("store unavailable")
    }

    fn set(&self, _key: &str, _value: &str) -> Result<()> {
        self.writes.set(self.writes.get() + 1);
        bail!("quota exceeded")
    }
}

/// In-memory store that counts writes
#[derive(Debug, Default)]
pub struct CountingStore {
    pub inner: MemoryStore,
    pub writes: Cell<usize>,
}

impl PositionStore for CountingStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.writes.set(self.writes.get() + 1);
        self.inner.set(key, value)
    }
}
