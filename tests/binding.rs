//! Tests for DraggableBinding re-attachment

mod common;

use common::{drag, memory_store, position, press, scene_with_panel, shared, CountingStore};
use panel_drag::draggable::{DragOptions, DraggableBinding};
use panel_drag::geometry::PanelPosition;
use panel_drag::pointer::PointerId;
use panel_drag::scene::{CursorStyle, ListenerTarget};
use panel_drag::store::PositionStore;
use std::rc::Rc;

fn header_options() -> DragOptions {
    DragOptions::new().with_handle(".handle")
}

#[test]
fn test_bind_without_element_then_with_element() {
    let (mut scene, ids) = scene_with_panel();
    let mut binding = DraggableBinding::new(shared(&memory_store()));

    assert!(!binding.bind(&mut scene, None, header_options()));
    assert!(!binding.is_attached());
    assert_eq!(scene.listener_count(), 0);

    assert!(binding.bind(&mut scene, Some(ids.panel), header_options()));
    assert_eq!(binding.current().and_then(|h| h.handle()), Some(ids.header));
    assert_eq!(scene.listener_count(), 1);

    binding.unbind(&mut scene);
}

#[test]
fn test_rebinding_same_inputs_does_not_duplicate_listeners() {
    let (mut scene, ids) = scene_with_panel();
    let mut binding = DraggableBinding::new(shared(&memory_store()));

    for _ in 0..5 {
        assert!(binding.bind(&mut scene, Some(ids.panel), header_options()));
    }
    assert_eq!(scene.listener_count(), 1);

    // Rebinding with equal inputs keeps a running drag alive
    press(&mut scene, 50.0, 30.0);
    binding.bind(&mut scene, Some(ids.panel), header_options());
    assert!(binding.current().is_some_and(|h| h.is_dragging()));

    binding.unbind(&mut scene);
    assert_eq!(scene.listener_count(), 0);
}

#[test]
fn test_changed_options_tear_down_running_drag() {
    let (mut scene, ids) = scene_with_panel();
    let store = Rc::new(CountingStore::default());
    let mut binding = DraggableBinding::new(shared(&store));

    binding.bind(
        &mut scene,
        Some(ids.panel),
        header_options().with_storage_key("old"),
    );
    press(&mut scene, 50.0, 30.0);
    assert_eq!(scene.capture_count(), 1);

    assert!(binding.bind(
        &mut scene,
        Some(ids.panel),
        header_options().with_storage_key("new"),
    ));

    assert!(!binding.current().is_some_and(|h| h.is_dragging()));
    assert_eq!(scene.capture_count(), 0);
    assert_eq!(scene.listener_count_for(ListenerTarget::Window), 0);
    assert_eq!(scene.listener_count(), 1);
    assert_eq!(store.writes.get(), 0);

    // The new attachment saves under the new key
    drag(&mut scene, (50.0, 30.0), (60.0, 40.0));
    assert_eq!(store.inner.get("old").unwrap(), None);
    assert!(store.inner.get("new").unwrap().is_some());

    binding.unbind(&mut scene);
}

#[test]
fn test_changed_element_moves_attachment() {
    let (mut scene, first) = scene_with_panel();
    let second = common::add_panel(&mut scene, 200.0, 100.0);
    let mut binding = DraggableBinding::new(shared(&memory_store()));

    binding.bind(&mut scene, Some(first.panel), header_options());
    binding.bind(&mut scene, Some(second.panel), header_options());

    assert_eq!(binding.current().and_then(|h| h.panel()), Some(second.panel));
    assert_eq!(scene.style(first.header).unwrap().cursor, None);
    assert_eq!(
        scene.style(second.header).unwrap().cursor,
        Some(CursorStyle::Move)
    );
    assert_eq!(
        scene.listener_count_for(ListenerTarget::Element(first.header)),
        0
    );

    binding.unbind(&mut scene);
}

#[test]
fn test_missing_handle_then_valid_selector() {
    let (mut scene, ids) = scene_with_panel();
    let mut binding = DraggableBinding::new(shared(&memory_store()));

    assert!(!binding.bind(
        &mut scene,
        Some(ids.panel),
        DragOptions::new().with_handle(".missing"),
    ));
    assert_eq!(scene.listener_count(), 0);

    assert!(binding.bind(&mut scene, Some(ids.panel), header_options()));
    drag(&mut scene, (50.0, 30.0), (70.0, 50.0));
    assert_eq!(position(&scene, ids.panel), PanelPosition::new(44.0, 44.0));

    binding.unbind(&mut scene);
}

#[test]
fn test_unbind_restores_everything() {
    let (mut scene, ids) = scene_with_panel();
    let mut binding = DraggableBinding::new(shared(&memory_store()));

    binding.bind(&mut scene, Some(ids.panel), header_options());
    press(&mut scene, 50.0, 30.0);
    binding.unbind(&mut scene);

    assert!(!binding.is_attached());
    assert!(binding.current().is_none());
    assert_eq!(scene.listener_count(), 0);
    assert!(!scene.has_pointer_capture(ids.header, PointerId::MOUSE));
    assert_eq!(scene.style(ids.header).unwrap().cursor, None);

    // After unbind the same inputs attach again
    assert!(binding.bind(&mut scene, Some(ids.panel), header_options()));
    binding.unbind(&mut scene);
}
