//! Panel positions surviving across runs through the file store

mod common;

use std::path::Path;
use std::rc::Rc;

use common::{add_panel, drag, position, VIEWPORT};
use panel_drag::draggable::{attach, DragOptions, SharedStore};
use panel_drag::geometry::PanelPosition;
use panel_drag::scene::Scene;
use panel_drag::store::{FileStore, PositionStore};

fn chat_options() -> DragOptions {
    DragOptions::new()
        .with_handle(".handle")
        .with_storage_key("pos:general-chat")
}

/// One "run": open the store, attach, perform `drags`, tear down.
/// Returns where the panel started and where it ended.
fn run_session(path: &Path, drags: &[((f64, f64), (f64, f64))]) -> (PanelPosition, PanelPosition) {
    let store: SharedStore = Rc::new(FileStore::open(path));
    let mut scene = Scene::new(VIEWPORT);
    let ids = add_panel(&mut scene, 300.0, 200.0);

    let handle = attach(&mut scene, ids.panel, &chat_options(), store);
    let start = position(&scene, ids.panel);
    for (from, to) in drags {
        drag(&mut scene, *from, *to);
    }
    let end = position(&scene, ids.panel);
    handle.detach(&mut scene);
    (start, end)
}

#[test]
fn test_position_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("positions.json");

    let (start, end) = run_session(&path, &[((50.0, 30.0), (150.0, 130.0))]);
    assert_eq!(start, PanelPosition::new(24.0, 24.0));
    assert_eq!(end, PanelPosition::new(124.0, 124.0));

    let (start, end) = run_session(&path, &[]);
    assert_eq!(start, PanelPosition::new(124.0, 124.0));
    assert_eq!(end, start);

    let contents = std::fs::read_to_string(&path).unwrap();
    let file: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(file["version"], 1);
    assert_eq!(
        file["entries"]["pos:general-chat"],
        r#"{"left":124.0,"top":124.0}"#
    );
}

#[test]
fn test_corrupt_store_file_starts_fresh() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("positions.json");
    std::fs::write(&path, "{ this is not json").unwrap();

    let (start, end) = run_session(&path, &[((50.0, 30.0), (60.0, 40.0))]);
    assert_eq!(start, PanelPosition::new(24.0, 24.0));
    assert_eq!(end, PanelPosition::new(34.0, 34.0));

    // The first save replaced the corrupt file
    let (start, _) = run_session(&path, &[]);
    assert_eq!(start, PanelPosition::new(34.0, 34.0));
}

#[test]
fn test_corrupt_entry_falls_back_to_default() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("positions.json");
    FileStore::open(&path)
        .set("pos:general-chat", r#"{"left":"far","top":10}"#)
        .unwrap();

    let (start, _) = run_session(&path, &[]);
    assert_eq!(start, PanelPosition::new(24.0, 24.0));
}

#[test]
fn test_unwritable_store_does_not_break_dragging() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "a file, not a directory").unwrap();
    let path = blocker.join("positions.json");

    let (start, end) = run_session(&path, &[((50.0, 30.0), (80.0, 60.0))]);
    assert_eq!(start, PanelPosition::new(24.0, 24.0));
    assert_eq!(end, PanelPosition::new(54.0, 54.0));
    assert!(!path.exists());
}

#[test]
fn test_failed_save_is_not_restored_later() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("positions.json");
    std::fs::create_dir_all(&path).unwrap();
    let store: SharedStore = Rc::new(FileStore::open(&path));

    let mut scene = Scene::new(VIEWPORT);
    let ids = add_panel(&mut scene, 300.0, 200.0);
    let handle = attach(&mut scene, ids.panel, &chat_options(), Rc::clone(&store));
    drag(&mut scene, (50.0, 30.0), (150.0, 130.0));
    assert_eq!(position(&scene, ids.panel), PanelPosition::new(124.0, 124.0));
    handle.detach(&mut scene);
    scene.remove_element(ids.panel);

    // Same process, same store: the write never reached disk
    assert_eq!(store.get("pos:general-chat").unwrap(), None);
    let fresh = add_panel(&mut scene, 300.0, 200.0);
    let handle = attach(&mut scene, fresh.panel, &chat_options(), store);
    assert_eq!(position(&scene, fresh.panel), PanelPosition::new(24.0, 24.0));
    handle.detach(&mut scene);
}

#[test]
fn test_clear_resets_positions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("positions.json");

    run_session(&path, &[((50.0, 30.0), (250.0, 230.0))]);
    let store = FileStore::open(&path);
    assert_eq!(store.len(), 1);
    store.clear().unwrap();
    drop(store);

    let (start, _) = run_session(&path, &[]);
    assert_eq!(start, PanelPosition::new(24.0, 24.0));
}
