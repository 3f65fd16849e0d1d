//! End-to-end board scenarios through the public API.

use kurbo::{Point, Rect};
use tacmap_core::storage::FileStorage;
use tacmap_core::{
    DrawKind, InteractionOutcome, ItemTarget, MapBoard, MapKey, MemoryStorage, PointerEvent, ProjectStore, ToolKind,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn plan_a_rotation_and_reload_it() {
    init_logging();
    let viewport = Rect::new(0.0, 0.0, 1000.0, 562.5);
    let mut board = MapBoard::default();
    board.select_map("Kalahari").unwrap();

    board.set_tool(ToolKind::Arrow);
    board.handle_pointer(&viewport, PointerEvent::down(100.0, 100.0));
    board.handle_pointer(&viewport, PointerEvent::moved(400.0, 300.0));
    // Released outside the canvas.
    board.handle_pointer(&viewport, PointerEvent::up());

    let alpha = board.add_label("Team Alpha", ItemTarget::AllMaps).unwrap();
    let bravo = board.add_label("Team Bravo", ItemTarget::Map("Kalahari".into())).unwrap();
    board.move_item(bravo, Point::new(70.0, 20.0));
    board.set_project_name("Week 3");

    let store = ProjectStore::new(MemoryStorage::new(), board.config().storage_namespace.clone());
    assert!(!store.save("Week 3", &board.snapshot_state()).unwrap().overwritten);

    let mut reloaded = MapBoard::default();
    reloaded.restore_state(store.load("Week 3").unwrap());
    assert_eq!(reloaded.snapshot_state(), board.snapshot_state());
    assert_eq!(reloaded.active_map(), Some(&MapKey::from("Kalahari")));
    assert_eq!(reloaded.shapes()[0].kind, DrawKind::Arrow);
    assert_eq!(reloaded.items_visible().len(), 2);

    reloaded.select_map("Solara").unwrap();
    let visible: Vec<_> = reloaded.items_visible().iter().map(|i| i.id).collect();
    assert_eq!(visible, vec![alpha]);
    assert_eq!(reloaded.items_importable().len(), 1);
}

#[test]
fn drag_import_then_remove_everywhere() {
    init_logging();
    let mut board = MapBoard::default();
    board.select_map("Alpine").unwrap();
    let id = board.add_label("Team Alpha", ItemTarget::Map("Alpine".into())).unwrap();

    board.set_tool(ToolKind::Select);
    assert_eq!(board.pointer_down(Point::new(50.0, 50.0)), InteractionOutcome::DragStarted(id));
    board.pointer_move(Point::new(20.0, 30.0));
    board.pointer_up();

    board.select_map("Bermuda").unwrap();
    assert!(board.import_item(id));
    let positions = &board.item(id).unwrap().positions;
    assert_eq!(positions.len(), 2);
    assert_eq!(positions[&MapKey::from("Alpine")], Point::new(20.0, 30.0));
    assert_eq!(positions[&MapKey::from("Bermuda")], Point::new(50.0, 50.0));

    assert!(board.delete_item_everywhere(id));
    assert!(board.items_visible().is_empty());
    board.select_map("Alpine").unwrap();
    assert!(board.items_visible().is_empty());
}

#[test]
fn legacy_project_file_loads_from_disk() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
    let id = "2f1c9c3e-8f7e-4a51-9d36-0b1f3d1c2a10";
    let legacy = format!(
        r##"{{"name":"Old","activeMap":"Purgatory",
            "drawings":[{{"id":"{id}","type":"circle-outline","x":40,"y":40,"w":5,"h":0,
                          "color":"#00ff00","strokeWidth":4}}],
            "items":[{{"id":"{id}","kind":"label","content":"Team Old",
                       "positions":{{"Purgatory":{{"x":10,"y":10}}}}}}]}}"##
    );
    {
        use tacmap_core::KeyValueStorage;
        storage.set("tacmap:project:Old", &legacy).unwrap();
        storage.set("tacmap:projects", r#"["Old"]"#).unwrap();
    }

    let store = ProjectStore::new(storage, "tacmap");
    assert_eq!(store.list().unwrap(), vec!["Old".to_string()]);

    let mut board = MapBoard::default();
    board.restore_state(store.load("Old").unwrap());
    assert_eq!(board.active_map(), Some(&MapKey::from("Purgatory")));
    assert_eq!(board.shapes().len(), 1);
    assert_eq!(board.items_visible()[0].style, Default::default());
}
