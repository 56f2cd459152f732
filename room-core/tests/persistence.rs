//! Integration tests for saving, restoring and sharing layouts

use base64::Engine as _;
use room_core::{
    CanvasRect, DecodeError, ItemId, ItemKind, LayoutController, LayoutError, LayoutStore,
    MemoryStore, PlannerConfig, RenderCommand, StoreError,
};

fn room() -> CanvasRect {
    CanvasRect::new(0.0, 0.0, 1200.0, 800.0)
}

fn furnished() -> LayoutController {
    let mut c = LayoutController::default();
    c.place_item(ItemKind::PlaqueGold, 130.0, 90.0, &room()).unwrap();
    c.place_item(ItemKind::PlaquePlatinum, 640.0, 410.0, &room()).unwrap();
    let plant = c.place_item(ItemKind::Plant, 10.0, 10.0, &room()).unwrap().id;
    c.move_item(plant, 1190.0, 790.0, &room()).unwrap();
    c.take_render_commands();
    c
}

/// Test that load after save reproduces the same collection
#[test]
fn test_save_then_load_round_trip() {
    let original = furnished();
    let mut store = MemoryStore::new();
    original.save(&mut store).unwrap();

    let mut restored = LayoutController::default();
    assert_eq!(restored.load(&store).unwrap(), 3);
    assert_eq!(restored.snapshot(), original.snapshot());
    assert_eq!(
        restored.items().cloned().collect::<Vec<_>>(),
        original.items().cloned().collect::<Vec<_>>()
    );
}

/// Test the on-device schema under the roomLayout key
#[test]
fn test_saved_schema() {
    let mut c = LayoutController::default();
    c.place_item(ItemKind::Plant, 130.0, 90.0, &room()).unwrap();
    let mut store = MemoryStore::new();
    c.save(&mut store).unwrap();
    assert_eq!(
        store.raw("roomLayout"),
        Some(r#"[["item-1",{"type":"plant","x":100.0,"y":0.0}]]"#)
    );
}

/// Test that save overwrites the previous snapshot
#[test]
fn test_save_is_last_write_wins() {
    let mut store = MemoryStore::new();
    furnished().save(&mut store).unwrap();
    LayoutController::default().save(&mut store).unwrap();
    assert_eq!(store.raw("roomLayout"), Some("[]"));
}

/// Test that a missing key is not an error
#[test]
fn test_load_without_saved_layout() {
    let mut c = LayoutController::default();
    assert_eq!(c.load(&MemoryStore::new()), Ok(0));
    assert!(c.is_empty());
    assert!(c.take_render_commands().is_empty());
}

/// Test that an empty saved layout yields no items and no item nodes
#[test]
fn test_load_empty_layout() {
    let mut c = LayoutController::default();
    let store = MemoryStore::with_entry("roomLayout", "[]");
    assert_eq!(c.load(&store), Ok(0));
    assert!(c.is_empty());
    let commands = c.take_render_commands();
    assert!(!commands.iter().any(|cmd| matches!(cmd, RenderCommand::Create(_))));
}

/// Test that corrupt data is rejected and the collection is left alone
#[test]
fn test_load_corrupt_data_keeps_state() {
    let mut c = furnished();
    let before = c.snapshot();
    let store = MemoryStore::with_entry("roomLayout", "[[\"item-1\",{\"type\":");
    let err = c.load(&store).unwrap_err();
    assert!(matches!(err, LayoutError::Decode(DecodeError::Json(_))));
    assert_eq!(c.snapshot(), before);
    assert!(c.take_render_commands().is_empty());
}

/// Test that restoring emits a clear followed by one create per item
#[test]
fn test_load_rebuilds_visual_layer() {
    let mut store = MemoryStore::new();
    furnished().save(&mut store).unwrap();

    let mut c = LayoutController::default();
    c.place_item(ItemKind::Plant, 0.0, 0.0, &room()).unwrap();
    c.take_render_commands();
    c.load(&store).unwrap();

    let commands = c.take_render_commands();
    assert_eq!(commands.first(), Some(&RenderCommand::Clear));
    assert_eq!(commands.len(), 4);
    assert_eq!(c.len(), 3);
}

/// Test that stored positions are restored verbatim, without snapping
#[test]
fn test_load_does_not_resnap() {
    let store = MemoryStore::with_entry(
        "roomLayout",
        r#"[["item-4",{"type":"plaque-gold","x":133.5,"y":1500}]]"#,
    );
    let mut c = LayoutController::default();
    c.load(&store).unwrap();
    let item = c.get(ItemId::new(4)).unwrap();
    assert_eq!((item.x, item.y), (133.5, 1500.0));
}

/// Test that ids stay unique after a restore
#[test]
fn test_ids_continue_after_restore() {
    let store = MemoryStore::with_entry(
        "roomLayout",
        r#"[["item-2",{"type":"plant","x":0,"y":0}],["item-9",{"type":"plant","x":100,"y":0}]]"#,
    );
    let mut c = LayoutController::default();
    c.load(&store).unwrap();
    let id = c.place_item(ItemKind::Plant, 300.0, 0.0, &room()).unwrap().id;
    assert_eq!(id, ItemId::new(10));
    assert_eq!(c.len(), 3);
}

/// Test that a custom storage key is honoured
#[test]
fn test_custom_storage_key() {
    let cfg = PlannerConfig {
        storage_key: "plannerB".to_string(),
        ..PlannerConfig::default()
    };
    let mut c = LayoutController::new(cfg);
    c.place_item(ItemKind::Plant, 0.0, 0.0, &room()).unwrap();
    let mut store = MemoryStore::new();
    c.save(&mut store).unwrap();
    assert!(store.raw("roomLayout").is_none());
    assert!(store.raw("plannerB").is_some());
}

struct BrokenStore;

impl LayoutStore for BrokenStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::Read {
            key: key.to_string(),
            message: "denied".to_string(),
        })
    }

    fn set(&mut self, key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::Write {
            key: key.to_string(),
            message: "quota exceeded".to_string(),
        })
    }
}

/// Test that store failures surface as errors
#[test]
fn test_store_errors_propagate() {
    let mut c = furnished();
    assert!(matches!(
        c.save(&mut BrokenStore),
        Err(LayoutError::Store(StoreError::Write { .. }))
    ));
    assert!(matches!(
        c.load(&BrokenStore),
        Err(LayoutError::Store(StoreError::Read { .. }))
    ));
    assert_eq!(c.len(), 3);
}

/// Test that a share string decodes back to the same items
#[test]
fn test_share_round_trip() {
    let c = furnished();
    let value = c.encode_shareable().unwrap();
    let decoded = LayoutController::decode_shareable(&value).unwrap();
    assert_eq!(decoded, c.items().cloned().collect::<Vec<_>>());

    let mut other = LayoutController::default();
    assert_eq!(other.load_shared(&value), Ok(3));
    assert_eq!(other.snapshot(), c.snapshot());
}

/// Test the share URL shape
#[test]
fn test_share_url() {
    let c = furnished();
    let url = c.share_url("https://rooms.example", "/index.html").unwrap();
    let prefix = "https://rooms.example/index.html?layout=";
    assert!(url.starts_with(prefix));
    let value = &url[prefix.len()..];
    assert!(!value.contains('+') && !value.contains('/') && !value.contains('='));

    let unescaped = percent_encoding::percent_decode_str(value)
        .decode_utf8()
        .unwrap();
    assert_eq!(unescaped, c.encode_shareable().unwrap());
}

/// Test that a bad share value leaves the collection unchanged
#[test]
fn test_load_shared_rejects_garbage() {
    let mut c = furnished();
    let before = c.snapshot();
    assert!(matches!(
        c.load_shared("not base64!"),
        Err(LayoutError::Decode(DecodeError::Base64(_)))
    ));
    assert_eq!(c.snapshot(), before);
}

/// Test that an id with no representable successor is rejected on load
#[test]
fn test_load_rejects_id_at_sequence_limit() {
    let mut c = furnished();
    let before = c.snapshot();
    let store = MemoryStore::with_entry(
        "roomLayout",
        r#"[["item-18446744073709551615",{"type":"plant","x":0,"y":0}]]"#,
    );
    assert_eq!(
        c.load(&store),
        Err(LayoutError::Decode(DecodeError::InvalidId(
            "item-18446744073709551615".to_string()
        )))
    );
    assert_eq!(c.snapshot(), before);

    let shared = base64::engine::general_purpose::STANDARD.encode(
        r#"[["item-18446744073709551615",{"type":"plant","x":0,"y":0}]]"#,
    );
    assert!(matches!(
        c.load_shared(&shared),
        Err(LayoutError::Decode(DecodeError::InvalidId(_)))
    ));
    assert_eq!(c.snapshot(), before);
}

/// Test that placing after restoring the largest id never reuses an id
#[test]
fn test_ids_exhausted_after_restoring_largest_id() {
    let store = MemoryStore::with_entry(
        "roomLayout",
        r#"[["item-1",{"type":"plaque-gold","x":0,"y":0}],["item-18446744073709551613",{"type":"plant","x":100,"y":0}]]"#,
    );
    let mut c = LayoutController::default();
    c.load(&store).unwrap();

    let last = c.place_item(ItemKind::Plant, 300.0, 0.0, &room()).unwrap().id;
    assert_eq!(last, ItemId::new(ItemId::MAX_SEQ));
    assert_eq!(
        c.place_item(ItemKind::Plant, 400.0, 0.0, &room()).map(|i| i.id),
        Err(LayoutError::IdsExhausted)
    );
    assert_eq!(c.len(), 3);
    assert_eq!(c.get(ItemId::new(1)).map(|i| i.kind), Some(ItemKind::PlaqueGold));

    // The largest allocated id still survives a save/load cycle.
    let mut saved = MemoryStore::new();
    c.save(&mut saved).unwrap();
    let mut restored = LayoutController::default();
    assert_eq!(restored.load(&saved), Ok(3));
    assert_eq!(restored.snapshot(), c.snapshot());
}

/// Test that ids with leading zeros are rejected instead of renamed
#[test]
fn test_load_rejects_non_canonical_ids() {
    let store = MemoryStore::with_entry(
        "roomLayout",
        r#"[["item-007",{"type":"plant","x":0,"y":0}]]"#,
    );
    let mut c = LayoutController::default();
    assert_eq!(
        c.load(&store),
        Err(LayoutError::Decode(DecodeError::InvalidId("item-007".to_string())))
    );
    assert!(c.is_empty());
}
