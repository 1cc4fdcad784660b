//! World document validation: malformed or inconsistent documents are
//! rejected before any world exists.

use starpath_kernel::grid::Cell;
use starpath_kernel::world::{load_world, load_world_file, WorldDescriptionV1, WorldLoadError};

fn base() -> serde_json::Value {
    serde_json::json!({
        "grid": {"rows": 2, "cols": 3},
        "origin": [0, 0],
        "destination": [1, 2],
        "initial_energy": 10,
        "costs": [[1, 2, 3], [4, 5, 6]]
    })
}

fn load(value: &serde_json::Value) -> Result<starpath_kernel::world::WorldV1, WorldLoadError> {
    load_world(&serde_json::to_vec(value).unwrap())
}

#[test]
fn minimal_document_loads() {
    let world = load(&base()).unwrap();
    assert_eq!(world.rows(), 2);
    assert_eq!(world.cols(), 3);
    assert_eq!(world.cost(Cell::new(1, 1)), Some(5));
    assert!(world.black_holes().is_empty());
}

#[test]
fn parse_errors_name_the_field() {
    let mut doc = base();
    doc["wormholes"] = serde_json::json!([{"entry": [0, 1], "exit": [1, 1], "cost": "two"}]);
    let Err(WorldLoadError::Parse { path, .. }) = load(&doc) else {
        panic!("expected a parse error");
    };
    assert!(path.contains("wormholes") && path.contains("cost"), "{path}");

    let Err(WorldLoadError::Parse { path, .. }) = load_world(b"not json") else {
        panic!("expected a parse error");
    };
    assert_eq!(path, ".");
}

#[test]
fn unknown_fields_are_rejected() {
    let mut doc = base();
    doc["fuel"] = serde_json::json!(3);
    assert!(matches!(load(&doc), Err(WorldLoadError::Parse { .. })));
}

#[test]
fn trailing_bytes_are_rejected() {
    let mut bytes = serde_json::to_vec(&base()).unwrap();
    bytes.extend_from_slice(b" {}");
    assert!(matches!(load_world(&bytes), Err(WorldLoadError::Parse { .. })));
}

#[test]
fn structural_violations() {
    let mut doc = base();
    doc["grid"]["rows"] = serde_json::json!(0);
    assert!(matches!(load(&doc), Err(WorldLoadError::EmptyGrid { .. })));

    let mut doc = base();
    doc["initial_energy"] = serde_json::json!(-1);
    assert!(matches!(
        load(&doc),
        Err(WorldLoadError::NegativeInitialEnergy { energy: -1 })
    ));

    let mut doc = base();
    doc["costs"] = serde_json::json!([[1, 2, 3]]);
    assert!(matches!(
        load(&doc),
        Err(WorldLoadError::CostRowCount { expected: 2, actual: 1 })
    ));

    let mut doc = base();
    doc["costs"] = serde_json::json!([[1, 2, 3], [4, 5]]);
    assert!(matches!(
        load(&doc),
        Err(WorldLoadError::CostRowWidth { row: 1, .. })
    ));

    let mut doc = base();
    doc["black_holes"] = serde_json::json!([[2, 0]]);
    let Err(WorldLoadError::CellOutOfBounds { what, cell, .. }) = load(&doc) else {
        panic!("expected out of bounds");
    };
    assert_eq!(what, "black hole");
    assert_eq!(cell, Cell::new(2, 0));
}

#[test]
fn duplicate_wormholes_are_rejected() {
    let entry_clash = WorldDescriptionV1::uniform(2, 2, 1, Cell::new(0, 0), Cell::new(1, 1), 5)
        .with_wormhole(Cell::new(0, 1), Cell::new(1, 0), 1)
        .with_wormhole(Cell::new(0, 1), Cell::new(1, 1), 1);
    assert!(matches!(
        entry_clash.build(),
        Err(WorldLoadError::DuplicateWormholeEntry { .. })
    ));

    let id_clash = WorldDescriptionV1::uniform(2, 2, 1, Cell::new(0, 0), Cell::new(1, 1), 5)
        .with_named_wormhole("w", Cell::new(0, 1), Cell::new(1, 0), 1)
        .with_named_wormhole("w", Cell::new(1, 0), Cell::new(1, 1), 1);
    assert!(matches!(
        id_clash.build(),
        Err(WorldLoadError::DuplicateWormholeId { .. })
    ));
}

#[test]
fn world_digest_is_stable_across_declaration_order() {
    let a = WorldDescriptionV1::uniform(3, 3, 1, Cell::new(0, 0), Cell::new(2, 2), 5)
        .with_black_hole(Cell::new(1, 1))
        .with_black_hole(Cell::new(0, 2));
    let b = WorldDescriptionV1::uniform(3, 3, 1, Cell::new(0, 0), Cell::new(2, 2), 5)
        .with_black_hole(Cell::new(0, 2))
        .with_black_hole(Cell::new(1, 1));
    assert_eq!(
        a.build().unwrap().digest().unwrap(),
        b.build().unwrap().digest().unwrap()
    );
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_world_file(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, WorldLoadError::Io { .. }));
}
