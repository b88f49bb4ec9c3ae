use std::io::Write;

use prowl_core::{TileCode, TilePoint};
use prowl_system_terrain::{editor_walkability, load_csv, MapError};

#[test]
fn loads_map_from_disk() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "1,1,7").expect("write row");
    writeln!(file, "1,22,1").expect("write row");

    let grid = load_csv(file.path(), 32, editor_walkability()).expect("map loads");

    assert_eq!((grid.columns(), grid.rows()), (3, 2));
    assert_eq!(grid.tile_at(TilePoint::new(1, 1)), Some(TileCode::new(22)));
    assert!(!grid.is_walkable_tile(TilePoint::new(2, 0)));
}

#[test]
fn missing_file_reports_path() {
    let directory = tempfile::tempdir().expect("temp dir");
    let path = directory.path().join("absent.csv");

    let error = load_csv(&path, 32, editor_walkability()).expect_err("missing file");

    match &error {
        MapError::Io { path: reported, .. } => assert_eq!(reported, &path),
        other => panic!("unexpected error: {other}"),
    }
    assert!(error.to_string().contains("absent.csv"));
}
