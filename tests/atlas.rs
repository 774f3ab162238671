use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};
use mapper::atlas::{AtlasError, AtlasIndex};
use mapper::config::EditorConfig;
use mapper::editor::Editor;

/// Write a `w`×`h` PNG where each 16px cell has red = its raster index.
fn write_png(dir: &Path, name: &str, w: u32, h: u32) -> PathBuf {
    let img = RgbaImage::from_fn(w, h, |x, y| {
        let idx = (y / 16) * (w / 16).max(1) + x / 16;
        Rgba([idx as u8, 0, 0, 255])
    });
    let path = dir.join(name);
    img.save(&path).unwrap();
    path
}

#[test]
fn test_load_slices_tiles_in_raster_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_png(dir.path(), "atlas.png", 64, 64);
    let atlas = AtlasIndex::load(&path, 16).unwrap();

    assert_eq!(atlas.tile_count(), 16);
    assert_eq!(atlas.tiles_per_row(), 4);
    assert_eq!(atlas.file_name().as_deref(), Some("atlas.png"));
    for i in 0..16 {
        let tile = atlas.tile_at(i).unwrap();
        assert_eq!(tile.dimensions(), (16, 16));
        assert_eq!(tile.get_pixel(0, 0)[0], i as u8);
    }
    assert!(atlas.tile_at(16).is_none());
}

#[test]
fn test_single_tile_atlas() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_png(dir.path(), "one.png", 16, 16);
    let atlas = AtlasIndex::load(&path, 16).unwrap();
    assert_eq!(atlas.tile_count(), 1);
    assert!(atlas.contains(0));
    assert!(!atlas.contains(1));
}

#[test]
fn test_non_power_of_two_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_png(dir.path(), "bad.png", 100, 100);
    let err = AtlasIndex::load(&path, 16).unwrap_err();
    assert!(matches!(err, AtlasError::NotPowerOfTwo(100)));
    assert!(err.is_shape_error());
}

#[test]
fn test_non_square_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_png(dir.path(), "wide.png", 48, 32);
    let err = AtlasIndex::load(&path, 16).unwrap_err();
    assert!(matches!(err, AtlasError::NotSquare { width: 48, height: 32 }));
}

#[test]
fn test_power_of_two_smaller_than_sprite_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_png(dir.path(), "tiny.png", 8, 8);
    let err = AtlasIndex::load(&path, 16).unwrap_err();
    assert!(matches!(err, AtlasError::SizeMismatch { size: 8, sprite_size: 16 }));
}

#[test]
fn test_missing_file_is_a_decode_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = AtlasIndex::load(dir.path().join("nope.png"), 16).unwrap_err();
    assert!(matches!(err, AtlasError::Decode { .. }));
    assert!(!err.is_shape_error());
}

#[test]
fn test_rejected_atlas_keeps_previous_one() {
    let dir = tempfile::tempdir().unwrap();
    let good = write_png(dir.path(), "good.png", 32, 32);
    let bad = write_png(dir.path(), "bad.png", 100, 100);
    let wide = write_png(dir.path(), "wide.png", 48, 32);

    let mut editor = Editor::new(EditorConfig::default());
    assert_eq!(editor.load_atlas(&good).unwrap(), 4);
    assert!(editor.state.set_brush(3));

    assert!(editor.load_atlas(&bad).unwrap_err().is_shape_error());
    assert!(editor.load_atlas(&wide).unwrap_err().is_shape_error());
    let atlas = editor.state.atlas().unwrap();
    assert_eq!(atlas.tile_count(), 4);
    assert_eq!(atlas.file_name().as_deref(), Some("good.png"));
    assert_eq!(editor.state.brush(), Some(3));
    assert!(editor.state.status().contains("must be square"));
}

#[test]
fn test_new_atlas_resets_brush() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_png(dir.path(), "a.png", 32, 32);
    let b = write_png(dir.path(), "b.png", 64, 64);

    let mut editor = Editor::new(EditorConfig::default());
    editor.load_atlas(&a).unwrap();
    editor.state.set_brush(2);
    editor.load_atlas(&b).unwrap();
    assert_eq!(editor.state.brush(), Some(0));
    assert_eq!(editor.state.status(), "[Paint] Loaded atlas: b.png (16 tiles)");
}
