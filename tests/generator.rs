use std::path::Path;

use image::{Rgba, RgbaImage};
use mapper::atlas::generator::{self, StitchConfig, StitchError, DEFAULT_BACKGROUND};
use mapper::atlas::AtlasIndex;

const BG: [u8; 3] = DEFAULT_BACKGROUND;

/// `cols`×`rows` grid of 16px cells; `fill(i)` gives cell `i`'s colour.
fn sheet(cols: u32, rows: u32, fill: impl Fn(u32) -> Rgba<u8>) -> RgbaImage {
    RgbaImage::from_fn(cols * 16, rows * 16, |x, y| fill((y / 16) * cols + x / 16))
}

fn save(img: &RgbaImage, path: &Path) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    img.save(path).unwrap();
}

#[test]
fn test_find_pngs_is_recursive_sorted_and_case_insensitive() {
    let dir = tempfile::tempdir().unwrap();
    let one = sheet(1, 1, |_| Rgba([1, 2, 3, 255]));
    save(&one, &dir.path().join("b.png"));
    save(&one, &dir.path().join("nested/a.PNG"));
    std::fs::write(dir.path().join("notes.txt"), "not an image").unwrap();

    let found = generator::find_pngs(dir.path());
    assert_eq!(found, vec![dir.path().join("b.png"), dir.path().join("nested/a.PNG")]);
}

#[test]
fn test_stitch_packs_non_empty_sprites() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("sprites");
    // 3 opaque sprites, 1 background cell.
    save(
        &sheet(2, 2, |i| if i == 1 { Rgba([BG[0], BG[1], BG[2], 255]) } else { Rgba([100 + i as u8, 0, 0, 255]) }),
        &src.join("a.png"),
    );
    // 1 opaque sprite, 1 transparent cell.
    save(
        &sheet(2, 1, |i| if i == 0 { Rgba([0, 0, 0, 0]) } else { Rgba([0, 200, 0, 255]) }),
        &src.join("b.png"),
    );

    let config = StitchConfig {
        source_dir: src.clone(),
        output: dir.path().join("atlas.png"),
        ..StitchConfig::default()
    };
    let report = generator::stitch(&config).unwrap();
    assert_eq!(report.sprite_count, 4);
    assert_eq!(report.per_file, vec![(src.join("a.png"), 3), (src.join("b.png"), 1)]);
    assert_eq!(report.atlas_size, 32);
    assert_eq!(report.capacity, 4);

    // The result is a valid atlas with sprites in file then raster order.
    let atlas = AtlasIndex::load(&config.output, 16).unwrap();
    assert_eq!(atlas.tile_count(), 4);
    assert_eq!(atlas.tile_at(0).unwrap().get_pixel(0, 0), &Rgba([100, 0, 0, 255]));
    assert_eq!(atlas.tile_at(1).unwrap().get_pixel(0, 0), &Rgba([102, 0, 0, 255]));
    assert_eq!(atlas.tile_at(2).unwrap().get_pixel(0, 0), &Rgba([103, 0, 0, 255]));
    assert_eq!(atlas.tile_at(3).unwrap().get_pixel(0, 0), &Rgba([0, 200, 0, 255]));
}

#[test]
fn test_stitch_leaves_unused_slots_transparent() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("in");
    save(&sheet(5, 1, |_| Rgba([9, 9, 9, 255])), &src.join("row.png"));
    let config = StitchConfig { source_dir: src, output: dir.path().join("out.png"), ..StitchConfig::default() };

    let report = generator::stitch(&config).unwrap();
    assert_eq!(report.atlas_size, 64);
    assert_eq!(report.capacity, 16);
    let atlas = image::open(&config.output).unwrap().to_rgba8();
    assert_eq!(atlas.get_pixel(0, 16), &Rgba([9, 9, 9, 255]));
    assert_eq!(atlas.get_pixel(63, 63), &Rgba([0, 0, 0, 0]));
}

#[test]
fn test_stitch_errors() {
    let dir = tempfile::tempdir().unwrap();
    let empty = dir.path().join("empty");
    std::fs::create_dir_all(&empty).unwrap();
    let config = StitchConfig { source_dir: empty, output: dir.path().join("x.png"), ..StitchConfig::default() };
    assert!(matches!(generator::stitch(&config), Err(StitchError::NoInput(_))));

    let odd = dir.path().join("odd");
    save(&RgbaImage::from_pixel(20, 16, Rgba([1, 1, 1, 255])), &odd.join("odd.png"));
    let config = StitchConfig { source_dir: odd, ..config };
    let err = generator::stitch(&config).unwrap_err();
    assert!(matches!(err, StitchError::SizeMismatch { width: 20, height: 16, sprite_size: 16, .. }));
    assert!(!config.output.exists());
}

#[test]
fn test_compose_places_sprites_row_major() {
    let sprites: Vec<RgbaImage> =
        (0..3).map(|i| RgbaImage::from_pixel(16, 16, Rgba([i * 50, 0, 0, 255]))).collect();
    let atlas = generator::compose(&sprites, 32, 16);
    assert_eq!(atlas.get_pixel(0, 0)[0], 0);
    assert_eq!(atlas.get_pixel(16, 0)[0], 50);
    assert_eq!(atlas.get_pixel(0, 16)[0], 100);
    assert_eq!(atlas.get_pixel(16, 16)[3], 0);
}
