// ── Atlas generator ───────────────────────────────────────────────────────────
//
// Walks a directory of small PNGs, snips each into sprite-sized squares, drops
// the empty ones, and composites the survivors into the smallest square
// power-of-two sheet that holds them.  The output is exactly the shape
// `AtlasIndex::load` accepts.

use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};
use thiserror::Error;

use crate::SPRITE_SIZE;

/// Palette black used by the source art as "nothing here".
pub const DEFAULT_BACKGROUND: [u8; 3] = [22, 13, 19];

#[derive(Debug, Error)]
pub enum StitchError {
    #[error("no PNG files found in '{}'", .0.display())]
    NoInput(PathBuf),
    #[error("failed to load {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("'{}' has dimensions {width}x{height}, which is not a multiple of {sprite_size}", path.display())]
    SizeMismatch { path: PathBuf, width: u32, height: u32, sprite_size: u32 },
    #[error("failed to save atlas to {}: {source}", path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

// ── StitchConfig ──────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct StitchConfig {
    /// Directory scanned recursively for `.png` files.
    pub source_dir: PathBuf,
    /// Where the finished atlas is written.
    pub output: PathBuf,
    pub sprite_size: u32,
    /// Opaque pixels of exactly this RGB count as empty.
    pub background: [u8; 3],
}

impl Default for StitchConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("./sprites"),
            output: PathBuf::from("output.png"),
            sprite_size: SPRITE_SIZE,
            background: DEFAULT_BACKGROUND,
        }
    }
}

/// Summary of one `stitch` run.
#[derive(Clone, Debug, PartialEq)]
pub struct StitchReport {
    /// Sprites kept per input file, in processing order.
    pub per_file: Vec<(PathBuf, usize)>,
    pub sprite_count: usize,
    pub atlas_size: u32,
    /// Number of sprite slots in the atlas.
    pub capacity: u32,
}

// ── Pure pipeline stages ──────────────────────────────────────────────────────

/// Recursively collect `.png` files (extension matched case-insensitively),
/// sorted by path so repeated runs produce identical atlases.
pub fn find_pngs(dir: &Path) -> Vec<PathBuf> {
    let mut found: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .and_then(|s| s.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
        })
        .collect();
    found.sort();
    found
}

/// A sprite is empty when every pixel is fully transparent or exactly the
/// background colour.
pub fn is_empty(sprite: &RgbaImage, background: [u8; 3]) -> bool {
    sprite
        .pixels()
        .all(|&Rgba([r, g, b, a])| a == 0 || [r, g, b] == background)
}

/// Slice `img` into `sprite_size` squares in raster order, dropping empties.
///
/// `path` is only used for the error message.
pub fn snip(
    img: &RgbaImage,
    path: &Path,
    sprite_size: u32,
    background: [u8; 3],
) -> Result<Vec<RgbaImage>, StitchError> {
    let (width, height) = img.dimensions();
    if sprite_size == 0 || width % sprite_size != 0 || height % sprite_size != 0 {
        return Err(StitchError::SizeMismatch {
            path: path.to_path_buf(),
            width,
            height,
            sprite_size,
        });
    }

    let mut sprites = Vec::new();
    for y in (0..height).step_by(sprite_size as usize) {
        for x in (0..width).step_by(sprite_size as usize) {
            let sprite = image::imageops::crop_imm(img, x, y, sprite_size, sprite_size).to_image();
            if !is_empty(&sprite, background) {
                sprites.push(sprite);
            }
        }
    }
    Ok(sprites)
}

/// Smallest power-of-two edge that fits `ceil(sqrt(count))` sprites per side.
pub fn atlas_size(count: usize, sprite_size: u32) -> u32 {
    let mut per_side = (count as f64).sqrt().ceil() as u32;
    // Guard against float rounding just below a perfect square.
    while (per_side as usize) * (per_side as usize) < count {
        per_side += 1;
    }
    let min_dimension = (per_side.max(1) * sprite_size).max(1);
    min_dimension.next_power_of_two()
}

/// Paste `sprites` row-major onto a transparent `atlas_size` square.
pub fn compose(sprites: &[RgbaImage], atlas_size: u32, sprite_size: u32) -> RgbaImage {
    let mut atlas = RgbaImage::new(atlas_size, atlas_size);
    let per_row = (atlas_size / sprite_size.max(1)).max(1);
    for (i, sprite) in sprites.iter().enumerate() {
        let i = i as u32;
        let x = (i % per_row) * sprite_size;
        let y = (i / per_row) * sprite_size;
        image::imageops::replace(&mut atlas, sprite, x as i64, y as i64);
    }
    atlas
}

// ── stitch ────────────────────────────────────────────────────────────────────

/// Run the whole pipeline described by `config` and write the atlas PNG.
pub fn stitch(config: &StitchConfig) -> Result<StitchReport, StitchError> {
    let files = find_pngs(&config.source_dir);
    if files.is_empty() {
        return Err(StitchError::NoInput(config.source_dir.clone()));
    }
    log::info!(target: "stitch", "found {} PNG file(s) in {}", files.len(), config.source_dir.display());

    let mut all_sprites = Vec::new();
    let mut per_file = Vec::with_capacity(files.len());
    for path in files {
        let img = image::open(&path)
            .map_err(|source| StitchError::Decode { path: path.clone(), source })?
            .to_rgba8();
        let sprites = snip(&img, &path, config.sprite_size, config.background)?;
        log::info!(target: "stitch", "  {}: {} sprite(s)", path.display(), sprites.len());
        per_file.push((path, sprites.len()));
        all_sprites.extend(sprites);
    }

    let size = atlas_size(all_sprites.len(), config.sprite_size);
    let per_row = size / config.sprite_size;
    let atlas = compose(&all_sprites, size, config.sprite_size);
    atlas
        .save(&config.output)
        .map_err(|source| StitchError::Save { path: config.output.clone(), source })?;
    log::info!(target: "stitch", "saved {size}x{size} atlas to {}", config.output.display());

    Ok(StitchReport {
        per_file,
        sprite_count: all_sprites.len(),
        atlas_size: size,
        capacity: per_row * per_row,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
