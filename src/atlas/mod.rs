pub mod generator;

use std::path::{Path, PathBuf};

use image::{DynamicImage, RgbaImage};
use thiserror::Error;

/// One sliced sprite, always RGBA8 and `sprite_size` pixels square.
pub type TileImage = RgbaImage;

// ── AtlasError ────────────────────────────────────────────────────────────────

/// Reasons an atlas image is refused.  Checks run in declaration order, so an
/// image that is neither square nor a power of two reports `NotSquare`.
#[derive(Debug, Error)]
pub enum AtlasError {
    #[error("failed to load image {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("atlas must be square, got {width}x{height}")]
    NotSquare { width: u32, height: u32 },
    #[error("atlas dimensions must be a power of 2, got {0}")]
    NotPowerOfTwo(u32),
    #[error("atlas size {size} must be a multiple of {sprite_size}")]
    SizeMismatch { size: u32, sprite_size: u32 },
}

impl AtlasError {
    /// `true` for the three geometry failures (as opposed to a decode error).
    pub fn is_shape_error(&self) -> bool {
        !matches!(self, AtlasError::Decode { .. })
    }
}

// ── AtlasIndex ────────────────────────────────────────────────────────────────

/// A validated sprite sheet sliced into `tile_count()` square tiles.
///
/// Tiles are numbered in raster order: `index = row * tiles_per_row + col`.
/// An `AtlasIndex` is immutable once built; loading a different sheet builds
/// a new value that replaces this one wholesale.
#[derive(Clone, Debug)]
pub struct AtlasIndex {
    path: Option<PathBuf>,
    sprite_size: u32,
    tiles_per_row: u32,
    tiles: Vec<TileImage>,
}

impl AtlasIndex {
    /// Decode the image at `path`, validate its shape, and slice it.
    pub fn load(path: impl AsRef<Path>, sprite_size: u32) -> Result<Self, AtlasError> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|source| AtlasError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        let mut atlas = Self::from_image(&img, sprite_size)?;
        atlas.path = Some(path.to_path_buf());
        log::info!(
            target: "atlas",
            "loaded {} ({} tiles, {} per row)",
            path.display(),
            atlas.tile_count(),
            atlas.tiles_per_row
        );
        Ok(atlas)
    }

    /// Validate and slice an already decoded image.  The result has no path.
    pub fn from_image(img: &DynamicImage, sprite_size: u32) -> Result<Self, AtlasError> {
        let (width, height) = (img.width(), img.height());
        if width != height {
            return Err(AtlasError::NotSquare { width, height });
        }
        if !width.is_power_of_two() {
            return Err(AtlasError::NotPowerOfTwo(width));
        }
        if sprite_size == 0 || width % sprite_size != 0 {
            return Err(AtlasError::SizeMismatch { size: width, sprite_size });
        }

        let rgba = img.to_rgba8();
        let tiles_per_row = width / sprite_size;
        let tile_count = tiles_per_row * tiles_per_row;

        let tiles = (0..tile_count)
            .map(|idx| {
                let tx = (idx % tiles_per_row) * sprite_size;
                let ty = (idx / tiles_per_row) * sprite_size;
                image::imageops::crop_imm(&rgba, tx, ty, sprite_size, sprite_size).to_image()
            })
            .collect();

        Ok(Self { path: None, sprite_size, tiles_per_row, tiles })
    }

    pub fn tile_count(&self) -> u32 {
        self.tiles.len() as u32
    }

    pub fn tiles_per_row(&self) -> u32 {
        self.tiles_per_row
    }

    pub fn sprite_size(&self) -> u32 {
        self.sprite_size
    }

    /// The tile image for `index`, or `None` when the index does not resolve.
    pub fn tile_at(&self, index: u32) -> Option<&TileImage> {
        self.tiles.get(index as usize)
    }

    pub fn contains(&self, index: u32) -> bool {
        (index as usize) < self.tiles.len()
    }

    /// Path the atlas was loaded from, if it came from disk.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Base file name of the source image, as written into map headers.
    pub fn file_name(&self) -> Option<String> {
        self.path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
