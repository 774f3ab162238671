// ── Rendering capability ──────────────────────────────────────────────────────
//
// The editor only ever needs two things from a drawing backend: blit a tile
// image into a square on screen, and outline a rectangle.  `RgbaSurface` is a
// CPU implementation over an `image::RgbaImage`, used for snapshots and
// tests; a windowed host implements `Surface` over its own API.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use crate::atlas::TileImage;

/// Drawing target for `Editor::render`.  Coordinates are screen pixels and
/// may be partially or fully off-surface.
pub trait Surface {
    /// Draw `tile` scaled to a `size`×`size` square with its top-left at `(x, y)`.
    fn draw_tile(&mut self, tile: &TileImage, x: i32, y: i32, size: u32);

    /// Outline the rectangle `(x, y, w, h)`.  Backends without overlays may
    /// ignore it.
    fn draw_outline(&mut self, _x: i32, _y: i32, _w: u32, _h: u32) {}
}

// ── RgbaSurface ───────────────────────────────────────────────────────────────

pub const BACKGROUND: Rgba<u8> = Rgba([0x1a, 0x1a, 0x1a, 0xff]);
pub const OUTLINE: Rgba<u8> = Rgba([0xff, 0xff, 0x00, 0xff]);

/// Software surface: composites into an owned RGBA image.
pub struct RgbaSurface {
    pub image: RgbaImage,
}

impl RgbaSurface {
    /// A `width`×`height` surface cleared to the map background colour.
    pub fn new(width: u32, height: u32) -> Self {
        Self { image: RgbaImage::from_pixel(width, height, BACKGROUND) }
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    fn put(&mut self, x: i32, y: i32, px: Rgba<u8>) {
        if x >= 0 && y >= 0 && (x as u32) < self.image.width() && (y as u32) < self.image.height() {
            self.image.put_pixel(x as u32, y as u32, px);
        }
    }
}

impl Surface for RgbaSurface {
    fn draw_tile(&mut self, tile: &TileImage, x: i32, y: i32, size: u32) {
        if tile.width() == size && tile.height() == size {
            imageops::overlay(&mut self.image, tile, x as i64, y as i64);
        } else {
            let scaled = imageops::resize(tile, size, size, FilterType::Nearest);
            imageops::overlay(&mut self.image, &scaled, x as i64, y as i64);
        }
    }

    fn draw_outline(&mut self, x: i32, y: i32, w: u32, h: u32) {
        if w == 0 || h == 0 {
            return;
        }
        let (x1, y1) = (x + w as i32 - 1, y + h as i32 - 1);
        for px in x..=x1 {
            self.put(px, y, OUTLINE);
            self.put(px, y1, OUTLINE);
        }
        for py in y..=y1 {
            self.put(x, py, OUTLINE);
            self.put(x1, py, OUTLINE);
        }
    }
}
