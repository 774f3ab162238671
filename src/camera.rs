use glam::IVec2;

use crate::config::EditorConfig;

// ── CoordTransform ────────────────────────────────────────────────────────────

/// Pure mapping between world tile coordinates and view pixels.
///
/// View space is the full, unscrolled pixel plane of the world: world tile
/// `(-offset, -offset)` occupies the square at view pixel `(0, 0)`.
///
/// ```text
/// px = (wx + offset) * display_size
/// wx = floor(px / display_size) - offset
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CoordTransform {
    /// On-screen edge of one tile in pixels.
    pub display_size: i32,
    /// Half the world's width in tiles.
    pub world_offset: i32,
}

impl CoordTransform {
    pub fn new(display_size: i32, world_offset: i32) -> Self {
        Self { display_size, world_offset }
    }

    /// Top-left view pixel of world tile `(wx, wy)`.  Saturates for tiles
    /// far outside the world.
    pub fn world_to_view(&self, wx: i32, wy: i32) -> IVec2 {
        let axis = |w: i32| w.saturating_add(self.world_offset).saturating_mul(self.display_size);
        IVec2::new(axis(wx), axis(wy))
    }

    /// World tile containing view pixel `(px, py)`.  Rounds toward negative
    /// infinity, so every pixel of a tile maps back to that tile.
    pub fn view_to_world(&self, px: i32, py: i32) -> IVec2 {
        let axis = |p: i32| p.div_euclid(self.display_size).saturating_sub(self.world_offset);
        IVec2::new(axis(px), axis(py))
    }

    /// Pixel width (and height) of the whole world in view space.
    pub fn world_extent(&self) -> i32 {
        self.world_offset * 2 * self.display_size
    }

    pub fn in_bounds(&self, wx: i32, wy: i32) -> bool {
        let range = -self.world_offset..self.world_offset;
        range.contains(&wx) && range.contains(&wy)
    }
}

impl Default for CoordTransform {
    fn default() -> Self {
        Self::new(crate::DISPLAY_SIZE as i32, crate::WORLD_OFFSET)
    }
}

// ── Camera ────────────────────────────────────────────────────────────────────

/// Scrollable window onto the view plane.
///
/// `scroll` is the view pixel shown at the top-left corner of the screen, so
/// `view = screen + scroll`.  Scrolling is clamped to the world's extent the
/// same way a canvas with a fixed scroll region behaves.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub transform: CoordTransform,
    /// View pixel at the top-left of the screen.
    pub scroll: IVec2,
    /// Visible area in screen pixels.
    pub viewport: IVec2,
}

impl Camera {
    pub fn new(transform: CoordTransform, viewport: IVec2) -> Self {
        let mut cam = Self { transform, scroll: IVec2::ZERO, viewport };
        cam.center_on(0, 0);
        cam
    }

    pub fn from_config(config: &EditorConfig) -> Self {
        Self::new(
            CoordTransform::new(config.display_size() as i32, config.world_offset),
            IVec2::new(config.viewport_width as i32, config.viewport_height as i32),
        )
    }

    /// Saturates, so far off-screen pointers land outside the world instead
    /// of wrapping.
    pub fn screen_to_view(&self, screen: IVec2) -> IVec2 {
        screen.saturating_add(self.scroll)
    }

    pub fn screen_to_world(&self, screen: IVec2) -> IVec2 {
        let view = self.screen_to_view(screen);
        self.transform.view_to_world(view.x, view.y)
    }

    /// Screen pixel of the top-left corner of world tile `(wx, wy)`.
    pub fn world_to_screen(&self, wx: i32, wy: i32) -> IVec2 {
        self.transform.world_to_view(wx, wy).saturating_sub(self.scroll)
    }

    /// Move so view pixel `target` sits at the top-left, clamped to the world.
    pub fn scroll_to(&mut self, target: IVec2) {
        let max = (IVec2::splat(self.transform.world_extent()) - self.viewport).max(IVec2::ZERO);
        self.scroll = target.clamp(IVec2::ZERO, max);
    }

    pub fn scroll_by(&mut self, delta: IVec2) {
        self.scroll_to(self.scroll.saturating_add(delta));
    }

    /// Scroll so the centre of world tile `(wx, wy)` is in the middle of the
    /// viewport (as far as the world edges allow).
    pub fn center_on(&mut self, wx: i32, wy: i32) {
        let half_tile = IVec2::splat(self.transform.display_size / 2);
        let tile_center = self.transform.world_to_view(wx, wy) + half_tile;
        self.scroll_to(tile_center - self.viewport / 2);
    }

    /// Inclusive world-tile rectangle `(min, max)` touched by the viewport.
    pub fn visible_world_rect(&self) -> (IVec2, IVec2) {
        let min = self.screen_to_world(IVec2::ZERO);
        let max = self.screen_to_world((self.viewport - IVec2::ONE).max(IVec2::ZERO));
        (min, max)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
