pub mod atlas;
pub mod camera;
pub mod config;
pub mod editor;
pub mod input;
pub mod loc;
pub mod map_file;
pub mod mode;
pub mod render;
pub mod script;
pub mod tile_store;

/// Edge length in pixels of one sprite inside an atlas.
pub const SPRITE_SIZE: u32 = 16;
/// Integer magnification applied when tiles are drawn in the map view.
pub const SCALE_FACTOR: u32 = 4;
/// On-screen footprint of one tile (`SPRITE_SIZE * SCALE_FACTOR`).
pub const DISPLAY_SIZE: u32 = SPRITE_SIZE * SCALE_FACTOR;

/// World coordinates span `-WORLD_OFFSET ..= WORLD_OFFSET - 1` on both axes.
pub const WORLD_OFFSET: i32 = 512;
/// Width and height of the addressable world in tiles.
pub const WORLD_SIZE: i32 = WORLD_OFFSET * 2;
