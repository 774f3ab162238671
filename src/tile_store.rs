// =============================================================================
// TILE_STORE.RS — Sparse world-coordinate → atlas-index map
//
// The world is large (1024×1024 tiles by default) and mostly empty, so tiles
// live in a hash map keyed by `(x, y)`.  Deterministic order is only needed
// when serializing, which sorts on demand.
// =============================================================================

use std::collections::HashMap;

/// Emitted by `TileStore::set` whenever a cell actually changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileChange {
    pub x: i32,
    pub y: i32,
    pub old: Option<u32>,
    pub new: u32,
}

/// Tight inclusive bounding box over the populated cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl Bounds {
    pub fn width(&self) -> i32 {
        self.max_x - self.min_x + 1
    }

    pub fn height(&self) -> i32 {
        self.max_y - self.min_y + 1
    }

    /// Midpoint, rounded toward negative infinity.
    pub fn center(&self) -> (i32, i32) {
        (
            (self.min_x + self.max_x).div_euclid(2),
            (self.min_y + self.max_y).div_euclid(2),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TileStore {
    tiles: HashMap<(i32, i32), u32>,
    world_offset: i32,
}

impl TileStore {
    /// Empty store accepting coordinates in `-world_offset ..= world_offset - 1`.
    pub fn new(world_offset: i32) -> Self {
        Self { tiles: HashMap::new(), world_offset }
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        let range = -self.world_offset..self.world_offset;
        range.contains(&x) && range.contains(&y)
    }

    /// Stamp `index` at `(x, y)`.
    ///
    /// Returns `None` (and leaves the store untouched) when the coordinate is
    /// outside the world or the cell already holds `index`.
    pub fn set(&mut self, x: i32, y: i32, index: u32) -> Option<TileChange> {
        if !self.in_bounds(x, y) {
            return None;
        }
        let old = self.tiles.insert((x, y), index);
        if old == Some(index) {
            return None;
        }
        Some(TileChange { x, y, old, new: index })
    }

    pub fn get(&self, x: i32, y: i32) -> Option<u32> {
        self.tiles.get(&(x, y)).copied()
    }

    pub fn clear(&mut self) {
        self.tiles.clear();
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// `None` when empty, otherwise the tight box over every key.
    pub fn bounds(&self) -> Option<Bounds> {
        let mut keys = self.tiles.keys();
        let &(x0, y0) = keys.next()?;
        let init = Bounds { min_x: x0, min_y: y0, max_x: x0, max_y: y0 };
        Some(keys.fold(init, |b, &(x, y)| Bounds {
            min_x: b.min_x.min(x),
            min_y: b.min_y.min(y),
            max_x: b.max_x.max(x),
            max_y: b.max_y.max(y),
        }))
    }

    /// Unordered iteration, for rendering.
    pub fn iter(&self) -> impl Iterator<Item = ((i32, i32), u32)> + '_ {
        self.tiles.iter().map(|(&k, &v)| (k, v))
    }

    /// Entries in ascending `(x, y)` order, for serialization.
    pub fn sorted_entries(&self) -> Vec<((i32, i32), u32)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_unstable_by_key(|&(k, _)| k);
        entries
    }

    /// Entries whose index is not below `tile_count`, sorted.
    pub fn orphans(&self, tile_count: u32) -> Vec<((i32, i32), u32)> {
        let mut out: Vec<_> = self.iter().filter(|&(_, idx)| idx >= tile_count).collect();
        out.sort_unstable_by_key(|&(k, _)| k);
        out
    }
}

impl Default for TileStore {
    fn default() -> Self {
        Self::new(crate::WORLD_OFFSET)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overwrite_reports_old_value() {
        let mut s = TileStore::default();
        s.set(1, 1, 3);
        let change = s.set(1, 1, 7).unwrap();
        assert_eq!(change.old, Some(3));
        assert_eq!(change.new, 7);
    }

    #[test]
    fn bounds_center_floors() {
        let b = Bounds { min_x: -3, min_y: 0, max_x: 0, max_y: 1 };
        assert_eq!(b.center(), (-2, 0));
        assert_eq!(b.width(), 4);
        assert_eq!(b.height(), 2);
    }

    #[test]
    fn orphans_lists_unresolvable_indices() {
        let mut s = TileStore::default();
        s.set(0, 0, 1);
        s.set(2, 0, 5);
        s.set(1, 0, 9);
        assert_eq!(s.orphans(4), vec![((1, 0), 9), ((2, 0), 5)]);
    }
}
