// =============================================================================
// MAP_FILE.RS — Line-oriented map format
//
//   name:Untitled          ┐
//   width:3                │ header: `key:value`, unknown keys kept
//   origin:-1,0            ┘
//   ---                      separator
//   -1,0,4,0,              ┐ tiles: x,y,atlasIndex[,extra...][,]
//   1,0,2,0,               ┘
//
// Blank lines and `#` comments are ignored in both sections.  A malformed
// tile line never aborts a load: it becomes a `Diagnostic` and parsing moves
// on to the next line.
// =============================================================================

use std::collections::BTreeMap;
use std::path::PathBuf;

use thiserror::Error;

use crate::tile_store::TileStore;

pub const SEPARATOR: &str = "---";
/// Name written on every save; names read from a file are not carried over.
pub const DEFAULT_MAP_NAME: &str = "Untitled";
/// `tileset` value written when no atlas path is known.
pub const UNKNOWN_TILESET: &str = "unknown";

// ── Errors & diagnostics ─────────────────────────────────────────────────────

/// Fatal map-operation failures.  Prior editor state is kept on any of them.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("failed to read map {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to save map {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("load an atlas first")]
    NoAtlasLoaded,
    #[error("map is empty, nothing to save")]
    EmptyMap,
}

impl MapError {
    /// `true` when the operation was refused before touching any file.
    pub fn is_precondition(&self) -> bool {
        matches!(self, MapError::NoAtlasLoaded | MapError::EmptyMap)
    }
}

/// Why a single tile line could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineError {
    #[error("expected at least 3 fields, found {0}")]
    TooFewFields(usize),
    #[error("{field} is not a valid integer: {value:?}")]
    NotAnInteger { field: &'static str, value: String },
}

/// Non-fatal problem found while loading; the offending entry is dropped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Diagnostic {
    #[error("line {line}: failed to parse tile: {error}")]
    MalformedLine { line: usize, error: LineError },
    #[error("line {line}: atlas index {index} not in loaded atlas")]
    OrphanTile { line: usize, x: i32, y: i32, index: i64 },
    #[error("line {line}: tile ({x}, {y}) is outside the world")]
    OutOfBounds { line: usize, x: i32, y: i32 },
}

impl Diagnostic {
    /// 1-based source line of the dropped entry.
    pub fn line(&self) -> usize {
        match self {
            Diagnostic::MalformedLine { line, .. }
            | Diagnostic::OrphanTile { line, .. }
            | Diagnostic::OutOfBounds { line, .. } => *line,
        }
    }
}

// ── MapHeader ─────────────────────────────────────────────────────────────────

/// Parsed header: every `key:value` pair, recognised or not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapHeader {
    entries: BTreeMap<String, String>,
}

impl MapHeader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn name(&self) -> Option<&str> {
        self.get("name")
    }

    pub fn tileset(&self) -> Option<&str> {
        self.get("tileset")
    }

    pub fn width(&self) -> Option<i32> {
        self.get("width")?.trim().parse().ok()
    }

    pub fn height(&self) -> Option<i32> {
        self.get("height")?.trim().parse().ok()
    }

    pub fn origin(&self) -> Option<(i32, i32)> {
        let (x, y) = self.get("origin")?.split_once(',')?;
        Some((x.trim().parse().ok()?, y.trim().parse().ok()?))
    }
}

// ── Line-level parsing ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRecord {
    pub x: i32,
    pub y: i32,
    /// Signed so a negative index reports as an orphan, not a parse error.
    pub index: i64,
}

/// Classification of one source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// Blank, comment, or a header line without `:`.
    Ignored,
    Separator,
    Header { key: String, value: String },
    Tile(TileRecord),
}

fn parse_field<T: std::str::FromStr>(field: &'static str, raw: &str) -> Result<T, LineError> {
    raw.trim().parse().map_err(|_| LineError::NotAnInteger { field, value: raw.trim().to_string() })
}

/// Parse the body of a tile line (`x,y,index[,extra...]`, trailing commas ok).
pub fn parse_tile(line: &str) -> Result<TileRecord, LineError> {
    let parts: Vec<&str> = line.trim().trim_end_matches(',').split(',').collect();
    if parts.len() < 3 {
        return Err(LineError::TooFewFields(parts.len()));
    }
    Ok(TileRecord {
        x: parse_field("x", parts[0])?,
        y: parse_field("y", parts[1])?,
        index: parse_field("atlas index", parts[2])?,
    })
}

/// Classify one line.  `in_tiles` says whether the separator was already seen.
pub fn classify_line(raw: &str, in_tiles: bool) -> Result<Line, LineError> {
    let line = raw.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(Line::Ignored);
    }
    if line == SEPARATOR {
        return Ok(Line::Separator);
    }
    if in_tiles {
        return parse_tile(line).map(Line::Tile);
    }
    Ok(match line.split_once(':') {
        Some((key, value)) => Line::Header {
            key: key.trim().to_string(),
            value: value.trim().to_string(),
        },
        None => Line::Ignored,
    })
}

/// Lazily classify every line of `text`, yielding `(line_number, result)`.
pub fn lines(text: &str) -> impl Iterator<Item = (usize, Result<Line, LineError>)> + '_ {
    let mut in_tiles = false;
    text.lines().enumerate().map(move |(i, raw)| {
        let parsed = classify_line(raw, in_tiles);
        if parsed == Ok(Line::Separator) {
            in_tiles = true;
        }
        (i + 1, parsed)
    })
}

// ── MapDocument ───────────────────────────────────────────────────────────────

/// Everything a map file contained, before checking it against an atlas.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapDocument {
    pub header: MapHeader,
    /// Tile records with their 1-based source line, in file order.
    pub tiles: Vec<(usize, TileRecord)>,
}

impl MapDocument {
    /// Parse `text`, collecting per-line failures instead of stopping.
    pub fn parse(text: &str) -> (Self, Vec<Diagnostic>) {
        let mut doc = Self::default();
        let mut diagnostics = Vec::new();
        for (line, parsed) in lines(text) {
            match parsed {
                Ok(Line::Header { key, value }) => doc.header.insert(key, value),
                Ok(Line::Tile(record)) => doc.tiles.push((line, record)),
                Ok(Line::Ignored | Line::Separator) => {}
                Err(error) => diagnostics.push(Diagnostic::MalformedLine { line, error }),
            }
        }
        (doc, diagnostics)
    }

    /// Copy every resolvable, in-bounds tile into `store`.
    ///
    /// Entries whose index is negative or `>= tile_count`, or whose
    /// coordinate lies outside the store's world, are dropped and reported.  Later lines win
    /// over earlier ones for the same coordinate.
    pub fn import_into(&self, store: &mut TileStore, tile_count: u32) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        for &(line, TileRecord { x, y, index }) in &self.tiles {
            let Some(index) = u32::try_from(index).ok().filter(|&i| i < tile_count) else {
                diagnostics.push(Diagnostic::OrphanTile { line, x, y, index });
                continue;
            };
            if store.in_bounds(x, y) {
                store.set(x, y, index);
            } else {
                diagnostics.push(Diagnostic::OutOfBounds { line, x, y });
            }
        }
        diagnostics
    }
}

// ── Writing ───────────────────────────────────────────────────────────────────

/// Serialize `store` with a freshly computed header.
///
/// The map name is always `DEFAULT_MAP_NAME`.  `tileset` falls back to
/// `UNKNOWN_TILESET` when `None`.
pub fn write_map(store: &TileStore, tileset: Option<&str>) -> Result<String, MapError> {
    let bounds = store.bounds().ok_or(MapError::EmptyMap)?;
    let mut out = String::new();
    out.push_str(&format!("name:{DEFAULT_MAP_NAME}\n"));
    out.push_str(&format!("width:{}\n", bounds.width()));
    out.push_str(&format!("height:{}\n", bounds.height()));
    out.push_str(&format!("origin:{},{}\n", bounds.min_x, bounds.min_y));
    out.push_str(&format!("tileset:{}\n", tileset.unwrap_or(UNKNOWN_TILESET)));
    out.push_str(SEPARATOR);
    out.push('\n');
    for ((x, y), index) in store.sorted_entries() {
        out.push_str(&format!("{x},{y},{index},0,\n"));
    }
    Ok(out)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
