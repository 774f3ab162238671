pub mod paint;

use std::collections::HashMap;

use crate::editor::EditorState;

pub use paint::PaintMode;

// ── Overlay & side panel data ────────────────────────────────────────────────
//
// Modes describe what they want drawn as plain data.  The host renders it;
// nothing here touches a drawing API, so mode output is testable directly.

/// A mode-specific mark drawn above the map tiles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    /// Outline around a single world tile.
    TileOutline { x: i32, y: i32 },
    /// Outline around an inclusive world-tile rectangle.
    RectOutline { min_x: i32, min_y: i32, max_x: i32, max_y: i32 },
}

/// Grid of selectable atlas tiles shown in a side panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    /// Number of entries (the atlas tile count).
    pub entries: u32,
    /// Highlighted entry, normally the current brush.
    pub selected: Option<u32>,
    /// Edge of one palette cell in panel pixels.
    pub cell_size: u32,
    /// Cells per row, derived from the panel width.
    pub per_row: u32,
}

impl Palette {
    pub fn new(entries: u32, selected: Option<u32>, cell_size: u32, panel_width: u32) -> Self {
        let per_row = (panel_width / cell_size.max(1)).max(1);
        Self { entries, selected, cell_size, per_row }
    }

    pub fn rows(&self) -> u32 {
        self.entries.div_ceil(self.per_row)
    }

    /// Top-left panel pixel of entry `index`.
    pub fn cell_origin(&self, index: u32) -> (u32, u32) {
        ((index % self.per_row) * self.cell_size, (index / self.per_row) * self.cell_size)
    }

    /// Entry under panel pixel `(px, py)`, if any.
    pub fn entry_at(&self, px: u32, py: u32) -> Option<u32> {
        let col = px / self.cell_size.max(1);
        if col >= self.per_row {
            return None;
        }
        let idx = (py / self.cell_size.max(1)) * self.per_row + col;
        (idx < self.entries).then_some(idx)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelContent {
    Palette(Palette),
    Text(Vec<String>),
}

/// Side panel description produced by a mode's `build_side_panel`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidePanel {
    /// Name of the mode that built this panel.
    pub owner: String,
    pub title: String,
    pub content: PanelContent,
}

// ── EditorMode ────────────────────────────────────────────────────────────────

/// One pluggable editing behaviour.
///
/// Every hook has an empty default, so a mode only implements what it uses.
/// Coordinates passed to the pointer hooks are world tile coordinates and
/// may lie outside the world; modes decide whether to ignore them.
pub trait EditorMode {
    fn name(&self) -> &str { "unnamed" }
    fn status_hint(&self) -> &str { "" }

    fn on_activate(&mut self, _state: &mut EditorState) {}
    fn on_deactivate(&mut self, _state: &mut EditorState) {}

    fn on_click(&mut self, _state: &mut EditorState, _x: i32, _y: i32) {}
    fn on_drag(&mut self, _state: &mut EditorState, _x: i32, _y: i32) {}
    fn on_right_click(&mut self, _state: &mut EditorState, _x: i32, _y: i32) {}

    fn render_overlay(&self, _state: &EditorState) -> Vec<Overlay> { Vec::new() }
    fn build_side_panel(&self, _state: &EditorState) -> Option<SidePanel> { None }
    /// Called when entry `index` of this mode's panel is chosen.
    fn on_panel_select(&mut self, _state: &mut EditorState, _index: u32) {}
}

// ── ModeRegistry ──────────────────────────────────────────────────────────────

/// Owns every registered mode, the hotkey table, and which mode is current.
///
/// The registry only tracks the pointer; the activation protocol lives in
/// `Editor::set_mode`, which also needs the editor state.
#[derive(Default)]
pub struct ModeRegistry {
    modes: HashMap<String, Box<dyn EditorMode>>,
    /// Registration order, for listing.
    order: Vec<String>,
    hotkeys: HashMap<char, String>,
    current: Option<String>,
}

impl ModeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `mode` under `name`.  Re-registering a name replaces the mode.
    pub fn register(&mut self, name: &str, mode: Box<dyn EditorMode>, hotkey: Option<char>) {
        if self.modes.insert(name.to_string(), mode).is_none() {
            self.order.push(name.to_string());
        }
        if let Some(key) = hotkey {
            self.hotkeys.insert(key.to_ascii_lowercase(), name.to_string());
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.modes.contains_key(name)
    }

    pub fn names(&self) -> &[String] {
        &self.order
    }

    /// Mode bound to `key` (case-insensitive), if any.
    pub fn hotkey_target(&self, key: char) -> Option<&str> {
        self.hotkeys.get(&key.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn current_name(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn current(&self) -> Option<&dyn EditorMode> {
        let name = self.current.as_ref()?;
        self.modes.get(name).map(|m| m.as_ref())
    }

    pub fn current_mut(&mut self) -> Option<&mut (dyn EditorMode + 'static)> {
        let name = self.current.as_ref()?;
        self.modes.get_mut(name).map(|m| m.as_mut())
    }

    /// Point `current` at `name`.  Returns `false` if it is not registered.
    pub(crate) fn make_current(&mut self, name: &str) -> bool {
        if !self.contains(name) {
            return false;
        }
        self.current = Some(name.to_string());
        true
    }
}
