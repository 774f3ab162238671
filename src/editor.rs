// =============================================================================
// EDITOR.RS — Editor state and controller
//
// `EditorState` bundles everything modes are allowed to touch: the loaded
// atlas, the tile store, the brush, the camera, the status line.  `Editor`
// owns that state plus the mode registry, routes raw input to either a view
// pan or the active mode, and runs atlas/map I/O.
// =============================================================================

use std::path::Path;

use glam::IVec2;

use crate::atlas::{AtlasError, AtlasIndex};
use crate::camera::Camera;
use crate::config::EditorConfig;
use crate::input::{InputEvent, Modifiers, PointerButton};
use crate::map_file::{self, Diagnostic, MapDocument, MapError, MapHeader};
use crate::mode::{EditorMode, ModeRegistry, Overlay, PaintMode, SidePanel};
use crate::render::Surface;
use crate::tile_store::{TileChange, TileStore};

// ── EditorState ───────────────────────────────────────────────────────────────

/// Process-wide editing state handed to every mode hook.
pub struct EditorState {
    pub config: EditorConfig,
    pub camera: Camera,
    pub store: TileStore,
    /// Header of the most recently loaded map (empty until a load).
    pub header: MapHeader,
    atlas: Option<AtlasIndex>,
    brush: Option<u32>,
    /// Name and hint of the active mode, used to prefix status text.
    mode_label: (String, String),
    status: String,
    panel: Option<SidePanel>,
    overlay: Vec<Overlay>,
    changes: Vec<TileChange>,
}

impl EditorState {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            camera: Camera::from_config(&config),
            store: TileStore::new(config.world_offset),
            header: MapHeader::new(),
            atlas: None,
            brush: None,
            mode_label: (String::new(), String::new()),
            status: "Load an atlas to begin".to_string(),
            panel: None,
            overlay: Vec::new(),
            changes: Vec::new(),
            config,
        }
    }

    pub fn atlas(&self) -> Option<&AtlasIndex> {
        self.atlas.as_ref()
    }

    /// Current brush; `None` until an atlas is loaded.
    pub fn brush(&self) -> Option<u32> {
        self.brush
    }

    /// Select `index` as the brush if it resolves against the loaded atlas.
    pub fn set_brush(&mut self, index: u32) -> bool {
        match &self.atlas {
            Some(atlas) if atlas.contains(index) => {
                self.brush = Some(index);
                true
            }
            _ => false,
        }
    }

    /// Stamp the brush at world `(x, y)`.  Returns `true` if a cell changed.
    ///
    /// Does nothing without an atlas, outside the world, or when the cell
    /// already holds the brush.
    pub fn paint(&mut self, x: i32, y: i32) -> bool {
        let Some(brush) = self.brush else { return false };
        match self.store.set(x, y, brush) {
            Some(change) => {
                self.changes.push(change);
                true
            }
            None => false,
        }
    }

    /// Drain the tile changes recorded since the last call.
    pub fn take_changes(&mut self) -> Vec<TileChange> {
        std::mem::take(&mut self.changes)
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// `[Mode] message`, or `[Mode] hint` when `message` is `None`.
    pub fn update_status(&mut self, message: Option<&str>) {
        let (name, hint) = &self.mode_label;
        let text = message.unwrap_or(hint.as_str());
        self.status = format!("[{name}] {text}");
    }

    /// Shorthand for `update_status(Some(message))`.
    pub fn set_message(&mut self, message: &str) {
        self.update_status(Some(message));
    }

    pub fn side_panel(&self) -> Option<&SidePanel> {
        self.panel.as_ref()
    }

    pub fn overlay(&self) -> &[Overlay] {
        &self.overlay
    }

    fn replace_atlas(&mut self, atlas: AtlasIndex) {
        self.atlas = Some(atlas);
        self.brush = Some(0);
    }
}

// ── Gesture ───────────────────────────────────────────────────────────────────

/// How the primary button's current press is being interpreted.  Decided
/// once at press time and kept until release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    Idle,
    Panning { anchor: IVec2, scroll_at_mark: IVec2 },
    Editing,
}

// ── Reports ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct LoadReport {
    /// `name` header value, or `"Unknown"`.
    pub name: String,
    pub tile_count: usize,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveSummary {
    pub width: i32,
    pub height: i32,
    pub tile_count: usize,
}

// ── Editor ────────────────────────────────────────────────────────────────────

pub struct Editor {
    pub state: EditorState,
    modes: ModeRegistry,
    gesture: Gesture,
}

impl Editor {
    /// Editor with the built-in modes registered and Paint active.
    pub fn new(config: EditorConfig) -> Self {
        let mut editor = Self::bare(config);
        editor.register_mode("paint", Box::new(PaintMode::new()), Some('p'));
        editor.set_mode("paint");
        editor
    }

    /// Editor with no modes registered.
    pub fn bare(config: EditorConfig) -> Self {
        Self { state: EditorState::new(config), modes: ModeRegistry::new(), gesture: Gesture::Idle }
    }

    pub fn register_mode(&mut self, name: &str, mode: Box<dyn EditorMode>, hotkey: Option<char>) {
        self.modes.register(name, mode, hotkey);
    }

    pub fn modes(&self) -> &ModeRegistry {
        &self.modes
    }

    pub fn current_mode(&self) -> Option<&str> {
        self.modes.current_name()
    }

    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    /// Switch to `name`.  Unknown names are ignored and return `false`.
    ///
    /// Order: old `on_deactivate` → pointer update → new `on_activate` →
    /// side panel rebuild → overlay refresh → status refresh.
    pub fn set_mode(&mut self, name: &str) -> bool {
        if !self.modes.contains(name) {
            return false;
        }
        if let Some(old) = self.modes.current_mut() {
            old.on_deactivate(&mut self.state);
        }
        self.modes.make_current(name);
        if let Some(mode) = self.modes.current_mut() {
            self.state.mode_label = (mode.name().to_string(), mode.status_hint().to_string());
            mode.on_activate(&mut self.state);
        }
        self.rebuild_panel();
        self.refresh_overlay();
        self.state.update_status(None);
        log::debug!(target: "editor", "mode switched to {name}");
        true
    }

    pub fn rebuild_panel(&mut self) {
        self.state.panel = self.modes.current().and_then(|m| m.build_side_panel(&self.state));
    }

    pub fn refresh_overlay(&mut self) {
        self.state.overlay = self
            .modes
            .current()
            .map(|m| m.render_overlay(&self.state))
            .unwrap_or_default();
    }

    // ── Input ────────────────────────────────────────────────────────────────

    pub fn handle(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerDown { button, pos, modifiers } => self.pointer_down(button, pos, modifiers),
            InputEvent::PointerMove { pos } => self.pointer_move(pos),
            InputEvent::PointerUp { button, .. } => self.pointer_up(button),
            InputEvent::Char(c) => self.key_typed(c),
        }
    }

    pub fn key_typed(&mut self, key: char) {
        let Some(target) = self.modes.hotkey_target(key).map(str::to_string) else { return };
        self.set_mode(&target);
    }

    pub fn pointer_down(&mut self, button: PointerButton, pos: IVec2, modifiers: Modifiers) {
        match button {
            PointerButton::Primary => {
                if modifiers.contains(self.state.config.pan_modifier) {
                    self.gesture = Gesture::Panning { anchor: pos, scroll_at_mark: self.state.camera.scroll };
                    return;
                }
                self.gesture = Gesture::Editing;
                let w = self.state.camera.screen_to_world(pos);
                if let Some(mode) = self.modes.current_mut() {
                    mode.on_click(&mut self.state, w.x, w.y);
                }
            }
            PointerButton::Secondary => {
                if matches!(self.gesture, Gesture::Panning { .. }) {
                    return;
                }
                let w = self.state.camera.screen_to_world(pos);
                if let Some(mode) = self.modes.current_mut() {
                    mode.on_right_click(&mut self.state, w.x, w.y);
                }
            }
        }
        self.refresh_overlay();
    }

    pub fn pointer_move(&mut self, pos: IVec2) {
        match self.gesture {
            Gesture::Idle => {}
            Gesture::Panning { anchor, scroll_at_mark } => {
                self.state.camera.scroll_to(scroll_at_mark.saturating_sub(pos.saturating_sub(anchor)));
            }
            Gesture::Editing => {
                let w = self.state.camera.screen_to_world(pos);
                if let Some(mode) = self.modes.current_mut() {
                    mode.on_drag(&mut self.state, w.x, w.y);
                }
                self.refresh_overlay();
            }
        }
    }

    pub fn pointer_up(&mut self, button: PointerButton) {
        if button == PointerButton::Primary {
            self.gesture = Gesture::Idle;
        }
    }

    /// Forward a side-panel selection to the active mode, then rebuild the
    /// panel so its highlight follows.
    pub fn select_panel_entry(&mut self, index: u32) {
        if let Some(mode) = self.modes.current_mut() {
            mode.on_panel_select(&mut self.state, index);
        }
        self.rebuild_panel();
    }

    // ── Atlas & map I/O ──────────────────────────────────────────────────────

    /// Load and publish a new atlas.  On failure the previous atlas, brush
    /// and tiles are untouched and the error is shown in the status line.
    pub fn load_atlas(&mut self, path: impl AsRef<Path>) -> Result<u32, AtlasError> {
        let path = path.as_ref();
        let atlas = match AtlasIndex::load(path, self.state.config.sprite_size) {
            Ok(atlas) => atlas,
            Err(e) => {
                log::error!(target: "editor", "{e}");
                self.state.set_message(&format!("Error: {e}"));
                return Err(e);
            }
        };
        Ok(self.install_atlas(atlas))
    }

    /// Publish an already built atlas, resetting the brush to tile 0.
    pub fn install_atlas(&mut self, atlas: AtlasIndex) -> u32 {
        let tile_count = atlas.tile_count();
        let label = atlas.file_name().unwrap_or_else(|| "atlas".to_string());
        self.state.replace_atlas(atlas);

        let orphans = self.state.store.orphans(tile_count);
        for ((x, y), idx) in &orphans {
            log::warn!(target: "editor", "tile ({x}, {y}) references index {idx}, not in {label}");
        }

        self.rebuild_panel();
        self.refresh_overlay();
        let mut msg = format!("Loaded atlas: {label} ({tile_count} tiles)");
        if !orphans.is_empty() {
            msg.push_str(&format!(", {} unresolved map tiles", orphans.len()));
        }
        self.state.set_message(&msg);
        tile_count
    }

    /// Replace the map with the contents of `path`.
    ///
    /// Requires an atlas.  Malformed lines, orphan indices and out-of-world
    /// tiles are dropped and returned as diagnostics.  The view is centred
    /// on the loaded tiles, or on the origin when none survive.
    pub fn load_map(&mut self, path: impl AsRef<Path>) -> Result<LoadReport, MapError> {
        let path = path.as_ref();
        let result = self.load_map_inner(path);
        if let Err(e) = &result {
            log::warn!(target: "editor", "{e}");
            self.state.set_message(&format!("Error: {e}"));
        }
        result
    }

    fn load_map_inner(&mut self, path: &Path) -> Result<LoadReport, MapError> {
        let tile_count = self.state.atlas().map(AtlasIndex::tile_count).ok_or(MapError::NoAtlasLoaded)?;
        let text = std::fs::read_to_string(path)
            .map_err(|source| MapError::Read { path: path.to_path_buf(), source })?;

        let (doc, mut diagnostics) = MapDocument::parse(&text);
        self.state.store.clear();
        diagnostics.extend(doc.import_into(&mut self.state.store, tile_count));
        diagnostics.sort_by_key(Diagnostic::line);
        for d in &diagnostics {
            log::warn!(target: "map", "{}: {d}", path.display());
        }
        self.state.header = doc.header;
        self.state.changes.clear();

        let (cx, cy) = self.state.store.bounds().map(|b| b.center()).unwrap_or((0, 0));
        self.state.camera.center_on(cx, cy);

        let report = LoadReport {
            name: self.state.header.name().unwrap_or("Unknown").to_string(),
            tile_count: self.state.store.len(),
            diagnostics,
        };
        log::info!(target: "map", "loaded {} ({} tiles)", path.display(), report.tile_count);
        self.refresh_overlay();
        self.state.set_message(&format!("Loaded map: {} ({} tiles)", report.name, report.tile_count));
        Ok(report)
    }

    /// Write the map to `path`.  Refuses to save an empty map.
    pub fn save_map(&mut self, path: impl AsRef<Path>) -> Result<SaveSummary, MapError> {
        let path = path.as_ref();
        let result = self.save_map_inner(path);
        match &result {
            Ok(s) => {
                let file = path.file_name().map(|f| f.to_string_lossy().into_owned()).unwrap_or_default();
                log::info!(target: "map", "saved {} ({} tiles)", path.display(), s.tile_count);
                self.state.set_message(&format!(
                    "Saved: {file} ({}x{}, {} tiles)",
                    s.width, s.height, s.tile_count
                ));
            }
            Err(e) => {
                log::warn!(target: "editor", "{e}");
                self.state.set_message(&format!("Error: {e}"));
            }
        }
        result
    }

    fn save_map_inner(&self, path: &Path) -> Result<SaveSummary, MapError> {
        let store = &self.state.store;
        let bounds = store.bounds().ok_or(MapError::EmptyMap)?;
        let tileset = self.state.atlas().and_then(AtlasIndex::file_name);
        let text = map_file::write_map(store, tileset.as_deref())?;
        std::fs::write(path, text).map_err(|source| MapError::Write { path: path.to_path_buf(), source })?;
        Ok(SaveSummary { width: bounds.width(), height: bounds.height(), tile_count: store.len() })
    }

    // ── Rendering ────────────────────────────────────────────────────────────

    /// Draw every visible tile, then the active mode's overlay.
    ///
    /// Tiles whose index does not resolve against the loaded atlas are
    /// skipped.
    pub fn render(&self, surface: &mut dyn Surface) {
        let cam = &self.state.camera;
        let size = cam.transform.display_size.max(0) as u32;

        if let Some(atlas) = self.state.atlas() {
            let (min, max) = cam.visible_world_rect();
            for ((x, y), idx) in self.state.store.iter() {
                if x < min.x || x > max.x || y < min.y || y > max.y {
                    continue;
                }
                let Some(tile) = atlas.tile_at(idx) else { continue };
                let s = cam.world_to_screen(x, y);
                surface.draw_tile(tile, s.x, s.y, size);
            }
        }

        for item in &self.state.overlay {
            let (min_x, min_y, max_x, max_y) = match *item {
                Overlay::TileOutline { x, y } => (x, y, x, y),
                Overlay::RectOutline { min_x, min_y, max_x, max_y } => (min_x, min_y, max_x, max_y),
            };
            let s = cam.world_to_screen(min_x, min_y);
            let w = (max_x - min_x + 1).max(0) as u32 * size;
            let h = (max_y - min_y + 1).max(0) as u32 * size;
            surface.draw_outline(s.x, s.y, w, h);
        }
    }
}
