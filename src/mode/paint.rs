use crate::editor::EditorState;
use crate::mode::{EditorMode, PanelContent, Palette, SidePanel};

/// Stamps the current brush onto the map and offers the atlas as a palette.
#[derive(Debug, Default)]
pub struct PaintMode;

impl PaintMode {
    pub const NAME: &'static str = "Paint";

    pub fn new() -> Self {
        Self
    }
}

impl EditorMode for PaintMode {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn status_hint(&self) -> &str {
        "LMB: Paint | Ctrl+LMB: Pan | Hotkeys: [P]aint"
    }

    fn on_activate(&mut self, state: &mut EditorState) {
        if let Some(brush) = state.brush() {
            state.set_message(&format!("Brush: tile {brush}"));
        }
    }

    fn on_click(&mut self, state: &mut EditorState, x: i32, y: i32) {
        state.paint(x, y);
    }

    fn on_drag(&mut self, state: &mut EditorState, x: i32, y: i32) {
        state.paint(x, y);
    }

    fn build_side_panel(&self, state: &EditorState) -> Option<SidePanel> {
        let content = match state.atlas() {
            Some(atlas) => PanelContent::Palette(Palette::new(
                atlas.tile_count(),
                state.brush(),
                state.config.display_size(),
                state.config.palette_width,
            )),
            None => PanelContent::Text(vec!["Load an atlas to begin".to_string()]),
        };
        Some(SidePanel {
            owner: Self::NAME.to_string(),
            title: "Tile Palette".to_string(),
            content,
        })
    }

    fn on_panel_select(&mut self, state: &mut EditorState, index: u32) {
        if state.set_brush(index) {
            state.set_message(&format!("Brush: tile {index}"));
        }
    }
}
