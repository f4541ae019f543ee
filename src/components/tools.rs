use eframe::egui;
use image::{Rgb, Rgba};

use crate::canvas::BACKGROUND;
use crate::components::colors;
use crate::session::Session;

pub const MIN_BRUSH_SIZE: u32 = 1;
pub const MAX_BRUSH_SIZE: u32 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Tool {
    #[default]
    Pen,
    Eraser,
    Bucket,
    Text,
}

impl Tool {
    pub fn all() -> &'static [Tool] {
        &[Tool::Pen, Tool::Eraser, Tool::Bucket, Tool::Text]
    }

    pub fn label(self) -> &'static str {
        match self {
            Tool::Pen => "Pen",
            Tool::Eraser => "Eraser",
            Tool::Bucket => "Bucket",
            Tool::Text => "Text",
        }
    }
}

/// How the eraser removes paint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum EraserMode {
    /// Background-coloured strokes, drawn like the pen.
    #[default]
    Stroke,
    /// Clears a `2 × brush size` square under every pointer sample.
    Area,
}

impl EraserMode {
    pub fn label(self) -> &'static str {
        match self {
            EraserMode::Stroke => "Stroke",
            EraserMode::Area => "Area",
        }
    }
}

/// Current tool selection, shared by every input handler through the session.
#[derive(Clone, Debug, PartialEq)]
pub struct ToolProperties {
    pub tool: Tool,
    pub color: Rgb<u8>,
    size: u32,
    pub eraser_mode: EraserMode,
}

impl Default for ToolProperties {
    fn default() -> Self {
        Self {
            tool: Tool::Pen,
            color: Rgb([0, 0, 0]),
            size: 5,
            eraser_mode: EraserMode::Stroke,
        }
    }
}

impl ToolProperties {
    pub fn set_color(&mut self, color: Rgb<u8>) {
        self.color = color;
    }

    /// Clamped to `MIN_BRUSH_SIZE..=MAX_BRUSH_SIZE`.
    pub fn set_brush_size(&mut self, size: u32) {
        self.size = size.clamp(MIN_BRUSH_SIZE, MAX_BRUSH_SIZE);
    }

    pub fn set_active_tool(&mut self, tool: Tool) {
        self.tool = tool;
    }

    pub fn set_eraser_mode(&mut self, mode: EraserMode) {
        self.eraser_mode = mode;
    }

    pub fn brush_size(&self) -> u32 {
        self.size
    }

    pub fn line_width(&self) -> u32 {
        self.size
    }

    /// Text height in pixels: twice the brush size in points, at 96 DPI.
    pub fn text_px(&self) -> f32 {
        (self.size * 2) as f32 * 96.0 / 72.0
    }

    /// Colour laid down by the active tool.
    pub fn paint_color(&self) -> Rgba<u8> {
        match self.tool {
            Tool::Eraser => BACKGROUND,
            _ => Rgba([self.color.0[0], self.color.0[1], self.color.0[2], 255]),
        }
    }
}

// ============================================================================
// STROKE TRACKER - the stroke cursor
// ============================================================================

/// Follows one drag gesture: where the pointer was last seen and whether the
/// stroke has already taken its undo snapshot.
#[derive(Default, Debug)]
pub struct StrokeTracker {
    last_pos: Option<(f32, f32)>,
    recorded: bool,
}

impl StrokeTracker {
    /// Move the cursor and return where it was.
    pub fn advance(&mut self, pos: (f32, f32)) -> Option<(f32, f32)> {
        self.last_pos.replace(pos)
    }

    /// True exactly once per stroke: the caller should snapshot now.
    pub fn needs_snapshot(&mut self) -> bool {
        !std::mem::replace(&mut self.recorded, true)
    }

    /// Make the next segment take a fresh snapshot without moving the cursor.
    /// Used after undo/redo so a drag in progress records again.
    pub fn reset_snapshot(&mut self) {
        self.recorded = false;
    }

    /// End the stroke (pointer released).
    pub fn finish(&mut self) {
        self.last_pos = None;
        self.recorded = false;
    }
}

// ============================================================================
// TOOLS PANEL - left toolbar
// ============================================================================

pub enum ToolsPanelAction {
    ClearAll,
}

#[derive(Default)]
pub struct ToolsPanel {
    /// Contents of the text-entry field used by the text tool.
    pub text_entry: String,
}

impl ToolsPanel {
    pub fn show(&mut self, ui: &mut egui::Ui, session: &mut Session) -> Option<ToolsPanelAction> {
        let mut action = None;

        ui.heading("Tools");
        for &tool in Tool::all() {
            let selected = session.tools.tool == tool;
            if ui.selectable_label(selected, tool.label()).clicked() {
                session.set_active_tool(tool);
            }
        }

        if session.tools.tool == Tool::Eraser {
            ui.horizontal(|ui| {
                for mode in [EraserMode::Stroke, EraserMode::Area] {
                    let selected = session.tools.eraser_mode == mode;
                    if ui.selectable_label(selected, mode.label()).clicked() {
                        session.tools.set_eraser_mode(mode);
                    }
                }
            });
        }

        ui.separator();
        if ui.button("Clear All").clicked() {
            action = Some(ToolsPanelAction::ClearAll);
        }

        ui.separator();
        let mut size = session.tools.brush_size();
        if ui
            .add(egui::Slider::new(&mut size, MIN_BRUSH_SIZE..=MAX_BRUSH_SIZE).text("Brush Size"))
            .changed()
        {
            session.set_brush_size(size);
        }

        ui.label("Text");
        ui.text_edit_singleline(&mut self.text_entry);

        ui.separator();
        if let Some(color) = colors::show_palette(ui, session.tools.color) {
            session.set_color(color);
        }

        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brush_size_is_clamped() {
        let mut props = ToolProperties::default();
        props.set_brush_size(0);
        assert_eq!(props.brush_size(), MIN_BRUSH_SIZE);
        props.set_brush_size(11);
        assert_eq!(props.brush_size(), MAX_BRUSH_SIZE);
        props.set_brush_size(7);
        assert_eq!(props.line_width(), 7);
    }

    #[test]
    fn eraser_paints_background() {
        let mut props = ToolProperties::default();
        props.set_color(Rgb([255, 0, 0]));
        assert_eq!(props.paint_color(), Rgba([255, 0, 0, 255]));
        props.set_active_tool(Tool::Eraser);
        assert_eq!(props.paint_color(), BACKGROUND);
    }

    #[test]
    fn text_size_follows_brush() {
        let mut props = ToolProperties::default();
        props.set_brush_size(3);
        assert!((props.text_px() - 8.0).abs() < 1e-4);
    }

    #[test]
    fn stroke_snapshots_once_until_finished() {
        let mut stroke = StrokeTracker::default();
        assert_eq!(stroke.advance((1.0, 1.0)), None);
        assert_eq!(stroke.advance((2.0, 3.0)), Some((1.0, 1.0)));
        assert!(stroke.needs_snapshot());
        assert!(!stroke.needs_snapshot());

        stroke.reset_snapshot();
        assert!(stroke.needs_snapshot());
        assert_eq!(stroke.advance((4.0, 4.0)), Some((2.0, 3.0)));

        stroke.finish();
        assert_eq!(stroke.advance((9.0, 9.0)), None);
        assert!(stroke.needs_snapshot());
    }
}
