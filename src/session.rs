use image::Rgb;
use std::path::{Path, PathBuf};

use crate::canvas::CanvasState;
use crate::components::history::HistoryManager;
use crate::components::tools::{StrokeTracker, Tool, ToolProperties};
use crate::io::{self, FileHandler, PersistError};
use crate::ops::text::{GlyphRasterizer, SystemFont};
use crate::settings::AppSettings;

/// One painting session: the canvas, its history, the tool selection and
/// where the work is saved. Input handlers and the UI borrow it; nothing
/// about the painting lives anywhere else.
pub struct Session {
    pub canvas: CanvasState,
    pub history: HistoryManager,
    pub tools: ToolProperties,
    pub file_handler: FileHandler,
    pub(crate) stroke: StrokeTracker,
    pub(crate) glyphs: Box<dyn GlyphRasterizer>,
    is_dirty: bool,
}

impl Session {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            canvas: CanvasState::new(width, height),
            history: HistoryManager::default(),
            tools: ToolProperties::default(),
            file_handler: FileHandler::default(),
            stroke: StrokeTracker::default(),
            glyphs: Box::new(SystemFont::new()),
            is_dirty: false,
        }
    }

    pub fn from_settings(settings: &AppSettings) -> Self {
        let mut session = Self::new(settings.canvas_width, settings.canvas_height);
        session.history = HistoryManager::new(settings.max_undo_steps);
        session.tools.set_brush_size(settings.brush_size);
        session.file_handler = FileHandler::new(PathBuf::from(&settings.default_save_name));
        session
    }

    /// Swap the text renderer (tests use a fake one).
    pub fn with_rasterizer(mut self, glyphs: Box<dyn GlyphRasterizer>) -> Self {
        self.glyphs = glyphs;
        self
    }

    // --- Tool state ---------------------------------------------------------

    pub fn set_color(&mut self, color: Rgb<u8>) {
        self.tools.set_color(color);
    }

    pub fn set_brush_size(&mut self, size: u32) {
        self.tools.set_brush_size(size);
    }

    pub fn set_active_tool(&mut self, tool: Tool) {
        self.tools.set_active_tool(tool);
    }

    // --- Modified flag ------------------------------------------------------

    pub fn is_modified(&self) -> bool {
        self.is_dirty
    }

    pub fn mark_dirty(&mut self) {
        self.is_dirty = true;
    }

    pub fn mark_clean(&mut self) {
        self.is_dirty = false;
    }

    /// Whether closing the window should first ask to save.
    pub fn needs_save_prompt(&self, settings: &AppSettings) -> bool {
        settings.confirm_on_exit && self.is_dirty
    }

    /// Window title with a dirty marker.
    pub fn display_title(&self) -> String {
        let name = self
            .file_handler
            .current_path
            .as_deref()
            .and_then(Path::file_name)
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "Untitled".to_string());
        if self.is_dirty {
            format!("Painter - {}*", name)
        } else {
            format!("Painter - {}", name)
        }
    }

    // --- History ------------------------------------------------------------

    pub fn undo(&mut self) -> bool {
        let undone = self.history.undo(&mut self.canvas);
        if undone {
            self.stroke.reset_snapshot();
            log_info!("Undo ({} left)", self.history.undo_count());
            self.mark_dirty();
        }
        undone
    }

    pub fn redo(&mut self) -> bool {
        let redone = self.history.redo(&mut self.canvas);
        if redone {
            self.stroke.reset_snapshot();
            log_info!("Redo ({} left)", self.history.redo_count());
            self.mark_dirty();
        }
        redone
    }

    /// Blank the canvas (Clear All).
    pub fn clear(&mut self) {
        self.history.record(&self.canvas, "Clear All");
        self.canvas.clear();
        self.mark_dirty();
        log_info!("Canvas cleared");
    }

    // --- Persistence --------------------------------------------------------

    /// Write the canvas to `path` and make it the current file.
    pub fn save(&mut self, path: &Path) -> Result<(), PersistError> {
        io::save_png(self.canvas.image(), path)?;
        self.file_handler.current_path = Some(path.to_path_buf());
        self.mark_clean();
        log_info!("Saved {}", path.display());
        Ok(())
    }

    /// File → Save: the current file, or the default target.
    pub fn save_default(&mut self) -> Result<PathBuf, PersistError> {
        let path = self.file_handler.save_target().to_path_buf();
        self.save(&path)?;
        Ok(path)
    }

    /// Replace the canvas with the image at `path`. The previous image stays
    /// reachable through undo. On error nothing changes.
    pub fn open(&mut self, path: &Path) -> Result<(), PersistError> {
        let image = io::load_image(path)?;
        self.history.record(&self.canvas, "Open Image");
        self.canvas.replace_image(image);
        self.stroke.finish();
        self.file_handler.current_path = Some(path.to_path_buf());
        self.mark_clean();
        log_info!(
            "Opened {} ({}x{})",
            path.display(),
            self.canvas.width,
            self.canvas.height
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_shape_new_session() {
        let settings = AppSettings {
            canvas_width: 320,
            canvas_height: 200,
            brush_size: 9,
            max_undo_steps: 3,
            default_save_name: "doodle.png".to_string(),
            confirm_on_exit: true,
        };
        let session = Session::from_settings(&settings);
        assert_eq!((session.canvas.width, session.canvas.height), (320, 200));
        assert_eq!(session.tools.brush_size(), 9);
        assert_eq!(session.file_handler.save_target(), Path::new("doodle.png"));
        assert!(!session.is_modified());
    }

    #[test]
    fn clear_is_undoable_and_marks_dirty() {
        let mut session = Session::new(10, 10);
        session.canvas.fill(image::Rgba([0, 0, 0, 255]));
        let before = session.canvas.image().clone();

        session.clear();
        assert!(session.is_modified());
        assert_eq!(session.history.undo_count(), 1);

        assert!(session.undo());
        assert_eq!(session.canvas.image(), &before);
    }

    #[test]
    fn save_prompt_respects_setting() {
        let mut session = Session::new(4, 4);
        let mut settings = AppSettings::default();
        assert!(!session.needs_save_prompt(&settings));
        session.mark_dirty();
        assert!(session.needs_save_prompt(&settings));
        settings.confirm_on_exit = false;
        assert!(!session.needs_save_prompt(&settings));
    }

    #[test]
    fn title_shows_file_and_dirty_marker() {
        let mut session = Session::new(4, 4);
        assert_eq!(session.display_title(), "Painter - Untitled");
        session.file_handler.current_path = Some(PathBuf::from("/x/cat.png"));
        session.mark_dirty();
        assert_eq!(session.display_title(), "Painter - cat.png*");
    }

    #[test]
    fn failed_open_changes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::new(6, 6);
        session.mark_dirty();
        let generation = session.canvas.dirty_generation;

        assert!(session.open(&dir.path().join("missing.png")).is_err());
        assert_eq!(session.canvas.dirty_generation, generation);
        assert_eq!(session.history.undo_count(), 0);
        assert!(session.is_modified());
        assert!(session.file_handler.current_path.is_none());
    }
}
