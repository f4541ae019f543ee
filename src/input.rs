// ============================================================================
// INPUT ROUTER - pointer events to per-tool handlers
// ============================================================================

use crate::components::tools::{EraserMode, Tool};
use crate::ops::shapes::square_bounds;
use crate::session::Session;

/// Text that shows the easter-egg dialog instead of drawing.
pub const EASTER_EGG_TEXT: &str = "DsMans0021";
pub const EASTER_EGG_TITLE: &str = "Easter Egg";
pub const EASTER_EGG_MESSAGE: &str = "You found the easter egg. You are great";

/// Pointer input in canvas pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    /// Motion with the primary button held.
    Drag { x: f32, y: f32 },
    /// Primary button released.
    Release,
    /// Press and release without motion.
    Click { x: f32, y: f32 },
}

/// What an event did to the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputOutcome {
    /// Nothing changed.
    Ignored,
    /// The canvas changed.
    Painted,
    /// The sentinel text was clicked; show the info dialog.
    EasterEgg,
    /// Text could not be drawn because no font is available.
    TextUnavailable,
}

impl Session {
    /// Route one pointer event to the handler of the active tool.
    /// `text_entry` is the current contents of the text field.
    pub fn handle_pointer(&mut self, event: PointerEvent, text_entry: &str) -> InputOutcome {
        let outcome = match (event, self.tools.tool) {
            (PointerEvent::Release, _) => {
                self.stroke.finish();
                InputOutcome::Ignored
            }
            (PointerEvent::Drag { x, y }, Tool::Pen) => self.stroke_to((x, y), "Pen Stroke"),
            (PointerEvent::Drag { x, y }, Tool::Eraser) => match self.tools.eraser_mode {
                EraserMode::Stroke => self.stroke_to((x, y), "Eraser Stroke"),
                EraserMode::Area => self.erase_area((x, y)),
            },
            (PointerEvent::Click { .. }, Tool::Bucket) => self.bucket_fill(),
            (PointerEvent::Click { x, y }, Tool::Text) => self.place_text((x, y), text_entry),
            _ => InputOutcome::Ignored,
        };
        if outcome == InputOutcome::Painted {
            self.mark_dirty();
        }
        outcome
    }

    /// Pen and stroke-eraser: connect the previous sample to this one.
    fn stroke_to(&mut self, pos: (f32, f32), description: &str) -> InputOutcome {
        let Some(prev) = self.stroke.advance(pos) else {
            return InputOutcome::Ignored;
        };
        if self.stroke.needs_snapshot() {
            self.history.record(&self.canvas, description);
        }
        let color = self.tools.paint_color();
        self.canvas
            .draw_segment(prev, pos, self.tools.line_width(), color);
        InputOutcome::Painted
    }

    /// Area eraser: clear the square around every sample, one snapshot per drag.
    fn erase_area(&mut self, pos: (f32, f32)) -> InputOutcome {
        self.stroke.advance(pos);
        let size = self.tools.brush_size();
        if square_bounds(pos, size, self.canvas.width, self.canvas.height).is_none() {
            return InputOutcome::Ignored;
        }
        if self.stroke.needs_snapshot() {
            self.history.record(&self.canvas, "Area Erase");
        }
        let color = self.tools.paint_color();
        self.canvas.fill_square(pos, size, color);
        InputOutcome::Painted
    }

    fn bucket_fill(&mut self) -> InputOutcome {
        self.history.record(&self.canvas, "Bucket Fill");
        let color = self.tools.paint_color();
        self.canvas.fill(color);
        InputOutcome::Painted
    }

    fn place_text(&mut self, pos: (f32, f32), text: &str) -> InputOutcome {
        if text == EASTER_EGG_TEXT {
            return InputOutcome::EasterEgg;
        }
        if text.is_empty() {
            return InputOutcome::Ignored;
        }
        let Some(mask) = self.glyphs.rasterize(text, self.tools.text_px()) else {
            return InputOutcome::TextUnavailable;
        };
        self.history.record(&self.canvas, "Text");
        self.canvas
            .blend_mask(&mask, pos.0 as i32, pos.1 as i32, self.tools.color);
        InputOutcome::Painted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::BACKGROUND;
    use crate::ops::text::{GlyphRasterizer, TextMask};
    use image::{Rgb, Rgba};

    /// Renders every string as a solid block, one column per character.
    struct BlockGlyphs;

    impl GlyphRasterizer for BlockGlyphs {
        fn rasterize(&self, text: &str, px_size: f32) -> Option<TextMask> {
            let width = text.chars().count() as u32;
            let height = px_size.round() as u32;
            Some(TextMask {
                width,
                height,
                coverage: vec![1.0; (width * height) as usize],
            })
        }
    }

    struct NoFont;

    impl GlyphRasterizer for NoFont {
        fn rasterize(&self, _: &str, _: f32) -> Option<TextMask> {
            None
        }
    }

    fn drag(session: &mut Session, points: &[(f32, f32)]) {
        for &(x, y) in points {
            session.handle_pointer(PointerEvent::Drag { x, y }, "");
        }
        session.handle_pointer(PointerEvent::Release, "");
    }

    #[test]
    fn first_drag_sample_only_moves_the_cursor() {
        let mut session = Session::new(20, 20);
        let outcome = session.handle_pointer(PointerEvent::Drag { x: 5.0, y: 5.0 }, "");
        assert_eq!(outcome, InputOutcome::Ignored);
        assert_eq!(session.history.undo_count(), 0);
        assert!(!session.is_modified());
        assert_eq!(session.canvas.pixel(5, 5), BACKGROUND);
    }

    #[test]
    fn one_drag_is_one_history_entry() {
        let mut session = Session::new(40, 40);
        drag(&mut session, &[(2.0, 2.0), (10.0, 2.0), (10.0, 20.0), (30.0, 30.0)]);
        assert_eq!(session.history.undo_count(), 1);
        assert_eq!(session.history.undo_description(), Some("Pen Stroke"));

        drag(&mut session, &[(5.0, 30.0), (6.0, 35.0)]);
        assert_eq!(session.history.undo_count(), 2);
    }

    #[test]
    fn release_breaks_the_segment_chain() {
        let mut session = Session::new(40, 40);
        session.set_brush_size(1);
        drag(&mut session, &[(0.0, 0.0), (5.0, 0.0)]);
        drag(&mut session, &[(30.0, 30.0), (35.0, 30.0)]);
        // Nothing joins (5,0) to (30,30).
        assert_eq!(session.canvas.pixel(17, 15), BACKGROUND);
    }

    #[test]
    fn stroke_eraser_paints_background() {
        let mut session = Session::new(30, 30);
        session.set_active_tool(Tool::Bucket);
        session.handle_pointer(PointerEvent::Click { x: 0.0, y: 0.0 }, "");

        session.set_active_tool(Tool::Eraser);
        drag(&mut session, &[(5.0, 15.0), (25.0, 15.0)]);
        assert_eq!(session.canvas.pixel(15, 15), BACKGROUND);
        assert_eq!(session.canvas.pixel(15, 2), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn area_eraser_clears_square_per_sample() {
        let mut session = Session::new(50, 50);
        session.set_active_tool(Tool::Bucket);
        session.handle_pointer(PointerEvent::Click { x: 0.0, y: 0.0 }, "");

        session.set_active_tool(Tool::Eraser);
        session.tools.set_eraser_mode(EraserMode::Area);
        session.set_brush_size(4);
        let outcome = session.handle_pointer(PointerEvent::Drag { x: 25.0, y: 25.0 }, "");
        assert_eq!(outcome, InputOutcome::Painted);
        session.handle_pointer(PointerEvent::Release, "");

        assert_eq!(session.canvas.pixel(21, 21), BACKGROUND);
        assert_eq!(session.canvas.pixel(29, 29), BACKGROUND);
        assert_eq!(session.canvas.pixel(19, 25), Rgba([0, 0, 0, 255]));
        assert_eq!(session.history.undo_count(), 2);
    }

    #[test]
    fn area_eraser_off_canvas_changes_nothing() {
        let mut session = Session::new(20, 20);
        session.set_active_tool(Tool::Eraser);
        session.tools.set_eraser_mode(EraserMode::Area);
        let generation = session.canvas.dirty_generation;

        let outcome = session.handle_pointer(PointerEvent::Drag { x: 500.0, y: 500.0 }, "");
        assert_eq!(outcome, InputOutcome::Ignored);
        assert_eq!(session.history.undo_count(), 0);
        assert!(!session.is_modified());
        assert_eq!(session.canvas.dirty_generation, generation);

        // Coming back onto the canvas in the same drag still records once.
        let outcome = session.handle_pointer(PointerEvent::Drag { x: 10.0, y: 10.0 }, "");
        assert_eq!(outcome, InputOutcome::Painted);
        assert_eq!(session.history.undo_count(), 1);
    }

    #[test]
    fn bucket_ignores_drags_and_pen_ignores_clicks() {
        let mut session = Session::new(10, 10);
        session.set_active_tool(Tool::Bucket);
        assert_eq!(
            session.handle_pointer(PointerEvent::Drag { x: 1.0, y: 1.0 }, ""),
            InputOutcome::Ignored
        );
        session.set_active_tool(Tool::Pen);
        assert_eq!(
            session.handle_pointer(PointerEvent::Click { x: 1.0, y: 1.0 }, ""),
            InputOutcome::Ignored
        );
        assert_eq!(session.history.undo_count(), 0);
    }

    #[test]
    fn text_is_drawn_at_click_in_current_color() {
        let mut session = Session::new(50, 50).with_rasterizer(Box::new(BlockGlyphs));
        session.set_active_tool(Tool::Text);
        session.set_color(Rgb([0, 128, 0]));
        session.set_brush_size(3); // 8 px tall

        let outcome = session.handle_pointer(PointerEvent::Click { x: 10.0, y: 20.0 }, "abc");
        assert_eq!(outcome, InputOutcome::Painted);
        assert_eq!(session.canvas.pixel(10, 20), Rgba([0, 128, 0, 255]));
        assert_eq!(session.canvas.pixel(12, 27), Rgba([0, 128, 0, 255]));
        assert_eq!(session.canvas.pixel(13, 20), BACKGROUND);
        assert_eq!(session.canvas.pixel(10, 28), BACKGROUND);
        assert_eq!(session.history.undo_description(), Some("Text"));
    }

    #[test]
    fn empty_text_is_ignored() {
        let mut session = Session::new(10, 10).with_rasterizer(Box::new(BlockGlyphs));
        session.set_active_tool(Tool::Text);
        let outcome = session.handle_pointer(PointerEvent::Click { x: 1.0, y: 1.0 }, "");
        assert_eq!(outcome, InputOutcome::Ignored);
        assert_eq!(session.history.undo_count(), 0);
    }

    #[test]
    fn missing_font_leaves_canvas_alone() {
        let mut session = Session::new(10, 10).with_rasterizer(Box::new(NoFont));
        session.set_active_tool(Tool::Text);
        let outcome = session.handle_pointer(PointerEvent::Click { x: 1.0, y: 1.0 }, "hello");
        assert_eq!(outcome, InputOutcome::TextUnavailable);
        assert_eq!(session.history.undo_count(), 0);
        assert!(!session.is_modified());
    }
}
