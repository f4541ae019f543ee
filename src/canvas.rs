use eframe::egui;
use egui::{Pos2, Rect, Vec2};
use image::{Rgb, Rgba, RgbaImage};
use rayon::prelude::*;

use crate::ops::shapes::{capsule_bounds, sdf_line_segment, square_bounds};
use crate::ops::text::TextMask;

/// Paper colour of a blank canvas; also what the eraser paints.
pub const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

pub const DEFAULT_WIDTH: u32 = 800;
pub const DEFAULT_HEIGHT: u32 = 600;

// ============================================================================
// CANVAS STATE - the raster model
// ============================================================================

/// The authoritative bitmap. Everything that is saved comes from here, and
/// the on-screen texture is re-uploaded from here whenever
/// `dirty_generation` moves.
#[derive(Clone)]
pub struct CanvasState {
    pub width: u32,
    pub height: u32,
    image: RgbaImage,
    /// Monotonically increasing counter, bumped on each mutation.
    pub dirty_generation: u64,
}

impl CanvasState {
    pub fn new(width: u32, height: u32) -> Self {
        Self::from_image(RgbaImage::from_pixel(width, height, BACKGROUND))
    }

    pub fn from_image(image: RgbaImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            image,
            dirty_generation: 0,
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        *self.image.get_pixel(x, y)
    }

    pub fn mark_dirty(&mut self) {
        self.dirty_generation = self.dirty_generation.wrapping_add(1);
    }

    /// Swap in a whole new image (open, undo, redo, clear) and hand back the
    /// previous one. Dimensions follow the new image.
    pub fn replace_image(&mut self, image: RgbaImage) -> RgbaImage {
        self.width = image.width();
        self.height = image.height();
        let previous = std::mem::replace(&mut self.image, image);
        self.mark_dirty();
        previous
    }

    /// Reset to a blank canvas of the current size.
    pub fn clear(&mut self) {
        let blank = RgbaImage::from_pixel(self.width, self.height, BACKGROUND);
        self.replace_image(blank);
    }

    /// Paint every pixel with `color`.
    pub fn fill(&mut self, color: Rgba<u8>) {
        let raw: &mut [u8] = &mut self.image;
        raw.par_chunks_mut(4)
            .for_each(|px| px.copy_from_slice(&color.0));
        self.mark_dirty();
    }

    /// Rasterize a straight segment of `line_width` pixels with round caps.
    /// Pixel centres sit on integer coordinates; a pixel is painted when its
    /// centre lies within `line_width / 2` of the segment.
    pub fn draw_segment(&mut self, from: (f32, f32), to: (f32, f32), line_width: u32, color: Rgba<u8>) {
        let radius = line_width.max(1) as f32 / 2.0;
        let Some((x0, y0, x1, y1)) = capsule_bounds(from, to, radius, self.width, self.height) else {
            return;
        };
        for y in y0..=y1 {
            for x in x0..=x1 {
                let d = sdf_line_segment(x as f32, y as f32, from.0, from.1, to.0, to.1);
                if d <= radius {
                    self.image.put_pixel(x, y, color);
                }
            }
        }
        self.mark_dirty();
    }

    /// Paint the square of side `2 * half` centred on `center`.
    pub fn fill_square(&mut self, center: (f32, f32), half: u32, color: Rgba<u8>) {
        let Some((x0, y0, x1, y1)) = square_bounds(center, half, self.width, self.height) else {
            return;
        };
        let stride = self.width as usize * 4;
        let (span_start, span_end) = (x0 as usize * 4, (x1 as usize + 1) * 4);
        let raw: &mut [u8] = &mut self.image;
        raw.par_chunks_mut(stride)
            .skip(y0 as usize)
            .take((y1 - y0 + 1) as usize)
            .for_each(|row| {
                for px in row[span_start..span_end].chunks_mut(4) {
                    px.copy_from_slice(&color.0);
                }
            });
        self.mark_dirty();
    }

    /// Composite a coverage mask in `color` with its top-left at `(x, y)`.
    /// Parts of the mask that fall off the canvas are dropped.
    pub fn blend_mask(&mut self, mask: &TextMask, x: i32, y: i32, color: Rgb<u8>) {
        for my in 0..mask.height {
            let cy = y + my as i32;
            if cy < 0 || cy >= self.height as i32 {
                continue;
            }
            for mx in 0..mask.width {
                let cx = x + mx as i32;
                if cx < 0 || cx >= self.width as i32 {
                    continue;
                }
                let a = mask.coverage_at(mx, my).clamp(0.0, 1.0);
                if a <= 0.0 {
                    continue;
                }
                let dst = self.image.get_pixel_mut(cx as u32, cy as u32);
                for c in 0..3 {
                    dst.0[c] = (color.0[c] as f32 * a + dst.0[c] as f32 * (1.0 - a)).round() as u8;
                }
                dst.0[3] = (255.0 * a + dst.0[3] as f32 * (1.0 - a)).round() as u8;
            }
        }
        self.mark_dirty();
    }
}

// ============================================================================
// CANVAS - the on-screen display of a CanvasState
// ============================================================================

/// Holds the GPU texture mirroring a `CanvasState`. The texture is only
/// re-uploaded when the state's generation differs from the last upload,
/// so the display is always a pure function of the model.
#[derive(Default)]
pub struct Canvas {
    texture: Option<egui::TextureHandle>,
    uploaded_generation: Option<u64>,
    uploaded_size: (u32, u32),
    /// Screen rect the canvas occupied last frame.
    pub last_canvas_rect: Option<Rect>,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    fn sync_texture(&mut self, ctx: &egui::Context, state: &CanvasState) {
        let size = (state.width, state.height);
        if self.texture.is_some()
            && self.uploaded_generation == Some(state.dirty_generation)
            && self.uploaded_size == size
        {
            return;
        }
        let color_image = egui::ColorImage::from_rgba_unmultiplied(
            [state.width as usize, state.height as usize],
            state.image().as_raw(),
        );
        match self.texture.as_mut() {
            Some(texture) => texture.set(color_image, egui::TextureOptions::NEAREST),
            None => {
                self.texture =
                    Some(ctx.load_texture("canvas", color_image, egui::TextureOptions::NEAREST));
            }
        }
        self.uploaded_generation = Some(state.dirty_generation);
        self.uploaded_size = size;
    }

    /// Draw the canvas at 1:1 and return the interaction response.
    pub fn show(&mut self, ui: &mut egui::Ui, state: &CanvasState) -> egui::Response {
        self.sync_texture(ui.ctx(), state);

        let size = Vec2::new(state.width as f32, state.height as f32);
        let (rect, response) = ui.allocate_exact_size(size, egui::Sense::click_and_drag());
        if let Some(texture) = &self.texture {
            ui.painter().image(
                texture.id(),
                rect,
                Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                egui::Color32::WHITE,
            );
        }
        self.last_canvas_rect = Some(rect);
        response
    }

    /// Translate a screen position into canvas pixel coordinates.
    pub fn to_canvas_pos(&self, screen: Pos2) -> Option<(f32, f32)> {
        let rect = self.last_canvas_rect?;
        Some(screen_to_canvas(rect.min, screen))
    }
}

pub fn screen_to_canvas(origin: Pos2, screen: Pos2) -> (f32, f32) {
    let local = screen - origin;
    (local.x.floor(), local.y.floor())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

    #[test]
    fn new_canvas_is_background() {
        let state = CanvasState::new(16, 8);
        assert_eq!((state.width, state.height), (16, 8));
        assert!(state.image().pixels().all(|p| *p == BACKGROUND));
    }

    #[test]
    fn vertical_segment_has_brush_width() {
        let mut state = CanvasState::new(64, 64);
        state.draw_segment((10.0, 10.0), (10.0, 50.0), 5, BLACK);
        for y in 10..=50 {
            for x in 8..=12 {
                assert_eq!(state.pixel(x, y), BLACK, "({x}, {y})");
            }
            assert_eq!(state.pixel(7, y), BACKGROUND);
            assert_eq!(state.pixel(13, y), BACKGROUND);
        }
    }

    #[test]
    fn thin_diagonal_segment_is_connected() {
        let mut state = CanvasState::new(32, 32);
        state.draw_segment((0.0, 0.0), (20.0, 10.0), 1, BLACK);
        for x in 0..=20 {
            let painted = (0..32).any(|y| state.pixel(x, y) == BLACK);
            assert!(painted, "column {x} has a gap");
        }
    }

    #[test]
    fn segment_partly_off_canvas_is_clipped() {
        let mut state = CanvasState::new(20, 20);
        state.draw_segment((-10.0, 5.0), (30.0, 5.0), 3, BLACK);
        assert!((0..20).all(|x| state.pixel(x, 5) == BLACK));
        assert_eq!(state.pixel(0, 8), BACKGROUND);
    }

    #[test]
    fn mutations_bump_generation() {
        let mut state = CanvasState::new(4, 4);
        let g0 = state.dirty_generation;
        state.fill(BLACK);
        assert!(state.dirty_generation > g0);
        let g1 = state.dirty_generation;
        state.clear();
        assert!(state.dirty_generation > g1);
        assert!(state.image().pixels().all(|p| *p == BACKGROUND));
    }

    #[test]
    fn fill_square_covers_twice_half() {
        let mut state = CanvasState::new(40, 40);
        state.fill(BLACK);
        state.fill_square((20.0, 20.0), 3, BACKGROUND);
        assert_eq!(state.pixel(17, 17), BACKGROUND);
        assert_eq!(state.pixel(23, 23), BACKGROUND);
        assert_eq!(state.pixel(16, 20), BLACK);
        assert_eq!(state.pixel(24, 20), BLACK);
    }

    #[test]
    fn fill_square_at_corner_is_clipped() {
        let mut state = CanvasState::new(10, 10);
        state.fill(BLACK);
        state.fill_square((0.0, 0.0), 2, BACKGROUND);
        assert_eq!(state.pixel(0, 0), BACKGROUND);
        assert_eq!(state.pixel(2, 2), BACKGROUND);
        assert_eq!(state.pixel(3, 0), BLACK);
    }

    #[test]
    fn mask_blends_over_background() {
        let mut state = CanvasState::new(4, 4);
        let mask = TextMask {
            width: 2,
            height: 1,
            coverage: vec![1.0, 0.5],
        };
        state.blend_mask(&mask, 1, 2, Rgb([0, 0, 255]));
        assert_eq!(state.pixel(1, 2), Rgba([0, 0, 255, 255]));
        assert_eq!(state.pixel(2, 2), Rgba([128, 128, 255, 255]));
        assert_eq!(state.pixel(3, 2), BACKGROUND);
    }

    #[test]
    fn replace_image_follows_new_size() {
        let mut state = CanvasState::new(4, 4);
        let old = state.replace_image(RgbaImage::from_pixel(7, 3, BLACK));
        assert_eq!((old.width(), old.height()), (4, 4));
        assert_eq!((state.width, state.height), (7, 3));
    }

    #[test]
    fn screen_positions_are_floored_relative_to_origin() {
        let origin = Pos2::new(100.0, 40.0);
        assert_eq!(screen_to_canvas(origin, Pos2::new(110.7, 90.2)), (10.0, 50.0));
    }
}
