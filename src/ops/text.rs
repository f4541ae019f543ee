use ab_glyph::{point, Font, FontArc, GlyphId, ScaleFont};
use std::cell::OnceCell;

/// Single-channel coverage buffer for a rendered string.
/// `coverage` is row-major, `width * height` long, values in `0.0..=1.0`.
#[derive(Clone, Debug, PartialEq)]
pub struct TextMask {
    pub width: u32,
    pub height: u32,
    pub coverage: Vec<f32>,
}

impl TextMask {
    pub fn coverage_at(&self, x: u32, y: u32) -> f32 {
        if x < self.width && y < self.height {
            self.coverage[(y * self.width + x) as usize]
        } else {
            0.0
        }
    }
}

/// Turns a string into a coverage mask whose top-left corner is the text's
/// anchor point. `None` means no font is available.
pub trait GlyphRasterizer {
    fn rasterize(&self, text: &str, px_size: f32) -> Option<TextMask>;
}

/// Lay out one line of text at `px_size`, returning `(glyph, x, baseline_y)`
/// triples and the total advance width. Glyphs start at x = 0 and the
/// baseline sits one ascent below the top.
pub fn layout_line(font: &FontArc, text: &str, px_size: f32) -> (Vec<(GlyphId, f32, f32)>, f32) {
    let scaled = font.as_scaled(px_size);
    let ascent = scaled.ascent();

    let mut glyphs = Vec::with_capacity(text.len());
    let mut cursor_x = 0.0f32;
    let mut last: Option<GlyphId> = None;
    for ch in text.chars() {
        let id = font.glyph_id(ch);
        if let Some(prev) = last {
            cursor_x += scaled.kern(prev, id);
        }
        glyphs.push((id, cursor_x, ascent));
        cursor_x += scaled.h_advance(id);
        last = Some(id);
    }
    (glyphs, cursor_x)
}

/// Rasterize `text` with `font` into a coverage mask. Multi-line text is
/// joined into one line; the entry field only produces single lines anyway.
pub fn rasterize_with_font(font: &FontArc, text: &str, px_size: f32) -> Option<TextMask> {
    let line: String = text.lines().collect::<Vec<_>>().join(" ");
    let scaled = font.as_scaled(px_size);
    let (glyphs, advance) = layout_line(font, &line, px_size);

    let width = advance.ceil().max(1.0) as u32;
    let height = scaled.height().ceil().max(1.0) as u32;
    let mut coverage = vec![0.0f32; (width * height) as usize];

    for (id, gx, gy) in glyphs {
        let glyph = id.with_scale_and_position(px_size, point(gx, gy));
        let Some(outlined) = font.outline_glyph(glyph) else {
            continue; // whitespace
        };
        let bounds = outlined.px_bounds();
        outlined.draw(|px, py, cov| {
            let x = bounds.min.x as i32 + px as i32;
            let y = bounds.min.y as i32 + py as i32;
            if x >= 0 && y >= 0 && (x as u32) < width && (y as u32) < height {
                let idx = (y as u32 * width + x as u32) as usize;
                coverage[idx] = coverage[idx].max(cov);
            }
        });
    }

    Some(TextMask { width, height, coverage })
}

/// The system's default sans-serif face, looked up on first use.
#[derive(Default)]
pub struct SystemFont {
    font: OnceCell<Option<FontArc>>,
}

impl SystemFont {
    pub fn new() -> Self {
        Self::default()
    }

    fn font(&self) -> Option<&FontArc> {
        self.font
            .get_or_init(|| {
                let font = load_default_font();
                if font.is_none() {
                    log_warn!("No system sans-serif font found; text tool disabled");
                }
                font
            })
            .as_ref()
    }
}

impl GlyphRasterizer for SystemFont {
    fn rasterize(&self, text: &str, px_size: f32) -> Option<TextMask> {
        rasterize_with_font(self.font()?, text, px_size)
    }
}

/// Load the platform's preferred sans-serif font through font-kit.
pub fn load_default_font() -> Option<FontArc> {
    use font_kit::family_name::FamilyName;
    use font_kit::properties::Properties;
    use font_kit::source::SystemSource;

    let handle = SystemSource::new()
        .select_best_match(&[FamilyName::SansSerif], &Properties::new())
        .ok()?;
    let font_data = handle.load().ok()?;
    let bytes: Vec<u8> = (*font_data.copy_font_data()?).clone();
    FontArc::try_from_vec(bytes).ok()
}
