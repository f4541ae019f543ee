use eframe::egui;
use egui::Color32;
use image::Rgb;

/// Quick-pick swatches shown under the colour picker (X11 colour values).
pub const PALETTE: &[(&str, Rgb<u8>)] = &[
    ("black", Rgb([0, 0, 0])),
    ("red", Rgb([255, 0, 0])),
    ("green", Rgb([0, 255, 0])),
    ("blue", Rgb([0, 0, 255])),
    ("yellow", Rgb([255, 255, 0])),
    ("purple", Rgb([160, 32, 240])),
    ("orange", Rgb([255, 165, 0])),
    ("brown", Rgb([165, 42, 42])),
    ("pink", Rgb([255, 192, 203])),
    ("gray", Rgb([190, 190, 190])),
];

pub fn to_color32(c: Rgb<u8>) -> Color32 {
    Color32::from_rgb(c.0[0], c.0[1], c.0[2])
}

/// Colour picker button plus the swatch grid. Returns the newly chosen colour,
/// if the user picked one this frame.
pub fn show_palette(ui: &mut egui::Ui, current: Rgb<u8>) -> Option<Rgb<u8>> {
    let mut picked = None;

    let mut rgb = current.0;
    ui.horizontal(|ui| {
        ui.label("Color");
        if ui.color_edit_button_srgb(&mut rgb).changed() {
            picked = Some(Rgb(rgb));
        }
    });

    egui::Grid::new("palette_grid")
        .spacing(egui::vec2(4.0, 4.0))
        .show(ui, |ui| {
            for (i, &(name, color)) in PALETTE.iter().enumerate() {
                let swatch = egui::Button::new("")
                    .fill(to_color32(color))
                    .min_size(egui::vec2(20.0, 20.0));
                if ui.add(swatch).on_hover_text(name).clicked() {
                    picked = Some(color);
                }
                if i % 5 == 4 {
                    ui.end_row();
                }
            }
        });

    picked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_ten_distinct_colors() {
        assert_eq!(PALETTE.len(), 10);
        for (i, (_, a)) in PALETTE.iter().enumerate() {
            assert!(PALETTE[i + 1..].iter().all(|(_, b)| b != a));
        }
    }

    #[test]
    fn color32_conversion_keeps_channels() {
        assert_eq!(to_color32(Rgb([1, 2, 3])), Color32::from_rgb(1, 2, 3));
    }
}
