// GUI-subsystem binary: no console window on Windows.
#![windows_subsystem = "windows"]

use eframe::egui;
use painter::app::PainterApp;
use painter::settings::AppSettings;
use painter::{log_info, logger};

/// Room for the toolbar, menu and status bars around the canvas.
const CHROME_WIDTH: f32 = 200.0;
const CHROME_HEIGHT: f32 = 70.0;

fn main() -> Result<(), eframe::Error> {
    logger::init();

    let settings = AppSettings::load();
    log_info!(
        "Canvas {}x{}, brush {}, undo limit {}",
        settings.canvas_width,
        settings.canvas_height,
        settings.brush_size,
        settings.max_undo_steps
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([
                settings.canvas_width as f32 + CHROME_WIDTH,
                settings.canvas_height as f32 + CHROME_HEIGHT,
            ])
            .with_min_inner_size([480.0, 360.0])
            .with_title("Painter"),
        ..Default::default()
    };

    eframe::run_native(
        "Painter",
        options,
        Box::new(move |cc| Box::new(PainterApp::new(cc, settings))),
    )
}
