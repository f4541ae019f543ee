use eframe::egui;

use crate::canvas::Canvas;
use crate::components::history::HistoryPanel;
use crate::components::tools::{ToolsPanel, ToolsPanelAction};
use crate::input::{EASTER_EGG_MESSAGE, EASTER_EGG_TITLE, InputOutcome, PointerEvent};
use crate::session::Session;
use crate::settings::AppSettings;

/// A message window shown over the canvas until dismissed.
struct Notice {
    title: String,
    message: String,
}

pub struct PainterApp {
    session: Session,
    settings: AppSettings,

    // Display
    canvas: Canvas,
    last_title: String,

    // UI Components
    tools_panel: ToolsPanel,
    history_panel: HistoryPanel,

    notice: Option<Notice>,
    /// The "save before quitting?" prompt is open.
    pending_exit: bool,
    /// Exit was confirmed; let the next close request through.
    force_exit: bool,
    /// Last canvas position forwarded during the current drag.
    last_drag_pos: Option<(f32, f32)>,
}

impl PainterApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, settings: AppSettings) -> Self {
        Self {
            session: Session::from_settings(&settings),
            settings,
            canvas: Canvas::new(),
            last_title: String::new(),
            tools_panel: ToolsPanel::default(),
            history_panel: HistoryPanel::default(),
            notice: None,
            pending_exit: false,
            force_exit: false,
            last_drag_pos: None,
        }
    }

    fn show_error(&mut self, title: &str, message: String) {
        self.notice = Some(Notice {
            title: title.to_string(),
            message,
        });
    }

    // --- File menu -----------------------------------------------------------

    fn handle_save(&mut self) {
        if let Err(e) = self.session.save_default() {
            log_err!("Save failed: {}", e);
            self.show_error("Save failed", e.to_string());
        }
    }

    fn handle_save_as(&mut self) {
        let Some(path) = self.session.file_handler.pick_save_path() else {
            return;
        };
        if let Err(e) = self.session.save(&path) {
            log_err!("Save to {} failed: {}", path.display(), e);
            self.show_error("Save failed", e.to_string());
        }
    }

    fn handle_open(&mut self) {
        let Some(path) = self.session.file_handler.pick_open_path() else {
            return;
        };
        self.last_drag_pos = None;
        if let Err(e) = self.session.open(&path) {
            log_err!("Open {} failed: {}", path.display(), e);
            self.show_error("Open failed", format!("{}: {}", path.display(), e));
        }
    }

    fn request_exit(&mut self, ctx: &egui::Context) {
        if self.session.needs_save_prompt(&self.settings) {
            self.pending_exit = true;
        } else {
            self.force_exit = true;
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }

    // --- Input ---------------------------------------------------------------

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        // Let a focused text field keep its own undo.
        if ctx.wants_keyboard_input() {
            return;
        }
        let undo = egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::Z);
        let redo = egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::Y);
        let (do_undo, do_redo) =
            ctx.input_mut(|i| (i.consume_shortcut(&undo), i.consume_shortcut(&redo)));
        if do_undo {
            self.session.undo();
        }
        if do_redo {
            self.session.redo();
        }
    }

    fn handle_canvas_input(&mut self, response: &egui::Response) {
        let pos = response
            .interact_pointer_pos()
            .and_then(|p| self.canvas.to_canvas_pos(p));

        let mut events = Vec::new();
        if response.clicked()
            && let Some((x, y)) = pos
        {
            events.push(PointerEvent::Click { x, y });
        }
        if response.dragged()
            && let Some((x, y)) = pos
            && self.last_drag_pos != Some((x, y))
        {
            self.last_drag_pos = Some((x, y));
            events.push(PointerEvent::Drag { x, y });
        }
        if response.drag_released() {
            self.last_drag_pos = None;
            events.push(PointerEvent::Release);
        }

        for event in events {
            let outcome = self
                .session
                .handle_pointer(event, &self.tools_panel.text_entry);
            match outcome {
                InputOutcome::EasterEgg => {
                    self.notice = Some(Notice {
                        title: EASTER_EGG_TITLE.to_string(),
                        message: EASTER_EGG_MESSAGE.to_string(),
                    });
                }
                InputOutcome::TextUnavailable => {
                    self.show_error("Text", "No system font is available.".to_string());
                }
                InputOutcome::Painted | InputOutcome::Ignored => {}
            }
        }
    }

    // --- Panels --------------------------------------------------------------

    fn show_menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Save").clicked() {
                        ui.close_menu();
                        self.handle_save();
                    }
                    if ui.button("Save As").clicked() {
                        ui.close_menu();
                        self.handle_save_as();
                    }
                    if ui.button("Open").clicked() {
                        ui.close_menu();
                        self.handle_open();
                    }
                    ui.separator();
                    if ui.button("Exit").clicked() {
                        ui.close_menu();
                        self.request_exit(ctx);
                    }
                });

                ui.menu_button("Edit", |ui| {
                    let undo = egui::Button::new("Undo").shortcut_text("Ctrl+Z");
                    if ui.add_enabled(self.session.history.can_undo(), undo).clicked() {
                        self.session.undo();
                        ui.close_menu();
                    }
                    let redo = egui::Button::new("Redo").shortcut_text("Ctrl+Y");
                    if ui.add_enabled(self.session.history.can_redo(), redo).clicked() {
                        self.session.redo();
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Clear All").clicked() {
                        self.session.clear();
                        ui.close_menu();
                    }
                });
            });
        });
    }

    fn show_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(format!(
                    "{} × {}",
                    self.session.canvas.width, self.session.canvas.height
                ));
                ui.separator();
                ui.label(format!(
                    "{} | size {}",
                    self.session.tools.tool.label(),
                    self.session.tools.brush_size()
                ));
                if self.session.is_modified() {
                    ui.separator();
                    ui.weak("modified");
                }
            });
        });
    }

    fn show_exit_prompt(&mut self, ctx: &egui::Context) {
        if !self.pending_exit {
            return;
        }
        let mut do_save = false;
        let mut do_exit = false;

        egui::Window::new("Quit")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label("Do you want to save your changes before quitting?");
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("OK").clicked() {
                        do_save = true;
                        do_exit = true;
                    }
                    if ui.button("Cancel").clicked() {
                        do_exit = true;
                    }
                });
            });

        if do_save {
            self.handle_save_as();
        }
        if do_exit {
            self.pending_exit = false;
            self.force_exit = true;
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }

    fn show_notice(&mut self, ctx: &egui::Context) {
        let Some(notice) = &self.notice else { return };
        let mut dismissed = false;
        egui::Window::new(notice.title.as_str())
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(notice.message.as_str());
                ui.add_space(8.0);
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });
        if dismissed {
            self.notice = None;
        }
    }
}

impl eframe::App for PainterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let title = self.session.display_title();
        if title != self.last_title {
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(title.clone()));
            self.last_title = title;
        }

        // --- Intercept OS window-close button ---
        if ctx.input(|i| i.viewport().close_requested())
            && !self.force_exit
            && self.session.needs_save_prompt(&self.settings)
        {
            ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
            self.pending_exit = true;
        }

        self.handle_shortcuts(ctx);
        self.show_menu_bar(ctx);
        self.show_status_bar(ctx);

        egui::SidePanel::left("toolbar")
            .resizable(false)
            .default_width(180.0)
            .show(ctx, |ui| {
                if let Some(ToolsPanelAction::ClearAll) =
                    self.tools_panel.show(ui, &mut self.session)
                {
                    self.session.clear();
                }
                ui.separator();
                self.history_panel.show(ui, &self.session.history);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::both().show(ui, |ui| {
                let response = self.canvas.show(ui, &self.session.canvas);
                let blocked = self.notice.is_some() || self.pending_exit;
                if !blocked {
                    self.handle_canvas_input(&response);
                }
            });
        });

        self.show_exit_prompt(ctx);
        self.show_notice(ctx);
    }
}
