use eframe::egui;
use image::RgbaImage;
use std::collections::VecDeque;

use crate::canvas::CanvasState;

// ============================================================================
// SNAPSHOT - an immutable full copy of the canvas image
// ============================================================================

/// A frozen copy of the canvas pixels together with the name of the action
/// that was about to change them. Snapshots own their pixels: they are made
/// either by cloning the live image or by moving it out of the canvas, so
/// they can never alias the image that keeps being painted on.
pub struct Snapshot {
    description: String,
    image: RgbaImage,
}

impl Snapshot {
    pub fn capture(canvas: &CanvasState, description: &str) -> Self {
        Self {
            description: description.to_string(),
            image: canvas.image().clone(),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn memory_size(&self) -> usize {
        self.image.as_raw().len() + self.description.len()
    }

    /// Put these pixels back on the canvas and return what was there, labelled
    /// with the same description.
    fn swap_into(self, canvas: &mut CanvasState) -> Snapshot {
        let previous = canvas.replace_image(self.image);
        Snapshot {
            description: self.description,
            image: previous,
        }
    }
}

// ============================================================================
// HISTORY MANAGER
// ============================================================================

/// Linear undo/redo over whole-image snapshots. Each undo entry holds the
/// image as it was *before* the action named by its description.
pub struct HistoryManager {
    undo_stack: VecDeque<Snapshot>,
    redo_stack: Vec<Snapshot>,
    /// 0 = unlimited.
    max_history_size: usize,
    /// Running memory total across both stacks.
    total_memory: usize,
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new(0)
    }
}

impl HistoryManager {
    pub fn new(max_history_size: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            max_history_size,
            total_memory: 0,
        }
    }

    /// Capture the current canvas as an undo point. Call right before mutating.
    /// Any redo history is discarded.
    pub fn record(&mut self, canvas: &CanvasState, description: &str) {
        self.push(Snapshot::capture(canvas, description));
    }

    pub fn push(&mut self, snapshot: Snapshot) {
        for dropped in self.redo_stack.drain(..) {
            self.total_memory = self.total_memory.saturating_sub(dropped.memory_size());
        }
        self.total_memory += snapshot.memory_size();
        self.undo_stack.push_back(snapshot);
        self.prune();
    }

    /// Restore the most recent undo point. Returns `false` when there is nothing to undo.
    pub fn undo(&mut self, canvas: &mut CanvasState) -> bool {
        let Some(snapshot) = self.undo_stack.pop_back() else {
            return false;
        };
        self.total_memory = self.total_memory.saturating_sub(snapshot.memory_size());
        let current = snapshot.swap_into(canvas);
        self.total_memory += current.memory_size();
        self.redo_stack.push(current);
        true
    }

    /// Re-apply the most recently undone action. Returns `false` when there is nothing to redo.
    pub fn redo(&mut self, canvas: &mut CanvasState) -> bool {
        let Some(snapshot) = self.redo_stack.pop() else {
            return false;
        };
        self.total_memory = self.total_memory.saturating_sub(snapshot.memory_size());
        let current = snapshot.swap_into(canvas);
        self.total_memory += current.memory_size();
        self.undo_stack.push_back(current);
        self.prune();
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.back().map(|s| s.description())
    }

    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack.last().map(|s| s.description())
    }

    /// Descriptions of undoable actions, most recent first.
    pub fn undo_history(&self) -> Vec<String> {
        self.undo_stack
            .iter()
            .rev()
            .map(|s| s.description().to_string())
            .collect()
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    /// Bytes held by both stacks.
    pub fn memory_usage(&self) -> usize {
        self.total_memory
    }

    fn prune(&mut self) {
        if self.max_history_size == 0 {
            return;
        }
        while self.undo_stack.len() > self.max_history_size {
            if let Some(removed) = self.undo_stack.pop_front() {
                self.total_memory = self.total_memory.saturating_sub(removed.memory_size());
            }
        }
    }
}

// ============================================================================
// HISTORY PANEL - UI for displaying history
// ============================================================================

#[derive(Default)]
pub struct HistoryPanel {
    show_memory_info: bool,
}

impl HistoryPanel {
    pub fn show(&mut self, ui: &mut egui::Ui, history: &HistoryManager) {
        ui.horizontal(|ui| {
            ui.label(format!(
                "Undo: {} | Redo: {}",
                history.undo_count(),
                history.redo_count()
            ));
            if ui.small_button("ℹ").on_hover_text("Show memory info").clicked() {
                self.show_memory_info = !self.show_memory_info;
            }
        });

        if self.show_memory_info {
            let mem_mb = history.memory_usage() as f64 / (1024.0 * 1024.0);
            ui.label(format!("Memory: {:.2} MB", mem_mb));
        }

        egui::ScrollArea::vertical()
            .max_height(150.0)
            .show(ui, |ui| {
                let items = history.undo_history();
                if items.is_empty() {
                    ui.weak("No history yet");
                }
                for (i, desc) in items.iter().enumerate() {
                    if i == 0 {
                        ui.label(egui::RichText::new(format!("▶ {}", desc)).strong());
                    } else {
                        ui.weak(format!("  {}", desc));
                    }
                }
            });
    }
}
