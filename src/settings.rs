use std::path::PathBuf;

use crate::components::tools::{MAX_BRUSH_SIZE, MIN_BRUSH_SIZE};
use crate::io::DEFAULT_SAVE_NAME;

/// User preferences persisted as a plain `key=value` file.
#[derive(Clone, Debug, PartialEq)]
pub struct AppSettings {
    /// Width of a blank canvas
    pub canvas_width: u32,
    /// Height of a blank canvas
    pub canvas_height: u32,
    /// Brush size selected at startup (1–10)
    pub brush_size: u32,
    /// Maximum number of undo steps (0 = unlimited)
    pub max_undo_steps: usize,
    /// File → Save target used until the user picks a file
    pub default_save_name: String,
    /// Ask to save modified work when the window closes
    pub confirm_on_exit: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            canvas_width: 800,
            canvas_height: 600,
            brush_size: 5,
            max_undo_steps: 0,
            default_save_name: DEFAULT_SAVE_NAME.to_string(),
            confirm_on_exit: true,
        }
    }
}

impl AppSettings {
    pub(crate) fn settings_path() -> Option<PathBuf> {
        #[cfg(target_os = "windows")]
        let config_dir = std::env::var("APPDATA")
            .or_else(|_| std::env::var("USERPROFILE"))
            .ok()
            .map(|appdata| PathBuf::from(appdata).join("Painter"));
        #[cfg(target_os = "macos")]
        let config_dir = std::env::var("HOME").ok().map(|home| {
            PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("Painter")
        });
        #[cfg(not(any(target_os = "windows", target_os = "macos")))]
        let config_dir = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|_| std::env::var("HOME").map(|home| PathBuf::from(home).join(".config")))
            .ok()
            .map(|dir| dir.join("painter"));

        config_dir.map(|dir| dir.join("painter_settings.cfg"))
    }

    /// Load settings from disk. A missing file is created with the defaults so
    /// users have something to edit; an unreadable one falls back to defaults.
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            return Self::default();
        };
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                log_info!("Settings loaded from {}", path.display());
                Self::parse(&content)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let defaults = Self::default();
                defaults.save();
                defaults
            }
            Err(e) => {
                log_warn!("Could not read settings {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save(&self) {
        let Some(path) = Self::settings_path() else { return };
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        if let Err(e) = std::fs::write(&path, self.to_cfg()) {
            log_warn!("Could not write settings {}: {}", path.display(), e);
        }
    }

    /// Parse `key=value` lines. Unknown keys, comments and unparsable values
    /// keep the default.
    pub fn parse(content: &str) -> Self {
        let mut s = Self::default();
        for line in content.lines() {
            let line = line.trim();
            if line.starts_with('#') {
                continue;
            }
            let Some((key, val)) = line.split_once('=') else { continue };
            let val = val.trim();
            match key.trim() {
                "canvas_width" => {
                    if let Ok(v) = val.parse::<u32>()
                        && v > 0
                    {
                        s.canvas_width = v;
                    }
                }
                "canvas_height" => {
                    if let Ok(v) = val.parse::<u32>()
                        && v > 0
                    {
                        s.canvas_height = v;
                    }
                }
                "brush_size" => {
                    if let Ok(v) = val.parse::<u32>() {
                        s.brush_size = v.clamp(MIN_BRUSH_SIZE, MAX_BRUSH_SIZE);
                    }
                }
                "max_undo_steps" => {
                    if let Ok(v) = val.parse() {
                        s.max_undo_steps = v;
                    }
                }
                "default_save_name" => {
                    if !val.is_empty() {
                        s.default_save_name = val.to_string();
                    }
                }
                "confirm_on_exit" => {
                    s.confirm_on_exit = val != "false";
                }
                _ => {}
            }
        }
        s
    }

    pub fn to_cfg(&self) -> String {
        format!(
            "canvas_width={}\n\
             canvas_height={}\n\
             brush_size={}\n\
             max_undo_steps={}\n\
             default_save_name={}\n\
             confirm_on_exit={}\n",
            self.canvas_width,
            self.canvas_height,
            self.brush_size,
            self.max_undo_steps,
            self.default_save_name,
            self.confirm_on_exit,
        )
    }
}
