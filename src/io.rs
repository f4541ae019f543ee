use image::codecs::png::PngEncoder;
use image::{ImageEncoder, ImageError, RgbaImage};
use rfd::FileDialog;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// File → Save target until the user chooses a file.
pub const DEFAULT_SAVE_NAME: &str = "output.png";

/// Extensions accepted by the open dialog.
pub const OPEN_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp"];

/// Error type for load/save.
#[derive(Debug)]
pub enum PersistError {
    Io(std::io::Error),
    Image(ImageError),
}

impl std::fmt::Display for PersistError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PersistError::Io(e) => write!(f, "I/O error: {}", e),
            PersistError::Image(e) => write!(f, "Image error: {}", e),
        }
    }
}

impl std::error::Error for PersistError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PersistError::Io(e) => Some(e),
            PersistError::Image(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for PersistError {
    fn from(e: std::io::Error) -> Self {
        PersistError::Io(e)
    }
}

impl From<ImageError> for PersistError {
    fn from(e: ImageError) -> Self {
        match e {
            ImageError::IoError(io) => PersistError::Io(io),
            other => PersistError::Image(other),
        }
    }
}

/// Decode any supported raster file into RGBA.
pub fn load_image(path: &Path) -> Result<RgbaImage, PersistError> {
    let img = image::open(path)?;
    Ok(img.to_rgba8())
}

/// Encode `image` as PNG at `path`, replacing any existing file.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<(), PersistError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    PngEncoder::new(&mut writer).write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        image::ColorType::Rgba8,
    )?;
    Ok(())
}

/// Append `.png` to paths chosen without an extension.
pub fn with_default_extension(mut path: PathBuf) -> PathBuf {
    if path.extension().is_none() {
        path.set_extension("png");
    }
    path
}

// ============================================================================
// FILE HANDLER
// ============================================================================

/// Tracks where the canvas lives on disk and drives the native dialogs.
pub struct FileHandler {
    /// File chosen by Open or Save As (None until then)
    pub current_path: Option<PathBuf>,
    /// Where File → Save writes while `current_path` is unset
    pub default_path: PathBuf,
}

impl Default for FileHandler {
    fn default() -> Self {
        Self::new(PathBuf::from(DEFAULT_SAVE_NAME))
    }
}

impl FileHandler {
    pub fn new(default_path: PathBuf) -> Self {
        Self {
            current_path: None,
            default_path,
        }
    }

    /// Target for a plain File → Save.
    pub fn save_target(&self) -> &Path {
        self.current_path.as_deref().unwrap_or(self.default_path.as_path())
    }

    /// Show the native open dialog. `None` when cancelled.
    pub fn pick_open_path(&self) -> Option<PathBuf> {
        FileDialog::new()
            .add_filter("Images", OPEN_EXTENSIONS)
            .add_filter("PNG files", &["png"])
            .add_filter("All files", &["*"])
            .pick_file()
    }

    /// Show the native save dialog. `None` when cancelled.
    pub fn pick_save_path(&self) -> Option<PathBuf> {
        let file_name = self
            .save_target()
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| DEFAULT_SAVE_NAME.to_string());
        let mut dialog = FileDialog::new()
            .add_filter("PNG files", &["png"])
            .add_filter("All files", &["*"])
            .set_file_name(file_name);
        if let Some(dir) = self.current_path.as_deref().and_then(Path::parent) {
            dialog = dialog.set_directory(dir);
        }
        dialog.save_file().map(with_default_extension)
    }
}
