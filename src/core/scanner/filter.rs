//! Extension allow-list for the scanner.

use super::{ImageFormat, SourceFile};
use std::collections::HashSet;
use std::path::Path;

/// Extensions treated as images, without the leading dot
pub const DEFAULT_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "bmp", "gif", "webp"];

/// Decides which files are images by their extension
pub struct ImageFilter {
    extensions: HashSet<String>,
}

impl ImageFilter {
    /// Create a filter with the default allow-list
    pub fn new() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }

    /// Override the list of extensions to accept
    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions
            .into_iter()
            .map(|e| e.trim_start_matches('.').to_lowercase())
            .collect();
        self
    }

    /// Lowercased extension of `path` with its leading dot, if allow-listed
    pub fn image_extension(&self, path: &Path) -> Option<String> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        if self.extensions.contains(&ext) {
            Some(format!(".{}", ext))
        } else {
            None
        }
    }

    /// Build a `SourceFile` for an allow-listed path
    pub fn source_file(&self, path: &Path) -> Option<SourceFile> {
        let extension = self.image_extension(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Some(SourceFile {
            path: path.to_path_buf(),
            file_name,
            format: ImageFormat::from_extension(&extension),
            extension,
        })
    }
}

impl Default for ImageFilter {
    fn default() -> Self {
        Self::new()
    }
}
