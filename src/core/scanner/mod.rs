//! # Scanner Module
//!
//! Lists the source directory and classifies each entry.
//!
//! ## Recognized Formats
//! - JPEG (.jpg, .jpeg)
//! - PNG (.png)
//! - BMP (.bmp)
//! - GIF (.gif)
//! - WebP (.webp)
//!
//! Anything else is reported as a non-image and left alone. Listing is
//! flat: subdirectories are reported and skipped, never descended into.
//!
//! ## Example
//! ```rust,ignore
//! use phash_gallery::core::scanner::{EntryScanner, ScanConfig, WalkDirScanner};
//!
//! let scanner = WalkDirScanner::new(ScanConfig::default());
//! let result = scanner.scan(Path::new("./raw_images"))?;
//! ```

mod filter;
mod walker;

pub use filter::ImageFilter;
pub use walker::{ScanConfig, WalkDirScanner};

use crate::error::ScanError;
use crate::events::EventSender;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// An image file waiting to be hashed and placed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    /// Path to the file in the source directory
    pub path: PathBuf,
    /// Original file name, used in console output
    pub file_name: String,
    /// Lowercased extension including the leading dot, e.g. `.jpg`
    pub extension: String,
    /// Detected image format
    pub format: ImageFormat,
}

/// Classification of a single directory entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    /// File with a recognized image extension
    Image(SourceFile),
    /// File with a missing or unrecognized extension
    NonImage { path: PathBuf },
    /// Subdirectory; never decoded
    Directory { path: PathBuf },
}

impl EntryKind {
    /// Path of the entry regardless of its kind
    pub fn path(&self) -> &Path {
        match self {
            EntryKind::Image(file) => &file.path,
            EntryKind::NonImage { path } | EntryKind::Directory { path } => path,
        }
    }
}

/// Recognized image formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Bmp,
    Gif,
    WebP,
    Unknown,
}

impl ImageFormat {
    /// Detect format from a file extension, with or without the leading dot
    pub fn from_extension(ext: &str) -> Self {
        match ext.trim_start_matches('.').to_lowercase().as_str() {
            "jpg" | "jpeg" => ImageFormat::Jpeg,
            "png" => ImageFormat::Png,
            "bmp" => ImageFormat::Bmp,
            "gif" => ImageFormat::Gif,
            "webp" => ImageFormat::WebP,
            _ => ImageFormat::Unknown,
        }
    }
}

/// Result of listing a source directory
#[derive(Debug)]
pub struct ScanResult {
    /// Every readable entry, in file name order
    pub entries: Vec<EntryKind>,
    /// Entries that could not be read (non-fatal)
    pub errors: Vec<ScanError>,
}

/// Trait for source directory scanners
///
/// Implement this trait to feed the pipeline from somewhere else (e.g., in tests).
pub trait EntryScanner: Send + Sync {
    /// List and classify the entries of a directory
    fn scan(&self, root: &Path) -> Result<ScanResult, ScanError>;

    /// List with progress reporting via events
    fn scan_with_events(&self, root: &Path, events: &EventSender)
        -> Result<ScanResult, ScanError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_format_from_extension_lowercase() {
        assert_eq!(ImageFormat::from_extension("jpg"), ImageFormat::Jpeg);
        assert_eq!(ImageFormat::from_extension("jpeg"), ImageFormat::Jpeg);
        assert_eq!(ImageFormat::from_extension("png"), ImageFormat::Png);
        assert_eq!(ImageFormat::from_extension("webp"), ImageFormat::WebP);
    }

    #[test]
    fn image_format_accepts_leading_dot_and_uppercase() {
        assert_eq!(ImageFormat::from_extension(".GIF"), ImageFormat::Gif);
        assert_eq!(ImageFormat::from_extension(".Bmp"), ImageFormat::Bmp);
    }

    #[test]
    fn formats_outside_allow_list_are_unknown() {
        assert_eq!(ImageFormat::from_extension("heic"), ImageFormat::Unknown);
        assert_eq!(ImageFormat::from_extension("tiff"), ImageFormat::Unknown);
    }

    #[test]
    fn entry_kind_exposes_path() {
        let entry = EntryKind::Directory {
            path: PathBuf::from("/raw/nested"),
        };
        assert_eq!(entry.path(), Path::new("/raw/nested"));
    }
}
