//! # Placer Module
//!
//! Moves hashed images into the gallery under `<fingerprint><ext>`.
//!
//! A gallery name is never overwritten: if `<fingerprint><ext>` already
//! exists the source file is left where it is. The same fingerprint with
//! a different extension is a different name and may coexist.

mod mover;

pub use mover::move_file;

use crate::core::hasher::Fingerprint;
use crate::core::scanner::SourceFile;
use crate::error::PlaceError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

/// A file (existing or planned) in the gallery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryEntry {
    /// Full path of the gallery file
    pub path: PathBuf,
    /// Fingerprint the name was derived from
    pub fingerprint: Fingerprint,
}

/// What the placer did with a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// File was moved to the entry's path
    Moved(GalleryEntry),
    /// An entry with the same name already exists; source untouched
    Duplicate(GalleryEntry),
    /// Dry run: the file would be moved to the entry's path
    Planned(GalleryEntry),
}

/// Places source files into a gallery directory
#[derive(Debug, Clone)]
pub struct Placer {
    gallery: PathBuf,
    dry_run: bool,
}

impl Placer {
    /// Create a placer for the given gallery directory
    pub fn new(gallery: impl Into<PathBuf>) -> Self {
        Self {
            gallery: gallery.into(),
            dry_run: false,
        }
    }

    /// Report planned moves without touching the filesystem
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Create the gallery directory if it does not exist yet
    pub fn ensure_gallery(&self) -> Result<(), PlaceError> {
        if self.dry_run {
            return Ok(());
        }
        fs::create_dir_all(&self.gallery).map_err(|e| PlaceError::CreateGallery {
            path: self.gallery.clone(),
            source: e,
        })
    }

    /// Gallery path for a fingerprint and dotted extension
    pub fn destination(&self, fingerprint: &Fingerprint, extension: &str) -> PathBuf {
        self.gallery.join(fingerprint.file_name(extension))
    }

    /// Move `file` into the gallery unless its name is already taken
    pub fn place(
        &self,
        file: &SourceFile,
        fingerprint: Fingerprint,
    ) -> Result<Placement, PlaceError> {
        let entry = GalleryEntry {
            path: self.destination(&fingerprint, &file.extension),
            fingerprint,
        };

        // Any entry counts, including dangling symlinks
        if fs::symlink_metadata(&entry.path).is_ok() {
            debug!(source = %file.path.display(), existing = %entry.path.display(), "name taken");
            return Ok(Placement::Duplicate(entry));
        }

        if self.dry_run {
            return Ok(Placement::Planned(entry));
        }

        move_file(&file.path, &entry.path)?;
        info!(from = %file.path.display(), to = %entry.path.display(), "moved");
        Ok(Placement::Moved(entry))
    }
}
