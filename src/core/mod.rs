//! # Core Module
//!
//! The front-end-agnostic gallery engine.
//!
//! ## Modules
//! - `scanner` - Lists and classifies source directory entries
//! - `hasher` - Computes perceptual fingerprints
//! - `placer` - Moves images into the gallery without overwriting
//! - `pipeline` - Orchestrates the full workflow

pub mod hasher;
pub mod pipeline;
pub mod placer;
pub mod scanner;

// Re-export commonly used types
pub use hasher::Fingerprint;
pub use pipeline::{FileOutcome, RunSummary};
pub use placer::GalleryEntry;
pub use scanner::SourceFile;
