//! # phash-gallery
//!
//! Renames a folder of images by perceptual hash and moves them into a
//! gallery folder, skipping any image whose hash-derived name is taken.
//!
//! ## Architecture
//! - `core` - Scanner, hasher, placer and the pipeline tying them together
//! - `events` - Channel-based progress reporting for front ends
//! - `error` - Error types
//! - `cli` (binary only) - Command-line interface

pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{GalleryError, Result};

/// Initialize tracing for the library
///
/// This should be called by the application entry point.
pub fn init_tracing() {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set global default tracing subscriber");
}
