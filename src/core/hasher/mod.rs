//! # Hasher Module
//!
//! Turns an image file into a 64-bit perceptual fingerprint.
//!
//! ## How It Works
//! 1. Decode the file (zune-jpeg for JPEG, image crate for the rest)
//! 2. Normalize to 8-bit RGB so palette, grayscale and alpha sources agree
//! 3. Hash with a DCT-based pHash from `image_hasher`
//! 4. Render the 8 hash bytes as 16 lowercase hex characters
//!
//! ## Example
//! ```rust,ignore
//! use phash_gallery::core::hasher::{FingerprintHasher, PerceptualHasher};
//! use phash_gallery::core::scanner::ImageFormat;
//!
//! let hasher = PerceptualHasher::new();
//! let fingerprint = hasher.hash_file(&path, ImageFormat::Jpeg)?;
//! println!("{}", fingerprint); // e.g. "c3e1b0f08c1e3f07"
//! ```

pub mod fast_decode;
mod fingerprint;
mod perceptual;

pub use fingerprint::{Fingerprint, FINGERPRINT_BYTES};
pub use perceptual::{normalize, FingerprintHasher, PerceptualHasher};
