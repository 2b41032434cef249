//! Perceptual Hash (pHash) using the image_hasher crate.
//!
//! The image is reduced to grayscale, downscaled, run through a DCT,
//! and the low-frequency coefficients are thresholded against their
//! median into a 64-bit string.

use super::fast_decode::FastDecoder;
use super::fingerprint::Fingerprint;
use crate::core::scanner::ImageFormat;
use crate::error::HashError;
use image::DynamicImage;
use image_hasher::{HashAlg, HasherConfig};
use std::path::Path;
use tracing::debug;

/// Side length of the hash grid; 8x8 gives 64 bits
const HASH_SIZE: u32 = 8;

/// Computes fingerprints for images.
///
/// Implement this trait to plug in a different fingerprint source (e.g., in tests).
pub trait FingerprintHasher: Send + Sync {
    /// Fingerprint an already-decoded image
    fn hash_image(&self, image: &DynamicImage) -> Result<Fingerprint, HashError>;

    /// Decode a file and fingerprint it.
    ///
    /// The decoded pixels are released before this returns, on both
    /// the success and the error path.
    fn hash_file(&self, path: &Path, format: ImageFormat) -> Result<Fingerprint, HashError> {
        let image = FastDecoder::decode(path, format)?;
        if image.width() == 0 || image.height() == 0 {
            return Err(HashError::EmptyImage {
                path: path.to_path_buf(),
            });
        }
        self.hash_image(&image)
    }
}

/// DCT-based perceptual hasher
pub struct PerceptualHasher {
    hasher: image_hasher::Hasher,
}

impl PerceptualHasher {
    /// Create a new pHash hasher producing 64-bit fingerprints
    pub fn new() -> Self {
        let hasher = HasherConfig::new()
            .hash_size(HASH_SIZE, HASH_SIZE)
            .hash_alg(HashAlg::Median)
            .preproc_dct()
            .to_hasher();

        Self { hasher }
    }
}

impl Default for PerceptualHasher {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert any color mode to 8-bit RGB so the hash only sees visible pixels
pub fn normalize(image: &DynamicImage) -> DynamicImage {
    match image {
        DynamicImage::ImageRgb8(_) => image.clone(),
        other => DynamicImage::ImageRgb8(other.to_rgb8()),
    }
}

impl FingerprintHasher for PerceptualHasher {
    fn hash_image(&self, image: &DynamicImage) -> Result<Fingerprint, HashError> {
        let rgb = normalize(image);
        let hash = self.hasher.hash_image(&rgb);

        let fingerprint = Fingerprint::from_slice(hash.as_bytes()).ok_or_else(|| {
            HashError::ComputationFailed(format!(
                "expected 8 hash bytes, got {}",
                hash.as_bytes().len()
            ))
        })?;

        debug!(%fingerprint, width = image.width(), height = image.height(), "hashed image");
        Ok(fingerprint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, ImageBuffer, Luma, Rgb, Rgba};

    fn gradient_rgb() -> DynamicImage {
        let img = ImageBuffer::from_fn(64, 64, |x, y| {
            let v = ((x * 4) as u8).wrapping_add((y * 2) as u8);
            Rgb([v, v, v])
        });
        DynamicImage::ImageRgb8(img)
    }

    fn checkerboard(invert: bool) -> DynamicImage {
        let img: GrayImage = ImageBuffer::from_fn(64, 64, |x, y| {
            let on = ((x / 16) + (y / 16)) % 2 == 0;
            Luma([if on ^ invert { 255 } else { 0 }])
        });
        DynamicImage::ImageLuma8(img)
    }

    #[test]
    fn identical_images_produce_identical_fingerprint() {
        let hasher = PerceptualHasher::new();
        let image = gradient_rgb();

        let a = hasher.hash_image(&image).unwrap();
        let b = hasher.hash_image(&image).unwrap();

        assert_eq!(a, b);
        assert_eq!(a.to_hex().len(), 16);
    }

    #[test]
    fn grayscale_and_rgb_of_same_pixels_match() {
        let hasher = PerceptualHasher::new();
        let gray = checkerboard(false);
        let rgb = DynamicImage::ImageRgb8(gray.to_rgb8());

        assert_eq!(
            hasher.hash_image(&gray).unwrap(),
            hasher.hash_image(&rgb).unwrap()
        );
    }

    #[test]
    fn opaque_alpha_channel_does_not_change_fingerprint() {
        let hasher = PerceptualHasher::new();
        let rgb = gradient_rgb();
        let rgba = DynamicImage::ImageRgba8(ImageBuffer::from_fn(64, 64, |x, y| {
            let Rgb([r, g, b]) = *rgb.as_rgb8().unwrap().get_pixel(x, y);
            Rgba([r, g, b, 255])
        }));

        assert_eq!(
            hasher.hash_image(&rgb).unwrap(),
            hasher.hash_image(&rgba).unwrap()
        );
    }

    #[test]
    fn different_structure_produces_different_fingerprint() {
        let hasher = PerceptualHasher::new();
        let a = hasher.hash_image(&checkerboard(false)).unwrap();
        let b = hasher.hash_image(&checkerboard(true)).unwrap();

        assert_ne!(a, b);
    }

    #[test]
    fn normalize_converts_to_rgb8() {
        let normalized = normalize(&checkerboard(false));
        assert!(matches!(normalized, DynamicImage::ImageRgb8(_)));
    }

    #[test]
    fn hash_file_reports_missing_file() {
        let hasher = PerceptualHasher::new();
        let result = hasher.hash_file(Path::new("/nonexistent/photo.png"), ImageFormat::Png);
        assert!(result.is_err());
    }
}
