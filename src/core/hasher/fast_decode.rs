//! Image decoding with a fast path for JPEG.
//!
//! Uses zune-jpeg for JPEG files (1.5-2x faster than image crate),
//! falls back to image crate for other formats and for JPEGs zune rejects.

use crate::core::scanner::ImageFormat;
use crate::error::HashError;
use image::{DynamicImage, ImageBuffer, Luma, Rgb};
use std::fs;
use std::path::Path;
use zune_core::colorspace::ColorSpace;
use zune_core::options::DecoderOptions;
use zune_jpeg::JpegDecoder;

/// JPEG start-of-image marker
const JPEG_SOI: [u8; 2] = [0xFF, 0xD8];
/// JPEG end-of-image marker
const JPEG_EOI: [u8; 2] = [0xFF, 0xD9];

/// Decoder that picks the fastest available path per format
pub struct FastDecoder;

impl FastDecoder {
    /// Decode an image file of the given format.
    pub fn decode(path: &Path, format: ImageFormat) -> Result<DynamicImage, HashError> {
        match format {
            ImageFormat::Jpeg => Self::decode_jpeg(path),
            _ => Self::decode_fallback(path),
        }
    }

    fn decode_jpeg(path: &Path) -> Result<DynamicImage, HashError> {
        let file_bytes = fs::read(path).map_err(|e| HashError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?;

        // Mislabelled file: let the content pick the decoder
        if !file_bytes.starts_with(&JPEG_SOI) {
            return image::load_from_memory(&file_bytes).map_err(|e| HashError::DecodeError {
                path: path.to_path_buf(),
                reason: e.to_string(),
            });
        }

        // Both decoders pad a cut-off scan with gray instead of failing
        if !has_end_marker(&file_bytes) {
            return Err(HashError::DecodeError {
                path: path.to_path_buf(),
                reason: "truncated JPEG: missing end-of-image marker".to_string(),
            });
        }

        Self::decode_jpeg_fast(path, &file_bytes)
            .or_else(|_| Self::decode_jpeg_fallback(path, &file_bytes))
    }

    fn decode_jpeg_fast(path: &Path, file_bytes: &[u8]) -> Result<DynamicImage, HashError> {
        let options = DecoderOptions::new_fast().jpeg_set_out_colorspace(ColorSpace::RGB);
        let mut decoder = JpegDecoder::new_with_options(file_bytes, options);
        let pixels = decoder.decode().map_err(|e| HashError::DecodeError {
            path: path.to_path_buf(),
            reason: format!("zune-jpeg decode failed: {:?}", e),
        })?;

        let info = decoder.info().ok_or_else(|| HashError::DecodeError {
            path: path.to_path_buf(),
            reason: "Failed to get image info".to_string(),
        })?;

        let width = info.width as u32;
        let height = info.height as u32;

        let out_colorspace = decoder.get_output_colorspace().unwrap_or(ColorSpace::RGB);

        let buffer_error = || HashError::DecodeError {
            path: path.to_path_buf(),
            reason: format!("Decoded buffer does not match {}x{}", width, height),
        };

        // Hashing normalizes to RGB anyway, so only the layouts zune emits
        // for RGB output are handled here.
        match out_colorspace {
            ColorSpace::RGB => {
                let buffer: ImageBuffer<Rgb<u8>, Vec<u8>> =
                    ImageBuffer::from_raw(width, height, pixels).ok_or_else(buffer_error)?;
                Ok(DynamicImage::ImageRgb8(buffer))
            }
            ColorSpace::Luma => {
                let buffer: ImageBuffer<Luma<u8>, Vec<u8>> =
                    ImageBuffer::from_raw(width, height, pixels).ok_or_else(buffer_error)?;
                Ok(DynamicImage::ImageLuma8(buffer))
            }
            _ => Self::decode_jpeg_fallback(path, file_bytes),
        }
    }

    fn decode_jpeg_fallback(path: &Path, file_bytes: &[u8]) -> Result<DynamicImage, HashError> {
        image::load_from_memory_with_format(file_bytes, image::ImageFormat::Jpeg).map_err(|e| {
            HashError::DecodeError {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        })
    }

    fn decode_fallback(path: &Path) -> Result<DynamicImage, HashError> {
        image::open(path).map_err(|e| match e {
            image::ImageError::IoError(source) => HashError::IoError {
                path: path.to_path_buf(),
                source,
            },
            other => HashError::DecodeError {
                path: path.to_path_buf(),
                reason: other.to_string(),
            },
        })
    }
}

/// True if the data ends in an EOI marker, ignoring trailing zero padding
fn has_end_marker(bytes: &[u8]) -> bool {
    let end = bytes.iter().rposition(|&b| b != 0x00).map_or(0, |i| i + 1);
    bytes[..end].ends_with(&JPEG_EOI)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_jpeg(dir: &TempDir, name: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let img: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_fn(32, 32, |x, y| {
            Rgb([(x * 8) as u8, (y * 8) as u8, 90])
        });
        img.save(&path).unwrap();
        path
    }

    #[test]
    fn decodes_png_written_by_image_crate() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dot.png");
        let img: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_pixel(4, 3, Rgb([9, 8, 7]));
        img.save(&path).unwrap();

        let decoded = FastDecoder::decode(&path, ImageFormat::Png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (4, 3));
    }

    #[test]
    fn decodes_jpeg_through_fast_path() {
        let dir = TempDir::new().unwrap();
        let path = write_jpeg(&dir, "flat.jpg");

        let decoded = FastDecoder::decode(&path, ImageFormat::Jpeg).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (32, 32));
    }

    #[test]
    fn jpeg_with_trailing_padding_still_decodes() {
        let dir = TempDir::new().unwrap();
        let path = write_jpeg(&dir, "padded.jpg");
        let mut bytes = fs::read(&path).unwrap();
        bytes.extend_from_slice(&[0x00; 16]);
        fs::write(&path, &bytes).unwrap();

        assert!(FastDecoder::decode(&path, ImageFormat::Jpeg).is_ok());
    }

    #[test]
    fn truncated_jpeg_is_a_decode_error() {
        let dir = TempDir::new().unwrap();
        let path = write_jpeg(&dir, "cut.jpg");
        let bytes = fs::read(&path).unwrap();
        fs::write(&path, &bytes[..bytes.len() / 2]).unwrap();

        match FastDecoder::decode(&path, ImageFormat::Jpeg) {
            Err(HashError::DecodeError { reason, .. }) => assert!(reason.contains("truncated")),
            other => panic!("expected a decode error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn png_saved_with_jpg_name_still_decodes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("actually.png");
        let img: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_pixel(5, 5, Rgb([1, 2, 3]));
        img.save(&path).unwrap();
        let renamed = dir.path().join("actually.jpg");
        fs::rename(&path, &renamed).unwrap();

        let decoded = FastDecoder::decode(&renamed, ImageFormat::Jpeg).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (5, 5));
    }

    #[test]
    fn zero_byte_file_is_a_decode_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.jpg");
        File::create(&path).unwrap();

        assert!(matches!(
            FastDecoder::decode(&path, ImageFormat::Jpeg),
            Err(HashError::DecodeError { .. })
        ));
    }

    #[test]
    fn garbage_png_is_a_decode_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("garbage.png");
        File::create(&path)
            .unwrap()
            .write_all(b"this is not a valid image file")
            .unwrap();

        assert!(matches!(
            FastDecoder::decode(&path, ImageFormat::Png),
            Err(HashError::DecodeError { .. })
        ));
    }

    #[test]
    fn end_marker_check_skips_zero_padding() {
        assert!(has_end_marker(&[0xFF, 0xD8, 0xFF, 0xD9]));
        assert!(has_end_marker(&[0xFF, 0xD8, 0xFF, 0xD9, 0x00, 0x00]));
        assert!(!has_end_marker(&[0xFF, 0xD8, 0x12, 0x34]));
        assert!(!has_end_marker(&[]));
    }
}
