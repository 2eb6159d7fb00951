//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify | `image::image_dimensions` (header only) |
//! | Decode (JPEG, PNG) | `image::ImageReader` with content sniffing |
//! | Resize | `DynamicImage::resize_exact` with `Lanczos3` filter |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` (quality 1-100) |
//! | Encode → PNG | `image::codecs::png::PngEncoder` (zlib level 0-9, 0 = stored) |
//! | Atomic write | `tempfile::NamedTempFile` in the destination directory, then `persist` |

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::params::{CompressionParam, ImageFormat, ResizeParams};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, PngEncoder};
use image::imageops::FilterType;
use image::{DynamicImage, ImageEncoder, ImageReader};
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Load and decode an image from disk.
///
/// The format is sniffed from the file contents, so a PNG saved with a
/// `.jpg` extension still decodes.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    ImageReader::open(path)
        .map_err(BackendError::Io)?
        .with_guessed_format()
        .map_err(BackendError::Io)?
        .decode()
        .map_err(|e| BackendError::Decode(format!("{}: {}", path.display(), e)))
}

/// Deflate setting for a zlib level (0-9); level 0 stores the data raw.
fn png_compression(level: u8) -> CompressionType {
    match level {
        0 => CompressionType::Uncompressed,
        n => CompressionType::Level(n.min(9)),
    }
}

/// Encode `img` into `writer` according to `format` and `compression`.
fn encode<W: Write>(
    img: &DynamicImage,
    writer: W,
    format: ImageFormat,
    compression: CompressionParam,
) -> Result<(), BackendError> {
    let result = match (format, compression) {
        (ImageFormat::Jpeg, CompressionParam::JpegQuality(quality)) => {
            // JPEG has no alpha channel
            let rgb = img.to_rgb8();
            JpegEncoder::new_with_quality(writer, quality).write_image(
                rgb.as_raw(),
                rgb.width(),
                rgb.height(),
                image::ExtendedColorType::Rgb8,
            )
        }
        (ImageFormat::Png, CompressionParam::PngLevel(level)) => {
            let encoder = PngEncoder::new_with_quality(
                writer,
                png_compression(level),
                image::codecs::png::FilterType::Adaptive,
            );
            img.write_with_encoder(encoder)
        }
        (format, compression) => {
            return Err(BackendError::Encode(format!(
                "{compression:?} does not apply to {}",
                format.name()
            )));
        }
    };
    result.map_err(|e| BackendError::Encode(format!("{} encode failed: {}", format.name(), e)))
}

/// Encode into a temp file next to `path` and move it into place on success.
fn save_image(
    img: &DynamicImage,
    path: &Path,
    format: ImageFormat,
    compression: CompressionParam,
) -> Result<(), BackendError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let staged = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(staged.as_file());
        encode(img, &mut writer, format, compression)?;
        writer.flush()?;
    }
    staged.persist(path).map_err(|e| BackendError::Io(e.error))?;
    Ok(())
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) = image::image_dimensions(path).map_err(|e| match e {
            image::ImageError::IoError(io) => BackendError::Io(io),
            other => BackendError::Decode(format!("{}: {}", path.display(), other)),
        })?;
        Ok(Dimensions { width, height })
    }

    fn resize(&self, params: &ResizeParams) -> Result<(), BackendError> {
        let img = load_image(&params.source)?;
        let resized = img.resize_exact(params.width, params.height, FilterType::Lanczos3);
        save_image(&resized, &params.output, params.format, params.compression)
    }
}
