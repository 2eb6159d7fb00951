//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the processing logic (which decides what to write) and
//! the [`backend`](super::backend) (which does the actual pixel work).
//!
//! ## Types
//!
//! - [`Quality`]: User-facing quality knob (1–100, default 100). Clamped on construction.
//! - [`ImageFormat`]: The two formats this tool reads and writes, detected by extension.
//! - [`CompressionParam`]: The encoder setting derived from quality for a given format.
//! - [`ResizeParams`]: Everything one resize needs: source, output, dimensions, encoding.

use serde::Serialize;
use std::path::{Path, PathBuf};

/// Quality setting for re-encoding (1-100).
///
/// JPEG uses it as the encoder quality. PNG is lossless, so it is turned into
/// a zlib compression level instead; see [`map_quality_to_compression`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(100)
    }
}

/// Supported image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Jpeg,
    Png,
}

impl ImageFormat {
    /// Detect the format from a file extension, case-insensitively.
    ///
    /// Returns `None` for anything other than `.jpg`, `.jpeg` and `.png`.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Jpeg => "JPEG",
            Self::Png => "PNG",
        }
    }
}

/// Encoder setting applied when saving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CompressionParam {
    /// JPEG quality, 1 (smallest) to 100 (best).
    JpegQuality(u8),
    /// PNG compression level, 0 (none) to 9 (maximum).
    PngLevel(u8),
}

/// Map the user-facing quality to the encoder parameter for `format`.
///
/// - JPEG: quality passes through unchanged.
/// - PNG: quality 100 → level 0; otherwise `(100 - q) * 9 / 99` with integer
///   division, so quality 1 → level 9. Lower quality never yields a lower level.
pub fn map_quality_to_compression(quality: Quality, format: ImageFormat) -> CompressionParam {
    let q = quality.value();
    match format {
        ImageFormat::Jpeg => CompressionParam::JpegQuality(q as u8),
        ImageFormat::Png if q >= 100 => CompressionParam::PngLevel(0),
        ImageFormat::Png => CompressionParam::PngLevel(((100 - q) * 9 / 99) as u8),
    }
}

/// Parameters for a resize-and-save operation.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    pub format: ImageFormat,
    pub compression: CompressionParam,
}
