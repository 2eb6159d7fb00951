//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two operations the resizer needs:
//! identify (read dimensions) and resize (decode, resample, encode, write).
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate. Tests use the recording mock in [`tests`].

use super::params::ResizeParams;
use serde::Serialize;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Encode failed: {0}")]
    Encode(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn longest_edge(self) -> u32 {
        self.width.max(self.height)
    }
}

/// Trait for image processing backends.
///
/// Processing code only talks to this trait, so batch logic can be tested
/// without encoding real images.
pub trait ImageBackend {
    /// Get image dimensions.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Decode `params.source`, resample to the requested size and write the
    /// encoded result to `params.output`.
    ///
    /// Implementations must not leave a partially written `output` behind
    /// when decoding or encoding fails.
    fn resize(&self, params: &ResizeParams) -> Result<(), BackendError>;
}
