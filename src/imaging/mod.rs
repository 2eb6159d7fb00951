//! Image processing in pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::image_dimensions` |
//! | **Decide** | [`should_resize`] / [`compute_target_size`] |
//! | **Resize → JPEG/PNG** | Lanczos3 + `image` encoders |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Quality, format and compression types
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]

pub mod backend;
mod calculations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{compute_target_size, should_resize};
pub use params::{
    CompressionParam, ImageFormat, Quality, ResizeParams, map_quality_to_compression,
};
pub use rust_backend::RustBackend;
