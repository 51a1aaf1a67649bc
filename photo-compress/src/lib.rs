//! # Photo Compress
//!
//! Shrinks photos to a byte budget before they are attached to a report.
//!
//! This crate provides:
//! - Header probing and orientation-aware decoding for JPEG, PNG and WebP input
//! - Lanczos3 rasterization to a bounded long edge
//! - An iterative quality-then-dimension search that stops at the first JPEG
//!   encode within budget, with a best-effort fallback when none fits
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use photo_compress::{compress, CompressOptions};
//!
//! let picked = std::fs::read("IMG_0042.HEIC.jpg")?;
//! let photo = compress(picked, CompressOptions::default()).await?;
//! if photo.is_best_effort() {
//!     log::warn!("Photo is still {} bytes", photo.byte_size());
//! }
//! ```

pub mod compressor;
pub mod error;
pub mod raster;

pub use compressor::{
    attempt_plan, compress, compress_image, Attempt, CompressOptions, CompressedImage,
    CompressionOutcome, DIMENSION_SHRINK, OUTPUT_CONTENT_TYPE,
};
pub use error::CompressError;
pub use raster::{inspect, ImageInfo};
