//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the four operations every backend must
//! support: decode, crop, composite and encode.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate. Everything works on in-memory buffers; reading files and writing
//! results is left to callers.

use super::params::{CompositeParams, CropParams, Quality};
use crate::types::EncodedImage;
use image::{DynamicImage, RgbaImage};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Pixel dimensions of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn as_tuple(self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Rendered adjuster canvas (RGBA so the preview guide can be blended on top).
pub type Canvas = RgbaImage;

/// A decoded source image. Decoded once, then shared read-only by the crop
/// stage and the adjuster.
#[derive(Debug, Clone)]
pub struct SourceImage {
    pixels: DynamicImage,
}

impl SourceImage {
    pub fn from_image(pixels: DynamicImage) -> Self {
        Self { pixels }
    }

    pub fn pixels(&self) -> &DynamicImage {
        &self.pixels
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.pixels.width(),
            height: self.pixels.height(),
        }
    }
}

/// Trait for image processing backends.
///
/// Every backend must implement all four operations so the crop engine and
/// the adjuster stay backend-agnostic. `Sync` lets the pipeline decode the
/// submitted images on the rayon pool.
pub trait ImageBackend: Sync {
    /// Decode an encoded raster (JPEG, PNG, WebP).
    fn decode(&self, bytes: &[u8]) -> Result<SourceImage, BackendError>;

    /// Cut `params.region` out of `source`, scale to the output size, encode.
    fn crop(&self, source: &SourceImage, params: &CropParams) -> Result<EncodedImage, BackendError>;

    /// Render `source` onto a square canvas at the given placement.
    fn composite(
        &self,
        source: &SourceImage,
        params: &CompositeParams,
    ) -> Result<Canvas, BackendError>;

    /// Encode a rendered canvas for embedding in a contact record.
    fn encode(&self, canvas: &Canvas, quality: Quality) -> Result<EncodedImage, BackendError>;
}
