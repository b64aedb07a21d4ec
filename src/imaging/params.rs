//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the high-level [`operations`](super::operations) module
//! (which plans crops and canvas renders) and the [`backend`](super::backend)
//! (which does the pixel work). Keeping them separate lets tests swap in a
//! recording backend without touching the planning logic.
//!
//! ## Types
//!
//! - [`Quality`]: Lossy encoding quality (1–100, default 85). Clamped on construction.
//! - [`CropParams`]: Pixel region to cut from a source plus the downscaled output size.
//! - [`CompositeParams`]: Square canvas size and where the scaled source lands on it.

use super::calculations::{PixelRect, Placement};

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u8);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(85)
    }
}

/// Parameters for a crop-and-encode operation.
#[derive(Debug, Clone, PartialEq)]
pub struct CropParams {
    /// Region of the source to keep.
    pub region: PixelRect,
    /// Final output dimensions (region scaled down, never up).
    pub output_width: u32,
    pub output_height: u32,
    pub quality: Quality,
}

/// Parameters for rendering a source image onto the adjuster canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeParams {
    /// Side length of the square canvas.
    pub canvas_size: u32,
    pub placement: Placement,
}
