//! High-level image operations.
//!
//! These functions combine calculations with backend execution.
//! They take configuration, compute parameters, and call the backend.

use super::backend::{BackendError, Canvas, Dimensions, ImageBackend, SourceImage};
use super::calculations::{box_to_pixel_rect, canvas_placement, downscaled_dimensions};
use super::params::{CompositeParams, CropParams, Quality};
use crate::types::{BoundingBox, EncodedImage};

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Configuration for box-driven crops.
#[derive(Debug, Clone)]
pub struct CropConfig {
    /// Cap on the longer output edge.
    pub max_edge: u32,
    pub quality: Quality,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            max_edge: 400,
            quality: Quality::default(),
        }
    }
}

/// Plan a crop without executing it.
///
/// Returns `None` for degenerate boxes; the caller leaves the field unset.
pub fn plan_crop(dims: Dimensions, bbox: &BoundingBox, config: &CropConfig) -> Option<CropParams> {
    let region = box_to_pixel_rect(bbox, dims.as_tuple())?;
    let (output_width, output_height) =
        downscaled_dimensions(region.width, region.height, config.max_edge);
    Some(CropParams {
        region,
        output_width,
        output_height,
        quality: config.quality,
    })
}

/// Crop the region a bounding box describes and encode it.
///
/// `Ok(None)` means "no crop possible" (degenerate box), not a failure.
pub fn crop_to_box(
    backend: &impl ImageBackend,
    source: &SourceImage,
    bbox: &BoundingBox,
    config: &CropConfig,
) -> Result<Option<EncodedImage>> {
    match plan_crop(source.dimensions(), bbox, config) {
        Some(params) => backend.crop(source, &params).map(Some),
        None => Ok(None),
    }
}

/// Plan a canvas render: `source` scaled by `zoom`, centered, shifted by `offset`.
pub fn plan_composite(
    dims: Dimensions,
    zoom: f64,
    offset: (f64, f64),
    canvas_size: u32,
) -> CompositeParams {
    CompositeParams {
        canvas_size,
        placement: canvas_placement(dims.as_tuple(), zoom, offset, canvas_size),
    }
}

/// Render a source image onto a square canvas.
pub fn render_canvas(
    backend: &impl ImageBackend,
    source: &SourceImage,
    zoom: f64,
    offset: (f64, f64),
    canvas_size: u32,
) -> Result<Canvas> {
    let params = plan_composite(source.dimensions(), zoom, offset, canvas_size);
    backend.composite(source, &params)
}
