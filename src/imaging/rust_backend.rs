//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, WebP) | `image::ImageReader` with format sniffing |
//! | Crop | `image::DynamicImage::crop_imm` |
//! | Downscale / zoom | `image::DynamicImage::resize_exact` with `Lanczos3` |
//! | Composite | `image::imageops::overlay` onto a white RGBA canvas |
//! | Encode | `image::codecs::jpeg::JpegEncoder` |

use super::backend::{BackendError, Canvas, ImageBackend, SourceImage};
use super::calculations::visible_region;
use super::params::{CompositeParams, CropParams, Quality};
use crate::types::EncodedImage;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageReader, Rgba, RgbImage};
use std::io::Cursor;

/// Canvas background. JPEG has no alpha, so uncovered areas must be opaque.
const CANVAS_BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Pure Rust backend using the `image` crate ecosystem.
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

/// Encode RGB pixels as JPEG.
fn encode_jpeg(rgb: &RgbImage, quality: Quality) -> Result<EncodedImage, BackendError> {
    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, quality.value())
        .write_image(
            rgb.as_raw(),
            rgb.width(),
            rgb.height(),
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| BackendError::ProcessingFailed(format!("JPEG encode failed: {}", e)))?;
    Ok(EncodedImage {
        bytes,
        mime: "image/jpeg",
        width: rgb.width(),
        height: rgb.height(),
    })
}

/// Flatten RGBA onto the canvas background before dropping alpha.
fn flatten(canvas: &Canvas) -> RgbImage {
    RgbImage::from_fn(canvas.width(), canvas.height(), |x, y| {
        let Rgba([r, g, b, a]) = *canvas.get_pixel(x, y);
        let blend = |c: u8, bg: u8| {
            ((c as u32 * a as u32 + bg as u32 * (255 - a as u32)) / 255) as u8
        };
        image::Rgb([
            blend(r, CANVAS_BACKGROUND.0[0]),
            blend(g, CANVAS_BACKGROUND.0[1]),
            blend(b, CANVAS_BACKGROUND.0[2]),
        ])
    })
}

impl ImageBackend for RustBackend {
    fn decode(&self, bytes: &[u8]) -> Result<SourceImage, BackendError> {
        let pixels = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(BackendError::Io)?
            .decode()
            .map_err(|e| BackendError::ProcessingFailed(format!("Failed to decode image: {}", e)))?;
        Ok(SourceImage::from_image(pixels))
    }

    fn crop(&self, source: &SourceImage, params: &CropParams) -> Result<EncodedImage, BackendError> {
        let r = params.region;
        let dims = source.dimensions();
        if r.width == 0
            || r.height == 0
            || r.x + r.width > dims.width
            || r.y + r.height > dims.height
        {
            return Err(BackendError::ProcessingFailed(format!(
                "Crop region {}x{}+{}+{} outside {}x{} source",
                r.width, r.height, r.x, r.y, dims.width, dims.height
            )));
        }

        let region = source.pixels().crop_imm(r.x, r.y, r.width, r.height);
        let scaled = if (params.output_width, params.output_height) == (r.width, r.height) {
            region
        } else {
            region.resize_exact(
                params.output_width,
                params.output_height,
                FilterType::Lanczos3,
            )
        };
        encode_jpeg(&scaled.to_rgb8(), params.quality)
    }

    fn composite(
        &self,
        source: &SourceImage,
        params: &CompositeParams,
    ) -> Result<Canvas, BackendError> {
        let size = params.canvas_size;
        let mut canvas = Canvas::from_pixel(size, size, CANVAS_BACKGROUND);

        let Some(visible) = visible_region(params.placement, source.dimensions().as_tuple(), size)
        else {
            return Ok(canvas);
        };

        let src = visible.source;
        let patch: DynamicImage = source
            .pixels()
            .crop_imm(src.x, src.y, src.width, src.height)
            .resize_exact(visible.dest.width, visible.dest.height, FilterType::Lanczos3);
        image::imageops::overlay(
            &mut canvas,
            &patch.to_rgba8(),
            visible.dest.x as i64,
            visible.dest.y as i64,
        );
        Ok(canvas)
    }

    fn encode(&self, canvas: &Canvas, quality: Quality) -> Result<EncodedImage, BackendError> {
        encode_jpeg(&flatten(canvas), quality)
    }
}
