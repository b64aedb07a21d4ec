//! Image processing: the crop engine and canvas compositing.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` (JPEG, PNG, WebP) |
//! | **Box crop** | normalized box → pixel rect, `crop_imm`, Lanczos3 downscale |
//! | **Canvas render** | zoom + pan placement, `imageops::overlay` |
//! | **Encode** | JPEG, quality 85 by default |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for box, downscale and placement math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Canvas, Dimensions, ImageBackend, SourceImage};
pub use calculations::{
    PixelRect, Placement, box_to_pixel_rect, clamp_zoom, downscale_factor, downscaled_dimensions,
    fit_zoom,
};
pub use operations::{CropConfig, crop_to_box, plan_crop, render_canvas};
pub use params::{CompositeParams, CropParams, Quality};
pub use rust_backend::RustBackend;
