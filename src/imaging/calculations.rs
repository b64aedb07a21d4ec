//! Pure calculation functions for crop regions and canvas placement.
//!
//! All functions here are pure and testable without any I/O or images.

use crate::types::{BoundingBox, NORMALIZED_MAX};

/// An axis-aligned pixel rectangle inside a source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Where a scaled source image lands on the adjuster canvas.
///
/// `x`/`y` may be negative or exceed the canvas when the image is panned
/// partly out of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

/// Convert a normalized bounding box to a pixel rectangle.
///
/// # Arguments
/// * `bbox` - Box in `[0, 1000]` normalized space
/// * `dims` - Source image dimensions (width, height)
///
/// # Returns
/// * `None` if the box is degenerate (`xmax <= xmin` or `ymax <= ymin`) or
///   shrinks to zero pixels after clipping to the image.
/// * `Some(rect)` otherwise, always inside the image bounds.
///
/// # Examples
/// ```
/// # use cardscan::imaging::box_to_pixel_rect;
/// # use cardscan::types::BoundingBox;
/// let rect = box_to_pixel_rect(&BoundingBox::new(0.0, 0.0, 500.0, 250.0, 0), (800, 600)).unwrap();
/// assert_eq!((rect.x, rect.y, rect.width, rect.height), (0, 0, 200, 300));
/// ```
pub fn box_to_pixel_rect(bbox: &BoundingBox, dims: (u32, u32)) -> Option<PixelRect> {
    if !bbox.is_valid() {
        return None;
    }
    let (img_w, img_h) = dims;
    let b = bbox.clamped();

    let x = (b.xmin / NORMALIZED_MAX * img_w as f64).round() as u32;
    let y = (b.ymin / NORMALIZED_MAX * img_h as f64).round() as u32;
    let w = ((b.xmax - b.xmin) / NORMALIZED_MAX * img_w as f64).round() as u32;
    let h = ((b.ymax - b.ymin) / NORMALIZED_MAX * img_h as f64).round() as u32;

    let x = x.min(img_w);
    let y = y.min(img_h);
    let width = w.min(img_w - x);
    let height = h.min(img_h - y);

    if width == 0 || height == 0 {
        return None;
    }
    Some(PixelRect {
        x,
        y,
        width,
        height,
    })
}

/// Scale factor that brings the longer edge down to `cap`. Never above 1.
pub fn downscale_factor(width: u32, height: u32, cap: u32) -> f64 {
    let longer = width.max(height);
    if longer == 0 {
        return 1.0;
    }
    (cap as f64 / longer as f64).min(1.0)
}

/// Output dimensions after applying [`downscale_factor`].
///
/// Each side is at least 1 px and the longer side never exceeds `cap`.
pub fn downscaled_dimensions(width: u32, height: u32, cap: u32) -> (u32, u32) {
    let factor = downscale_factor(width, height, cap);
    if factor >= 1.0 {
        return (width, height);
    }
    let w = ((width as f64 * factor).round() as u32).clamp(1, cap.max(1));
    let h = ((height as f64 * factor).round() as u32).clamp(1, cap.max(1));
    (w, h)
}

/// Clamp a requested zoom into `[min, max]`.
pub fn clamp_zoom(value: f64, min: f64, max: f64) -> f64 {
    value.clamp(min, max)
}

/// Zoom at which the source's shorter side exactly spans the reference square,
/// clamped into the zoom range.
///
/// ```
/// # use cardscan::imaging::fit_zoom;
/// // 800x400 landscape into a 400 square: short side 400 → zoom 1.0
/// assert_eq!(fit_zoom((800, 400), 400, 0.1, 3.0), 1.0);
/// ```
pub fn fit_zoom(dims: (u32, u32), reference: u32, min: f64, max: f64) -> f64 {
    let shorter = dims.0.min(dims.1);
    if shorter == 0 {
        return clamp_zoom(1.0, min, max);
    }
    clamp_zoom(reference as f64 / shorter as f64, min, max)
}

/// Place a source image of `dims` on a square canvas: scaled by `zoom`,
/// centered, then translated by `offset`.
pub fn canvas_placement(dims: (u32, u32), zoom: f64, offset: (f64, f64), canvas: u32) -> Placement {
    let width = ((dims.0 as f64 * zoom).round() as u32).max(1);
    let height = ((dims.1 as f64 * zoom).round() as u32).max(1);
    let center = canvas as f64 / 2.0;
    let x = (center - width as f64 / 2.0 + offset.0).round() as i64;
    let y = (center - height as f64 / 2.0 + offset.1).round() as i64;
    Placement {
        x,
        y,
        width,
        height,
    }
}

/// The part of a placed image that is actually visible on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleRegion {
    /// Canvas rectangle that receives pixels.
    pub dest: PixelRect,
    /// Source rectangle those pixels are resampled from.
    pub source: PixelRect,
}

/// Intersect a placement with the canvas and map the overlap back to source
/// pixels, so only the visible part of the source needs resampling.
///
/// Returns `None` when the image is panned completely out of view.
pub fn visible_region(placement: Placement, source: (u32, u32), canvas: u32) -> Option<VisibleRegion> {
    let (src_w, src_h) = source;
    if src_w == 0 || src_h == 0 {
        return None;
    }
    let x0 = placement.x.max(0);
    let y0 = placement.y.max(0);
    // Placement coordinates saturate at the i64 range for extreme pans.
    let x1 = placement.x.saturating_add(placement.width as i64).min(canvas as i64);
    let y1 = placement.y.saturating_add(placement.height as i64).min(canvas as i64);
    if x0 >= x1 || y0 >= y1 {
        return None;
    }

    let sx = src_w as f64 / placement.width as f64;
    let sy = src_h as f64 / placement.height as f64;
    let to_src = |v: i64, origin: i64, scale: f64, limit: u32, round_up: bool| {
        let raw = (v - origin) as f64 * scale;
        let snapped = if round_up { raw.ceil() } else { raw.floor() };
        (snapped.max(0.0) as u32).min(limit)
    };
    let src_x0 = to_src(x0, placement.x, sx, src_w - 1, false);
    let src_y0 = to_src(y0, placement.y, sy, src_h - 1, false);
    let src_x1 = to_src(x1, placement.x, sx, src_w, true).max(src_x0 + 1);
    let src_y1 = to_src(y1, placement.y, sy, src_h, true).max(src_y0 + 1);

    Some(VisibleRegion {
        dest: PixelRect {
            x: x0 as u32,
            y: y0 as u32,
            width: (x1 - x0) as u32,
            height: (y1 - y0) as u32,
        },
        source: PixelRect {
            x: src_x0,
            y: src_y0,
            width: src_x1 - src_x0,
            height: src_y1 - src_y0,
        },
    })
}
