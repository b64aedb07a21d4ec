//! Manual pan/zoom adjustment of a contact graphic.
//!
//! A [`GraphicAdjuster`] exists only while the user is editing one slot. It
//! is created by [`GraphicAdjuster::open`] and consumed by
//! [`apply`](GraphicAdjuster::apply) or [`cancel`](GraphicAdjuster::cancel),
//! so the closed state is simply "no adjuster value".
//!
//! ## State machine
//!
//! ```text
//!            open()                          apply() → EncodedImage
//! Closed ──────────────▶ Open(index, zoom, offset) ──────────────▶ Closed
//!                          │  ▲                  cancel()
//!                          └──┘ SelectImage / Zoom / Pointer* / Pan
//! ```
//!
//! Transitions are the pure function [`transition`]; the adjuster only adds
//! rendering through an [`ImageBackend`]. Everything happens in canvas pixel
//! space: the normalized bounding-box math of the crop engine is not used
//! here, only the box's image index to pick the initial source.
//!
//! ## Photo guide
//!
//! For [`GraphicSlot::Photo`] the [`preview`](GraphicAdjuster::preview)
//! dims everything outside a centered circle. [`apply`](GraphicAdjuster::apply)
//! renders a fresh canvas, so the guide never reaches the saved pixels.

use crate::imaging::{
    BackendError, Canvas, Dimensions, ImageBackend, Quality, SourceImage, clamp_zoom, fit_zoom,
    render_canvas,
};
use crate::types::{BoundingBox, EncodedImage, GraphicSlot};
use tracing::{debug, info};

/// Canvas and zoom limits for the adjuster.
#[derive(Debug, Clone, PartialEq)]
pub struct AdjusterConfig {
    /// Side of the square canvas; also the reference square for the fit zoom.
    pub canvas_size: u32,
    pub zoom_min: f64,
    pub zoom_max: f64,
    pub quality: Quality,
}

impl Default for AdjusterConfig {
    fn default() -> Self {
        Self {
            canvas_size: 400,
            zoom_min: 0.1,
            zoom_max: 3.0,
            quality: Quality::default(),
        }
    }
}

impl AdjusterConfig {
    /// Initial zoom for a source of the given size.
    pub fn fit_zoom(&self, dims: Dimensions) -> f64 {
        fit_zoom(dims.as_tuple(), self.canvas_size, self.zoom_min, self.zoom_max)
    }
}

/// User input delivered to an open adjuster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AdjustEvent {
    /// Switch to another submitted image.
    SelectImage(usize),
    /// Set the zoom factor (clamped).
    Zoom(f64),
    /// Start of a drag (mouse press / touch start).
    PointerDown { x: f64, y: f64 },
    /// Pointer movement; only pans while a drag is active.
    PointerMove { x: f64, y: f64 },
    /// End of a drag (release / touch end).
    PointerUp,
    /// Direct offset nudge, independent of any drag.
    Pan { dx: f64, dy: f64 },
}

/// Adjuster state while open.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdjustState {
    pub selected: usize,
    pub zoom: f64,
    pub offset: (f64, f64),
    /// Last pointer position of the active drag, if any.
    pub drag_anchor: Option<(f64, f64)>,
}

impl AdjustState {
    /// Entry state for `index`: fit zoom, no offset, no drag.
    pub fn fitted(index: usize, dims: Dimensions, config: &AdjusterConfig) -> Self {
        Self {
            selected: index,
            zoom: config.fit_zoom(dims),
            offset: (0.0, 0.0),
            drag_anchor: None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_anchor.is_some()
    }
}

/// Apply one event to the state.
///
/// `sources` are the dimensions of the submitted images, in order. Events
/// that would leave the state invalid (out-of-range image, non-finite zoom)
/// are ignored.
pub fn transition(
    state: AdjustState,
    event: AdjustEvent,
    sources: &[Dimensions],
    config: &AdjusterConfig,
) -> AdjustState {
    match event {
        AdjustEvent::SelectImage(index) => match sources.get(index) {
            Some(dims) => AdjustState::fitted(index, *dims, config),
            None => state,
        },
        AdjustEvent::Zoom(value) if value.is_finite() => AdjustState {
            zoom: clamp_zoom(value, config.zoom_min, config.zoom_max),
            ..state
        },
        AdjustEvent::Zoom(_) => state,
        AdjustEvent::PointerDown { x, y } => AdjustState {
            drag_anchor: Some((x, y)),
            ..state
        },
        AdjustEvent::PointerMove { x, y } => match state.drag_anchor {
            Some((ax, ay)) => match shifted(state.offset, x - ax, y - ay) {
                Some(offset) => AdjustState {
                    offset,
                    drag_anchor: Some((x, y)),
                    ..state
                },
                None => state,
            },
            None => state,
        },
        AdjustEvent::PointerUp => AdjustState {
            drag_anchor: None,
            ..state
        },
        AdjustEvent::Pan { dx, dy } => match shifted(state.offset, dx, dy) {
            Some(offset) => AdjustState { offset, ..state },
            None => state,
        },
    }
}

/// Offset moved by `(dx, dy)`, or `None` if it would stop being finite.
fn shifted(offset: (f64, f64), dx: f64, dy: f64) -> Option<(f64, f64)> {
    let next = (offset.0 + dx, offset.1 + dy);
    (next.0.is_finite() && next.1.is_finite()).then_some(next)
}

/// An open adjustment session for one graphic slot.
pub struct GraphicAdjuster<'a, B: ImageBackend> {
    backend: &'a B,
    sources: &'a [SourceImage],
    dims: Vec<Dimensions>,
    slot: GraphicSlot,
    config: AdjusterConfig,
    state: AdjustState,
}

impl<'a, B: ImageBackend> GraphicAdjuster<'a, B> {
    /// Open the adjuster for `slot`.
    ///
    /// Starts on the box's image index when it refers to a submitted image,
    /// otherwise on image 0. Returns `None` when there are no images.
    pub fn open(
        backend: &'a B,
        sources: &'a [SourceImage],
        slot: GraphicSlot,
        initial_box: Option<&BoundingBox>,
        config: AdjusterConfig,
    ) -> Option<Self> {
        let dims: Vec<Dimensions> = sources.iter().map(SourceImage::dimensions).collect();
        let first = *dims.first()?;
        let (index, start_dims) = initial_box
            .and_then(|b| dims.get(b.image_index).map(|d| (b.image_index, *d)))
            .unwrap_or((0, first));
        let state = AdjustState::fitted(index, start_dims, &config);
        debug!(%slot, index, zoom = state.zoom, "adjuster opened");
        Some(Self {
            backend,
            sources,
            dims,
            slot,
            config,
            state,
        })
    }

    pub fn slot(&self) -> GraphicSlot {
        self.slot
    }

    pub fn state(&self) -> &AdjustState {
        &self.state
    }

    pub fn image_count(&self) -> usize {
        self.sources.len()
    }

    /// Feed one event. Returns `true` when the view changed and should be
    /// re-rendered.
    pub fn handle(&mut self, event: AdjustEvent) -> bool {
        let next = transition(self.state, event, &self.dims, &self.config);
        let view_changed = next.selected != self.state.selected
            || next.zoom != self.state.zoom
            || next.offset != self.state.offset;
        if next.selected != self.state.selected {
            debug!(slot = %self.slot, index = next.selected, "adjuster switched image");
        }
        self.state = next;
        view_changed
    }

    fn selected_source(&self) -> &SourceImage {
        // `selected` only ever holds an index validated against `sources`
        &self.sources[self.state.selected]
    }

    /// Render the current view without any guide overlay.
    pub fn render(&self) -> Result<Canvas, BackendError> {
        render_canvas(
            self.backend,
            self.selected_source(),
            self.state.zoom,
            self.state.offset,
            self.config.canvas_size,
        )
    }

    /// Render the current view for display, with the circular guide for photos.
    pub fn preview(&self) -> Result<Canvas, BackendError> {
        let mut canvas = self.render()?;
        if self.slot == GraphicSlot::Photo {
            overlay_circle_guide(&mut canvas);
        }
        Ok(canvas)
    }

    /// Finish the session and return the encoded slot image.
    pub fn apply(self) -> Result<EncodedImage, BackendError> {
        let canvas = self.render()?;
        let image = self.backend.encode(&canvas, self.config.quality)?;
        info!(
            slot = %self.slot,
            index = self.state.selected,
            zoom = self.state.zoom,
            offset_x = self.state.offset.0,
            offset_y = self.state.offset.1,
            "adjusted graphic applied"
        );
        Ok(image)
    }

    /// Close the session without producing anything.
    pub fn cancel(self) {
        debug!(slot = %self.slot, "adjuster cancelled");
    }
}

/// Dim everything outside the largest centered circle to half brightness.
pub fn overlay_circle_guide(canvas: &mut Canvas) {
    let (w, h) = canvas.dimensions();
    let cx = w as f64 / 2.0;
    let cy = h as f64 / 2.0;
    let radius = cx.min(cy);
    for (x, y, px) in canvas.enumerate_pixels_mut() {
        let dx = x as f64 + 0.5 - cx;
        let dy = y as f64 + 0.5 - cy;
        if dx * dx + dy * dy > radius * radius {
            for c in px.0.iter_mut().take(3) {
                *c /= 2;
            }
        }
    }
}
