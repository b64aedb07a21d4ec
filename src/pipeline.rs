//! Auto-crop stage: extraction result + submitted images → contact graphics.
//!
//! Runs after the extraction response has completely arrived, since the
//! crops depend on its bounding boxes.
//!
//! ```text
//! submitted images ──decode (parallel)──▶ SourceImage[]
//!                                             │
//! ContactRecord.logoBox / photoBox ──crop──▶ ContactRecord.logo / photo
//! ```
//!
//! ## Slot rules
//!
//! Each slot is handled on its own; one slot failing to produce an image
//! never affects the other.
//!
//! - no box → slot left as is
//! - `imageIndex` outside the submitted images → slot left as is (the
//!   service reordered or dropped images; the box cannot be trusted)
//! - degenerate box → slot left as is
//! - otherwise the crop overwrites the slot image
//!
//! ## Parallel Decoding
//!
//! Submitted images are decoded in parallel using [rayon](https://docs.rs/rayon);
//! output order matches submission order.

use crate::imaging::{BackendError, CropConfig, ImageBackend, SourceImage, crop_to_box};
use crate::types::{ContactRecord, GraphicSlot};
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Image {index} could not be decoded: {source}")]
    Decode {
        index: usize,
        #[source]
        source: BackendError,
    },
    #[error("Image processing failed: {0}")]
    Imaging(#[from] BackendError),
}

/// What happened to one graphic slot during auto-crop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotOutcome {
    /// Slot image replaced by a crop of the given size.
    Cropped {
        image_index: usize,
        width: u32,
        height: u32,
    },
    /// The extraction result had no box for this slot.
    NoBox,
    /// The box pointed at an image that was never submitted.
    IndexOutOfRange { image_index: usize, image_count: usize },
    /// The box had no usable area.
    Degenerate { image_index: usize },
}

/// Per-slot outcomes of one auto-crop run, in [`GraphicSlot::ALL`] order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CropReport {
    pub slots: Vec<(GraphicSlot, SlotOutcome)>,
}

impl CropReport {
    pub fn outcome(&self, slot: GraphicSlot) -> Option<&SlotOutcome> {
        self.slots.iter().find(|(s, _)| *s == slot).map(|(_, o)| o)
    }

    pub fn cropped_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|(_, o)| matches!(o, SlotOutcome::Cropped { .. }))
            .count()
    }
}

/// Decode every submitted image, in parallel, keeping submission order.
pub fn decode_sources(
    backend: &impl ImageBackend,
    inputs: &[Vec<u8>],
) -> Result<Vec<SourceImage>, PipelineError> {
    inputs
        .par_iter()
        .enumerate()
        .map(|(index, bytes)| {
            backend
                .decode(bytes)
                .map_err(|source| PipelineError::Decode { index, source })
        })
        .collect()
}

fn crop_slot(
    backend: &impl ImageBackend,
    record: &mut ContactRecord,
    sources: &[SourceImage],
    slot: GraphicSlot,
    config: &CropConfig,
) -> Result<SlotOutcome, PipelineError> {
    let Some(bbox) = record.graphic_box(slot).copied() else {
        debug!(%slot, "no bounding box, skipping");
        return Ok(SlotOutcome::NoBox);
    };

    let Some(source) = sources.get(bbox.image_index) else {
        warn!(
            %slot,
            image_index = bbox.image_index,
            image_count = sources.len(),
            "bounding box refers to an image that was not submitted"
        );
        return Ok(SlotOutcome::IndexOutOfRange {
            image_index: bbox.image_index,
            image_count: sources.len(),
        });
    };

    match crop_to_box(backend, source, &bbox, config)? {
        Some(image) => {
            let outcome = SlotOutcome::Cropped {
                image_index: bbox.image_index,
                width: image.width,
                height: image.height,
            };
            info!(%slot, width = image.width, height = image.height, "graphic cropped");
            record.set_graphic(slot, image);
            Ok(outcome)
        }
        None => {
            debug!(%slot, ?bbox, "degenerate bounding box, leaving slot unset");
            Ok(SlotOutcome::Degenerate {
                image_index: bbox.image_index,
            })
        }
    }
}

/// Crop the logo and photo slots of `record` from the submitted images.
pub fn auto_crop(
    backend: &impl ImageBackend,
    record: &mut ContactRecord,
    sources: &[SourceImage],
    config: &CropConfig,
) -> Result<CropReport, PipelineError> {
    let mut slots = Vec::with_capacity(GraphicSlot::ALL.len());
    for slot in GraphicSlot::ALL {
        let outcome = crop_slot(backend, record, sources, slot, config)?;
        slots.push((slot, outcome));
    }
    Ok(CropReport { slots })
}
