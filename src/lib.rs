//! # Cardscan
//!
//! Turns photos of business cards into contacts. A multimodal extraction
//! service reads the card images and answers with contact fields plus
//! optional bounding boxes for the company logo and a portrait photo.
//! Cardscan crops those graphics out of the submitted images, lets the user
//! fine-tune them on a square canvas, and exports the result as a vCard 3.0
//! file.
//!
//! # Architecture: Extract, Crop, Export
//!
//! ```text
//! 1. Extract   card images  →  ContactRecord        (service answer, parsed)
//! 2. Crop      boxes        →  logo / photo JPEGs   (auto, then optional manual adjust)
//! 3. Export    record       →  Jane_Doe.vcf         (text/vcard)
//! ```
//!
//! Each stage is a plain function over in-memory values. Image work goes
//! through the [`imaging::ImageBackend`] trait, so the crop and adjust logic
//! is unit tested against a recording mock without decoding or encoding
//! real pixels.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`extraction`] | Interprets the extraction service's JSON answer; one user-facing error |
//! | [`pipeline`] | Decodes submitted images and auto-crops the logo and photo slots |
//! | [`adjuster`] | Pan/zoom state machine and canvas rendering for manual adjustment |
//! | [`vcard`] | vCard 3.0 serialization and `.vcf` export |
//! | [`imaging`] | Box-to-pixel math, crop/composite planning, `image` crate backend |
//! | [`types`] | Contact record, bounding boxes, graphic slots, encoded images |
//! | [`naming`] | Output filenames derived from the contact |
//! | [`config`] | `cardscan.toml` loading, merging over stock defaults, validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Normalized Boxes
//!
//! The service reports boxes on a 0-1000 grid independent of the real image
//! size. Conversion to pixels happens once, in
//! [`imaging::box_to_pixel_rect`], which also clamps out-of-range values so a
//! sloppy answer degrades to a smaller crop instead of an error.
//!
//! ## Graphics Are Optional
//!
//! A missing box, a box pointing at an image that was never submitted, or a
//! box with no area all leave the slot untouched. The contact is still
//! exported; only the graphic is skipped.
//!
//! ## Preview Is Not Output
//!
//! The photo slot shows a circular guide while adjusting. The saved image is
//! always rendered from scratch without it, so `photo.jpg` holds the full
//! square. Graphics are saved as separate files next to the `.vcf`; the card
//! itself carries text properties only.

pub mod adjuster;
pub mod config;
pub mod extraction;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod pipeline;
pub mod types;
pub mod vcard;

#[cfg(test)]
pub(crate) mod test_helpers;
