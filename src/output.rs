//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Contact
//!
//! ```text
//! Contact
//!     Full name: Jane Doe
//!     Organization: Acme Corp
//!     Email: jane@acme.example
//! ```
//!
//! ## Crop
//!
//! ```text
//! Graphics
//!     logo: cropped 400x240 from image 1
//!         Saved: out/logo.jpg
//!     photo: no bounding box
//! ```
//!
//! ## Adjust
//!
//! ```text
//! photo: image 2, zoom 1.25, offset (30, -10) → 400x400
//!     Saved: out/photo.jpg
//! ```
//!
//! # Architecture
//!
//! Each output has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O.

use crate::adjuster::AdjustState;
use crate::pipeline::{CropReport, SlotOutcome};
use crate::types::{ContactField, ContactRecord, EncodedImage, GraphicSlot};
use std::path::{Path, PathBuf};

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn field_label(field: ContactField) -> &'static str {
    match field {
        ContactField::FirstName => "First name",
        ContactField::LastName => "Last name",
        ContactField::FullName => "Full name",
        ContactField::Organization => "Organization",
        ContactField::JobTitle => "Job title",
        ContactField::Email => "Email",
        ContactField::Phone => "Phone",
        ContactField::Mobile => "Mobile",
        ContactField::Website => "Website",
        ContactField::Address => "Address",
        ContactField::City => "City",
        ContactField::State => "State",
        ContactField::ZipCode => "Zip code",
        ContactField::Country => "Country",
        ContactField::Notes => "Notes",
    }
}

// ============================================================================
// Contact
// ============================================================================

/// Format the non-empty fields of a contact.
pub fn format_contact(contact: &ContactRecord) -> Vec<String> {
    let mut lines = vec!["Contact".to_string()];
    let mut any = false;
    for field in ContactField::ALL {
        if let Some(value) = contact.get(field) {
            lines.push(format!("{}{}: {}", indent(1), field_label(field), value));
            any = true;
        }
    }
    if !any {
        lines.push(format!("{}(no fields)", indent(1)));
    }
    lines
}

pub fn print_contact(contact: &ContactRecord) {
    for line in format_contact(contact) {
        println!("{}", line);
    }
}

// ============================================================================
// Crop
// ============================================================================

fn outcome_text(outcome: &SlotOutcome) -> String {
    match outcome {
        SlotOutcome::Cropped {
            image_index,
            width,
            height,
        } => format!("cropped {}x{} from image {}", width, height, image_index + 1),
        SlotOutcome::NoBox => "no bounding box".to_string(),
        SlotOutcome::IndexOutOfRange {
            image_index,
            image_count,
        } => format!(
            "skipped, box refers to image {} but {} submitted",
            image_index + 1,
            image_count
        ),
        SlotOutcome::Degenerate { image_index } => {
            format!("skipped, empty box on image {}", image_index + 1)
        }
    }
}

/// Format an auto-crop report with the paths the graphics were saved to.
pub fn format_crop_report(report: &CropReport, saved: &[(GraphicSlot, PathBuf)]) -> Vec<String> {
    let mut lines = vec!["Graphics".to_string()];
    for (slot, outcome) in &report.slots {
        lines.push(format!("{}{}: {}", indent(1), slot, outcome_text(outcome)));
        if let Some((_, path)) = saved.iter().find(|(s, _)| s == slot) {
            lines.push(format!("{}Saved: {}", indent(2), path.display()));
        }
    }
    lines
}

pub fn print_crop_report(report: &CropReport, saved: &[(GraphicSlot, PathBuf)]) {
    for line in format_crop_report(report, saved) {
        println!("{}", line);
    }
}

// ============================================================================
// Adjust
// ============================================================================

/// Format the result of an applied adjustment.
pub fn format_adjust_result(
    slot: GraphicSlot,
    state: &AdjustState,
    image: &EncodedImage,
    saved: &Path,
    preview: Option<&Path>,
) -> Vec<String> {
    let mut lines = vec![format!(
        "{}: image {}, zoom {:.2}, offset ({}, {}) → {}x{}",
        slot,
        state.selected + 1,
        state.zoom,
        state.offset.0,
        state.offset.1,
        image.width,
        image.height
    )];
    lines.push(format!("{}Saved: {}", indent(1), saved.display()));
    if let Some(p) = preview {
        lines.push(format!("{}Preview: {}", indent(1), p.display()));
    }
    lines
}

pub fn print_adjust_result(
    slot: GraphicSlot,
    state: &AdjustState,
    image: &EncodedImage,
    saved: &Path,
    preview: Option<&Path>,
) {
    for line in format_adjust_result(slot, state, image, saved, preview) {
        println!("{}", line);
    }
}

// ============================================================================
// vCard
// ============================================================================

pub fn format_vcard_saved(path: &Path, mime: &str) -> String {
    format!("vCard: {} ({})", path.display(), mime)
}

pub fn print_vcard_saved(path: &Path, mime: &str) {
    println!("{}", format_vcard_saved(path, mime));
}
