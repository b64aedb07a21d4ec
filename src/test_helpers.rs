//! Shared test utilities for the cardscan test suite.
//!
//! Builds synthetic card images in memory so tests never depend on fixture
//! files, and provides a filled-in contact record.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let img = quadrant_image(200, 100);
//! let bytes = encode_png(&img);
//! let contact = sample_contact();
//! ```

use crate::types::{ContactField, ContactRecord};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

pub const RED: Rgb<u8> = Rgb([220, 30, 30]);
pub const GREEN: Rgb<u8> = Rgb([30, 220, 30]);
pub const BLUE: Rgb<u8> = Rgb([30, 30, 220]);
pub const YELLOW: Rgb<u8> = Rgb([220, 220, 30]);

// =========================================================================
// Synthetic images
// =========================================================================

/// Image split into four solid quadrants: red (top-left), green (top-right),
/// blue (bottom-left), yellow (bottom-right).
pub fn quadrant_image(width: u32, height: u32) -> DynamicImage {
    let img = RgbImage::from_fn(width, height, |x, y| {
        match (x < width / 2, y < height / 2) {
            (true, true) => RED,
            (false, true) => GREEN,
            (true, false) => BLUE,
            (false, false) => YELLOW,
        }
    });
    DynamicImage::ImageRgb8(img)
}

/// Single solid-color image.
pub fn solid_image(width: u32, height: u32, color: Rgb<u8>) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, color))
}

/// Lossless PNG bytes for an image.
pub fn encode_png(img: &DynamicImage) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png).unwrap();
    buf.into_inner()
}

/// True when every channel of `actual` is within `tolerance` of `expected`.
/// JPEG round trips shift solid colors slightly.
pub fn color_close(actual: Rgb<u8>, expected: Rgb<u8>, tolerance: u8) -> bool {
    actual
        .0
        .iter()
        .zip(expected.0.iter())
        .all(|(a, e)| a.abs_diff(*e) <= tolerance)
}

// =========================================================================
// Contacts
// =========================================================================

/// A contact with every string field populated.
pub fn sample_contact() -> ContactRecord {
    let mut c = ContactRecord::default();
    for (field, value) in [
        (ContactField::FirstName, "Jane"),
        (ContactField::LastName, "Doe"),
        (ContactField::FullName, "Jane Doe"),
        (ContactField::Organization, "Acme Corp"),
        (ContactField::JobTitle, "Chief Widget Officer"),
        (ContactField::Email, "jane@acme.example"),
        (ContactField::Phone, "+1 555 0100"),
        (ContactField::Mobile, "+1 555 0199"),
        (ContactField::Website, "https://acme.example"),
        (ContactField::Address, "1 Main St"),
        (ContactField::City, "Springfield"),
        (ContactField::State, "IL"),
        (ContactField::ZipCode, "62701"),
        (ContactField::Country, "USA"),
        (ContactField::Notes, "Met at the expo"),
    ] {
        c.set(field, value);
    }
    c
}
