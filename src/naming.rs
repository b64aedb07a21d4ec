//! Output file naming.
//!
//! - vCards are named after the contact: whitespace runs in the full name
//!   become a single `_` (`"Jane  Doe"` → `Jane_Doe.vcf`). A contact without
//!   a full name is saved as `contact.vcf`. Path separators and control
//!   characters count as whitespace and a leading run of dots becomes `_`,
//!   so the name always stays a single file inside the output directory
//!   (`"../x"` → `_x.vcf`).
//! - Slot images are named after the slot (`logo.jpg`, `photo.jpg`).

use crate::types::{EncodedImage, GraphicSlot};

/// Stem used when a contact has no full name.
pub const DEFAULT_STEM: &str = "contact";

/// Replace each run of whitespace with a single underscore.
///
/// - `"Jane Doe"` → `"Jane_Doe"`
/// - `"Mary  Ann\tSmith"` → `"Mary_Ann_Smith"`
/// - `" Lead"` → `"_Lead"`
pub fn underscore_whitespace(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_space = false;
    for c in name.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push('_');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

/// Turn a display name into a stem usable as one path component.
fn path_safe_stem(name: &str) -> String {
    let spaced: String = name
        .chars()
        .map(|c| {
            if matches!(c, '/' | '\\') || c.is_control() {
                ' '
            } else {
                c
            }
        })
        .collect();
    let stem = underscore_whitespace(&spaced);
    let undotted = stem.trim_start_matches('.');
    if undotted.len() == stem.len() || undotted.starts_with('_') {
        undotted.to_string()
    } else {
        format!("_{undotted}")
    }
}

/// Suggested `.vcf` filename for a contact's full name.
pub fn vcard_filename(full_name: Option<&str>) -> String {
    let stem = match full_name {
        Some(name) if !name.is_empty() => path_safe_stem(name),
        _ => DEFAULT_STEM.to_string(),
    };
    format!("{stem}.vcf")
}

/// Filename for a slot image, extension taken from its encoding.
pub fn graphic_filename(slot: GraphicSlot, image: &EncodedImage) -> String {
    format!("{}.{}", slot.as_str(), image.extension())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_spaces_become_underscores() {
        assert_eq!(underscore_whitespace("Jane Doe"), "Jane_Doe");
    }

    #[test]
    fn whitespace_runs_collapse() {
        assert_eq!(underscore_whitespace("Mary  Ann\tSmith"), "Mary_Ann_Smith");
    }

    #[test]
    fn leading_and_trailing_whitespace_is_kept_as_underscore() {
        assert_eq!(underscore_whitespace(" Lead "), "_Lead_");
    }

    #[test]
    fn vcard_filename_from_full_name() {
        assert_eq!(vcard_filename(Some("Jane Doe")), "Jane_Doe.vcf");
    }

    #[test]
    fn vcard_filename_defaults_when_missing() {
        assert_eq!(vcard_filename(None), "contact.vcf");
        assert_eq!(vcard_filename(Some("")), "contact.vcf");
    }

    #[test]
    fn vcard_filename_replaces_path_separators() {
        assert_eq!(vcard_filename(Some("Jane Doe / Acme")), "Jane_Doe_Acme.vcf");
        assert_eq!(vcard_filename(Some("Acme\\Sales")), "Acme_Sales.vcf");
        assert_eq!(vcard_filename(Some("Jane\nDoe")), "Jane_Doe.vcf");
    }

    #[test]
    fn vcard_filename_neutralizes_leading_dots() {
        assert_eq!(vcard_filename(Some("../escaped")), "_escaped.vcf");
        assert_eq!(vcard_filename(Some("..")), "_.vcf");
        assert_eq!(vcard_filename(Some(".hidden")), "_hidden.vcf");
        assert_eq!(vcard_filename(Some("J. Doe")), "J._Doe.vcf");
    }

    #[test]
    fn graphic_filename_uses_slot_and_extension() {
        let img = EncodedImage {
            bytes: Vec::new(),
            mime: "image/jpeg",
            width: 1,
            height: 1,
        };
        assert_eq!(graphic_filename(GraphicSlot::Photo, &img), "photo.jpg");
        assert_eq!(graphic_filename(GraphicSlot::Logo, &img), "logo.jpg");
    }
}
