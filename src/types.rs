//! Shared types passed between extraction, cropping, adjustment and export.
//!
//! [`ContactRecord`] mirrors the JSON object the extraction service returns
//! (camelCase keys), so it deserializes straight from the response body.
//! Embedded images never come from JSON; they are filled in by the crop
//! stage or the adjuster.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Upper bound of the normalized coordinate space used by bounding boxes.
pub const NORMALIZED_MAX: f64 = 1000.0;

/// A rectangle in `[0, 1000]` normalized coordinates relative to one of the
/// submitted images.
///
/// Field order follows the extraction service (`ymin, xmin, ymax, xmax`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub ymin: f64,
    pub xmin: f64,
    pub ymax: f64,
    pub xmax: f64,
    /// Index into the submitted image list (0-based).
    #[serde(default)]
    pub image_index: usize,
}

impl BoundingBox {
    pub fn new(ymin: f64, xmin: f64, ymax: f64, xmax: f64, image_index: usize) -> Self {
        Self {
            ymin,
            xmin,
            ymax,
            xmax,
            image_index,
        }
    }

    /// A box is usable only when it has positive extent on both axes.
    pub fn is_valid(&self) -> bool {
        self.xmax > self.xmin && self.ymax > self.ymin
    }

    /// Copy with every coordinate clamped into `[0, 1000]`.
    pub fn clamped(&self) -> Self {
        let c = |v: f64| {
            if v.is_nan() {
                0.0
            } else {
                v.clamp(0.0, NORMALIZED_MAX)
            }
        };
        Self {
            ymin: c(self.ymin),
            xmin: c(self.xmin),
            ymax: c(self.ymax),
            xmax: c(self.xmax),
            image_index: self.image_index,
        }
    }
}

/// Which graphic field of a contact an image belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphicSlot {
    Logo,
    Photo,
}

impl GraphicSlot {
    pub const ALL: [GraphicSlot; 2] = [GraphicSlot::Logo, GraphicSlot::Photo];

    pub fn as_str(self) -> &'static str {
        match self {
            GraphicSlot::Logo => "logo",
            GraphicSlot::Photo => "photo",
        }
    }
}

impl fmt::Display for GraphicSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GraphicSlot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "logo" => Ok(GraphicSlot::Logo),
            "photo" => Ok(GraphicSlot::Photo),
            other => Err(format!("unknown graphic slot '{other}' (expected logo or photo)")),
        }
    }
}

/// An encoded raster image ready to embed in a contact record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub mime: &'static str,
    pub width: u32,
    pub height: u32,
}

impl EncodedImage {
    /// File extension matching the MIME type.
    pub fn extension(&self) -> &'static str {
        match self.mime {
            "image/png" => "png",
            "image/webp" => "webp",
            _ => "jpg",
        }
    }
}

/// Structured contact produced by the extraction service and edited by the user.
///
/// Empty strings and `None` mean the same thing everywhere; use
/// [`ContactRecord::get`] to read a field with that normalization applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContactRecord {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub full_name: Option<String>,
    pub organization: Option<String>,
    pub job_title: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub mobile: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_box: Option<BoundingBox>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_box: Option<BoundingBox>,
    #[serde(skip)]
    pub logo: Option<EncodedImage>,
    #[serde(skip)]
    pub photo: Option<EncodedImage>,
}

/// Editable string fields of a [`ContactRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactField {
    FirstName,
    LastName,
    FullName,
    Organization,
    JobTitle,
    Email,
    Phone,
    Mobile,
    Website,
    Address,
    City,
    State,
    ZipCode,
    Country,
    Notes,
}

impl ContactField {
    pub const ALL: [ContactField; 15] = [
        ContactField::FirstName,
        ContactField::LastName,
        ContactField::FullName,
        ContactField::Organization,
        ContactField::JobTitle,
        ContactField::Email,
        ContactField::Phone,
        ContactField::Mobile,
        ContactField::Website,
        ContactField::Address,
        ContactField::City,
        ContactField::State,
        ContactField::ZipCode,
        ContactField::Country,
        ContactField::Notes,
    ];

    /// The camelCase key used in the extraction JSON.
    pub fn key(self) -> &'static str {
        match self {
            ContactField::FirstName => "firstName",
            ContactField::LastName => "lastName",
            ContactField::FullName => "fullName",
            ContactField::Organization => "organization",
            ContactField::JobTitle => "jobTitle",
            ContactField::Email => "email",
            ContactField::Phone => "phone",
            ContactField::Mobile => "mobile",
            ContactField::Website => "website",
            ContactField::Address => "address",
            ContactField::City => "city",
            ContactField::State => "state",
            ContactField::ZipCode => "zipCode",
            ContactField::Country => "country",
            ContactField::Notes => "notes",
        }
    }
}

impl FromStr for ContactField {
    type Err = String;

    /// Accepts the camelCase key, snake_case, or any casing of either.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        ContactField::ALL
            .into_iter()
            .find(|f| f.key().to_ascii_lowercase() == wanted)
            .ok_or_else(|| format!("unknown contact field '{s}'"))
    }
}

impl ContactRecord {
    fn slot(&self, field: ContactField) -> &Option<String> {
        match field {
            ContactField::FirstName => &self.first_name,
            ContactField::LastName => &self.last_name,
            ContactField::FullName => &self.full_name,
            ContactField::Organization => &self.organization,
            ContactField::JobTitle => &self.job_title,
            ContactField::Email => &self.email,
            ContactField::Phone => &self.phone,
            ContactField::Mobile => &self.mobile,
            ContactField::Website => &self.website,
            ContactField::Address => &self.address,
            ContactField::City => &self.city,
            ContactField::State => &self.state,
            ContactField::ZipCode => &self.zip_code,
            ContactField::Country => &self.country,
            ContactField::Notes => &self.notes,
        }
    }

    fn slot_mut(&mut self, field: ContactField) -> &mut Option<String> {
        match field {
            ContactField::FirstName => &mut self.first_name,
            ContactField::LastName => &mut self.last_name,
            ContactField::FullName => &mut self.full_name,
            ContactField::Organization => &mut self.organization,
            ContactField::JobTitle => &mut self.job_title,
            ContactField::Email => &mut self.email,
            ContactField::Phone => &mut self.phone,
            ContactField::Mobile => &mut self.mobile,
            ContactField::Website => &mut self.website,
            ContactField::Address => &mut self.address,
            ContactField::City => &mut self.city,
            ContactField::State => &mut self.state,
            ContactField::ZipCode => &mut self.zip_code,
            ContactField::Country => &mut self.country,
            ContactField::Notes => &mut self.notes,
        }
    }

    /// Field value, or `None` when absent or empty.
    pub fn get(&self, field: ContactField) -> Option<&str> {
        self.slot(field).as_deref().filter(|v| !v.is_empty())
    }

    /// Field value with absent mapped to `""`.
    pub fn get_or_empty(&self, field: ContactField) -> &str {
        self.get(field).unwrap_or("")
    }

    /// Overwrite a single field. Empty values are stored as given; fields
    /// are never removed.
    pub fn set(&mut self, field: ContactField, value: impl Into<String>) {
        *self.slot_mut(field) = Some(value.into());
    }

    pub fn graphic_box(&self, slot: GraphicSlot) -> Option<&BoundingBox> {
        match slot {
            GraphicSlot::Logo => self.logo_box.as_ref(),
            GraphicSlot::Photo => self.photo_box.as_ref(),
        }
    }

    pub fn graphic(&self, slot: GraphicSlot) -> Option<&EncodedImage> {
        match slot {
            GraphicSlot::Logo => self.logo.as_ref(),
            GraphicSlot::Photo => self.photo.as_ref(),
        }
    }

    pub fn set_graphic(&mut self, slot: GraphicSlot, image: EncodedImage) {
        match slot {
            GraphicSlot::Logo => self.logo = Some(image),
            GraphicSlot::Photo => self.photo = Some(image),
        }
    }
}
