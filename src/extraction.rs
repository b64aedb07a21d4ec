//! Boundary to the contact extraction service.
//!
//! The hosted model receives the ordered card images and answers with a
//! JSON contact object, optionally carrying `logoBox`/`photoBox`. This
//! module only interprets that answer; issuing the request is the caller's
//! business. Two shapes are accepted:
//!
//! ```json
//! { "contact": { "fullName": "Jane Doe", ... }, "confidence": 0.92 }
//! { "fullName": "Jane Doe", ... }
//! ```
//!
//! An object with a `contact` key is always read as the wrapped shape, so a
//! broken wrapped answer is an error rather than an empty bare contact.
//!
//! Any failure collapses into one [`ExtractionError`] whose message is what
//! the user sees; the underlying detail is logged. Failures are terminal:
//! nothing here retries.

use crate::types::ContactRecord;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

/// Message shown to the user for every extraction failure.
pub const USER_MESSAGE: &str = "Could not interpret business card data.";

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("{}", USER_MESSAGE)]
    NoData,
    #[error("{}", USER_MESSAGE)]
    Malformed(#[source] serde_json::Error),
    #[error("{}", USER_MESSAGE)]
    Service(String),
}

/// Parsed extraction result.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ExtractionResponse {
    pub contact: ContactRecord,
    /// Service-reported confidence in `[0, 1]`; 0 when not reported.
    #[serde(default)]
    pub confidence: f64,
}

/// A collaborator that turns card images into a contact.
///
/// One call is one request; implementations must not retry.
pub trait Extractor {
    fn extract(&self, images: &[Vec<u8>]) -> Result<ExtractionResponse, ExtractionError>;
}

/// Interpret the service's JSON answer.
pub fn parse_response(text: &str) -> Result<ExtractionResponse, ExtractionError> {
    let text = text.trim();
    if text.is_empty() {
        warn!("extraction service returned no data");
        return Err(ExtractionError::NoData);
    }
    let value: serde_json::Value = serde_json::from_str(text).map_err(|e| {
        warn!(error = %e, "extraction response is not JSON");
        ExtractionError::Malformed(e)
    })?;
    if !value.is_object() {
        warn!("extraction response is not a JSON object");
        return Err(ExtractionError::NoData);
    }
    let wrapped = value.get("contact").is_some();
    let parsed = if wrapped {
        serde_json::from_value::<ExtractionResponse>(value)
    } else {
        serde_json::from_value::<ContactRecord>(value).map(|contact| ExtractionResponse {
            contact,
            confidence: 0.0,
        })
    };
    let response = parsed.map_err(|e| {
        warn!(error = %e, wrapped, "extraction response has an unexpected shape");
        ExtractionError::Malformed(e)
    })?;
    debug!(
        confidence = response.confidence,
        logo_box = response.contact.logo_box.is_some(),
        photo_box = response.contact.photo_box.is_some(),
        "extraction response parsed"
    );
    Ok(response)
}

/// Extractor that replays a response recorded earlier (e.g. saved to disk).
pub struct JsonResponseExtractor {
    text: String,
}

impl JsonResponseExtractor {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl Extractor for JsonResponseExtractor {
    fn extract(&self, images: &[Vec<u8>]) -> Result<ExtractionResponse, ExtractionError> {
        if images.is_empty() {
            debug!("replaying extraction response without images");
        }
        parse_response(&self.text)
    }
}
