//! Error types for the WorldWise client core.
//!
//! # Design
//! Transport-level outcomes (`RequestFailed`, `RequestCancelled`,
//! `NetworkError`) are kept distinct so the store can swallow cancellations
//! and report everything else. Geocoding and form validation get their own
//! variants because views render a different message for each.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    #[error("Status Code: {status}, Response: {status_text}")]
    RequestFailed {
        status: u16,
        status_text: String,
        body: String,
    },

    /// The request was superseded by a newer one before it resolved.
    #[error("request cancelled")]
    RequestCancelled,

    /// The request never produced an HTTP response.
    #[error("network error: {0}")]
    NetworkError(String),

    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// The clicked coordinates do not resolve to a place on land.
    #[error("There is no city there, you clicked in the ocean. Click somewhere on land")]
    UnresolvableLocation,

    /// The reverse-geocoding service rejected the lookup.
    #[error("geocoding failed: {0}")]
    GeocodeServiceError(String),

    /// A required form field is missing or malformed.
    #[error("invalid form input: {0}")]
    InvalidFormInput(String),

    #[error("invalid email or password")]
    InvalidCredentials,
}

impl ApiError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ApiError::RequestCancelled)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::RequestFailed { status: 404, .. })
    }
}
