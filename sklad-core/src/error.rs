//! Error types for sklad core.
//!
//! A discriminator mismatch during narrowing is not an error; it is reported
//! as `None` by [`Envelope::narrow`](crate::Envelope::narrow). The variants
//! here cover malformed payloads and discriminators outside the closed set.

use crate::meta::MetaType;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Remote error code for "entity not found".
pub const ENTITY_NOT_FOUND_CODE: i64 = 1021;

/// Errors raised while decoding or classifying entities.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The `meta.type` string is not a known entity kind.
    #[error("Unknown entity type: {0}")]
    UnknownType(String),

    /// The entity kind is known but does not belong to the requested group.
    #[error("Unexpected entity type {actual}, expected {expected}")]
    UnexpectedType {
        /// Human readable name of the accepted group.
        expected: &'static str,
        /// The discriminator found on the payload.
        actual: MetaType,
    },

    /// An entity passed as a reference has no metadata to reference it by.
    #[error("Entity at position {index} carries no meta")]
    MissingMeta {
        /// Position of the offending entity in the input.
        index: usize,
    },

    /// Payload could not be decoded into the requested type.
    #[error("Failed to decode entity: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// A single error record returned by the remote service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Error message.
    #[serde(default)]
    pub error: String,
    /// Numeric error code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
    /// Request parameter the error refers to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter: Option<String>,
    /// Link to the error description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub more_info: Option<String>,
}

impl ApiError {
    /// Create an error record from a message and optional code.
    #[must_use]
    pub fn new(error: impl Into<String>, code: Option<i64>) -> Self {
        Self {
            error: error.into(),
            code,
            ..Self::default()
        }
    }

    /// Whether this record reports a missing entity.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.code == Some(ENTITY_NOT_FOUND_CODE)
    }
}

/// Error document: `{"errors": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDocument {
    /// Individual error records.
    #[serde(default)]
    pub errors: Vec<ApiError>,
}

impl ErrorDocument {
    /// Try to read an error document out of a JSON value.
    ///
    /// Returns `None` when the value has no `errors` array.
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        if !value.get("errors").is_some_and(serde_json::Value::is_array) {
            return None;
        }
        serde_json::from_value(value.clone()).ok()
    }

    /// Messages of all records joined with `"; "`.
    #[must_use]
    pub fn message(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.error.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    }
}
