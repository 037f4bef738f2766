pub mod notes;
pub mod patients;
pub mod summaries;

use serde_json::Value;
use uuid::Uuid;

use crate::api::error::ApiError;

/// Parse a path id, mapping failure to the 400 the original surface used.
pub(crate) fn parse_id(raw: &str, what: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest(format!("Invalid {what} ID format")))
}

/// Serialize an envelope payload.
pub(crate) fn to_data<T: serde::Serialize>(value: &T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::Internal(e.to_string()))
}
