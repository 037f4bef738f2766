use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Value};

use crate::ai::GenerativeModel;
use crate::db::Db;

/// Shared context for all API routes: the database handle and the AI client,
/// both constructed once at startup and cloned per request.
#[derive(Clone)]
pub struct ApiContext {
    pub db: Db,
    pub model: Arc<dyn GenerativeModel>,
}

impl ApiContext {
    pub fn new(db: Db, model: Arc<dyn GenerativeModel>) -> Self {
        ApiContext { db, model }
    }
}

/// Uniform response envelope: a human-readable message, the payload, and a
/// success flag. Errors use the same shape with an empty payload.
#[derive(Debug, Serialize)]
pub struct ApiResponse {
    pub message: String,
    pub data: Value,
    pub success: bool,
}

impl ApiResponse {
    pub fn ok(message: &str, data: Value) -> Self {
        ApiResponse {
            message: message.to_string(),
            data,
            success: true,
        }
    }

    pub fn error(message: &str) -> Self {
        ApiResponse {
            message: message.to_string(),
            data: json!({}),
            success: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_envelope_has_empty_payload() {
        let resp = ApiResponse::error("boom");
        assert!(!resp.success);
        assert_eq!(resp.data, json!({}));
    }

    #[test]
    fn ok_envelope_carries_payload() {
        let resp = ApiResponse::ok("done", json!({"n": 1}));
        assert!(resp.success);
        assert_eq!(resp.data["n"], 1);
    }
}
