//! API error types with HTTP status mapping and the uniform JSON envelope.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::ai::AiError;
use crate::api::types::ApiResponse;
use crate::db::DatabaseError;
use crate::pipeline::ExtractionError;

/// API-level errors. Parse failures of model output and storage failures both
/// map to 500 but keep distinct messages for observability.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Could not parse JSON from model response")]
    UnparseableModelOutput(String),

    #[error("Error saving to database")]
    Storage(String),

    #[error("AI model call failed")]
    Upstream(String),

    #[error("Internal error")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::UnparseableModelOutput(detail) => {
                tracing::error!(%detail, "Model response was not parseable JSON");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Could not parse JSON from model response".to_string(),
                )
            }
            ApiError::Storage(detail) => {
                tracing::error!(%detail, "Database failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error saving to database".to_string(),
                )
            }
            ApiError::Upstream(detail) => {
                tracing::error!(%detail, "AI provider failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "AI model call failed".to_string(),
                )
            }
            ApiError::Internal(detail) => {
                tracing::error!(%detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        (status, Json(ApiResponse::error(&message))).into_response()
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        ApiError::Storage(err.to_string())
    }
}

impl From<AiError> for ApiError {
    fn from(err: AiError) -> Self {
        ApiError::Upstream(err.to_string())
    }
}

impl From<ExtractionError> for ApiError {
    fn from(err: ExtractionError) -> Self {
        match err {
            ExtractionError::EmptyFilename => ApiError::BadRequest("No image selected".into()),
            ExtractionError::Model(e) => ApiError::Upstream(e.to_string()),
            ExtractionError::UnparseableResponse(detail) => {
                ApiError::UnparseableModelOutput(detail)
            }
            ExtractionError::Storage(e) => ApiError::Storage(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(response: Response) -> serde_json::Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn bad_request_returns_400_envelope() {
        let response = ApiError::BadRequest("Invalid patient ID format".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Invalid patient ID format");
        assert_eq!(json["data"], serde_json::json!({}));
    }

    #[tokio::test]
    async fn not_found_returns_404() {
        let response = ApiError::NotFound("Patient not found".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn parse_and_storage_errors_stay_distinguishable() {
        let parse = ApiError::UnparseableModelOutput("eof at line 1".into()).into_response();
        let storage = ApiError::Storage("disk full".into()).into_response();
        assert_eq!(parse.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(storage.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let parse = body_json(parse).await;
        let storage = body_json(storage).await;
        assert_ne!(parse["message"], storage["message"]);
    }

    #[tokio::test]
    async fn internal_errors_hide_detail() {
        let response = ApiError::Internal("lock poisoned".into()).into_response();
        let json = body_json(response).await;
        assert_eq!(json["message"], "An internal error occurred");
    }

    #[tokio::test]
    async fn extraction_empty_filename_maps_to_400() {
        let api: ApiError = ExtractionError::EmptyFilename.into();
        let response = api.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["message"], "No image selected");
    }
}
