//! Note endpoints. Note bodies are free text under a `content` key; a
//! missing key is treated as empty text rather than rejected.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde_json::Value;

use crate::api::endpoints::{parse_id, to_data};
use crate::api::error::ApiError;
use crate::api::types::{ApiContext, ApiResponse};
use crate::db::repository;
use crate::models::Note;

/// `GET /patients/{id}/notes`
pub async fn list_for_patient(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id, "patient")?;
    let conn = ctx.db.lock()?;
    if repository::get_patient(&conn, &id)?.is_none() {
        return Err(ApiError::NotFound("Patient not found".into()));
    }
    let notes = repository::get_notes_for_patient(&conn, &id)?;
    Ok(Json(ApiResponse::ok(
        "Notes retrieved successfully",
        to_data(&notes)?,
    )))
}

/// `POST /patients/{id}/notes`
pub async fn create(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id, "patient")?;
    let content = body
        .get("content")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let conn = ctx.db.lock()?;
    if repository::get_patient(&conn, &id)?.is_none() {
        return Err(ApiError::NotFound("Patient not found".into()));
    }
    let note = Note::new(id, content);
    repository::insert_note(&conn, &note)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Note created successfully", to_data(&note)?)),
    ))
}

/// `GET /notes/{id}`
pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id, "note")?;
    let conn = ctx.db.lock()?;
    let note = repository::get_note(&conn, &id)?
        .ok_or_else(|| ApiError::NotFound("Note not found".into()))?;
    Ok(Json(ApiResponse::ok(
        "Note retrieved successfully",
        to_data(&note)?,
    )))
}

/// `PUT /notes/{id}` — only `content` is mutable; an absent key leaves the
/// note untouched but still bumps nothing.
pub async fn update(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id, "note")?;
    let conn = ctx.db.lock()?;
    let mut note = repository::get_note(&conn, &id)?
        .ok_or_else(|| ApiError::NotFound("Note not found".into()))?;

    if let Some(content) = body.get("content").and_then(Value::as_str) {
        note.content = content.to_string();
        note.updated_at = Utc::now().naive_utc();
        repository::update_note_content(&conn, &id, &note.content, note.updated_at)?;
    }

    Ok(Json(ApiResponse::ok(
        "Note updated successfully",
        to_data(&note)?,
    )))
}

/// `DELETE /notes/{id}`
pub async fn remove(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id, "note")?;
    let conn = ctx.db.lock()?;
    if !repository::delete_note(&conn, &id)? {
        return Err(ApiError::NotFound("Note not found".into()));
    }
    Ok(Json(ApiResponse::ok(
        "Note deleted successfully",
        serde_json::json!({}),
    )))
}
