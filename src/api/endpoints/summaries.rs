//! Summary endpoints.
//!
//! Generation is an upsert: the first `POST /summary/{patient_id}` creates
//! the patient's summary row (201), later calls rewrite it in place (200).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::ai::prompt::summary_prompt;
use crate::ai::GenerativeModel;
use crate::api::endpoints::{parse_id, to_data};
use crate::api::error::ApiError;
use crate::api::types::{ApiContext, ApiResponse};
use crate::db::{repository, Db};
use crate::models::Summary;

struct SummaryOutcome {
    summary: String,
    summary_id: Uuid,
    created: bool,
}

fn generate_summary(
    db: &Db,
    model: &dyn GenerativeModel,
    patient_id: &Uuid,
) -> Result<SummaryOutcome, ApiError> {
    // Fetch under the lock, then release it for the model call.
    let (patient, medicines) = {
        let conn = db.lock()?;
        let patient = repository::get_patient(&conn, patient_id)?
            .ok_or_else(|| ApiError::NotFound("Patient not found".into()))?;
        let medicines = repository::get_medicines_for_patient(&conn, patient_id)?;
        (patient, medicines)
    };

    let prompt = summary_prompt(&patient, &medicines);
    let text = model.generate_text(&prompt)?;

    // One guard spans the existing-row check and the write, so concurrent
    // generates for the same patient serialize here instead of double-inserting.
    let conn = db.lock()?;
    match repository::get_summary_for_patient(&conn, patient_id)? {
        Some(existing) => {
            repository::update_summary_text(&conn, &existing.id, &text, Utc::now().naive_utc())?;
            Ok(SummaryOutcome {
                summary: text,
                summary_id: existing.id,
                created: false,
            })
        }
        None => {
            let summary = Summary::new(*patient_id, text.clone());
            repository::insert_summary(&conn, &summary)?;
            Ok(SummaryOutcome {
                summary: text,
                summary_id: summary.id,
                created: true,
            })
        }
    }
}

/// `GET /summary/{patient_id}` — all summaries for a patient; an unknown id
/// yields an empty list rather than a 404.
pub async fn list_for_patient(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id, "patient")?;
    let conn = ctx.db.lock()?;
    let summaries = repository::get_summaries_for_patient(&conn, &id)?;
    Ok(Json(ApiResponse::ok(
        "Summaries retrieved successfully",
        json!({ "summaries": to_data(&summaries)? }),
    )))
}

/// `POST /summary/{patient_id}` — generate (or regenerate) the summary.
pub async fn generate(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id = parse_id(&id, "patient")?;

    let db = ctx.db.clone();
    let model = ctx.model.clone();
    let outcome = tokio::task::spawn_blocking(move || generate_summary(&db, model.as_ref(), &id))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;

    let (status, message, flag) = if outcome.created {
        (StatusCode::CREATED, "Summary created successfully", "created")
    } else {
        (StatusCode::OK, "Summary updated successfully", "updated")
    };

    let data = json!({
        "summary": outcome.summary,
        "summary_id": outcome.summary_id,
        flag: true,
    });
    Ok((status, Json(ApiResponse::ok(message, data))).into_response())
}

/// `DELETE /summary/{summary_id}` — note: unlike GET/POST, the id here is
/// the summary's own id.
pub async fn remove(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id, "summary")?;
    let conn = ctx.db.lock()?;
    if !repository::delete_summary(&conn, &id)? {
        return Err(ApiError::NotFound("Summary not found".into()));
    }
    Ok(Json(ApiResponse::ok(
        "Summary deleted successfully",
        json!({}),
    )))
}
