//! Patient endpoints: extraction, listing, detail, partial update, delete,
//! file upload, and batch detail lookup.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::NaiveDateTime;
use rusqlite::Connection;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::api::endpoints::{parse_id, to_data};
use crate::api::error::ApiError;
use crate::api::types::{ApiContext, ApiResponse};
use crate::db::{repository, DatabaseError};
use crate::models::{Gender, Medicine, Patient, PatientFile, PatientUpdate};
use crate::pipeline::extraction::{extract_and_store, UploadedImage};

/// One row of the patient list.
#[derive(Debug, Serialize)]
pub struct PatientSummary {
    pub id: Uuid,
    pub patient_name: Option<String>,
    pub patient_age: Option<i64>,
    pub patient_gender: Option<Gender>,
    pub diagnosis: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<Patient> for PatientSummary {
    fn from(p: Patient) -> Self {
        PatientSummary {
            id: p.id,
            patient_name: p.patient_name,
            patient_age: p.patient_age,
            patient_gender: p.patient_gender,
            diagnosis: p.diagnosis,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MedicineEntry {
    pub medicine_name: String,
    pub dosage: String,
    pub frequency: String,
}

/// Full patient view with the medicine list inlined.
#[derive(Debug, Serialize)]
pub struct PatientDetail {
    pub id: Uuid,
    pub patient_name: Option<String>,
    pub patient_age: Option<i64>,
    pub patient_gender: Option<Gender>,
    pub diagnosis: Option<String>,
    pub doctor_advice: Option<String>,
    pub doctor_name: Option<String>,
    pub hospital_name: Option<String>,
    pub medicines: Vec<MedicineEntry>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl PatientDetail {
    fn assemble(patient: Patient, medicines: Vec<Medicine>) -> Self {
        PatientDetail {
            id: patient.id,
            patient_name: patient.patient_name,
            patient_age: patient.patient_age,
            patient_gender: patient.patient_gender,
            diagnosis: patient.diagnosis,
            doctor_advice: patient.doctor_advice,
            doctor_name: patient.doctor_name,
            hospital_name: patient.hospital_name,
            medicines: medicines
                .into_iter()
                .map(|m| MedicineEntry {
                    medicine_name: m.medicine_name,
                    dosage: m.dosage,
                    frequency: m.frequency,
                })
                .collect(),
            created_at: patient.created_at,
            updated_at: patient.updated_at,
        }
    }
}

fn load_detail(conn: &Connection, id: &Uuid) -> Result<Option<PatientDetail>, DatabaseError> {
    let Some(patient) = repository::get_patient(conn, id)? else {
        return Ok(None);
    };
    let medicines = repository::get_medicines_for_patient(conn, id)?;
    Ok(Some(PatientDetail::assemble(patient, medicines)))
}

/// `POST /patient/extract_text` — run the image extraction pipeline.
pub async fn extract_text(
    State(ctx): State<ApiContext>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let mut upload: Option<UploadedImage> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed multipart body: {e}")))?
    {
        if field.name() == Some("image") {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(format!("Could not read upload: {e}")))?;
            upload = Some(UploadedImage {
                file_name,
                content_type,
                bytes: bytes.to_vec(),
            });
            break;
        }
    }
    let upload = upload.ok_or_else(|| ApiError::BadRequest("No image part in request".into()))?;

    // The model call is blocking HTTP; keep it off the async workers.
    let db = ctx.db.clone();
    let model = ctx.model.clone();
    let data = tokio::task::spawn_blocking(move || extract_and_store(&db, model.as_ref(), &upload))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            "Patient Data Extracted and Saved Successfully",
            data,
        )),
    ))
}

/// `GET /patient` — list all patients, newest first.
pub async fn list(State(ctx): State<ApiContext>) -> Result<impl IntoResponse, ApiError> {
    let conn = ctx.db.lock()?;
    let patients: Vec<PatientSummary> = repository::list_patients(&conn)?
        .into_iter()
        .map(PatientSummary::from)
        .collect();
    Ok(Json(ApiResponse::ok(
        "Patients retrieved successfully",
        to_data(&patients)?,
    )))
}

/// `GET /patient/{id}`
pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id, "patient")?;
    let conn = ctx.db.lock()?;
    let detail = load_detail(&conn, &id)?
        .ok_or_else(|| ApiError::NotFound("Patient not found".into()))?;
    Ok(Json(ApiResponse::ok(
        "Patient retrieved successfully",
        to_data(&detail)?,
    )))
}

/// `PUT /patient/{id}` — partial update.
///
/// The body is taken as raw JSON and deserialized by hand so a malformed
/// payload surfaces as a 400 in the envelope rather than a framework
/// rejection.
pub async fn update(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id, "patient")?;
    let update: PatientUpdate = serde_json::from_value(body)
        .map_err(|e| ApiError::BadRequest(format!("Malformed update payload: {e}")))?;

    let mut conn = ctx.db.lock()?;
    let tx = conn.transaction().map_err(DatabaseError::from)?;

    let mut patient = repository::get_patient(&tx, &id)?
        .ok_or_else(|| ApiError::NotFound("Patient not found".into()))?;
    patient.apply_update(&update);
    repository::update_patient(&tx, &patient)?;

    if let Some(meds) = update.medicines {
        let meds: Vec<Medicine> = meds.into_iter().map(|m| m.into_medicine(id)).collect();
        repository::replace_medicines(&tx, &id, &meds)?;
    }

    let medicines = repository::get_medicines_for_patient(&tx, &id)?;
    tx.commit().map_err(DatabaseError::from)?;

    Ok(Json(ApiResponse::ok(
        "Patient updated successfully",
        to_data(&PatientDetail::assemble(patient, medicines))?,
    )))
}

/// `DELETE /patient/{id}` — children cascade with the parent row.
pub async fn remove(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id, "patient")?;
    let conn = ctx.db.lock()?;
    if !repository::delete_patient(&conn, &id)? {
        return Err(ApiError::NotFound("Patient not found".into()));
    }
    Ok(Json(ApiResponse::ok(
        "Patient deleted successfully",
        serde_json::json!({}),
    )))
}

/// `POST /patient/{id}/upload_file` — attach a file's metadata to a patient.
pub async fn upload_file(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id, "patient")?;

    let mut upload: Option<(String, usize)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(format!("Could not read upload: {e}")))?;
            upload = Some((file_name, bytes.len()));
            break;
        }
    }
    let (file_name, size) =
        upload.ok_or_else(|| ApiError::BadRequest("No file part in request".into()))?;
    if file_name.is_empty() {
        return Err(ApiError::BadRequest("No file selected".into()));
    }

    let conn = ctx.db.lock()?;
    if repository::get_patient(&conn, &id)?.is_none() {
        return Err(ApiError::NotFound("Patient not found".into()));
    }
    let file = PatientFile::new(id, &file_name, size as i64);
    repository::insert_patient_file(&conn, &file)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            "File uploaded successfully",
            to_data(&file)?,
        )),
    ))
}

/// `POST /patient/details` — batch lookup by id list.
///
/// Ids that resolve to no patient are skipped; malformed ids are a 400 for
/// the whole request.
pub async fn details(
    State(ctx): State<ApiContext>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let raw_ids = body
        .get("ids")
        .and_then(Value::as_array)
        .ok_or_else(|| ApiError::BadRequest("Request body must contain an 'ids' array".into()))?;

    let mut ids = Vec::with_capacity(raw_ids.len());
    for raw in raw_ids {
        let raw = raw
            .as_str()
            .ok_or_else(|| ApiError::BadRequest("Invalid patient ID format".into()))?;
        ids.push(parse_id(raw, "patient")?);
    }

    let conn = ctx.db.lock()?;
    let mut found = Vec::new();
    for id in &ids {
        if let Some(detail) = load_detail(&conn, id)? {
            found.push(detail);
        }
    }

    Ok(Json(ApiResponse::ok(
        "Patients retrieved successfully",
        to_data(&found)?,
    )))
}
