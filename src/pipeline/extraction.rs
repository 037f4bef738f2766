//! The image-to-structured-record pipeline.
//!
//! Orchestrates: model call → JSON recovery → aggregate build → one
//! transaction persisting the patient, its children, and the upload's
//! metadata row. Nothing is written on any failure path.

use serde_json::{json, Value};

use crate::ai::prompt::extraction_prompt;
use crate::ai::recover::recover_json;
use crate::ai::schema::patient_extraction_schema;
use crate::ai::GenerativeModel;
use crate::db::{repository, DatabaseError, Db};
use crate::models::{ExtractedRecord, PatientFile};

use super::ExtractionError;

/// An uploaded image as it arrives from the multipart request.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Run the full extraction pipeline for one uploaded image.
///
/// On success exactly one patient (plus any extracted children) and one
/// patient_files row exist, and the returned value is the extracted JSON
/// object augmented with the new patient id.
pub fn extract_and_store(
    db: &Db,
    model: &dyn GenerativeModel,
    upload: &UploadedImage,
) -> Result<Value, ExtractionError> {
    // The one required-parameter check: an unnamed upload never reaches the model.
    if upload.file_name.is_empty() {
        return Err(ExtractionError::EmptyFilename);
    }

    let _span = tracing::info_span!(
        "extract_and_store",
        file = %upload.file_name,
        image_size = upload.bytes.len(),
    )
    .entered();
    let start = std::time::Instant::now();

    let prompt = extraction_prompt(&patient_extraction_schema());
    let response = model.generate_from_image(&upload.content_type, &upload.bytes, &prompt)?;

    let json_str = recover_json(&response);
    let mut data: Value = serde_json::from_str(json_str)
        .map_err(|e| ExtractionError::UnparseableResponse(e.to_string()))?;

    let record = ExtractedRecord::from_json(&data);
    let file = PatientFile::new(
        record.patient.id,
        &upload.file_name,
        upload.bytes.len() as i64,
    );

    let mut conn = db.lock()?;
    let tx = conn.transaction().map_err(DatabaseError::from)?;
    repository::insert_patient(&tx, &record.patient)?;
    for med in &record.medicines {
        repository::insert_medicine(&tx, med)?;
    }
    for note in &record.notes {
        repository::insert_note(&tx, note)?;
    }
    for summary in &record.summaries {
        repository::insert_summary(&tx, summary)?;
    }
    repository::insert_patient_file(&tx, &file)?;
    tx.commit().map_err(DatabaseError::from)?;

    tracing::info!(
        patient_id = %record.patient.id,
        medicines = record.medicines.len(),
        elapsed_ms = %start.elapsed().as_millis(),
        "Extraction pipeline complete"
    );

    if let Some(obj) = data.as_object_mut() {
        obj.insert("id".into(), json!(record.patient.id.to_string()));
    }
    Ok(data)
}
