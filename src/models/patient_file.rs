use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Metadata for an uploaded artifact.
///
/// Only metadata is kept: `file_url` is a synthesized `/uploads/<name>`
/// reference and the bytes themselves are never written to storage. Known
/// simplification, not a design goal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientFile {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub file_name: String,
    pub file_url: String,
    pub file_size: i64,
    pub created_at: NaiveDateTime,
}

impl PatientFile {
    /// Build the metadata row for an upload of `file_size` bytes.
    pub fn new(patient_id: Uuid, file_name: &str, file_size: i64) -> Self {
        PatientFile {
            id: Uuid::new_v4(),
            patient_id,
            file_name: file_name.to_string(),
            file_url: format!("/uploads/{file_name}"),
            file_size,
            created_at: Utc::now().naive_utc(),
        }
    }
}
