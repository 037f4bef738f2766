use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Free-text clinical note attached to a patient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub content: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Note {
    pub fn new(patient_id: Uuid, content: String) -> Self {
        let now = Utc::now().naive_utc();
        Note {
            id: Uuid::new_v4(),
            patient_id,
            content,
            created_at: now,
            updated_at: now,
        }
    }
}
