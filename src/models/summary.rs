use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// AI-generated free-text summary of a patient's record.
///
/// The schema allows many rows per patient, but the generate operation
/// mutates the existing row in place when one exists, so in practice a
/// patient carries at most one current summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub summary: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Summary {
    pub fn new(patient_id: Uuid, summary: String) -> Self {
        let now = Utc::now().naive_utc();
        Summary {
            id: Uuid::new_v4(),
            patient_id,
            summary,
            created_at: now,
            updated_at: now,
        }
    }
}
