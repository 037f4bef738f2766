use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::Summary;

pub fn insert_summary(conn: &Connection, summary: &Summary) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO summaries (id, patient_id, summary, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            summary.id.to_string(),
            summary.patient_id.to_string(),
            summary.summary,
            summary.created_at,
            summary.updated_at,
        ],
    )?;
    Ok(())
}

/// The patient's existing summary row, if any. The generate operation
/// mutates this row in place rather than inserting a second one.
pub fn get_summary_for_patient(
    conn: &Connection,
    patient_id: &Uuid,
) -> Result<Option<Summary>, DatabaseError> {
    conn.query_row(
        "SELECT id, patient_id, summary, created_at, updated_at
         FROM summaries WHERE patient_id = ?1 ORDER BY created_at LIMIT 1",
        params![patient_id.to_string()],
        summary_from_row,
    )
    .optional()
    .map_err(DatabaseError::from)
}

pub fn get_summaries_for_patient(
    conn: &Connection,
    patient_id: &Uuid,
) -> Result<Vec<Summary>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, summary, created_at, updated_at
         FROM summaries WHERE patient_id = ?1 ORDER BY created_at",
    )?;

    let rows = stmt.query_map(params![patient_id.to_string()], summary_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn update_summary_text(
    conn: &Connection,
    id: &Uuid,
    summary: &str,
    updated_at: NaiveDateTime,
) -> Result<(), DatabaseError> {
    conn.execute(
        "UPDATE summaries SET summary = ?2, updated_at = ?3 WHERE id = ?1",
        params![id.to_string(), summary, updated_at],
    )?;
    Ok(())
}

pub fn delete_summary(conn: &Connection, id: &Uuid) -> Result<bool, DatabaseError> {
    let affected = conn.execute(
        "DELETE FROM summaries WHERE id = ?1",
        params![id.to_string()],
    )?;
    Ok(affected > 0)
}

fn summary_from_row(row: &rusqlite::Row<'_>) -> Result<Summary, rusqlite::Error> {
    Ok(Summary {
        id: super::uuid_column(row, 0)?,
        patient_id: super::uuid_column(row, 1)?,
        summary: row.get(2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::patient::insert_patient;
    use crate::db::sqlite::open_memory_database;
    use crate::models::ExtractedRecord;
    use serde_json::json;

    #[test]
    fn summary_lifecycle() {
        let conn = open_memory_database().unwrap();
        let patient = ExtractedRecord::from_json(&json!({"patient_name": "A"})).patient;
        insert_patient(&conn, &patient).unwrap();

        let summary = Summary::new(patient.id, "stable".into());
        insert_summary(&conn, &summary).unwrap();

        let existing = get_summary_for_patient(&conn, &patient.id).unwrap().unwrap();
        assert_eq!(existing.id, summary.id);

        update_summary_text(&conn, &summary.id, "improving", chrono::Utc::now().naive_utc())
            .unwrap();
        let all = get_summaries_for_patient(&conn, &patient.id).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].summary, "improving");

        assert!(delete_summary(&conn, &summary.id).unwrap());
        assert!(get_summary_for_patient(&conn, &patient.id).unwrap().is_none());
    }

    #[test]
    fn delete_unknown_summary_reports_false() {
        let conn = open_memory_database().unwrap();
        assert!(!delete_summary(&conn, &Uuid::new_v4()).unwrap());
    }
}
