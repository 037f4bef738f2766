use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::Note;

pub fn insert_note(conn: &Connection, note: &Note) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO notes (id, patient_id, content, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            note.id.to_string(),
            note.patient_id.to_string(),
            note.content,
            note.created_at,
            note.updated_at,
        ],
    )?;
    Ok(())
}

pub fn get_note(conn: &Connection, id: &Uuid) -> Result<Option<Note>, DatabaseError> {
    conn.query_row(
        "SELECT id, patient_id, content, created_at, updated_at FROM notes WHERE id = ?1",
        params![id.to_string()],
        note_from_row,
    )
    .optional()
    .map_err(DatabaseError::from)
}

pub fn get_notes_for_patient(
    conn: &Connection,
    patient_id: &Uuid,
) -> Result<Vec<Note>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, content, created_at, updated_at
         FROM notes WHERE patient_id = ?1 ORDER BY created_at",
    )?;

    let rows = stmt.query_map(params![patient_id.to_string()], |row| note_from_row(row))?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn update_note_content(
    conn: &Connection,
    id: &Uuid,
    content: &str,
    updated_at: NaiveDateTime,
) -> Result<(), DatabaseError> {
    conn.execute(
        "UPDATE notes SET content = ?2, updated_at = ?3 WHERE id = ?1",
        params![id.to_string(), content, updated_at],
    )?;
    Ok(())
}

pub fn delete_note(conn: &Connection, id: &Uuid) -> Result<bool, DatabaseError> {
    let affected = conn.execute("DELETE FROM notes WHERE id = ?1", params![id.to_string()])?;
    Ok(affected > 0)
}

fn note_from_row(row: &rusqlite::Row<'_>) -> Result<Note, rusqlite::Error> {
    Ok(Note {
        id: super::uuid_column(row, 0)?,
        patient_id: super::uuid_column(row, 1)?,
        content: row.get(2)?,
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
    fn note_lifecycle() {
        let conn = open_memory_database().unwrap();
        let patient = ExtractedRecord::from_json(&json!({"patient_name": "A"})).patient;
        insert_patient(&conn, &patient).unwrap();

        let note = Note::new(patient.id, "first visit".into());
        insert_note(&conn, &note).unwrap();

        let fetched = get_note(&conn, &note.id).unwrap().unwrap();
        assert_eq!(fetched.content, "first visit");

        update_note_content(&conn, &note.id, "amended", chrono::Utc::now().naive_utc()).unwrap();
        let fetched = get_note(&conn, &note.id).unwrap().unwrap();
        assert_eq!(fetched.content, "amended");

        assert!(delete_note(&conn, &note.id).unwrap());
        assert!(get_note(&conn, &note.id).unwrap().is_none());
    }

    #[test]
    fn delete_unknown_note_reports_false() {
        let conn = open_memory_database().unwrap();
        assert!(!delete_note(&conn, &Uuid::new_v4()).unwrap());
    }

    #[test]
    fn corrupt_note_id_is_an_error_not_a_nil_id() {
        let conn = open_memory_database().unwrap();
        let patient = ExtractedRecord::from_json(&json!({"patient_name": "A"})).patient;
        insert_patient(&conn, &patient).unwrap();

        conn.execute(
            "INSERT INTO notes (id, patient_id, content, created_at, updated_at)
             VALUES ('not-a-uuid', ?1, 'x', '2026-01-01 00:00:00', '2026-01-01 00:00:00')",
            rusqlite::params![patient.id.to_string()],
        )
        .unwrap();

        assert!(get_notes_for_patient(&conn, &patient.id).is_err());
    }

    #[test]
    fn note_insert_requires_patient() {
        let conn = open_memory_database().unwrap();
        let orphan = Note::new(Uuid::new_v4(), "no parent".into());
        assert!(insert_note(&conn, &orphan).is_err());
    }
}
