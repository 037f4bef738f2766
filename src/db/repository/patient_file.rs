use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::PatientFile;

pub fn insert_patient_file(conn: &Connection, file: &PatientFile) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO patient_files (id, patient_id, file_name, file_url, file_size, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            file.id.to_string(),
            file.patient_id.to_string(),
            file.file_name,
            file.file_url,
            file.file_size,
            file.created_at,
        ],
    )?;
    Ok(())
}

pub fn get_files_for_patient(
    conn: &Connection,
    patient_id: &Uuid,
) -> Result<Vec<PatientFile>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, file_name, file_url, file_size, created_at
         FROM patient_files WHERE patient_id = ?1 ORDER BY created_at",
    )?;

    let rows = stmt.query_map(params![patient_id.to_string()], |row| {
        Ok(PatientFile {
            id: super::uuid_column(row, 0)?,
            patient_id: super::uuid_column(row, 1)?,
            file_name: row.get(2)?,
            file_url: row.get(3)?,
            file_size: row.get(4)?,
            created_at: row.get(5)?,
        })
    })?;

    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::patient::insert_patient;
    use crate::db::sqlite::open_memory_database;
    use crate::models::ExtractedRecord;
    use serde_json::json;

    #[test]
    fn insert_and_list_files() {
        let conn = open_memory_database().unwrap();
        let patient = ExtractedRecord::from_json(&json!({"patient_name": "A"})).patient;
        insert_patient(&conn, &patient).unwrap();

        insert_patient_file(&conn, &PatientFile::new(patient.id, "scan.png", 512)).unwrap();
        insert_patient_file(&conn, &PatientFile::new(patient.id, "labs.jpg", 1024)).unwrap();

        let files = get_files_for_patient(&conn, &patient.id).unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].file_url, "/uploads/scan.png");
    }
}
