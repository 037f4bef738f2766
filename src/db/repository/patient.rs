use std::str::FromStr;

use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::{Gender, Medicine, Patient};

pub fn insert_patient(conn: &Connection, patient: &Patient) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO patients (id, patient_name, patient_age, patient_gender, diagnosis,
         doctor_advice, doctor_name, hospital_name, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            patient.id.to_string(),
            patient.patient_name,
            patient.patient_age,
            patient.patient_gender.map(|g| g.as_str()),
            patient.diagnosis,
            patient.doctor_advice,
            patient.doctor_name,
            patient.hospital_name,
            patient.created_at,
            patient.updated_at,
        ],
    )?;
    Ok(())
}

pub fn get_patient(conn: &Connection, id: &Uuid) -> Result<Option<Patient>, DatabaseError> {
    let row = conn
        .query_row(
            "SELECT id, patient_name, patient_age, patient_gender, diagnosis,
             doctor_advice, doctor_name, hospital_name, created_at, updated_at
             FROM patients WHERE id = ?1",
            params![id.to_string()],
            |row| Ok(patient_row_from_rusqlite(row)),
        )
        .optional()?;

    match row {
        Some(row) => Ok(Some(patient_from_row(row?)?)),
        None => Ok(None),
    }
}

pub fn list_patients(conn: &Connection) -> Result<Vec<Patient>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_name, patient_age, patient_gender, diagnosis,
         doctor_advice, doctor_name, hospital_name, created_at, updated_at
         FROM patients ORDER BY created_at DESC",
    )?;

    let rows = stmt.query_map([], |row| Ok(patient_row_from_rusqlite(row)))?;

    let mut patients = Vec::new();
    for row in rows {
        patients.push(patient_from_row(row??)?);
    }
    Ok(patients)
}

/// Write every column of an already-mutated patient back by id.
pub fn update_patient(conn: &Connection, patient: &Patient) -> Result<(), DatabaseError> {
    conn.execute(
        "UPDATE patients SET patient_name = ?2, patient_age = ?3, patient_gender = ?4,
         diagnosis = ?5, doctor_advice = ?6, doctor_name = ?7, hospital_name = ?8,
         updated_at = ?9 WHERE id = ?1",
        params![
            patient.id.to_string(),
            patient.patient_name,
            patient.patient_age,
            patient.patient_gender.map(|g| g.as_str()),
            patient.diagnosis,
            patient.doctor_advice,
            patient.doctor_name,
            patient.hospital_name,
            patient.updated_at,
        ],
    )?;
    Ok(())
}

/// Returns false when no patient had that id. Children go with it via
/// the ON DELETE CASCADE foreign keys.
pub fn delete_patient(conn: &Connection, id: &Uuid) -> Result<bool, DatabaseError> {
    let affected = conn.execute(
        "DELETE FROM patients WHERE id = ?1",
        params![id.to_string()],
    )?;
    Ok(affected > 0)
}

pub fn insert_medicine(conn: &Connection, med: &Medicine) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO medicines (id, patient_id, medicine_name, dosage, frequency)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            med.id.to_string(),
            med.patient_id.to_string(),
            med.medicine_name,
            med.dosage,
            med.frequency,
        ],
    )?;
    Ok(())
}

pub fn get_medicines_for_patient(
    conn: &Connection,
    patient_id: &Uuid,
) -> Result<Vec<Medicine>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, medicine_name, dosage, frequency
         FROM medicines WHERE patient_id = ?1",
    )?;

    let rows = stmt.query_map(params![patient_id.to_string()], |row| {
        Ok(Medicine {
            id: super::uuid_column(row, 0)?,
            patient_id: super::uuid_column(row, 1)?,
            medicine_name: row.get(2)?,
            dosage: row.get(3)?,
            frequency: row.get(4)?,
        })
    })?;

    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

/// Drop and re-insert the patient's medicine list (PUT semantics: a supplied
/// `medicines` array replaces the whole collection).
pub fn replace_medicines(
    conn: &Connection,
    patient_id: &Uuid,
    medicines: &[Medicine],
) -> Result<(), DatabaseError> {
    conn.execute(
        "DELETE FROM medicines WHERE patient_id = ?1",
        params![patient_id.to_string()],
    )?;
    for med in medicines {
        insert_medicine(conn, med)?;
    }
    Ok(())
}

// Internal row type for Patient mapping
struct PatientRow {
    id: String,
    patient_name: Option<String>,
    patient_age: Option<i64>,
    patient_gender: Option<String>,
    diagnosis: Option<String>,
    doctor_advice: Option<String>,
    doctor_name: Option<String>,
    hospital_name: Option<String>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

fn patient_row_from_rusqlite(row: &rusqlite::Row<'_>) -> Result<PatientRow, rusqlite::Error> {
    Ok(PatientRow {
        id: row.get(0)?,
        patient_name: row.get(1)?,
        patient_age: row.get(2)?,
        patient_gender: row.get(3)?,
        diagnosis: row.get(4)?,
        doctor_advice: row.get(5)?,
        doctor_name: row.get(6)?,
        hospital_name: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

fn patient_from_row(row: PatientRow) -> Result<Patient, DatabaseError> {
    Ok(Patient {
        id: Uuid::parse_str(&row.id)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        patient_name: row.patient_name,
        patient_age: row.patient_age,
        patient_gender: row
            .patient_gender
            .map(|g| Gender::from_str(&g))
            .transpose()?,
        diagnosis: row.diagnosis,
        doctor_advice: row.doctor_advice,
        doctor_name: row.doctor_name,
        hospital_name: row.hospital_name,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}
