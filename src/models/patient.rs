use std::str::FromStr;

use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::note::Note;
use super::summary::Summary;
use crate::db::DatabaseError;

/// Patient gender as reported on the chart.
///
/// Parsing is lenient: single-letter shorthands (`M`/`F`/`O`) and any casing
/// are accepted, since the value often comes straight out of model output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

impl FromStr for Gender {
    type Err = DatabaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            "other" | "o" => Ok(Gender::Other),
            _ => Err(DatabaseError::InvalidEnum {
                field: "Gender".into(),
                value: s.into(),
            }),
        }
    }
}

/// Aggregate root. Every other record in the store hangs off a patient id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: Uuid,
    pub patient_name: Option<String>,
    pub patient_age: Option<i64>,
    pub patient_gender: Option<Gender>,
    pub diagnosis: Option<String>,
    pub doctor_advice: Option<String>,
    pub doctor_name: Option<String>,
    pub hospital_name: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Medicine {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub medicine_name: String,
    pub dosage: String,
    pub frequency: String,
}

impl Medicine {
    /// Build a medicine from one item of an extracted `medicines` array.
    /// Returns `None` for non-object items; missing fields default to empty.
    fn from_json_item(patient_id: Uuid, item: &Value) -> Option<Self> {
        let obj = item.as_object()?;
        let field = |key: &str| {
            obj.get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        Some(Medicine {
            id: Uuid::new_v4(),
            patient_id,
            medicine_name: field("medicine_name"),
            dosage: field("dosage"),
            frequency: field("frequency"),
        })
    }
}

/// A patient aggregate built from extracted JSON, ready to persist.
#[derive(Debug, Clone)]
pub struct ExtractedRecord {
    pub patient: Patient,
    pub medicines: Vec<Medicine>,
    pub notes: Vec<Note>,
    pub summaries: Vec<Summary>,
}

impl ExtractedRecord {
    /// Build a patient aggregate from a parsed model response.
    ///
    /// Deliberately lenient: the extraction schema's `required` list is
    /// guidance for the model, not a runtime contract. Missing or mistyped
    /// fields degrade to `None`/empty, and non-object items in child arrays
    /// are skipped. A well-formed `id` in the payload is reused so a caller
    /// can re-import a known record; anything else gets a fresh id.
    pub fn from_json(data: &Value) -> Self {
        let id = data
            .get("id")
            .and_then(Value::as_str)
            .and_then(|s| Uuid::parse_str(s).ok())
            .unwrap_or_else(Uuid::new_v4);

        let text = |key: &str| {
            data.get(key)
                .and_then(Value::as_str)
                .map(str::to_string)
        };

        let now = Utc::now().naive_utc();
        let patient = Patient {
            id,
            patient_name: text("patient_name"),
            patient_age: data.get("patient_age").and_then(Value::as_i64),
            patient_gender: data
                .get("patient_gender")
                .and_then(Value::as_str)
                .and_then(|s| Gender::from_str(s).ok()),
            diagnosis: text("diagnosis"),
            doctor_advice: text("doctor_advice"),
            doctor_name: text("doctor_name"),
            hospital_name: text("hospital_name"),
            created_at: now,
            updated_at: now,
        };

        let medicines = data
            .get("medicines")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| Medicine::from_json_item(id, item))
                    .collect()
            })
            .unwrap_or_default();

        let notes = child_texts(data, "notes", "content")
            .into_iter()
            .map(|content| Note::new(id, content))
            .collect();

        let summaries = child_texts(data, "summaries", "summary")
            .into_iter()
            .map(|summary| Summary::new(id, summary))
            .collect();

        ExtractedRecord {
            patient,
            medicines,
            notes,
            summaries,
        }
    }
}

/// Pull `key` out of every object item of an optional array field.
fn child_texts(data: &Value, field: &str, key: &str) -> Vec<String> {
    data.get(field)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_object())
                .map(|obj| {
                    obj.get(key)
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string()
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Partial update payload for `PUT /patient/{id}`.
///
/// Presence is explicit: an absent key leaves the field untouched, while a
/// key set to `null` clears it. The outer `Option` is "was the key supplied",
/// the inner one is the new value. A supplied `medicines` array replaces the
/// patient's whole medicine list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatientUpdate {
    #[serde(default, deserialize_with = "supplied")]
    pub patient_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "supplied")]
    pub patient_age: Option<Option<i64>>,
    #[serde(default, deserialize_with = "supplied")]
    pub patient_gender: Option<Option<Gender>>,
    #[serde(default, deserialize_with = "supplied")]
    pub diagnosis: Option<Option<String>>,
    #[serde(default, deserialize_with = "supplied")]
    pub doctor_advice: Option<Option<String>>,
    #[serde(default, deserialize_with = "supplied")]
    pub doctor_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "supplied")]
    pub hospital_name: Option<Option<String>>,
    #[serde(default)]
    pub medicines: Option<Vec<MedicineInput>>,
}

/// One medicine entry in a `PUT /patient/{id}` payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MedicineInput {
    #[serde(default)]
    pub medicine_name: String,
    #[serde(default)]
    pub dosage: String,
    #[serde(default)]
    pub frequency: String,
}

impl MedicineInput {
    pub fn into_medicine(self, patient_id: Uuid) -> Medicine {
        Medicine {
            id: Uuid::new_v4(),
            patient_id,
            medicine_name: self.medicine_name,
            dosage: self.dosage,
            frequency: self.frequency,
        }
    }
}

/// Wraps a deserialized value in `Some` so `#[serde(default)]` (`None`) can
/// only mean "key absent".
fn supplied<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl Patient {
    /// Apply a partial update in place and bump `updated_at`.
    pub fn apply_update(&mut self, update: &PatientUpdate) {
        if let Some(v) = &update.patient_name {
            self.patient_name = v.clone();
        }
        if let Some(v) = &update.patient_age {
            self.patient_age = *v;
        }
        if let Some(v) = &update.patient_gender {
            self.patient_gender = *v;
        }
        if let Some(v) = &update.diagnosis {
            self.diagnosis = v.clone();
        }
        if let Some(v) = &update.doctor_advice {
            self.doctor_advice = v.clone();
        }
        if let Some(v) = &update.doctor_name {
            self.doctor_name = v.clone();
        }
        if let Some(v) = &update.hospital_name {
            self.hospital_name = v.clone();
        }
        self.updated_at = Utc::now().naive_utc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builder_round_trips_all_fields() {
        let data = json!({
            "patient_name": "Jane Doe",
            "patient_age": 41,
            "patient_gender": "Female",
            "diagnosis": "Type 2 diabetes",
            "doctor_advice": "Monitor blood sugar",
            "doctor_name": "Dr. Chen",
            "hospital_name": "General Hospital",
            "medicines": [
                {"medicine_name": "Metformin", "dosage": "500mg", "frequency": "twice daily"},
                {"medicine_name": "Atorvastatin", "dosage": "10mg", "frequency": "nightly"}
            ]
        });

        let record = ExtractedRecord::from_json(&data);
        let p = &record.patient;
        assert_eq!(p.patient_name.as_deref(), Some("Jane Doe"));
        assert_eq!(p.patient_age, Some(41));
        assert_eq!(p.patient_gender, Some(Gender::Female));
        assert_eq!(p.diagnosis.as_deref(), Some("Type 2 diabetes"));
        assert_eq!(p.doctor_advice.as_deref(), Some("Monitor blood sugar"));
        assert_eq!(p.doctor_name.as_deref(), Some("Dr. Chen"));
        assert_eq!(p.hospital_name.as_deref(), Some("General Hospital"));

        assert_eq!(record.medicines.len(), 2);
        assert_eq!(record.medicines[0].medicine_name, "Metformin");
        assert_eq!(record.medicines[1].frequency, "nightly");
        for med in &record.medicines {
            assert_eq!(med.patient_id, p.id);
        }
    }

    #[test]
    fn builder_tolerates_missing_fields() {
        let record = ExtractedRecord::from_json(&json!({}));
        assert!(record.patient.patient_name.is_none());
        assert!(record.patient.patient_age.is_none());
        assert!(record.patient.patient_gender.is_none());
        assert!(record.medicines.is_empty());
        assert!(record.notes.is_empty());
        assert!(record.summaries.is_empty());
    }

    #[test]
    fn builder_skips_non_object_medicines() {
        let data = json!({
            "medicines": [
                {"medicine_name": "Metformin"},
                "just a string",
                42,
                {"dosage": "5mg"}
            ]
        });
        let record = ExtractedRecord::from_json(&data);
        assert_eq!(record.medicines.len(), 2);
        assert_eq!(record.medicines[0].medicine_name, "Metformin");
        // Missing fields default to empty, not an error
        assert_eq!(record.medicines[1].medicine_name, "");
        assert_eq!(record.medicines[1].dosage, "5mg");
    }

    #[test]
    fn builder_reuses_well_formed_id() {
        let id = Uuid::new_v4();
        let record = ExtractedRecord::from_json(&json!({"id": id.to_string()}));
        assert_eq!(record.patient.id, id);
    }

    #[test]
    fn builder_replaces_malformed_id() {
        let record = ExtractedRecord::from_json(&json!({"id": "not-a-uuid"}));
        assert_ne!(record.patient.id.to_string(), "not-a-uuid");
    }

    #[test]
    fn builder_collects_notes_and_summaries() {
        let data = json!({
            "notes": [{"content": "first visit"}, "skip me", {"content": "follow up"}],
            "summaries": [{"summary": "stable"}]
        });
        let record = ExtractedRecord::from_json(&data);
        assert_eq!(record.notes.len(), 2);
        assert_eq!(record.notes[0].content, "first visit");
        assert_eq!(record.summaries.len(), 1);
        assert_eq!(record.summaries[0].summary, "stable");
    }

    #[test]
    fn gender_parses_shorthand() {
        assert_eq!(Gender::from_str("M").unwrap(), Gender::Male);
        assert_eq!(Gender::from_str("female").unwrap(), Gender::Female);
        assert_eq!(Gender::from_str("O").unwrap(), Gender::Other);
        assert!(Gender::from_str("unknown").is_err());
    }

    #[test]
    fn unparseable_gender_degrades_to_none() {
        let record = ExtractedRecord::from_json(&json!({"patient_gender": "???"}));
        assert!(record.patient.patient_gender.is_none());
    }

    #[test]
    fn update_distinguishes_absent_from_null() {
        let update: PatientUpdate =
            serde_json::from_value(json!({"diagnosis": "X", "doctor_name": null})).unwrap();
        assert_eq!(update.diagnosis, Some(Some("X".into())));
        assert_eq!(update.doctor_name, Some(None));
        assert_eq!(update.patient_name, None);
    }

    #[test]
    fn apply_update_touches_only_supplied_fields() {
        let mut patient = ExtractedRecord::from_json(&json!({
            "patient_name": "Jane Doe",
            "patient_age": 41,
            "diagnosis": "old"
        }))
        .patient;

        let update: PatientUpdate = serde_json::from_value(json!({"diagnosis": "X"})).unwrap();
        patient.apply_update(&update);

        assert_eq!(patient.diagnosis.as_deref(), Some("X"));
        assert_eq!(patient.patient_name.as_deref(), Some("Jane Doe"));
        assert_eq!(patient.patient_age, Some(41));
    }
}
