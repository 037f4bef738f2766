use serde_json::{json, Value};

/// Target schema handed to the vision model with the extraction prompt.
///
/// A nested mapping of field name to `{type, description}`. The `required`
/// list is guidance for the model only — nothing enforces it at runtime, and
/// the record builder stays lenient about missing fields.
pub fn patient_extraction_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "patient_name": {
                "type": "string",
                "description": "The name of the patient"
            },
            "patient_age": {
                "type": "number",
                "description": "The age of the patient"
            },
            "patient_gender": {
                "type": "string",
                "description": "The gender of the patient (Male, Female, Other); expand shorthand: M means Male, F means Female, O means Other"
            },
            "diagnosis": {
                "type": "string",
                "description": "The diagnosis of the patient"
            },
            "doctor_advice": {"type": "string"},
            "doctor_name": {"type": "string"},
            "hospital_name": {"type": "string"},
            "medicines": [
                {
                    "medicine_name": {
                        "type": "string",
                        "description": "The name of the medicine; if abbreviated, expand it to the full form"
                    },
                    "dosage": {"type": "string"},
                    "frequency": {"type": "string"}
                }
            ]
        },
        "required": ["patient_name", "patient_age", "patient_gender", "diagnosis", "doctor_advice", "medicines"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_names_all_patient_fields() {
        let schema = patient_extraction_schema();
        let props = schema["properties"].as_object().unwrap();
        for field in [
            "patient_name",
            "patient_age",
            "patient_gender",
            "diagnosis",
            "doctor_advice",
            "doctor_name",
            "hospital_name",
            "medicines",
        ] {
            assert!(props.contains_key(field), "missing {field}");
        }
    }
}
