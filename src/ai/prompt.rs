use serde_json::Value;

use crate::models::{Medicine, Patient};

/// Instruction sent alongside the uploaded image.
pub fn extraction_prompt(schema: &Value) -> String {
    format!(
        "Extract all text from this image and convert it to structured data. \
         Return ONLY valid JSON data according to this schema: {schema}"
    )
}

/// Natural-language prompt asking the model to summarize a patient's record.
pub fn summary_prompt(patient: &Patient, medicines: &[Medicine]) -> String {
    let name = patient.patient_name.as_deref().unwrap_or("Unknown");
    let age = patient
        .patient_age
        .map(|a| a.to_string())
        .unwrap_or_else(|| "unknown".into());
    let gender = patient
        .patient_gender
        .map(|g| g.as_str())
        .unwrap_or("unspecified");
    let diagnosis = patient.diagnosis.as_deref().unwrap_or("not recorded");
    let advice = patient.doctor_advice.as_deref().unwrap_or("not recorded");

    let mut prompt = format!(
        "Analyze the following patient information and provide a concise medical summary:\n\n\
         Patient: {name}, {age} years old, {gender}\n\
         Diagnosis: {diagnosis}\n\
         Doctor's Advice: {advice}\n\n\
         Medications:\n"
    );

    for med in medicines {
        prompt.push_str(&format!(
            "- {}: {}, {}\n",
            med.medicine_name, med.dosage, med.frequency
        ));
    }

    prompt.push_str(
        "\nProvide a brief summary of the patient's condition, treatment plan, \
         and key observations in a professional medical tone.",
    );
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::schema::patient_extraction_schema;
    use crate::models::ExtractedRecord;
    use serde_json::json;

    #[test]
    fn extraction_prompt_embeds_schema() {
        let prompt = extraction_prompt(&patient_extraction_schema());
        assert!(prompt.contains("ONLY valid JSON"));
        assert!(prompt.contains("patient_name"));
    }

    #[test]
    fn summary_prompt_lists_medicines() {
        let record = ExtractedRecord::from_json(&json!({
            "patient_name": "Jane Doe",
            "patient_age": 41,
            "patient_gender": "Female",
            "diagnosis": "Hypertension",
            "doctor_advice": "Reduce salt intake",
            "medicines": [
                {"medicine_name": "Lisinopril", "dosage": "10mg", "frequency": "daily"}
            ]
        }));
        let prompt = summary_prompt(&record.patient, &record.medicines);
        assert!(prompt.contains("Jane Doe, 41 years old, Female"));
        assert!(prompt.contains("- Lisinopril: 10mg, daily"));
        assert!(prompt.contains("Diagnosis: Hypertension"));
    }

    #[test]
    fn summary_prompt_tolerates_sparse_record() {
        let record = ExtractedRecord::from_json(&json!({}));
        let prompt = summary_prompt(&record.patient, &record.medicines);
        assert!(prompt.contains("Unknown, unknown years old, unspecified"));
    }
}
