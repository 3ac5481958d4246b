use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use super::confidence::confidence_thresholds;
use super::parser::{parse_extraction_payload, ExtractedPayload};
use super::prompt::{build_extraction_prompt, EXTRACTION_SYSTEM_PROMPT};
use super::types::{LlmClient, PrescriptionInput, TextRecognizer};
use crate::models::enums::VisitType;
use crate::models::prescription::{
    Clinical, Medicine, Patient, StructuredPrescription, Visit, UNKNOWN_PATIENT,
};
use crate::pipeline::normalization::{normalize_diagnosis, normalize_frequency, normalize_medicine};
use crate::pipeline::PipelineError;

/// Orchestrates one prescription through the pipeline:
/// reject blank → LLM → lenient parse → normalize → defaults → record.
///
/// The LLM call is the only step that may block. Malformed replies never
/// fail the record; they come back as a low-confidence record for review.
pub struct PrescriptionExtractor {
    llm: Box<dyn LlmClient + Send + Sync>,
    model_name: String,
}

impl PrescriptionExtractor {
    pub fn new(llm: Box<dyn LlmClient + Send + Sync>, model_name: &str) -> Self {
        Self {
            llm,
            model_name: model_name.to_string(),
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Extract a structured record from one prescription's recognized text.
    pub fn extract(&self, input: &PrescriptionInput) -> Result<StructuredPrescription, PipelineError> {
        self.extract_on(input, Utc::now().date_naive())
    }

    /// Recognize the photo's text, then extract. Blank recognition output is
    /// rejected before the LLM is called.
    pub fn process_image(
        &self,
        recognizer: &dyn TextRecognizer,
        id: Option<String>,
        image_bytes: &[u8],
    ) -> Result<StructuredPrescription, PipelineError> {
        let raw_text = recognizer.recognize(image_bytes)?;
        self.extract(&PrescriptionInput { id, raw_text })
    }

    pub(crate) fn extract_on(
        &self,
        input: &PrescriptionInput,
        today: NaiveDate,
    ) -> Result<StructuredPrescription, PipelineError> {
        let id = input
            .id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let _span = tracing::info_span!("extract_prescription", rx_id = %id).entered();

        if input.raw_text.trim().is_empty() {
            return Err(PipelineError::NoReadableText);
        }

        let prompt = build_extraction_prompt(&input.raw_text);
        let response = self
            .llm
            .generate(&self.model_name, &prompt, EXTRACTION_SYSTEM_PROMPT)?;

        let (payload, confidence) = match parse_extraction_payload(&response) {
            Ok(payload) => {
                let confidence = payload
                    .confidence
                    .unwrap_or(confidence_thresholds::UNSTATED);
                (payload, confidence)
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    response_len = response.len(),
                    "Malformed extraction payload, returning degraded record"
                );
                (ExtractedPayload::default(), confidence_thresholds::DEGRADED)
            }
        };

        let record = assemble_prescription(id, &input.raw_text, payload, confidence, today);

        tracing::info!(
            medicines = record.medicines.len(),
            diagnoses = record.clinical.diagnosis.len(),
            confidence = record.confidence(),
            level = %record.confidence_level(),
            "Prescription extracted"
        );

        Ok(record)
    }
}

/// Build the finished record from a coerced payload: normalize the three
/// clinical fields, fill defaults and derive the confidence level.
pub fn assemble_prescription(
    id: String,
    raw_text: &str,
    payload: ExtractedPayload,
    confidence: f64,
    today: NaiveDate,
) -> StructuredPrescription {
    let medicines = payload
        .medicines
        .into_iter()
        .map(|med| Medicine {
            name: normalize_medicine(&med.name),
            frequency: med.frequency.as_deref().map(normalize_frequency),
            ..med
        })
        .collect();

    let diagnosis = payload
        .diagnosis
        .iter()
        .map(|d| normalize_diagnosis(d))
        .collect();

    let mut record = StructuredPrescription::new(id, confidence);
    record.patient = Patient {
        name: payload
            .patient_name
            .unwrap_or_else(|| UNKNOWN_PATIENT.to_string()),
        age: payload.patient_age,
        gender: payload.patient_gender,
    };
    record.doctor = payload.doctor;
    record.visit = Visit {
        date: Some(payload.visit_date.unwrap_or(today)),
        visit_type: Some(payload.visit_type.unwrap_or(VisitType::Opd)),
    };
    record.clinical = Clinical {
        symptoms: payload.symptoms,
        diagnosis,
    };
    record.medicines = medicines;
    record.additional_notes = payload.additional_notes;
    record.raw_text = Some(raw_text.to_string());
    record.complete()
}
