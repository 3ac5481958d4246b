//! Lenient parsing of the extraction collaborator's reply.
//!
//! Every payload field is optional. A field that is absent or has the wrong
//! JSON type is dropped rather than failing the whole payload; only a reply
//! that is not a JSON object at all is reported as malformed.

use chrono::NaiveDate;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::enums::{Gender, VisitType};
use crate::models::prescription::{AdditionalNotes, Doctor, Medicine};

use super::confidence::clamp_confidence;

/// Ages above this are treated as recognition noise.
const MAX_PLAUSIBLE_AGE: u32 = 150;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MalformedPayload {
    #[error("Empty extraction response")]
    Empty,

    #[error("Extraction response is not JSON: {0}")]
    NotJson(String),

    #[error("Extraction response is JSON but not an object")]
    NotAnObject,
}

/// Payload fields after type coercion, before normalization and defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedPayload {
    pub patient_name: Option<String>,
    pub patient_age: Option<u32>,
    pub patient_gender: Option<Gender>,
    pub doctor: Doctor,
    pub visit_date: Option<NaiveDate>,
    pub visit_type: Option<VisitType>,
    pub symptoms: Vec<String>,
    pub diagnosis: Vec<String>,
    pub medicines: Vec<Medicine>,
    pub additional_notes: Option<AdditionalNotes>,
    pub confidence: Option<f64>,
}

/// Parse the collaborator's reply into an [`ExtractedPayload`].
pub fn parse_extraction_payload(response: &str) -> Result<ExtractedPayload, MalformedPayload> {
    let root = parse_json_object(response)?;

    let patient = object_field(&root, "patient");
    let visit = object_field(&root, "visit");
    let clinical = object_field(&root, "clinical");

    Ok(ExtractedPayload {
        patient_name: patient.and_then(|p| text_field(p, "name")),
        patient_age: patient.and_then(|p| p.get("age")).and_then(coerce_age),
        patient_gender: patient.and_then(|p| enum_field(p, "gender")),
        doctor: object_field(&root, "doctor")
            .map(|d| Doctor {
                name: text_field(d, "name"),
                department: text_field(d, "department"),
            })
            .unwrap_or_default(),
        visit_date: visit.and_then(|v| text_field(v, "date")).and_then(|s| {
            let parsed = parse_visit_date(&s);
            if parsed.is_none() {
                tracing::debug!(len = s.len(), "Unparseable visit date dropped");
            }
            parsed
        }),
        visit_type: visit.and_then(|v| enum_field(v, "type")),
        symptoms: clinical
            .map(|c| string_list(c.get("symptoms")))
            .unwrap_or_default(),
        diagnosis: clinical
            .map(|c| string_list(c.get("diagnosis")))
            .unwrap_or_default(),
        medicines: parse_medicines(root.get("medicines")),
        additional_notes: object_field(&root, "additionalNotes").and_then(parse_notes),
        confidence: root.get("confidence").and_then(coerce_confidence),
    })
}

/// Locate and parse the top-level JSON object.
///
/// Tolerates Markdown code fences and prose around the object.
fn parse_json_object(response: &str) -> Result<Map<String, Value>, MalformedPayload> {
    let cleaned = strip_code_fences(response);
    if cleaned.is_empty() {
        return Err(MalformedPayload::Empty);
    }

    match serde_json::from_str::<Value>(cleaned) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(MalformedPayload::NotAnObject),
        Err(first_error) => {
            let start = cleaned.find('{');
            let end = cleaned.rfind('}');
            match (start, end) {
                (Some(start), Some(end)) if start < end => {
                    match serde_json::from_str::<Value>(&cleaned[start..=end]) {
                        Ok(Value::Object(map)) => Ok(map),
                        _ => Err(MalformedPayload::NotJson(first_error.to_string())),
                    }
                }
                _ => Err(MalformedPayload::NotJson(first_error.to_string())),
            }
        }
    }
}

fn strip_code_fences(response: &str) -> &str {
    let mut s = response.trim();
    if let Some(rest) = s.strip_prefix("```json") {
        s = rest;
    } else if let Some(rest) = s.strip_prefix("```") {
        s = rest;
    }
    if let Some(rest) = s.strip_suffix("```") {
        s = rest;
    }
    s.trim()
}

fn object_field<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Map<String, Value>> {
    obj.get(key).and_then(Value::as_object)
}

/// Non-empty trimmed text. Numbers are accepted and rendered as text.
fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn text_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(coerce_text)
}

fn enum_field<T: std::str::FromStr>(obj: &Map<String, Value>, key: &str) -> Option<T> {
    obj.get(key)
        .and_then(Value::as_str)
        .and_then(|s| s.parse().ok())
}

/// Positive integer age. Accepts integral floats and strings like "45" or "45 yrs".
fn coerce_age(value: &Value) -> Option<u32> {
    let age = match value {
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                u32::try_from(u).ok()
            } else {
                n.as_f64()
                    .filter(|f| f.is_finite() && f.fract() == 0.0 && *f > 0.0)
                    .map(|f| f as u32)
            }
        }
        Value::String(s) => {
            let digits: String = s.trim().chars().take_while(char::is_ascii_digit).collect();
            digits.parse().ok()
        }
        _ => None,
    }?;

    (age > 0 && age <= MAX_PLAUSIBLE_AGE).then_some(age)
}

fn coerce_confidence(value: &Value) -> Option<f64> {
    let raw = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    raw.is_finite().then(|| clamp_confidence(raw))
}

/// Array of non-empty strings; anything else yields an empty list.
fn string_list(value: Option<&Value>) -> Vec<String> {
    match value.and_then(Value::as_array) {
        Some(items) => items
            .iter()
            .filter_map(|v| match v {
                Value::String(_) => coerce_text(v),
                _ => None,
            })
            .collect(),
        None => Vec::new(),
    }
}

/// Parse the medicines array leniently: nameless or non-object items are skipped.
fn parse_medicines(value: Option<&Value>) -> Vec<Medicine> {
    let Some(items) = value.and_then(Value::as_array) else {
        return Vec::new();
    };

    let medicines: Vec<Medicine> = items.iter().filter_map(parse_medicine).collect();
    if medicines.len() < items.len() {
        tracing::debug!(
            dropped = items.len() - medicines.len(),
            "Medicine entries without a name dropped"
        );
    }
    medicines
}

fn parse_medicine(value: &Value) -> Option<Medicine> {
    match value {
        Value::Object(obj) => Some(Medicine {
            name: obj.get("name").and_then(Value::as_str).and_then(|s| {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            })?,
            dosage: text_field(obj, "dosage"),
            frequency: text_field(obj, "frequency"),
            duration: text_field(obj, "duration"),
        }),
        Value::String(s) if !s.trim().is_empty() => Some(Medicine {
            name: s.trim().to_string(),
            dosage: None,
            frequency: None,
            duration: None,
        }),
        _ => None,
    }
}

fn parse_notes(obj: &Map<String, Value>) -> Option<AdditionalNotes> {
    let notes = AdditionalNotes {
        advice: text_field(obj, "advice"),
        follow_up: text_field(obj, "followUp"),
    };
    (notes.advice.is_some() || notes.follow_up.is_some()).then_some(notes)
}

/// Parse a visit date in the formats prescriptions are commonly written in.
pub fn parse_visit_date(date_str: &str) -> Option<NaiveDate> {
    let trimmed = date_str.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("null") {
        return None;
    }

    // ISO 8601 first, then day-first before month-first.
    ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%m/%d/%Y"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_payload() -> &'static str {
        r#"{
  "patient": {"name": "Ramesh Kumar", "age": 45, "gender": "Male"},
  "doctor": {"name": "Dr. Sharma", "department": "General Medicine"},
  "visit": {"date": "2025-01-08", "type": "OPD"},
  "clinical": {
    "symptoms": ["Fever for 3 days", "Body ache"],
    "diagnosis": ["URTI", "Viral Fever"]
  },
  "medicines": [
    {"name": "PCM", "dosage": "650mg", "frequency": "BD", "duration": "5 days"},
    {"name": "Cetirizine", "dosage": "10mg", "frequency": "OD", "duration": "5 days"}
  ],
  "additionalNotes": {"advice": "Drink plenty of fluids", "followUp": "Review after 5 days"},
  "confidence": 0.87
}"#
    }

    #[test]
    fn parses_full_payload() {
        let p = parse_extraction_payload(full_payload()).unwrap();
        assert_eq!(p.patient_name.as_deref(), Some("Ramesh Kumar"));
        assert_eq!(p.patient_age, Some(45));
        assert_eq!(p.patient_gender, Some(Gender::Male));
        assert_eq!(p.doctor.department.as_deref(), Some("General Medicine"));
        assert_eq!(p.visit_date, NaiveDate::from_ymd_opt(2025, 1, 8));
        assert_eq!(p.visit_type, Some(VisitType::Opd));
        assert_eq!(p.symptoms.len(), 2);
        assert_eq!(p.diagnosis, vec!["URTI", "Viral Fever"]);
        assert_eq!(p.medicines.len(), 2);
        assert_eq!(p.medicines[0].name, "PCM");
        assert_eq!(p.medicines[0].frequency.as_deref(), Some("BD"));
        assert_eq!(
            p.additional_notes.unwrap().follow_up.as_deref(),
            Some("Review after 5 days")
        );
        assert!((p.confidence.unwrap() - 0.87).abs() < f64::EPSILON);
    }

    #[test]
    fn strips_markdown_fences() {
        let fenced = format!("```json\n{}\n```", full_payload());
        assert!(parse_extraction_payload(&fenced).is_ok());

        let bare_fence = format!("```\n{}\n```", full_payload());
        assert!(parse_extraction_payload(&bare_fence).is_ok());
    }

    #[test]
    fn recovers_object_surrounded_by_prose() {
        let response = r#"Here is the extraction: {"patient": {"name": "Priya"}} Hope this helps."#;
        let p = parse_extraction_payload(response).unwrap();
        assert_eq!(p.patient_name.as_deref(), Some("Priya"));
    }

    #[test]
    fn rejects_non_json() {
        assert!(matches!(
            parse_extraction_payload("I could not read this prescription."),
            Err(MalformedPayload::NotJson(_))
        ));
        assert!(matches!(
            parse_extraction_payload("{ broken json"),
            Err(MalformedPayload::NotJson(_))
        ));
    }

    #[test]
    fn rejects_empty_and_non_object_json() {
        assert_eq!(parse_extraction_payload("   "), Err(MalformedPayload::Empty));
        assert_eq!(parse_extraction_payload("```json\n```"), Err(MalformedPayload::Empty));
        assert_eq!(parse_extraction_payload("[1, 2]"), Err(MalformedPayload::NotAnObject));
        assert_eq!(parse_extraction_payload("\"text\""), Err(MalformedPayload::NotAnObject));
    }

    #[test]
    fn empty_object_yields_all_defaults() {
        let p = parse_extraction_payload("{}").unwrap();
        assert_eq!(p, ExtractedPayload::default());
    }

    #[test]
    fn wrong_types_are_dropped_not_fatal() {
        let response = r#"{
  "patient": {"name": 42, "age": "unknown", "gender": "M"},
  "doctor": "Dr. Who",
  "visit": {"date": 20250108, "type": "ER"},
  "clinical": {"symptoms": "fever", "diagnosis": [null, "", "HTN", 7]},
  "medicines": {"name": "PCM"},
  "additionalNotes": [],
  "confidence": "high"
}"#;
        let p = parse_extraction_payload(response).unwrap();
        assert_eq!(p.patient_name.as_deref(), Some("42"));
        assert_eq!(p.patient_age, None);
        assert_eq!(p.patient_gender, None);
        assert_eq!(p.doctor, Doctor::default());
        assert_eq!(p.visit_date, None);
        assert_eq!(p.visit_type, None);
        assert!(p.symptoms.is_empty());
        assert_eq!(p.diagnosis, vec!["HTN"]);
        assert!(p.medicines.is_empty());
        assert!(p.additional_notes.is_none());
        assert_eq!(p.confidence, None);
    }

    #[test]
    fn medicines_parsed_leniently() {
        let response = r#"{"medicines": [
  {"name": "AMOX", "dosage": 500},
  {"dosage": "10mg"},
  {"name": "   "},
  "Ibuprofen",
  null,
  {"name": "Pantoprazole", "frequency": null}
]}"#;
        let p = parse_extraction_payload(response).unwrap();
        let names: Vec<&str> = p.medicines.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["AMOX", "Ibuprofen", "Pantoprazole"]);
        assert_eq!(p.medicines[0].dosage.as_deref(), Some("500"));
        assert_eq!(p.medicines[2].frequency, None);
    }

    #[test]
    fn age_coercion() {
        assert_eq!(coerce_age(&serde_json::json!(45)), Some(45));
        assert_eq!(coerce_age(&serde_json::json!(45.0)), Some(45));
        assert_eq!(coerce_age(&serde_json::json!("62")), Some(62));
        assert_eq!(coerce_age(&serde_json::json!("28 yrs")), Some(28));
        assert_eq!(coerce_age(&serde_json::json!(0)), None);
        assert_eq!(coerce_age(&serde_json::json!(-3)), None);
        assert_eq!(coerce_age(&serde_json::json!(45.5)), None);
        assert_eq!(coerce_age(&serde_json::json!(430)), None);
        assert_eq!(coerce_age(&serde_json::json!(null)), None);
    }

    #[test]
    fn confidence_coercion() {
        assert_eq!(coerce_confidence(&serde_json::json!(0.9)), Some(0.9));
        assert_eq!(coerce_confidence(&serde_json::json!(0)), Some(0.0));
        assert_eq!(coerce_confidence(&serde_json::json!("0.65")), Some(0.65));
        assert_eq!(coerce_confidence(&serde_json::json!(3)), Some(1.0));
        assert_eq!(coerce_confidence(&serde_json::json!(true)), None);
    }

    #[test]
    fn gender_and_visit_type_case_insensitive() {
        let p = parse_extraction_payload(
            r#"{"patient": {"gender": "female"}, "visit": {"type": "ipd"}}"#,
        )
        .unwrap();
        assert_eq!(p.patient_gender, Some(Gender::Female));
        assert_eq!(p.visit_type, Some(VisitType::Ipd));
    }

    #[test]
    fn visit_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 1, 8);
        assert_eq!(parse_visit_date("2025-01-08"), expected);
        assert_eq!(parse_visit_date("08/01/2025"), expected);
        assert_eq!(parse_visit_date("08-01-2025"), expected);
        // Only valid month-first: day 25 cannot be a month.
        assert_eq!(parse_visit_date("01/25/2025"), NaiveDate::from_ymd_opt(2025, 1, 25));
        assert_eq!(parse_visit_date("null"), None);
        assert_eq!(parse_visit_date("last Tuesday"), None);
    }

    #[test]
    fn notes_without_content_are_absent() {
        let p = parse_extraction_payload(r#"{"additionalNotes": {"advice": null, "followUp": ""}}"#)
            .unwrap();
        assert!(p.additional_notes.is_none());
    }
}
