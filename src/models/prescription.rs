use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::enums::{ConfidenceLevel, Gender, ProcessingStatus, VisitType};
use crate::pipeline::extraction::confidence::{clamp_confidence, confidence_level};

/// Patient name used when the extraction did not yield one.
pub const UNKNOWN_PATIENT: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
}

impl Default for Patient {
    fn default() -> Self {
        Self {
            name: UNKNOWN_PATIENT.to_string(),
            age: None,
            gender: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Visit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub visit_type: Option<VisitType>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Clinical {
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub diagnosis: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medicine {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dosage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalNotes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advice: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_up: Option<String>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid status transition: {from} -> {to}")]
pub struct StatusTransition {
    pub from: ProcessingStatus,
    pub to: ProcessingStatus,
}

/// One prescription after extraction, validation and normalization.
///
/// `confidence_level` is always derived from `confidence`; both are private so
/// the pair can only change through [`StructuredPrescription::set_confidence`].
/// Deserialization recomputes the level and ignores any incoming one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "PrescriptionWire")]
pub struct StructuredPrescription {
    pub id: String,
    pub patient: Patient,
    pub doctor: Doctor,
    pub visit: Visit,
    pub clinical: Clinical,
    pub medicines: Vec<Medicine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_notes: Option<AdditionalNotes>,
    confidence: f64,
    confidence_level: ConfidenceLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<String>,
    processing_status: ProcessingStatus,
}

impl StructuredPrescription {
    /// Empty `pending` record with default patient and the given confidence.
    pub fn new(id: impl Into<String>, confidence: f64) -> Self {
        let confidence = clamp_confidence(confidence);
        Self {
            id: id.into(),
            patient: Patient::default(),
            doctor: Doctor::default(),
            visit: Visit::default(),
            clinical: Clinical::default(),
            medicines: Vec::new(),
            additional_notes: None,
            confidence,
            confidence_level: confidence_level(confidence),
            raw_text: None,
            processing_status: ProcessingStatus::Pending,
        }
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn confidence_level(&self) -> ConfidenceLevel {
        self.confidence_level
    }

    /// Replace the confidence (clamped to [0, 1]) and recompute its level.
    pub fn set_confidence(&mut self, confidence: f64) {
        self.confidence = clamp_confidence(confidence);
        self.confidence_level = confidence_level(self.confidence);
    }

    pub fn processing_status(&self) -> ProcessingStatus {
        self.processing_status
    }

    /// Apply a lifecycle transition; anything outside
    /// `pending → processing → completed | failed` is rejected.
    pub fn set_status(&mut self, next: ProcessingStatus) -> Result<(), StatusTransition> {
        if !self.processing_status.can_transition_to(next) {
            return Err(StatusTransition {
                from: self.processing_status,
                to: next,
            });
        }
        self.processing_status = next;
        Ok(())
    }

    /// Mark the record finished by the extraction pipeline.
    pub(crate) fn complete(mut self) -> Self {
        self.processing_status = ProcessingStatus::Completed;
        self
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PrescriptionWire {
    id: String,
    #[serde(default)]
    patient: Patient,
    #[serde(default)]
    doctor: Doctor,
    #[serde(default)]
    visit: Visit,
    #[serde(default)]
    clinical: Clinical,
    #[serde(default)]
    medicines: Vec<Medicine>,
    #[serde(default)]
    additional_notes: Option<AdditionalNotes>,
    confidence: f64,
    #[serde(default)]
    raw_text: Option<String>,
    #[serde(default = "default_wire_status")]
    processing_status: ProcessingStatus,
}

fn default_wire_status() -> ProcessingStatus {
    ProcessingStatus::Pending
}

impl From<PrescriptionWire> for StructuredPrescription {
    fn from(wire: PrescriptionWire) -> Self {
        let confidence = clamp_confidence(wire.confidence);
        Self {
            id: wire.id,
            patient: wire.patient,
            doctor: wire.doctor,
            visit: wire.visit,
            clinical: wire.clinical,
            medicines: wire.medicines,
            additional_notes: wire.additional_notes,
            confidence,
            confidence_level: confidence_level(confidence),
            raw_text: wire.raw_text,
            processing_status: wire.processing_status,
        }
    }
}
