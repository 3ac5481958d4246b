use crate::models::enums::ConfidenceLevel;

/// Confidence thresholds for extraction quality
pub mod confidence_thresholds {
    /// At or above this: HIGH.
    pub const HIGH: f64 = 0.70;

    /// At or above this (and below HIGH): MEDIUM. Below: LOW.
    pub const MEDIUM: f64 = 0.50;

    /// Confidence assumed when the payload carries none ("best effort, unverified").
    pub const UNSTATED: f64 = 0.75;

    /// Confidence forced onto a record whose payload could not be parsed at all.
    pub const DEGRADED: f64 = 0.30;
}

/// Clamp into [0, 1]. NaN collapses to 0.
pub fn clamp_confidence(confidence: f64) -> f64 {
    if confidence.is_nan() {
        return 0.0;
    }
    confidence.clamp(0.0, 1.0)
}

/// Band a confidence score. Lower bounds are inclusive.
pub fn confidence_level(confidence: f64) -> ConfidenceLevel {
    if confidence >= confidence_thresholds::HIGH {
        ConfidenceLevel::High
    } else if confidence >= confidence_thresholds::MEDIUM {
        ConfidenceLevel::Medium
    } else {
        ConfidenceLevel::Low
    }
}

/// Whether a record counts as low confidence in data-quality flags.
pub fn is_low_confidence(confidence: f64) -> bool {
    confidence < confidence_thresholds::MEDIUM
}
