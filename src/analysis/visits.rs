use super::frequency::{capitalize_first, FrequencyTable};
use crate::models::prescription::StructuredPrescription;

/// Patient names that occur on two or more prescriptions, matched
/// case-insensitively. Each is reported once, first letter capitalized,
/// in first-seen order.
pub fn find_repeat_patients(prescriptions: &[StructuredPrescription]) -> Vec<String> {
    let mut names = FrequencyTable::new();
    for rx in prescriptions {
        names.add(&rx.patient.name);
    }
    names
        .at_least(2)
        .map(|(name, _)| capitalize_first(name))
        .collect()
}

/// Visit dates shared by two or more prescriptions, as `"{date}: {count} visits"`.
pub fn find_same_day_visits(prescriptions: &[StructuredPrescription]) -> Vec<String> {
    let mut dates = FrequencyTable::new();
    for date in prescriptions.iter().filter_map(|rx| rx.visit.date) {
        dates.add(&date.format("%Y-%m-%d").to_string());
    }
    dates
        .at_least(2)
        .map(|(date, count)| format!("{date}: {count} visits"))
        .collect()
}
