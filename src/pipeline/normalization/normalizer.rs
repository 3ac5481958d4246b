//! Lookup of clinical shorthand against the term dictionaries.
//!
//! Every lookup is an exact match against one table (after trimming, and
//! upper-casing for the case-insensitive tables). A miss is not an error: the
//! input is returned exactly as given.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::dictionaries::{TermCategory, CLINICAL_ABBREVIATIONS};

/// Resolve `term` against a single category, returning the canonical form.
pub fn lookup(category: TermCategory, term: &str) -> Option<&'static str> {
    let trimmed = term.trim();
    if trimmed.is_empty() {
        return None;
    }

    if category.is_case_insensitive() {
        category.table().get(trimmed.to_uppercase().as_str()).copied()
    } else {
        category.table().get(trimmed).copied()
    }
}

fn normalize_in(category: TermCategory, term: &str) -> String {
    match lookup(category, term) {
        Some(canonical) => canonical.to_string(),
        None => term.to_string(),
    }
}

/// Expand a medicine abbreviation ("PCM" → "Paracetamol").
pub fn normalize_medicine(name: &str) -> String {
    normalize_in(TermCategory::Medicine, name)
}

/// Expand a dosing frequency ("BD" → "Twice daily").
pub fn normalize_frequency(frequency: &str) -> String {
    normalize_in(TermCategory::Frequency, frequency)
}

/// Expand a diagnosis code ("URTI" → "Upper Respiratory Tract Infection").
pub fn normalize_diagnosis(diagnosis: &str) -> String {
    normalize_in(TermCategory::Diagnosis, diagnosis)
}

/// Expand an administration route ("PO" → "By mouth").
pub fn normalize_route(route: &str) -> String {
    normalize_in(TermCategory::Route, route)
}

/// Try every dictionary in resolution order; first match wins.
pub fn normalize_term(term: &str) -> String {
    TermCategory::RESOLUTION_ORDER
        .iter()
        .find_map(|&category| lookup(category, term))
        .map(str::to_string)
        .unwrap_or_else(|| term.to_string())
}

/// Whole-word, case-sensitive alternation over the clinical shorthand keys,
/// longest key first so "Susp" is preferred over any shorter prefix.
static CLINICAL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    let mut keys: Vec<&str> = CLINICAL_ABBREVIATIONS.iter().map(|(k, _)| *k).collect();
    keys.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    let alternation = keys
        .iter()
        .map(|k| regex::escape(k))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"\b(?:{alternation})\b")).unwrap()
});

/// Rewrite every clinical shorthand token inside free text.
///
/// Tokens match only as whole words ("Rx" inside "Rxyz" is left alone) and
/// the `/` inside tokens such as "c/o" is part of the token.
pub fn expand_clinical_shorthand(text: &str) -> String {
    let table = TermCategory::Clinical.table();
    CLINICAL_PATTERN
        .replace_all(text, |caps: &Captures<'_>| {
            let token = &caps[0];
            table.get(token).copied().unwrap_or(token).to_string()
        })
        .into_owned()
}
