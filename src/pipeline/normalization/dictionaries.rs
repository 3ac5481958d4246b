//! Abbreviation → canonical term tables, one per semantic category.
//!
//! Medicine, frequency, diagnosis and route keys are stored upper-case and
//! looked up with upper-cased input. Clinical shorthand keys are stored with
//! their conventional casing ("C/O" and "c/o" are separate literal entries)
//! and are matched exactly.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Dictionary category, in the order the combined resolver consults them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TermCategory {
    Medicine,
    Frequency,
    Diagnosis,
    Route,
    Clinical,
}

impl TermCategory {
    /// Resolution order for [`super::normalize_term`]; first match wins.
    pub const RESOLUTION_ORDER: [TermCategory; 5] = [
        TermCategory::Medicine,
        TermCategory::Frequency,
        TermCategory::Diagnosis,
        TermCategory::Route,
        TermCategory::Clinical,
    ];

    /// Whether lookups in this category ignore case.
    pub fn is_case_insensitive(self) -> bool {
        !matches!(self, TermCategory::Clinical)
    }

    /// The static entries backing this category.
    pub fn entries(self) -> &'static [(&'static str, &'static str)] {
        match self {
            TermCategory::Medicine => MEDICINE_ABBREVIATIONS,
            TermCategory::Frequency => FREQUENCY_ABBREVIATIONS,
            TermCategory::Diagnosis => DIAGNOSIS_ABBREVIATIONS,
            TermCategory::Route => ROUTE_ABBREVIATIONS,
            TermCategory::Clinical => CLINICAL_ABBREVIATIONS,
        }
    }

    /// Process-wide lookup map, built once on first use.
    pub fn table(self) -> &'static HashMap<&'static str, &'static str> {
        match self {
            TermCategory::Medicine => &MEDICINE_TABLE,
            TermCategory::Frequency => &FREQUENCY_TABLE,
            TermCategory::Diagnosis => &DIAGNOSIS_TABLE,
            TermCategory::Route => &ROUTE_TABLE,
            TermCategory::Clinical => &CLINICAL_TABLE,
        }
    }
}

pub const MEDICINE_ABBREVIATIONS: &[(&str, &str)] = &[
    ("PCM", "Paracetamol"),
    ("PARA", "Paracetamol"),
    ("AMOX", "Amoxicillin"),
    ("AZT", "Azithromycin"),
    ("AZITHRO", "Azithromycin"),
    ("METRO", "Metronidazole"),
    ("CEFTRI", "Ceftriaxone"),
    ("CIPRO", "Ciprofloxacin"),
    ("DICLO", "Diclofenac"),
    ("IBU", "Ibuprofen"),
    ("IBUPRO", "Ibuprofen"),
    ("ORS", "Oral Rehydration Salts"),
    ("PAN", "Pantoprazole"),
    ("PANTO", "Pantoprazole"),
    ("OME", "Omeprazole"),
    ("OMEZ", "Omeprazole"),
    ("RANITID", "Ranitidine"),
    ("CETRIZ", "Cetirizine"),
    ("LORATA", "Loratadine"),
    ("DOMP", "Domperidone"),
    ("DOM", "Domperidone"),
    ("MULTIVIT", "Multivitamin"),
    ("VITAMIN C", "Ascorbic Acid"),
    ("VIT C", "Ascorbic Acid"),
    ("VIT D", "Cholecalciferol"),
    ("B12", "Cyanocobalamin"),
    ("IRON", "Ferrous Sulfate"),
    ("FESO4", "Ferrous Sulfate"),
    ("CALC", "Calcium"),
];

pub const FREQUENCY_ABBREVIATIONS: &[(&str, &str)] = &[
    ("OD", "Once daily"),
    ("BD", "Twice daily"),
    ("BID", "Twice daily"),
    ("TDS", "Three times daily"),
    ("TID", "Three times daily"),
    ("QDS", "Four times daily"),
    ("QID", "Four times daily"),
    ("HS", "At bedtime"),
    ("SOS", "As needed"),
    ("PRN", "As needed"),
    ("STAT", "Immediately"),
    ("AC", "Before meals"),
    ("PC", "After meals"),
    ("AM", "In the morning"),
    ("PM", "In the evening"),
    ("Q4H", "Every 4 hours"),
    ("Q6H", "Every 6 hours"),
    ("Q8H", "Every 8 hours"),
    ("Q12H", "Every 12 hours"),
    ("WEEKLY", "Once weekly"),
    ("ALT", "Alternate days"),
];

pub const DIAGNOSIS_ABBREVIATIONS: &[(&str, &str)] = &[
    ("URTI", "Upper Respiratory Tract Infection"),
    ("LRTI", "Lower Respiratory Tract Infection"),
    ("UTI", "Urinary Tract Infection"),
    ("AGE", "Acute Gastroenteritis"),
    ("GERD", "Gastroesophageal Reflux Disease"),
    ("HTN", "Hypertension"),
    ("DM", "Diabetes Mellitus"),
    ("T2DM", "Type 2 Diabetes Mellitus"),
    ("IHD", "Ischemic Heart Disease"),
    ("CAD", "Coronary Artery Disease"),
    ("CHF", "Congestive Heart Failure"),
    ("COPD", "Chronic Obstructive Pulmonary Disease"),
    ("CKD", "Chronic Kidney Disease"),
    ("TB", "Tuberculosis"),
    ("PID", "Pelvic Inflammatory Disease"),
    ("OA", "Osteoarthritis"),
    ("RA", "Rheumatoid Arthritis"),
    ("DVT", "Deep Vein Thrombosis"),
    ("PE", "Pulmonary Embolism"),
    ("MI", "Myocardial Infarction"),
    ("CVA", "Cerebrovascular Accident"),
    ("TIA", "Transient Ischemic Attack"),
    ("BPH", "Benign Prostatic Hyperplasia"),
    ("AKI", "Acute Kidney Injury"),
    ("ARDS", "Acute Respiratory Distress Syndrome"),
];

pub const ROUTE_ABBREVIATIONS: &[(&str, &str)] = &[
    ("PO", "By mouth"),
    ("IV", "Intravenous"),
    ("IM", "Intramuscular"),
    ("SC", "Subcutaneous"),
    ("SL", "Sublingual"),
    ("INH", "Inhaled"),
    ("TOP", "Topical"),
    ("PR", "Per rectum"),
    ("PV", "Per vaginum"),
    ("OPTH", "Ophthalmic"),
];

pub const CLINICAL_ABBREVIATIONS: &[(&str, &str)] = &[
    ("C/O", "Complains of"),
    ("c/o", "Complains of"),
    ("H/O", "History of"),
    ("h/o", "History of"),
    ("K/C", "Known case of"),
    ("k/c", "Known case of"),
    ("O/E", "On examination"),
    ("o/e", "On examination"),
    ("N/V", "Nausea/Vomiting"),
    ("SOB", "Shortness of breath"),
    ("Dx", "Diagnosis"),
    ("Rx", "Prescription"),
    ("Sx", "Symptoms"),
    ("Hx", "History"),
    ("Tx", "Treatment"),
    ("Fx", "Fracture"),
    ("Pt", "Patient"),
    ("Px", "Prognosis"),
    ("F/U", "Follow-up"),
    ("f/u", "Follow-up"),
    ("Tab", "Tablet"),
    ("Cap", "Capsule"),
    ("Syp", "Syrup"),
    ("Inj", "Injection"),
    ("Susp", "Suspension"),
];

fn build_table(entries: &'static [(&'static str, &'static str)]) -> HashMap<&'static str, &'static str> {
    entries.iter().copied().collect()
}

static MEDICINE_TABLE: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| build_table(MEDICINE_ABBREVIATIONS));
static FREQUENCY_TABLE: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| build_table(FREQUENCY_ABBREVIATIONS));
static DIAGNOSIS_TABLE: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| build_table(DIAGNOSIS_ABBREVIATIONS));
static ROUTE_TABLE: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| build_table(ROUTE_ABBREVIATIONS));
static CLINICAL_TABLE: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| build_table(CLINICAL_ABBREVIATIONS));
