use serde::{Deserialize, Serialize};

/// One row of a frequency table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameCount {
    pub name: String,
    pub count: usize,
}

impl NameCount {
    pub fn new(name: impl Into<String>, count: usize) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }
}

/// Read-only snapshot over a batch of prescriptions. Recomputed from scratch
/// on every call; never updated incrementally.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateAnalysis {
    pub total_prescriptions: usize,
    pub common_diagnoses: Vec<NameCount>,
    pub top_medicines: Vec<NameCount>,
    pub department_distribution: Vec<NameCount>,
    pub flags: Vec<String>,
    pub average_confidence: f64,
}
