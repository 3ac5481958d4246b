use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use super::orchestrator::PrescriptionExtractor;
use super::types::PrescriptionInput;
use crate::models::enums::ProcessingStatus;
use crate::models::prescription::StructuredPrescription;
use crate::pipeline::PipelineError;

/// Result of pushing one input through the extractor as part of a batch.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOutcome {
    pub id: String,
    pub status: ProcessingStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<StructuredPrescription>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BatchOutcome {
    fn from_result(id: String, result: Result<StructuredPrescription, PipelineError>) -> Self {
        // Outcomes walk the same lifecycle as records: pending → processing → terminal.
        let mut status = ProcessingStatus::Pending;
        advance(&mut status, ProcessingStatus::Processing);

        match result {
            Ok(record) => {
                advance(&mut status, ProcessingStatus::Completed);
                Self {
                    id,
                    status,
                    record: Some(record),
                    error: None,
                }
            }
            Err(e) => {
                tracing::warn!(rx_id = %id, error = %e, "Prescription extraction failed");
                advance(&mut status, ProcessingStatus::Failed);
                Self {
                    id,
                    status,
                    record: None,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == ProcessingStatus::Completed
    }
}

fn advance(status: &mut ProcessingStatus, next: ProcessingStatus) {
    if status.can_transition_to(next) {
        *status = next;
    }
}

/// Give every input an id up front so failed outcomes stay addressable.
fn assign_ids(inputs: Vec<PrescriptionInput>) -> Vec<PrescriptionInput> {
    inputs
        .into_iter()
        .map(|mut input| {
            if input.id.is_none() {
                input.id = Some(Uuid::new_v4().to_string());
            }
            input
        })
        .collect()
}

fn input_id(input: &PrescriptionInput) -> String {
    input.id.clone().unwrap_or_default()
}

/// Process a batch one record at a time. Outcomes are in input order.
pub fn process_batch_sequential(
    extractor: &PrescriptionExtractor,
    inputs: Vec<PrescriptionInput>,
) -> Vec<BatchOutcome> {
    let _span = tracing::info_span!("process_batch", size = inputs.len(), mode = "sequential").entered();

    let outcomes: Vec<BatchOutcome> = assign_ids(inputs)
        .into_iter()
        .map(|input| {
            let result = extractor.extract(&input);
            BatchOutcome::from_result(input_id(&input), result)
        })
        .collect();

    log_summary(&outcomes);
    outcomes
}

/// Process a batch with one blocking task per record. Records share no state,
/// so they run independently; outcomes are still returned in input order.
pub async fn process_batch(
    extractor: Arc<PrescriptionExtractor>,
    inputs: Vec<PrescriptionInput>,
) -> Vec<BatchOutcome> {
    let size = inputs.len();
    tracing::info!(size, mode = "concurrent", "Processing batch");
    let handles: Vec<(String, tokio::task::JoinHandle<_>)> = assign_ids(inputs)
        .into_iter()
        .map(|input| {
            let extractor = extractor.clone();
            let id = input_id(&input);
            let handle = tokio::task::spawn_blocking(move || extractor.extract(&input));
            (id, handle)
        })
        .collect();

    let mut outcomes = Vec::with_capacity(size);
    for (id, handle) in handles {
        let result = match handle.await {
            Ok(result) => result,
            Err(e) => Err(PipelineError::TaskFailed(e.to_string())),
        };
        outcomes.push(BatchOutcome::from_result(id, result));
    }

    log_summary(&outcomes);
    outcomes
}

/// Records from completed outcomes, ready for aggregation.
pub fn completed_records(outcomes: &[BatchOutcome]) -> Vec<StructuredPrescription> {
    outcomes
        .iter()
        .filter(|o| o.is_completed())
        .filter_map(|o| o.record.clone())
        .collect()
}

fn log_summary(outcomes: &[BatchOutcome]) {
    let completed = outcomes.iter().filter(|o| o.is_completed()).count();
    tracing::info!(
        completed,
        failed = outcomes.len() - completed,
        "Batch extraction finished"
    );
}
