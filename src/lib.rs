pub mod analysis;
pub mod config;
pub mod models;
pub mod pipeline;

use tracing_subscriber::EnvFilter;

pub use analysis::{analyze_prescriptions, find_repeat_patients, find_same_day_visits};
pub use models::{AggregateAnalysis, ConfidenceLevel, ProcessingStatus, StructuredPrescription};
pub use pipeline::extraction::{
    completed_records, process_batch, process_batch_sequential, BatchOutcome,
    PrescriptionExtractor, PrescriptionInput,
};
pub use pipeline::PipelineError;

/// Install the fmt subscriber, filtered by `RUST_LOG` or the crate default.
///
/// Returns quietly if a global subscriber is already set.
pub fn init_tracing() {
    let result = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init();

    if result.is_ok() {
        tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);
    }
}
