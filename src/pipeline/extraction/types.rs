use serde::{Deserialize, Serialize};

use crate::pipeline::PipelineError;

/// Recognized text for one prescription, as handed to the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrescriptionInput {
    /// Caller-supplied id; a UUID is generated when absent.
    #[serde(default)]
    pub id: Option<String>,
    pub raw_text: String,
}

impl PrescriptionInput {
    pub fn new(raw_text: impl Into<String>) -> Self {
        Self {
            id: None,
            raw_text: raw_text.into(),
        }
    }

    pub fn with_id(id: impl Into<String>, raw_text: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            raw_text: raw_text.into(),
        }
    }
}

/// Text-understanding collaborator (allows mocking).
///
/// Returns the model's raw reply; the pipeline treats it as untrusted and
/// possibly malformed.
pub trait LlmClient {
    fn generate(&self, model: &str, prompt: &str, system: &str) -> Result<String, PipelineError>;
}

/// Vision-capable chat collaborator used for handwriting recognition.
pub trait VisionClient {
    fn chat_with_images(
        &self,
        model: &str,
        prompt: &str,
        images_base64: &[String],
        system: Option<&str>,
    ) -> Result<String, PipelineError>;
}

/// Image → raw text recognition abstraction.
pub trait TextRecognizer {
    fn recognize(&self, image_bytes: &[u8]) -> Result<String, PipelineError>;
}
