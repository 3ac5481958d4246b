//! Handwriting recognition via an Ollama vision model.
//!
//! Bridges a `VisionClient` to the `TextRecognizer` seam used by
//! `PrescriptionExtractor::process_image`. The returned text is only
//! trimmed; blank output is rejected downstream, before the LLM call.

use std::sync::Arc;

use base64::Engine as _;

use super::prompt::{RECOGNITION_SYSTEM_PROMPT, RECOGNITION_USER_PROMPT};
use super::types::{TextRecognizer, VisionClient};
use crate::pipeline::PipelineError;

/// Production recognizer backed by a vision-capable chat model.
pub struct OllamaVisionOcr {
    vision_client: Arc<dyn VisionClient + Send + Sync>,
    model_name: String,
}

impl OllamaVisionOcr {
    pub fn new(vision_client: Arc<dyn VisionClient + Send + Sync>, model_name: &str) -> Self {
        Self {
            vision_client,
            model_name: model_name.to_string(),
        }
    }
}

impl TextRecognizer for OllamaVisionOcr {
    fn recognize(&self, image_bytes: &[u8]) -> Result<String, PipelineError> {
        let _span = tracing::info_span!(
            "vision_ocr_recognize",
            model = %self.model_name,
            image_size = image_bytes.len(),
        )
        .entered();
        let start = std::time::Instant::now();

        if image_bytes.is_empty() {
            return Err(PipelineError::Recognition("empty image".into()));
        }

        let images = vec![base64::engine::general_purpose::STANDARD.encode(image_bytes)];

        let raw = self
            .vision_client
            .chat_with_images(
                &self.model_name,
                RECOGNITION_USER_PROMPT,
                &images,
                Some(RECOGNITION_SYSTEM_PROMPT),
            )
            .map_err(|e| match e {
                PipelineError::OllamaConnection(_) => e,
                other => PipelineError::Recognition(format!("Vision OCR failed: {other}")),
            })?;

        let text = raw.trim().to_string();

        tracing::info!(
            elapsed_ms = %start.elapsed().as_millis(),
            text_len = text.len(),
            "Vision OCR recognition complete"
        );

        Ok(text)
    }
}

/// Mock recognizer for testing; returns a fixed transcription.
pub struct MockRecognizer {
    text: String,
}

impl MockRecognizer {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }
}

impl TextRecognizer for MockRecognizer {
    fn recognize(&self, _image_bytes: &[u8]) -> Result<String, PipelineError> {
        Ok(self.text.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::extraction::ollama::MockVisionClient;
    use std::sync::Mutex;

    /// Records what was sent so the request shape can be checked.
    #[derive(Default)]
    struct RecordingVisionClient {
        seen: Mutex<Vec<(String, Vec<String>, Option<String>)>>,
    }

    impl VisionClient for RecordingVisionClient {
        fn chat_with_images(
            &self,
            model: &str,
            _prompt: &str,
            images_base64: &[String],
            system: Option<&str>,
        ) -> Result<String, PipelineError> {
            self.seen.lock().unwrap().push((
                model.to_string(),
                images_base64.to_vec(),
                system.map(str::to_string),
            ));
            Ok("  Tab PCM 650 BD\n".into())
        }
    }

    struct FailingVisionClient(fn() -> PipelineError);

    impl VisionClient for FailingVisionClient {
        fn chat_with_images(
            &self,
            _model: &str,
            _prompt: &str,
            _images_base64: &[String],
            _system: Option<&str>,
        ) -> Result<String, PipelineError> {
            Err((self.0)())
        }
    }

    #[test]
    fn recognize_encodes_image_and_trims_text() {
        let client = Arc::new(RecordingVisionClient::default());
        let ocr = OllamaVisionOcr::new(client.clone(), "medgemma:4b");

        let text = ocr.recognize(b"hello").unwrap();
        assert_eq!(text, "Tab PCM 650 BD");

        let seen = client.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "medgemma:4b");
        assert_eq!(seen[0].1, vec!["aGVsbG8=".to_string()]);
        assert_eq!(seen[0].2.as_deref(), Some(RECOGNITION_SYSTEM_PROMPT));
    }

    #[test]
    fn empty_image_is_rejected() {
        let ocr = OllamaVisionOcr::new(Arc::new(MockVisionClient::new("text")), "medgemma:4b");
        assert!(matches!(
            ocr.recognize(&[]),
            Err(PipelineError::Recognition(_))
        ));
    }

    #[test]
    fn vision_error_maps_to_recognition_error() {
        let ocr = OllamaVisionOcr::new(
            Arc::new(FailingVisionClient(|| PipelineError::OllamaError {
                status: 500,
                body: "model crashed".into(),
            })),
            "medgemma:4b",
        );
        let err = ocr.recognize(b"img").unwrap_err();
        assert!(matches!(err, PipelineError::Recognition(ref msg) if msg.contains("model crashed")));
    }

    #[test]
    fn connection_error_passes_through() {
        let ocr = OllamaVisionOcr::new(
            Arc::new(FailingVisionClient(|| {
                PipelineError::OllamaConnection("http://localhost:11434".into())
            })),
            "medgemma:4b",
        );
        assert!(matches!(
            ocr.recognize(b"img"),
            Err(PipelineError::OllamaConnection(_))
        ));
    }

    #[test]
    fn mock_recognizer_returns_configured_text() {
        let mock = MockRecognizer::new("Rx: Tab Cetriz 10mg OD");
        assert_eq!(mock.recognize(b"").unwrap(), "Rx: Tab Cetriz 10mg OD");
    }
}
