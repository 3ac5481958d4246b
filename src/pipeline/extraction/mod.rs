pub mod batch;
pub mod confidence;
pub mod ollama;
pub mod orchestrator;
pub mod parser;
pub mod prompt;
pub mod types;
pub mod vision_ocr;

pub use batch::*;
pub use confidence::*;
pub use ollama::{MockLlmClient, MockVisionClient, OllamaClient};
pub use orchestrator::*;
pub use parser::{parse_extraction_payload, parse_visit_date, ExtractedPayload, MalformedPayload};
pub use types::*;
pub use vision_ocr::{MockRecognizer, OllamaVisionOcr};
