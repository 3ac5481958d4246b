pub mod normalization;
pub mod extraction;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("No readable text in prescription")]
    NoReadableText,

    #[error("Ollama is not running at {0}")]
    OllamaConnection(String),

    #[error("Ollama returned error (status {status}): {body}")]
    OllamaError { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),

    #[error("Text recognition failed: {0}")]
    Recognition(String),

    #[error("Extraction task failed: {0}")]
    TaskFailed(String),
}
