use serde::{Deserialize, Serialize};

use super::types::{LlmClient, VisionClient};
use crate::config::OllamaSettings;
use crate::pipeline::PipelineError;

/// Ollama HTTP client for local LLM inference.
///
/// The timeout here is the caller's concern: the extraction core never
/// retries or times out on its own.
pub struct OllamaClient {
    base_url: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl OllamaClient {
    /// Create a new OllamaClient pointing at an Ollama instance.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, PipelineError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| PipelineError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout_secs,
        })
    }

    /// Default Ollama instance at localhost:11434 with 5-minute timeout.
    pub fn default_local() -> Result<Self, PipelineError> {
        Self::from_settings(&OllamaSettings::default())
    }

    pub fn from_settings(settings: &OllamaSettings) -> Result<Self, PipelineError> {
        Self::new(&settings.base_url, settings.timeout_secs)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn map_send_error(&self, e: reqwest::Error) -> PipelineError {
        if e.is_connect() {
            PipelineError::OllamaConnection(self.base_url.clone())
        } else if e.is_timeout() {
            PipelineError::HttpClient(format!("Request timed out after {}s", self.timeout_secs))
        } else {
            PipelineError::HttpClient(e.to_string())
        }
    }

    fn post_json<B: Serialize, R: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, PipelineError> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(PipelineError::OllamaError {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .map_err(|e| PipelineError::ResponseParsing(e.to_string()))
    }
}

/// Request body for Ollama /api/generate
#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    system: &'a str,
    stream: bool,
}

/// Response body from Ollama /api/generate
#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Request body for Ollama /api/chat. Vision models with chat templates
/// reject images on /api/generate.
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    images: Option<&'a [String]>,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

impl LlmClient for OllamaClient {
    fn generate(&self, model: &str, prompt: &str, system: &str) -> Result<String, PipelineError> {
        let body = GenerateRequest {
            model,
            prompt,
            system,
            stream: false,
        };
        let parsed: GenerateResponse = self.post_json("/api/generate", &body)?;
        Ok(parsed.response)
    }
}

impl VisionClient for OllamaClient {
    fn chat_with_images(
        &self,
        model: &str,
        prompt: &str,
        images_base64: &[String],
        system: Option<&str>,
    ) -> Result<String, PipelineError> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = system {
            messages.push(ChatMessage {
                role: "system",
                content: system,
                images: None,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: prompt,
            images: Some(images_base64),
        });

        let body = ChatRequest {
            model,
            messages,
            stream: false,
        };
        let parsed: ChatResponse = self.post_json("/api/chat", &body)?;
        Ok(parsed.message.content)
    }
}

/// Mock LLM client for testing; returns a configurable response.
pub struct MockLlmClient {
    response: String,
}

impl MockLlmClient {
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
        }
    }
}

impl LlmClient for MockLlmClient {
    fn generate(&self, _model: &str, _prompt: &str, _system: &str) -> Result<String, PipelineError> {
        Ok(self.response.clone())
    }
}

/// Mock vision client; echoes a fixed transcription.
pub struct MockVisionClient {
    response: String,
}

impl MockVisionClient {
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
        }
    }
}

impl VisionClient for MockVisionClient {
    fn chat_with_images(
        &self,
        _model: &str,
        _prompt: &str,
        images_base64: &[String],
        _system: Option<&str>,
    ) -> Result<String, PipelineError> {
        if images_base64.is_empty() {
            return Err(PipelineError::Recognition("no image supplied".into()));
        }
        Ok(self.response.clone())
    }
}
