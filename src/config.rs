use serde::{Deserialize, Serialize};

/// Application-level constants
pub const APP_NAME: &str = "rxlens";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "medgemma:4b";
/// Five minutes: CPU-only MedGemma runs are slow on long prescriptions.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Default log filter when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    if cfg!(debug_assertions) {
        "rxlens=debug,warn"
    } else {
        "rxlens=info,warn"
    }
}

/// Where the collaborators live and which models they use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OllamaSettings {
    pub base_url: String,
    pub text_model: String,
    pub vision_model: String,
    pub timeout_secs: u64,
}

impl Default for OllamaSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OLLAMA_URL.to_string(),
            text_model: DEFAULT_MODEL.to_string(),
            vision_model: DEFAULT_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl OllamaSettings {
    /// Defaults overridden by `RXLENS_OLLAMA_URL`, `RXLENS_TEXT_MODEL`,
    /// `RXLENS_VISION_MODEL` and `RXLENS_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::default();
        let value = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(url) = value("RXLENS_OLLAMA_URL") {
            settings.base_url = url;
        }
        if let Some(model) = value("RXLENS_TEXT_MODEL") {
            settings.text_model = model;
        }
        if let Some(model) = value("RXLENS_VISION_MODEL") {
            settings.vision_model = model;
        }
        if let Some(raw) = value("RXLENS_TIMEOUT_SECS") {
            match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => settings.timeout_secs = secs,
                _ => tracing::warn!(value = %raw, "Ignoring invalid RXLENS_TIMEOUT_SECS"),
            }
        }
        settings
    }
}
