//! Configuration and defaults for OpenAI-compatible backends.

/// Default endpoint: Gemini's OpenAI-compatible beta API, so the same
/// `GEMINI_API_KEY` works with either provider type.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

/// Configuration for an [`super::OpenAiCompatibleProvider`].
pub struct OpenAiCompatConfig {
    /// Human-readable provider name (e.g., "openai", "ollama").
    pub provider_name: String,
    /// Base URL for the API (e.g., "https://api.openai.com/v1").
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl OpenAiCompatConfig {
    /// Build from an optional base URL override, inferring the provider
    /// name from the host.
    pub fn new(api_key: &str, model: &str, base_url: Option<&str>) -> Self {
        let base_url = base_url
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Self {
            provider_name: provider_name_for(&base_url).to_string(),
            base_url,
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }
}

fn provider_name_for(base_url: &str) -> &'static str {
    if base_url.contains("generativelanguage.googleapis.com") {
        "gemini"
    } else if base_url.contains("api.openai.com") {
        "openai"
    } else if base_url.contains("localhost:11434") || base_url.contains("127.0.0.1:11434") {
        "ollama"
    } else {
        "openai_compatible"
    }
}
