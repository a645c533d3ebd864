//! Generation backend implementations.
//!
//! Contains concrete implementations of the [`LlmProvider`] trait defined in
//! `baure-core`: the native Gemini REST API and any OpenAI-compatible
//! endpoint. [`create_provider`] builds the configured one.
//!
//! [`LlmProvider`]: baure_core::llm::provider::LlmProvider

pub mod gemini;
pub mod openai_compat;

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use baure_core::llm::box_provider::BoxLlmProvider;
use baure_types::config::LlmConfig;
use baure_types::llm::{LlmError, ProviderType};

use self::gemini::GeminiProvider;
use self::openai_compat::OpenAiCompatibleProvider;
use self::openai_compat::config::OpenAiCompatConfig;

const SNIPPET_CHARS: usize = 200;

/// Create a [`BoxLlmProvider`] from the backend configuration.
pub fn create_provider(config: &LlmConfig, api_key: SecretString) -> Result<BoxLlmProvider, LlmError> {
    match config.provider {
        ProviderType::Gemini => {
            let mut provider = GeminiProvider::new(
                api_key,
                config.model.clone(),
                Duration::from_secs(config.timeout_secs),
            )?;
            if let Some(base_url) = config.base_url.as_deref() {
                provider = provider.with_base_url(base_url.to_string());
            }
            Ok(BoxLlmProvider::new(provider))
        }
        ProviderType::OpenAiCompatible => {
            let oai_config = OpenAiCompatConfig::new(
                api_key.expose_secret(),
                &config.model,
                config.base_url.as_deref(),
            );
            Ok(BoxLlmProvider::new(OpenAiCompatibleProvider::new(oai_config)))
        }
    }
}

/// Classify a failed HTTP exchange into an [`LlmError`] kind.
///
/// `status` 0 means no HTTP status is known and only the body is inspected.
pub fn classify_http_failure(status: u16, body: &str) -> LlmError {
    let lower = body.to_lowercase();
    let snippet: String = body.trim().chars().take(SNIPPET_CHARS).collect();

    match status {
        429 => LlmError::RateLimited,
        401 | 403 => LlmError::Unauthorized,
        _ if lower.contains("api key not valid") || lower.contains("api_key_invalid") => {
            LlmError::Unauthorized
        }
        404 => LlmError::ModelUnavailable(snippet),
        _ if lower.contains("not supported")
            || (lower.contains("model") && lower.contains("not found")) =>
        {
            LlmError::ModelUnavailable(snippet)
        }
        0 => LlmError::Unknown(snippet),
        _ => LlmError::Unknown(format!("HTTP {status}: {snippet}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_status_codes() {
        assert_eq!(classify_http_failure(429, ""), LlmError::RateLimited);
        assert_eq!(classify_http_failure(401, ""), LlmError::Unauthorized);
        assert_eq!(classify_http_failure(403, "denied"), LlmError::Unauthorized);
        assert!(matches!(
            classify_http_failure(404, "models/gemini-9 is not found"),
            LlmError::ModelUnavailable(_)
        ));
    }

    #[test]
    fn test_classify_by_body() {
        assert_eq!(
            classify_http_failure(400, r#"{"error":{"message":"API key not valid. Please pass a valid API key."}}"#),
            LlmError::Unauthorized
        );
        assert!(matches!(
            classify_http_failure(400, "model gemini-x is not supported for generateContent"),
            LlmError::ModelUnavailable(_)
        ));
        assert_eq!(
            classify_http_failure(500, "internal"),
            LlmError::Unknown("HTTP 500: internal".to_string())
        );
    }

    #[test]
    fn test_classify_truncates_snippet() {
        let body = "x".repeat(1000);
        match classify_http_failure(503, &body) {
            LlmError::Unknown(msg) => assert!(msg.chars().count() < 250),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_create_provider_gemini() {
        let config = LlmConfig::default();
        let provider = create_provider(&config, SecretString::from("test-key")).unwrap();
        assert_eq!(provider.name(), "gemini");
        assert!(provider.supports_web_search());
    }

    #[test]
    fn test_create_provider_openai_compatible() {
        let config = LlmConfig {
            provider: ProviderType::OpenAiCompatible,
            model: "gpt-4o-mini".to_string(),
            base_url: Some("https://api.openai.com/v1".to_string()),
            ..LlmConfig::default()
        };
        let provider = create_provider(&config, SecretString::from("sk-test")).unwrap();
        assert_eq!(provider.name(), "openai");
        assert!(!provider.supports_web_search());
    }

    #[test]
    fn test_create_provider_openai_compatible_defaults_to_gemini_endpoint() {
        let config = LlmConfig {
            provider: ProviderType::OpenAiCompatible,
            ..LlmConfig::default()
        };
        let provider = create_provider(&config, SecretString::from("k")).unwrap();
        assert_eq!(provider.name(), "gemini");
    }
}
