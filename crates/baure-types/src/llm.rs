//! Generation backend request/response types.
//!
//! These types model the single call the chat subsystem makes to a text
//! generation backend, and the typed failure kinds an adapter reports.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Request to a generation backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// The fully composed instruction prompt.
    pub prompt: String,
    /// Ask the backend to ground the answer with live web search.
    #[serde(default)]
    pub web_search: bool,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

/// Raw output of a generation backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub text: String,
    pub model: String,
}

/// Failure kinds reported by a generation backend adapter.
///
/// Adapters classify transport and HTTP failures into these kinds so that
/// the chat service maps them to user-facing messages with a plain match.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LlmError {
    #[error("rate limited by generation backend")]
    RateLimited,

    #[error("generation backend rejected the credentials")]
    Unauthorized,

    #[error("model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("generation backend error: {0}")]
    Unknown(String),
}

/// Type of generation backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderType {
    #[default]
    Gemini,
    #[serde(rename = "openai_compatible")]
    OpenAiCompatible,
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderType::Gemini => write!(f, "gemini"),
            ProviderType::OpenAiCompatible => write!(f, "openai_compatible"),
        }
    }
}

impl FromStr for ProviderType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gemini" => Ok(ProviderType::Gemini),
            "openai_compatible" => Ok(ProviderType::OpenAiCompatible),
            other => Err(format!("invalid provider type: '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_type_roundtrip() {
        for pt in [ProviderType::Gemini, ProviderType::OpenAiCompatible] {
            let parsed: ProviderType = pt.to_string().parse().unwrap();
            assert_eq!(pt, parsed);
        }
    }

    #[test]
    fn test_provider_type_serde() {
        let json = serde_json::to_string(&ProviderType::OpenAiCompatible).unwrap();
        assert_eq!(json, "\"openai_compatible\"");
        let parsed: ProviderType = serde_json::from_str("\"gemini\"").unwrap();
        assert_eq!(parsed, ProviderType::Gemini);
    }

    #[test]
    fn test_provider_type_rejects_unknown() {
        assert!("bedrock".parse::<ProviderType>().is_err());
    }

    #[test]
    fn test_llm_error_display() {
        let err = LlmError::ModelUnavailable("gemini-9".to_string());
        assert!(err.to_string().contains("gemini-9"));
    }
}
