//! GeminiProvider -- concrete [`LlmProvider`] for the Gemini REST API.
//!
//! Sends `generateContent` requests authenticated with the
//! `x-goog-api-key` header. When a request asks for web search, the
//! Google Search grounding tool is attached.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is never logged
//! or included in `Debug` output.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use baure_core::llm::provider::LlmProvider;
use baure_types::llm::{GenerateRequest, GenerateResponse, LlmError};

use super::types::{
    GeminiContent, GeminiPart, GeminiRequest, GeminiResponse, GeminiTool, GenerationConfig,
    GoogleSearch,
};
use crate::llm::classify_http_failure;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Google Gemini generation backend.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
}

impl GeminiProvider {
    pub fn new(api_key: SecretString, model: String, timeout: Duration) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Unknown(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model,
        })
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    fn to_gemini_request(&self, request: &GenerateRequest) -> GeminiRequest {
        let tools = if request.web_search {
            vec![GeminiTool {
                google_search: GoogleSearch::default(),
            }]
        } else {
            Vec::new()
        };

        GeminiRequest {
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart {
                    text: Some(request.prompt.clone()),
                }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: request.max_tokens,
                temperature: request.temperature,
            },
            tools,
        }
    }
}

// GeminiProvider does NOT derive Debug so internal state stays out of logs.

impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn supports_web_search(&self) -> bool {
        true
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, LlmError> {
        let body = self.to_gemini_request(request);

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Unknown(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(classify_http_failure(status.as_u16(), &error_body));
        }

        let gemini_resp: GeminiResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Unknown(format!("failed to parse response: {e}")))?;

        let text = match gemini_resp.text() {
            Some(text) => text,
            None => {
                let reason = gemini_resp
                    .prompt_feedback
                    .and_then(|f| f.block_reason)
                    .or_else(|| {
                        gemini_resp
                            .candidates
                            .first()
                            .and_then(|c| c.finish_reason.clone())
                    })
                    .unwrap_or_else(|| "no candidates".to_string());
                return Err(LlmError::Unknown(format!("empty response: {reason}")));
            }
        };

        Ok(GenerateResponse {
            text,
            model: gemini_resp.model_version.unwrap_or_else(|| self.model.clone()),
        })
    }
}
