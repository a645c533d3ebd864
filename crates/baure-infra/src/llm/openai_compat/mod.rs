//! OpenAI-compatible generation backend.
//!
//! Serves any endpoint speaking the chat completions protocol (OpenAI,
//! Gemini's compatibility API, Ollama, ...) through [`async_openai`].
//! These endpoints have no web-search grounding, so the flag is ignored and
//! the prompt alone carries the instructions.

pub mod config;

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::types::chat::{
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessage,
    ChatCompletionRequestUserMessageContent, CreateChatCompletionRequest,
};

use baure_core::llm::provider::LlmProvider;
use baure_types::llm::{GenerateRequest, GenerateResponse, LlmError};

use self::config::OpenAiCompatConfig;
use super::classify_http_failure;

/// Does NOT derive Debug: the async-openai client holds the API key.
pub struct OpenAiCompatibleProvider {
    client: Client<OpenAIConfig>,
    provider_name: String,
    model: String,
}

impl OpenAiCompatibleProvider {
    pub fn new(config: OpenAiCompatConfig) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.api_key)
            .with_api_base(&config.base_url);

        Self {
            client: Client::with_config(openai_config),
            provider_name: config.provider_name,
            model: config.model,
        }
    }

    fn build_request(&self, request: &GenerateRequest) -> CreateChatCompletionRequest {
        let messages = vec![ChatCompletionRequestMessage::User(
            ChatCompletionRequestUserMessage {
                content: ChatCompletionRequestUserMessageContent::Text(request.prompt.clone()),
                name: None,
            },
        )];

        CreateChatCompletionRequest {
            model: self.model.clone(),
            messages,
            max_completion_tokens: Some(request.max_tokens),
            temperature: request.temperature.map(|t| t as f32),
            ..Default::default()
        }
    }
}

impl LlmProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        &self.provider_name
    }

    fn supports_web_search(&self) -> bool {
        false
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, LlmError> {
        if request.web_search {
            tracing::debug!(
                provider = %self.provider_name,
                "web search requested but not supported, sending prompt only"
            );
        }

        let response = self
            .client
            .chat()
            .create(self.build_request(request))
            .await
            .map_err(map_openai_error)?;

        let text = response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| LlmError::Unknown("empty response: no content".to_string()))?;

        Ok(GenerateResponse {
            text,
            model: response.model,
        })
    }
}

/// Map an `async_openai::error::OpenAIError` to an [`LlmError`].
fn map_openai_error(err: async_openai::error::OpenAIError) -> LlmError {
    use async_openai::error::OpenAIError;

    match &err {
        OpenAIError::ApiError(api_err) => {
            let code = api_err.code.as_deref().unwrap_or("");
            let error_type = api_err.r#type.as_deref().unwrap_or("");

            if code == "rate_limit_exceeded" || error_type == "rate_limit_error" {
                LlmError::RateLimited
            } else if code == "invalid_api_key"
                || error_type == "authentication_error"
                || api_err.message.contains("Incorrect API key")
                || api_err.message.contains("API key not valid")
            {
                LlmError::Unauthorized
            } else if code == "model_not_found" {
                LlmError::ModelUnavailable(api_err.message.clone())
            } else {
                classify_http_failure(0, &api_err.message)
            }
        }
        OpenAIError::Reqwest(reqwest_err) => match reqwest_err.status() {
            Some(status) => classify_http_failure(status.as_u16(), &err.to_string()),
            None => LlmError::Unknown(err.to_string()),
        },
        _ => LlmError::Unknown(err.to_string()),
    }
}
