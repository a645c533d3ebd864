//! LlmProvider trait definition.
//!
//! This is the boundary between the chat pipeline and whatever text
//! generation backend is configured. Uses RPITIT for `generate`.

use baure_types::llm::{GenerateRequest, GenerateResponse, LlmError};

/// Trait for text generation backends (Gemini, OpenAI-compatible, ...).
///
/// Implementations live in baure-infra (e.g., `GeminiProvider`) and must
/// classify their failures into [`LlmError`] kinds; callers never inspect
/// error text.
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "gemini").
    fn name(&self) -> &str;

    /// Whether `GenerateRequest::web_search` is honored by this backend.
    fn supports_web_search(&self) -> bool;

    /// Send the prompt and receive the full generated text.
    fn generate(
        &self,
        request: &GenerateRequest,
    ) -> impl std::future::Future<Output = Result<GenerateResponse, LlmError>> + Send;
}
