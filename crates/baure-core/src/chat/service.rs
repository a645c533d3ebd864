//! Chat service running a single question/answer turn.
//!
//! ChatService owns the classifier, prompt composer and post-processor plus
//! the read-only cultural context. It holds no mutable state, so one
//! instance is shared by every request.

use baure_types::chat::{ChatTurn, RecipeContext};
use baure_types::config::{ChatConfig, LlmConfig};
use baure_types::error::ChatError;
use baure_types::llm::GenerateRequest;
use tracing::{debug, error, info};

use crate::chat::classifier::{EmptyTriggerSet, QueryClassifier};
use crate::chat::context::CulturalContext;
use crate::chat::postprocess::ResponsePostProcessor;
use crate::chat::prompt::{PromptComposer, Template};
use crate::llm::box_provider::BoxLlmProvider;

/// The classification and prompt chosen for a question, before generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnPlan {
    pub template: Template,
    pub prompt: String,
}

impl TurnPlan {
    pub fn uses_web_search(&self) -> bool {
        self.template == Template::WebSearch
    }
}

pub struct ChatService {
    provider: Option<BoxLlmProvider>,
    classifier: QueryClassifier,
    composer: PromptComposer,
    post: ResponsePostProcessor,
    context: CulturalContext,
    max_tokens: u32,
    temperature: f64,
}

impl ChatService {
    /// Build the service. `provider` is `None` when no backend credential
    /// is configured; every turn then fails with `MissingCredential`.
    pub fn new(
        chat: &ChatConfig,
        llm: &LlmConfig,
        context: CulturalContext,
        provider: Option<BoxLlmProvider>,
    ) -> Result<Self, EmptyTriggerSet> {
        Ok(Self {
            provider,
            classifier: QueryClassifier::new(&chat.trigger_phrases)?,
            composer: PromptComposer::new(chat),
            post: ResponsePostProcessor::new(chat),
            context,
            max_tokens: llm.max_tokens,
            temperature: llm.temperature,
        })
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    pub fn provider_name(&self) -> Option<&str> {
        self.provider.as_ref().map(|p| p.name())
    }

    pub fn context(&self) -> &CulturalContext {
        &self.context
    }

    /// Classify the question and build its prompt without calling the backend.
    pub fn plan(&self, question: &str, recipe: Option<&RecipeContext>) -> TurnPlan {
        let template = Template::from_classification(self.classifier.needs_web_search(question));
        let prompt = self
            .composer
            .compose(template, question, self.context.as_str(), recipe);
        TurnPlan { template, prompt }
    }

    /// Run one chat turn.
    ///
    /// A turn either yields a post-processed answer or fails as a whole.
    /// Backend errors are logged with their original text here; callers
    /// only ever see [`ChatError::user_message`].
    pub async fn answer(
        &self,
        question: Option<&str>,
        recipe: Option<&RecipeContext>,
    ) -> Result<ChatTurn, ChatError> {
        let question = match question {
            Some(q) if !q.trim().is_empty() => q,
            _ => return Err(ChatError::MissingQuestion),
        };

        let Some(provider) = self.provider.as_ref() else {
            error!("chat turn rejected: generation backend API key is not configured");
            return Err(ChatError::MissingCredential);
        };

        let plan = self.plan(question, recipe);
        let used_web_search = plan.uses_web_search();
        info!(
            template = plan.template.as_str(),
            used_web_search,
            has_recipe = recipe.is_some(),
            prompt_chars = plan.prompt.chars().count(),
            "composing chat turn"
        );
        if let Some(phrase) = self.classifier.matched_phrase(question) {
            debug!(phrase, "web search triggered");
        }

        let request = GenerateRequest {
            prompt: plan.prompt,
            web_search: used_web_search,
            max_tokens: self.max_tokens,
            temperature: Some(self.temperature),
        };

        let response = provider.generate(&request).await.map_err(|e| {
            error!(provider = provider.name(), error = %e, "generation backend call failed");
            ChatError::Backend(e)
        })?;

        let answer = self.post.process(&response.text, used_web_search);
        info!(
            model = %response.model,
            raw_chars = response.text.chars().count(),
            answer_chars = answer.chars().count(),
            used_web_search,
            "chat turn answered"
        );

        Ok(ChatTurn {
            question: question.to_string(),
            used_web_search,
            answer,
        })
    }
}
