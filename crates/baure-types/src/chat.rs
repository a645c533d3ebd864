//! Chat turn types: the recipe context sent by the frontend, the wire
//! request/response of `POST /api/chat`, and the in-memory `ChatTurn`.

use serde::{Deserialize, Serialize};

/// Structured recipe record attached to a question.
///
/// Every field is optional because the frontend forwards whatever the
/// recipe document holds; absent and blank fields are rendered as an
/// explicit marker by the prompt composer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeContext {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub baure_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub ingredients: Option<Vec<String>>,
    #[serde(default)]
    pub preparation: Option<String>,
    #[serde(default)]
    pub utensils: Option<Vec<String>>,
    #[serde(default)]
    pub consumption: Option<String>,
    #[serde(default)]
    pub conservation: Option<String>,
    #[serde(default)]
    pub source_person: Option<String>,
}

/// Body of `POST /api/chat`.
///
/// `question` is optional at the serde level so that a missing question is
/// reported as a 400 with the archive's own message rather than a generic
/// JSON rejection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub recipe_data: Option<RecipeContext>,
}

/// Successful response of `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub answer: String,
    pub used_web_search: bool,
}

/// One question/answer exchange. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub question: String,
    pub used_web_search: bool,
    pub answer: String,
}

impl From<ChatTurn> for ChatResponse {
    fn from(turn: ChatTurn) -> Self {
        Self {
            answer: turn.answer,
            used_web_search: turn.used_web_search,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipe_context_camel_case() {
        let json = r#"{
            "name": "Masaco de yuca",
            "baureName": "Kiwori",
            "ingredients": ["yuca", "queso"],
            "sourcePerson": "Doña Rosa"
        }"#;
        let ctx: RecipeContext = serde_json::from_str(json).unwrap();
        assert_eq!(ctx.name.as_deref(), Some("Masaco de yuca"));
        assert_eq!(ctx.baure_name.as_deref(), Some("Kiwori"));
        assert_eq!(ctx.ingredients.as_ref().unwrap().len(), 2);
        assert_eq!(ctx.source_person.as_deref(), Some("Doña Rosa"));
        assert!(ctx.utensils.is_none());
    }

    #[test]
    fn test_recipe_context_accepts_nulls() {
        let json = r#"{"name": null, "ingredients": null, "preparation": null}"#;
        let ctx: RecipeContext = serde_json::from_str(json).unwrap();
        assert_eq!(ctx, RecipeContext::default());
    }

    #[test]
    fn test_chat_request_without_question() {
        let req: ChatRequest = serde_json::from_str("{}").unwrap();
        assert!(req.question.is_none());
        assert!(req.recipe_data.is_none());
    }

    #[test]
    fn test_chat_request_with_recipe() {
        let json = r#"{"question": "¿Sin gluten?", "recipeData": {"name": "Masaco"}}"#;
        let req: ChatRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.question.as_deref(), Some("¿Sin gluten?"));
        assert_eq!(
            req.recipe_data.unwrap().name.as_deref(),
            Some("Masaco")
        );
    }

    #[test]
    fn test_chat_response_wire_names() {
        let resp = ChatResponse::from(ChatTurn {
            question: "q".to_string(),
            used_web_search: true,
            answer: "a".to_string(),
        });
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["answer"], "a");
        assert_eq!(json["usedWebSearch"], true);
    }
}
