//! Chat endpoint: one question/answer turn per request.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;

use baure_types::chat::{ChatRequest, ChatResponse};

use crate::http::error::AppError;
use crate::state::AppState;

/// POST /api/chat - Answer a question, optionally about a specific recipe.
///
/// Dropping this future (client disconnect) drops the backend call with it.
pub async fn chat(
    State(state): State<AppState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let Json(request) = body.map_err(|e| AppError::Validation(e.body_text()))?;

    let turn = state
        .chat_service
        .answer(request.question.as_deref(), request.recipe_data.as_ref())
        .await?;

    Ok(Json(turn.into()))
}
