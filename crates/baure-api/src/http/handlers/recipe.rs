//! Recipe endpoint handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde_json::Value;

use baure_types::archive::Recipe;

use super::message;
use crate::http::error::AppError;
use crate::http::extractors::admin::AdminAuthorized;
use crate::http::extractors::form::ArchiveForm;
use crate::state::AppState;

/// GET /api/recipes - All recipes, newest first.
pub async fn list_recipes(State(state): State<AppState>) -> Result<Json<Vec<Recipe>>, AppError> {
    Ok(Json(state.recipes.list().await?))
}

/// GET /api/recipes/{id}
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Recipe>, AppError> {
    Ok(Json(state.recipes.get(&id).await?))
}

/// POST /api/recipes - Create a recipe from a multipart form.
pub async fn create_recipe(
    State(state): State<AppState>,
    _admin: AdminAuthorized,
    form: ArchiveForm,
) -> Result<(StatusCode, Json<Recipe>), AppError> {
    let draft = form.fields.recipe_draft(&form.media, None);
    let result = state.recipes.create(draft).await;
    let recipe = form.settle(&state.images, result).await?;
    Ok((StatusCode::CREATED, Json(recipe)))
}

/// PUT /api/recipes/{id} - Replace a recipe's fields, keeping media not resubmitted.
pub async fn update_recipe(
    State(state): State<AppState>,
    _admin: AdminAuthorized,
    Path(id): Path<String>,
    form: ArchiveForm,
) -> Result<Json<Recipe>, AppError> {
    let result = state
        .recipes
        .update(&id, |existing| {
            Ok(form.fields.recipe_draft(&form.media, Some(existing)))
        })
        .await;
    let recipe = form.settle(&state.images, result).await?;
    Ok(Json(recipe))
}

/// DELETE /api/recipes/{id} - Soft delete.
pub async fn delete_recipe(
    State(state): State<AppState>,
    _admin: AdminAuthorized,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    state.recipes.delete(&id).await?;
    Ok(message("Receta eliminada"))
}
