//! Life story endpoint handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde_json::Value;

use baure_types::archive::{ImageRef, LifeStory};

use super::message;
use crate::http::error::AppError;
use crate::http::extractors::admin::AdminAuthorized;
use crate::http::extractors::form::ArchiveForm;
use crate::state::AppState;

/// GET /api/life-stories
pub async fn list_life_stories(
    State(state): State<AppState>,
) -> Result<Json<Vec<LifeStory>>, AppError> {
    Ok(Json(state.life_stories.list().await?))
}

/// GET /api/life-stories/{id}
pub async fn get_life_story(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<LifeStory>, AppError> {
    Ok(Json(state.life_stories.get(&id).await?))
}

/// POST /api/life-stories
pub async fn create_life_story(
    State(state): State<AppState>,
    _admin: AdminAuthorized,
    form: ArchiveForm,
) -> Result<(StatusCode, Json<LifeStory>), AppError> {
    let result = match form.fields.life_story_draft(&form.media, None) {
        Ok(draft) => state.life_stories.create(draft).await,
        Err(e) => Err(e),
    };
    let story = form.settle(&state.images, result).await?;
    Ok((StatusCode::CREATED, Json(story)))
}

/// PUT /api/life-stories/{id}
pub async fn update_life_story(
    State(state): State<AppState>,
    _admin: AdminAuthorized,
    Path(id): Path<String>,
    form: ArchiveForm,
) -> Result<Json<LifeStory>, AppError> {
    let result = state
        .life_stories
        .update(&id, |existing| {
            form.fields.life_story_draft(&form.media, Some(existing))
        })
        .await;
    let story = form.settle(&state.images, result).await?;
    Ok(Json(story))
}

/// PATCH /api/life-stories/{id}/images - Append photos to the gallery.
///
/// Both the `image` and `images` file fields are accepted here.
pub async fn add_life_story_images(
    State(state): State<AppState>,
    _admin: AdminAuthorized,
    Path(id): Path<String>,
    form: ArchiveForm,
) -> Result<Json<LifeStory>, AppError> {
    let mut images: Vec<ImageRef> = form
        .media
        .main_image
        .iter()
        .map(|url| ImageRef {
            url: url.clone(),
            caption: form.fields.text("caption"),
        })
        .collect();
    images.extend(form.fields.gallery_images(&form.media, &[]));

    let result = state.life_stories.append_images(&id, images).await;
    let story = form.settle(&state.images, result).await?;
    Ok(Json(story))
}

/// DELETE /api/life-stories/{id}
pub async fn delete_life_story(
    State(state): State<AppState>,
    _admin: AdminAuthorized,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    state.life_stories.delete(&id).await?;
    Ok(message("Recuento eliminado"))
}
