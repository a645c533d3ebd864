//! Cultural data endpoint handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde_json::Value;

use baure_types::archive::CulturalData;

use super::message;
use crate::http::error::AppError;
use crate::http::extractors::admin::AdminAuthorized;
use crate::http::extractors::form::ArchiveForm;
use crate::state::AppState;

/// GET /api/cultural-data
pub async fn list_cultural_data(
    State(state): State<AppState>,
) -> Result<Json<Vec<CulturalData>>, AppError> {
    Ok(Json(state.cultural_data.list().await?))
}

/// GET /api/cultural-data/category/{category}
pub async fn list_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<Vec<CulturalData>>, AppError> {
    Ok(Json(state.cultural_data.list_by_category(&category).await?))
}

/// GET /api/cultural-data/{id}
pub async fn get_cultural_data(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CulturalData>, AppError> {
    Ok(Json(state.cultural_data.get(&id).await?))
}

/// POST /api/cultural-data
pub async fn create_cultural_data(
    State(state): State<AppState>,
    _admin: AdminAuthorized,
    form: ArchiveForm,
) -> Result<(StatusCode, Json<CulturalData>), AppError> {
    let result = match form.fields.cultural_data_draft(&form.media, None) {
        Ok(draft) => state.cultural_data.create(draft).await,
        Err(e) => Err(e),
    };
    let data = form.settle(&state.images, result).await?;
    Ok((StatusCode::CREATED, Json(data)))
}

/// PUT /api/cultural-data/{id}
pub async fn update_cultural_data(
    State(state): State<AppState>,
    _admin: AdminAuthorized,
    Path(id): Path<String>,
    form: ArchiveForm,
) -> Result<Json<CulturalData>, AppError> {
    let result = state
        .cultural_data
        .update(&id, |existing| {
            form.fields.cultural_data_draft(&form.media, Some(existing))
        })
        .await;
    let data = form.settle(&state.images, result).await?;
    Ok(Json(data))
}

/// DELETE /api/cultural-data/{id}
pub async fn delete_cultural_data(
    State(state): State<AppState>,
    _admin: AdminAuthorized,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    state.cultural_data.delete(&id).await?;
    Ok(message("Dato cultural eliminado"))
}
