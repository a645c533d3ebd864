//! Admin password check used by the frontend login screen.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::{Deserialize, Serialize};

use crate::http::error::AppError;
use crate::http::extractors::admin::{MISSING_PASSWORD, WRONG_PASSWORD};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ValidateRequest {
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub message: &'static str,
    pub valid: bool,
}

/// POST /api/admin/validate - Check the admin password.
pub async fn validate(
    State(state): State<AppState>,
    body: Result<Json<ValidateRequest>, JsonRejection>,
) -> Result<Json<ValidateResponse>, AppError> {
    // An unreadable body is treated like one without a password
    let request = body.map(|Json(b)| b).unwrap_or_default();

    let password = request
        .password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::Validation(MISSING_PASSWORD.to_string()))?;

    if !state.admin_key.matches(&password) {
        return Err(AppError::Unauthorized(WRONG_PASSWORD.to_string()));
    }

    Ok(Json(ValidateResponse {
        message: "Acceso concedido",
        valid: true,
    }))
}
