//! Request handlers grouped by resource.

pub mod admin;
pub mod chat;
pub mod cultural_data;
pub mod life_story;
pub mod recipe;

use axum::Json;
use serde_json::{Value, json};

/// `{ "message": ... }` body for operations without a record to return.
pub(crate) fn message(text: &str) -> Json<Value> {
    Json(json!({ "message": text }))
}
