//! SQLite storage layer.
//!
//! Archive repository implementations backed by SQLite with WAL mode and
//! split read/write connection pools.

pub mod cultural_data;
pub mod life_story;
pub mod pool;
pub mod recipe;

use baure_types::error::RepositoryError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Column codecs shared by the archive repositories
// ---------------------------------------------------------------------------

fn query_err(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Query(e.to_string())
}

/// A duplicate primary key becomes `Conflict`; anything else is a query error.
fn insert_err(e: sqlx::Error, id: Uuid) -> RepositoryError {
    if e.as_database_error().is_some_and(|db| db.is_unique_violation()) {
        RepositoryError::Conflict(format!("record {id} already exists"))
    } else {
        query_err(e)
    }
}

fn parse_uuid(s: &str) -> Result<Uuid, RepositoryError> {
    Uuid::parse_str(s).map_err(|e| RepositoryError::Query(format!("invalid id: {e}")))
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

fn parse_opt_datetime(s: Option<String>) -> Result<Option<DateTime<Utc>>, RepositoryError> {
    s.as_deref().map(parse_datetime).transpose()
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

fn parse_date(s: Option<String>) -> Result<Option<NaiveDate>, RepositoryError> {
    s.as_deref()
        .map(|d| {
            NaiveDate::parse_from_str(d, "%Y-%m-%d")
                .map_err(|e| RepositoryError::Query(format!("invalid date: {e}")))
        })
        .transpose()
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, RepositoryError> {
    serde_json::to_string(value)
        .map_err(|e| RepositoryError::Query(format!("failed to serialize column: {e}")))
}

fn from_json<T: DeserializeOwned>(column: &str, s: &str) -> Result<T, RepositoryError> {
    serde_json::from_str(s)
        .map_err(|e| RepositoryError::Query(format!("invalid JSON in {column}: {e}")))
}
