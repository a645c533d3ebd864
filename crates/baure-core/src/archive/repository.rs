//! Archive repository trait definitions.

use baure_types::archive::{CulturalCategory, CulturalData};
use baure_types::error::RepositoryError;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::entry::ArchiveEntry;

/// Storage for one archive collection.
///
/// Implementations live in baure-infra (e.g., `SqliteRecipeRepository`).
/// Soft-deleted rows are invisible to `get` and `list`.
pub trait ArchiveRepository<T: ArchiveEntry>: Send + Sync {
    fn insert(
        &self,
        record: &T,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    fn get(
        &self,
        id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<T>, RepositoryError>> + Send;

    /// All live records, newest first.
    fn list(&self) -> impl std::future::Future<Output = Result<Vec<T>, RepositoryError>> + Send;

    /// Overwrite a live record. `RepositoryError::NotFound` if there is none.
    fn update(
        &self,
        record: &T,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Flag a live record as deleted. Returns whether a row was affected.
    fn soft_delete(
        &self,
        id: &Uuid,
        at: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;
}

/// Category lookup for cultural data articles.
pub trait CulturalDataRepository: ArchiveRepository<CulturalData> {
    /// Live articles in the category, newest first.
    fn list_by_category(
        &self,
        category: CulturalCategory,
    ) -> impl std::future::Future<Output = Result<Vec<CulturalData>, RepositoryError>> + Send;
}
