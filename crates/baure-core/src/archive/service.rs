//! Archive service: CRUD with soft delete over any archive collection.

use std::marker::PhantomData;

use baure_types::archive::{CulturalCategory, CulturalData, ImageRef};
use baure_types::error::{ArchiveError, RepositoryError};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use super::entry::ArchiveEntry;
use super::repository::{ArchiveRepository, CulturalDataRepository};

/// Generic over the repository to keep storage out of baure-core.
pub struct ArchiveService<T: ArchiveEntry, R: ArchiveRepository<T>> {
    repo: R,
    _entry: PhantomData<fn() -> T>,
}

impl<T: ArchiveEntry, R: ArchiveRepository<T>> ArchiveService<T, R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            _entry: PhantomData,
        }
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    pub async fn list(&self) -> Result<Vec<T>, ArchiveError> {
        Ok(self.repo.list().await?)
    }

    /// Fetch a live record. Unparseable ids are reported as not found.
    pub async fn get(&self, id: &str) -> Result<T, ArchiveError> {
        let id = parse_id::<T>(id)?;
        self.repo
            .get(&id)
            .await?
            .ok_or_else(|| ArchiveError::NotFound(T::NOT_FOUND.to_string()))
    }

    pub async fn create(&self, draft: T::Draft) -> Result<T, ArchiveError> {
        T::validate(&draft)?;
        let record = T::create(Uuid::now_v7(), draft, Utc::now());
        self.repo.insert(&record).await?;
        info!(collection = T::COLLECTION, id = %record.id(), "archive record created");
        Ok(record)
    }

    /// Replace a record's editable fields.
    ///
    /// `build` receives the current record so callers can carry over media
    /// that the submission did not replace.
    pub async fn update<F>(&self, id: &str, build: F) -> Result<T, ArchiveError>
    where
        F: FnOnce(&T) -> Result<T::Draft, ArchiveError>,
    {
        let mut record = self.get(id).await?;
        let draft = build(&record)?;
        T::validate(&draft)?;
        record.revise(draft, Utc::now());
        self.store(&record).await?;
        info!(collection = T::COLLECTION, id = %record.id(), "archive record updated");
        Ok(record)
    }

    /// Append gallery images to a record.
    pub async fn append_images(&self, id: &str, images: Vec<ImageRef>) -> Result<T, ArchiveError> {
        if images.is_empty() {
            return Err(ArchiveError::Validation(
                "No se recibieron imágenes".to_string(),
            ));
        }
        let mut record = self.get(id).await?;
        let added = images.len();
        record.images_mut().extend(images);
        record.touch(Utc::now());
        self.store(&record).await?;
        info!(collection = T::COLLECTION, id = %record.id(), added, "archive images appended");
        Ok(record)
    }

    pub async fn delete(&self, id: &str) -> Result<(), ArchiveError> {
        let id = parse_id::<T>(id)?;
        if !self.repo.soft_delete(&id, Utc::now()).await? {
            return Err(ArchiveError::NotFound(T::NOT_FOUND.to_string()));
        }
        info!(collection = T::COLLECTION, %id, "archive record soft-deleted");
        Ok(())
    }

    async fn store(&self, record: &T) -> Result<(), ArchiveError> {
        match self.repo.update(record).await {
            Ok(()) => Ok(()),
            Err(RepositoryError::NotFound) => Err(ArchiveError::NotFound(T::NOT_FOUND.to_string())),
            Err(e) => Err(e.into()),
        }
    }
}

impl<R: CulturalDataRepository> ArchiveService<CulturalData, R> {
    pub async fn list_by_category(&self, category: &str) -> Result<Vec<CulturalData>, ArchiveError> {
        let category: CulturalCategory = category.parse().map_err(ArchiveError::Validation)?;
        Ok(self.repo.list_by_category(category).await?)
    }
}

fn parse_id<T: ArchiveEntry>(id: &str) -> Result<Uuid, ArchiveError> {
    Uuid::parse_str(id.trim()).map_err(|_| ArchiveError::NotFound(T::NOT_FOUND.to_string()))
}
