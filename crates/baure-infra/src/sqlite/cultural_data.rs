//! SQLite cultural data repository.
//!
//! Categories are stored by display name (e.g. "Organización Social").

use baure_core::archive::repository::{ArchiveRepository, CulturalDataRepository};
use baure_types::archive::{CulturalCategory, CulturalData};
use baure_types::error::RepositoryError;
use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;
use super::{
    format_datetime, from_json, insert_err, parse_datetime, parse_opt_datetime, parse_uuid,
    query_err, to_json,
};

/// SQLite-backed implementation of `CulturalDataRepository`.
pub struct SqliteCulturalDataRepository {
    pool: DatabasePool,
}

impl SqliteCulturalDataRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct CulturalDataRow {
    id: String,
    title: String,
    category: String,
    content: String,
    subsections: String,
    images: String,
    sources: String,
    related_topics: String,
    deleted: i64,
    deleted_at: Option<String>,
    created_at: String,
    updated_at: String,
}

impl CulturalDataRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            category: row.try_get("category")?,
            content: row.try_get("content")?,
            subsections: row.try_get("subsections")?,
            images: row.try_get("images")?,
            sources: row.try_get("sources")?,
            related_topics: row.try_get("related_topics")?,
            deleted: row.try_get("deleted")?,
            deleted_at: row.try_get("deleted_at")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_data(self) -> Result<CulturalData, RepositoryError> {
        let category: CulturalCategory = self.category.parse().map_err(RepositoryError::Query)?;

        Ok(CulturalData {
            id: parse_uuid(&self.id)?,
            title: self.title,
            category,
            content: self.content,
            subsections: from_json("subsections", &self.subsections)?,
            images: from_json("images", &self.images)?,
            sources: from_json("sources", &self.sources)?,
            related_topics: from_json("related_topics", &self.related_topics)?,
            deleted: self.deleted != 0,
            deleted_at: parse_opt_datetime(self.deleted_at)?,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

fn map_rows(rows: &[sqlx::sqlite::SqliteRow]) -> Result<Vec<CulturalData>, RepositoryError> {
    rows.iter()
        .map(|row| CulturalDataRow::from_row(row).map_err(query_err)?.into_data())
        .collect()
}

impl ArchiveRepository<CulturalData> for SqliteCulturalDataRepository {
    async fn insert(&self, record: &CulturalData) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"INSERT INTO cultural_data (id, title, category, content, subsections, images,
                   sources, related_topics, deleted, deleted_at, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(record.id.to_string())
        .bind(&record.title)
        .bind(record.category.as_str())
        .bind(&record.content)
        .bind(to_json(&record.subsections)?)
        .bind(to_json(&record.images)?)
        .bind(to_json(&record.sources)?)
        .bind(to_json(&record.related_topics)?)
        .bind(record.deleted as i64)
        .bind(record.deleted_at.as_ref().map(format_datetime))
        .bind(format_datetime(&record.created_at))
        .bind(format_datetime(&record.updated_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| insert_err(e, record.id))?;

        Ok(())
    }

    async fn get(&self, id: &Uuid) -> Result<Option<CulturalData>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM cultural_data WHERE id = ? AND deleted = 0")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_err)?;

        row.map(|row| CulturalDataRow::from_row(&row).map_err(query_err)?.into_data())
            .transpose()
    }

    async fn list(&self) -> Result<Vec<CulturalData>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM cultural_data WHERE deleted = 0 ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_err)?;

        map_rows(&rows)
    }

    async fn update(&self, record: &CulturalData) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"UPDATE cultural_data SET title = ?, category = ?, content = ?, subsections = ?,
                   images = ?, sources = ?, related_topics = ?, updated_at = ?
               WHERE id = ? AND deleted = 0"#,
        )
        .bind(&record.title)
        .bind(record.category.as_str())
        .bind(&record.content)
        .bind(to_json(&record.subsections)?)
        .bind(to_json(&record.images)?)
        .bind(to_json(&record.sources)?)
        .bind(to_json(&record.related_topics)?)
        .bind(format_datetime(&record.updated_at))
        .bind(record.id.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(query_err)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn soft_delete(&self, id: &Uuid, at: DateTime<Utc>) -> Result<bool, RepositoryError> {
        let now = format_datetime(&at);
        let result = sqlx::query(
            "UPDATE cultural_data SET deleted = 1, deleted_at = ?, updated_at = ? WHERE id = ? AND deleted = 0",
        )
        .bind(&now)
        .bind(&now)
        .bind(id.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(query_err)?;

        Ok(result.rows_affected() > 0)
    }
}

impl CulturalDataRepository for SqliteCulturalDataRepository {
    async fn list_by_category(
        &self,
        category: CulturalCategory,
    ) -> Result<Vec<CulturalData>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM cultural_data WHERE category = ? AND deleted = 0 ORDER BY created_at DESC, id DESC",
        )
        .bind(category.as_str())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_err)?;

        map_rows(&rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::pool::test_pool;
    use baure_types::archive::Subsection;

    fn make_article(title: &str, category: CulturalCategory) -> CulturalData {
        let now = Utc::now();
        CulturalData {
            id: Uuid::now_v7(),
            title: title.to_string(),
            category,
            content: "Texto principal".to_string(),
            subsections: vec![Subsection {
                subtitle: "Origen".to_string(),
                text: "Misiones jesuíticas".to_string(),
            }],
            images: Vec::new(),
            sources: vec!["Entrevista 2022".to_string()],
            related_topics: vec!["Historia".to_string()],
            deleted: false,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_roundtrip_accented_category() {
        let repo = SqliteCulturalDataRepository::new(test_pool().await);
        let article = make_article("Consejo comunal", CulturalCategory::OrganizacionSocial);
        repo.insert(&article).await.unwrap();

        let loaded = repo.get(&article.id).await.unwrap().unwrap();
        assert_eq!(loaded.category, CulturalCategory::OrganizacionSocial);
        assert_eq!(loaded.subsections, article.subsections);
        assert_eq!(loaded.sources, article.sources);
    }

    #[tokio::test]
    async fn test_list_by_category_filters() {
        let repo = SqliteCulturalDataRepository::new(test_pool().await);
        repo.insert(&make_article("Fiesta patronal", CulturalCategory::Tradiciones))
            .await
            .unwrap();
        repo.insert(&make_article("Chicha", CulturalCategory::Cocina))
            .await
            .unwrap();
        let hidden = make_article("Danza", CulturalCategory::Tradiciones);
        repo.insert(&hidden).await.unwrap();
        repo.soft_delete(&hidden.id, Utc::now()).await.unwrap();

        let tradiciones = repo
            .list_by_category(CulturalCategory::Tradiciones)
            .await
            .unwrap();
        assert_eq!(tradiciones.len(), 1);
        assert_eq!(tradiciones[0].title, "Fiesta patronal");

        let lengua = repo.list_by_category(CulturalCategory::Lengua).await.unwrap();
        assert!(lengua.is_empty());
    }

    #[tokio::test]
    async fn test_update_changes_category() {
        let repo = SqliteCulturalDataRepository::new(test_pool().await);
        let mut article = make_article("Territorio ancestral", CulturalCategory::Otro);
        repo.insert(&article).await.unwrap();

        article.category = CulturalCategory::Territorio;
        repo.update(&article).await.unwrap();

        assert!(repo.list_by_category(CulturalCategory::Otro).await.unwrap().is_empty());
        assert_eq!(
            repo.list_by_category(CulturalCategory::Territorio)
                .await
                .unwrap()
                .len(),
            1
        );
    }
}
