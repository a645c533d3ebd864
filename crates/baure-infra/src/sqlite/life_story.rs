//! SQLite life story repository.

use baure_core::archive::repository::ArchiveRepository;
use baure_types::archive::LifeStory;
use baure_types::error::RepositoryError;
use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;
use super::{
    format_datetime, from_json, insert_err, parse_date, parse_datetime, parse_opt_datetime,
    parse_uuid, query_err, to_json,
};

/// SQLite-backed implementation of `ArchiveRepository<LifeStory>`.
pub struct SqliteLifeStoryRepository {
    pool: DatabasePool,
}

impl SqliteLifeStoryRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct LifeStoryRow {
    id: String,
    title: String,
    person_name: String,
    age: Option<i64>,
    community: Option<String>,
    story: String,
    related_themes: String,
    photo_url: Option<String>,
    recorded_date: Option<String>,
    recorded_by: Option<String>,
    images: String,
    deleted: i64,
    deleted_at: Option<String>,
    created_at: String,
    updated_at: String,
}

impl LifeStoryRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            person_name: row.try_get("person_name")?,
            age: row.try_get("age")?,
            community: row.try_get("community")?,
            story: row.try_get("story")?,
            related_themes: row.try_get("related_themes")?,
            photo_url: row.try_get("photo_url")?,
            recorded_date: row.try_get("recorded_date")?,
            recorded_by: row.try_get("recorded_by")?,
            images: row.try_get("images")?,
            deleted: row.try_get("deleted")?,
            deleted_at: row.try_get("deleted_at")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_story(self) -> Result<LifeStory, RepositoryError> {
        let age = self
            .age
            .map(|a| {
                u32::try_from(a).map_err(|_| RepositoryError::Query(format!("invalid age: {a}")))
            })
            .transpose()?;

        Ok(LifeStory {
            id: parse_uuid(&self.id)?,
            title: self.title,
            person_name: self.person_name,
            age,
            community: self.community,
            story: self.story,
            related_themes: from_json("related_themes", &self.related_themes)?,
            photo_url: self.photo_url,
            recorded_date: parse_date(self.recorded_date)?,
            recorded_by: self.recorded_by,
            images: from_json("images", &self.images)?,
            deleted: self.deleted != 0,
            deleted_at: parse_opt_datetime(self.deleted_at)?,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

fn format_date(story: &LifeStory) -> Option<String> {
    story.recorded_date.map(|d| d.format("%Y-%m-%d").to_string())
}

impl ArchiveRepository<LifeStory> for SqliteLifeStoryRepository {
    async fn insert(&self, record: &LifeStory) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"INSERT INTO life_stories (id, title, person_name, age, community, story,
                   related_themes, photo_url, recorded_date, recorded_by, images,
                   deleted, deleted_at, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(record.id.to_string())
        .bind(&record.title)
        .bind(&record.person_name)
        .bind(record.age.map(i64::from))
        .bind(&record.community)
        .bind(&record.story)
        .bind(to_json(&record.related_themes)?)
        .bind(&record.photo_url)
        .bind(format_date(record))
        .bind(&record.recorded_by)
        .bind(to_json(&record.images)?)
        .bind(record.deleted as i64)
        .bind(record.deleted_at.as_ref().map(format_datetime))
        .bind(format_datetime(&record.created_at))
        .bind(format_datetime(&record.updated_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| insert_err(e, record.id))?;

        Ok(())
    }

    async fn get(&self, id: &Uuid) -> Result<Option<LifeStory>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM life_stories WHERE id = ? AND deleted = 0")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_err)?;

        row.map(|row| LifeStoryRow::from_row(&row).map_err(query_err)?.into_story())
            .transpose()
    }

    async fn list(&self) -> Result<Vec<LifeStory>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM life_stories WHERE deleted = 0 ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_err)?;

        rows.iter()
            .map(|row| LifeStoryRow::from_row(row).map_err(query_err)?.into_story())
            .collect()
    }

    async fn update(&self, record: &LifeStory) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"UPDATE life_stories SET title = ?, person_name = ?, age = ?, community = ?,
                   story = ?, related_themes = ?, photo_url = ?, recorded_date = ?,
                   recorded_by = ?, images = ?, updated_at = ?
               WHERE id = ? AND deleted = 0"#,
        )
        .bind(&record.title)
        .bind(&record.person_name)
        .bind(record.age.map(i64::from))
        .bind(&record.community)
        .bind(&record.story)
        .bind(to_json(&record.related_themes)?)
        .bind(&record.photo_url)
        .bind(format_date(record))
        .bind(&record.recorded_by)
        .bind(to_json(&record.images)?)
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
            "UPDATE life_stories SET deleted = 1, deleted_at = ?, updated_at = ? WHERE id = ? AND deleted = 0",
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::pool::test_pool;
    use baure_types::archive::ImageRef;
    use chrono::NaiveDate;

    fn make_story(title: &str) -> LifeStory {
        let now = Utc::now();
        LifeStory {
            id: Uuid::now_v7(),
            title: title.to_string(),
            person_name: "Juana Cuñaja".to_string(),
            age: Some(78),
            community: Some("El Carmen del Iténez".to_string()),
            story: "Cuando era niña, pescábamos en las pozas.".to_string(),
            related_themes: vec!["Pesca".to_string(), "Infancia".to_string()],
            photo_url: None,
            recorded_date: NaiveDate::from_ymd_opt(2023, 8, 14),
            recorded_by: Some("Equipo de archivo".to_string()),
            images: vec![ImageRef {
                url: "http://localhost:5000/uploads/j.jpg".to_string(),
                caption: None,
            }],
            deleted: false,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_roundtrip_optional_fields() {
        let repo = SqliteLifeStoryRepository::new(test_pool().await);
        let story = make_story("Las pozas");
        repo.insert(&story).await.unwrap();

        let loaded = repo.get(&story.id).await.unwrap().unwrap();
        assert_eq!(loaded.age, Some(78));
        assert_eq!(loaded.recorded_date, NaiveDate::from_ymd_opt(2023, 8, 14));
        assert_eq!(loaded.related_themes, story.related_themes);
        assert_eq!(loaded.images.len(), 1);
        assert!(loaded.photo_url.is_none());
    }

    #[tokio::test]
    async fn test_update_clears_optional_fields() {
        let repo = SqliteLifeStoryRepository::new(test_pool().await);
        let mut story = make_story("Las pozas");
        repo.insert(&story).await.unwrap();

        story.age = None;
        story.recorded_date = None;
        story.updated_at = Utc::now();
        repo.update(&story).await.unwrap();

        let loaded = repo.get(&story.id).await.unwrap().unwrap();
        assert!(loaded.age.is_none());
        assert!(loaded.recorded_date.is_none());
    }

    #[tokio::test]
    async fn test_soft_delete_then_list() {
        let repo = SqliteLifeStoryRepository::new(test_pool().await);
        let keep = make_story("uno");
        let drop = make_story("dos");
        repo.insert(&keep).await.unwrap();
        repo.insert(&drop).await.unwrap();

        assert!(repo.soft_delete(&drop.id, Utc::now()).await.unwrap());
        let listed = repo.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, keep.id);
    }
}
