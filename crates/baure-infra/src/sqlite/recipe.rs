//! SQLite recipe repository.

use baure_core::archive::repository::ArchiveRepository;
use baure_types::archive::{ImageRef, Recipe};
use baure_types::error::RepositoryError;
use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;
use super::{
    format_datetime, from_json, insert_err, parse_datetime, parse_opt_datetime, parse_uuid, query_err,
    to_json,
};

/// SQLite-backed implementation of `ArchiveRepository<Recipe>`.
pub struct SqliteRecipeRepository {
    pool: DatabasePool,
}

impl SqliteRecipeRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row type for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct RecipeRow {
    id: String,
    name: String,
    baure_name: String,
    description: Option<String>,
    ingredients: String,
    preparation: Option<String>,
    utensils: String,
    consumption: Option<String>,
    conservation: Option<String>,
    source_person: Option<String>,
    tags: String,
    image_url: Option<String>,
    images: String,
    deleted: i64,
    deleted_at: Option<String>,
    created_at: String,
    updated_at: String,
}

impl RecipeRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            baure_name: row.try_get("baure_name")?,
            description: row.try_get("description")?,
            ingredients: row.try_get("ingredients")?,
            preparation: row.try_get("preparation")?,
            utensils: row.try_get("utensils")?,
            consumption: row.try_get("consumption")?,
            conservation: row.try_get("conservation")?,
            source_person: row.try_get("source_person")?,
            tags: row.try_get("tags")?,
            image_url: row.try_get("image_url")?,
            images: row.try_get("images")?,
            deleted: row.try_get("deleted")?,
            deleted_at: row.try_get("deleted_at")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_recipe(self) -> Result<Recipe, RepositoryError> {
        let images: Vec<ImageRef> = from_json("images", &self.images)?;
        Ok(Recipe {
            id: parse_uuid(&self.id)?,
            name: self.name,
            baure_name: self.baure_name,
            description: self.description,
            ingredients: from_json("ingredients", &self.ingredients)?,
            preparation: self.preparation,
            utensils: from_json("utensils", &self.utensils)?,
            consumption: self.consumption,
            conservation: self.conservation,
            source_person: self.source_person,
            tags: from_json("tags", &self.tags)?,
            image_url: self.image_url,
            images,
            deleted: self.deleted != 0,
            deleted_at: parse_opt_datetime(self.deleted_at)?,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

fn map_rows(rows: &[sqlx::sqlite::SqliteRow]) -> Result<Vec<Recipe>, RepositoryError> {
    rows.iter()
        .map(|row| RecipeRow::from_row(row).map_err(query_err)?.into_recipe())
        .collect()
}

// ---------------------------------------------------------------------------
// ArchiveRepository implementation
// ---------------------------------------------------------------------------

impl ArchiveRepository<Recipe> for SqliteRecipeRepository {
    async fn insert(&self, record: &Recipe) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"INSERT INTO recipes (id, name, baure_name, description, ingredients, preparation,
                   utensils, consumption, conservation, source_person, tags, image_url, images,
                   deleted, deleted_at, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(record.id.to_string())
        .bind(&record.name)
        .bind(&record.baure_name)
        .bind(&record.description)
        .bind(to_json(&record.ingredients)?)
        .bind(&record.preparation)
        .bind(to_json(&record.utensils)?)
        .bind(&record.consumption)
        .bind(&record.conservation)
        .bind(&record.source_person)
        .bind(to_json(&record.tags)?)
        .bind(&record.image_url)
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

    async fn get(&self, id: &Uuid) -> Result<Option<Recipe>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM recipes WHERE id = ? AND deleted = 0")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_err)?;

        match row {
            Some(row) => Ok(Some(RecipeRow::from_row(&row).map_err(query_err)?.into_recipe()?)),
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<Recipe>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM recipes WHERE deleted = 0 ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_err)?;

        map_rows(&rows)
    }

    async fn update(&self, record: &Recipe) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"UPDATE recipes SET name = ?, baure_name = ?, description = ?, ingredients = ?,
                   preparation = ?, utensils = ?, consumption = ?, conservation = ?,
                   source_person = ?, tags = ?, image_url = ?, images = ?, updated_at = ?
               WHERE id = ? AND deleted = 0"#,
        )
        .bind(&record.name)
        .bind(&record.baure_name)
        .bind(&record.description)
        .bind(to_json(&record.ingredients)?)
        .bind(&record.preparation)
        .bind(to_json(&record.utensils)?)
        .bind(&record.consumption)
        .bind(&record.conservation)
        .bind(&record.source_person)
        .bind(to_json(&record.tags)?)
        .bind(&record.image_url)
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
            "UPDATE recipes SET deleted = 1, deleted_at = ?, updated_at = ? WHERE id = ? AND deleted = 0",
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
