//! Archive records: recipes, life stories, and cultural data articles.
//!
//! Each collection has a stored record type (with id, timestamps, and the
//! soft-delete flag) and a `*Draft` type carrying only the editable fields.
//! Drafts are what the seed file and the admin forms produce.
//!
//! Wire names are camelCase and the id is exposed as `_id`, which is the
//! shape the frontend was written against.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::chat::RecipeContext;

/// An image attached to a record's gallery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

/// A titled section inside a cultural data article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subsection {
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub text: String,
}

// ---------------------------------------------------------------------------
// Recipe
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub baure_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub preparation: Option<String>,
    #[serde(default)]
    pub utensils: Vec<String>,
    #[serde(default)]
    pub consumption: Option<String>,
    #[serde(default)]
    pub conservation: Option<String>,
    #[serde(default)]
    pub source_person: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub images: Vec<ImageRef>,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Recipe {
    /// The subset of the recipe the chat feature sends to the prompt composer.
    pub fn to_context(&self) -> RecipeContext {
        RecipeContext {
            name: Some(self.name.clone()),
            baure_name: Some(self.baure_name.clone()),
            description: self.description.clone(),
            ingredients: Some(self.ingredients.clone()),
            preparation: self.preparation.clone(),
            utensils: Some(self.utensils.clone()),
            consumption: self.consumption.clone(),
            conservation: self.conservation.clone(),
            source_person: self.source_person.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDraft {
    pub name: String,
    #[serde(default)]
    pub baure_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub preparation: Option<String>,
    #[serde(default)]
    pub utensils: Vec<String>,
    #[serde(default)]
    pub consumption: Option<String>,
    #[serde(default)]
    pub conservation: Option<String>,
    #[serde(default)]
    pub source_person: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub images: Vec<ImageRef>,
}

// ---------------------------------------------------------------------------
// Life story
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifeStory {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub title: String,
    pub person_name: String,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub community: Option<String>,
    pub story: String,
    #[serde(default)]
    pub related_themes: Vec<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub recorded_date: Option<NaiveDate>,
    #[serde(default)]
    pub recorded_by: Option<String>,
    #[serde(default)]
    pub images: Vec<ImageRef>,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifeStoryDraft {
    pub title: String,
    pub person_name: String,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub community: Option<String>,
    pub story: String,
    #[serde(default)]
    pub related_themes: Vec<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub recorded_date: Option<NaiveDate>,
    #[serde(default)]
    pub recorded_by: Option<String>,
    #[serde(default)]
    pub images: Vec<ImageRef>,
}

// ---------------------------------------------------------------------------
// Cultural data
// ---------------------------------------------------------------------------

/// Category of a cultural data article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CulturalCategory {
    Historia,
    Tradiciones,
    Lengua,
    #[serde(rename = "Cosmovisión")]
    Cosmovision,
    Territorio,
    #[serde(rename = "Organización Social")]
    OrganizacionSocial,
    Cocina,
    Otro,
}

impl CulturalCategory {
    pub const ALL: [CulturalCategory; 8] = [
        CulturalCategory::Historia,
        CulturalCategory::Tradiciones,
        CulturalCategory::Lengua,
        CulturalCategory::Cosmovision,
        CulturalCategory::Territorio,
        CulturalCategory::OrganizacionSocial,
        CulturalCategory::Cocina,
        CulturalCategory::Otro,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CulturalCategory::Historia => "Historia",
            CulturalCategory::Tradiciones => "Tradiciones",
            CulturalCategory::Lengua => "Lengua",
            CulturalCategory::Cosmovision => "Cosmovisión",
            CulturalCategory::Territorio => "Territorio",
            CulturalCategory::OrganizacionSocial => "Organización Social",
            CulturalCategory::Cocina => "Cocina",
            CulturalCategory::Otro => "Otro",
        }
    }
}

impl fmt::Display for CulturalCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CulturalCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        CulturalCategory::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("categoría inválida: '{wanted}'"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CulturalData {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub title: String,
    pub category: CulturalCategory,
    pub content: String,
    #[serde(default)]
    pub subsections: Vec<Subsection>,
    #[serde(default)]
    pub images: Vec<ImageRef>,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub related_topics: Vec<String>,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CulturalDataDraft {
    pub title: String,
    pub category: CulturalCategory,
    pub content: String,
    #[serde(default)]
    pub subsections: Vec<Subsection>,
    #[serde(default)]
    pub images: Vec<ImageRef>,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub related_topics: Vec<String>,
}

/// Shape of the seed file: one array per collection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedFile {
    #[serde(default)]
    pub recipes: Vec<RecipeDraft>,
    #[serde(default)]
    pub life_stories: Vec<LifeStoryDraft>,
    #[serde(default)]
    pub cultural_data: Vec<CulturalDataDraft>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_recipe() -> Recipe {
        let now = Utc::now();
        Recipe {
            id: Uuid::now_v7(),
            name: "Sopa de bucheres".to_string(),
            baure_name: "Ejaj to Woshor".to_string(),
            description: Some("Pescado de pozas".to_string()),
            ingredients: vec!["Buchere".to_string(), "Sal".to_string()],
            preparation: None,
            utensils: vec!["Olla grande".to_string()],
            consumption: None,
            conservation: None,
            source_person: Some("Adil Arredondo".to_string()),
            tags: vec!["Río".to_string()],
            image_url: None,
            images: Vec::new(),
            deleted: false,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_recipe_serializes_underscore_id_and_camel_case() {
        let recipe = sample_recipe();
        let json = serde_json::to_value(&recipe).unwrap();
        assert_eq!(json["_id"], recipe.id.to_string());
        assert_eq!(json["baureName"], "Ejaj to Woshor");
        assert_eq!(json["sourcePerson"], "Adil Arredondo");
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_recipe_to_context_copies_fields() {
        let recipe = sample_recipe();
        let ctx = recipe.to_context();
        assert_eq!(ctx.name.as_deref(), Some("Sopa de bucheres"));
        assert_eq!(ctx.ingredients.as_ref().unwrap()[0], "Buchere");
        assert!(ctx.preparation.is_none());
    }

    #[test]
    fn test_cultural_category_accented_names() {
        let json = serde_json::to_string(&CulturalCategory::Cosmovision).unwrap();
        assert_eq!(json, "\"Cosmovisión\"");
        let parsed: CulturalCategory = serde_json::from_str("\"Organización Social\"").unwrap();
        assert_eq!(parsed, CulturalCategory::OrganizacionSocial);
    }

    #[test]
    fn test_cultural_category_from_str() {
        for c in CulturalCategory::ALL {
            assert_eq!(c.as_str().parse::<CulturalCategory>().unwrap(), c);
        }
        assert_eq!("cocina".parse::<CulturalCategory>().unwrap(), CulturalCategory::Cocina);
        assert!("Deportes".parse::<CulturalCategory>().is_err());
    }

    #[test]
    fn test_seed_file_partial() {
        let json = r#"{
            "recipes": [{"name": "Shocorimba", "ingredients": ["Yuca", "Maíz"]}],
            "lifeStories": [{"title": "Mi vida", "personName": "Ana", "story": "..."}]
        }"#;
        let seed: SeedFile = serde_json::from_str(json).unwrap();
        assert_eq!(seed.recipes.len(), 1);
        assert_eq!(seed.recipes[0].ingredients.len(), 2);
        assert_eq!(seed.life_stories[0].person_name, "Ana");
        assert!(seed.cultural_data.is_empty());
    }

    #[test]
    fn test_life_story_recorded_date_format() {
        let json = r#"{"title": "t", "personName": "p", "story": "s", "recordedDate": "2021-05-04"}"#;
        let draft: LifeStoryDraft = serde_json::from_str(json).unwrap();
        assert_eq!(
            draft.recorded_date,
            Some(NaiveDate::from_ymd_opt(2021, 5, 4).unwrap())
        );
    }
}
