//! Coercion of admin form submissions into archive drafts.
//!
//! Forms arrive as flat text fields (multipart). List fields may be sent
//! as a JSON array string, as repeated fields, or as newline-separated
//! text; tag-like lists are also split on commas.

use baure_types::archive::{
    CulturalCategory, CulturalData, CulturalDataDraft, ImageRef, LifeStory, LifeStoryDraft, Recipe,
    RecipeDraft, Subsection,
};
use baure_types::error::ArchiveError;
use chrono::NaiveDate;

/// How a list-valued text field is split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListStyle {
    /// One entry per line (ingredients, steps).
    Lines,
    /// Lines and commas (tags, utensils, sources).
    Tags,
}

/// Split list field values into trimmed, non-blank entries.
pub fn parse_list<S: AsRef<str>>(values: &[S], style: ListStyle) -> Vec<String> {
    let mut out = Vec::new();
    for value in values {
        let value = value.as_ref().trim();
        if value.starts_with('[') {
            if let Ok(items) = serde_json::from_str::<Vec<String>>(value) {
                out.extend(items.iter().map(|s| s.trim().to_string()));
                continue;
            }
        }
        for line in value.lines() {
            match style {
                ListStyle::Lines => out.push(line.trim().to_string()),
                ListStyle::Tags => out.extend(line.split(',').map(|s| s.trim().to_string())),
            }
        }
    }
    out.retain(|s| !s.is_empty());
    out
}

/// Images received with a submission, already stored and addressable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadedMedia {
    /// The `image` file field.
    pub main_image: Option<String>,
    /// The `images` file fields, in submission order.
    pub gallery: Vec<String>,
}

/// Text fields of one submission, in arrival order.
#[derive(Debug, Clone, Default)]
pub struct FormFields {
    fields: Vec<(String, String)>,
}

impl FormFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push((name.into(), value.into()));
    }

    pub fn values(&self, name: &str) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Last non-blank value of a field, trimmed.
    pub fn text(&self, name: &str) -> Option<String> {
        self.values(name)
            .into_iter()
            .rev()
            .map(str::trim)
            .find(|v| !v.is_empty())
            .map(str::to_string)
    }

    /// Text value, or empty when absent. Blank required fields are
    /// rejected later by draft validation.
    pub fn required(&self, name: &str) -> String {
        self.text(name).unwrap_or_default()
    }

    pub fn list(&self, name: &str, style: ListStyle) -> Vec<String> {
        parse_list(&self.values(name), style)
    }

    /// Pair gallery uploads with the `captions` field by position.
    fn gallery(&self, media: &UploadedMedia) -> Vec<ImageRef> {
        let captions = self.list("captions", ListStyle::Lines);
        media
            .gallery
            .iter()
            .enumerate()
            .map(|(i, url)| ImageRef {
                url: url.clone(),
                caption: captions.get(i).cloned(),
            })
            .collect()
    }

    /// Gallery images for a submission: existing ones first, then uploads.
    pub fn gallery_images(&self, media: &UploadedMedia, existing: &[ImageRef]) -> Vec<ImageRef> {
        let mut images = existing.to_vec();
        images.extend(self.gallery(media));
        images
    }

    pub fn recipe_draft(&self, media: &UploadedMedia, existing: Option<&Recipe>) -> RecipeDraft {
        RecipeDraft {
            name: self.required("name"),
            baure_name: self.required("baureName"),
            description: self.text("description"),
            ingredients: self.list("ingredients", ListStyle::Lines),
            preparation: self.text("preparation"),
            utensils: self.list("utensils", ListStyle::Tags),
            consumption: self.text("consumption"),
            conservation: self.text("conservation"),
            source_person: self.text("sourcePerson"),
            tags: self.list("tags", ListStyle::Tags),
            image_url: media
                .main_image
                .clone()
                .or_else(|| self.text("imageUrl"))
                .or_else(|| existing.and_then(|r| r.image_url.clone())),
            images: self.gallery_images(
                media,
                existing.map(|r| r.images.as_slice()).unwrap_or_default(),
            ),
        }
    }

    pub fn life_story_draft(
        &self,
        media: &UploadedMedia,
        existing: Option<&LifeStory>,
    ) -> Result<LifeStoryDraft, ArchiveError> {
        let age = match self.text("age") {
            Some(raw) => Some(raw.parse::<u32>().map_err(|_| {
                ArchiveError::Validation(format!("Edad inválida: '{raw}'"))
            })?),
            None => None,
        };
        let recorded_date = match self.text("recordedDate") {
            Some(raw) => Some(parse_date(&raw)?),
            None => None,
        };

        Ok(LifeStoryDraft {
            title: self.required("title"),
            person_name: self.required("personName"),
            age,
            community: self.text("community"),
            story: self.required("story"),
            related_themes: self.list("relatedThemes", ListStyle::Tags),
            photo_url: media
                .main_image
                .clone()
                .or_else(|| self.text("photoUrl"))
                .or_else(|| existing.and_then(|s| s.photo_url.clone())),
            recorded_date,
            recorded_by: self.text("recordedBy"),
            images: self.gallery_images(
                media,
                existing.map(|s| s.images.as_slice()).unwrap_or_default(),
            ),
        })
    }

    pub fn cultural_data_draft(
        &self,
        media: &UploadedMedia,
        existing: Option<&CulturalData>,
    ) -> Result<CulturalDataDraft, ArchiveError> {
        let category: CulturalCategory = self
            .text("category")
            .ok_or_else(|| ArchiveError::Validation("La categoría es obligatoria".to_string()))?
            .parse()
            .map_err(ArchiveError::Validation)?;

        let subsections = match self.text("subsections") {
            Some(raw) => serde_json::from_str::<Vec<Subsection>>(&raw).map_err(|e| {
                ArchiveError::Validation(format!("Subsecciones inválidas: {e}"))
            })?,
            None => Vec::new(),
        };

        // This collection has no cover image; a main upload joins the gallery.
        let mut images = existing.map(|d| d.images.clone()).unwrap_or_default();
        if let Some(url) = &media.main_image {
            images.push(ImageRef {
                url: url.clone(),
                caption: None,
            });
        }
        images.extend(self.gallery(media));

        Ok(CulturalDataDraft {
            title: self.required("title"),
            category,
            content: self.required("content"),
            subsections,
            images,
            sources: self.list("sources", ListStyle::Tags),
            related_topics: self.list("relatedTopics", ListStyle::Tags),
        })
    }
}

/// Accepts `YYYY-MM-DD`, optionally followed by a time part.
fn parse_date(raw: &str) -> Result<NaiveDate, ArchiveError> {
    let date_part = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map_err(|_| ArchiveError::Validation(format!("Fecha inválida: '{raw}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(pairs: &[(&str, &str)]) -> FormFields {
        let mut f = FormFields::new();
        for (k, v) in pairs {
            f.push(*k, *v);
        }
        f
    }

    #[test]
    fn test_parse_list_json_array() {
        let out = parse_list(&[r#"[" yuca ", "", "queso"]"#], ListStyle::Lines);
        assert_eq!(out, vec!["yuca", "queso"]);
    }

    #[test]
    fn test_parse_list_newlines() {
        let out = parse_list(&["yuca\r\n\n queso rallado \n"], ListStyle::Lines);
        assert_eq!(out, vec!["yuca", "queso rallado"]);
    }

    #[test]
    fn test_parse_list_lines_keep_commas() {
        let out = parse_list(&["2 tazas de harina, tamizada"], ListStyle::Lines);
        assert_eq!(out, vec!["2 tazas de harina, tamizada"]);
    }

    #[test]
    fn test_parse_list_tags_split_commas() {
        let out = parse_list(&["Río, Pescado,,\nFiesta"], ListStyle::Tags);
        assert_eq!(out, vec!["Río", "Pescado", "Fiesta"]);
    }

    #[test]
    fn test_parse_list_repeated_fields() {
        let f = form(&[("tags", "Río"), ("tags", " Pesca "), ("tags", "")]);
        assert_eq!(f.list("tags", ListStyle::Tags), vec!["Río", "Pesca"]);
    }

    #[test]
    fn test_parse_list_malformed_json_falls_back_to_text() {
        let out = parse_list(&["[yuca"], ListStyle::Lines);
        assert_eq!(out, vec!["[yuca"]);
    }

    #[test]
    fn test_text_takes_last_non_blank() {
        let f = form(&[("name", "Uno"), ("name", "Dos"), ("name", "  ")]);
        assert_eq!(f.text("name").as_deref(), Some("Dos"));
        assert_eq!(f.text("missing"), None);
    }

    #[test]
    fn test_recipe_draft_from_form() {
        let f = form(&[
            ("name", "Masaco de yuca"),
            ("baureName", "Kiwori"),
            ("ingredients", "yuca\nqueso"),
            ("utensils", "olla, tacú"),
            ("tags", r#"["Tradicional"]"#),
            ("description", "   "),
        ]);
        let media = UploadedMedia {
            main_image: Some("http://h/uploads/main.png".to_string()),
            gallery: vec!["http://h/uploads/g1.png".to_string()],
        };
        let draft = f.recipe_draft(&media, None);
        assert_eq!(draft.name, "Masaco de yuca");
        assert_eq!(draft.ingredients, vec!["yuca", "queso"]);
        assert_eq!(draft.utensils, vec!["olla", "tacú"]);
        assert_eq!(draft.tags, vec!["Tradicional"]);
        assert_eq!(draft.description, None);
        assert_eq!(draft.image_url.as_deref(), Some("http://h/uploads/main.png"));
        assert_eq!(draft.images.len(), 1);
        assert_eq!(draft.images[0].caption, None);
    }

    #[test]
    fn test_recipe_draft_keeps_existing_media() {
        let existing = existing_recipe();
        let f = form(&[("name", "Otro nombre"), ("captions", "Plato servido")]);
        let media = UploadedMedia {
            main_image: None,
            gallery: vec!["http://h/uploads/new.png".to_string()],
        };
        let draft = f.recipe_draft(&media, Some(&existing));
        assert_eq!(draft.image_url, existing.image_url);
        assert_eq!(draft.images.len(), 2);
        assert_eq!(draft.images[0], existing.images[0]);
        assert_eq!(draft.images[1].caption.as_deref(), Some("Plato servido"));
    }

    #[test]
    fn test_life_story_draft_parses_age_and_date() {
        let f = form(&[
            ("title", "Mi vida en el río"),
            ("personName", "Ana Guaji"),
            ("story", "Nací en Baures."),
            ("age", "78"),
            ("recordedDate", "2021-05-04T00:00:00.000Z"),
            ("relatedThemes", "Río, Pesca"),
        ]);
        let draft = f.life_story_draft(&UploadedMedia::default(), None).unwrap();
        assert_eq!(draft.age, Some(78));
        assert_eq!(draft.recorded_date, NaiveDate::from_ymd_opt(2021, 5, 4));
        assert_eq!(draft.related_themes, vec!["Río", "Pesca"]);
    }

    #[test]
    fn test_life_story_draft_rejects_bad_age() {
        let f = form(&[("title", "t"), ("personName", "p"), ("story", "s"), ("age", "setenta")]);
        let err = f.life_story_draft(&UploadedMedia::default(), None).unwrap_err();
        assert!(matches!(err, ArchiveError::Validation(ref m) if m.contains("setenta")));
    }

    #[test]
    fn test_cultural_data_draft() {
        let f = form(&[
            ("title", "Lengua baure"),
            ("category", "Lengua"),
            ("content", "El baure es una lengua arawak."),
            ("subsections", r#"[{"subtitle": "Fonología", "text": "..."}]"#),
            ("sources", "Danielsen 2007"),
        ]);
        let media = UploadedMedia {
            main_image: Some("http://h/uploads/a.png".to_string()),
            gallery: vec![],
        };
        let draft = f.cultural_data_draft(&media, None).unwrap();
        assert_eq!(draft.category, CulturalCategory::Lengua);
        assert_eq!(draft.subsections[0].subtitle, "Fonología");
        assert_eq!(draft.images.len(), 1);
        assert_eq!(draft.sources, vec!["Danielsen 2007"]);
    }

    #[test]
    fn test_cultural_data_draft_requires_valid_category() {
        let missing = form(&[("title", "t"), ("content", "c")]);
        assert!(missing.cultural_data_draft(&UploadedMedia::default(), None).is_err());

        let invalid = form(&[("title", "t"), ("content", "c"), ("category", "Deportes")]);
        let err = invalid
            .cultural_data_draft(&UploadedMedia::default(), None)
            .unwrap_err();
        assert!(err.to_string().contains("categoría inválida"));
    }

    fn existing_recipe() -> Recipe {
        use crate::archive::entry::ArchiveEntry;
        Recipe::create(
            uuid::Uuid::now_v7(),
            RecipeDraft {
                name: "Masaco".to_string(),
                image_url: Some("http://h/uploads/old.png".to_string()),
                images: vec![ImageRef {
                    url: "http://h/uploads/old-g.png".to_string(),
                    caption: None,
                }],
                ..Default::default()
            },
            chrono::Utc::now(),
        )
    }
}
