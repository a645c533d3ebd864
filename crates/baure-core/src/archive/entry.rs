//! Per-collection behavior shared by the archive service.

use baure_types::archive::{
    CulturalData, CulturalDataDraft, ImageRef, LifeStory, LifeStoryDraft, Recipe, RecipeDraft,
};
use baure_types::error::ArchiveError;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A stored archive record built from, and revised by, its draft type.
pub trait ArchiveEntry: Clone + Send + Sync + 'static {
    type Draft: Send + Sync;

    /// Collection name used in logs.
    const COLLECTION: &'static str;

    /// User-facing message for a missing (or soft-deleted) record.
    const NOT_FOUND: &'static str;

    fn id(&self) -> Uuid;

    /// Reject drafts with blank required fields.
    fn validate(draft: &Self::Draft) -> Result<(), ArchiveError>;

    /// Build a new live record.
    fn create(id: Uuid, draft: Self::Draft, now: DateTime<Utc>) -> Self;

    /// Replace the editable fields, keeping identity and creation time.
    fn revise(&mut self, draft: Self::Draft, now: DateTime<Utc>);

    fn images_mut(&mut self) -> &mut Vec<ImageRef>;

    fn touch(&mut self, now: DateTime<Utc>);
}

fn require(value: &str, message: &str) -> Result<(), ArchiveError> {
    if value.trim().is_empty() {
        return Err(ArchiveError::Validation(message.to_string()));
    }
    Ok(())
}

impl ArchiveEntry for Recipe {
    type Draft = RecipeDraft;
    const COLLECTION: &'static str = "recipes";
    const NOT_FOUND: &'static str = "Receta no encontrada";

    fn id(&self) -> Uuid {
        self.id
    }

    fn validate(draft: &RecipeDraft) -> Result<(), ArchiveError> {
        require(&draft.name, "El nombre de la receta es obligatorio")
    }

    fn create(id: Uuid, draft: RecipeDraft, now: DateTime<Utc>) -> Self {
        let mut recipe = Recipe {
            id,
            name: String::new(),
            baure_name: String::new(),
            description: None,
            ingredients: Vec::new(),
            preparation: None,
            utensils: Vec::new(),
            consumption: None,
            conservation: None,
            source_person: None,
            tags: Vec::new(),
            image_url: None,
            images: Vec::new(),
            deleted: false,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        };
        recipe.revise(draft, now);
        recipe
    }

    fn revise(&mut self, draft: RecipeDraft, now: DateTime<Utc>) {
        self.name = draft.name.trim().to_string();
        self.baure_name = draft.baure_name.trim().to_string();
        self.description = draft.description;
        self.ingredients = draft.ingredients;
        self.preparation = draft.preparation;
        self.utensils = draft.utensils;
        self.consumption = draft.consumption;
        self.conservation = draft.conservation;
        self.source_person = draft.source_person;
        self.tags = draft.tags;
        self.image_url = draft.image_url;
        self.images = draft.images;
        self.updated_at = now;
    }

    fn images_mut(&mut self) -> &mut Vec<ImageRef> {
        &mut self.images
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

impl ArchiveEntry for LifeStory {
    type Draft = LifeStoryDraft;
    const COLLECTION: &'static str = "life_stories";
    const NOT_FOUND: &'static str = "Recuento no encontrado";

    fn id(&self) -> Uuid {
        self.id
    }

    fn validate(draft: &LifeStoryDraft) -> Result<(), ArchiveError> {
        require(&draft.title, "El título es obligatorio")?;
        require(&draft.person_name, "El nombre de la persona es obligatorio")?;
        require(&draft.story, "El relato es obligatorio")
    }

    fn create(id: Uuid, draft: LifeStoryDraft, now: DateTime<Utc>) -> Self {
        let mut story = LifeStory {
            id,
            title: String::new(),
            person_name: String::new(),
            age: None,
            community: None,
            story: String::new(),
            related_themes: Vec::new(),
            photo_url: None,
            recorded_date: None,
            recorded_by: None,
            images: Vec::new(),
            deleted: false,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        };
        story.revise(draft, now);
        story
    }

    fn revise(&mut self, draft: LifeStoryDraft, now: DateTime<Utc>) {
        self.title = draft.title.trim().to_string();
        self.person_name = draft.person_name.trim().to_string();
        self.age = draft.age;
        self.community = draft.community;
        self.story = draft.story;
        self.related_themes = draft.related_themes;
        self.photo_url = draft.photo_url;
        self.recorded_date = draft.recorded_date;
        self.recorded_by = draft.recorded_by;
        self.images = draft.images;
        self.updated_at = now;
    }

    fn images_mut(&mut self) -> &mut Vec<ImageRef> {
        &mut self.images
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

impl ArchiveEntry for CulturalData {
    type Draft = CulturalDataDraft;
    const COLLECTION: &'static str = "cultural_data";
    const NOT_FOUND: &'static str = "Dato cultural no encontrado";

    fn id(&self) -> Uuid {
        self.id
    }

    fn validate(draft: &CulturalDataDraft) -> Result<(), ArchiveError> {
        require(&draft.title, "El título es obligatorio")?;
        require(&draft.content, "El contenido es obligatorio")
    }

    fn create(id: Uuid, draft: CulturalDataDraft, now: DateTime<Utc>) -> Self {
        CulturalData {
            id,
            title: draft.title.trim().to_string(),
            category: draft.category,
            content: draft.content,
            subsections: draft.subsections,
            images: draft.images,
            sources: draft.sources,
            related_topics: draft.related_topics,
            deleted: false,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn revise(&mut self, draft: CulturalDataDraft, now: DateTime<Utc>) {
        self.title = draft.title.trim().to_string();
        self.category = draft.category;
        self.content = draft.content;
        self.subsections = draft.subsections;
        self.images = draft.images;
        self.sources = draft.sources;
        self.related_topics = draft.related_topics;
        self.updated_at = now;
    }

    fn images_mut(&mut self) -> &mut Vec<ImageRef> {
        &mut self.images
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}
