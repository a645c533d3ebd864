//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both the CLI and
//! the REST API. Archive services are generic over repository traits;
//! AppState pins them to the SQLite implementations.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use baure_core::archive::service::ArchiveService;
use baure_core::chat::service::ChatService;
use baure_core::llm::box_provider::BoxLlmProvider;
use baure_infra::config::Settings;
use baure_infra::context::load_cultural_context;
use baure_infra::filesystem::ensure_layout;
use baure_infra::llm::create_provider;
use baure_infra::sqlite::cultural_data::SqliteCulturalDataRepository;
use baure_infra::sqlite::life_story::SqliteLifeStoryRepository;
use baure_infra::sqlite::pool::DatabasePool;
use baure_infra::sqlite::recipe::SqliteRecipeRepository;
use baure_infra::uploads::ImageStore;
use baure_types::archive::{CulturalData, LifeStory, Recipe};
use baure_types::config::AppConfig;

use crate::http::extractors::admin::AdminKey;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type RecipeService = ArchiveService<Recipe, SqliteRecipeRepository>;
pub type LifeStoryService = ArchiveService<LifeStory, SqliteLifeStoryRepository>;
pub type CulturalDataService = ArchiveService<CulturalData, SqliteCulturalDataRepository>;

/// Shared application state holding all services.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ChatService>,
    pub recipes: Arc<RecipeService>,
    pub life_stories: Arc<LifeStoryService>,
    pub cultural_data: Arc<CulturalDataService>,
    pub images: Arc<ImageStore>,
    pub admin_key: Arc<AdminKey>,
    pub config: Arc<AppConfig>,
    pub web_dir: Option<PathBuf>,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Initialize from settings, building the generation backend from the
    /// configured credential. Without one, chat turns fail with a
    /// configuration error but the archive is fully served.
    pub async fn init(settings: Settings) -> anyhow::Result<Self> {
        let provider = match settings.api_key.clone() {
            Some(key) => Some(
                create_provider(&settings.config.llm, key)
                    .context("failed to create generation backend")?,
            ),
            None => {
                tracing::warn!("GEMINI_API_KEY is not set, chat turns will be rejected");
                None
            }
        };
        Self::build(settings, provider).await
    }

    /// Wire every service around an explicit provider.
    pub async fn build(settings: Settings, provider: Option<BoxLlmProvider>) -> anyhow::Result<Self> {
        ensure_layout(&settings.data_dir)
            .await
            .with_context(|| format!("failed to create {}", settings.data_dir.display()))?;

        let db_pool = DatabasePool::new(&settings.database_url())
            .await
            .context("failed to open the archive database")?;

        let context = load_cultural_context(&settings.context_path).await;
        let chat_service = ChatService::new(
            &settings.config.chat,
            &settings.config.llm,
            context,
            provider,
        )?;
        if let Some(name) = chat_service.provider_name() {
            tracing::info!(provider = name, model = %settings.config.llm.model, "generation backend ready");
        }

        let images = ImageStore::new(settings.uploads_dir(), &settings.config.uploads);
        let admin_key = AdminKey::new(&settings.config.admin.password);

        Ok(Self {
            chat_service: Arc::new(chat_service),
            recipes: Arc::new(ArchiveService::new(SqliteRecipeRepository::new(db_pool.clone()))),
            life_stories: Arc::new(ArchiveService::new(SqliteLifeStoryRepository::new(
                db_pool.clone(),
            ))),
            cultural_data: Arc::new(ArchiveService::new(SqliteCulturalDataRepository::new(
                db_pool,
            ))),
            images: Arc::new(images),
            admin_key: Arc::new(admin_key),
            config: Arc::new(settings.config),
            web_dir: settings.web_dir,
            data_dir: settings.data_dir,
        })
    }
}
