//! Axum router configuration with middleware.
//!
//! JSON routes live under `/api/`. Uploaded images are served from
//! `/uploads/`. When a built frontend directory is configured and exists,
//! unknown paths fall through to its `index.html` for client-side routing.

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, patch, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Gallery uploads allowed in one submission, plus the main image.
const MAX_FILES_PER_REQUEST: usize = 11;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let body_limit = state.images.max_bytes().saturating_mul(MAX_FILES_PER_REQUEST);
    let uploads = ServeDir::new(state.images.dir());
    let web_dir = state.web_dir.clone();

    let api_routes = Router::new()
        // Chat
        .route("/chat", post(handlers::chat::chat))
        // Admin
        .route("/admin/validate", post(handlers::admin::validate))
        // Recipes
        .route(
            "/recipes",
            get(handlers::recipe::list_recipes).post(handlers::recipe::create_recipe),
        )
        .route(
            "/recipes/{id}",
            get(handlers::recipe::get_recipe)
                .put(handlers::recipe::update_recipe)
                .delete(handlers::recipe::delete_recipe),
        )
        // Life stories
        .route(
            "/life-stories",
            get(handlers::life_story::list_life_stories)
                .post(handlers::life_story::create_life_story),
        )
        .route(
            "/life-stories/{id}",
            get(handlers::life_story::get_life_story)
                .put(handlers::life_story::update_life_story)
                .delete(handlers::life_story::delete_life_story),
        )
        .route(
            "/life-stories/{id}/images",
            patch(handlers::life_story::add_life_story_images),
        )
        // Cultural data
        .route(
            "/cultural-data",
            get(handlers::cultural_data::list_cultural_data)
                .post(handlers::cultural_data::create_cultural_data),
        )
        .route(
            "/cultural-data/category/{category}",
            get(handlers::cultural_data::list_by_category),
        )
        .route(
            "/cultural-data/{id}",
            get(handlers::cultural_data::get_cultural_data)
                .put(handlers::cultural_data::update_cultural_data)
                .delete(handlers::cultural_data::delete_cultural_data),
        )
        .layer(DefaultBodyLimit::max(body_limit));

    let mut router = Router::new()
        .nest("/api", api_routes)
        .route("/health", get(health_check))
        .nest_service("/uploads", uploads)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if let Some(web_dir) = web_dir.filter(|d| d.is_dir()) {
        let index_path = web_dir.join("index.html");
        let serve_dir = ServeDir::new(&web_dir).fallback(ServeFile::new(index_path));
        router = router.fallback_service(serve_dir);
        tracing::info!(path = %web_dir.display(), "SPA static file serving enabled");
    }

    router
}

/// GET /health - Liveness check with chat readiness.
async fn health_check(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "chat": state.chat_service.has_provider(),
        "contextLoaded": state.chat_service.context().is_loaded(),
    }))
}
