//! Cultural-context document loader.

use std::path::Path;

use baure_core::chat::context::CulturalContext;

/// Read the cultural-context document once at startup.
///
/// A missing, unreadable, or empty file yields the placeholder context
/// instead of failing startup.
pub async fn load_cultural_context(path: &Path) -> CulturalContext {
    match tokio::fs::read_to_string(path).await {
        Ok(text) if !text.trim().is_empty() => {
            let context = CulturalContext::new(text);
            tracing::info!(
                path = %path.display(),
                chars = context.char_count(),
                "cultural context loaded"
            );
            context
        }
        Ok(_) => {
            tracing::warn!(path = %path.display(), "cultural context file is empty, using placeholder");
            CulturalContext::unavailable()
        }
        Err(err) => {
            tracing::warn!(
                path = %path.display(),
                error = %err,
                "cultural context unavailable, using placeholder"
            );
            CulturalContext::unavailable()
        }
    }
}
