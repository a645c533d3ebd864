//! The cultural-context document shared by every chat turn.

use std::fmt;
use std::sync::Arc;

/// Text substituted when the context file cannot be read at startup.
pub const CONTEXT_UNAVAILABLE: &str = "Contexto no disponible";

/// Read-only reference text, loaded once at boot and cloned cheaply into
/// request handlers.
#[derive(Clone, PartialEq, Eq)]
pub struct CulturalContext {
    text: Arc<str>,
    loaded: bool,
}

impl CulturalContext {
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        Self {
            text: text.into(),
            loaded: true,
        }
    }

    /// The fallback used when the source document is missing.
    pub fn unavailable() -> Self {
        Self {
            text: Arc::from(CONTEXT_UNAVAILABLE),
            loaded: false,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Whether this holds the real document rather than the placeholder.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

// The document can be tens of kilobytes; keep debug output short.
impl fmt::Debug for CulturalContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CulturalContext")
            .field("chars", &self.char_count())
            .field("loaded", &self.loaded)
            .finish()
    }
}
