use thiserror::Error;

use crate::llm::LlmError;

/// Errors produced by a single chat turn.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("no question provided")]
    MissingQuestion,

    #[error("generation backend API key is not configured")]
    MissingCredential,

    #[error(transparent)]
    Backend(#[from] LlmError),
}

impl ChatError {
    /// The sanitized message shown to the archive's visitors.
    ///
    /// The original backend error text never crosses the HTTP boundary.
    pub fn user_message(&self) -> &'static str {
        match self {
            ChatError::MissingQuestion => "No se proporcionó una pregunta.",
            ChatError::MissingCredential => {
                "API Key de Google Gemini no configurado en el servidor."
            }
            ChatError::Backend(LlmError::RateLimited) => {
                "El servicio de IA está sobrecargado. Por favor, intenta de nuevo en unos momentos."
            }
            ChatError::Backend(LlmError::Unauthorized) => {
                "Token de autenticación inválido. Verifica la configuración del servidor."
            }
            ChatError::Backend(LlmError::ModelUnavailable(_)) => {
                "El modelo de IA no está disponible actualmente. Contacta al administrador."
            }
            ChatError::Backend(LlmError::Unknown(_)) => "Error al procesar la solicitud de IA.",
        }
    }
}

/// Errors from repository operations (used by trait definitions in baure-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors from archive operations (recipes, life stories, cultural data).
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// Carries the user-facing "not found" message for the collection.
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),
}

/// Errors from image uploads.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Formato no permitido: {0}")]
    UnsupportedType(String),

    #[error("El archivo excede el tamaño máximo de {max_bytes} bytes")]
    TooLarge { max_bytes: usize },

    #[error("upload storage error: {0}")]
    Io(String),
}
