//! Configuration types for the archive service.
//!
//! `AppConfig` represents `config.toml` in the data directory. Every field
//! has a default so an empty (or missing) file yields a working service.

use serde::{Deserialize, Serialize};

use crate::llm::ProviderType;

/// Phrases whose presence in a question escalates it to the web-search
/// template. Matched case-insensitively as substrings.
pub const DEFAULT_TRIGGER_PHRASES: &[&str] = &[
    "vegana",
    "vegano",
    "vegetariana",
    "vegetariano",
    "proteína",
    "proteinas",
    "más proteína",
    "añadir proteína",
    "alternativa",
    "sustituto",
    "reemplazar",
    "cambiar por",
    "sin carne",
    "sin lácteos",
    "sin gluten",
    "fitness",
    "saludable",
    "light",
    "bajo en calorías",
    "nutritivo",
    "nutrición",
    "vitaminas",
    "moderno",
    "contemporáneo",
    "fusión",
    "internacional",
    "tendencia",
    "actual",
];

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub admin: AdminConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub uploads: UploadConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    #[serde(default = "default_admin_password")]
    pub password: String,
}

fn default_admin_password() -> String {
    "admin123".to_string()
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            password: default_admin_password(),
        }
    }
}

// Hand-written so the password never lands in logs.
impl std::fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConfig")
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Knobs of the chat subsystem: classification, prompt bounds, and the
/// post-processing contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    #[serde(default = "default_trigger_phrases")]
    pub trigger_phrases: Vec<String>,

    /// Cultural-context excerpt length for the local template (chars).
    #[serde(default = "default_local_context_chars")]
    pub local_context_chars: usize,

    /// Cultural-context excerpt length for the web-search template (chars).
    #[serde(default = "default_web_context_chars")]
    pub web_context_chars: usize,

    /// Answer length requested in the local prompt. Advisory only.
    #[serde(default = "default_local_soft_cap")]
    pub local_soft_cap: usize,

    /// Answer length requested in the web-search prompt. Advisory only.
    #[serde(default = "default_web_soft_cap")]
    pub web_soft_cap: usize,

    /// Enforced answer length for local answers (chars).
    #[serde(default = "default_hard_cap")]
    pub local_hard_cap: usize,

    /// Enforced answer length for web-search answers (chars).
    #[serde(default = "default_hard_cap")]
    pub web_hard_cap: usize,

    /// Earliest sentence boundary accepted when truncating, as a fraction of the cap.
    #[serde(default = "default_min_cut_ratio")]
    pub min_cut_ratio: f64,

    #[serde(default = "default_web_search_annotation")]
    pub web_search_annotation: String,

    #[serde(default = "default_normalize_markdown")]
    pub normalize_markdown: bool,
}

fn default_trigger_phrases() -> Vec<String> {
    DEFAULT_TRIGGER_PHRASES.iter().map(|p| p.to_string()).collect()
}

fn default_local_context_chars() -> usize {
    3000
}

fn default_web_context_chars() -> usize {
    2000
}

fn default_local_soft_cap() -> usize {
    500
}

fn default_web_soft_cap() -> usize {
    600
}

fn default_hard_cap() -> usize {
    2000
}

fn default_min_cut_ratio() -> f64 {
    0.75
}

fn default_web_search_annotation() -> String {
    "*Búsqueda web activada*".to_string()
}

fn default_normalize_markdown() -> bool {
    true
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            trigger_phrases: default_trigger_phrases(),
            local_context_chars: default_local_context_chars(),
            web_context_chars: default_web_context_chars(),
            local_soft_cap: default_local_soft_cap(),
            web_soft_cap: default_web_soft_cap(),
            local_hard_cap: default_hard_cap(),
            web_hard_cap: default_hard_cap(),
            min_cut_ratio: default_min_cut_ratio(),
            web_search_annotation: default_web_search_annotation(),
            normalize_markdown: default_normalize_markdown(),
        }
    }
}

/// Generation backend selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub provider: ProviderType,
    #[serde(default = "default_model")]
    pub model: String,
    /// Override the provider's default base URL.
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_temperature() -> f64 {
    0.7
}

fn default_timeout_secs() -> u64 {
    120
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: ProviderType::default(),
            model: default_model(),
            base_url: None,
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Image upload limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,
    #[serde(default = "default_allowed_mime_types")]
    pub allowed_mime_types: Vec<String>,
}

fn default_max_bytes() -> usize {
    5 * 1024 * 1024
}

fn default_allowed_mime_types() -> Vec<String> {
    ["image/jpeg", "image/png", "image/jpg", "image/webp"]
        .iter()
        .map(|m| m.to_string())
        .collect()
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_bytes: default_max_bytes(),
            allowed_mime_types: default_allowed_mime_types(),
        }
    }
}
