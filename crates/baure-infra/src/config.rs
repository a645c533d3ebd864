//! Configuration loader.
//!
//! Reads `config.toml` from the data directory into [`AppConfig`], then
//! applies environment overrides. Falls back to defaults when the file is
//! missing or malformed; loading never fails.

use std::path::{Path, PathBuf};

use baure_types::config::{AppConfig, DEFAULT_TRIGGER_PHRASES};
use secrecy::SecretString;

use crate::filesystem;

/// Everything the binary needs to assemble the service.
#[derive(Debug)]
pub struct Settings {
    pub config: AppConfig,
    pub data_dir: PathBuf,
    /// Generation backend credential (`GEMINI_API_KEY`). `None` disables chat.
    pub api_key: Option<SecretString>,
    pub context_path: PathBuf,
    /// Built single-page app to serve as fallback, if any.
    pub web_dir: Option<PathBuf>,
}

impl Settings {
    pub fn database_url(&self) -> String {
        filesystem::database_url(&self.data_dir)
    }

    pub fn uploads_dir(&self) -> PathBuf {
        filesystem::uploads_dir(&self.data_dir)
    }
}

/// Load `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`AppConfig::default()`].
/// - If the file exists but fails to read or parse, logs a warning and
///   returns the default.
pub async fn load_config_file(data_dir: &Path) -> AppConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return AppConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return AppConfig::default();
        }
    };

    match toml::from_str::<AppConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            AppConfig::default()
        }
    }
}

/// Apply environment variables on top of the file configuration.
pub fn apply_env_overrides(config: &mut AppConfig, lookup: &impl Fn(&str) -> Option<String>) {
    if let Some(password) = lookup("ADMIN_PASSWORD") {
        config.admin.password = password;
    }
    if let Some(host) = lookup("HOST") {
        config.server.host = host;
    }
    if let Some(port) = lookup("PORT") {
        match port.trim().parse::<u16>() {
            Ok(port) => config.server.port = port,
            Err(_) => tracing::warn!("Ignoring invalid PORT value '{port}'"),
        }
    }
    if let Some(model) = lookup("BAURE_MODEL") {
        config.llm.model = model;
    }
}

/// Restore the default trigger phrases if the configured set has none.
pub fn sanitize(config: &mut AppConfig) {
    if config.chat.trigger_phrases.iter().all(|p| p.trim().is_empty()) {
        tracing::warn!("chat.trigger_phrases is empty, falling back to the default phrases");
        config.chat.trigger_phrases = DEFAULT_TRIGGER_PHRASES.iter().map(|p| p.to_string()).collect();
    }
}

/// Resolve the full [`Settings`] from the process environment.
pub async fn load_settings() -> Settings {
    let lookup = env_lookup;
    let data_dir = filesystem::resolve_data_dir_with(lookup);
    load_settings_with(data_dir, lookup).await
}

/// [`load_settings`] for an explicit data directory and environment.
pub async fn load_settings_with(
    data_dir: PathBuf,
    lookup: impl Fn(&str) -> Option<String>,
) -> Settings {
    let mut config = load_config_file(&data_dir).await;
    apply_env_overrides(&mut config, &lookup);
    sanitize(&mut config);

    let api_key = lookup("GEMINI_API_KEY").map(SecretString::from);
    let context_path = lookup("BAURE_CONTEXT_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|| filesystem::default_context_path(&data_dir));
    let web_dir = lookup("BAURE_WEB_DIR").map(PathBuf::from);

    Settings {
        config,
        data_dir,
        api_key,
        context_path,
        web_dir,
    }
}

/// Process environment lookup treating blank values as unset.
pub fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
