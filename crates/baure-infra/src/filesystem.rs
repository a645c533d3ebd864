//! Data directory layout.
//!
//! ```text
//! {data_dir}/
//!   config.toml
//!   baure.db
//!   context/baure-context.txt
//!   uploads/
//! ```

use std::path::{Path, PathBuf};

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `BAURE_DATA_DIR` environment variable
/// 2. `~/.baure`
/// 3. `./.baure`
pub fn resolve_data_dir() -> PathBuf {
    resolve_data_dir_with(|key| std::env::var(key).ok())
}

/// [`resolve_data_dir`] with an injectable environment lookup.
pub fn resolve_data_dir_with(lookup: impl Fn(&str) -> Option<String>) -> PathBuf {
    if let Some(dir) = lookup("BAURE_DATA_DIR").filter(|d| !d.trim().is_empty()) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".baure");
    }

    PathBuf::from(".baure")
}

pub fn database_path(data_dir: &Path) -> PathBuf {
    data_dir.join("baure.db")
}

/// SQLite URL for the archive database, created on first open.
pub fn database_url(data_dir: &Path) -> String {
    format!("sqlite://{}?mode=rwc", database_path(data_dir).display())
}

pub fn uploads_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("uploads")
}

pub fn default_context_path(data_dir: &Path) -> PathBuf {
    data_dir.join("context").join("baure-context.txt")
}

/// Create the data directory and its `uploads/` subdirectory.
pub async fn ensure_layout(data_dir: &Path) -> Result<(), std::io::Error> {
    tokio::fs::create_dir_all(uploads_dir(data_dir)).await
}
