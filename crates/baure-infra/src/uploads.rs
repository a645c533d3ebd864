//! Image storage on local disk under `{data_dir}/uploads/`.

use std::path::{Path, PathBuf};

use baure_types::config::UploadConfig;
use baure_types::error::UploadError;
use uuid::Uuid;

/// Validates and stores uploaded images with generated file names.
#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
    max_bytes: usize,
    allowed_mime_types: Vec<String>,
}

impl ImageStore {
    pub fn new(dir: PathBuf, config: &UploadConfig) -> Self {
        Self {
            dir,
            max_bytes: config.max_bytes,
            allowed_mime_types: config
                .allowed_mime_types
                .iter()
                .map(|m| m.trim().to_ascii_lowercase())
                .collect(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Check type and size, returning the file extension to store under.
    pub fn check(&self, content_type: Option<&str>, len: usize) -> Result<String, UploadError> {
        let mime = content_type
            .map(|c| c.split(';').next().unwrap_or(c).trim().to_ascii_lowercase())
            .unwrap_or_default();

        if !self.allowed_mime_types.iter().any(|m| *m == mime) {
            let shown = if mime.is_empty() { "desconocido".to_string() } else { mime };
            return Err(UploadError::UnsupportedType(shown));
        }
        if len > self.max_bytes {
            return Err(UploadError::TooLarge {
                max_bytes: self.max_bytes,
            });
        }
        Ok(extension_for(&mime))
    }

    /// Store an image and return its generated file name.
    pub async fn save(&self, content_type: Option<&str>, bytes: &[u8]) -> Result<String, UploadError> {
        let ext = self.check(content_type, bytes.len())?;
        let file_name = format!("{}.{ext}", Uuid::now_v7());

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| UploadError::Io(e.to_string()))?;
        tokio::fs::write(self.dir.join(&file_name), bytes)
            .await
            .map_err(|e| UploadError::Io(e.to_string()))?;

        tracing::debug!(file = %file_name, bytes = bytes.len(), "image stored");
        Ok(file_name)
    }

    /// Delete a stored image. A file that is already gone is not an error.
    pub async fn remove(&self, file_name: &str) -> Result<(), UploadError> {
        // Only bare names produced by `save` live in the store
        if file_name.contains(['/', '\\']) || file_name.starts_with('.') {
            return Err(UploadError::Io(format!("invalid file name: {file_name}")));
        }
        match tokio::fs::remove_file(self.dir.join(file_name)).await {
            Ok(()) => {
                tracing::debug!(file = %file_name, "image removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(UploadError::Io(e.to_string())),
        }
    }
}

fn extension_for(mime: &str) -> String {
    match mime {
        "image/jpeg" | "image/jpg" => "jpg".to_string(),
        other => other
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty())
            .unwrap_or("bin")
            .to_string(),
    }
}

/// Public URL of a stored file, e.g. `http://localhost:5000/uploads/{file}`.
pub fn public_url(base_url: &str, file_name: &str) -> String {
    format!("{}/uploads/{file_name}", base_url.trim_end_matches('/'))
}
