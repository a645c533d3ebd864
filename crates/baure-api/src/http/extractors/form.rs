//! Multipart archive form extractor.
//!
//! Collects text fields into [`FormFields`] and stores the `image` (main)
//! and `images` (gallery) file fields through the [`ImageStore`], yielding
//! their public URLs in [`UploadedMedia`].
//!
//! [`ImageStore`]: baure_infra::uploads::ImageStore

use axum::extract::multipart::MultipartError;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::{HeaderMap, StatusCode};

use baure_core::archive::form::{FormFields, UploadedMedia};
use baure_infra::uploads::{ImageStore, public_url};
use baure_types::error::UploadError;

use crate::http::error::AppError;
use crate::state::AppState;

pub const IMAGE_FIELD: &str = "image";
pub const GALLERY_FIELD: &str = "images";

/// A parsed `multipart/form-data` submission with its images already stored.
///
/// Images are written as their parts arrive. If the request fails later,
/// while reading the body or when the draft is rejected, the handler hands
/// its result to [`ArchiveForm::settle`] so the orphaned files are deleted.
pub struct ArchiveForm {
    pub fields: FormFields,
    pub media: UploadedMedia,
    stored: Vec<String>,
}

impl FromRequest<AppState> for ArchiveForm {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let fallback_host = format!("localhost:{}", state.config.server.port);
        let base_url = base_url(req.headers(), &fallback_host);

        let multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;

        let mut form = Self {
            fields: FormFields::new(),
            media: UploadedMedia::default(),
            stored: Vec::new(),
        };
        match form.read_parts(multipart, state, &base_url).await {
            Ok(()) => Ok(form),
            Err(e) => {
                form.discard(&state.images).await;
                Err(e)
            }
        }
    }
}

impl ArchiveForm {
    async fn read_parts(
        &mut self,
        mut multipart: Multipart,
        state: &AppState,
        base_url: &str,
    ) -> Result<(), AppError> {
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| multipart_error(e, state))?
        {
            let name = field.name().unwrap_or_default().to_string();

            if field.file_name().is_none() {
                let value = field.text().await.map_err(|e| multipart_error(e, state))?;
                self.fields.push(name, value);
                continue;
            }

            let content_type = field.content_type().map(str::to_string);
            let bytes = field.bytes().await.map_err(|e| multipart_error(e, state))?;
            // Browsers send an empty part for an untouched file input
            if bytes.is_empty() {
                continue;
            }

            match name.as_str() {
                IMAGE_FIELD | GALLERY_FIELD => {
                    let file_name = state.images.save(content_type.as_deref(), &bytes).await?;
                    let url = public_url(base_url, &file_name);
                    self.stored.push(file_name);
                    if name == IMAGE_FIELD {
                        self.media.main_image = Some(url);
                    } else {
                        self.media.gallery.push(url);
                    }
                }
                other => tracing::debug!(field = other, "ignoring unexpected file field"),
            }
        }
        Ok(())
    }

    /// Pass `result` through, deleting this submission's images if it failed.
    pub async fn settle<T, E>(&self, images: &ImageStore, result: Result<T, E>) -> Result<T, E> {
        if result.is_err() {
            self.discard(images).await;
        }
        result
    }

    async fn discard(&self, images: &ImageStore) {
        for file_name in &self.stored {
            if let Err(e) = images.remove(file_name).await {
                tracing::warn!(file = %file_name, error = %e, "failed to remove orphaned upload");
            }
        }
    }
}

fn multipart_error(err: MultipartError, state: &AppState) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::Upload(UploadError::TooLarge {
            max_bytes: state.images.max_bytes(),
        })
    } else {
        AppError::Validation(err.body_text())
    }
}

/// `{scheme}://{host}` of the request, honouring `X-Forwarded-Proto`.
pub fn base_url(headers: &HeaderMap, fallback_host: &str) -> String {
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or("http");
    let host = headers
        .get("host")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(fallback_host);
    format!("{scheme}://{host}")
}
