//! Admin password gate for archive writes.
//!
//! The password is read from:
//! - `Authorization: Bearer <password>` header
//! - `X-Admin-Password: <password>` header
//!
//! Both the configured and the presented password are reduced to SHA-256
//! digests before comparison.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use sha2::{Digest, Sha256};

use crate::http::error::AppError;
use crate::state::AppState;

pub const MISSING_PASSWORD: &str = "Se requiere contraseña";
pub const WRONG_PASSWORD: &str = "Contraseña incorrecta";

/// Digest of the configured admin password.
pub struct AdminKey {
    digest: [u8; 32],
}

impl AdminKey {
    pub fn new(password: &str) -> Self {
        Self {
            digest: hash_password(password),
        }
    }

    pub fn matches(&self, candidate: &str) -> bool {
        hash_password(candidate) == self.digest
    }
}

fn hash_password(password: &str) -> [u8; 32] {
    Sha256::digest(password.as_bytes()).into()
}

/// Authorized admin request marker. Extracting this checks the password.
pub struct AdminAuthorized;

impl FromRequestParts<AppState> for AdminAuthorized {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let password = extract_password(parts)?;

        if state.admin_key.matches(&password) {
            Ok(AdminAuthorized)
        } else {
            tracing::warn!(path = %parts.uri.path(), "rejected admin request with wrong password");
            Err(AppError::Unauthorized(WRONG_PASSWORD.to_string()))
        }
    }
}

/// Extract the admin password from request headers.
fn extract_password(parts: &Parts) -> Result<String, AppError> {
    if let Some(auth) = parts.headers.get("authorization") {
        let auth_str = auth
            .to_str()
            .map_err(|_| AppError::Unauthorized(WRONG_PASSWORD.to_string()))?;
        if let Some(password) = auth_str.strip_prefix("Bearer ") {
            let password = password.trim();
            if !password.is_empty() {
                return Ok(password.to_string());
            }
        }
    }

    if let Some(value) = parts.headers.get("x-admin-password") {
        let password = value
            .to_str()
            .map_err(|_| AppError::Unauthorized(WRONG_PASSWORD.to_string()))?
            .trim();
        if !password.is_empty() {
            return Ok(password.to_string());
        }
    }

    Err(AppError::Unauthorized(MISSING_PASSWORD.to_string()))
}

#[cfg(test)]
mod tests {
    use axum::http::Request;

    use super::*;

    fn parts(headers: &[(&str, &str)]) -> Parts {
        let mut builder = Request::builder().uri("/api/recipes");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_admin_key_matches_exact_password() {
        let key = AdminKey::new("admin123");
        assert!(key.matches("admin123"));
        assert!(!key.matches("admin1234"));
        assert!(!key.matches(""));
    }

    #[test]
    fn test_extract_bearer() {
        let p = parts(&[("authorization", "Bearer admin123")]);
        assert_eq!(extract_password(&p).unwrap(), "admin123");
    }

    #[test]
    fn test_extract_custom_header() {
        let p = parts(&[("x-admin-password", " admin123 ")]);
        assert_eq!(extract_password(&p).unwrap(), "admin123");
    }

    #[test]
    fn test_extract_missing() {
        let p = parts(&[("authorization", "Basic abc")]);
        assert!(matches!(
            extract_password(&p),
            Err(AppError::Unauthorized(ref m)) if m == MISSING_PASSWORD
        ));
    }
}
