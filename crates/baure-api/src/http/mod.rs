//! HTTP/REST API layer for the Baure cultural archive.
//!
//! Axum-based JSON API under `/api/`, admin-gated writes, static uploads,
//! and an optional single-page app fallback.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
