//! Custom axum extractors: admin gate and multipart archive forms.

pub mod admin;
pub mod form;
