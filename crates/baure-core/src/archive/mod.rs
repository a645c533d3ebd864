//! Archive collections: recipes, life stories, and cultural data articles.
//!
//! - `entry`: per-collection rules (validation, draft application)
//! - `repository`: storage port implemented in baure-infra
//! - `service`: CRUD orchestration with soft delete
//! - `form`: coercion of admin form submissions into drafts

pub mod entry;
pub mod form;
pub mod repository;
pub mod service;
