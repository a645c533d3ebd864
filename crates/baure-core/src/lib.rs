//! Business logic and port definitions for the Baure cultural archive.
//!
//! This crate owns the chat pipeline (classifier, prompt composer, response
//! post-processor) and defines the "ports" (generation backend, archive
//! repositories) that the infrastructure layer implements. It depends only
//! on `baure-types` -- never on `baure-infra` or any database/IO crate.

pub mod archive;
pub mod chat;
pub mod llm;
