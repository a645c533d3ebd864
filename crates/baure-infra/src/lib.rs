//! Infrastructure layer for the Baure cultural archive.
//!
//! Contains implementations of the ports defined in `baure-core`: SQLite
//! archive storage, generation backends (Gemini, OpenAI-compatible),
//! plus the configuration loader, cultural-context loader, and image
//! storage on local disk.

pub mod config;
pub mod context;
pub mod filesystem;
pub mod llm;
pub mod sqlite;
pub mod uploads;
