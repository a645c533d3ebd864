//! Shared domain types for the Baure cultural archive.
//!
//! This crate contains the data shapes used across the workspace:
//! chat turns and recipe context, generation requests, archive records
//! (recipes, life stories, cultural data), configuration, and error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod archive;
pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
