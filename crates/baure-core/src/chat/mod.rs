//! The chat subsystem: one stateless question/answer turn.
//!
//! A turn flows classifier -> prompt composer -> generation backend ->
//! response post-processor. [`service::ChatService`] wires the pieces.

pub mod classifier;
pub mod context;
pub mod postprocess;
pub mod prompt;
pub mod service;
