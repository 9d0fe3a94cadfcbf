//! services/summarizer/src/lib.rs
//!
//! Client-side orchestration of document summarization: request building,
//! progress estimation, cancellation, and the saved-summary collection.

pub mod adapters;
pub mod config;
pub mod error;
pub mod workflow;
