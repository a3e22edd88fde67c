//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into store-level task operations.
//! - Keep presentation callers decoupled from storage details.

pub mod seed;
pub mod task_store;
